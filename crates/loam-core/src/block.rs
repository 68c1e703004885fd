use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;
use std::fmt;
use std::mem;

/// The state of a single block: a material id in the low byte plus shape flags.
///
/// `BlockState::AIR` (all zero bits) is the "empty" sentinel returned for anything that is missing or out of bounds.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct BlockState(pub u16);

unsafe impl Zeroable for BlockState {}
unsafe impl Pod for BlockState {}

const_assert_eq!(mem::size_of::<BlockState>(), 2);

const MATERIAL_MASK: u16 = 0x00ff;
const SLAB_BIT: u16 = 1 << 8;
const WATERLOGGED_BIT: u16 = 1 << 9;

macro_rules! def_materials {
    ($($name:ident = $id:literal),* $(,)?) => {
        impl BlockState {
            $(pub const $name: Self = Self($id);)*

            /// Name of the material, ignoring shape flags.
            pub fn material_name(self) -> &'static str {
                match self.0 & MATERIAL_MASK {
                    $($id => stringify!($name),)*
                    _ => "UNKNOWN",
                }
            }
        }
    };
}

def_materials!(
    AIR = 0,
    STONE = 1,
    DIRT = 2,
    GRASS = 3,
    SAND = 4,
    GRAVEL = 5,
    WATER = 6,
    BEDROCK = 7,
    COBBLESTONE = 8,
    SANDSTONE = 9,
);

impl BlockState {
    #[inline]
    pub const fn material(self) -> Self {
        Self(self.0 & MATERIAL_MASK)
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.0 == Self::AIR.0
    }

    #[inline]
    pub fn is_fluid(self) -> bool {
        self.0 == Self::WATER.0
    }

    /// Anything that is neither air nor a full fluid block. Slabs count as solid.
    #[inline]
    pub fn is_solid(self) -> bool {
        !self.is_air() && !self.is_fluid()
    }

    #[inline]
    pub fn is_slab(self) -> bool {
        self.0 & SLAB_BIT != 0
    }

    #[inline]
    pub fn is_waterlogged(self) -> bool {
        self.0 & WATERLOGGED_BIT != 0
    }

    /// The bottom-slab variant of this material, if the material has one.
    pub fn slab(self) -> Option<Self> {
        match self.material() {
            Self::STONE | Self::COBBLESTONE | Self::SANDSTONE => Some(Self(self.material().0 | SLAB_BIT)),
            // Soft materials get the slab of what they weather into.
            Self::DIRT | Self::GRASS | Self::GRAVEL => Some(Self(Self::COBBLESTONE.0 | SLAB_BIT)),
            Self::SAND => Some(Self(Self::SANDSTONE.0 | SLAB_BIT)),
            _ => None,
        }
    }

    /// Only slabs can hold water.
    pub fn waterlogged(self) -> Option<Self> {
        self.is_slab().then(|| Self(self.0 | WATERLOGGED_BIT))
    }
}

impl fmt::Debug for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.material_name())?;
        if self.is_slab() {
            write!(f, "[slab]")?;
        }
        if self.is_waterlogged() {
            write!(f, "[waterlogged]")?;
        }
        Ok(())
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
