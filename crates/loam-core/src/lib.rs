//! Leaf data model shared by the loam crates: block states, chunk buffers, coordinates and timing.

pub mod block;
pub mod buffer;
pub mod coordinates;
pub mod sliver;
pub mod timing;

pub use block::*;
pub use buffer::*;
pub use coordinates::*;
pub use sliver::*;
pub use timing::*;

use ahash::AHashMap;
pub type SmallKeyHashMap<K, V> = AHashMap<K, V>;

// Re-exports.
pub use glam;
pub use smallvec;
pub use static_assertions;
