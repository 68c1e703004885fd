use loam_core::{BlockState, Sliver, CHUNK_HEIGHT};
use loam_post::{BaseGenerator, SampleError};

use noise::{NoiseFn, Perlin};

/// Everything below this depth under the surface can be hollowed out by caves.
const CAVE_DEPTH: i32 = 5;
const CAVE_THRESHOLD: f64 = 0.55;

/// Rolling Perlin hills with a sea and a scattering of caves.
pub struct NoiseTerrain {
    terrain: Perlin,
    caves: Perlin,
    sea_level: i32,
}

impl NoiseTerrain {
    pub fn new(seed: u64, sea_level: i32) -> Self {
        Self {
            terrain: Perlin::new(seed as u32),
            caves: Perlin::new((seed as u32).wrapping_add(7)),
            sea_level,
        }
    }

    pub fn sea_level(&self) -> i32 {
        self.sea_level
    }

    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let (wx, wz) = (x as f64, z as f64);
        let coarse = self.terrain.get([wx * 0.01, wz * 0.01]);
        let detail = self.terrain.get([wx * 0.05 + 101.3, wz * 0.05 - 73.7]);

        let h = self.sea_level as f64 + coarse * 14.0 + detail * 3.0;
        (h.round() as i32).clamp(1, CHUNK_HEIGHT - 2)
    }

    fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        let p = [x as f64 * 0.06, y as f64 * 0.1, z as f64 * 0.06];
        self.caves.get(p) > CAVE_THRESHOLD
    }
}

impl BaseGenerator for NoiseTerrain {
    fn sample_column(&self, x: i32, z: i32) -> Result<Sliver, SampleError> {
        let height = self.surface_height(x, z);
        Ok((0..CHUNK_HEIGHT)
            .map(|y| {
                if y == 0 {
                    BlockState::BEDROCK
                } else if y < height - CAVE_DEPTH && self.is_cave(x, y, z) {
                    BlockState::AIR
                } else if y < height - 3 {
                    BlockState::STONE
                } else if y < height {
                    BlockState::DIRT
                } else if y == height {
                    if height <= self.sea_level + 1 {
                        BlockState::SAND
                    } else {
                        BlockState::GRASS
                    }
                } else if y <= self.sea_level {
                    BlockState::WATER
                } else {
                    BlockState::AIR
                }
            })
            .collect())
    }

    fn highest_terrain_block(&self, x: i32, z: i32) -> Result<i32, SampleError> {
        Ok(self.surface_height(x, z))
    }

    fn highest_terrain_or_fluid_block(&self, x: i32, z: i32) -> Result<i32, SampleError> {
        Ok(self.surface_height(x, z).max(self.sea_level))
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn height_queries_agree_with_sampled_columns() {
        let terrain = NoiseTerrain::new(12345, 62);
        for x in -40..40 {
            for z in (-40..40).step_by(3) {
                let column = terrain.sample_column(x, z).unwrap();
                assert_eq!(terrain.highest_terrain_block(x, z).unwrap(), column.highest_terrain());
                assert_eq!(
                    terrain.highest_terrain_or_fluid_block(x, z).unwrap(),
                    column.highest_terrain_or_fluid()
                );
                assert_eq!(column.get(0), BlockState::BEDROCK);
            }
        }
    }

    #[test]
    fn same_seed_same_terrain() {
        let a = NoiseTerrain::new(3, 62);
        let b = NoiseTerrain::new(3, 62);
        assert_eq!(a.sample_column(17, -4).unwrap(), b.sample_column(17, -4).unwrap());
    }
}
