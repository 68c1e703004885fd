use loam_post::{PostConfig, SchedulerConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    pub dimensions: Vec<DimensionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            dimensions: vec![DimensionConfig::default()],
        }
    }
}

impl Config {
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self, ron::Error> {
        let reader = std::fs::File::open(path)?;

        ron::de::from_reader(reader)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DimensionConfig {
    pub name: String,
    /// Seeds the terrain noise.
    pub seed: u64,
    pub sea_level: i32,
    pub post: PostConfig,
}

impl Default for DimensionConfig {
    fn default() -> Self {
        Self {
            name: "overworld".into(),
            seed: 0,
            sea_level: 62,
            post: PostConfig::default(),
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
