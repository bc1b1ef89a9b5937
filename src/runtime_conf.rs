use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::io::provider::DEFAULT_CACHE_DIR;
use crate::resample::Interpolation;
use crate::Float;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConf {
    /// Root of a local mirror of the dataset repository.
    pub dataset_path: String,
    pub cache_path: String,
    pub resample_hz: Float,
    pub interpolation: Interpolation,
    pub strict_crop: bool
}

impl Default for RuntimeConf {
    fn default() -> RuntimeConf {
        RuntimeConf {
            dataset_path: String::from("."),
            cache_path: format!("~/{}", DEFAULT_CACHE_DIR),
            resample_hz: 100.0,
            interpolation: Interpolation::Cubic,
            strict_crop: true
        }
    }
}

pub fn load_runtime_conf(path: &Path) -> Result<RuntimeConf> {
    let contents = fs::read_to_string(path)?;
    let conf = parse_runtime_conf(&contents)?;
    info!(path = %path.display(), "Loaded runtime conf");
    Ok(conf)
}

pub fn parse_runtime_conf(contents: &str) -> Result<RuntimeConf> {
    if contents.trim().is_empty() {
        return Ok(RuntimeConf::default());
    }
    Ok(serde_yaml::from_str(contents)?)
}
