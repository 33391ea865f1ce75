//! JSON run configuration for the headless grower.

use serde::{Deserialize, Serialize};
use skeleton_core::{GrowthConfig, JitterParams};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid json in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Everything one run needs: sampler settings, growth settings, RNG seed and
/// output location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub sampler: JitterParams,
    pub growth: GrowthConfig,
    /// Seeds both the sampler jitter and endpoint selection.
    pub seed: u64,
    /// OBJ file the skeleton is written to.
    pub output: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sampler: JitterParams::default(),
            growth: GrowthConfig::default(),
            seed: 1512086461918454205,
            output: PathBuf::from("skeleton.obj"),
        }
    }
}

impl RunConfig {
    /// Reads a run configuration from a JSON file.
    ///
    /// Missing fields fall back to [`RunConfig::default`].
    pub fn load(path: &Path) -> Result<Self, LoadConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LoadConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skeleton_core::{Connectivity, PlacementRule};

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let json = r#"{
            "seed": 7,
            "growth": {
                "connectivity": 6,
                "iterations": [
                    { "placement": { "rule": "hops", "target": 4 }, "n_branches": 2 }
                ]
            }
        }"#;
        let cfg: RunConfig = serde_json::from_str(json).unwrap();

        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.sampler, JitterParams::default());
        assert_eq!(cfg.growth.connectivity, Connectivity::Six);
        assert_eq!(cfg.growth.iterations.len(), 1);
        assert_eq!(
            cfg.growth.iterations[0].placement,
            PlacementRule::Hops { target: 4 }
        );
        assert_eq!(cfg.output, PathBuf::from("skeleton.obj"));
    }

    #[test]
    fn unsupported_connectivity_is_rejected_at_load() {
        let json = r#"{ "growth": { "connectivity": 26 } }"#;
        let err = serde_json::from_str::<RunConfig>(json).unwrap_err();
        assert!(err.to_string().contains("unsupported connectivity"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = RunConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, LoadConfigError::Io { .. }));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let cfg = RunConfig::default();
        let text = serde_json::to_string(&cfg).unwrap();
        let back: RunConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
