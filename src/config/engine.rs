// src/config/engine.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "SCORELYTIC_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/engine.toml";

fn default_score_min() -> f64 {
    -1.0
}
fn default_score_max() -> f64 {
    10.0
}
fn default_max_indicators() -> usize {
    32
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub validation: ValidationSection,
    #[serde(default)]
    pub heuristics: HeuristicsSection,
}

/// Bounds enforced on request input before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSection {
    #[serde(default = "default_score_min")]
    pub score_min: f64,
    #[serde(default = "default_score_max")]
    pub score_max: f64,
    #[serde(default = "default_max_indicators")]
    pub max_indicators: usize,
}

impl Default for ValidationSection {
    fn default() -> Self {
        Self {
            score_min: default_score_min(),
            score_max: default_score_max(),
            max_indicators: default_max_indicators(),
        }
    }
}

/// Where the knowledge base comes from. All unset → compiled-in tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeuristicsSection {
    pub base_path: Option<PathBuf>,
    pub interactions_path: Option<PathBuf>,
    /// Output of `derive-heuristics`; takes precedence over the two above.
    pub derived_path: Option<PathBuf>,
}

impl EngineConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading engine config from {}", path.display()))?;
        let mut cfg: EngineConfig = toml::from_str(&data)
            .with_context(|| format!("parsing engine config {}", path.display()))?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $SCORELYTIC_CONFIG_PATH (must exist)
    /// 2) config/engine.toml
    /// 3) defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from_file(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::load_from_file(&default);
        }
        Ok(Self::default())
    }

    fn sanitize(&mut self) {
        let v = &mut self.validation;
        if !v.score_min.is_finite() {
            v.score_min = default_score_min();
        }
        if !v.score_max.is_finite() {
            v.score_max = default_score_max();
        }
        if v.score_min > v.score_max {
            // swap to keep a valid interval
            std::mem::swap(&mut v.score_min, &mut v.score_max);
        }
        if v.max_indicators == 0 {
            v.max_indicators = default_max_indicators();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_defaults() {
        let mut cfg: EngineConfig = toml::from_str(
            r#"
[validation]
score_max = 5.0
"#,
        )
        .unwrap();
        cfg.sanitize();
        assert_eq!(cfg.validation.score_min, -1.0);
        assert_eq!(cfg.validation.score_max, 5.0);
        assert_eq!(cfg.validation.max_indicators, 32);
        assert_eq!(cfg.heuristics, HeuristicsSection::default());
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let mut cfg = EngineConfig::default();
        cfg.validation.score_min = 10.0;
        cfg.validation.score_max = 0.0;
        cfg.validation.max_indicators = 0;
        cfg.sanitize();
        assert_eq!(cfg.validation.score_min, 0.0);
        assert_eq!(cfg.validation.score_max, 10.0);
        assert_eq!(cfg.validation.max_indicators, 32);
    }

    #[test]
    fn shipped_config_parses() {
        let cfg: EngineConfig = toml::from_str(include_str!("../../config/engine.toml")).unwrap();
        assert_eq!(cfg.validation.score_min, -1.0);
        assert!(cfg.heuristics.derived_path.is_none());
    }
}
