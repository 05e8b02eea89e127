//! Runtime configuration shared by the parser, resolver and report runner.
//!
//! # Environment Variables
//!
//! - `FITCHECK_CATALOG_DIR`: directory holding `types.csv` and `type_attributes.csv`
//! - `FITCHECK_MAX_PREREQ_DEPTH`: prerequisite chain cap (default: 32)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::hull::{HullRules, DEFAULT_SUBSYSTEM_HULLS};

pub const CATALOG_DIR_ENV: &str = "FITCHECK_CATALOG_DIR";
pub const MAX_PREREQ_DEPTH_ENV: &str = "FITCHECK_MAX_PREREQ_DEPTH";

/// Deepest prerequisite chain the resolver follows before reporting bad data.
pub const DEFAULT_MAX_PREREQUISITE_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitcheckConfig {
    pub max_prerequisite_depth: usize,
    pub subsystem_hulls: Vec<String>,
    pub catalog_dir: Option<PathBuf>,
}

impl Default for FitcheckConfig {
    fn default() -> Self {
        Self {
            max_prerequisite_depth: DEFAULT_MAX_PREREQUISITE_DEPTH,
            subsystem_hulls: DEFAULT_SUBSYSTEM_HULLS
                .iter()
                .map(|hull| hull.to_string())
                .collect(),
            catalog_dir: None,
        }
    }
}

impl FitcheckConfig {
    /// Create configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(CATALOG_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.catalog_dir = Some(PathBuf::from(dir));
        }

        if let Some(raw) = lookup(MAX_PREREQ_DEPTH_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_prerequisite_depth = depth,
                _ => warn!(
                    value = %raw,
                    default = DEFAULT_MAX_PREREQUISITE_DEPTH,
                    "ignoring invalid {MAX_PREREQ_DEPTH_ENV}"
                ),
            }
        }

        config
    }

    pub fn with_catalog_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.catalog_dir = Some(dir.into());
        self
    }

    pub fn with_max_prerequisite_depth(mut self, depth: usize) -> Self {
        self.max_prerequisite_depth = depth;
        self
    }

    pub fn hull_rules(&self) -> HullRules {
        HullRules::new(&self.subsystem_hulls)
    }
}
