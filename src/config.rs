//! Runtime configuration
//!
//! Read from environment variables at startup.

use std::path::PathBuf;

use crate::error::FeedResult;
use crate::models::GrowthPhase;

pub const CATALOG_PATH_VAR: &str = "FEEDLAB_CATALOG_PATH";
pub const GROWTH_PHASE_VAR: &str = "FEEDLAB_GROWTH_PHASE";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// JSON catalog to load instead of the built-in one
    pub catalog_path: Option<PathBuf>,
    pub growth_phase: GrowthPhase,
}

impl Config {
    pub fn from_env() -> FeedResult<Self> {
        Self::from_vars(
            std::env::var(CATALOG_PATH_VAR).ok(),
            std::env::var(GROWTH_PHASE_VAR).ok(),
        )
    }

    fn from_vars(catalog_path: Option<String>, growth_phase: Option<String>) -> FeedResult<Self> {
        let catalog_path = catalog_path
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let growth_phase = match growth_phase.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => GrowthPhase::parse(name)?,
            _ => GrowthPhase::default(),
        };
        Ok(Self {
            catalog_path,
            growth_phase,
        })
    }
}
