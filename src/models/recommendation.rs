//! Recommendation model
//!
//! Growth phases and the recommended nutrient ranges attached to them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, FeedResult};

/// Broiler growth phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GrowthPhase {
    #[default]
    Starter,
    Grower,
    #[serde(rename = "Finisher 1")]
    Finisher1,
    #[serde(rename = "Finisher 2")]
    Finisher2,
}

impl GrowthPhase {
    pub const ALL: [GrowthPhase; 4] = [
        GrowthPhase::Starter,
        GrowthPhase::Grower,
        GrowthPhase::Finisher1,
        GrowthPhase::Finisher2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthPhase::Starter => "Starter",
            GrowthPhase::Grower => "Grower",
            GrowthPhase::Finisher1 => "Finisher 1",
            GrowthPhase::Finisher2 => "Finisher 2",
        }
    }

    /// Parse a phase name, ignoring case, spaces and underscores
    pub fn parse(s: &str) -> FeedResult<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "starter" => Ok(GrowthPhase::Starter),
            "grower" => Ok(GrowthPhase::Grower),
            "finisher1" => Ok(GrowthPhase::Finisher1),
            "finisher2" => Ok(GrowthPhase::Finisher2),
            _ => Err(FeedError::UnknownGrowthPhase(s.to_string())),
        }
    }
}

/// Recommended range for one nutrient.
///
/// `max` of `None` means the recommendation is a minimum only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRange {
    pub min: f64,
    pub max: Option<f64>,
    pub unit: String,
}

impl RecommendationRange {
    pub fn bounded(min: f64, max: f64, unit: &str) -> Self {
        Self {
            min,
            max: Some(max),
            unit: unit.to_string(),
        }
    }

    pub fn minimum(min: f64, unit: &str) -> Self {
        Self {
            min,
            max: None,
            unit: unit.to_string(),
        }
    }

    pub fn is_minimum_only(&self) -> bool {
        self.max.is_none()
    }
}

/// User override of a recommended range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeOverride {
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
}

/// Recommendation profile keyed by `nutrients.<field>` display keys
pub type RecommendationProfile = BTreeMap<String, RecommendationRange>;

/// Overrides keyed by `nutrients.<field>` display keys
pub type RecommendationOverrides = BTreeMap<String, RangeOverride>;
