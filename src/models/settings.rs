//! Session settings
//!
//! Display and comparison preferences for one analysis session. The engine
//! itself never reads these.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{GrowthPhase, RecommendationOverrides};
use crate::error::{FeedError, FeedResult};
use crate::nutrition::units;

/// How inclusion amounts are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InclusionMode {
    #[default]
    Percent,
    KgPerTon,
}

impl InclusionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InclusionMode::Percent => "percent",
            InclusionMode::KgPerTon => "kg_per_ton",
        }
    }

    pub fn parse(s: &str) -> FeedResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "percent" | "pct" | "%" => Ok(InclusionMode::Percent),
            "kg_per_ton" | "kg/ton" | "kgperton" => Ok(InclusionMode::KgPerTon),
            _ => Err(FeedError::UnknownInclusionMode(s.to_string())),
        }
    }

    pub fn unit_label(&self) -> &'static str {
        match self {
            InclusionMode::Percent => "%",
            InclusionMode::KgPerTon => "kg/ton",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub growth_phase: GrowthPhase,
    pub inclusion_mode: InclusionMode,
    /// Display unit per key; keys not present use the base unit
    pub nutrient_units: BTreeMap<String, String>,
    pub recommendation_overrides: RecommendationOverrides,
    /// Visibility per key; keys not present are visible
    pub nutrient_visibility: BTreeMap<String, bool>,
}

impl Settings {
    pub fn with_growth_phase(growth_phase: GrowthPhase) -> Self {
        Self {
            growth_phase,
            ..Self::default()
        }
    }

    /// Display unit for a key
    pub fn unit_for(&self, key: &str) -> String {
        self.nutrient_units
            .get(key)
            .cloned()
            .unwrap_or_else(|| units::base_unit(key).to_string())
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.nutrient_visibility.get(key).copied().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusion_mode_parse() {
        assert_eq!(InclusionMode::parse("percent").unwrap(), InclusionMode::Percent);
        assert_eq!(InclusionMode::parse("kg/ton").unwrap(), InclusionMode::KgPerTon);
        assert!(InclusionMode::parse("lbs").is_err());
    }

    #[test]
    fn test_defaults_use_base_units_and_show_everything() {
        let settings = Settings::default();
        assert_eq!(settings.growth_phase, GrowthPhase::Starter);
        assert_eq!(settings.unit_for("nutrients.ME_kcal_per_kg"), "kcal/kg");
        assert_eq!(settings.unit_for("totalCostPerTon"), "$/ton");
        assert!(settings.is_visible("nutrients.CP_pct"));
    }

    #[test]
    fn test_configured_unit_wins() {
        let mut settings = Settings::default();
        settings
            .nutrient_units
            .insert("nutrients.ME_kcal_per_kg".to_string(), "MJ/kg".to_string());
        settings
            .nutrient_visibility
            .insert("nutrients.NDF_pct".to_string(), false);
        assert_eq!(settings.unit_for("nutrients.ME_kcal_per_kg"), "MJ/kg");
        assert!(!settings.is_visible("nutrients.NDF_pct"));
    }
}
