//! Settings MCP Tools

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{GrowthPhase, InclusionMode, RangeOverride, Settings};
use crate::nutrition::{ross308_recommendations, units};

/// Requested changes; `None` leaves a setting as it is
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub growth_phase: Option<String>,
    pub inclusion_mode: Option<String>,
    pub nutrient_units: Option<HashMap<String, String>>,
    pub nutrient_visibility: Option<HashMap<String, bool>>,
    pub recommendation_overrides: Option<HashMap<String, RangeOverride>>,
    /// Override keys to revert to the built-in ranges
    pub clear_overrides: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct UnitSetting {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: String,
    pub available_units: Vec<&'static str>,
    pub visible: bool,
}

/// Response for get_settings and update_settings
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub growth_phase: GrowthPhase,
    pub available_growth_phases: Vec<&'static str>,
    pub inclusion_mode: InclusionMode,
    pub display: Vec<UnitSetting>,
    pub recommendation_overrides: HashMap<String, RangeOverride>,
}

pub fn get_settings(settings: &Settings) -> SettingsResponse {
    SettingsResponse {
        growth_phase: settings.growth_phase,
        available_growth_phases: GrowthPhase::ALL.iter().map(|p| p.as_str()).collect(),
        inclusion_mode: settings.inclusion_mode,
        display: units::DISPLAY_KEYS
            .iter()
            .map(|(key, label)| UnitSetting {
                key: *key,
                label: *label,
                unit: settings.unit_for(key),
                available_units: units::available_units(key),
                visible: settings.is_visible(key),
            })
            .collect(),
        recommendation_overrides: settings
            .recommendation_overrides
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect(),
    }
}

/// Validate and apply an update.
///
/// Nothing is applied when any part of the update is invalid.
pub fn update_settings(
    settings: &mut Settings,
    update: SettingsUpdate,
) -> Result<SettingsResponse, String> {
    let mut next = settings.clone();

    if let Some(phase) = update.growth_phase.as_deref() {
        next.growth_phase = GrowthPhase::parse(phase).map_err(|e| e.to_string())?;
    }
    if let Some(mode) = update.inclusion_mode.as_deref() {
        next.inclusion_mode = InclusionMode::parse(mode).map_err(|e| e.to_string())?;
    }

    for (key, unit) in update.nutrient_units.unwrap_or_default() {
        let available = units::available_units(&key);
        if available.is_empty() {
            return Err(format!("No units defined for '{}'", key));
        }
        if !available.iter().any(|u| *u == unit) {
            return Err(format!(
                "Unit '{}' is not available for {} (choose from {:?})",
                unit, key, available
            ));
        }
        next.nutrient_units.insert(key, unit);
    }

    for (key, visible) in update.nutrient_visibility.unwrap_or_default() {
        if units::label(&key).is_none() {
            return Err(format!("Unknown display key '{}'", key));
        }
        next.nutrient_visibility.insert(key, visible);
    }

    let recommended = ross308_recommendations(next.growth_phase);
    for (key, range) in update.recommendation_overrides.unwrap_or_default() {
        if !recommended.contains_key(&key) {
            return Err(format!("No recommendation exists for '{}'", key));
        }
        if let Some(max) = range.max {
            if range.min > max {
                return Err(format!(
                    "Override for {} has min {} greater than max {}",
                    key, range.min, max
                ));
            }
        }
        next.recommendation_overrides.insert(key, range);
    }

    for key in update.clear_overrides.unwrap_or_default() {
        next.recommendation_overrides.remove(&key);
    }

    *settings = next;
    tracing::info!(
        "Settings updated: phase {}, inclusion mode {}",
        settings.growth_phase.as_str(),
        settings.inclusion_mode.as_str()
    );
    Ok(get_settings(settings))
}
