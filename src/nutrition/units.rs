//! Display unit table and conversion
//!
//! Every displayed result key has a base unit (the unit the engine computes
//! in) and a set of alternative units with multiplicative factors from the
//! base unit.

use serde::{Deserialize, Serialize};

/// Megajoules per kilocalorie
pub const MJ_PER_KCAL: f64 = 1.0 / 239.006;

/// Grams per kilogram per percent
pub const G_PER_KG_PER_PCT: f64 = 10.0;

/// Parts per million per percent
pub const PPM_PER_PCT: f64 = 10_000.0;

/// Displayed result keys with their labels, in display order
pub const DISPLAY_KEYS: [(&str, &str); 26] = [
    ("totalCostPerTon", "Total Cost per Ton ($/ton)"),
    ("totalCostPer100kg", "Total Cost per 100kg ($/100kg)"),
    ("nutrients.CP_pct", "Crude Protein %"),
    ("nutrients.ME_kcal_per_kg", "ME (kcal/kg)"),
    ("nutrients.MECP_Ratio", "ME/CP Ratio"),
    ("nutrients.Ca_pct", "Calcium %"),
    ("nutrients.avP_pct", "Av. Phosphorus %"),
    ("nutrients.phytateP_pct", "Phytate P %"),
    ("nutrients.CaAvP_Ratio", "Ca/Av.P Ratio"),
    ("nutrients.Na_pct", "Sodium %"),
    ("nutrients.K_pct", "Potassium %"),
    ("nutrients.Cl_pct", "Chlorine %"),
    ("nutrients.K_Cl_Na_Ratio", "(K+Cl)/Na Ratio"),
    ("nutrients.dEB", "dEB (mEq/kg)"),
    ("nutrients.Ash_pct", "Ash %"),
    ("nutrients.Choline_mg_per_kg", "Choline (mg/kg)"),
    ("nutrients.Lys_pct", "Lysine %"),
    ("nutrients.TSAA_pct", "Met+Cys %"),
    ("nutrients.Thr_pct", "Threonine %"),
    ("nutrients.Val_pct", "Valine %"),
    ("nutrients.Ile_pct", "Isoleucine %"),
    ("nutrients.Leu_pct", "Leucine %"),
    ("nutrients.Arg_pct", "Arginine %"),
    ("nutrients.Try_pct", "Tryptophan %"),
    ("nutrients.Starch_pct", "Starch %"),
    ("nutrients.CF_pct", "Crude Fiber %"),
];

/// Base unit and conversion factors for one key
#[derive(Debug, Clone, Copy)]
pub struct UnitDefinition {
    pub base_unit: &'static str,
    pub units: &'static [(&'static str, f64)],
}

const PERCENT: UnitDefinition = UnitDefinition {
    base_unit: "%",
    units: &[("%", 1.0), ("g/kg", G_PER_KG_PER_PCT)],
};

const ELECTROLYTE: UnitDefinition = UnitDefinition {
    base_unit: "%",
    units: &[("%", 1.0), ("g/kg", G_PER_KG_PER_PCT), ("ppm", PPM_PER_PCT)],
};

const RATIO: UnitDefinition = UnitDefinition {
    base_unit: "",
    units: &[("", 1.0)],
};

/// Look up the unit definition for a display key
pub fn unit_definition(key: &str) -> Option<UnitDefinition> {
    let def = match key {
        "totalCostPerTon" => UnitDefinition {
            base_unit: "$/ton",
            units: &[("$/ton", 1.0), ("$/kg", 0.001)],
        },
        "totalCostPer100kg" => UnitDefinition {
            base_unit: "$/100kg",
            units: &[("$/100kg", 1.0), ("$/kg", 0.01)],
        },
        "nutrients.ME_kcal_per_kg" => UnitDefinition {
            base_unit: "kcal/kg",
            units: &[("kcal/kg", 1.0), ("MJ/kg", MJ_PER_KCAL)],
        },
        "nutrients.dEB" => UnitDefinition {
            base_unit: "mEq/kg",
            units: &[("mEq/kg", 1.0)],
        },
        "nutrients.Choline_mg_per_kg" => UnitDefinition {
            base_unit: "mg/kg",
            units: &[("mg/kg", 1.0), ("g/kg", 0.001), ("%", 0.0001), ("ppm", 1.0)],
        },
        "nutrients.MECP_Ratio" | "nutrients.CaAvP_Ratio" | "nutrients.K_Cl_Na_Ratio" => RATIO,
        "nutrients.Na_pct" | "nutrients.K_pct" | "nutrients.Cl_pct" => ELECTROLYTE,
        "nutrients.CP_pct"
        | "nutrients.Ca_pct"
        | "nutrients.avP_pct"
        | "nutrients.phytateP_pct"
        | "nutrients.Ash_pct"
        | "nutrients.Lys_pct"
        | "nutrients.TSAA_pct"
        | "nutrients.Thr_pct"
        | "nutrients.Val_pct"
        | "nutrients.Ile_pct"
        | "nutrients.Leu_pct"
        | "nutrients.Arg_pct"
        | "nutrients.Try_pct"
        | "nutrients.Starch_pct"
        | "nutrients.CF_pct" => PERCENT,
        _ => return None,
    };
    Some(def)
}

/// A value expressed in a display unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedValue {
    pub value: f64,
    pub unit: String,
}

/// Convert a base-unit value to a target unit.
///
/// Unknown keys pass the value through with an empty unit. Unknown target
/// units fall back to the base unit with the value unchanged.
pub fn convert(value: f64, key: &str, target_unit: &str) -> ConvertedValue {
    let Some(def) = unit_definition(key) else {
        return ConvertedValue {
            value,
            unit: String::new(),
        };
    };

    match def.units.iter().find(|(unit, _)| *unit == target_unit) {
        Some((unit, factor)) => ConvertedValue {
            value: value * factor,
            unit: unit.to_string(),
        },
        None => {
            tracing::warn!(
                "Unknown unit '{}' for {}, using base unit '{}'",
                target_unit,
                key,
                def.base_unit
            );
            ConvertedValue {
                value,
                unit: def.base_unit.to_string(),
            }
        }
    }
}

/// Convert a value from a display unit back to the base unit
pub fn to_base(value: f64, key: &str, from_unit: &str) -> f64 {
    unit_definition(key)
        .and_then(|def| def.units.iter().find(|(unit, _)| *unit == from_unit).copied())
        .map(|(_, factor)| value / factor)
        .unwrap_or(value)
}

/// Unit labels available for a key, base unit first
pub fn available_units(key: &str) -> Vec<&'static str> {
    unit_definition(key)
        .map(|def| def.units.iter().map(|(unit, _)| *unit).collect())
        .unwrap_or_default()
}

/// Base unit for a key, empty when the key has no definition
pub fn base_unit(key: &str) -> &'static str {
    unit_definition(key).map(|def| def.base_unit).unwrap_or("")
}

/// Display label for a key
pub fn label(key: &str) -> Option<&'static str> {
    DISPLAY_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}
