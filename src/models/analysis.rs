//! Analysis result model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Ingredient, Nutrient};

/// Nutrients released by one enzyme, already scaled by its dosage ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnzymeContribution {
    pub name: String,
    pub contributions: BTreeMap<Nutrient, f64>,
}

/// Output of the feed analysis engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "totalInclusion")]
    pub total_inclusion_pct: f64,
    #[serde(rename = "totalCostPerTon")]
    pub total_cost_per_ton: f64,
    #[serde(rename = "totalCostPer100kg")]
    pub total_cost_per_100kg: f64,
    /// Keyed by intrinsic field name or derived ratio key
    pub nutrients: BTreeMap<String, f64>,
    pub ingredients: Vec<Ingredient>,
    /// Keyed by enzyme id
    #[serde(rename = "enzymeContributions")]
    pub enzyme_contributions: BTreeMap<i64, EnzymeContribution>,
}

impl AnalysisResult {
    /// Look up a value by display key.
    ///
    /// Accepts `totalCostPerTon`, `totalCostPer100kg`, `totalInclusion`,
    /// `nutrients.<field>`, or a bare field name.
    pub fn value_for_key(&self, key: &str) -> Option<f64> {
        match key {
            "totalCostPerTon" => Some(self.total_cost_per_ton),
            "totalCostPer100kg" => Some(self.total_cost_per_100kg),
            "totalInclusion" => Some(self.total_inclusion_pct),
            _ => {
                let field = key.strip_prefix("nutrients.").unwrap_or(key);
                self.nutrients.get(field).copied()
            }
        }
    }

    pub fn nutrient(&self, nutrient: Nutrient) -> f64 {
        self.nutrients.get(nutrient.key()).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_for_key() {
        let mut nutrients = BTreeMap::new();
        nutrients.insert("CP_pct".to_string(), 21.5);
        let result = AnalysisResult {
            total_inclusion_pct: 100.0,
            total_cost_per_ton: 400.0,
            total_cost_per_100kg: 40.0,
            nutrients,
            ingredients: Vec::new(),
            enzyme_contributions: BTreeMap::new(),
        };

        assert_eq!(result.value_for_key("nutrients.CP_pct"), Some(21.5));
        assert_eq!(result.value_for_key("CP_pct"), Some(21.5));
        assert_eq!(result.value_for_key("totalCostPer100kg"), Some(40.0));
        assert_eq!(result.value_for_key("nutrients.Zinc"), None);
        assert_eq!(result.nutrient(Nutrient::Ash), 0.0);
    }
}
