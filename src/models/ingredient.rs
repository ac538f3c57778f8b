//! Ingredient model
//!
//! A feedstuff or enzyme in the catalog, with its inclusion in the current
//! recipe, price, and intrinsic nutrient profile.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Nutrient, NutrientProfile};

/// Ingredient category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IngredientCategory {
    Energy,
    Protein,
    AminoAcids,
    MineralSupplements,
    Medicated,
    Enzymes,
    #[default]
    Other,
}

impl IngredientCategory {
    pub const ALL: [IngredientCategory; 7] = [
        IngredientCategory::Energy,
        IngredientCategory::Protein,
        IngredientCategory::AminoAcids,
        IngredientCategory::MineralSupplements,
        IngredientCategory::Medicated,
        IngredientCategory::Enzymes,
        IngredientCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientCategory::Energy => "Energy",
            IngredientCategory::Protein => "Protein",
            IngredientCategory::AminoAcids => "AminoAcids",
            IngredientCategory::MineralSupplements => "MineralSupplements",
            IngredientCategory::Medicated => "Medicated",
            IngredientCategory::Enzymes => "Enzymes",
            IngredientCategory::Other => "Other",
        }
    }

    /// Parse a category name; unrecognized names map to `Other`
    pub fn from_str(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "energy" => IngredientCategory::Energy,
            "protein" => IngredientCategory::Protein,
            "aminoacids" => IngredientCategory::AminoAcids,
            "mineralsupplements" | "minerals" => IngredientCategory::MineralSupplements,
            "medicated" => IngredientCategory::Medicated,
            "enzymes" | "enzyme" => IngredientCategory::Enzymes,
            _ => IngredientCategory::Other,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            IngredientCategory::Energy => "Energy Sources",
            IngredientCategory::Protein => "Protein Sources",
            IngredientCategory::AminoAcids => "Amino Acids",
            IngredientCategory::MineralSupplements => "Mineral Supplements",
            IngredientCategory::Medicated => "Medicated Additives",
            IngredientCategory::Enzymes => "Enzymes",
            IngredientCategory::Other => "Other Additives",
        }
    }
}

/// A catalog ingredient.
///
/// Enzymes carry a standard dosage and a matrix of nutrient amounts released
/// into the finished feed at that dosage. Other categories ignore both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: IngredientCategory,
    #[serde(rename = "Inclusion_pct", default)]
    pub inclusion_pct: f64,
    #[serde(flatten)]
    pub nutrients: NutrientProfile,
    #[serde(rename = "Price_USD_per_ton", default)]
    pub price_per_ton: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_dosage_g_per_ton: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<BTreeMap<Nutrient, f64>>,
}

impl Ingredient {
    /// A non-enzyme ingredient with zero inclusion
    pub fn new(
        id: i64,
        name: impl Into<String>,
        category: IngredientCategory,
        nutrients: NutrientProfile,
        price_per_ton: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            category,
            inclusion_pct: 0.0,
            nutrients,
            price_per_ton,
            standard_dosage_g_per_ton: None,
            matrix: None,
        }
    }

    /// An enzyme with zero intrinsic nutrients
    pub fn enzyme(
        id: i64,
        name: impl Into<String>,
        price_per_ton: f64,
        standard_dosage_g_per_ton: f64,
        matrix: BTreeMap<Nutrient, f64>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            category: IngredientCategory::Enzymes,
            inclusion_pct: 0.0,
            nutrients: NutrientProfile::zero(),
            price_per_ton,
            standard_dosage_g_per_ton: Some(standard_dosage_g_per_ton),
            matrix: Some(matrix),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_inclusion(mut self, inclusion_pct: f64) -> Self {
        self.inclusion_pct = inclusion_pct;
        self
    }

    pub fn is_enzyme(&self) -> bool {
        self.category == IngredientCategory::Enzymes
    }

    /// Matrix entries, empty for ingredients without one
    pub fn matrix_entries(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        self.matrix
            .iter()
            .flat_map(|m| m.iter().map(|(nutrient, amount)| (*nutrient, *amount)))
    }
}
