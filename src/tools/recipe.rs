//! Recipe MCP Tools
//!
//! The working recipe is the set of catalog ingredients with a positive
//! inclusion. Amounts are exchanged in the session's inclusion mode.

use serde::Serialize;

use crate::models::{Ingredient, Settings};
use crate::nutrition::{from_percent, inclusion, needs_normalization, normalize, to_percent};
use crate::store::Catalog;

/// Recipe line as displayed
#[derive(Debug, Serialize)]
pub struct RecipeLine {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub inclusion_pct: f64,
    /// Inclusion in the session's mode
    pub amount: f64,
    pub unit: &'static str,
}

impl RecipeLine {
    fn new(ingredient: &Ingredient, settings: &Settings) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            category: ingredient.category.as_str().to_string(),
            inclusion_pct: ingredient.inclusion_pct,
            amount: from_percent(ingredient.inclusion_pct, settings.inclusion_mode),
            unit: settings.inclusion_mode.unit_label(),
        }
    }
}

/// Response for get_recipe
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub lines: Vec<RecipeLine>,
    pub total_inclusion_pct: f64,
    pub total_amount: f64,
    pub unit: &'static str,
    pub needs_normalization: bool,
}

/// Response for normalize_recipe
#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub normalized: bool,
    pub previous_total_pct: f64,
    pub factor: f64,
    pub recipe: RecipeResponse,
}

pub fn get_recipe(catalog: &Catalog, settings: &Settings) -> RecipeResponse {
    let recipe = catalog.recipe();
    let total = inclusion::total_inclusion(&recipe);
    RecipeResponse {
        lines: recipe.iter().map(|i| RecipeLine::new(i, settings)).collect(),
        total_inclusion_pct: total,
        total_amount: from_percent(total, settings.inclusion_mode),
        unit: settings.inclusion_mode.unit_label(),
        needs_normalization: needs_normalization(total),
    }
}

/// Set the inclusion of one ingredient, given in the session's mode
pub fn set_inclusion(
    catalog: &mut Catalog,
    settings: &Settings,
    id: i64,
    amount: f64,
) -> Result<RecipeResponse, String> {
    let pct = to_percent(amount, settings.inclusion_mode);
    catalog
        .set_inclusion(id, pct)
        .map_err(|e| format!("Failed to set inclusion: {}", e))?;
    Ok(get_recipe(catalog, settings))
}

pub fn clear_recipe(catalog: &mut Catalog, settings: &Settings) -> RecipeResponse {
    catalog.clear_inclusions();
    get_recipe(catalog, settings)
}

/// Scale the recipe to 100%
pub fn normalize_recipe(catalog: &mut Catalog, settings: &Settings) -> NormalizeResponse {
    let recipe = catalog.recipe();
    let previous_total = inclusion::total_inclusion(&recipe);
    if previous_total <= 0.0 {
        return NormalizeResponse {
            normalized: false,
            previous_total_pct: previous_total,
            factor: 1.0,
            recipe: get_recipe(catalog, settings),
        };
    }

    catalog.apply_inclusions(&normalize(&recipe));
    NormalizeResponse {
        normalized: true,
        previous_total_pct: previous_total,
        factor: 100.0 / previous_total,
        recipe: get_recipe(catalog, settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InclusionMode;

    #[test]
    fn test_set_inclusion_in_kg_per_ton() {
        let mut catalog = Catalog::default();
        let mut settings = Settings::default();
        settings.inclusion_mode = InclusionMode::KgPerTon;

        let recipe = set_inclusion(&mut catalog, &settings, 1, 600.0).unwrap();
        assert_eq!(recipe.lines.len(), 1);
        assert!((recipe.lines[0].inclusion_pct - 60.0).abs() < 1e-9);
        assert!((recipe.lines[0].amount - 600.0).abs() < 1e-9);
        assert_eq!(recipe.unit, "kg/ton");
        assert!(recipe.needs_normalization);
    }

    #[test]
    fn test_set_inclusion_unknown_id() {
        let mut catalog = Catalog::default();
        assert!(set_inclusion(&mut catalog, &Settings::default(), 999, 10.0).is_err());
    }

    #[test]
    fn test_normalize_recipe() {
        let mut catalog = Catalog::default();
        let settings = Settings::default();
        set_inclusion(&mut catalog, &settings, 1, 30.0).unwrap();
        set_inclusion(&mut catalog, &settings, 5, 20.0).unwrap();

        let response = normalize_recipe(&mut catalog, &settings);
        assert!(response.normalized);
        assert!((response.factor - 2.0).abs() < 1e-12);
        assert!((response.recipe.total_inclusion_pct - 100.0).abs() < 1e-9);
        assert!(!response.recipe.needs_normalization);
    }

    #[test]
    fn test_normalize_empty_recipe() {
        let mut catalog = Catalog::default();
        let response = normalize_recipe(&mut catalog, &Settings::default());
        assert!(!response.normalized);
        assert!(response.recipe.lines.is_empty());
    }

    #[test]
    fn test_clear_recipe() {
        let mut catalog = Catalog::default();
        let settings = Settings::default();
        set_inclusion(&mut catalog, &settings, 1, 30.0).unwrap();
        let recipe = clear_recipe(&mut catalog, &settings);
        assert!(recipe.lines.is_empty());
        assert_eq!(recipe.total_inclusion_pct, 0.0);
    }
}
