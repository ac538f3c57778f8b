//! Catalog MCP Tools
//!
//! Tools for browsing and editing the ingredient catalog, enzymes included.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::{FeedError, FeedResult};
use crate::models::{Ingredient, IngredientCategory, Nutrient, NutrientProfile};
use crate::store::Catalog;

/// Ingredient fields as received from a client
#[derive(Debug, Clone, Default)]
pub struct IngredientInput {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_per_ton: f64,
    /// Intrinsic nutrient values keyed by field name (`CP_pct`, ...)
    pub nutrients: HashMap<String, f64>,
    pub standard_dosage_g_per_ton: Option<f64>,
    /// Enzyme matrix keyed by field name
    pub matrix: Option<HashMap<String, f64>>,
}

impl IngredientInput {
    /// Build an ingredient, rejecting unknown nutrient keys
    pub fn into_ingredient(self, id: i64) -> FeedResult<Ingredient> {
        let mut nutrients = NutrientProfile::zero();
        for (key, value) in &self.nutrients {
            let nutrient =
                Nutrient::from_key(key).ok_or_else(|| FeedError::UnknownNutrient(key.clone()))?;
            *nutrients.get_mut(nutrient) = *value;
        }

        let matrix = match self.matrix {
            Some(entries) => {
                let mut matrix = BTreeMap::new();
                for (key, value) in entries {
                    let nutrient =
                        Nutrient::from_key(&key).ok_or(FeedError::UnknownNutrient(key))?;
                    matrix.insert(nutrient, value);
                }
                Some(matrix)
            }
            None => None,
        };

        let category = self
            .category
            .as_deref()
            .map(IngredientCategory::from_str)
            .unwrap_or_default();
        let is_enzyme = category == IngredientCategory::Enzymes;

        Ok(Ingredient {
            id,
            name: self.name,
            description: self.description,
            category,
            inclusion_pct: 0.0,
            nutrients,
            price_per_ton: self.price_per_ton,
            standard_dosage_g_per_ton: if is_enzyme {
                self.standard_dosage_g_per_ton
            } else {
                None
            },
            matrix: if is_enzyme { matrix } else { None },
        })
    }
}

/// Ingredient summary for listing
#[derive(Debug, Serialize)]
pub struct IngredientSummary {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub category_display: String,
    pub inclusion_pct: f64,
    pub price_per_ton: f64,
    pub cp_pct: f64,
    pub me_kcal_per_kg: f64,
}

impl From<&Ingredient> for IngredientSummary {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            category: ingredient.category.as_str().to_string(),
            category_display: ingredient.category.display_name().to_string(),
            inclusion_pct: ingredient.inclusion_pct,
            price_per_ton: ingredient.price_per_ton,
            cp_pct: ingredient.nutrients.cp_pct,
            me_kcal_per_kg: ingredient.nutrients.me_kcal_per_kg,
        }
    }
}

/// Response for list_ingredients
#[derive(Debug, Serialize)]
pub struct ListIngredientsResponse {
    pub ingredients: Vec<IngredientSummary>,
    pub total: usize,
}

/// Response for delete_ingredient
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
    pub name: String,
}

/// List ingredients, optionally filtered by category
pub fn list_ingredients(
    catalog: &Catalog,
    category: Option<&str>,
) -> Result<ListIngredientsResponse, String> {
    let mut ingredients: Vec<IngredientSummary> = match category {
        Some(name) => catalog
            .by_category(IngredientCategory::from_str(name))
            .into_iter()
            .map(IngredientSummary::from)
            .collect(),
        None => catalog.all().iter().map(IngredientSummary::from).collect(),
    };
    ingredients.sort_by(|a, b| a.category.cmp(&b.category).then(a.name.cmp(&b.name)));

    let total = ingredients.len();
    Ok(ListIngredientsResponse { ingredients, total })
}

pub fn get_ingredient(catalog: &Catalog, id: i64) -> Result<Ingredient, String> {
    catalog.get(id).cloned().map_err(|e| e.to_string())
}

pub fn add_ingredient(catalog: &mut Catalog, input: IngredientInput) -> Result<Ingredient, String> {
    if input.name.trim().is_empty() {
        return Err("Ingredient name is required".to_string());
    }
    let ingredient = input
        .into_ingredient(0)
        .map_err(|e| format!("Invalid ingredient: {}", e))?;
    catalog
        .add(ingredient)
        .cloned()
        .map_err(|e| format!("Failed to add ingredient: {}", e))
}

pub fn update_ingredient(
    catalog: &mut Catalog,
    id: i64,
    input: IngredientInput,
) -> Result<Ingredient, String> {
    if input.name.trim().is_empty() {
        return Err("Ingredient name is required".to_string());
    }
    let ingredient = input
        .into_ingredient(id)
        .map_err(|e| format!("Invalid ingredient: {}", e))?;
    catalog
        .update(id, ingredient)
        .cloned()
        .map_err(|e| format!("Failed to update ingredient: {}", e))
}

pub fn delete_ingredient(catalog: &mut Catalog, id: i64) -> Result<DeleteResponse, String> {
    let removed = catalog
        .remove(id)
        .map_err(|e| format!("Failed to delete ingredient: {}", e))?;
    Ok(DeleteResponse {
        success: true,
        deleted_id: removed.id,
        name: removed.name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enzyme_input() -> IngredientInput {
        IngredientInput {
            name: "Xylanase".to_string(),
            category: Some("Enzymes".to_string()),
            price_per_ton: 9000.0,
            standard_dosage_g_per_ton: Some(100.0),
            matrix: Some(HashMap::from([("ME_kcal_per_kg".to_string(), 60.0)])),
            ..Default::default()
        }
    }

    #[test]
    fn test_list_filters_by_category() {
        let catalog = Catalog::default();
        let all = list_ingredients(&catalog, None).unwrap();
        assert_eq!(all.total, 32);
        let enzymes = list_ingredients(&catalog, Some("Enzymes")).unwrap();
        assert_eq!(enzymes.total, 3);
        assert_eq!(enzymes.ingredients[0].name, "Fiber Enzyme");
    }

    #[test]
    fn test_add_enzyme() {
        let mut catalog = Catalog::default();
        let added = add_ingredient(&mut catalog, enzyme_input()).unwrap();
        assert_eq!(added.id, 33);
        assert!(added.is_enzyme());
        assert_eq!(
            added.matrix.as_ref().unwrap()[&Nutrient::MetabolizableEnergy],
            60.0
        );
    }

    #[test]
    fn test_non_enzyme_drops_matrix() {
        let mut input = enzyme_input();
        input.category = Some("Protein".to_string());
        input.nutrients.insert("CP_pct".to_string(), 60.0);
        let ingredient = input.into_ingredient(50).unwrap();
        assert!(ingredient.matrix.is_none());
        assert!(ingredient.standard_dosage_g_per_ton.is_none());
        assert_eq!(ingredient.nutrients.cp_pct, 60.0);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let mut input = enzyme_input();
        input.matrix = Some(HashMap::from([("Zinc".to_string(), 1.0)]));
        assert!(matches!(
            input.into_ingredient(1),
            Err(FeedError::UnknownNutrient(_))
        ));

        let mut catalog = Catalog::default();
        let mut input = enzyme_input();
        input.nutrients.insert("Vitamin_Q".to_string(), 1.0);
        assert!(add_ingredient(&mut catalog, input).is_err());
    }

    #[test]
    fn test_update_and_delete() {
        let mut catalog = Catalog::default();
        let updated = update_ingredient(&mut catalog, 30, enzyme_input()).unwrap();
        assert_eq!(updated.id, 30);
        assert_eq!(updated.name, "Xylanase");

        let deleted = delete_ingredient(&mut catalog, 30).unwrap();
        assert!(deleted.success);
        assert!(get_ingredient(&catalog, 30).is_err());
        assert!(delete_ingredient(&mut catalog, 30).is_err());
    }
}
