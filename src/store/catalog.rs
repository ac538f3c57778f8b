//! In-memory ingredient catalog
//!
//! Holds the master ingredient list, including the inclusion of each
//! ingredient in the recipe being worked on.

use std::path::Path;

use crate::error::{FeedError, FeedResult};
use crate::models::{Ingredient, IngredientCategory};

use super::defaults::default_catalog;

#[derive(Debug, Clone)]
pub struct Catalog {
    ingredients: Vec<Ingredient>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(default_catalog())
    }
}

impl Catalog {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self { ingredients }
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    pub fn all(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn by_category(&self, category: IngredientCategory) -> Vec<&Ingredient> {
        self.ingredients
            .iter()
            .filter(|i| i.category == category)
            .collect()
    }

    pub fn get(&self, id: i64) -> FeedResult<&Ingredient> {
        self.ingredients
            .iter()
            .find(|i| i.id == id)
            .ok_or(FeedError::IngredientNotFound(id))
    }

    fn get_mut(&mut self, id: i64) -> FeedResult<&mut Ingredient> {
        self.ingredients
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(FeedError::IngredientNotFound(id))
    }

    /// Next free id: one above the current maximum
    pub fn next_id(&self) -> i64 {
        self.ingredients.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }

    /// Add an ingredient, assigning a fresh id when `id` is 0 or negative
    pub fn add(&mut self, mut ingredient: Ingredient) -> FeedResult<&Ingredient> {
        if ingredient.id <= 0 {
            ingredient.id = self.next_id();
        } else if self.get(ingredient.id).is_ok() {
            return Err(FeedError::DuplicateIngredient(ingredient.id));
        }
        validate(&ingredient)?;

        tracing::info!("Added ingredient {} ({})", ingredient.id, ingredient.name);
        self.ingredients.push(ingredient);
        let idx = self.ingredients.len() - 1;
        Ok(&self.ingredients[idx])
    }

    /// Replace an ingredient, keeping its id and current inclusion
    pub fn update(&mut self, id: i64, mut ingredient: Ingredient) -> FeedResult<&Ingredient> {
        validate(&ingredient)?;
        let existing = self.get_mut(id)?;
        ingredient.id = id;
        ingredient.inclusion_pct = existing.inclusion_pct;
        *existing = ingredient;
        tracing::info!("Updated ingredient {}", id);
        self.get(id)
    }

    pub fn remove(&mut self, id: i64) -> FeedResult<Ingredient> {
        let idx = self
            .ingredients
            .iter()
            .position(|i| i.id == id)
            .ok_or(FeedError::IngredientNotFound(id))?;
        tracing::info!("Deleted ingredient {}", id);
        Ok(self.ingredients.remove(idx))
    }

    pub fn set_inclusion(&mut self, id: i64, inclusion_pct: f64) -> FeedResult<&Ingredient> {
        if !inclusion_pct.is_finite() || inclusion_pct < 0.0 {
            return Err(FeedError::InvalidValue {
                field: "inclusion_pct",
                value: inclusion_pct,
            });
        }
        let ingredient = self.get_mut(id)?;
        ingredient.inclusion_pct = inclusion_pct;
        Ok(ingredient)
    }

    /// Reset every inclusion to 0
    pub fn clear_inclusions(&mut self) {
        for ingredient in &mut self.ingredients {
            ingredient.inclusion_pct = 0.0;
        }
    }

    /// Ingredients with a positive inclusion
    pub fn recipe(&self) -> Vec<Ingredient> {
        self.ingredients
            .iter()
            .filter(|i| i.inclusion_pct > 0.0)
            .cloned()
            .collect()
    }

    /// Write inclusions from a normalized recipe back into the catalog
    pub fn apply_inclusions(&mut self, recipe: &[Ingredient]) {
        for item in recipe {
            if let Ok(ingredient) = self.get_mut(item.id) {
                ingredient.inclusion_pct = item.inclusion_pct;
            }
        }
    }
}

fn validate(ingredient: &Ingredient) -> FeedResult<()> {
    if !ingredient.inclusion_pct.is_finite() || ingredient.inclusion_pct < 0.0 {
        return Err(FeedError::InvalidValue {
            field: "Inclusion_pct",
            value: ingredient.inclusion_pct,
        });
    }
    if !ingredient.price_per_ton.is_finite() || ingredient.price_per_ton < 0.0 {
        return Err(FeedError::InvalidValue {
            field: "Price_USD_per_ton",
            value: ingredient.price_per_ton,
        });
    }
    if let Some(dosage) = ingredient.standard_dosage_g_per_ton {
        if !dosage.is_finite() || dosage < 0.0 {
            return Err(FeedError::InvalidValue {
                field: "standard_dosage_g_per_ton",
                value: dosage,
            });
        }
    }
    Ok(())
}

/// Parse a catalog from a JSON array of ingredient records
pub fn parse_catalog(json: &str) -> FeedResult<Catalog> {
    let ingredients: Vec<Ingredient> = serde_json::from_str(json)?;
    let mut catalog = Catalog::new(Vec::with_capacity(ingredients.len()));
    for mut ingredient in ingredients {
        validate(&ingredient)?;
        if ingredient.id <= 0 {
            ingredient.id = catalog.next_id();
        } else if catalog.get(ingredient.id).is_ok() {
            return Err(FeedError::DuplicateIngredient(ingredient.id));
        }
        catalog.ingredients.push(ingredient);
    }
    Ok(catalog)
}

/// Load a catalog from a JSON file
pub fn load_catalog(path: &Path) -> FeedResult<Catalog> {
    let json = std::fs::read_to_string(path).map_err(|source| FeedError::CatalogIo {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog(&json)?;
    tracing::info!("Loaded {} ingredients from {:?}", catalog.len(), path);
    Ok(catalog)
}
