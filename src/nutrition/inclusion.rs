//! Inclusion helpers
//!
//! Conversion between inclusion modes and normalization of a recipe to 100%.

use crate::models::{InclusionMode, Ingredient};

/// kg per ton for each percent of inclusion
pub const KG_PER_TON_PER_PCT: f64 = 10.0;

/// Totals further than this from 100% call for normalization
pub const NORMALIZATION_EPSILON: f64 = 0.01;

/// Convert an entered amount to percent
pub fn to_percent(value: f64, mode: InclusionMode) -> f64 {
    match mode {
        InclusionMode::Percent => value,
        InclusionMode::KgPerTon => value / KG_PER_TON_PER_PCT,
    }
}

/// Convert a percent to the amount shown in a mode
pub fn from_percent(pct: f64, mode: InclusionMode) -> f64 {
    match mode {
        InclusionMode::Percent => pct,
        InclusionMode::KgPerTon => pct * KG_PER_TON_PER_PCT,
    }
}

pub fn total_inclusion(ingredients: &[Ingredient]) -> f64 {
    ingredients.iter().map(|i| i.inclusion_pct).sum()
}

pub fn needs_normalization(total: f64) -> bool {
    (100.0 - total).abs() > NORMALIZATION_EPSILON && total > 0.0
}

/// Scale inclusions so they sum to 100%.
///
/// Returns an unchanged copy when the total is not positive.
pub fn normalize(ingredients: &[Ingredient]) -> Vec<Ingredient> {
    let total = total_inclusion(ingredients);
    if total <= 0.0 {
        return ingredients.to_vec();
    }
    let factor = 100.0 / total;
    tracing::debug!("Normalizing recipe total {} by factor {}", total, factor);
    ingredients
        .iter()
        .map(|i| {
            let mut scaled = i.clone();
            scaled.inclusion_pct = i.inclusion_pct * factor;
            scaled
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientCategory, NutrientProfile};

    fn item(id: i64, inclusion: f64) -> Ingredient {
        Ingredient::new(id, "Item", IngredientCategory::Energy, NutrientProfile::zero(), 0.0)
            .with_inclusion(inclusion)
    }

    #[test]
    fn test_mode_conversion() {
        assert!((to_percent(25.0, InclusionMode::KgPerTon) - 2.5).abs() < 1e-12);
        assert!((from_percent(2.5, InclusionMode::KgPerTon) - 25.0).abs() < 1e-12);
        assert_eq!(to_percent(2.5, InclusionMode::Percent), 2.5);
        assert_eq!(from_percent(2.5, InclusionMode::Percent), 2.5);
    }

    #[test]
    fn test_needs_normalization() {
        assert!(!needs_normalization(100.0));
        assert!(!needs_normalization(100.005));
        assert!(needs_normalization(99.5));
        assert!(needs_normalization(150.0));
        assert!(!needs_normalization(0.0));
    }

    #[test]
    fn test_normalize_scales_to_100() {
        let input = vec![item(1, 30.0), item(2, 20.0)];
        let normalized = normalize(&input);
        assert!((total_inclusion(&normalized) - 100.0).abs() < 1e-9);
        assert!((normalized[0].inclusion_pct - 60.0).abs() < 1e-9);
        assert!((normalized[1].inclusion_pct - 40.0).abs() < 1e-9);
        // input untouched
        assert_eq!(input[0].inclusion_pct, 30.0);
    }

    #[test]
    fn test_normalize_zero_total_is_unchanged() {
        let input = vec![item(1, 0.0), item(2, 0.0)];
        assert_eq!(normalize(&input), input);
        assert!(normalize(&[]).is_empty());
    }
}
