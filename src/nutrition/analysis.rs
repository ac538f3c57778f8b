//! Feed analysis engine
//!
//! Blends a recipe into a single nutrient profile. Base ingredients are
//! averaged by inclusion; enzymes add their matrix uplift on top, scaled by
//! how close the actual dosage is to the standard dosage.

use std::collections::BTreeMap;

use crate::models::{
    AnalysisResult, DerivedNutrient, EnzymeContribution, Ingredient, Nutrient, NutrientProfile,
};

/// Grams per ton for each percent of inclusion
pub const GRAMS_PER_TON_PER_PCT: f64 = 10_000.0;

/// Analyze a recipe.
///
/// Never fails and never mutates its input. Results are not rounded.
pub fn compute_analysis(ingredients: &[Ingredient]) -> AnalysisResult {
    let total_inclusion: f64 = ingredients.iter().map(|i| i.inclusion_pct).sum();

    if ingredients.is_empty() || total_inclusion <= 0.0 {
        tracing::debug!(
            "Degenerate recipe ({} ingredients, total inclusion {})",
            ingredients.len(),
            total_inclusion
        );
        return AnalysisResult {
            total_inclusion_pct: total_inclusion,
            total_cost_per_ton: 0.0,
            total_cost_per_100kg: 0.0,
            nutrients: nutrient_map(&NutrientProfile::zero()),
            ingredients: ingredients.to_vec(),
            enzyme_contributions: BTreeMap::new(),
        };
    }

    let (enzymes, base): (Vec<&Ingredient>, Vec<&Ingredient>) =
        ingredients.iter().partition(|i| i.is_enzyme());

    let base_inclusion: f64 = base.iter().map(|i| i.inclusion_pct).sum();
    let base_profile = if base_inclusion > 0.0 {
        base.iter()
            .map(|i| i.nutrients.scale(i.inclusion_pct))
            .sum::<NutrientProfile>()
            .scale(1.0 / base_inclusion)
    } else {
        NutrientProfile::zero()
    };

    let (uplift, enzyme_contributions) = enzyme_uplift(&enzymes);

    let non_enzyme_ratio = base_inclusion / total_inclusion;
    let blended = base_profile.scale(non_enzyme_ratio) + uplift;

    let total_cost: f64 = ingredients
        .iter()
        .map(|i| i.inclusion_pct * i.price_per_ton)
        .sum();
    let total_cost_per_ton = total_cost / total_inclusion;

    AnalysisResult {
        total_inclusion_pct: total_inclusion,
        total_cost_per_ton,
        total_cost_per_100kg: total_cost_per_ton / 10.0,
        nutrients: nutrient_map(&blended),
        ingredients: ingredients.to_vec(),
        enzyme_contributions,
    }
}

/// Dosage ratio of an enzyme relative to its standard dosage, capped at 1.
///
/// `None` when the enzyme has no usable matrix, dosage or inclusion.
pub fn dosage_ratio(enzyme: &Ingredient) -> Option<f64> {
    let standard = enzyme.standard_dosage_g_per_ton.unwrap_or(0.0);
    let has_matrix = enzyme.matrix.as_ref().is_some_and(|m| !m.is_empty());
    if !has_matrix || standard <= 0.0 || enzyme.inclusion_pct <= 0.0 {
        return None;
    }
    let actual = enzyme.inclusion_pct * GRAMS_PER_TON_PER_PCT;
    Some((actual / standard).min(1.0))
}

fn enzyme_uplift(
    enzymes: &[&Ingredient],
) -> (NutrientProfile, BTreeMap<i64, EnzymeContribution>) {
    let mut uplift = NutrientProfile::zero();
    let mut contributions = BTreeMap::new();

    for enzyme in enzymes {
        let Some(ratio) = dosage_ratio(enzyme) else {
            tracing::debug!("Skipping enzyme {} ({}): inactive", enzyme.id, enzyme.name);
            continue;
        };

        let mut released = BTreeMap::new();
        for (nutrient, amount) in enzyme.matrix_entries() {
            let delta = amount * ratio;
            *uplift.get_mut(nutrient) += delta;
            if delta != 0.0 {
                released.insert(nutrient, delta);
            }
        }

        if !released.is_empty() {
            contributions.insert(
                enzyme.id,
                EnzymeContribution {
                    name: enzyme.name.clone(),
                    contributions: released,
                },
            );
        }
    }

    (uplift, contributions)
}

fn nutrient_map(profile: &NutrientProfile) -> BTreeMap<String, f64> {
    let mut map: BTreeMap<String, f64> = Nutrient::ALL
        .iter()
        .map(|n| (n.key().to_string(), profile.get(*n)))
        .collect();
    for derived in DerivedNutrient::ALL {
        map.insert(derived.key().to_string(), derived.compute(profile));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientCategory;

    fn feed(id: i64, inclusion: f64, cp: f64, me: f64, price: f64) -> Ingredient {
        let mut nutrients = NutrientProfile::zero();
        nutrients.cp_pct = cp;
        nutrients.me_kcal_per_kg = me;
        Ingredient::new(id, format!("Feed {}", id), IngredientCategory::Energy, nutrients, price)
            .with_inclusion(inclusion)
    }

    fn protease(inclusion: f64) -> Ingredient {
        let mut matrix = BTreeMap::new();
        matrix.insert(Nutrient::CrudeProtein, 0.3);
        Ingredient::enzyme(99, "Protease", 12000.0, 150.0, matrix).with_inclusion(inclusion)
    }

    #[test]
    fn test_single_ingredient() {
        let result = compute_analysis(&[feed(1, 100.0, 20.0, 3000.0, 300.0)]);
        assert!((result.nutrient(Nutrient::CrudeProtein) - 20.0).abs() < 1e-9);
        assert!((result.nutrient(Nutrient::MetabolizableEnergy) - 3000.0).abs() < 1e-9);
        assert!((result.total_cost_per_ton - 300.0).abs() < 1e-9);
        assert!((result.total_cost_per_100kg - 30.0).abs() < 1e-9);
        assert!((result.nutrients["MECP_Ratio"] - 150.0).abs() < 1e-9);
        assert!(result.enzyme_contributions.is_empty());
    }

    #[test]
    fn test_two_ingredient_blend() {
        let result = compute_analysis(&[
            feed(1, 60.0, 10.0, 0.0, 200.0),
            feed(2, 40.0, 25.0, 0.0, 500.0),
        ]);
        assert!((result.nutrient(Nutrient::CrudeProtein) - 16.0).abs() < 1e-9);
        assert!((result.total_inclusion_pct - 100.0).abs() < 1e-9);
        assert!((result.total_cost_per_ton - 320.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_is_weighted_by_actual_total() {
        // 30/20 behaves like 60/40
        let result = compute_analysis(&[
            feed(1, 30.0, 10.0, 0.0, 0.0),
            feed(2, 20.0, 25.0, 0.0, 0.0),
        ]);
        assert!((result.total_inclusion_pct - 50.0).abs() < 1e-9);
        assert!((result.nutrient(Nutrient::CrudeProtein) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_enzyme_at_standard_dosage() {
        let result = compute_analysis(&[feed(1, 98.85, 20.0, 0.0, 0.0), protease(0.015)]);
        let ratio = 98.85 / 98.865;
        let expected = 20.0 * ratio + 0.3;
        assert!((result.nutrient(Nutrient::CrudeProtein) - expected).abs() < 1e-9);
        assert!((result.nutrient(Nutrient::CrudeProtein) - 20.297).abs() < 1e-3);

        let contribution = &result.enzyme_contributions[&99];
        assert_eq!(contribution.name, "Protease");
        assert!((contribution.contributions[&Nutrient::CrudeProtein] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_enzyme_underdosed() {
        let result = compute_analysis(&[feed(1, 98.85, 20.0, 0.0, 0.0), protease(0.0075)]);
        let contribution = &result.enzyme_contributions[&99];
        assert!((contribution.contributions[&Nutrient::CrudeProtein] - 0.15).abs() < 1e-9);

        let expected = 20.0 * (98.85 / 98.8575) + 0.15;
        assert!((result.nutrient(Nutrient::CrudeProtein) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_enzyme_overdose_is_capped() {
        assert_eq!(dosage_ratio(&protease(0.03)), Some(1.0));
        let result = compute_analysis(&[feed(1, 98.85, 20.0, 0.0, 0.0), protease(0.03)]);
        let contribution = &result.enzyme_contributions[&99];
        assert!((contribution.contributions[&Nutrient::CrudeProtein] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_inactive_enzymes_contribute_nothing() {
        let mut no_dosage = protease(0.015);
        no_dosage.standard_dosage_g_per_ton = Some(0.0);
        let mut no_matrix = protease(0.015);
        no_matrix.id = 100;
        no_matrix.matrix = Some(BTreeMap::new());

        assert_eq!(dosage_ratio(&protease(0.0)), None);
        assert_eq!(dosage_ratio(&no_dosage), None);
        assert_eq!(dosage_ratio(&no_matrix), None);

        let result = compute_analysis(&[feed(1, 100.0, 20.0, 0.0, 0.0), no_dosage, no_matrix]);
        assert!(result.enzyme_contributions.is_empty());
        // inactive enzymes still dilute by inclusion
        let expected = 20.0 * 100.0 / 100.03;
        assert!((result.nutrient(Nutrient::CrudeProtein) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_enzyme_cost_counts() {
        let result = compute_analysis(&[feed(1, 99.985, 0.0, 0.0, 300.0), protease(0.015)]);
        let expected = (99.985 * 300.0 + 0.015 * 12000.0) / 100.0;
        assert!((result.total_cost_per_ton - expected).abs() < 1e-9);
    }

    #[test]
    fn test_empty_recipe() {
        let result = compute_analysis(&[]);
        assert_eq!(result.total_inclusion_pct, 0.0);
        assert_eq!(result.total_cost_per_ton, 0.0);
        assert_eq!(result.nutrients.len(), 26);
        assert!(result.nutrients.values().all(|v| *v == 0.0));
        assert!(result.ingredients.is_empty());
    }

    #[test]
    fn test_zero_inclusion_recipe() {
        let input = vec![feed(1, 0.0, 20.0, 3000.0, 300.0)];
        let result = compute_analysis(&input);
        assert_eq!(result.total_inclusion_pct, 0.0);
        assert!(result.nutrients.values().all(|v| *v == 0.0));
        assert_eq!(result.ingredients, input);
    }

    #[test]
    fn test_enzyme_only_recipe() {
        let result = compute_analysis(&[protease(0.015)]);
        assert!((result.nutrient(Nutrient::CrudeProtein) - 0.3).abs() < 1e-9);
        assert!((result.total_cost_per_ton - 12000.0).abs() < 1e-9);
    }

    #[test]
    fn test_analysis_is_pure() {
        let input = vec![feed(1, 98.85, 20.0, 2900.0, 300.0), protease(0.0075)];
        let snapshot = input.clone();
        let first = compute_analysis(&input);
        let second = compute_analysis(&input);
        assert_eq!(input, snapshot);
        assert_eq!(first, second);
        for (key, value) in &first.nutrients {
            assert_eq!(value.to_bits(), second.nutrients[key].to_bits());
        }
    }

    #[test]
    fn test_ratio_guards() {
        let result = compute_analysis(&[feed(1, 100.0, 0.0, 3000.0, 0.0)]);
        assert_eq!(result.nutrients["MECP_Ratio"], 0.0);
        assert_eq!(result.nutrients["CaAvP_Ratio"], 0.0);
        assert_eq!(result.nutrients["K_Cl_Na_Ratio"], 0.0);
        assert!(result.nutrients.values().all(|v| v.is_finite()));
    }
}
