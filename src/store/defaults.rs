//! Built-in ingredient catalog
//!
//! Typical broiler feedstuffs with tabulated nutrient values, plus three
//! enzymes carrying nutrient matrices. All start at 0% inclusion.

use std::collections::BTreeMap;

use crate::models::IngredientCategory::{
    AminoAcids, Energy, Medicated, MineralSupplements, Other, Protein,
};
use crate::models::{Ingredient, IngredientCategory, Nutrient, NutrientProfile};

/// Nutrient values in `Nutrient::ALL` order
fn feedstuff(
    id: i64,
    name: &str,
    category: IngredientCategory,
    values: [f64; 22],
    price_per_ton: f64,
) -> Ingredient {
    Ingredient::new(id, name, category, NutrientProfile::from_values(values), price_per_ton)
}

fn enzyme(
    id: i64,
    name: &str,
    description: &str,
    price_per_ton: f64,
    standard_dosage_g_per_ton: f64,
    matrix: &[(Nutrient, f64)],
) -> Ingredient {
    let matrix: BTreeMap<Nutrient, f64> = matrix.iter().copied().collect();
    Ingredient::enzyme(id, name, price_per_ton, standard_dosage_g_per_ton, matrix)
        .with_description(description)
}

/// The default catalog, ordered by id
pub fn default_catalog() -> Vec<Ingredient> {
    use Nutrient::*;

    vec![
        feedstuff(
            1,
            "Corn",
            Energy,
            [
                8.5, 3350.0, 0.02, 0.05, 0.19, 0.02, 0.29, 0.05, 0.24, 0.34, 0.29, 0.4, 0.3, 1.0,
                0.4, 0.07, 62.0, 2.2, 9.5, 2.8, 1.3, 550.0,
            ],
            250.0,
        ),
        feedstuff(
            2,
            "Wheat",
            Energy,
            [
                11.5, 3150.0, 0.05, 0.08, 0.24, 0.02, 0.45, 0.07, 0.32, 0.4, 0.33, 0.48, 0.38, 0.75,
                0.55, 0.13, 60.0, 2.8, 11.5, 3.5, 1.8, 900.0,
            ],
            280.0,
        ),
        feedstuff(
            3,
            "Barley",
            Energy,
            [
                10.5, 2950.0, 0.06, 0.12, 0.23, 0.02, 0.5, 0.15, 0.35, 0.38, 0.34, 0.5, 0.37, 0.7,
                0.52, 0.13, 55.0, 5.5, 20.0, 6.0, 2.5, 1000.0,
            ],
            240.0,
        ),
        feedstuff(
            4,
            "Soybean Oil",
            Energy,
            [
                0.0, 8800.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            ],
            1200.0,
        ),
        feedstuff(
            5,
            "Soybean Meal 48%",
            Protein,
            [
                48.0, 2450.0, 0.35, 0.3, 0.42, 0.03, 2.0, 0.05, 2.95, 1.4, 1.9, 2.3, 2.2, 3.8, 3.5,
                0.65, 2.5, 3.5, 7.0, 5.0, 6.5, 2800.0,
            ],
            450.0,
        ),
        feedstuff(
            6,
            "Soybean Meal 44%",
            Protein,
            [
                44.0, 2240.0, 0.3, 0.25, 0.39, 0.03, 1.9, 0.05, 2.7, 1.3, 1.75, 2.1, 2.0, 3.5, 3.2,
                0.6, 3.0, 6.5, 12.0, 8.0, 6.0, 2700.0,
            ],
            420.0,
        ),
        feedstuff(
            7,
            "Canola Meal",
            Protein,
            [
                36.0, 2100.0, 0.6, 0.28, 0.5, 0.05, 1.2, 0.1, 1.9, 1.45, 1.5, 1.8, 1.5, 2.7, 2.2,
                0.45, 1.0, 12.0, 22.0, 16.0, 7.0, 6000.0,
            ],
            350.0,
        ),
        feedstuff(
            8,
            "Wheat Bran",
            Protein,
            [
                15.0, 1300.0, 0.12, 0.15, 0.85, 0.03, 1.2, 0.1, 0.6, 0.45, 0.48, 0.75, 0.55, 1.0,
                0.9, 0.2, 20.0, 10.0, 40.0, 12.0, 6.0, 1200.0,
            ],
            180.0,
        ),
        feedstuff(
            9,
            "L-Lysine HCl",
            AminoAcids,
            [
                94.4, 3970.0, 0.0, 0.0, 0.0, 0.0, 0.0, 19.3, 76.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.0,
            ],
            2000.0,
        ),
        feedstuff(
            10,
            "DL-Methionine",
            AminoAcids,
            [
                58.1, 5960.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 96.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.2, 0.0,
            ],
            3000.0,
        ),
        feedstuff(
            11,
            "L-Threonine",
            AminoAcids,
            [
                74.0, 3500.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 96.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.2, 0.0,
            ],
            2500.0,
        ),
        feedstuff(
            12,
            "L-Valine",
            AminoAcids,
            [
                80.0, 4000.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 96.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.2, 0.0,
            ],
            4500.0,
        ),
        feedstuff(
            13,
            "L-Isoleucine",
            AminoAcids,
            [
                75.0, 4200.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 96.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.2, 0.0,
            ],
            5500.0,
        ),
        feedstuff(
            14,
            "L-Tryptophan",
            AminoAcids,
            [
                85.0, 5200.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 99.0,
                0.0, 0.0, 0.0, 0.0, 0.2, 0.0,
            ],
            8000.0,
        ),
        feedstuff(
            15,
            "L-Arginine",
            AminoAcids,
            [
                82.0, 4700.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 96.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.2, 0.0,
            ],
            6000.0,
        ),
        feedstuff(
            16,
            "Limestone",
            MineralSupplements,
            [
                0.0, 0.0, 36.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 98.0, 0.0,
            ],
            50.0,
        ),
        feedstuff(
            17,
            "Dicalcium Phosphate",
            MineralSupplements,
            [
                0.0, 0.0, 22.0, 16.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 90.0, 0.0,
            ],
            700.0,
        ),
        feedstuff(
            18,
            "Salt (NaCl)",
            MineralSupplements,
            [
                0.0, 0.0, 0.0, 0.0, 0.0, 39.0, 0.0, 60.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 99.5, 0.0,
            ],
            80.0,
        ),
        feedstuff(
            19,
            "Sodium Bicarbonate",
            MineralSupplements,
            [
                0.0, 0.0, 0.0, 0.0, 0.0, 27.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 63.0, 0.0,
            ],
            300.0,
        ),
        feedstuff(
            20,
            "Choline Chloride 60%",
            Other,
            [
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 447000.0,
            ],
            1500.0,
        ),
        feedstuff(
            21,
            "Toxin Binder",
            Other,
            [
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
            2000.0,
        )
        .with_description("Bentonite-based mycotoxin binder"),
        feedstuff(
            22,
            "Mold Inhibitor",
            Other,
            [
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
            1800.0,
        )
        .with_description("Propionic acid-based mold inhibitor"),
        feedstuff(
            23,
            "Pomegranate Peel",
            Other,
            [
                4.0, 1500.0, 0.5, 0.05, 0.0, 0.01, 1.0, 0.05, 0.1, 0.05, 0.1, 0.15, 0.1, 0.2, 0.15,
                0.02, 5.0, 20.0, 45.0, 35.0, 5.0, 200.0,
            ],
            150.0,
        )
        .with_description("Source of fiber and antioxidants"),
        feedstuff(
            24,
            "Brewer's Yeast",
            Protein,
            [
                45.0, 2600.0, 0.1, 1.0, 0.1, 0.1, 2.0, 0.1, 3.5, 1.2, 2.5, 2.8, 2.2, 3.5, 2.4, 0.6,
                0.0, 2.0, 5.0, 3.0, 8.0, 4000.0,
            ],
            900.0,
        )
        .with_description("Source of protein and B-vitamins"),
        feedstuff(
            25,
            "Sodium Sulfate",
            MineralSupplements,
            [
                0.0, 0.0, 0.0, 0.0, 0.0, 32.4, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 56.6, 0.0,
            ],
            200.0,
        ),
        feedstuff(
            26,
            "Anticoccidial",
            Medicated,
            [
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
            10000.0,
        )
        .with_description("Medicated feed additive to control coccidiosis"),
        feedstuff(
            27,
            "Anti-inflammatory Additive",
            Other,
            [
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
            5000.0,
        )
        .with_description("Functional feed additive with anti-inflammatory properties"),
        feedstuff(
            28,
            "Monocalcium Phosphate",
            MineralSupplements,
            [
                0.0, 0.0, 16.0, 21.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 85.0, 0.0,
            ],
            800.0,
        ),
        feedstuff(
            29,
            "Pellet Binder",
            Other,
            [
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
            400.0,
        )
        .with_description("Lignosulfonate-based binder"),
        enzyme(
            30,
            "Phytase",
            "Releases phosphorus, calcium, energy, and amino acids from phytate.",
            15000.0,
            150.0,
            &[
                (AvailablePhosphorus, 0.09),
                (Calcium, 0.11),
                (MetabolizableEnergy, 75.0),
                (CrudeProtein, 0.311),
                (Lysine, 0.0128),
                (MethionineCystine, 0.008),
                (Threonine, 0.008),
            ],
        ),
        enzyme(
            31,
            "Fiber Enzyme",
            "Improves digestibility of fiber-rich ingredients, releasing energy and nutrients.",
            18000.0,
            150.0,
            &[
                (MetabolizableEnergy, 120.0),
                (CrudeProtein, 0.1),
                (Calcium, 0.005),
                (AvailablePhosphorus, 0.0025),
                (Lysine, 0.006),
                (MethionineCystine, 0.002),
                (Threonine, 0.002),
            ],
        ),
        enzyme(
            32,
            "Protease",
            "Enhances protein digestion, increasing the availability of amino acids.",
            12000.0,
            200.0,
            &[
                (CrudeProtein, 0.8),
                (Lysine, 0.049),
                (MethionineCystine, 0.023),
                (Threonine, 0.032),
                (Valine, 0.038),
                (Isoleucine, 0.036),
                (Arginine, 0.058),
                (Tryptophan, 0.01),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size_and_ids() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 32);
        let ids: HashSet<i64> = catalog.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), 32);
        assert!(catalog.iter().all(|i| i.inclusion_pct == 0.0));
        assert!(catalog.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_enzymes_carry_matrices_only() {
        let enzymes: Vec<_> = default_catalog().into_iter().filter(|i| i.is_enzyme()).collect();
        assert_eq!(enzymes.len(), 3);
        for enzyme in &enzymes {
            assert!(enzyme.nutrients.is_zero(), "{}", enzyme.name);
            assert!(enzyme.matrix.as_ref().is_some_and(|m| !m.is_empty()));
            assert!(enzyme.standard_dosage_g_per_ton.unwrap_or(0.0) > 0.0);
        }
        let phytase = enzymes.iter().find(|e| e.name == "Phytase").unwrap();
        assert_eq!(phytase.matrix.as_ref().unwrap()[&Nutrient::AvailablePhosphorus], 0.09);
    }

    #[test]
    fn test_corn_values() {
        let catalog = default_catalog();
        let corn = catalog.iter().find(|i| i.name == "Corn").unwrap();
        assert_eq!(corn.category, IngredientCategory::Energy);
        assert_eq!(corn.nutrients.cp_pct, 8.5);
        assert_eq!(corn.nutrients.me_kcal_per_kg, 3350.0);
        assert_eq!(corn.nutrients.choline_mg_per_kg, 550.0);
        assert_eq!(corn.price_per_ton, 250.0);
    }

    #[test]
    fn test_brewers_yeast() {
        let catalog = default_catalog();
        let yeast = catalog.iter().find(|i| i.id == 24).unwrap();
        assert_eq!(yeast.name, "Brewer's Yeast");
        assert_eq!(yeast.category, IngredientCategory::Protein);
        assert_eq!(yeast.nutrients.cp_pct, 45.0);
        assert_eq!(yeast.nutrients.avp_pct, 1.0);
        assert_eq!(
            yeast.description.as_deref(),
            Some("Source of protein and B-vitamins")
        );
    }
}
