//! Analysis MCP Tools
//!
//! Runs the engine and shapes its output for display: values converted to
//! the session's units, hidden keys dropped, comparison against the growth
//! phase recommendations, and per-enzyme contributions.

use serde::Serialize;

use crate::models::{AnalysisResult, GrowthPhase, Ingredient, Settings};
use crate::nutrition::{
    self, compare_analysis, compute_analysis, convert, effective_profile, needs_normalization,
    to_percent, units, ComparisonRow, RecommendationStatus, Severity,
};
use crate::store::{parse_catalog, Catalog};

/// One displayed value
#[derive(Debug, Serialize)]
pub struct DisplayValue {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub unit: String,
    pub base_value: f64,
    pub base_unit: &'static str,
}

/// Comparison row with values in display units
#[derive(Debug, Serialize)]
pub struct ComparisonLine {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub min: f64,
    pub max: Option<f64>,
    pub deviation: f64,
    pub unit: String,
    pub overridden: bool,
    pub status: RecommendationStatus,
    pub status_label: &'static str,
    pub severity: Severity,
}

impl ComparisonLine {
    fn new(row: ComparisonRow, settings: &Settings) -> Self {
        let unit = settings.unit_for(&row.key);
        let value = convert(row.value, &row.key, &unit);
        Self {
            value: value.value,
            min: convert(row.range.min, &row.key, &unit).value,
            max: row.range.max.map(|max| convert(max, &row.key, &unit).value),
            deviation: convert(row.deviation, &row.key, &unit).value,
            unit: value.unit,
            overridden: row.overridden,
            status: row.status,
            status_label: row.status_label,
            severity: row.severity,
            label: row.label,
            key: row.key,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContributionLine {
    pub key: &'static str,
    pub label: &'static str,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct EnzymeSummary {
    pub id: i64,
    pub name: String,
    pub dosage_ratio: Option<f64>,
    pub contributions: Vec<ContributionLine>,
}

/// Response for analyze_recipe and analyze_ingredients
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub growth_phase: GrowthPhase,
    pub ingredient_count: usize,
    pub total_inclusion_pct: f64,
    pub needs_normalization: bool,
    pub warning: Option<String>,
    pub values: Vec<DisplayValue>,
    pub comparison: Vec<ComparisonLine>,
    pub enzymes: Vec<EnzymeSummary>,
    pub issues: usize,
}

/// Analyze the catalog's working recipe
pub fn analyze_recipe(catalog: &Catalog, settings: &Settings) -> AnalysisResponse {
    analyze_ingredients(&catalog.recipe(), settings)
}

/// Analyze an explicit ingredient list
pub fn analyze_ingredients(ingredients: &[Ingredient], settings: &Settings) -> AnalysisResponse {
    let result = compute_analysis(ingredients);
    build_response(&result, settings)
}

/// A catalog ingredient at an amount given in the session's inclusion mode
#[derive(Debug, Clone, Copy)]
pub struct InclusionItem {
    pub id: i64,
    pub amount: f64,
}

/// Analyze catalog ingredients at explicit amounts, plus any extra ingredient
/// records given as a JSON array. The working recipe is left untouched.
///
/// Extra records are renumbered from the catalog's next free id so that
/// enzyme contributions never collide with catalog ingredients.
pub fn analyze_selection(
    catalog: &Catalog,
    settings: &Settings,
    items: &[InclusionItem],
    ingredients_json: Option<&str>,
) -> Result<AnalysisResponse, String> {
    let mut ingredients = Vec::with_capacity(items.len());
    for item in items {
        if !item.amount.is_finite() || item.amount < 0.0 {
            return Err(format!(
                "Invalid amount {} for ingredient {}",
                item.amount, item.id
            ));
        }
        if ingredients.iter().any(|i: &Ingredient| i.id == item.id) {
            return Err(format!("Ingredient {} is listed more than once", item.id));
        }
        let ingredient = catalog.get(item.id).map_err(|e| e.to_string())?;
        ingredients.push(
            ingredient
                .clone()
                .with_inclusion(to_percent(item.amount, settings.inclusion_mode)),
        );
    }

    if let Some(json) = ingredients_json {
        let extra = parse_catalog(json).map_err(|e| format!("Invalid ingredient list: {}", e))?;
        let first_id = catalog.next_id();
        ingredients.extend(extra.all().iter().zip(first_id..).map(|(ingredient, id)| {
            let mut ingredient = ingredient.clone();
            ingredient.id = id;
            ingredient
        }));
    }

    Ok(analyze_ingredients(&ingredients, settings))
}

fn build_response(result: &AnalysisResult, settings: &Settings) -> AnalysisResponse {
    let total = result.total_inclusion_pct;
    let needs_normalization = needs_normalization(total);
    let warning = if result.ingredients.is_empty() {
        Some("Recipe is empty. Set ingredient inclusions before analyzing.".to_string())
    } else if total <= 0.0 {
        Some("Total inclusion is zero; all values are reported as 0.".to_string())
    } else if needs_normalization {
        Some(format!(
            "Total inclusion is {:.3}%, not 100%. Values are averaged over the actual total; run normalize_recipe to scale inclusions.",
            total
        ))
    } else {
        None
    };

    let values: Vec<DisplayValue> = units::DISPLAY_KEYS
        .iter()
        .filter(|(key, _)| settings.is_visible(key))
        .filter_map(|(key, label)| {
            let base_value = result.value_for_key(key)?;
            let converted = convert(base_value, key, &settings.unit_for(key));
            Some(DisplayValue {
                key: key.to_string(),
                label: label.to_string(),
                value: converted.value,
                unit: converted.unit,
                base_value,
                base_unit: units::base_unit(key),
            })
        })
        .collect();

    let comparison: Vec<ComparisonLine> = compare_analysis(
        result,
        settings.growth_phase,
        &settings.recommendation_overrides,
    )
    .into_iter()
    .filter(|row| settings.is_visible(&row.key))
    .map(|row| ComparisonLine::new(row, settings))
    .collect();

    let issues = comparison
        .iter()
        .filter(|line| line.severity != Severity::Ok)
        .count();

    let enzymes = result
        .enzyme_contributions
        .iter()
        .map(|(id, contribution)| EnzymeSummary {
            id: *id,
            name: contribution.name.clone(),
            dosage_ratio: result
                .ingredients
                .iter()
                .find(|i| i.id == *id)
                .and_then(nutrition::dosage_ratio),
            contributions: contribution
                .contributions
                .iter()
                .map(|(nutrient, amount)| ContributionLine {
                    key: nutrient.key(),
                    label: nutrient.label(),
                    amount: *amount,
                })
                .collect(),
        })
        .collect();

    AnalysisResponse {
        growth_phase: settings.growth_phase,
        ingredient_count: result.ingredients.len(),
        total_inclusion_pct: total,
        needs_normalization,
        warning,
        values,
        comparison,
        enzymes,
        issues,
    }
}

/// Response for convert_nutrient
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub key: String,
    pub value: f64,
    pub unit: String,
    pub base_unit: &'static str,
    pub available_units: Vec<&'static str>,
}

pub fn convert_nutrient(value: f64, key: &str, unit: &str) -> Result<ConvertResponse, String> {
    if units::unit_definition(key).is_none() {
        return Err(format!("No units defined for '{}'", key));
    }
    let converted = convert(value, key, unit);
    Ok(ConvertResponse {
        key: key.to_string(),
        value: converted.value,
        unit: converted.unit,
        base_unit: units::base_unit(key),
        available_units: units::available_units(key),
    })
}

#[derive(Debug, Serialize)]
pub struct RangeEntry {
    pub key: String,
    pub label: String,
    pub min: f64,
    pub max: Option<f64>,
    pub unit: String,
    pub overridden: bool,
}

/// Response for get_recommendations
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub growth_phase: GrowthPhase,
    pub ranges: Vec<RangeEntry>,
}

/// Recommended ranges for a phase (the session's phase when `phase` is None)
pub fn get_recommendations(
    settings: &Settings,
    phase: Option<&str>,
) -> Result<RecommendationsResponse, String> {
    let growth_phase = match phase {
        Some(name) => GrowthPhase::parse(name).map_err(|e| e.to_string())?,
        None => settings.growth_phase,
    };

    let mut ranges: Vec<RangeEntry> =
        effective_profile(growth_phase, &settings.recommendation_overrides)
            .into_iter()
            .map(|(key, range)| RangeEntry {
                label: units::label(&key).unwrap_or(key.as_str()).to_string(),
                overridden: settings.recommendation_overrides.contains_key(&key),
                min: range.min,
                max: range.max,
                unit: range.unit,
                key,
            })
            .collect();
    ranges.sort_by_key(|entry| {
        units::DISPLAY_KEYS
            .iter()
            .position(|(k, _)| *k == entry.key)
            .unwrap_or(usize::MAX)
    });

    Ok(RecommendationsResponse {
        growth_phase,
        ranges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InclusionMode, RangeOverride};
    use crate::tools::recipe::set_inclusion;

    fn starter_recipe() -> Catalog {
        let mut catalog = Catalog::default();
        let settings = Settings::default();
        // Corn, soybean meal, soybean oil, phytase at standard dosage
        set_inclusion(&mut catalog, &settings, 1, 58.0).unwrap();
        set_inclusion(&mut catalog, &settings, 5, 37.0).unwrap();
        set_inclusion(&mut catalog, &settings, 4, 4.985).unwrap();
        set_inclusion(&mut catalog, &settings, 30, 0.015).unwrap();
        catalog
    }

    #[test]
    fn test_analyze_recipe() {
        let catalog = starter_recipe();
        let response = analyze_recipe(&catalog, &Settings::default());

        assert_eq!(response.ingredient_count, 4);
        assert!((response.total_inclusion_pct - 100.0).abs() < 1e-9);
        assert!(!response.needs_normalization);
        assert!(response.warning.is_none());
        assert_eq!(response.values.len(), units::DISPLAY_KEYS.len());
        assert_eq!(response.comparison.len(), 14);

        assert_eq!(response.enzymes.len(), 1);
        let phytase = &response.enzymes[0];
        assert_eq!(phytase.name, "Phytase");
        assert!((phytase.dosage_ratio.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(phytase.contributions.len(), 7);
    }

    #[test]
    fn test_display_units_and_visibility() {
        let catalog = starter_recipe();
        let mut settings = Settings::default();
        settings
            .nutrient_units
            .insert("nutrients.CP_pct".to_string(), "g/kg".to_string());
        settings
            .nutrient_visibility
            .insert("nutrients.Starch_pct".to_string(), false);

        let response = analyze_recipe(&catalog, &settings);
        let cp = response
            .values
            .iter()
            .find(|v| v.key == "nutrients.CP_pct")
            .unwrap();
        assert_eq!(cp.unit, "g/kg");
        assert!((cp.value - cp.base_value * 10.0).abs() < 1e-9);
        assert!(response.values.iter().all(|v| v.key != "nutrients.Starch_pct"));

        let cp_row = response
            .comparison
            .iter()
            .find(|r| r.key == "nutrients.CP_pct")
            .unwrap();
        assert!((cp_row.min - 225.0).abs() < 1e-9);
    }

    #[test]
    fn test_unbalanced_recipe_warns() {
        let mut catalog = Catalog::default();
        let mut settings = Settings::default();
        settings.inclusion_mode = InclusionMode::KgPerTon;
        set_inclusion(&mut catalog, &settings, 1, 500.0).unwrap();

        let response = analyze_recipe(&catalog, &settings);
        assert!(response.needs_normalization);
        assert!(response.warning.unwrap().contains("50.000%"));
    }

    #[test]
    fn test_empty_recipe_warns() {
        let response = analyze_recipe(&Catalog::default(), &Settings::default());
        assert_eq!(response.ingredient_count, 0);
        assert!(response.warning.is_some());
        assert!(response.enzymes.is_empty());
    }

    #[test]
    fn test_analyze_selection_leaves_recipe_alone() {
        let catalog = Catalog::default();
        let items = [
            InclusionItem { id: 1, amount: 60.0 },
            InclusionItem { id: 5, amount: 40.0 },
        ];
        let extra = r#"[{"Name": "Salt", "category": "MineralSupplements",
            "Na_pct": 39.0, "Cl_pct": 60.0, "Inclusion_pct": 0.3}]"#;
        let response = analyze_selection(&catalog, &Settings::default(), &items, Some(extra)).unwrap();
        assert_eq!(response.ingredient_count, 3);
        assert!((response.total_inclusion_pct - 100.3).abs() < 1e-9);
        assert!(catalog.recipe().is_empty());

        let missing = [InclusionItem { id: 999, amount: 1.0 }];
        assert!(analyze_selection(&catalog, &Settings::default(), &missing, None).is_err());
        let negative = [InclusionItem { id: 1, amount: -1.0 }];
        assert!(analyze_selection(&catalog, &Settings::default(), &negative, None).is_err());
        assert!(analyze_selection(&catalog, &Settings::default(), &[], Some("[")).is_err());
    }

    #[test]
    fn test_analyze_selection_keeps_enzymes_apart() {
        let catalog = Catalog::default();
        // Fiber Enzyme from the catalog at its standard dosage
        let items = [InclusionItem { id: 31, amount: 0.015 }];
        // A custom enzyme reusing id 31, at half its standard dosage
        let extra = r#"[{"id": 31, "Name": "Custom Phytase", "category": "Enzymes",
            "Inclusion_pct": 0.0075, "standard_dosage_g_per_ton": 150,
            "matrix": {"avP_pct": 0.1}}]"#;
        let response =
            analyze_selection(&catalog, &Settings::default(), &items, Some(extra)).unwrap();

        assert_eq!(response.ingredient_count, 2);
        assert_eq!(response.enzymes.len(), 2);
        let fiber = response.enzymes.iter().find(|e| e.id == 31).unwrap();
        assert_eq!(fiber.name, "Fiber Enzyme");
        assert!((fiber.dosage_ratio.unwrap() - 1.0).abs() < 1e-9);
        let custom = response
            .enzymes
            .iter()
            .find(|e| e.name == "Custom Phytase")
            .unwrap();
        assert_eq!(custom.id, catalog.next_id());
        assert!((custom.dosage_ratio.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_selection_rejects_repeated_items() {
        let catalog = Catalog::default();
        let items = [
            InclusionItem { id: 1, amount: 50.0 },
            InclusionItem { id: 1, amount: 50.0 },
        ];
        assert!(analyze_selection(&catalog, &Settings::default(), &items, None).is_err());
    }

    #[test]
    fn test_convert_nutrient() {
        let response = convert_nutrient(3000.0, "nutrients.ME_kcal_per_kg", "MJ/kg").unwrap();
        assert!((response.value - 12.5520).abs() < 1e-3);
        assert_eq!(response.available_units, vec!["kcal/kg", "MJ/kg"]);
        assert!(convert_nutrient(1.0, "nutrients.Zinc", "%").is_err());
    }

    #[test]
    fn test_get_recommendations_with_override() {
        let mut settings = Settings::default();
        settings.recommendation_overrides.insert(
            "nutrients.CP_pct".to_string(),
            RangeOverride {
                min: 21.0,
                max: Some(22.0),
            },
        );
        let response = get_recommendations(&settings, None).unwrap();
        assert_eq!(response.growth_phase, GrowthPhase::Starter);
        let cp = response
            .ranges
            .iter()
            .find(|r| r.key == "nutrients.CP_pct")
            .unwrap();
        assert!(cp.overridden);
        assert_eq!(cp.min, 21.0);

        let grower = get_recommendations(&settings, Some("grower")).unwrap();
        assert_eq!(grower.growth_phase, GrowthPhase::Grower);
        assert!(get_recommendations(&settings, Some("layer")).is_err());
    }
}
