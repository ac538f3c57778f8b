//! Ross 308 recommendations and status classification

use serde::{Deserialize, Serialize};

use crate::models::{
    AnalysisResult, GrowthPhase, RecommendationOverrides, RecommendationProfile,
    RecommendationRange,
};

use super::units;

/// Relative band around a range that counts as borderline
pub const TOLERANCE: f64 = 0.05;

/// Built-in Ross 308 broiler profile for a growth phase
pub fn ross308_recommendations(phase: GrowthPhase) -> RecommendationProfile {
    // (ME, CP, Lys, TSAA, Arg, Thr, Val, Ile, Ca, avP, Na, Ash) as (min, max), then choline minimum
    let (bounded, choline): ([(f64, f64); 12], f64) = match phase {
        GrowthPhase::Starter => (
            [
                (2925.0, 3025.0),
                (22.5, 23.5),
                (1.32, 1.34),
                (1.00, 1.02),
                (1.40, 1.42),
                (0.88, 0.90),
                (1.00, 1.02),
                (0.88, 0.90),
                (0.93, 0.97),
                (0.48, 0.52),
                (0.18, 0.23),
                (5.0, 6.5),
            ],
            1700.0,
        ),
        GrowthPhase::Grower => (
            [
                (3000.0, 3100.0),
                (21.0, 22.0),
                (1.18, 1.20),
                (0.92, 0.94),
                (1.27, 1.29),
                (0.79, 0.81),
                (0.91, 0.93),
                (0.80, 0.82),
                (0.83, 0.87),
                (0.43, 0.47),
                (0.17, 0.22),
                (4.8, 6.0),
            ],
            1500.0,
        ),
        GrowthPhase::Finisher1 => (
            [
                (3050.0, 3150.0),
                (19.5, 20.5),
                (1.08, 1.10),
                (0.84, 0.86),
                (1.16, 1.18),
                (0.72, 0.74),
                (0.84, 0.86),
                (0.74, 0.76),
                (0.78, 0.82),
                (0.40, 0.44),
                (0.16, 0.21),
                (4.5, 5.5),
            ],
            1300.0,
        ),
        GrowthPhase::Finisher2 => (
            [
                (3100.0, 3200.0),
                (18.5, 19.5),
                (0.98, 1.00),
                (0.76, 0.78),
                (1.06, 1.08),
                (0.65, 0.67),
                (0.77, 0.79),
                (0.68, 0.70),
                (0.73, 0.77),
                (0.38, 0.42),
                (0.15, 0.20),
                (4.2, 5.2),
            ],
            1200.0,
        ),
    };

    const BOUNDED_KEYS: [(&str, &str); 12] = [
        ("nutrients.ME_kcal_per_kg", "kcal/kg"),
        ("nutrients.CP_pct", "%"),
        ("nutrients.Lys_pct", "%"),
        ("nutrients.TSAA_pct", "%"),
        ("nutrients.Arg_pct", "%"),
        ("nutrients.Thr_pct", "%"),
        ("nutrients.Val_pct", "%"),
        ("nutrients.Ile_pct", "%"),
        ("nutrients.Ca_pct", "%"),
        ("nutrients.avP_pct", "%"),
        ("nutrients.Na_pct", "%"),
        ("nutrients.Ash_pct", "%"),
    ];

    let mut profile: RecommendationProfile = BOUNDED_KEYS
        .iter()
        .zip(bounded)
        .map(|((key, unit), (min, max))| {
            (key.to_string(), RecommendationRange::bounded(min, max, unit))
        })
        .collect();
    profile.insert(
        "nutrients.Choline_mg_per_kg".to_string(),
        RecommendationRange::minimum(choline, "mg/kg"),
    );
    profile.insert(
        "nutrients.CaAvP_Ratio".to_string(),
        RecommendationRange::bounded(1.8, 2.0, ""),
    );
    profile
}

/// Built-in range with any user override applied.
///
/// Overrides replace min and max; the unit always comes from the built-in range.
pub fn effective_range(
    phase: GrowthPhase,
    key: &str,
    overrides: &RecommendationOverrides,
) -> Option<RecommendationRange> {
    let base = ross308_recommendations(phase).remove(key)?;
    Some(apply_override(key, base, overrides))
}

/// Full profile for a phase with overrides applied
pub fn effective_profile(
    phase: GrowthPhase,
    overrides: &RecommendationOverrides,
) -> RecommendationProfile {
    ross308_recommendations(phase)
        .into_iter()
        .map(|(key, range)| {
            let range = apply_override(&key, range, overrides);
            (key, range)
        })
        .collect()
}

fn apply_override(
    key: &str,
    base: RecommendationRange,
    overrides: &RecommendationOverrides,
) -> RecommendationRange {
    match overrides.get(key) {
        Some(o) => RecommendationRange {
            min: o.min,
            max: o.max,
            unit: base.unit,
        },
        None => base,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    InRange,
    Borderline,
    OutOfRange,
    MeetsMinimum,
    SlightlyLow,
    BelowMinimum,
}

impl RecommendationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationStatus::InRange => "In Range",
            RecommendationStatus::Borderline => "Borderline",
            RecommendationStatus::OutOfRange => "Out of Range",
            RecommendationStatus::MeetsMinimum => "Meets Minimum",
            RecommendationStatus::SlightlyLow => "Slightly Low",
            RecommendationStatus::BelowMinimum => "Below Minimum",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RecommendationStatus::InRange | RecommendationStatus::MeetsMinimum => Severity::Ok,
            RecommendationStatus::Borderline | RecommendationStatus::SlightlyLow => {
                Severity::Warning
            }
            RecommendationStatus::OutOfRange | RecommendationStatus::BelowMinimum => {
                Severity::Critical
            }
        }
    }
}

/// Classify a value against a range with a 5% borderline band
pub fn classify(value: f64, range: &RecommendationRange) -> RecommendationStatus {
    let min = range.min;
    let Some(max) = range.max else {
        if value >= min {
            return RecommendationStatus::MeetsMinimum;
        }
        if value >= min * (1.0 - TOLERANCE) {
            return RecommendationStatus::SlightlyLow;
        }
        return RecommendationStatus::BelowMinimum;
    };

    if value >= min && value <= max {
        RecommendationStatus::InRange
    } else if (value > max && value <= max * (1.0 + TOLERANCE))
        || (value < min && value >= min * (1.0 - TOLERANCE))
    {
        RecommendationStatus::Borderline
    } else {
        RecommendationStatus::OutOfRange
    }
}

/// One row of an analysis-versus-recommendation comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub range: RecommendationRange,
    /// Distance from the range midpoint, or from the minimum when unbounded
    pub deviation: f64,
    pub overridden: bool,
    pub status: RecommendationStatus,
    pub status_label: &'static str,
    pub severity: Severity,
}

/// Compare an analysis against the recommendations for a phase
pub fn compare_analysis(
    result: &AnalysisResult,
    phase: GrowthPhase,
    overrides: &RecommendationOverrides,
) -> Vec<ComparisonRow> {
    let mut rows: Vec<ComparisonRow> = effective_profile(phase, overrides)
        .into_iter()
        .filter_map(|(key, range)| {
            let value = result.value_for_key(&key)?;
            let status = classify(value, &range);
            let target = match range.max {
                Some(max) => (range.min + max) / 2.0,
                None => range.min,
            };
            Some(ComparisonRow {
                label: units::label(&key).unwrap_or(key.as_str()).to_string(),
                overridden: overrides.contains_key(&key),
                deviation: value - target,
                value,
                range,
                status,
                status_label: status.label(),
                severity: status.severity(),
                key,
            })
        })
        .collect();

    // Keep display order
    rows.sort_by_key(|row| {
        units::DISPLAY_KEYS
            .iter()
            .position(|(k, _)| *k == row.key)
            .unwrap_or(usize::MAX)
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, IngredientCategory, NutrientProfile, RangeOverride};
    use crate::nutrition::compute_analysis;

    #[test]
    fn test_profiles_are_complete() {
        for phase in GrowthPhase::ALL {
            let profile = ross308_recommendations(phase);
            assert_eq!(profile.len(), 14);
            assert!(profile["nutrients.Choline_mg_per_kg"].is_minimum_only());
            for (key, range) in &profile {
                if let Some(max) = range.max {
                    assert!(range.min <= max, "{} {:?}", key, phase);
                }
            }
        }
        let grower = ross308_recommendations(GrowthPhase::Grower);
        assert_eq!(grower["nutrients.CP_pct"].min, 21.0);
        assert_eq!(grower["nutrients.ME_kcal_per_kg"].unit, "kcal/kg");
    }

    #[test]
    fn test_classify_bounded() {
        let range = RecommendationRange::bounded(100.0, 200.0, "%");
        assert_eq!(classify(100.0, &range), RecommendationStatus::InRange);
        assert_eq!(classify(200.0, &range), RecommendationStatus::InRange);
        assert_eq!(classify(209.9, &range), RecommendationStatus::Borderline);
        assert_eq!(classify(210.5, &range), RecommendationStatus::OutOfRange);
        assert_eq!(classify(95.1, &range), RecommendationStatus::Borderline);
        assert_eq!(classify(94.9, &range), RecommendationStatus::OutOfRange);
    }

    #[test]
    fn test_classify_minimum_only() {
        let range = RecommendationRange::minimum(1000.0, "mg/kg");
        assert_eq!(classify(5000.0, &range), RecommendationStatus::MeetsMinimum);
        assert_eq!(classify(1000.0, &range), RecommendationStatus::MeetsMinimum);
        assert_eq!(classify(950.5, &range), RecommendationStatus::SlightlyLow);
        assert_eq!(classify(949.0, &range), RecommendationStatus::BelowMinimum);
    }

    #[test]
    fn test_status_labels_and_severity() {
        assert_eq!(RecommendationStatus::OutOfRange.label(), "Out of Range");
        assert_eq!(RecommendationStatus::SlightlyLow.severity(), Severity::Warning);
        assert_eq!(RecommendationStatus::MeetsMinimum.severity(), Severity::Ok);
        assert_eq!(RecommendationStatus::BelowMinimum.severity(), Severity::Critical);
    }

    #[test]
    fn test_override_keeps_unit() {
        let mut overrides = RecommendationOverrides::new();
        overrides.insert(
            "nutrients.ME_kcal_per_kg".to_string(),
            RangeOverride {
                min: 2800.0,
                max: Some(2900.0),
            },
        );
        let range =
            effective_range(GrowthPhase::Starter, "nutrients.ME_kcal_per_kg", &overrides).unwrap();
        assert_eq!(range.min, 2800.0);
        assert_eq!(range.max, Some(2900.0));
        assert_eq!(range.unit, "kcal/kg");

        let untouched =
            effective_range(GrowthPhase::Starter, "nutrients.CP_pct", &overrides).unwrap();
        assert_eq!(untouched.min, 22.5);
        assert!(effective_range(GrowthPhase::Starter, "nutrients.NDF_pct", &overrides).is_none());
    }

    #[test]
    fn test_compare_analysis() {
        let mut nutrients = NutrientProfile::zero();
        nutrients.cp_pct = 23.0;
        nutrients.me_kcal_per_kg = 2900.0;
        nutrients.choline_mg_per_kg = 1200.0;
        let corn = Ingredient::new(1, "Mix", IngredientCategory::Other, nutrients, 300.0)
            .with_inclusion(100.0);
        let result = compute_analysis(&[corn]);

        let rows = compare_analysis(&result, GrowthPhase::Starter, &RecommendationOverrides::new());
        assert_eq!(rows.len(), 14);
        assert_eq!(rows[0].key, "nutrients.CP_pct");

        let cp = rows.iter().find(|r| r.key == "nutrients.CP_pct").unwrap();
        assert_eq!(cp.status, RecommendationStatus::InRange);
        assert!((cp.deviation - 0.0).abs() < 1e-9);

        let me = rows.iter().find(|r| r.key == "nutrients.ME_kcal_per_kg").unwrap();
        assert_eq!(me.status, RecommendationStatus::Borderline);
        assert_eq!(me.label, "ME (kcal/kg)");

        let choline = rows
            .iter()
            .find(|r| r.key == "nutrients.Choline_mg_per_kg")
            .unwrap();
        assert_eq!(choline.status, RecommendationStatus::BelowMinimum);
        assert!((choline.deviation + 500.0).abs() < 1e-9);
    }
}
