//! Feedlab Status Tool
//!
//! Provides runtime status information about the Feedlab service, plus the
//! analysis guide served to assistants.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// How the analysis works and how to read its output
pub const ANALYSIS_INSTRUCTIONS: &str = r#"
# Feedlab Analysis Guide

Feedlab analyzes a broiler feed recipe built from an ingredient catalog and
compares the result with Ross 308 recommendations for the selected growth phase.

## Building a Recipe

1. Browse the catalog with `list_ingredients` (filter by category: Energy,
   Protein, AminoAcids, MineralSupplements, Medicated, Enzymes, Other).
2. Set inclusions with `set_inclusion`. Amounts use the session inclusion mode:
   - `percent`: % of the finished feed
   - `kg_per_ton`: kg per metric ton (1% = 10 kg/ton)
3. Check the total with `get_recipe`. When it is not 100% (more than 0.01 away),
   run `normalize_recipe` to scale every inclusion by 100 / total.

Enzymes are dosed in tiny amounts: 0.015% is 150 g/ton.

## How Values Are Calculated

1. **Base mix.** Every non-enzyme ingredient contributes to each nutrient in
   proportion to its inclusion. The base profile is the inclusion-weighted
   average over non-enzyme ingredients only.
2. **Enzyme uplift.** Each enzyme has a matrix: the amount of each nutrient it
   releases into the finished feed at its standard dosage. The actual dosage is
   inclusion x 10,000 g/ton. The dosage ratio is actual / standard, capped at 1,
   so overdosing gives no extra benefit. Uplift = matrix value x dosage ratio.
3. **Final values.** final = base x (non-enzyme inclusion / total inclusion) + uplift.
4. **Ratios.**
   - ME/CP = ME / CP
   - Ca/Av.P = Ca / avP
   - (K+Cl)/Na = (K + Cl) / Na
   - dEB (mEq/kg) = 434.78 x Na + 256.4 x K - 281.69 x Cl
   A ratio is 0 when its denominator is 0.
5. **Cost.** Sum of inclusion x price over all ingredients (enzymes included)
   divided by total inclusion, in $/ton; $/100kg is that divided by 10.

## Reading the Comparison

Each recommended nutrient gets a status with a 5% tolerance band:

| Status | Meaning |
|--------|---------|
| In Range | between min and max |
| Borderline | up to 5% below min or 5% above max |
| Out of Range | further outside the range |
| Meets Minimum | at or above a minimum-only target (choline) |
| Slightly Low | up to 5% below a minimum-only target |
| Below Minimum | more than 5% below a minimum-only target |

`deviation` is the distance from the middle of the range, or from the minimum
for minimum-only targets. Recommended ranges can be overridden per nutrient
with `update_settings`; overrides keep the built-in unit.

## Display Units

Values are computed in base units (%, kcal/kg, mg/kg, mEq/kg, $/ton) and shown
in the units chosen with `update_settings`:
- % nutrients: `%` or `g/kg` (x10); Na, K, Cl also `ppm` (x10,000)
- ME: `kcal/kg` or `MJ/kg` (/239.006)
- Choline: `mg/kg`, `g/kg`, `%`, `ppm`
- Cost: `$/ton` or `$/kg`

## Premixes

`calculate_vitamin_premix` and `calculate_mineral_premix` size a premix for a
given inclusion rate (default 2.5 kg/ton) and batch (default 100 kg). Vitamin
requirements are raised to cover processing and storage losses; mineral product
weights follow from the selected source's concentration. Whatever the active
products do not fill is carrier.
"#;

/// Status information for the Feedlab service
#[derive(Debug, Serialize)]
pub struct FeedlabStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub started_at: String,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
    pub catalog_source: String,
    pub catalog_size: usize,
    pub recipe_size: usize,
}

/// Tracks service start time and where the catalog came from
pub struct StatusTracker {
    start_time: Instant,
    started_at: chrono::DateTime<chrono::Utc>,
    catalog_source: String,
}

impl StatusTracker {
    pub fn new(catalog_source: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: chrono::Utc::now(),
            catalog_source: catalog_source.into(),
        }
    }

    /// Get the current status
    pub fn get_status(&self, catalog_size: usize, recipe_size: usize) -> FeedlabStatus {
        let build_info = BuildInfo::current();

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FeedlabStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            started_at: self.started_at.to_rfc3339(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
            catalog_source: self.catalog_source.clone(),
            catalog_size,
            recipe_size,
        }
    }
}
