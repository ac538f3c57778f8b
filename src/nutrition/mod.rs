//! Feed calculation module
//!
//! The analysis engine plus unit conversion, recommendation comparison,
//! inclusion helpers and premix calculators.

pub mod analysis;
pub mod inclusion;
pub mod premix;
pub mod recommendations;
pub mod units;

pub use analysis::{compute_analysis, dosage_ratio};
pub use inclusion::{from_percent, needs_normalization, normalize, to_percent, total_inclusion};
pub use premix::{
    calculate_mineral_premix, calculate_vitamin_premix, default_minerals, default_vitamins,
    MineralPremix, VitaminPremix,
};
pub use recommendations::{
    classify, compare_analysis, effective_profile, effective_range, ross308_recommendations,
    ComparisonRow, RecommendationStatus, Severity,
};
pub use units::{available_units, base_unit, convert, ConvertedValue};
