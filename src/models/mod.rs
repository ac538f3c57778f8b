//! Data models
//!
//! Rust structs for ingredients, analysis results, recommendations, premixes
//! and session settings.

mod analysis;
mod ingredient;
mod nutrient;
mod premix;
mod recommendation;
mod settings;

pub use analysis::{AnalysisResult, EnzymeContribution};
pub use ingredient::{Ingredient, IngredientCategory};
pub use nutrient::{DerivedNutrient, Nutrient, NutrientProfile};
pub use premix::{Mineral, MineralSource, Vitamin, VitaminUnit};
pub use recommendation::{
    GrowthPhase, RangeOverride, RecommendationOverrides, RecommendationProfile,
    RecommendationRange,
};
pub use settings::{InclusionMode, Settings};
