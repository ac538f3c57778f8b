//! Error types
//!
//! Errors raised at the edges around the analysis engine: catalog loading,
//! catalog edits, and settings parsing. The engine itself never fails.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to read catalog file {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid ingredient JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ingredient not found: {0}")]
    IngredientNotFound(i64),

    #[error("Ingredient id {0} already exists")]
    DuplicateIngredient(i64),

    #[error("Unknown nutrient key: {0}")]
    UnknownNutrient(String),

    #[error("Unknown growth phase: {0}")]
    UnknownGrowthPhase(String),

    #[error("Unknown inclusion mode: {0}")]
    UnknownInclusionMode(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

/// Result type for fallible feedlab operations
pub type FeedResult<T> = Result<T, FeedError>;
