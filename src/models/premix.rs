//! Premix models
//!
//! Vitamin and trace-mineral inputs for premix formulation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VitaminUnit {
    #[serde(rename = "IU")]
    Iu,
    #[serde(rename = "mg")]
    Mg,
}

impl VitaminUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            VitaminUnit::Iu => "IU",
            VitaminUnit::Mg => "mg",
        }
    }
}

/// A vitamin and the commercial product supplying it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitamin {
    pub id: String,
    pub name: String,
    pub unit: VitaminUnit,
    /// Activity of the source product, in `unit` per gram
    pub purity: f64,
    pub price_per_kg: f64,
    /// Target level in finished feed, in `unit` per kg
    pub required_in_feed: f64,
    pub processing_loss_pct: f64,
    pub storage_loss_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineralSource {
    pub name: String,
    pub concentration_pct: f64,
    pub price_per_kg: f64,
}

/// A trace mineral with its candidate source products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mineral {
    pub id: String,
    pub name: String,
    pub required_mg_per_kg: f64,
    pub sources: Vec<MineralSource>,
    #[serde(default)]
    pub selected_source: usize,
}

impl Mineral {
    /// The selected source, falling back to the first
    pub fn source(&self) -> Option<&MineralSource> {
        self.sources
            .get(self.selected_source)
            .or_else(|| self.sources.first())
    }
}
