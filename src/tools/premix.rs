//! Premix MCP Tools
//!
//! Start from the standard vitamin and mineral sets and apply per-item
//! adjustments before calculating.

use crate::models::{Mineral, Vitamin};
use crate::nutrition::premix::{DEFAULT_BATCH_SIZE_KG, DEFAULT_INCLUSION_RATE_KG_PER_TON};
use crate::nutrition::{
    calculate_mineral_premix as mineral_premix, calculate_vitamin_premix as vitamin_premix,
    default_minerals, default_vitamins, MineralPremix, VitaminPremix,
};

#[derive(Debug, Clone, Default)]
pub struct VitaminAdjustment {
    pub id: String,
    pub required_in_feed: Option<f64>,
    pub purity: Option<f64>,
    pub price_per_kg: Option<f64>,
    pub processing_loss_pct: Option<f64>,
    pub storage_loss_pct: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct MineralAdjustment {
    pub id: String,
    pub required_mg_per_kg: Option<f64>,
    pub selected_source: Option<usize>,
    pub concentration_pct: Option<f64>,
    pub price_per_kg: Option<f64>,
}

fn check_batch(inclusion_rate: Option<f64>, batch_size: Option<f64>) -> Result<(f64, f64), String> {
    let rate = inclusion_rate.unwrap_or(DEFAULT_INCLUSION_RATE_KG_PER_TON);
    let batch = batch_size.unwrap_or(DEFAULT_BATCH_SIZE_KG);
    if !rate.is_finite() || rate < 0.0 {
        return Err(format!("Invalid inclusion rate: {}", rate));
    }
    if !batch.is_finite() || batch < 0.0 {
        return Err(format!("Invalid batch size: {}", batch));
    }
    Ok((rate, batch))
}

fn check_loss(loss: f64) -> Result<f64, String> {
    if (0.0..100.0).contains(&loss) {
        Ok(loss)
    } else {
        Err(format!("Loss must be at least 0% and below 100%, got {}", loss))
    }
}

fn apply_vitamin(vitamins: &mut [Vitamin], adj: VitaminAdjustment) -> Result<(), String> {
    let vitamin = vitamins
        .iter_mut()
        .find(|v| v.id == adj.id)
        .ok_or_else(|| format!("Unknown vitamin: {}", adj.id))?;
    if let Some(value) = adj.required_in_feed {
        vitamin.required_in_feed = value;
    }
    if let Some(value) = adj.purity {
        vitamin.purity = value;
    }
    if let Some(value) = adj.price_per_kg {
        vitamin.price_per_kg = value;
    }
    if let Some(value) = adj.processing_loss_pct {
        vitamin.processing_loss_pct = check_loss(value)?;
    }
    if let Some(value) = adj.storage_loss_pct {
        vitamin.storage_loss_pct = check_loss(value)?;
    }
    Ok(())
}

fn apply_mineral(minerals: &mut [Mineral], adj: MineralAdjustment) -> Result<(), String> {
    let mineral = minerals
        .iter_mut()
        .find(|m| m.id == adj.id)
        .ok_or_else(|| format!("Unknown mineral: {}", adj.id))?;
    if let Some(value) = adj.required_mg_per_kg {
        mineral.required_mg_per_kg = value;
    }
    if let Some(index) = adj.selected_source {
        if index >= mineral.sources.len() {
            return Err(format!(
                "{} has {} sources; index {} is out of range",
                mineral.name,
                mineral.sources.len(),
                index
            ));
        }
        mineral.selected_source = index;
    }
    let selected = mineral.selected_source;
    if let Some(source) = mineral.sources.get_mut(selected) {
        if let Some(value) = adj.concentration_pct {
            source.concentration_pct = value;
        }
        if let Some(value) = adj.price_per_kg {
            source.price_per_kg = value;
        }
    }
    Ok(())
}

pub fn calculate_vitamin_premix(
    inclusion_rate: Option<f64>,
    batch_size: Option<f64>,
    adjustments: Vec<VitaminAdjustment>,
) -> Result<VitaminPremix, String> {
    let (rate, batch) = check_batch(inclusion_rate, batch_size)?;
    let mut vitamins = default_vitamins();
    for adj in adjustments {
        apply_vitamin(&mut vitamins, adj)?;
    }
    Ok(vitamin_premix(&vitamins, rate, batch))
}

pub fn calculate_mineral_premix(
    inclusion_rate: Option<f64>,
    batch_size: Option<f64>,
    adjustments: Vec<MineralAdjustment>,
) -> Result<MineralPremix, String> {
    let (rate, batch) = check_batch(inclusion_rate, batch_size)?;
    let mut minerals = default_minerals();
    for adj in adjustments {
        apply_mineral(&mut minerals, adj)?;
    }
    Ok(mineral_premix(&minerals, rate, batch))
}
