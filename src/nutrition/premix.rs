//! Vitamin and mineral premix calculators
//!
//! Both calculators work from a premix inclusion rate (kg of premix per ton
//! of finished feed) and a batch size (kg of premix to mix).

use serde::Serialize;

use crate::models::{Mineral, MineralSource, Vitamin, VitaminUnit};

pub const DEFAULT_INCLUSION_RATE_KG_PER_TON: f64 = 2.5;
pub const DEFAULT_BATCH_SIZE_KG: f64 = 100.0;

/// kg of finished feed supplied by 1 kg of premix
pub fn feed_treated_per_kg_premix(inclusion_rate_kg_per_ton: f64) -> f64 {
    if inclusion_rate_kg_per_ton > 0.0 {
        1000.0 / inclusion_rate_kg_per_ton
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitaminLine {
    pub id: String,
    pub name: String,
    pub unit: VitaminUnit,
    /// Required level per kg feed after compensating for losses
    pub total_required_per_kg_feed: f64,
    pub pure_per_kg_premix: f64,
    pub product_per_kg_premix_kg: f64,
    pub product_in_batch_kg: f64,
    pub cost_in_batch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MineralLine {
    pub id: String,
    pub name: String,
    pub source: Option<MineralSource>,
    pub pure_mg_per_kg_premix: f64,
    pub product_mg_per_kg_premix: f64,
    pub product_in_batch_kg: f64,
    pub cost_in_batch: f64,
}

/// Batch totals shared by both premix kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PremixTotals {
    pub inclusion_rate_kg_per_ton: f64,
    pub batch_size_kg: f64,
    pub total_product_weight_kg: f64,
    pub carrier_weight_kg: f64,
    pub total_batch_cost: f64,
    pub cost_per_kg_premix: f64,
    pub cost_per_ton_feed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitaminPremix {
    pub lines: Vec<VitaminLine>,
    pub totals: PremixTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MineralPremix {
    pub lines: Vec<MineralLine>,
    pub totals: PremixTotals,
}

fn totals(
    inclusion_rate_kg_per_ton: f64,
    batch_size_kg: f64,
    total_product_weight_kg: f64,
    total_batch_cost: f64,
) -> PremixTotals {
    let cost_per_kg_premix = if batch_size_kg > 0.0 && total_batch_cost > 0.0 {
        total_batch_cost / batch_size_kg
    } else {
        0.0
    };
    PremixTotals {
        inclusion_rate_kg_per_ton,
        batch_size_kg,
        total_product_weight_kg,
        carrier_weight_kg: batch_size_kg - total_product_weight_kg,
        total_batch_cost,
        cost_per_kg_premix,
        cost_per_ton_feed: cost_per_kg_premix * inclusion_rate_kg_per_ton,
    }
}

fn retained_fraction(loss_pct: f64) -> f64 {
    (100.0 - loss_pct) / 100.0
}

pub fn calculate_vitamin_premix(
    vitamins: &[Vitamin],
    inclusion_rate_kg_per_ton: f64,
    batch_size_kg: f64,
) -> VitaminPremix {
    let feed_treated = feed_treated_per_kg_premix(inclusion_rate_kg_per_ton);

    let lines: Vec<VitaminLine> = vitamins
        .iter()
        .map(|v| {
            let total_required = v.required_in_feed
                / retained_fraction(v.processing_loss_pct)
                / retained_fraction(v.storage_loss_pct);
            let pure = total_required * feed_treated;
            let purity_per_kg = v.purity * 1000.0;
            let product_per_kg = if purity_per_kg > 0.0 {
                pure / purity_per_kg
            } else {
                0.0
            };
            let product_in_batch = product_per_kg * batch_size_kg;
            VitaminLine {
                id: v.id.clone(),
                name: v.name.clone(),
                unit: v.unit,
                total_required_per_kg_feed: total_required,
                pure_per_kg_premix: pure,
                product_per_kg_premix_kg: product_per_kg,
                product_in_batch_kg: product_in_batch,
                cost_in_batch: product_in_batch * v.price_per_kg,
            }
        })
        .collect();

    let weight = lines.iter().map(|l| l.product_in_batch_kg).sum();
    let cost = lines.iter().map(|l| l.cost_in_batch).sum();
    VitaminPremix {
        totals: totals(inclusion_rate_kg_per_ton, batch_size_kg, weight, cost),
        lines,
    }
}

pub fn calculate_mineral_premix(
    minerals: &[Mineral],
    inclusion_rate_kg_per_ton: f64,
    batch_size_kg: f64,
) -> MineralPremix {
    let feed_treated = feed_treated_per_kg_premix(inclusion_rate_kg_per_ton);

    let lines: Vec<MineralLine> = minerals
        .iter()
        .map(|m| {
            let source = m.source().cloned();
            let concentration = source.as_ref().map(|s| s.concentration_pct).unwrap_or(0.0);
            let price = source.as_ref().map(|s| s.price_per_kg).unwrap_or(0.0);

            let pure_mg = m.required_mg_per_kg * feed_treated;
            let product_mg = if concentration > 0.0 {
                pure_mg / (concentration / 100.0)
            } else {
                0.0
            };
            let product_in_batch = product_mg / 1_000_000.0 * batch_size_kg;
            MineralLine {
                id: m.id.clone(),
                name: m.name.clone(),
                source,
                pure_mg_per_kg_premix: pure_mg,
                product_mg_per_kg_premix: product_mg,
                product_in_batch_kg: product_in_batch,
                cost_in_batch: product_in_batch * price,
            }
        })
        .collect();

    let weight = lines.iter().map(|l| l.product_in_batch_kg).sum();
    let cost = lines.iter().map(|l| l.cost_in_batch).sum();
    MineralPremix {
        totals: totals(inclusion_rate_kg_per_ton, batch_size_kg, weight, cost),
        lines,
    }
}

fn vitamin(
    id: &str,
    name: &str,
    unit: VitaminUnit,
    purity: f64,
    price_per_kg: f64,
    required_in_feed: f64,
    processing_loss_pct: f64,
) -> Vitamin {
    Vitamin {
        id: id.to_string(),
        name: name.to_string(),
        unit,
        purity,
        price_per_kg,
        required_in_feed,
        processing_loss_pct,
        storage_loss_pct: 5.0,
    }
}

/// Standard broiler vitamin set
pub fn default_vitamins() -> Vec<Vitamin> {
    use VitaminUnit::{Iu, Mg};
    vec![
        vitamin("vit_a", "Vitamin A", Iu, 500000.0, 30.0, 10000.0, 10.0),
        vitamin("vit_d3", "Vitamin D3", Iu, 500000.0, 35.0, 3000.0, 10.0),
        vitamin("vit_e", "Vitamin E", Iu, 500.0, 25.0, 50.0, 10.0),
        vitamin("vit_k3", "Vitamin K3 (MSB)", Mg, 510.0, 20.0, 3.0, 5.0),
        vitamin("vit_b1", "Vitamin B1 (Thiamine)", Mg, 980.0, 40.0, 2.5, 5.0),
        vitamin("vit_b2", "Vitamin B2 (Riboflavin)", Mg, 800.0, 45.0, 7.0, 5.0),
        vitamin("vit_b6", "Vitamin B6 (Pyridoxine)", Mg, 980.0, 50.0, 4.0, 5.0),
        vitamin("vit_b12", "Vitamin B12 (Cobalamin)", Mg, 10.0, 60.0, 0.02, 5.0),
        vitamin("niacin", "Niacin (B3)", Mg, 990.0, 15.0, 50.0, 5.0),
        vitamin("pant_acid", "Pantothenic Acid (B5)", Mg, 900.0, 22.0, 15.0, 5.0),
        vitamin("folic_acid", "Folic Acid (B9)", Mg, 960.0, 70.0, 1.5, 5.0),
        vitamin("biotin", "Biotin (B7)", Mg, 20.0, 80.0, 0.2, 5.0),
    ]
}

fn mineral(id: &str, name: &str, required_mg_per_kg: f64, sources: &[(&str, f64, f64)]) -> Mineral {
    Mineral {
        id: id.to_string(),
        name: name.to_string(),
        required_mg_per_kg,
        sources: sources
            .iter()
            .map(|(name, concentration_pct, price_per_kg)| MineralSource {
                name: name.to_string(),
                concentration_pct: *concentration_pct,
                price_per_kg: *price_per_kg,
            })
            .collect(),
        selected_source: 0,
    }
}

/// Standard broiler trace-mineral set
pub fn default_minerals() -> Vec<Mineral> {
    vec![
        mineral(
            "mn",
            "Manganese (Mn)",
            100.0,
            &[("Manganese Sulfate", 32.0, 2.5), ("Manganese Oxide", 60.0, 2.0)],
        ),
        mineral(
            "zn",
            "Zinc (Zn)",
            100.0,
            &[("Zinc Sulfate", 35.0, 3.0), ("Zinc Oxide", 72.0, 2.8)],
        ),
        mineral("fe", "Iron (Fe)", 80.0, &[("Ferrous Sulfate", 20.0, 1.5)]),
        mineral("cu", "Copper (Cu)", 15.0, &[("Copper Sulfate", 25.0, 4.0)]),
        mineral("i", "Iodine (I)", 1.2, &[("Calcium Iodate", 62.0, 40.0)]),
        mineral("se", "Selenium (Se)", 0.3, &[("Sodium Selenite", 45.0, 120.0)]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_treated() {
        assert!((feed_treated_per_kg_premix(2.5) - 400.0).abs() < 1e-9);
        assert_eq!(feed_treated_per_kg_premix(0.0), 0.0);
    }

    #[test]
    fn test_vitamin_a_line() {
        let vitamins = vec![default_vitamins().remove(0)];
        let premix = calculate_vitamin_premix(&vitamins, 2.5, 100.0);
        let line = &premix.lines[0];

        let total_required = 10000.0 / 0.9 / 0.95;
        assert!((line.total_required_per_kg_feed - total_required).abs() < 1e-6);
        assert!((line.pure_per_kg_premix - total_required * 400.0).abs() < 1e-6);
        let product_per_kg = total_required * 400.0 / 500_000_000.0;
        assert!((line.product_per_kg_premix_kg - product_per_kg).abs() < 1e-12);
        assert!((line.product_in_batch_kg - product_per_kg * 100.0).abs() < 1e-9);
        assert!((line.cost_in_batch - product_per_kg * 100.0 * 30.0).abs() < 1e-9);

        let totals = &premix.totals;
        assert!((totals.carrier_weight_kg - (100.0 - line.product_in_batch_kg)).abs() < 1e-9);
        assert!((totals.cost_per_kg_premix - line.cost_in_batch / 100.0).abs() < 1e-12);
        assert!((totals.cost_per_ton_feed - totals.cost_per_kg_premix * 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_purity_and_rate() {
        let mut vitamins = default_vitamins();
        vitamins[0].purity = 0.0;
        let premix = calculate_vitamin_premix(&vitamins, 2.5, 100.0);
        assert_eq!(premix.lines[0].product_in_batch_kg, 0.0);

        let premix = calculate_vitamin_premix(&default_vitamins(), 0.0, 100.0);
        assert!(premix.lines.iter().all(|l| l.product_in_batch_kg == 0.0));
        assert_eq!(premix.totals.cost_per_kg_premix, 0.0);
        assert!((premix.totals.carrier_weight_kg - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_mineral_line() {
        let minerals = vec![default_minerals().remove(0)];
        let premix = calculate_mineral_premix(&minerals, 2.5, 100.0);
        let line = &premix.lines[0];

        assert!((line.pure_mg_per_kg_premix - 40_000.0).abs() < 1e-9);
        assert!((line.product_mg_per_kg_premix - 125_000.0).abs() < 1e-6);
        assert!((line.product_in_batch_kg - 12.5).abs() < 1e-9);
        assert!((line.cost_in_batch - 31.25).abs() < 1e-9);
        assert!((premix.totals.carrier_weight_kg - 87.5).abs() < 1e-9);
        assert!((premix.totals.cost_per_ton_feed - 0.3125 * 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_mineral_source_selection_falls_back() {
        let mut minerals = vec![default_minerals().remove(0)];
        minerals[0].selected_source = 1;
        let oxide = calculate_mineral_premix(&minerals, 2.5, 100.0);
        assert_eq!(oxide.lines[0].source.as_ref().unwrap().name, "Manganese Oxide");

        minerals[0].selected_source = 9;
        let fallback = calculate_mineral_premix(&minerals, 2.5, 100.0);
        assert_eq!(fallback.lines[0].source.as_ref().unwrap().name, "Manganese Sulfate");

        minerals[0].sources.clear();
        let none = calculate_mineral_premix(&minerals, 2.5, 100.0);
        assert!(none.lines[0].source.is_none());
        assert_eq!(none.lines[0].product_in_batch_kg, 0.0);
    }

    #[test]
    fn test_default_lists() {
        assert_eq!(default_vitamins().len(), 12);
        assert_eq!(default_minerals().len(), 6);
    }
}
