//! Analyze a recipe file from the command line
//!
//! Usage: analyze_recipe <recipe.json> [growth phase]
//!
//! The file is a JSON array of ingredient records with `Inclusion_pct` set.
//! Prints the analysis and the recommendation comparison as JSON.

use std::path::PathBuf;

use feedlab::models::{GrowthPhase, Settings};
use feedlab::store::load_catalog;
use feedlab::tools::analysis::analyze_ingredients;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("Usage: analyze_recipe <recipe.json> [growth phase]");
            std::process::exit(2);
        }
    };
    let phase = match args.next() {
        Some(name) => GrowthPhase::parse(&name)?,
        None => GrowthPhase::default(),
    };

    let recipe = load_catalog(&path)?;
    eprintln!(
        "Analyzing {} ingredients from {} ({})",
        recipe.len(),
        path.display(),
        phase.as_str()
    );

    let response = analyze_ingredients(recipe.all(), &Settings::with_growth_phase(phase));
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
