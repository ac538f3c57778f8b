//! Feedlab MCP Server Implementation
//!
//! Implements the MCP server with all Feedlab tools.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::models::{RangeOverride, Settings};
use crate::store::{Catalog, SettingsStore};
use crate::tools::analysis::{self, InclusionItem};
use crate::tools::catalog::{self, IngredientInput};
use crate::tools::premix::{self, MineralAdjustment, VitaminAdjustment};
use crate::tools::recipe;
use crate::tools::settings::{self, SettingsUpdate};
use crate::tools::status::StatusTracker;

/// Feedlab MCP Service
#[derive(Clone)]
pub struct FeedlabService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    catalog: Arc<Mutex<Catalog>>,
    settings_store: Arc<dyn SettingsStore>,
    /// Serializes update_settings across load, update and save
    settings_lock: Arc<Mutex<()>>,
    tool_router: ToolRouter<FeedlabService>,
}

impl FeedlabService {
    pub fn new(
        catalog_source: impl Into<String>,
        catalog: Catalog,
        settings_store: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(catalog_source))),
            catalog: Arc::new(Mutex::new(catalog)),
            settings_store,
            settings_lock: Arc::new(Mutex::new(())),
            tool_router: Self::tool_router(),
        }
    }

    async fn load_settings(&self) -> Result<Settings, McpError> {
        self.settings_store
            .load()
            .await
            .map_err(|e| McpError::internal_error(format!("Failed to load settings: {}", e), None))
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Catalog Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListIngredientsParams {
    /// Energy, Protein, AminoAcids, MineralSupplements, Medicated, Enzymes or Other
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientIdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientParams {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub price_per_ton: f64,
    /// Nutrient values keyed by field name, e.g. {"CP_pct": 8.5, "ME_kcal_per_kg": 3350}
    #[serde(default)]
    pub nutrients: HashMap<String, f64>,
    /// Enzymes only
    pub standard_dosage_g_per_ton: Option<f64>,
    /// Enzymes only: nutrient amounts released at the standard dosage
    pub matrix: Option<HashMap<String, f64>>,
}

impl From<IngredientParams> for IngredientInput {
    fn from(p: IngredientParams) -> Self {
        IngredientInput {
            name: p.name,
            description: p.description,
            category: p.category,
            price_per_ton: p.price_per_ton,
            nutrients: p.nutrients,
            standard_dosage_g_per_ton: p.standard_dosage_g_per_ton,
            matrix: p.matrix,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateIngredientParams {
    pub id: i64,
    #[serde(flatten)]
    pub ingredient: IngredientParams,
}

// ============================================================================
// Recipe and Analysis Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetInclusionParams {
    pub id: i64,
    /// In the session's inclusion mode (% or kg/ton); 0 removes the ingredient
    pub amount: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InclusionItemParams {
    pub id: i64,
    pub amount: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeIngredientsParams {
    /// Catalog ingredients with amounts in the session's inclusion mode
    #[serde(default)]
    pub items: Vec<InclusionItemParams>,
    /// JSON array of full ingredient records (catalog file format) with Inclusion_pct set
    pub ingredients_json: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertNutrientParams {
    pub value: f64,
    /// Display key, e.g. "nutrients.ME_kcal_per_kg" or "totalCostPerTon"
    pub key: String,
    pub unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecommendationsParams {
    /// Starter, Grower, Finisher 1 or Finisher 2; defaults to the session phase
    pub growth_phase: Option<String>,
}

// ============================================================================
// Settings Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RangeOverrideParams {
    pub min: f64,
    /// Omit for a minimum-only target
    pub max: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateSettingsParams {
    pub growth_phase: Option<String>,
    /// percent or kg_per_ton
    pub inclusion_mode: Option<String>,
    /// Display unit per key, e.g. {"nutrients.CP_pct": "g/kg"}
    pub nutrient_units: Option<HashMap<String, String>>,
    pub nutrient_visibility: Option<HashMap<String, bool>>,
    pub recommendation_overrides: Option<HashMap<String, RangeOverrideParams>>,
    /// Keys whose overrides revert to the built-in ranges
    pub clear_overrides: Option<Vec<String>>,
}

impl From<UpdateSettingsParams> for SettingsUpdate {
    fn from(p: UpdateSettingsParams) -> Self {
        SettingsUpdate {
            growth_phase: p.growth_phase,
            inclusion_mode: p.inclusion_mode,
            nutrient_units: p.nutrient_units,
            nutrient_visibility: p.nutrient_visibility,
            recommendation_overrides: p.recommendation_overrides.map(|overrides| {
                overrides
                    .into_iter()
                    .map(|(key, r)| {
                        (
                            key,
                            RangeOverride {
                                min: r.min,
                                max: r.max,
                            },
                        )
                    })
                    .collect()
            }),
            clear_overrides: p.clear_overrides,
        }
    }
}

// ============================================================================
// Premix Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct VitaminAdjustmentParams {
    /// vit_a, vit_d3, vit_e, vit_k3, vit_b1, vit_b2, vit_b6, vit_b12, niacin, pant_acid, folic_acid, biotin
    pub id: String,
    /// IU/kg or mg/kg of finished feed
    pub required_in_feed: Option<f64>,
    pub purity: Option<f64>,
    pub price_per_kg: Option<f64>,
    pub processing_loss_pct: Option<f64>,
    pub storage_loss_pct: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct VitaminPremixParams {
    /// Premix kg per ton of feed (default 2.5)
    pub inclusion_rate_kg_per_ton: Option<f64>,
    /// Batch size in kg (default 100)
    pub batch_size_kg: Option<f64>,
    #[serde(default)]
    pub adjustments: Vec<VitaminAdjustmentParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MineralAdjustmentParams {
    /// mn, zn, fe, cu, i, se
    pub id: String,
    pub required_mg_per_kg: Option<f64>,
    /// Index into the mineral's source list
    pub selected_source: Option<usize>,
    /// Applies to the selected source
    pub concentration_pct: Option<f64>,
    /// Applies to the selected source
    pub price_per_kg: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MineralPremixParams {
    pub inclusion_rate_kg_per_ton: Option<f64>,
    pub batch_size_kg: Option<f64>,
    #[serde(default)]
    pub adjustments: Vec<MineralAdjustmentParams>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl FeedlabService {
    // --- Status ---

    #[tool(description = "Get the current status of the Feedlab service including build info, catalog size, and process information")]
    async fn feedlab_status(&self) -> Result<CallToolResult, McpError> {
        let (catalog_size, recipe_size) = {
            let catalog = self.catalog.lock().await;
            (catalog.len(), catalog.recipe().len())
        };
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status(catalog_size, recipe_size))
    }

    #[tool(description = "Get a guide to how feed analysis works: the enzyme uplift, ratios, recommendation statuses, and display units. Call this before building a recipe.")]
    fn analysis_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::ANALYSIS_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(ANALYSIS_INSTRUCTIONS)]))
    }

    // --- Catalog ---

    #[tool(description = "List catalog ingredients, optionally filtered by category")]
    async fn list_ingredients(&self, Parameters(p): Parameters<ListIngredientsParams>) -> Result<CallToolResult, McpError> {
        let catalog = self.catalog.lock().await;
        let result = catalog::list_ingredients(&catalog, p.category.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get full details for an ingredient including nutrients, price, and enzyme matrix")]
    async fn get_ingredient(&self, Parameters(p): Parameters<IngredientIdParams>) -> Result<CallToolResult, McpError> {
        let catalog = self.catalog.lock().await;
        let result = catalog::get_ingredient(&catalog, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add an ingredient to the catalog. Enzymes (category Enzymes) take a standard dosage and a nutrient matrix.")]
    async fn add_ingredient(&self, Parameters(p): Parameters<IngredientParams>) -> Result<CallToolResult, McpError> {
        let mut catalog = self.catalog.lock().await;
        let result = catalog::add_ingredient(&mut catalog, p.into()).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Replace an ingredient's data. Its id and current inclusion are kept.")]
    async fn update_ingredient(&self, Parameters(p): Parameters<UpdateIngredientParams>) -> Result<CallToolResult, McpError> {
        let mut catalog = self.catalog.lock().await;
        let result = catalog::update_ingredient(&mut catalog, p.id, p.ingredient.into()).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete an ingredient from the catalog (and from the recipe)")]
    async fn delete_ingredient(&self, Parameters(p): Parameters<IngredientIdParams>) -> Result<CallToolResult, McpError> {
        let mut catalog = self.catalog.lock().await;
        let result = catalog::delete_ingredient(&mut catalog, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Recipe ---

    #[tool(description = "Set an ingredient's inclusion in the working recipe, in the session's inclusion mode (% or kg/ton)")]
    async fn set_inclusion(&self, Parameters(p): Parameters<SetInclusionParams>) -> Result<CallToolResult, McpError> {
        let settings = self.load_settings().await?;
        let mut catalog = self.catalog.lock().await;
        let result = recipe::set_inclusion(&mut catalog, &settings, p.id, p.amount).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the working recipe with inclusions and the total")]
    async fn get_recipe(&self) -> Result<CallToolResult, McpError> {
        let settings = self.load_settings().await?;
        let catalog = self.catalog.lock().await;
        json_result(&recipe::get_recipe(&catalog, &settings))
    }

    #[tool(description = "Reset every inclusion in the working recipe to zero")]
    async fn clear_recipe(&self) -> Result<CallToolResult, McpError> {
        let settings = self.load_settings().await?;
        let mut catalog = self.catalog.lock().await;
        json_result(&recipe::clear_recipe(&mut catalog, &settings))
    }

    #[tool(description = "Scale every inclusion so the recipe totals 100%")]
    async fn normalize_recipe(&self) -> Result<CallToolResult, McpError> {
        let settings = self.load_settings().await?;
        let mut catalog = self.catalog.lock().await;
        json_result(&recipe::normalize_recipe(&mut catalog, &settings))
    }

    // --- Analysis ---

    #[tool(description = "Analyze the working recipe: nutrient values in display units, comparison with the growth phase recommendations, and enzyme contributions")]
    async fn analyze_recipe(&self) -> Result<CallToolResult, McpError> {
        let settings = self.load_settings().await?;
        let catalog = self.catalog.lock().await;
        json_result(&analysis::analyze_recipe(&catalog, &settings))
    }

    #[tool(description = "Analyze an explicit ingredient list without changing the working recipe. Combine catalog items with amounts and/or a JSON array of ingredient records.")]
    async fn analyze_ingredients(&self, Parameters(p): Parameters<AnalyzeIngredientsParams>) -> Result<CallToolResult, McpError> {
        let settings = self.load_settings().await?;
        let items: Vec<InclusionItem> = p
            .items
            .iter()
            .map(|i| InclusionItem { id: i.id, amount: i.amount })
            .collect();
        let catalog = self.catalog.lock().await;
        let result = analysis::analyze_selection(&catalog, &settings, &items, p.ingredients_json.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Convert a value from its base unit to another display unit")]
    fn convert_nutrient(&self, Parameters(p): Parameters<ConvertNutrientParams>) -> Result<CallToolResult, McpError> {
        let result = analysis::convert_nutrient(p.value, &p.key, &p.unit).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the Ross 308 recommended ranges for a growth phase, with any session overrides applied")]
    async fn get_recommendations(&self, Parameters(p): Parameters<GetRecommendationsParams>) -> Result<CallToolResult, McpError> {
        let settings = self.load_settings().await?;
        let result = analysis::get_recommendations(&settings, p.growth_phase.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Settings ---

    #[tool(description = "Get session settings: growth phase, inclusion mode, display units and visibility, and recommendation overrides")]
    async fn get_settings(&self) -> Result<CallToolResult, McpError> {
        let settings = self.load_settings().await?;
        json_result(&settings::get_settings(&settings))
    }

    #[tool(description = "Update session settings. Nothing changes if any part of the update is invalid.")]
    async fn update_settings(&self, Parameters(p): Parameters<UpdateSettingsParams>) -> Result<CallToolResult, McpError> {
        let _guard = self.settings_lock.lock().await;
        let mut current = self.load_settings().await?;
        let result = settings::update_settings(&mut current, p.into()).map_err(|e| McpError::internal_error(e, None))?;
        self.settings_store
            .save(&current)
            .await
            .map_err(|e| McpError::internal_error(format!("Failed to save settings: {}", e), None))?;
        json_result(&result)
    }

    // --- Premix ---

    #[tool(description = "Calculate a vitamin premix from the standard broiler vitamin set with optional per-vitamin adjustments")]
    fn calculate_vitamin_premix(&self, Parameters(p): Parameters<VitaminPremixParams>) -> Result<CallToolResult, McpError> {
        let adjustments = p
            .adjustments
            .into_iter()
            .map(|a| VitaminAdjustment {
                id: a.id,
                required_in_feed: a.required_in_feed,
                purity: a.purity,
                price_per_kg: a.price_per_kg,
                processing_loss_pct: a.processing_loss_pct,
                storage_loss_pct: a.storage_loss_pct,
            })
            .collect();
        let result = premix::calculate_vitamin_premix(p.inclusion_rate_kg_per_ton, p.batch_size_kg, adjustments)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Calculate a trace mineral premix from the standard mineral set with optional source selection and adjustments")]
    fn calculate_mineral_premix(&self, Parameters(p): Parameters<MineralPremixParams>) -> Result<CallToolResult, McpError> {
        let adjustments = p
            .adjustments
            .into_iter()
            .map(|a| MineralAdjustment {
                id: a.id,
                required_mg_per_kg: a.required_mg_per_kg,
                selected_source: a.selected_source,
                concentration_pct: a.concentration_pct,
                price_per_kg: a.price_per_kg,
            })
            .collect();
        let result = premix::calculate_mineral_premix(p.inclusion_rate_kg_per_ton, p.batch_size_kg, adjustments)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for FeedlabService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "feedlab".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Feedlab Poultry Feed Analyzer".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Feedlab - broiler feed recipe analysis against Ross 308 recommendations. \
                 IMPORTANT: Call analysis_instructions first. \
                 Catalog: list/get/add/update/delete_ingredient. \
                 Recipe: set_inclusion, get_recipe, clear_recipe, normalize_recipe. \
                 Analysis: analyze_recipe, analyze_ingredients, convert_nutrient, get_recommendations. \
                 Settings: get_settings, update_settings (growth phase, inclusion mode, units, overrides). \
                 Premix: calculate_vitamin_premix, calculate_mineral_premix."
                    .into(),
            ),
        }
    }
}
