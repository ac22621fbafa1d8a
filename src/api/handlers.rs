use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    HintContext, Ingredient, InventoryProfile, Quantity, ReadinessReport, Recipe,
    RecipeIngredient, ShoppingEntry, SubstitutionHint, Tool, Unit,
};
use crate::services::{shopping, CatalogBuilder, MatchEngine, MatchError, RankedAlternative};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct PublishRecipeRequest {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredientRequest>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub hints: Vec<HintRequest>,
}

#[derive(Debug, Deserialize)]
pub struct RecipeIngredientRequest {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Deserialize)]
pub struct HintRequest {
    pub target: String,
    pub context: HintContext,
    pub alternatives: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub steps: Vec<String>,
    pub ingredients: Vec<RecipeIngredient>,
    pub tools: Vec<String>,
}

impl From<&Recipe> for RecipeResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            category: recipe.category.clone(),
            description: recipe.description.clone(),
            steps: recipe.steps.clone(),
            ingredients: recipe.ingredients.clone(),
            tools: recipe.tools.iter().map(|t| t.name().to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PublishRuleRequest {
    pub target: String,
    pub context: HintContext,
    pub alternatives: Vec<RankedAlternative>,
}

#[derive(Debug, Deserialize)]
pub struct AddIngredientRequest {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
}

impl AddIngredientRequest {
    fn quantity(&self) -> AppResult<Option<Quantity>> {
        match (self.quantity, self.unit) {
            (Some(amount), Some(unit)) => Ok(Some(Quantity::new(amount, unit))),
            (Some(amount), None) => Ok(Some(Quantity::new(amount, Unit::Piece))),
            (None, Some(_)) => Err(AppError::InvalidInput(
                "a unit requires a quantity".to_string(),
            )),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    /// Cap on the number of ranked reports returned
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SubstitutionQuery {
    pub target: String,
    #[serde(default = "default_context")]
    pub context: HintContext,
}

fn default_context() -> HintContext {
    HintContext::Ingredient
}

#[derive(Debug, Serialize)]
pub struct ShoppingEntryResponse {
    pub ingredient: String,
    pub quantity_needed: Option<Quantity>,
    pub sources: Vec<Uuid>,
    pub manual: bool,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<&ShoppingEntry> for ShoppingEntryResponse {
    fn from(entry: &ShoppingEntry) -> Self {
        Self {
            ingredient: entry.ingredient.name().to_string(),
            quantity_needed: entry.quantity_needed(),
            sources: entry.sources(),
            manual: entry.is_manual(),
            completed: entry.completed,
            updated_at: entry.updated_at,
        }
    }
}

fn build_recipe(request: PublishRecipeRequest) -> Recipe {
    let mut recipe = Recipe::new(&request.name);
    recipe.category = request.category;
    recipe.description = request.description;
    recipe.steps = request.steps;
    for ingredient in request.ingredients {
        recipe.add_ingredient(RecipeIngredient {
            ingredient: Ingredient::new(&ingredient.name),
            quantity: ingredient.quantity,
            unit: ingredient.unit,
            optional: ingredient.optional,
            strict: ingredient.strict,
        });
    }
    for tool in request.tools {
        recipe.add_tool(Tool::new(&tool));
    }
    for hint in request.hints {
        recipe.add_hint(SubstitutionHint {
            target: crate::models::canonicalize(&hint.target),
            context: hint.context,
            alternatives: hint
                .alternatives
                .iter()
                .map(|a| crate::models::canonicalize(a))
                .collect(),
        });
    }
    recipe
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Get all published recipes
pub async fn get_recipes(State(state): State<AppState>) -> Json<Vec<RecipeResponse>> {
    let inner = state.inner.read().await;
    let recipes: Vec<RecipeResponse> = inner.catalog.recipes().map(RecipeResponse::from).collect();
    Json(recipes)
}

/// Get one recipe by id
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RecipeResponse>> {
    let inner = state.inner.read().await;
    let recipe = inner
        .catalog
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("recipe {}", id)))?;
    Ok(Json(RecipeResponse::from(recipe)))
}

/// Publish a recipe. Validation happens here, at catalog build time; a recipe
/// failing validation is rejected with a descriptive error and the previous
/// snapshot stays in place.
pub async fn publish_recipe(
    State(state): State<AppState>,
    Json(request): Json<PublishRecipeRequest>,
) -> AppResult<(StatusCode, Json<RecipeResponse>)> {
    let recipe = build_recipe(request);
    let response = RecipeResponse::from(&recipe);

    let mut inner = state.inner.write().await;
    let mut builder = CatalogBuilder::from_snapshot(&inner.catalog);
    builder.add_recipe(recipe)?;
    inner.catalog = Arc::new(builder.build());

    Ok((StatusCode::CREATED, Json(response)))
}

/// Publish a global substitution rule
pub async fn publish_rule(
    State(state): State<AppState>,
    Json(request): Json<PublishRuleRequest>,
) -> AppResult<StatusCode> {
    let mut inner = state.inner.write().await;
    let mut builder = CatalogBuilder::from_snapshot(&inner.catalog);
    builder.add_rule(&request.target, request.context, request.alternatives)?;
    inner.catalog = Arc::new(builder.build());
    Ok(StatusCode::CREATED)
}

/// List ranked substitutes for one of a recipe's requirements
pub async fn get_substitutions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SubstitutionQuery>,
) -> AppResult<Json<Vec<RankedAlternative>>> {
    let inner = state.inner.read().await;
    let recipe = inner
        .catalog
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("recipe {}", id)))?;
    let alternatives = inner.catalog.substitutions().resolve(
        &query.target,
        query.context,
        Some(recipe),
        inner.inventory.exclusions(),
    );
    Ok(Json(alternatives))
}

/// Get the inventory snapshot
pub async fn get_inventory(State(state): State<AppState>) -> Json<InventoryProfile> {
    let inner = state.inner.read().await;
    Json(inner.inventory.clone())
}

/// Add or update an inventory ingredient
pub async fn add_inventory_ingredient(
    State(state): State<AppState>,
    Json(request): Json<AddIngredientRequest>,
) -> AppResult<StatusCode> {
    let quantity = request.quantity()?;
    let mut inner = state.inner.write().await;
    inner.inventory.add_ingredient(&request.name, quantity);
    Ok(StatusCode::OK)
}

/// Remove an inventory ingredient
pub async fn remove_inventory_ingredient(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    let mut inner = state.inner.write().await;
    if inner.inventory.remove_ingredient(&name) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("ingredient '{}'", name)))
    }
}

/// Add an owned tool
pub async fn add_inventory_tool(
    State(state): State<AppState>,
    Json(request): Json<NameRequest>,
) -> StatusCode {
    let mut inner = state.inner.write().await;
    inner.inventory.add_tool(&request.name);
    StatusCode::OK
}

/// Remove an owned tool
pub async fn remove_inventory_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    let mut inner = state.inner.write().await;
    if inner.inventory.remove_tool(&name) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("tool '{}'", name)))
    }
}

/// Exclude an ingredient (hard constraint)
pub async fn add_exclusion(
    State(state): State<AppState>,
    Json(request): Json<NameRequest>,
) -> StatusCode {
    let mut inner = state.inner.write().await;
    inner.inventory.exclude(&request.name);
    StatusCode::OK
}

/// Remove an exclusion
pub async fn remove_exclusion(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    let mut inner = state.inner.write().await;
    if inner.inventory.remove_exclusion(&name) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("exclusion '{}'", name)))
    }
}

/// Rank every catalog recipe against the inventory, best first
pub async fn match_all(
    State(state): State<AppState>,
    Query(query): Query<MatchQuery>,
) -> Json<Vec<ReadinessReport>> {
    let inner = state.inner.read().await;
    let engine = MatchEngine::new(&inner.catalog, &inner.inventory);
    let mut reports = engine.rank();
    if let Some(limit) = query.limit {
        reports.truncate(limit);
    }
    Json(reports)
}

/// Evaluate a single recipe against the inventory
pub async fn match_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReadinessReport>> {
    let inner = state.inner.read().await;
    let engine = MatchEngine::new(&inner.catalog, &inner.inventory);
    match engine.evaluate_id(&id) {
        Ok(report) => Ok(Json(report)),
        Err(MatchError::RecipeNotFound(id)) => {
            Err(AppError::NotFound(format!("recipe {}", id)))
        }
    }
}

/// Get the shopping-list snapshot
pub async fn get_shopping_list(State(state): State<AppState>) -> Json<Vec<ShoppingEntryResponse>> {
    let inner = state.inner.read().await;
    let entries: Vec<ShoppingEntryResponse> = inner
        .shopping_list
        .entries()
        .map(ShoppingEntryResponse::from)
        .collect();
    Json(entries)
}

/// Evaluate a recipe and merge its unresolved ingredients into the list
pub async fn add_recipe_to_shopping_list(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ShoppingEntryResponse>>> {
    let mut inner = state.inner.write().await;
    let report = match MatchEngine::new(&inner.catalog, &inner.inventory).evaluate_id(&id) {
        Ok(report) => report,
        Err(MatchError::RecipeNotFound(id)) => {
            return Err(AppError::NotFound(format!("recipe {}", id)))
        }
    };
    shopping::add_from_recipe(&mut inner.shopping_list, &report);

    let entries = inner
        .shopping_list
        .entries()
        .map(ShoppingEntryResponse::from)
        .collect();
    Ok(Json(entries))
}

/// Remove a recipe's contribution from the list
pub async fn remove_recipe_from_shopping_list(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<Vec<ShoppingEntryResponse>> {
    let mut inner = state.inner.write().await;
    shopping::remove_recipe_contribution(&mut inner.shopping_list, id);
    let entries = inner
        .shopping_list
        .entries()
        .map(ShoppingEntryResponse::from)
        .collect();
    Json(entries)
}

/// Manually add an item to the list
pub async fn add_manual_entry(
    State(state): State<AppState>,
    Json(request): Json<AddIngredientRequest>,
) -> AppResult<StatusCode> {
    let quantity = request.quantity()?;
    let mut inner = state.inner.write().await;
    shopping::add_manual(
        &mut inner.shopping_list,
        &Ingredient::new(&request.name),
        quantity,
    );
    Ok(StatusCode::OK)
}

/// Remove a manually added portion
pub async fn remove_manual_entry(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    let mut inner = state.inner.write().await;
    shopping::remove_manual(&mut inner.shopping_list, &name)
        .map_err(|e| AppError::NotFound(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle an entry's completed flag
pub async fn toggle_entry_completed(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let mut inner = state.inner.write().await;
    let completed = shopping::toggle_completed(&mut inner.shopping_list, &name)
        .map_err(|e| AppError::NotFound(e.to_string()))?;
    Ok(Json(serde_json::json!({ "completed": completed })))
}

/// Clear completed entries
pub async fn clear_completed_entries(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut inner = state.inner.write().await;
    let cleared = shopping::clear_completed(&mut inner.shopping_list);
    Json(serde_json::json!({ "cleared": cleared }))
}
