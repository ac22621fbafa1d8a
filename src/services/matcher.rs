use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    HintContext, IngredientCheck, InventoryProfile, MissingReason, Quantity, Readiness,
    ReadinessReport, Recipe, RecipeIngredient, Resolution, ToolCheck, ToolCompatibility,
};
use crate::services::catalog::RecipeCatalog;

/// Error types for the match engine
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("recipe {0} not found in catalog")]
    RecipeNotFound(Uuid),
}

/// Scores and ranks recipes against an inventory, producing per-recipe
/// readiness reports. Pure computation over an immutable catalog snapshot
/// and an inventory read snapshot; no shared mutable state.
pub struct MatchEngine<'a> {
    catalog: &'a RecipeCatalog,
    inventory: &'a InventoryProfile,
}

impl<'a> MatchEngine<'a> {
    pub fn new(catalog: &'a RecipeCatalog, inventory: &'a InventoryProfile) -> Self {
        Self { catalog, inventory }
    }

    /// Evaluates a single catalog recipe by id
    pub fn evaluate_id(&self, id: &Uuid) -> Result<ReadinessReport, MatchError> {
        let recipe = self
            .catalog
            .get(id)
            .ok_or(MatchError::RecipeNotFound(*id))?;
        Ok(self.evaluate(recipe))
    }

    /// Evaluates one recipe against the inventory
    pub fn evaluate(&self, recipe: &Recipe) -> ReadinessReport {
        let (tools, tool_compatibility) = self.check_tools(recipe);
        let ingredients = self.check_ingredients(recipe);

        let status = derive_status(tool_compatibility, &ingredients, &tools);
        let score = derive_score(status, &ingredients, &tools);

        ReadinessReport {
            recipe_id: recipe.id,
            recipe_name: recipe.name.clone(),
            status,
            score,
            tool_compatibility,
            ingredients,
            tools,
        }
    }

    /// Evaluates every catalog recipe, best first. Deterministic: descending
    /// score, ties broken by ascending recipe id.
    pub fn rank(&self) -> Vec<ReadinessReport> {
        let mut reports: Vec<ReadinessReport> =
            self.catalog.recipes().map(|r| self.evaluate(r)).collect();
        reports.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.recipe_id.cmp(&b.recipe_id))
        });
        tracing::debug!(
            catalog_version = self.catalog.version(),
            recipes = reports.len(),
            "ranked catalog"
        );
        reports
    }

    fn check_tools(&self, recipe: &Recipe) -> (Vec<ToolCheck>, ToolCompatibility) {
        let mut checks = Vec::with_capacity(recipe.tools.len());
        let mut any_substituted = false;
        let mut any_unresolved = false;

        for tool in &recipe.tools {
            let resolution = if self.inventory.owns_tool(tool.name()) {
                Resolution::Direct
            } else {
                match self.best_owned_alternative(tool.name(), recipe) {
                    Some(alternative) => {
                        any_substituted = true;
                        alternative
                    }
                    None => {
                        any_unresolved = true;
                        Resolution::Unresolved {
                            reason: MissingReason::NotOwned,
                        }
                    }
                }
            };
            checks.push(ToolCheck {
                tool: tool.clone(),
                resolution,
            });
        }

        let compatibility = if any_unresolved {
            ToolCompatibility::Incompatible
        } else if any_substituted {
            ToolCompatibility::ViaSubstitution
        } else {
            ToolCompatibility::Direct
        };

        (checks, compatibility)
    }

    /// Highest-scoring substitute tool the user actually owns
    fn best_owned_alternative(&self, tool: &str, recipe: &Recipe) -> Option<Resolution> {
        self.catalog
            .substitutions()
            .resolve(
                tool,
                HintContext::Tool,
                Some(recipe),
                self.inventory.exclusions(),
            )
            .into_iter()
            .filter(|alt| self.inventory.owns_tool(&alt.name))
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|alt| Resolution::Substitution {
                alternative: alt.name,
                score: alt.score,
            })
    }

    fn check_ingredients(&self, recipe: &Recipe) -> Vec<IngredientCheck> {
        recipe
            .ingredients
            .iter()
            .map(|ri| self.check_ingredient(recipe, ri))
            .collect()
    }

    fn check_ingredient(&self, recipe: &Recipe, ri: &RecipeIngredient) -> IngredientCheck {
        let name = ri.ingredient.name();
        let required = ri.required_quantity();
        let excluded = self.inventory.is_excluded(name);
        let stored = self.inventory.quantity_of(name);
        let available = stored.flatten();

        // Exclusion overrides presence
        let reason = if excluded {
            Some(MissingReason::Excluded)
        } else {
            match stored {
                None => Some(MissingReason::NotInInventory),
                Some(stored) => match sufficiency(required.as_ref(), stored.as_ref(), ri.strict) {
                    Sufficiency::Sufficient => None,
                    Sufficiency::Insufficient => Some(MissingReason::Insufficient),
                    Sufficiency::UnitIncompatible => Some(MissingReason::UnitIncompatible),
                },
            }
        };

        let resolution = match reason {
            None => Resolution::Direct,
            // Incompatible units mean we cannot judge what we have; the
            // engine surfaces the flag instead of guessing or substituting
            Some(MissingReason::UnitIncompatible) => Resolution::Unresolved {
                reason: MissingReason::UnitIncompatible,
            },
            Some(reason) => self
                .best_available_substitute(name, recipe)
                .unwrap_or(Resolution::Unresolved { reason }),
        };

        IngredientCheck {
            ingredient: ri.ingredient.clone(),
            required,
            available,
            optional: ri.optional,
            resolution,
        }
    }

    /// Highest-scoring substitute ingredient present in the inventory and not
    /// excluded
    fn best_available_substitute(&self, ingredient: &str, recipe: &Recipe) -> Option<Resolution> {
        self.catalog
            .substitutions()
            .resolve(
                ingredient,
                HintContext::Ingredient,
                Some(recipe),
                self.inventory.exclusions(),
            )
            .into_iter()
            .filter(|alt| self.inventory.has_ingredient(&alt.name))
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|alt| Resolution::Substitution {
                alternative: alt.name,
                score: alt.score,
            })
    }
}

enum Sufficiency {
    Sufficient,
    Insufficient,
    UnitIncompatible,
}

/// Quantity comparison. An unquantified inventory amount gets the benefit of
/// the doubt unless the recipe marks the requirement strict.
fn sufficiency(
    required: Option<&Quantity>,
    available: Option<&Quantity>,
    strict: bool,
) -> Sufficiency {
    let Some(required) = required else {
        return Sufficiency::Sufficient;
    };
    match available {
        None if strict => Sufficiency::Insufficient,
        None => Sufficiency::Sufficient,
        Some(available) => match available.covers(required) {
            Some(true) => Sufficiency::Sufficient,
            Some(false) => Sufficiency::Insufficient,
            None => Sufficiency::UnitIncompatible,
        },
    }
}

fn derive_status(
    tool_compatibility: ToolCompatibility,
    ingredients: &[IngredientCheck],
    tools: &[ToolCheck],
) -> Readiness {
    // Optional ingredients cannot force Missing; at worst an optional
    // resolved via substitution caps the status at ReadyWithSubstitution
    let all_required_resolved = ingredients
        .iter()
        .filter(|check| !check.optional)
        .all(|check| check.resolution.is_resolved());

    let any_substitution = ingredients
        .iter()
        .any(|check| matches!(check.resolution, Resolution::Substitution { .. }))
        || tools
            .iter()
            .any(|check| matches!(check.resolution, Resolution::Substitution { .. }));

    let all_required_direct = ingredients
        .iter()
        .filter(|check| !check.optional)
        .all(|check| matches!(check.resolution, Resolution::Direct));

    if tool_compatibility == ToolCompatibility::Incompatible || !all_required_resolved {
        Readiness::Missing
    } else if tool_compatibility == ToolCompatibility::Direct
        && all_required_direct
        && !any_substitution
    {
        Readiness::Ready
    } else {
        Readiness::ReadyWithSubstitution
    }
}

/// Scores keep the category order invariant:
/// Ready (1.0) > ReadyWithSubstitution [0.5, 1.0) > Missing [0, 0.4]
fn derive_score(status: Readiness, ingredients: &[IngredientCheck], tools: &[ToolCheck]) -> f64 {
    match status {
        Readiness::Ready => 1.0,
        Readiness::ReadyWithSubstitution => {
            let scores: Vec<f64> = ingredients
                .iter()
                .map(|check| &check.resolution)
                .chain(tools.iter().map(|check| &check.resolution))
                .filter_map(Resolution::substitution_score)
                .collect();
            let average = scores.iter().sum::<f64>() / scores.len() as f64;
            0.5 + 0.5 * average
        }
        Readiness::Missing => {
            let required: Vec<&IngredientCheck> =
                ingredients.iter().filter(|check| !check.optional).collect();
            let fraction = if required.is_empty() {
                1.0
            } else {
                let resolved = required
                    .iter()
                    .filter(|check| check.resolution.is_resolved())
                    .count();
                resolved as f64 / required.len() as f64
            };
            fraction * 0.4
        }
    }
}
