use std::collections::BTreeMap;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{HintContext, Recipe};
use crate::services::substitution::{RankedAlternative, SubstitutionTable};

/// Errors raised at catalog build time. A recipe or rule failing validation
/// is rejected with a descriptive error, never silently dropped.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("recipe '{recipe}': ingredient '{ingredient}' must have a positive quantity, got {quantity}")]
    NonPositiveQuantity {
        recipe: String,
        ingredient: String,
        quantity: f64,
    },

    #[error("recipe '{recipe}': ingredient '{ingredient}' specifies a unit but no quantity")]
    UnitWithoutQuantity { recipe: String, ingredient: String },

    #[error("recipe '{recipe}': substitution hint targets '{target}' which the recipe does not reference")]
    DanglingHintTarget { recipe: String, target: String },

    #[error("substitution rule for '{target}': alternative '{alternative}' has score {score} outside [0, 1]")]
    ScoreOutOfRange {
        target: String,
        alternative: String,
        score: f64,
    },

    #[error("substitution rule for '{target}' lists the target as its own alternative")]
    SelfSubstitution { target: String },

    #[error("recipe id {0} already published")]
    DuplicateRecipe(Uuid),
}

/// An immutable, versioned snapshot of the published recipes and the global
/// substitution table. Loaded once and shared by reference into the match
/// engine; rebuilding produces a new snapshot with a bumped version, so
/// concurrent evaluations never observe a partial catalog.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    version: u64,
    recipes: BTreeMap<Uuid, Recipe>,
    substitutions: SubstitutionTable,
}

impl RecipeCatalog {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: &Uuid) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Full enumeration for batch matching, ordered by ascending id
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn substitutions(&self) -> &SubstitutionTable {
        &self.substitutions
    }
}

/// Validating builder for catalog snapshots
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    version: u64,
    recipes: BTreeMap<Uuid, Recipe>,
    substitutions: SubstitutionTable,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a rebuild from an existing snapshot; the built catalog gets the
    /// next version number.
    pub fn from_snapshot(catalog: &RecipeCatalog) -> Self {
        Self {
            version: catalog.version,
            recipes: catalog.recipes.clone(),
            substitutions: catalog.substitutions.clone(),
        }
    }

    /// Validates and stages a recipe
    pub fn add_recipe(&mut self, recipe: Recipe) -> Result<&mut Self, CatalogError> {
        validate_recipe(&recipe)?;
        if self.recipes.contains_key(&recipe.id) {
            return Err(CatalogError::DuplicateRecipe(recipe.id));
        }
        self.recipes.insert(recipe.id, recipe);
        Ok(self)
    }

    /// Validates and stages a global substitution rule, replacing any
    /// previous rule for the same target and context
    pub fn add_rule(
        &mut self,
        target: &str,
        context: HintContext,
        alternatives: Vec<RankedAlternative>,
    ) -> Result<&mut Self, CatalogError> {
        let target = crate::models::canonicalize(target);
        for alternative in &alternatives {
            if alternative.name == target {
                return Err(CatalogError::SelfSubstitution { target });
            }
            if !(0.0..=1.0).contains(&alternative.score) {
                return Err(CatalogError::ScoreOutOfRange {
                    target,
                    alternative: alternative.name.clone(),
                    score: alternative.score,
                });
            }
        }
        self.substitutions.insert(&target, context, alternatives);
        Ok(self)
    }

    pub fn build(self) -> RecipeCatalog {
        let catalog = RecipeCatalog {
            version: self.version + 1,
            recipes: self.recipes,
            substitutions: self.substitutions,
        };
        tracing::info!(
            version = catalog.version,
            recipes = catalog.len(),
            "catalog snapshot built"
        );
        catalog
    }
}

fn validate_recipe(recipe: &Recipe) -> Result<(), CatalogError> {
    for ri in &recipe.ingredients {
        match (ri.quantity, ri.unit) {
            (Some(quantity), _) if quantity <= 0.0 => {
                return Err(CatalogError::NonPositiveQuantity {
                    recipe: recipe.name.clone(),
                    ingredient: ri.ingredient.name().to_string(),
                    quantity,
                });
            }
            (None, Some(_)) => {
                return Err(CatalogError::UnitWithoutQuantity {
                    recipe: recipe.name.clone(),
                    ingredient: ri.ingredient.name().to_string(),
                });
            }
            _ => {}
        }
    }

    for hint in &recipe.hints {
        if !recipe.references(&hint.target, hint.context) {
            return Err(CatalogError::DanglingHintTarget {
                recipe: recipe.name.clone(),
                target: hint.target.clone(),
            });
        }
    }

    Ok(())
}
