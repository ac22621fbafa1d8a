use thiserror::Error;
use uuid::Uuid;

use crate::models::{Ingredient, Quantity, ReadinessReport, ShoppingList};

/// Error types for shopping-list mutations
#[derive(Debug, Error)]
pub enum ShoppingError {
    #[error("no shopping-list entry for '{0}'")]
    EntryNotFound(String),

    #[error("no manual portion recorded for '{0}'")]
    NoManualPortion(String),
}

/// Merges a report's unresolved ingredients into the list.
///
/// Items resolved via substitution are not added; the user already has a
/// usable alternative. Quantities merge by ingredient identity with the
/// contributing recipe recorded as provenance; re-adding the same recipe
/// replaces its previous contribution rather than double counting. Returns
/// the number of entries touched.
pub fn add_from_recipe(list: &mut ShoppingList, report: &ReadinessReport) -> usize {
    let mut touched = 0;
    for check in report.unresolved_ingredients() {
        list.set_contribution(&check.ingredient, report.recipe_id, check.required);
        touched += 1;
    }
    tracing::debug!(
        recipe_id = %report.recipe_id,
        entries = touched,
        "merged recipe into shopping list"
    );
    touched
}

/// Subtracts a recipe's contribution from every entry it touched. Entries
/// left with no provenance are deleted unless a manual portion or a pending
/// completion keeps them alive. Returns the number of entries touched.
pub fn remove_recipe_contribution(list: &mut ShoppingList, recipe_id: Uuid) -> usize {
    list.drop_contribution(recipe_id)
}

/// Flips an entry's completed flag, returning the new state. Completed
/// entries stay on the list to support undoing a completion.
pub fn toggle_completed(list: &mut ShoppingList, name: &str) -> Result<bool, ShoppingError> {
    let name = crate::models::canonicalize(name);
    let completed = list
        .get(&name)
        .map(|entry| entry.completed)
        .ok_or_else(|| ShoppingError::EntryNotFound(name.clone()))?;
    list.set_completed(&name, !completed);
    Ok(!completed)
}

/// Records a manual addition. Manual entries carry no provenance and are
/// never auto-removed by recipe deselection.
pub fn add_manual(list: &mut ShoppingList, ingredient: &Ingredient, quantity: Option<Quantity>) {
    list.add_manual_portion(ingredient, quantity);
}

/// Drops an entry's manual portion; recipe-derived portions survive
pub fn remove_manual(list: &mut ShoppingList, name: &str) -> Result<(), ShoppingError> {
    let name = crate::models::canonicalize(name);
    if list.remove_manual_portion(&name) {
        Ok(())
    } else {
        Err(ShoppingError::NoManualPortion(name))
    }
}

/// Deletes completed entries, returning how many were cleared
pub fn clear_completed(list: &mut ShoppingList) -> usize {
    list.clear_completed()
}
