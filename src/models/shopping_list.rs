use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ingredient::{Ingredient, Quantity, Unit};

/// One shopping-list entry, keyed by canonical ingredient name.
///
/// Recipe-derived portions are kept per contributing recipe so that removing
/// a recipe restores exactly what it added. Manual portions live alongside
/// and are never auto-removed by recipe deselection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingEntry {
    pub ingredient: Ingredient,
    contributions: BTreeMap<Uuid, Option<Quantity>>,
    manual_added: bool,
    manual_quantity: Option<Quantity>,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl ShoppingEntry {
    fn new(ingredient: Ingredient) -> Self {
        Self {
            ingredient,
            contributions: BTreeMap::new(),
            manual_added: false,
            manual_quantity: None,
            completed: false,
            updated_at: Utc::now(),
        }
    }

    /// Recipes that contributed to this entry. Empty for manual entries.
    pub fn sources(&self) -> Vec<Uuid> {
        self.contributions.keys().copied().collect()
    }

    pub fn is_manual(&self) -> bool {
        self.manual_added
    }

    pub fn manual_quantity(&self) -> Option<Quantity> {
        self.manual_quantity
    }

    /// Total amount still needed: the sum of recipe contributions plus the
    /// manual portion. `None` when any portion is unquantified or the
    /// portions mix unit families; mixed families are reported as
    /// unquantified rather than coerced.
    pub fn quantity_needed(&self) -> Option<Quantity> {
        let mut portions: Vec<Quantity> = Vec::new();
        for contribution in self.contributions.values() {
            portions.push((*contribution)?);
        }
        if self.manual_added {
            portions.push(self.manual_quantity?);
        }

        let first = portions.first()?;
        let family = first.family();
        let mut total = 0.0;
        for portion in &portions {
            if portion.family() != family {
                return None;
            }
            total += portion.base_amount();
        }
        Some(Quantity::new(total, Unit::base(family)))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A user's shopping list. Mutations go through the aggregation operations in
/// `services::shopping`; concurrent edits resolve last-write-wins per entry
/// via `updated_at` at the storage layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    entries: BTreeMap<String, ShoppingEntry>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ShoppingEntry> {
        self.entries.values()
    }

    pub fn get(&self, name: &str) -> Option<&ShoppingEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entry_mut(&mut self, ingredient: &Ingredient) -> &mut ShoppingEntry {
        self.entries
            .entry(ingredient.name().to_string())
            .or_insert_with(|| ShoppingEntry::new(ingredient.clone()))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ShoppingEntry> {
        self.entries.get_mut(name)
    }

    pub(crate) fn set_contribution(
        &mut self,
        ingredient: &Ingredient,
        recipe_id: Uuid,
        quantity: Option<Quantity>,
    ) {
        let entry = self.entry_mut(ingredient);
        entry.contributions.insert(recipe_id, quantity);
        entry.touch();
    }

    /// Drops one recipe's contribution from every entry, deleting entries
    /// left with no provenance, no manual portion, and no pending completion
    /// to undo. Returns the number of entries touched.
    pub(crate) fn drop_contribution(&mut self, recipe_id: Uuid) -> usize {
        let mut touched = 0;
        self.entries.retain(|_, entry| {
            if entry.contributions.remove(&recipe_id).is_some() {
                touched += 1;
                entry.touch();
            }
            !entry.contributions.is_empty() || entry.manual_added || entry.completed
        });
        touched
    }

    pub(crate) fn add_manual_portion(&mut self, ingredient: &Ingredient, quantity: Option<Quantity>) {
        let entry = self.entry_mut(ingredient);
        entry.manual_quantity = match (entry.manual_added, entry.manual_quantity, quantity) {
            // Repeated manual adds accumulate when the families agree
            (true, Some(existing), Some(new)) if existing.family() == new.family() => Some(
                Quantity::new(
                    existing.base_amount() + new.base_amount(),
                    Unit::base(existing.family()),
                ),
            ),
            (true, _, _) => None,
            (false, _, new) => new,
        };
        entry.manual_added = true;
        entry.touch();
    }

    /// Clears the manual portion; deletes the entry when nothing else keeps
    /// it alive. Returns false when no manual portion existed.
    pub(crate) fn remove_manual_portion(&mut self, name: &str) -> bool {
        let Some(entry) = self.entries.get_mut(name) else {
            return false;
        };
        if !entry.manual_added {
            return false;
        }
        entry.manual_added = false;
        entry.manual_quantity = None;
        entry.touch();
        if entry.contributions.is_empty() && !entry.completed {
            self.entries.remove(name);
        }
        true
    }

    pub(crate) fn set_completed(&mut self, name: &str, completed: bool) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.completed = completed;
                entry.touch();
                true
            }
            None => false,
        }
    }

    /// Removes completed entries, returning how many were cleared
    pub(crate) fn clear_completed(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.completed);
        before - self.entries.len()
    }
}
