use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::ingredient::{canonicalize, Quantity};

/// A user's declared ingredients, owned tools, and excluded ingredients.
///
/// All names are canonicalized on entry, so callers may pass raw strings from
/// the web layer. Entries change only through the explicit add/remove
/// operations below; there is no implicit decay. An ingredient mapped to
/// `None` means "some amount available, unquantified".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryProfile {
    ingredients: BTreeMap<String, Option<Quantity>>,
    tools: BTreeSet<String>,
    exclusions: BTreeSet<String>,
}

impl InventoryProfile {
    /// Creates an empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an ingredient. `None` records an unquantified amount.
    pub fn add_ingredient(&mut self, name: &str, quantity: Option<Quantity>) {
        self.ingredients.insert(canonicalize(name), quantity);
    }

    /// Removes an ingredient, reporting whether it was present
    pub fn remove_ingredient(&mut self, name: &str) -> bool {
        self.ingredients.remove(&canonicalize(name)).is_some()
    }

    pub fn add_tool(&mut self, name: &str) {
        self.tools.insert(canonicalize(name));
    }

    pub fn remove_tool(&mut self, name: &str) -> bool {
        self.tools.remove(&canonicalize(name))
    }

    /// Marks an ingredient as excluded. Exclusion is a hard constraint and
    /// overrides presence in the ingredient set.
    pub fn exclude(&mut self, name: &str) {
        self.exclusions.insert(canonicalize(name));
    }

    pub fn remove_exclusion(&mut self, name: &str) -> bool {
        self.exclusions.remove(&canonicalize(name))
    }

    /// Whether the ingredient is present, regardless of quantity
    pub fn has_ingredient(&self, name: &str) -> bool {
        self.ingredients.contains_key(&canonicalize(name))
    }

    /// Recorded quantity for an ingredient. Outer `None` = not present;
    /// `Some(None)` = present in unquantified amount.
    pub fn quantity_of(&self, name: &str) -> Option<Option<Quantity>> {
        self.ingredients.get(&canonicalize(name)).copied()
    }

    pub fn owns_tool(&self, name: &str) -> bool {
        self.tools.contains(&canonicalize(name))
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclusions.contains(&canonicalize(name))
    }

    pub fn exclusions(&self) -> &BTreeSet<String> {
        &self.exclusions
    }
}
