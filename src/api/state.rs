use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{InventoryProfile, ShoppingList};
use crate::services::{CatalogBuilder, RecipeCatalog};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
}

/// Inner state that can be modified. The catalog itself is an immutable
/// snapshot; publishing swaps in a rebuilt one.
pub struct AppStateInner {
    pub catalog: Arc<RecipeCatalog>,
    pub inventory: InventoryProfile,
    pub shopping_list: ShoppingList,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a new empty application state
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                catalog: Arc::new(CatalogBuilder::new().build()),
                inventory: InventoryProfile::new(),
                shopping_list: ShoppingList::new(),
            })),
        }
    }
}
