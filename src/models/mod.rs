mod ingredient;
mod inventory;
mod recipe;
mod report;
mod shopping_list;
mod tool;

pub use ingredient::{canonicalize, Ingredient, Quantity, Unit, UnitFamily};
pub(crate) use ingredient::deserialize_canonical;
pub use inventory::InventoryProfile;
pub use recipe::{HintContext, Recipe, RecipeIngredient, SubstitutionHint};
pub use report::{
    IngredientCheck, MissingReason, Readiness, ReadinessReport, Resolution, ToolCheck,
    ToolCompatibility,
};
pub use shopping_list::{ShoppingEntry, ShoppingList};
pub use tool::Tool;
