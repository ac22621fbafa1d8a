mod catalog;
mod matcher;
pub mod shopping;
mod substitution;

pub use catalog::{CatalogBuilder, CatalogError, RecipeCatalog};
pub use matcher::{MatchEngine, MatchError};
pub use shopping::ShoppingError;
pub use substitution::{RankedAlternative, SubstitutionTable};
