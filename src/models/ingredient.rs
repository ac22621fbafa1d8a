use std::fmt::Display;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize};

/// Unit-of-measure family. Quantities are only comparable within a family;
/// cross-family comparisons are flagged, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitFamily {
    Mass,
    Volume,
    Count,
}

/// Units accepted in recipes and inventories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Gram,
    Kilogram,
    Ounce,
    Pound,
    Milliliter,
    Liter,
    Cup,
    Tablespoon,
    Teaspoon,
    Piece,
}

impl Unit {
    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::Gram | Unit::Kilogram | Unit::Ounce | Unit::Pound => UnitFamily::Mass,
            Unit::Milliliter | Unit::Liter | Unit::Cup | Unit::Tablespoon | Unit::Teaspoon => {
                UnitFamily::Volume
            }
            Unit::Piece => UnitFamily::Count,
        }
    }

    /// The family's base unit (gram, milliliter, piece)
    pub fn base(family: UnitFamily) -> Unit {
        match family {
            UnitFamily::Mass => Unit::Gram,
            UnitFamily::Volume => Unit::Milliliter,
            UnitFamily::Count => Unit::Piece,
        }
    }

    /// Conversion factor into the family's base unit
    fn base_factor(&self) -> f64 {
        match self {
            Unit::Gram => 1.0,
            Unit::Kilogram => 1000.0,
            Unit::Ounce => 28.35,
            Unit::Pound => 453.6,
            Unit::Milliliter => 1.0,
            Unit::Liter => 1000.0,
            Unit::Cup => 240.0,
            Unit::Tablespoon => 15.0,
            Unit::Teaspoon => 5.0,
            Unit::Piece => 1.0,
        }
    }
}

/// An amount expressed in a concrete unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(amount: f64, unit: Unit) -> Self {
        Self { amount, unit }
    }

    pub fn family(&self) -> UnitFamily {
        self.unit.family()
    }

    /// Amount expressed in the family's base unit
    pub fn base_amount(&self) -> f64 {
        self.amount * self.unit.base_factor()
    }

    /// Whether this quantity covers `required`. Returns `None` when the two
    /// quantities live in incompatible unit families.
    pub fn covers(&self, required: &Quantity) -> Option<bool> {
        if self.family() != required.family() {
            return None;
        }
        Some(self.base_amount() >= required.base_amount())
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?}", self.amount, self.unit)
    }
}

/// Canonical form of an ingredient or tool name: trimmed, lowercased, inner
/// whitespace collapsed. All identity comparisons go through this.
pub fn canonicalize(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub(crate) fn deserialize_canonical<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| canonicalize(&s))
}

pub(crate) fn deserialize_canonical_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer)
        .map(|v| v.iter().map(|s| canonicalize(s)).collect())
}

/// An ingredient reference. Two references are equal iff their canonical
/// names match; the unit family is advisory and not part of identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(deserialize_with = "deserialize_canonical")]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<UnitFamily>,
}

impl Ingredient {
    pub fn new(name: &str) -> Self {
        Self {
            name: canonicalize(name),
            family: None,
        }
    }

    pub fn with_family(name: &str, family: UnitFamily) -> Self {
        Self {
            name: canonicalize(name),
            family: Some(family),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Ingredient {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Ingredient {}

impl Hash for Ingredient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
