use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ingredient::{Ingredient, Quantity};
use super::tool::Tool;

/// A recipe's classification against an inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    ReadyWithSubstitution,
    Missing,
}

/// Why a requirement could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReason {
    NotInInventory,
    NotOwned,
    Excluded,
    Insufficient,
    /// The recorded and required quantities live in incompatible unit
    /// families; the engine refuses to guess a conversion
    UnitIncompatible,
}

/// How a single requirement was satisfied, if at all
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum Resolution {
    /// Satisfied directly from the inventory
    Direct,
    /// Satisfied by the named alternative
    Substitution { alternative: String, score: f64 },
    Unresolved { reason: MissingReason },
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Resolution::Unresolved { .. })
    }

    pub fn substitution_score(&self) -> Option<f64> {
        match self {
            Resolution::Substitution { score, .. } => Some(*score),
            _ => None,
        }
    }
}

/// Per-ingredient detail in a readiness report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientCheck {
    pub ingredient: Ingredient,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Quantity>,
    /// Recorded inventory amount; absent when the ingredient is not present
    /// or is present in unquantified amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<Quantity>,
    pub optional: bool,
    pub resolution: Resolution,
}

/// Per-tool detail in a readiness report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCheck {
    pub tool: Tool,
    pub resolution: Resolution,
}

/// Aggregate tool verdict for a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCompatibility {
    Direct,
    ViaSubstitution,
    Incompatible,
}

/// The match engine's verdict for one recipe against one inventory.
/// Ephemeral: recomputed per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub status: Readiness,
    pub score: f64,
    pub tool_compatibility: ToolCompatibility,
    pub ingredients: Vec<IngredientCheck>,
    pub tools: Vec<ToolCheck>,
}

impl ReadinessReport {
    /// Ingredient checks that stayed unresolved. These are the entries that
    /// feed shopping-list generation; substituted items are not among them.
    pub fn unresolved_ingredients(&self) -> impl Iterator<Item = &IngredientCheck> {
        self.ingredients
            .iter()
            .filter(|check| !check.resolution.is_resolved())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_serialization() {
        let json = serde_json::to_string(&Readiness::ReadyWithSubstitution).unwrap();
        assert_eq!(json, "\"ready_with_substitution\"");
    }

    #[test]
    fn test_resolution_tagging() {
        let resolution = Resolution::Substitution {
            alternative: "oven".to_string(),
            score: 0.7,
        };
        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["via"], "substitution");
        assert_eq!(json["alternative"], "oven");
    }

    #[test]
    fn test_substitution_score() {
        assert_eq!(Resolution::Direct.substitution_score(), None);
        let substituted = Resolution::Substitution {
            alternative: "oven".to_string(),
            score: 0.7,
        };
        assert_eq!(substituted.substitution_score(), Some(0.7));
    }
}
