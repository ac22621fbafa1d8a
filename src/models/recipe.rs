use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ingredient::{
    canonicalize, deserialize_canonical, deserialize_canonical_vec, Ingredient, Quantity, Unit,
};
use super::tool::Tool;

/// One ingredient requirement within a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    /// Required amount; `None` means "to taste" / unquantified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    /// Optional ingredients never force a recipe into Missing status
    #[serde(default)]
    pub optional: bool,
    /// When set, an unquantified inventory amount does not count as
    /// sufficient for this requirement
    #[serde(default)]
    pub strict: bool,
}

impl RecipeIngredient {
    pub fn new(ingredient: Ingredient) -> Self {
        Self {
            ingredient,
            quantity: None,
            unit: None,
            optional: false,
            strict: false,
        }
    }

    pub fn with_quantity(mut self, amount: f64, unit: Unit) -> Self {
        self.quantity = Some(amount);
        self.unit = Some(unit);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// The requirement as a comparable quantity. A bare amount with no unit is
    /// read as a count ("2 eggs").
    pub fn required_quantity(&self) -> Option<Quantity> {
        self.quantity
            .map(|amount| Quantity::new(amount, self.unit.unwrap_or(Unit::Piece)))
    }
}

/// Whether a substitution hint names an ingredient or a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintContext {
    Ingredient,
    Tool,
}

/// Author-declared substitution for one of the recipe's own requirements.
/// Alternatives are ordered by author preference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionHint {
    #[serde(deserialize_with = "deserialize_canonical")]
    pub target: String,
    pub context: HintContext,
    #[serde(deserialize_with = "deserialize_canonical_vec")]
    pub alternatives: Vec<String>,
}

/// A catalog entry. Immutable once published; steps are opaque text the
/// engine never interprets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub hints: Vec<SubstitutionHint>,
}

impl Recipe {
    /// Creates an empty recipe with a fresh id
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: None,
            description: None,
            steps: Vec::new(),
            ingredients: Vec::new(),
            tools: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn add_ingredient(&mut self, ingredient: RecipeIngredient) {
        self.ingredients.push(ingredient);
    }

    pub fn add_tool(&mut self, tool: Tool) {
        if !self.tools.contains(&tool) {
            self.tools.push(tool);
        }
    }

    pub fn add_hint(&mut self, hint: SubstitutionHint) {
        self.hints.push(hint);
    }

    /// The author's hint for a target, if any. Target matching is by
    /// canonical name within the given context.
    pub fn hint_for(&self, target: &str, context: HintContext) -> Option<&SubstitutionHint> {
        let target = canonicalize(target);
        self.hints
            .iter()
            .find(|h| h.context == context && h.target == target)
    }

    /// Whether the recipe itself references the name in the given context
    pub fn references(&self, name: &str, context: HintContext) -> bool {
        let name = canonicalize(name);
        match context {
            HintContext::Ingredient => self
                .ingredients
                .iter()
                .any(|ri| ri.ingredient.name() == name),
            HintContext::Tool => self.tools.iter().any(|t| t.name() == name),
        }
    }
}
