use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{canonicalize, HintContext, Recipe};

/// Recipe-scoped hints are scored by author rank: 0.9 for the first
/// alternative, stepping down 0.1 per rank, floored at 0.1.
const HINT_BASE_SCORE: f64 = 0.9;
const HINT_RANK_STEP: f64 = 0.1;
const HINT_SCORE_FLOOR: f64 = 0.1;

/// A substitution candidate with its compatibility score in [0, 1]
/// (1 = perfect swap, lower degrades the recipe).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAlternative {
    #[serde(deserialize_with = "crate::models::deserialize_canonical")]
    pub name: String,
    pub score: f64,
}

impl RankedAlternative {
    pub fn new(name: &str, score: f64) -> Self {
        Self {
            name: canonicalize(name),
            score,
        }
    }
}

/// Catalog-wide fallback substitution rules, one ranked alternative list per
/// (target, context). Recipe-scoped hints take precedence at resolve time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubstitutionTable {
    ingredients: BTreeMap<String, Vec<RankedAlternative>>,
    tools: BTreeMap<String, Vec<RankedAlternative>>,
}

impl SubstitutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn rules(&self, context: HintContext) -> &BTreeMap<String, Vec<RankedAlternative>> {
        match context {
            HintContext::Ingredient => &self.ingredients,
            HintContext::Tool => &self.tools,
        }
    }

    /// Replaces the global rule for a target. Validation happens at catalog
    /// build time; this is the storage primitive.
    pub(crate) fn insert(
        &mut self,
        target: &str,
        context: HintContext,
        alternatives: Vec<RankedAlternative>,
    ) {
        let rules = match context {
            HintContext::Ingredient => &mut self.ingredients,
            HintContext::Tool => &mut self.tools,
        };
        rules.insert(canonicalize(target), alternatives);
    }

    /// Looks up viable substitutes for a target, best first.
    ///
    /// Recipe-scoped hints come first in author order with rank-derived
    /// scores, then global rules not already listed. The target itself and
    /// any excluded alternative never appear. An empty result means "no
    /// known swap" and is not an error.
    pub fn resolve(
        &self,
        target: &str,
        context: HintContext,
        recipe_scope: Option<&Recipe>,
        exclusions: &BTreeSet<String>,
    ) -> Vec<RankedAlternative> {
        let target = canonicalize(target);
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(target.clone());

        let mut alternatives = Vec::new();

        if let Some(hint) = recipe_scope.and_then(|r| r.hint_for(&target, context)) {
            for (rank, alternative) in hint.alternatives.iter().enumerate() {
                if seen.contains(alternative) || exclusions.contains(alternative) {
                    continue;
                }
                seen.insert(alternative.clone());
                let score = (HINT_BASE_SCORE - HINT_RANK_STEP * rank as f64).max(HINT_SCORE_FLOOR);
                alternatives.push(RankedAlternative {
                    name: alternative.clone(),
                    score,
                });
            }
        }

        if let Some(global) = self.rules(context).get(&target) {
            for alternative in global {
                if seen.contains(&alternative.name) || exclusions.contains(&alternative.name) {
                    continue;
                }
                seen.insert(alternative.name.clone());
                alternatives.push(alternative.clone());
            }
        }

        alternatives
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, RecipeIngredient, SubstitutionHint};

    fn table_with_butter_rules() -> SubstitutionTable {
        let mut table = SubstitutionTable::new();
        table.insert(
            "butter",
            HintContext::Ingredient,
            vec![
                RankedAlternative::new("margarine", 0.8),
                RankedAlternative::new("coconut oil", 0.6),
            ],
        );
        table
    }

    fn recipe_with_butter_hint() -> Recipe {
        let mut recipe = Recipe::new("Shortbread");
        recipe.add_ingredient(RecipeIngredient::new(Ingredient::new("butter")));
        recipe.add_hint(SubstitutionHint {
            target: "butter".to_string(),
            context: HintContext::Ingredient,
            alternatives: vec!["ghee".to_string(), "margarine".to_string()],
        });
        recipe
    }

    #[test]
    fn test_global_rules_only() {
        let table = table_with_butter_rules();
        let alternatives = table.resolve("Butter", HintContext::Ingredient, None, &BTreeSet::new());
        assert_eq!(alternatives.len(), 2);
        assert_eq!(alternatives[0].name, "margarine");
        assert_eq!(alternatives[0].score, 0.8);
    }

    #[test]
    fn test_recipe_hints_take_precedence() {
        let table = table_with_butter_rules();
        let recipe = recipe_with_butter_hint();
        let alternatives = table.resolve(
            "butter",
            HintContext::Ingredient,
            Some(&recipe),
            &BTreeSet::new(),
        );

        // ghee (hint rank 0), margarine (hint rank 1, global copy deduplicated),
        // then the remaining global rule
        assert_eq!(alternatives.len(), 3);
        assert_eq!(alternatives[0].name, "ghee");
        assert_eq!(alternatives[0].score, 0.9);
        assert_eq!(alternatives[1].name, "margarine");
        assert!((alternatives[1].score - 0.8).abs() < 1e-9);
        assert_eq!(alternatives[2].name, "coconut oil");
        assert_eq!(alternatives[2].score, 0.6);
    }

    #[test]
    fn test_hint_scores_floor() {
        let mut recipe = Recipe::new("Stew");
        recipe.add_ingredient(RecipeIngredient::new(Ingredient::new("beef")));
        recipe.add_hint(SubstitutionHint {
            target: "beef".to_string(),
            context: HintContext::Ingredient,
            alternatives: (0..12).map(|i| format!("alt {}", i)).collect(),
        });

        let table = SubstitutionTable::new();
        let alternatives = table.resolve(
            "beef",
            HintContext::Ingredient,
            Some(&recipe),
            &BTreeSet::new(),
        );
        assert_eq!(alternatives.len(), 12);
        assert_eq!(alternatives.last().unwrap().score, HINT_SCORE_FLOOR);
    }

    #[test]
    fn test_excluded_alternatives_filtered() {
        let table = table_with_butter_rules();
        let mut exclusions = BTreeSet::new();
        exclusions.insert("margarine".to_string());

        let alternatives = table.resolve("butter", HintContext::Ingredient, None, &exclusions);
        assert_eq!(alternatives.len(), 1);
        assert_eq!(alternatives[0].name, "coconut oil");
    }

    #[test]
    fn test_target_never_its_own_alternative() {
        let mut table = SubstitutionTable::new();
        table.insert(
            "flour",
            HintContext::Ingredient,
            vec![
                RankedAlternative::new("flour", 1.0),
                RankedAlternative::new("spelt flour", 0.7),
            ],
        );

        let alternatives = table.resolve("flour", HintContext::Ingredient, None, &BTreeSet::new());
        assert_eq!(alternatives.len(), 1);
        assert_eq!(alternatives[0].name, "spelt flour");
    }

    #[test]
    fn test_no_rule_is_empty_not_error() {
        let table = SubstitutionTable::new();
        let alternatives = table.resolve("saffron", HintContext::Ingredient, None, &BTreeSet::new());
        assert!(alternatives.is_empty());
    }

    #[test]
    fn test_contexts_are_independent() {
        let mut table = SubstitutionTable::new();
        table.insert(
            "oven",
            HintContext::Tool,
            vec![RankedAlternative::new("air fryer", 0.5)],
        );

        assert!(table
            .resolve("oven", HintContext::Ingredient, None, &BTreeSet::new())
            .is_empty());
        assert_eq!(
            table
                .resolve("oven", HintContext::Tool, None, &BTreeSet::new())
                .len(),
            1
        );
    }
}
