//! Prompt construction for recipe generation and refinement.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::ProviderChain;

/// Optional user preferences attached to a recipe request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Upper bound on total cooking time, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<u32>,
}

impl RecipePreferences {
    /// Join the set fields into one line, e.g. `"Dietary: vegan, Cuisine: Italian"`.
    ///
    /// Blank strings and empty lists count as unset.
    pub fn to_prompt_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(dietary) = self.dietary.as_ref().filter(|d| !d.is_empty()) {
            parts.push(format!("Dietary: {}", dietary.join(", ")));
        }
        if let Some(cuisine) = non_blank(&self.cuisine) {
            parts.push(format!("Cuisine: {cuisine}"));
        }
        if let Some(difficulty) = non_blank(&self.difficulty) {
            parts.push(format!("Difficulty: {difficulty}"));
        }
        if let Some(minutes) = self.max_time {
            parts.push(format!("Max time: {minutes} minutes"));
        }
        parts.join(", ")
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// One generation call's worth of input. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct RecipeRequest {
    pub ingredients: Vec<String>,
    pub preferences: RecipePreferences,
}

/// The prompt sent to every text provider.
pub fn recipe_prompt(ingredients: &[String], preferences: &str) -> String {
    let preferences_line = if preferences.trim().is_empty() {
        String::new()
    } else {
        format!("Preferences: {preferences}")
    };
    format!(
        "\nIngredients: {}\n{}\n\nGenerate 2 detailed recipes:\n\
         - Title\n\
         - Required ingredients\n\
         - Steps\n\
         - Cooking time\n\
         - Serving size\n\
         - Calories\n",
        ingredients.join(", "),
        preferences_line,
    )
    .trim()
    .to_owned()
}

pub fn refinement_prompt(current_recipe: &str, feedback: &str) -> String {
    format!(
        "Current recipe: {current_recipe}\n\n\
         User feedback: {feedback}\n\n\
         Please refine the recipe based on the user's feedback."
    )
}

/// Turns recipe requests into prompts and runs them through the provider chain.
#[derive(Clone)]
pub struct RecipeComposer {
    chain: ProviderChain,
}

impl RecipeComposer {
    pub fn new(chain: ProviderChain) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    pub async fn compose(&self, request: &RecipeRequest) -> String {
        let preferences = request.preferences.to_prompt_text();
        debug!(
            ingredients = request.ingredients.len(),
            preferences = %preferences,
            "composing recipe request"
        );
        self.chain
            .generate(&recipe_prompt(&request.ingredients, &preferences))
            .await
    }

    /// Revise `current_recipe` according to `feedback`.
    pub async fn refine(&self, current_recipe: &str, feedback: &str) -> String {
        let preferences = refinement_prompt(current_recipe, feedback);
        self.chain.generate(&recipe_prompt(&[], &preferences)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::providers::TextProvider;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[test]
    fn preferences_join_in_fixed_order() {
        let prefs = RecipePreferences {
            dietary: Some(vec!["vegan".into(), "gluten-free".into()]),
            cuisine: Some("Italian".into()),
            difficulty: Some("easy".into()),
            max_time: Some(30),
        };
        assert_eq!(
            prefs.to_prompt_text(),
            "Dietary: vegan, gluten-free, Cuisine: Italian, Difficulty: easy, Max time: 30 minutes"
        );
    }

    #[test]
    fn unset_and_blank_preferences_are_skipped() {
        let prefs = RecipePreferences {
            dietary: Some(Vec::new()),
            cuisine: Some("  ".into()),
            difficulty: None,
            max_time: None,
        };
        assert_eq!(prefs.to_prompt_text(), "");

        let only_cuisine = RecipePreferences {
            cuisine: Some("Italian".into()),
            ..RecipePreferences::default()
        };
        assert_eq!(only_cuisine.to_prompt_text(), "Cuisine: Italian");
    }

    #[test]
    fn prompt_includes_ingredients_and_preferences() {
        let prompt = recipe_prompt(&["egg".into(), "flour".into()], "Cuisine: Italian");
        assert!(prompt.starts_with("Ingredients: egg, flour\nPreferences: Cuisine: Italian"));
        assert!(prompt.contains("Generate 2 detailed recipes:"));
        assert!(prompt.ends_with("- Calories"));
    }

    #[test]
    fn prompt_omits_blank_preferences_line() {
        let prompt = recipe_prompt(&["rice".into()], "");
        assert!(!prompt.contains("Preferences:"));
        assert!(prompt.starts_with("Ingredients: rice\n"));
    }

    #[test]
    fn preferences_deserialize_from_camel_case() {
        let prefs: RecipePreferences =
            serde_json::from_str(r#"{"cuisine":"Thai","maxTime":20,"dietary":["vegetarian"]}"#).unwrap();
        assert_eq!(prefs.cuisine.as_deref(), Some("Thai"));
        assert_eq!(prefs.max_time, Some(20));
        assert_eq!(prefs.dietary, Some(vec!["vegetarian".to_owned()]));
    }

    #[derive(Default)]
    struct Recording {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextProvider for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(prompt.to_owned());
            Ok("Recipe 1: Pasta".into())
        }
    }

    #[tokio::test]
    async fn refine_sends_feedback_with_empty_ingredient_list() {
        let recorder = Arc::new(Recording::default());
        let composer = RecipeComposer::new(ProviderChain::new(vec![
            recorder.clone() as Arc<dyn TextProvider>
        ]));

        let out = composer.refine("Pasta with eggs", "make it spicier").await;
        assert_eq!(out, "Recipe 1: Pasta");

        let prompts = recorder.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].starts_with("Ingredients: \nPreferences: Current recipe: Pasta with eggs"));
        assert!(prompts[0].contains("User feedback: make it spicier"));
    }

    #[tokio::test]
    async fn compose_forwards_preferences() {
        let recorder = Arc::new(Recording::default());
        let composer = RecipeComposer::new(ProviderChain::new(vec![
            recorder.clone() as Arc<dyn TextProvider>
        ]));
        let request = RecipeRequest {
            ingredients: vec!["egg".into(), "flour".into()],
            preferences: RecipePreferences {
                cuisine: Some("Italian".into()),
                ..RecipePreferences::default()
            },
        };
        composer.compose(&request).await;

        let prompts = recorder.prompts.lock().unwrap();
        assert!(prompts[0].contains("Preferences: Cuisine: Italian"));
    }
}
