//! Prompt construction for allergen detection
//!
//! Builds the fixed instruction prompt around an ingredient list

use std::fmt::Write;

use crate::domain::vocabulary::{ControlledVocabulary, EMPTY_SENTINEL};

/// Builds the allergen-detection prompt.
pub struct PromptBuilder<'v> {
    vocabulary: &'v ControlledVocabulary,
}

impl<'v> PromptBuilder<'v> {
    pub fn new(vocabulary: &'v ControlledVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Build the user prompt for one ingredient list.
    ///
    /// The model is instructed to answer with a comma-separated subset of
    /// the vocabulary, or the EMPTY sentinel when nothing applies.
    pub fn build(&self, ingredients: &str) -> String {
        let allowed = self.vocabulary.terms().collect::<Vec<_>>().join(", ");

        let mut prompt = String::new();
        writeln!(prompt, "Task: Detect food allergens.").unwrap();
        writeln!(prompt).unwrap();
        writeln!(prompt, "Ingredients:").unwrap();
        writeln!(prompt, "{}", ingredients).unwrap();
        writeln!(prompt).unwrap();
        writeln!(prompt, "Allowed allergens:").unwrap();
        writeln!(prompt, "{}", allowed).unwrap();
        writeln!(prompt).unwrap();
        writeln!(prompt, "Rules:").unwrap();
        writeln!(prompt, "- Output ONLY a comma-separated list of allergens.").unwrap();
        writeln!(prompt, "- If none are present, output {}.", EMPTY_SENTINEL).unwrap();
        writeln!(prompt, "- Do not explain.").unwrap();
        write!(prompt, "- Do not add extra words.").unwrap();

        prompt
    }
}

impl Default for PromptBuilder<'static> {
    fn default() -> Self {
        Self::new(ControlledVocabulary::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_task_and_ingredients() {
        let prompt = PromptBuilder::default().build("milk powder, cocoa");
        assert!(prompt.starts_with("Task: Detect food allergens."));
        assert!(prompt.contains("milk powder, cocoa"));
    }

    #[test]
    fn test_prompt_lists_full_vocabulary() {
        let prompt = PromptBuilder::default().build("water");
        assert!(prompt
            .contains("milk, egg, peanut, tree nut, wheat, soy, fish, shellfish, sesame"));
    }

    #[test]
    fn test_prompt_carries_empty_rule() {
        let prompt = PromptBuilder::default().build("water");
        assert!(prompt.contains("If none are present, output EMPTY."));
    }
}
