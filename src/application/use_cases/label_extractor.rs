//! Allergen label extraction from free-form model output
//!
//! Cleans the raw text, then performs case-insensitive whole-word matching
//! against the controlled vocabulary.

use crate::domain::vocabulary::{ControlledVocabulary, EMPTY_SENTINEL};
use crate::infrastructure::response::clean_model_response;

/// Vocabulary terms present in the output as standalone words, in canonical
/// order.
pub fn extract_label_set(raw_output: &str, vocabulary: &ControlledVocabulary) -> Vec<String> {
    let cleaned = clean_model_response(raw_output).to_lowercase();
    vocabulary
        .matches_in(&cleaned)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Render the extracted labels as a comma-joined string, or the EMPTY
/// sentinel when nothing matched. The sentinel keeps "determined to be
/// empty" distinct from missing data downstream.
pub fn extract_labels(raw_output: &str, vocabulary: &ControlledVocabulary) -> String {
    let labels = extract_label_set(raw_output, vocabulary);
    if labels.is_empty() {
        EMPTY_SENTINEL.to_string()
    } else {
        labels.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(raw: &str) -> String {
        extract_labels(raw, ControlledVocabulary::standard())
    }

    #[test]
    fn test_whole_word_matching() {
        assert_eq!(extract("fish and chips"), "fish");
        assert_eq!(extract("shellfish stew"), "shellfish");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(extract("MILK"), "milk");
        assert_eq!(extract("Milk and Wheat"), "milk, wheat");
    }

    #[test]
    fn test_role_marker_stripped_before_matching() {
        assert_eq!(extract("Assistant: soy, sesame"), "soy, sesame");
    }

    #[test]
    fn test_empty_output_maps_to_sentinel() {
        assert_eq!(extract(""), "EMPTY");
        assert_eq!(extract("no allergens detected here"), "EMPTY");
    }

    #[test]
    fn test_model_echoing_sentinel_maps_to_sentinel() {
        assert_eq!(extract("EMPTY"), "EMPTY");
    }

    #[test]
    fn test_canonical_render_order() {
        // The model may answer in any order; rendering is stable
        assert_eq!(extract("sesame, egg, milk"), "milk, egg, sesame");
    }

    #[test]
    fn test_bpe_artifacts_ignored() {
        assert_eq!(extract("Ġmilk,Ġsoy"), "milk, soy");
    }
}
