// ============================================================
// CONTROLLED VOCABULARY
// ============================================================
// The closed set of allergen labels the harness recognizes

use once_cell::sync::Lazy;
use regex::Regex;

/// The nine recognized allergen labels, in canonical render order.
pub const ALLERGEN_TERMS: &[&str] = &[
    "milk",
    "egg",
    "peanut",
    "tree nut",
    "wheat",
    "soy",
    "fish",
    "shellfish",
    "sesame",
];

/// Sentinel rendered when no vocabulary term is found.
/// Distinguishes "determined to be empty" from missing data.
pub const EMPTY_SENTINEL: &str = "EMPTY";

static STANDARD: Lazy<ControlledVocabulary> =
    Lazy::new(|| ControlledVocabulary::new(ALLERGEN_TERMS.iter().map(|t| t.to_string())));

/// A fixed vocabulary with one whole-word matcher compiled per term.
///
/// Matching is case-insensitive and word-bounded, so "fish" never matches
/// inside "shellfish".
pub struct ControlledVocabulary {
    terms: Vec<(String, Regex)>,
}

impl ControlledVocabulary {
    pub fn new(terms: impl IntoIterator<Item = String>) -> Self {
        let terms = terms
            .into_iter()
            .map(|term| {
                let pattern = format!(r"\b{}\b", regex::escape(&term.to_lowercase()));
                // Patterns are built from escaped literals; compilation cannot fail.
                let matcher = Regex::new(&pattern).expect("escaped term pattern");
                (term.to_lowercase(), matcher)
            })
            .collect();

        Self { terms }
    }

    /// The standard nine-term allergen vocabulary.
    pub fn standard() -> &'static ControlledVocabulary {
        &STANDARD
    }

    /// Terms in canonical order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|(term, _)| term.as_str())
    }

    /// Whole-word containment test against already-lowercased text.
    pub fn matches_in<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.terms
            .iter()
            .filter(|(_, matcher)| matcher.is_match(text))
            .map(|(term, _)| term.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
