// ============================================================
// FOOD ITEM TYPES
// ============================================================
// Data structures for the allergen evaluation dataset

use serde::{Deserialize, Serialize};

/// One food product loaded from the input CSV.
///
/// Immutable once constructed; the mapped allergen label falls back to the
/// raw label when the source row has no sixth column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    /// Source row identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-text ingredient list fed to the model
    pub ingredients: String,

    /// Allergen label as it appears in the source data
    pub allergens_raw: String,

    /// Canonical allergen label used as the expected answer
    pub allergens_mapped: String,

    /// Reference link back to the source product page
    pub link: String,
}

impl FoodItem {
    pub fn new(
        id: String,
        name: String,
        ingredients: String,
        allergens_raw: String,
        allergens_mapped: Option<String>,
        link: String,
    ) -> Self {
        let allergens_mapped = match allergens_mapped {
            Some(mapped) if !mapped.trim().is_empty() => mapped,
            _ => allergens_raw.clone(),
        };

        Self {
            id,
            name,
            ingredients,
            allergens_raw,
            allergens_mapped,
            link,
        }
    }

    /// Expected allergen terms as a normalized set-like list.
    /// Lowercased, trimmed, with empty entries and the "empty" marker removed.
    pub fn expected_terms(&self) -> Vec<String> {
        normalize_terms(&self.allergens_mapped)
    }
}

/// Split a comma-joined label string into normalized terms.
pub fn normalize_terms(label: &str) -> Vec<String> {
    label
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && t != "empty")
        .collect()
}

/// A named slice of the full item list, selectable for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub items: Vec<FoodItem>,
}

impl Dataset {
    pub fn new(name: String, items: Vec<FoodItem>) -> Self {
        Self { name, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
