// ============================================================
// FOOD CSV LOADER
// ============================================================
// Parse the food dataset file with encoding detection and
// permissive row handling

use std::path::Path;

use tracing::{debug, warn};

use crate::domain::csv::Record;
use crate::domain::error::{AppError, Result};
use crate::domain::food_item::FoodItem;

/// Minimum fields a data line must carry: id, name, ingredients,
/// raw allergens, link. The sixth (mapped allergens) is optional.
const MIN_FIELDS: usize = 5;

/// Loader for the food dataset CSV.
pub struct FoodCsvLoader {
    /// Field delimiter (default: comma)
    delimiter: char,

    /// Quote character toggling quoted regions
    quote: char,
}

impl Default for FoodCsvLoader {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
        }
    }
}

impl FoodCsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load food items from a file, detecting the encoding first.
    pub fn load_file(&self, path: &Path) -> Result<Vec<FoodItem>> {
        let content = read_with_encoding_detection(path)?;
        self.load_content(&content)
    }

    /// Load food items from already-decoded content.
    ///
    /// The header line is skipped. Lines with fewer than five fields are
    /// skipped with a warning, never fatal.
    pub fn load_content(&self, content: &str) -> Result<Vec<FoodItem>> {
        let mut items = Vec::new();

        for (line_no, line) in content.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            let record = Record::parse(line, self.delimiter, self.quote);
            if record.len() < MIN_FIELDS {
                warn!(
                    line = line_no + 1,
                    fields = record.len(),
                    "Skipping short row in food CSV"
                );
                continue;
            }

            let mapped = record.get(5).map(|f| f.trim().to_string());
            items.push(FoodItem::new(
                record.get_trimmed(0),
                record.get_trimmed(1),
                record.get_trimmed(2),
                record.get_trimmed(3),
                mapped,
                record.get_trimmed(4),
            ));
        }

        debug!(count = items.len(), "Loaded food items from CSV");
        Ok(items)
    }

    /// Load a file with automatic delimiter detection.
    pub fn load_file_auto_detect(path: &Path) -> Result<Vec<FoodItem>> {
        let content = read_with_encoding_detection(path)?;
        let delimiter = Self::detect_delimiter(&content);
        Self::new().with_delimiter(delimiter).load_content(&content)
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe).
    ///
    /// Scores each candidate by per-line count consistency over a sample.
    pub fn detect_delimiter(content: &str) -> char {
        let candidates = [',', ';', '\t', '|'];

        let sample_lines: Vec<_> = content.lines().take(10).collect();
        if sample_lines.is_empty() {
            return ',';
        }

        let mut best_delimiter = ',';
        let mut best_score = 0.0f32;

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.chars().filter(|&c| c == delimiter).count())
                .collect();

            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());
            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

/// Read a file as UTF-8, falling back to Windows-1252 for legacy exports.
fn read_with_encoding_detection(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;

    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(err) => {
            let bytes = err.into_bytes();
            let (decoded, _, had_errors) = encoding_rs::WINDOWS_1252.decode(&bytes);
            if had_errors {
                warn!(path = %path.display(), "Input is neither UTF-8 nor Windows-1252; replacing invalid bytes");
            }
            Ok(decoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FOOD_CSV: &str = "\
id,name,ingredients,allergensraw,link,allergensmapped
1,Granola Bar,\"oats, honey, almonds\",almond,https://example.com/1,tree nut
2,Fish Cakes,\"cod, potato, egg\",\"cod, egg\",https://example.com/2,\"fish, egg\"
3,Water,spring water,,https://example.com/3,
broken line
4,Soy Latte,\"soy milk, espresso\",soya,https://example.com/4";

    #[test]
    fn test_load_skips_header_and_short_rows() {
        let items = FoodCsvLoader::new().load_content(FOOD_CSV).unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].id, "1");
        assert_eq!(items[0].ingredients, "oats, honey, almonds");
    }

    #[test]
    fn test_quoted_fields_keep_embedded_commas() {
        let items = FoodCsvLoader::new().load_content(FOOD_CSV).unwrap();
        assert_eq!(items[1].allergens_raw, "cod, egg");
        assert_eq!(items[1].allergens_mapped, "fish, egg");
    }

    #[test]
    fn test_missing_mapped_column_falls_back_to_raw() {
        let items = FoodCsvLoader::new().load_content(FOOD_CSV).unwrap();
        // Row 4 has only five fields
        assert_eq!(items[3].name, "Soy Latte");
        assert_eq!(items[3].allergens_mapped, "soya");
    }

    #[test]
    fn test_empty_mapped_field_falls_back_to_raw() {
        let items = FoodCsvLoader::new().load_content(FOOD_CSV).unwrap();
        // Row 3 has an empty raw label and an empty mapped field
        assert_eq!(items[2].allergens_raw, "");
        assert_eq!(items[2].allergens_mapped, "");
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(FoodCsvLoader::detect_delimiter("a,b,c\nd,e,f"), ',');
        assert_eq!(FoodCsvLoader::detect_delimiter("a;b;c\nd;e;f"), ';');
    }

    #[test]
    fn test_load_file_auto_detect() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "id;name;ingredients;allergens;link\n7;Tea;black tea;;https://example.com/7").unwrap();

        let items = FoodCsvLoader::load_file_auto_detect(file.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Tea");
    }
}
