// ============================================================
// DELIMITED RECORD
// ============================================================
// One input line split into ordered fields, quote-aware

use serde::{Deserialize, Serialize};

/// An ordered sequence of text fields parsed from one input line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    /// Split one line into fields.
    ///
    /// A quote character toggles quoted mode; the delimiter only seals a
    /// field outside quotes. Quote characters themselves are not part of the
    /// field value. Malformed quoting is not an error: an unterminated quote
    /// extends to the end of the line. The final buffer is always sealed as
    /// the last field, even when empty.
    pub fn parse(line: &str, delimiter: char, quote: char) -> Self {
        let mut fields = Vec::new();
        let mut buf = String::new();
        let mut in_quotes = false;

        for ch in line.chars() {
            if ch == quote {
                in_quotes = !in_quotes;
            } else if ch == delimiter && !in_quotes {
                fields.push(std::mem::take(&mut buf));
            } else {
                buf.push(ch);
            }
        }
        fields.push(buf);

        Self { fields }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Field at `index`, trimmed, or empty when absent.
    pub fn get_trimmed(&self, index: usize) -> String {
        self.get(index).map(str::trim).unwrap_or("").to_string()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Vec<String> {
        Record::parse(line, ',', '"').fields().to_vec()
    }

    #[test]
    fn test_plain_line_splits_on_delimiter() {
        assert_eq!(parse("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quoted_delimiter_is_not_a_boundary() {
        assert_eq!(parse("a,\"b,c\",d"), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn test_unterminated_quote_extends_to_end_of_line() {
        assert_eq!(parse("a,\"b,c"), vec!["a", "b,c"]);
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_field() {
        assert_eq!(parse("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_empty_line_is_one_empty_field() {
        assert_eq!(parse(""), vec![""]);
    }

    #[test]
    fn test_field_count_matches_unquoted_delimiters() {
        // Even number of quotes: fields = unquoted delimiter count + 1
        let line = "x,\"a,a\",y,\"b\"";
        assert_eq!(parse(line).len(), 4);
    }

    #[test]
    fn test_no_quotes_equivalent_to_plain_split() {
        let line = "1,Granola,oats and honey,tree nut,https://example.com";
        let split: Vec<_> = line.split(',').map(str::to_string).collect();
        assert_eq!(parse(line), split);
    }

    #[test]
    fn test_alternate_delimiter() {
        let record = Record::parse("a;b;\"c;d\"", ';', '"');
        assert_eq!(record.fields(), &["a", "b", "c;d"]);
    }
}
