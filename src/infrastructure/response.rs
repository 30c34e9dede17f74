use once_cell::sync::Lazy;
use regex::Regex;

static ROLE_MARKER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(assistant|system|user)\s*:").unwrap());

static BPE_ARTIFACT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new("[Ġ\"]").unwrap());

static CODE_FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[a-z]*").unwrap());

static MULTIPLE_SPACES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Cleans raw model output by removing role markers and tokenizer artifacts
/// before label extraction.
pub fn clean_model_response(response: &str) -> String {
    let mut cleaned = response.to_string();

    // Remove chat role prefixes the model sometimes echoes back
    cleaned = ROLE_MARKER_PATTERN.replace_all(&cleaned, "").to_string();

    // Remove byte-pair artifacts and stray quotes
    cleaned = BPE_ARTIFACT_PATTERN.replace_all(&cleaned, "").to_string();

    // Remove markdown code fences
    cleaned = CODE_FENCE_PATTERN.replace_all(&cleaned, "").to_string();

    // Collapse runs of spaces left behind by the removals
    cleaned = MULTIPLE_SPACES_PATTERN.replace_all(&cleaned, " ").to_string();

    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_role_markers() {
        let input = "Assistant: milk, soy";
        assert_eq!(clean_model_response(input), "milk, soy");
    }

    #[test]
    fn test_strips_role_markers_case_insensitive() {
        let input = "SYSTEM: User: wheat";
        assert_eq!(clean_model_response(input), "wheat");
    }

    #[test]
    fn test_strips_bpe_artifacts() {
        let input = "Ġmilk,Ġ\"egg\"";
        assert_eq!(clean_model_response(input), "milk,egg");
    }

    #[test]
    fn test_strips_code_fences() {
        let input = "```\nmilk\n```";
        assert_eq!(clean_model_response(input), "milk");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(clean_model_response("peanut, sesame"), "peanut, sesame");
    }
}
