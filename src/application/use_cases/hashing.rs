use sha2::{Digest, Sha256};

/// Digest of a prompt + model pair, used to tie stored results back to the
/// exact input that produced them.
pub fn hash_prompt(prompt: &str, model: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update(b"\x1f");
    hasher.update(prompt.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(hash_prompt("a", "m"), hash_prompt("a", "m"));
    }

    #[test]
    fn test_digest_distinguishes_model() {
        assert_ne!(hash_prompt("a", "m1"), hash_prompt("a", "m2"));
    }
}
