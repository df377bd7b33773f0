//! Checksum calculation for menu-plan deduplication.

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 checksum of a serialized menu-plan payload.
///
/// The payload is re-serialized by the service layer before hashing so that
/// key order and whitespace do not affect the digest.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = r#"{"menu_date":"2025-03-10","recipe_ids":[1,2]}"#;
        assert_eq!(calculate_checksum(content), calculate_checksum(content));
    }

    #[test]
    fn test_different_content_different_checksum() {
        let a = calculate_checksum(r#"{"recipe_ids":[1]}"#);
        let b = calculate_checksum(r#"{"recipe_ids":[2]}"#);
        assert_ne!(a, b);
    }

    #[test]
    fn test_checksum_is_hex_sha256() {
        let digest = calculate_checksum("x");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
