//! Opaque refresh tokens. Only the SHA-256 digest is persisted.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A freshly minted refresh token.
pub struct RefreshToken {
    /// Handed to the client once and never stored.
    pub plaintext: String,
    pub hash: String,
}

impl RefreshToken {
    pub fn generate() -> Self {
        let plaintext = Uuid::new_v4().simple().to_string();
        let hash = digest(&plaintext);
        Self { plaintext, hash }
    }
}

/// Hex SHA-256 of a presented token, for lookup.
pub fn digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_digest_of_plaintext() {
        let token = RefreshToken::generate();
        assert_eq!(token.hash, digest(&token.plaintext));
        assert_eq!(token.hash.len(), 64);
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(RefreshToken::generate().plaintext, RefreshToken::generate().plaintext);
    }
}
