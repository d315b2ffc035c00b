//! ID and token generation utilities.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use uuid::Uuid;

/// Number of random bytes in a survey token (256 bits of entropy).
const TOKEN_BYTES: usize = 32;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new response id (random UUID v4).
    #[must_use]
    pub fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Generate an opaque survey token.
    ///
    /// 32 bytes from the OS RNG, URL-safe base64 without padding, so the
    /// token can appear directly in a `/survey/{token}` path.
    #[must_use]
    pub fn generate_token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_response_id() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 36); // UUID with hyphens
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_token_length_and_charset() {
        let id_gen = IdGenerator::new();
        let token = id_gen.generate_token();

        // 32 bytes -> 43 base64 chars without padding
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generate_token_unique() {
        let id_gen = IdGenerator::new();
        assert_ne!(id_gen.generate_token(), id_gen.generate_token());
    }
}
