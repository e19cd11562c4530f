//! CSRF state nonces for the authorization code flow
//!
//! A nonce is sent as the `state` query parameter of the authorization URL
//! and must come back unchanged with the authorization code.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;

/// Generate a random state token for CSRF protection
///
/// Returns a URL-safe base64-encoded random string of 32 bytes (43 characters).
#[must_use]
pub fn generate_state() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: [u8; 32] = rng.gen();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Compare the expected and returned state in constant time.
///
/// Runs over the full length of both inputs regardless of where they differ.
#[must_use]
pub fn validate_state(expected: &str, actual: &str) -> bool {
    let expected = expected.as_bytes();
    let actual = actual.as_bytes();
    let mut diff = expected.len() ^ actual.len();
    for i in 0..expected.len().max(actual.len()) {
        let a = expected.get(i).copied().unwrap_or(0);
        let b = actual.get(i).copied().unwrap_or(0);
        diff |= usize::from(a ^ b);
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::state.
    use super::*;

    /// Validates `generate_state` output shape and uniqueness.
    ///
    /// Assertions:
    /// - Confirms the token is 43 URL-safe characters.
    /// - Ensures two consecutive tokens differ.
    #[test]
    fn test_generate_state() {
        let first = generate_state();
        let second = generate_state();

        assert_eq!(first.len(), 43);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(first, second);
    }

    #[test]
    fn test_validate_state() {
        assert!(validate_state("xyz", "xyz"));
        assert!(!validate_state("xyz", "xyw"));
        assert!(!validate_state("xyz", "xy"));
        assert!(!validate_state("xyz", ""));
        assert!(validate_state("", ""));
    }
}
