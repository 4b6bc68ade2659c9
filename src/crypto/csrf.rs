use crate::error::Result;
use base64::{engine::general_purpose, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;

/// The size of the CSRF token in bytes.
const CSRF_TOKEN_SIZE: usize = 32;

/// Generates a new random CSRF token.
///
/// # Returns
///
/// A URL-safe base64-encoded CSRF token.
pub fn generate_csrf_token() -> Result<String> {
    let mut token = [0u8; CSRF_TOKEN_SIZE];
    OsRng.fill_bytes(&mut token);

    Ok(general_purpose::URL_SAFE_NO_PAD.encode(token))
}

/// Compares two CSRF tokens in constant time.
///
/// Length is not secret (tokens are fixed-size), so the early return on a
/// length mismatch leaks nothing useful.
pub fn tokens_match(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_url_safe() {
        let a = generate_csrf_token().unwrap();
        let b = generate_csrf_token().unwrap();

        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn matching_is_exact() {
        let token = generate_csrf_token().unwrap();
        assert!(tokens_match(&token, &token));
        assert!(!tokens_match(&token, &generate_csrf_token().unwrap()));
        assert!(!tokens_match(&token, &token[..token.len() - 1]));
    }
}
