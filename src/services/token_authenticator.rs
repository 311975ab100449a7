use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::ports::services::Authenticator;

/// Derive the bearer token clients present for a shared secret: the lowercase
/// hex SHA-1 digest of the secret.
pub fn derive_token(secret: &str) -> String {
    hex::encode(Sha1::digest(secret.as_bytes()))
}

/// Bearer authenticator over a single shared secret.
///
/// The expected token is derived once when the authenticator is built and is
/// read-only afterwards.
#[derive(Clone)]
pub struct TokenAuthenticator {
    expected: String,
}

impl TokenAuthenticator {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            expected: derive_token(secret),
        }
    }

    pub fn expected_token(&self) -> &str {
        &self.expected
    }
}

impl std::fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthenticator").finish_non_exhaustive()
    }
}

impl Authenticator for TokenAuthenticator {
    fn verify(&self, presented: &str) -> bool {
        presented.as_bytes().ct_eq(self.expected.as_bytes()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_token_is_hex_sha1() {
        assert_eq!(derive_token("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(derive_token(""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn test_verify_exact_match_only() {
        let auth = TokenAuthenticator::from_secret("abc");

        assert!(auth.verify("a9993e364706816aba3e25717850c26c9cd0d89d"));
        assert!(!auth.verify("A9993E364706816ABA3E25717850C26C9CD0D89D"));
        assert!(!auth.verify("a9993e364706816aba3e25717850c26c9cd0d89"));
        assert!(!auth.verify("abc"));
        assert!(!auth.verify(""));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let auth = TokenAuthenticator::from_secret("abc");
        assert!(!format!("{:?}", auth).contains(auth.expected_token()));
    }
}
