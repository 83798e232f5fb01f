//! Credential hashing and bearer token signing.
//!
//! Passwords are stored as hex-encoded SHA-256 over a server-wide salt plus
//! the password, compared in constant time. Tokens are
//! `{user_id}.{expires_unix}.{hex_signature}` where the signature is
//! HMAC-SHA256 over `"{user_id}\n{expires_unix}"` under the server secret.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a password with the server-wide salt.
#[must_use]
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"\n");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time check of a candidate password against a stored hash.
#[must_use]
pub fn verify_password(salt: &str, password: &str, stored_hash: &str) -> bool {
    let candidate = hash_password(salt, password);
    candidate.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

/// Signs and verifies expiring bearer tokens.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[redacted]")
            .finish()
    }
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    fn signature(&self, user_id: i64, expires_unix: i64) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("hmac accepts keys of any length");
        mac.update(format!("{user_id}\n{expires_unix}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Issues a token for `user_id` valid for `ttl_secs` from now.
    #[must_use]
    pub fn mint(&self, user_id: i64, ttl_secs: u64) -> String {
        let expires_unix = Utc::now().timestamp() + i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        let sig = self.signature(user_id, expires_unix);
        format!("{user_id}.{expires_unix}.{sig}")
    }

    /// Returns the user id if the token is well-formed, unexpired, and
    /// carries a valid signature.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<i64> {
        let mut parts = token.splitn(3, '.');
        let user_id: i64 = parts.next()?.parse().ok()?;
        let expires_unix: i64 = parts.next()?.parse().ok()?;
        let sig = parts.next()?;

        if expires_unix <= Utc::now().timestamp() {
            return None;
        }

        let expected = self.signature(user_id, expires_unix);
        let valid: bool = expected.as_bytes().ct_eq(sig.as_bytes()).into();
        valid.then_some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_verify_accepts_correct_password() {
        let hash = hash_password("salt", "hunter2");
        assert!(verify_password("salt", "hunter2", &hash));
    }

    #[test]
    fn password_verify_rejects_wrong_password_and_salt() {
        let hash = hash_password("salt", "hunter2");
        assert!(!verify_password("salt", "hunter3", &hash));
        assert!(!verify_password("other-salt", "hunter2", &hash));
    }

    #[test]
    fn token_round_trip_returns_user_id() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.mint(42, 3600);
        assert_eq!(signer.verify(&token), Some(42));
    }

    #[test]
    fn token_rejects_tampered_user_id() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.mint(42, 3600);
        let tampered = token.replacen("42.", "43.", 1);
        assert_eq!(signer.verify(&tampered), None);
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let token = TokenSigner::new("secret-a").mint(7, 3600);
        assert_eq!(TokenSigner::new("secret-b").verify(&token), None);
    }

    #[test]
    fn token_rejects_expired() {
        let signer = TokenSigner::new("test-secret");
        let expired_at = Utc::now().timestamp() - 10;
        let sig = signer.signature(7, expired_at);
        let token = format!("7.{expired_at}.{sig}");
        assert_eq!(signer.verify(&token), None);
    }

    #[test]
    fn token_rejects_garbage() {
        let signer = TokenSigner::new("test-secret");
        assert_eq!(signer.verify(""), None);
        assert_eq!(signer.verify("not-a-token"), None);
        assert_eq!(signer.verify("1.2"), None);
    }
}
