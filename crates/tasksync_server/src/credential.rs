//! Credential records and the fail-closed verifier.

use sha2::{Digest, Sha256};

/// A stored password credential: salted SHA-256 digest.
///
/// Derivation happens once at registration; verification is a pure
/// comparison with no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    salt: [u8; 16],
    digest: [u8; 32],
}

impl StoredCredential {
    /// Derives a credential from a plaintext password with a fresh salt.
    pub fn derive(password: &str) -> Self {
        Self::derive_with_salt(password, rand::random())
    }

    /// Derives a credential with an explicit salt.
    pub fn derive_with_salt(password: &str, salt: [u8; 16]) -> Self {
        Self {
            salt,
            digest: digest_of(password, &salt),
        }
    }

    /// Returns true if `password` matches this credential.
    pub fn matches(&self, password: &str) -> bool {
        digest_of(password, &self.salt) == self.digest
    }
}

fn digest_of(password: &str, salt: &[u8; 16]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique username.
    pub username: String,
    /// Mail address.
    pub mail: String,
    /// Password credential.
    pub credential: StoredCredential,
}

/// Pure credential check.
///
/// Fails closed: a missing stored record or any non-matching field
/// yields `false`, never an error that could be mistaken for success.
pub fn verify_credentials(
    username: &str,
    password: &str,
    mail: &str,
    record: Option<&UserRecord>,
) -> bool {
    let Some(record) = record else {
        return false;
    };
    if username.is_empty() || password.is_empty() || mail.is_empty() {
        return false;
    }
    record.username == username && record.mail == mail && record.credential.matches(password)
}
