//! The one-way digest stored in place of a user's password.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The hex encoded SHA-256 digest of a password.
///
/// Two digests are equal iff the passwords they were made from are equal, so
/// logging in is a plain equality check against the stored digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Compute the digest of a plain text password.
    pub fn from_raw_password(raw_password: &str) -> Self {
        let digest = Sha256::digest(raw_password.as_bytes());

        Self(format!("{digest:x}"))
    }

    /// Wrap a digest that was read back from the database.
    ///
    /// The caller should ensure that `digest` was produced by [PasswordDigest::from_raw_password].
    pub fn new_unchecked(digest: &str) -> Self {
        Self(digest.to_owned())
    }
}

impl AsRef<str> for PasswordDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
