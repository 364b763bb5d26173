//! Deterministic content fingerprints.

use crate::FilesError;
use sha2::{Digest, Sha256};

/// Number of hex characters used when a fingerprint is embedded in a file name.
pub const SHORT_FINGERPRINT_LEN: usize = 8;

/// SHA-256 digest of a document's bytes, held as 64 lowercase hex characters.
///
/// The same bytes always produce the same fingerprint, so a collision suffix built from
/// [`ContentFingerprint::short`] is reproducible and auditable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    /// Computes the fingerprint of `bytes`.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self(hex::encode(digest))
    }

    /// Validates a previously recorded fingerprint.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidPath` unless `input` is 64 lowercase hex characters.
    pub fn parse(input: &str) -> Result<Self, FilesError> {
        let ok = input.len() == 64
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !ok {
            return Err(FilesError::InvalidPath(
                "fingerprint must be 64 lowercase hex characters".into(),
            ));
        }
        Ok(Self(input.to_owned()))
    }

    /// Full hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters of the digest used as a file-name suffix.
    pub fn short(&self) -> &str {
        &self.0[..SHORT_FINGERPRINT_LEN]
    }
}

impl std::fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for ContentFingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ContentFingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ContentFingerprint::parse(&s).map_err(serde::de::Error::custom)
    }
}
