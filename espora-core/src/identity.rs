//! Identity types for checklist entities

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::borrow::Borrow;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Catalog-unique identifier of a checklist item (e.g. `"A1"`).
    ItemId
);

string_id!(
    /// Identifier of a catalog section (e.g. `"estrategia"`).
    SectionId
);

string_id!(
    /// Identifier of a user in the directory.
    UserId
);

/// SHA-256 digest of a persisted blob, used to detect external writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Compute the fingerprint of raw content.
pub fn fingerprint(content: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    Fingerprint(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = ItemId::new("A1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"A1\"");

        let mut map = BTreeMap::new();
        map.insert(ItemId::from("A1"), true);
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"A1":true}"#);

        let back: BTreeMap<ItemId, bool> = serde_json::from_str(r#"{"B2":false}"#).unwrap();
        assert_eq!(back.get("B2"), Some(&false));
    }

    #[test]
    fn test_fingerprint_is_stable_and_content_sensitive() {
        let a = fingerprint(b"[]");
        let b = fingerprint(b"[]");
        let c = fingerprint(b"[ ]");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string().len(), 64);
    }
}
