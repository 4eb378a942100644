use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Number of random bytes behind every generated id (16 hex characters).
const ID_BYTES: usize = 8;

/// Opaque identifier shared by tabs, pages, categories and tasks.
///
/// Ids double as the entity part of a view [`Address`](crate::view::Address),
/// so the view can route events back to the node that rendered a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Draw a fresh id from the OS random source.
    ///
    /// There is no counter and no collision check against existing ids; the
    /// 64 random bits are the only uniqueness guarantee.
    pub fn generate() -> Self {
        let mut bytes = [0u8; ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        EntityId(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_sixteen_hex_chars() {
        let id = EntityId::generate();
        assert_eq!(id.as_str().len(), 16);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id.as_str(), id.as_str().to_lowercase());
    }

    #[test]
    fn generated_ids_do_not_repeat() {
        let ids: HashSet<EntityId> = (0..1000).map(|_| EntityId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = EntityId::from("00ff00ff00ff00ff");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"00ff00ff00ff00ff\"");
    }
}
