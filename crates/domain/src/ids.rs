use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Definition payloads key everything by opaque string identifiers, so IDs wrap
/// a `String` rather than a generated UUID.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
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
    };
}

// Quest definitions
define_id!(QuestId);
define_id!(ObjectiveId);
define_id!(TraderId);

// Station definitions
define_id!(StationId);
define_id!(ModuleId);
define_id!(ItemRequirementId);

// Team membership
define_id!(MemberKey);

/// Reserved member key for the local user.
pub const SELF_MEMBER_KEY: &str = "self";

impl MemberKey {
    /// The key the local user is always stored under.
    pub fn local() -> Self {
        Self(SELF_MEMBER_KEY.to_string())
    }

    pub fn is_local(&self) -> bool {
        self.0 == SELF_MEMBER_KEY
    }

    /// Map a raw identity to its team key.
    ///
    /// The local authenticated identity collapses to `self`; every other
    /// identity is used as-is.
    pub fn resolve(raw_identity: &str, local_identity: Option<&str>) -> Self {
        match local_identity {
            Some(local) if local == raw_identity => Self::local(),
            _ => Self(raw_identity.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn ids_serialize_transparently() {
        let id = QuestId::new("5936d90786f7742b1420ba5b");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"5936d90786f7742b1420ba5b\"");
    }

    #[test]
    fn id_maps_support_str_lookup() {
        let mut map = HashMap::new();
        map.insert(ModuleId::new("stash-1"), true);
        assert_eq!(map.get("stash-1"), Some(&true));
    }

    #[test]
    fn resolve_maps_local_identity_to_self() {
        let key = MemberKey::resolve("user-123", Some("user-123"));
        assert!(key.is_local());
        assert_eq!(key.as_str(), "self");
    }

    #[test]
    fn resolve_keeps_teammate_identity() {
        let key = MemberKey::resolve("user-456", Some("user-123"));
        assert!(!key.is_local());
        assert_eq!(key.as_str(), "user-456");
    }

    #[test]
    fn resolve_without_session_keeps_identity() {
        let key = MemberKey::resolve("user-123", None);
        assert_eq!(key.as_str(), "user-123");
    }
}
