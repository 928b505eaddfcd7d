//! String helpers for member identities and display names.

/// Converts an empty string to `None`.
///
/// Display names are stored as empty strings by some writers; those read
/// as "no name set".
///
/// ```
/// use questline_domain::common::none_if_empty;
///
/// assert_eq!(none_if_empty("Wolf"), Some("Wolf"));
/// assert_eq!(none_if_empty(""), None);
/// ```
pub fn none_if_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Owned version of [`none_if_empty`].
pub fn some_if_not_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Short identity shown when a member has no display name: the first six
/// characters of the raw identity.
///
/// ```
/// use questline_domain::common::short_identity;
///
/// assert_eq!(short_identity("a1b2c3d4e5"), "a1b2c3");
/// assert_eq!(short_identity("abc"), "abc");
/// ```
pub fn short_identity(identity: &str) -> String {
    identity.chars().take(6).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_name_is_kept() {
        assert_eq!(none_if_empty(" "), Some(" "));
    }

    #[test]
    fn empty_owned_name_is_none() {
        assert_eq!(some_if_not_empty(String::new()), None);
        assert_eq!(
            some_if_not_empty("Sniper".to_string()),
            Some("Sniper".to_string())
        );
    }

    #[test]
    fn short_identity_counts_characters_not_bytes() {
        assert_eq!(short_identity("ÄÖÜäöüß"), "ÄÖÜäöü");
    }
}
