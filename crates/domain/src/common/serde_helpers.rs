//! Lenient deserializers for fields older writers stored in other shapes.

use std::collections::HashMap;
use std::hash::Hash;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

fn to_u32<E: de::Error>(raw: NumberOrString) -> Result<u32, E> {
    match raw {
        NumberOrString::Number(n) => u32::try_from(n)
            .map_err(|_| E::custom(format!("number out of range: {}", n))),
        NumberOrString::Text(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|_| E::custom(format!("expected a number, got {:?}", text))),
    }
}

/// Accept `3` or `"3"`.
pub fn u32_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    to_u32(NumberOrString::deserialize(deserializer)?)
}

/// Accept `3`, `"3"`, or `null`.
pub fn option_u32_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(to_u32)
        .transpose()
}

/// `3` or `"3"`; anything else is `None`.
pub fn lenient_u32(value: Value) -> Option<u32> {
    u32_from_number_or_string(value).ok()
}

/// Read `T`, falling back to `T::default()` for `null` or a mistyped value.
pub fn default_on_invalid<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Read a keyed map entry by entry. A non-object reads as empty and entries
/// that do not parse are skipped.
pub fn lenient_map<'de, D, K, V>(deserializer: D) -> Result<HashMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: From<String> + Eq + Hash,
    V: DeserializeOwned,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(HashMap::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(key, raw)| V::deserialize(raw).ok().map(|value| (K::from(key), value)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "u32_from_number_or_string")]
        edition: u32,
        #[serde(default, deserialize_with = "option_u32_from_number_or_string")]
        maybe: Option<u32>,
    }

    #[test]
    fn accepts_number_and_string() {
        let row: Row = serde_json::from_str(r#"{"edition": 4, "maybe": "5"}"#).unwrap();
        assert_eq!(row.edition, 4);
        assert_eq!(row.maybe, Some(5));

        let row: Row = serde_json::from_str(r#"{"edition": "2", "maybe": null}"#).unwrap();
        assert_eq!(row.edition, 2);
        assert_eq!(row.maybe, None);
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert!(serde_json::from_str::<Row>(r#"{"edition": "gold"}"#).is_err());
    }

    #[derive(Deserialize)]
    struct Lenient {
        #[serde(default, deserialize_with = "default_on_invalid")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient_map")]
        counts: HashMap<String, u32>,
    }

    #[test]
    fn mistyped_scalar_reads_as_default() {
        let row: Lenient = serde_json::from_str(r#"{"name": 7}"#).unwrap();
        assert_eq!(row.name, None);
    }

    #[test]
    fn unreadable_map_entries_are_skipped() {
        let row: Lenient =
            serde_json::from_str(r#"{"counts": {"a": 1, "b": null, "c": "x"}}"#).unwrap();
        assert_eq!(row.counts.len(), 1);
        assert_eq!(row.counts.get("a"), Some(&1));

        let row: Lenient = serde_json::from_str(r#"{"counts": null}"#).unwrap();
        assert!(row.counts.is_empty());
    }

    #[test]
    fn lenient_u32_accepts_text_digits_only() {
        assert_eq!(lenient_u32(Value::from("12")), Some(12));
        assert_eq!(lenient_u32(Value::Null), None);
        assert_eq!(lenient_u32(Value::from("twelve")), None);
    }
}
