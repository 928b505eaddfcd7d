//! Schema migration - legacy flat records to the dual-partition shape
//!
//! Older writers stored a single flat progress document:
//!
//! ```json
//! { "level": 12, "taskCompletions": { ... }, "gameEdition": 2 }
//! ```
//!
//! The current shape keeps one partition per game mode:
//!
//! ```json
//! { "currentGameMode": "pvp", "gameEdition": 2, "pvp": { ... }, "pve": { ... } }
//! ```
//!
//! [`StoredProgress`] wraps a document that may still be legacy. Readers call
//! [`StoredProgress::ensure_migrated`] or [`StoredProgress::settle`] to obtain
//! a [`UserProgress`]; a pending legacy document is never read directly.

use serde_json::{Map, Value};

use crate::aggregates::UserProgress;
use crate::common::merge_json;
use crate::error::DomainError;
use crate::events::ProgressChange;
use crate::value_objects::{GameMode, DEFAULT_GAME_EDITION};

const CURRENT_GAME_MODE: &str = "currentGameMode";
const GAME_EDITION: &str = "gameEdition";

/// Top-level keys of the current shape. Anything else at the top level is a
/// legacy progress field.
const RECORD_FIELDS: [&str; 4] = [CURRENT_GAME_MODE, GAME_EDITION, "pvp", "pve"];

fn is_record_field(key: &str) -> bool {
    RECORD_FIELDS.contains(&key)
}

fn has_valid_mode(map: &Map<String, Value>) -> bool {
    map.get(CURRENT_GAME_MODE)
        .and_then(Value::as_str)
        .is_some_and(|mode| mode.parse::<GameMode>().is_ok())
}

/// Whether a stored document is not yet in the dual-partition shape.
pub fn needs_migration(document: &Value) -> bool {
    let Value::Object(map) = document else {
        return true;
    };
    if !has_valid_mode(map) {
        return true;
    }
    let Some(Value::Object(pvp)) = map.get("pvp") else {
        return true;
    };
    if !matches!(map.get("pve"), Some(Value::Object(_))) {
        return true;
    }
    map.keys()
        .any(|key| !is_record_field(key) && !pvp.contains_key(key))
}

/// Bring a document into the dual-partition shape.
///
/// Legacy top-level fields are copied into both partitions; values an
/// existing partition already carries win over the legacy copy. Running
/// this on an already-migrated document returns it unchanged.
pub fn migrate(document: Value) -> Value {
    let mut map = match document {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let mode = if has_valid_mode(&map) {
        map.remove(CURRENT_GAME_MODE)
            .unwrap_or_else(|| Value::from(GameMode::default().as_str()))
    } else {
        map.remove(CURRENT_GAME_MODE);
        Value::from(GameMode::default().as_str())
    };
    let edition = map
        .remove(GAME_EDITION)
        .filter(|edition| !edition.is_null())
        .unwrap_or_else(|| Value::from(DEFAULT_GAME_EDITION));
    let pvp = map.remove("pvp");
    let pve = map.remove("pve");

    // Whatever is left at the top level is legacy progress.
    let legacy = Value::Object(map);

    let mut migrated = Map::new();
    migrated.insert(CURRENT_GAME_MODE.to_string(), mode);
    migrated.insert(GAME_EDITION.to_string(), edition);
    for (name, existing) in [("pvp", pvp), ("pve", pve)] {
        let mut partition = legacy.clone();
        if let Some(existing @ Value::Object(_)) = existing {
            merge_json(&mut partition, existing);
        }
        migrated.insert(name.to_string(), partition);
    }
    Value::Object(migrated)
}

/// A progress document as loaded, before or after migration.
///
/// While a legacy document is pending, `progress` holds nothing readable;
/// every accessor settles the document first.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProgress {
    progress: UserProgress,
    legacy: Option<Value>,
}

/// Access granted by [`StoredProgress::ensure_migrated`].
#[derive(Debug)]
pub struct MigrationGuard<'a> {
    pub progress: &'a mut UserProgress,
    /// `Some(ProgressChange::Migrated)` when this call upgraded the document
    pub change: Option<ProgressChange>,
}

/// How [`StoredProgress::settle`] brought a document to the current shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    AlreadyCurrent,
    Migrated,
    /// The legacy document was not an object and was replaced by a fresh record
    Reset(DomainError),
}

impl Settlement {
    /// Change event to publish, if the settled record differs from what a
    /// writer last stored.
    pub fn change(&self) -> Option<ProgressChange> {
        match self {
            Self::Migrated => Some(ProgressChange::Migrated),
            Self::AlreadyCurrent | Self::Reset(_) => None,
        }
    }
}

impl Default for StoredProgress {
    fn default() -> Self {
        Self::current(UserProgress::default())
    }
}

/// Migrate and parse a legacy document. Fields read leniently, so only a
/// document that is not an object at all fails.
fn upgrade(document: Value) -> Result<UserProgress, DomainError> {
    match document {
        Value::Object(_) | Value::Null => serde_json::from_value(migrate(document))
            .map_err(|e| DomainError::migration(e.to_string())),
        other => Err(DomainError::migration(format!(
            "expected a progress object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl StoredProgress {
    /// An already-migrated record.
    pub fn current(progress: UserProgress) -> Self {
        Self {
            progress,
            legacy: None,
        }
    }

    /// Classify a raw document. Legacy documents are kept as-is until first
    /// read; current-shape documents are parsed immediately.
    pub fn from_document(document: Value) -> Result<Self, DomainError> {
        if needs_migration(&document) {
            Ok(Self {
                progress: UserProgress::default(),
                legacy: Some(document),
            })
        } else {
            Ok(Self::current(serde_json::from_value(document)?))
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.legacy.is_some()
    }

    /// The record, if no legacy document is pending.
    pub fn migrated(&self) -> Option<&UserProgress> {
        match self.legacy {
            Some(_) => None,
            None => Some(&self.progress),
        }
    }

    /// Migrate in place if needed and hand out the migrated record.
    ///
    /// On failure the document stays legacy and the error says why.
    pub fn ensure_migrated(&mut self) -> Result<MigrationGuard<'_>, DomainError> {
        let mut change = None;
        if let Some(document) = &self.legacy {
            self.progress = upgrade(document.clone())?;
            self.legacy = None;
            change = Some(ProgressChange::Migrated);
        }
        Ok(MigrationGuard {
            progress: &mut self.progress,
            change,
        })
    }

    /// Like [`Self::ensure_migrated`], but never fails: a document that cannot
    /// be migrated is replaced by a fresh record and reported as
    /// [`Settlement::Reset`].
    pub fn settle(&mut self) -> (&mut UserProgress, Settlement) {
        let settlement = match self.legacy.take() {
            None => Settlement::AlreadyCurrent,
            Some(document) => match upgrade(document) {
                Ok(progress) => {
                    self.progress = progress;
                    Settlement::Migrated
                }
                Err(e) => {
                    self.progress = UserProgress::default();
                    Settlement::Reset(e)
                }
            },
        };
        (&mut self.progress, settlement)
    }

    /// Consume into a migrated record.
    pub fn into_migrated(mut self) -> Result<UserProgress, DomainError> {
        self.ensure_migrated()?;
        Ok(self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy() -> Value {
        json!({
            "level": 12,
            "pmcFaction": "BEAR",
            "displayName": "Tagilla",
            "gameEdition": 3,
            "taskCompletions": {"q1": {"complete": true}},
            "taskObjectives": {"o1": {"complete": true, "count": 2}},
            "hideoutModules": {"m1": {"complete": true}}
        })
    }

    mod detection {
        use super::*;

        #[test]
        fn flat_record_needs_migration() {
            assert!(needs_migration(&legacy()));
        }

        #[test]
        fn missing_partition_needs_migration() {
            assert!(needs_migration(&json!({"currentGameMode": "pvp", "pvp": {}})));
        }

        #[test]
        fn bare_level_with_levelless_pvp_needs_migration() {
            assert!(needs_migration(&json!({
                "currentGameMode": "pvp",
                "level": 4,
                "pvp": {},
                "pve": {}
            })));
        }

        #[test]
        fn invalid_mode_needs_migration() {
            assert!(needs_migration(&json!({
                "currentGameMode": "arena",
                "pvp": {},
                "pve": {}
            })));
        }

        #[test]
        fn current_shape_does_not() {
            let doc = serde_json::to_value(UserProgress::default()).unwrap();
            assert!(!needs_migration(&doc));
        }
    }

    mod migrating {
        use super::*;

        #[test]
        fn legacy_fields_copied_into_both_partitions() {
            let migrated = migrate(legacy());
            for mode in ["pvp", "pve"] {
                assert_eq!(migrated[mode]["level"], json!(12));
                assert_eq!(migrated[mode]["pmcFaction"], json!("BEAR"));
                assert_eq!(migrated[mode]["taskCompletions"]["q1"]["complete"], json!(true));
            }
            assert_eq!(migrated["currentGameMode"], json!("pvp"));
            assert_eq!(migrated["gameEdition"], json!(3));
            assert!(migrated.get("level").is_none());
        }

        #[test]
        fn migration_is_idempotent() {
            let documents = [
                legacy(),
                json!({}),
                json!(null),
                json!({"currentGameMode": "pve", "level": 9, "pvp": {"taskCompletions": {}}, "pve": {"level": 40}}),
                serde_json::to_value(UserProgress::default()).unwrap(),
            ];
            for doc in documents {
                let once = migrate(doc);
                let twice = migrate(once.clone());
                assert_eq!(once, twice);
                assert!(!needs_migration(&once));
            }
        }

        #[test]
        fn migration_keeps_every_legacy_field() {
            let source = legacy();
            let migrated = migrate(source.clone());
            for key in source.as_object().unwrap().keys() {
                if key == "gameEdition" {
                    continue;
                }
                assert!(
                    migrated["pvp"].get(key).is_some() || migrated["pve"].get(key).is_some(),
                    "{key} lost in migration"
                );
            }
        }

        #[test]
        fn existing_partition_values_win() {
            let migrated = migrate(json!({
                "currentGameMode": "pve",
                "level": 9,
                "pvp": {"taskCompletions": {}},
                "pve": {"level": 40}
            }));
            assert_eq!(migrated["pve"]["level"], json!(40));
            assert_eq!(migrated["pvp"]["level"], json!(9));
            assert_eq!(migrated["currentGameMode"], json!("pve"));
        }

        #[test]
        fn current_shape_is_untouched() {
            let doc = serde_json::to_value(UserProgress::default().with_game_edition(4)).unwrap();
            assert_eq!(migrate(doc.clone()), doc);
        }
    }

    mod stored {
        use super::*;

        #[test]
        fn ensure_migrated_upgrades_once() {
            let mut stored = StoredProgress::from_document(legacy()).unwrap();
            assert!(stored.is_legacy());

            let guard = stored.ensure_migrated().unwrap();
            assert_eq!(guard.change, Some(ProgressChange::Migrated));
            assert_eq!(guard.progress.current().level(), 12);
            assert_eq!(guard.progress.game_edition(), 3);

            let guard = stored.ensure_migrated().unwrap();
            assert_eq!(guard.change, None);
            assert!(!stored.is_legacy());
        }

        #[test]
        fn non_object_document_reports_migration_error() {
            let mut stored = StoredProgress::from_document(json!(["q1", "q2"])).unwrap();
            let err = stored.ensure_migrated().unwrap_err();
            assert!(matches!(err, DomainError::Migration(_)));
            assert!(stored.is_legacy());
            assert_eq!(stored.migrated(), None);
        }

        #[test]
        fn settle_resets_non_object_document() {
            let mut stored = StoredProgress::from_document(json!("corrupted")).unwrap();
            let (progress, settlement) = stored.settle();
            assert_eq!(*progress, UserProgress::default());
            assert!(matches!(settlement, Settlement::Reset(DomainError::Migration(_))));
            assert_eq!(settlement.change(), None);
            assert!(!stored.is_legacy());
        }

        #[test]
        fn null_document_settles_to_fresh_record() {
            let mut stored = StoredProgress::from_document(Value::Null).unwrap();
            let (progress, settlement) = stored.settle();
            assert_eq!(*progress, UserProgress::default());
            assert_eq!(settlement, Settlement::Migrated);
        }

        #[test]
        fn mistyped_legacy_field_keeps_completions() {
            let mut stored = StoredProgress::from_document(json!({
                "level": null,
                "pmcFaction": "BEAR",
                "taskCompletions": {"q1": {"complete": true}}
            }))
            .unwrap();

            let (progress, settlement) = stored.settle();

            assert_eq!(settlement, Settlement::Migrated);
            assert_eq!(progress.current().level(), 1);
            assert!(progress.current().is_quest_complete("q1"));
            assert!(progress.partition(GameMode::Pve).is_quest_complete("q1"));
        }

        #[test]
        fn settled_record_keeps_every_legacy_field() {
            let mut source = legacy();
            source["xpOffset"] = json!(500);
            source["pmcFaction"] = json!("Scav");
            let mut stored = StoredProgress::from_document(source.clone()).unwrap();

            let (progress, _) = stored.settle();
            let written = serde_json::to_value(&*progress).unwrap();

            for key in source.as_object().unwrap().keys() {
                if key == "gameEdition" {
                    continue;
                }
                for mode in ["pvp", "pve"] {
                    assert!(written[mode].get(key).is_some(), "{key} lost from {mode}");
                }
            }
            for key in ["level", "pmcFaction", "displayName", "xpOffset"] {
                assert_eq!(written["pvp"][key], source[key], "{key} changed");
            }
        }

        #[test]
        fn settle_reports_migration_once() {
            let mut stored = StoredProgress::from_document(legacy()).unwrap();
            assert_eq!(stored.settle().1, Settlement::Migrated);
            assert_eq!(stored.settle().1, Settlement::AlreadyCurrent);
        }

        #[test]
        fn into_migrated_parses_current_shape() {
            let doc = json!({"currentGameMode": "pve", "gameEdition": "6", "pvp": {}, "pve": {"level": 3}});
            let progress = StoredProgress::from_document(doc)
                .unwrap()
                .into_migrated()
                .unwrap();
            assert_eq!(progress.current_game_mode(), GameMode::Pve);
            assert_eq!(progress.game_edition(), 6);
        }
    }
}
