//! Team aggregate - the local user plus mirrored teammates
//!
//! The local user always sits under the reserved `self` key. Teammates are
//! keyed by their raw identity and are read-only mirrors; a teammate whose
//! record has not loaded is simply not a member yet.
//!
//! Hidden members drop out of [`Team::visible`] (and so out of every derived
//! map) but stay reachable through [`Team::get`].

use std::collections::{BTreeMap, BTreeSet};

use crate::common::short_identity;
use crate::ids::MemberKey;
use crate::value_objects::{Faction, ProgressCategory, QuestStatus};

use super::UserProgress;

#[derive(Debug, Clone)]
pub struct Team {
    local_identity: Option<String>,
    members: BTreeMap<MemberKey, UserProgress>,
    hidden: BTreeSet<MemberKey>,
}

impl Team {
    pub fn new(local_identity: Option<String>, local: UserProgress) -> Self {
        let mut members = BTreeMap::new();
        members.insert(MemberKey::local(), local);
        Self {
            local_identity,
            members,
            hidden: BTreeSet::new(),
        }
    }

    pub fn with_teammate(mut self, identity: impl Into<MemberKey>, progress: UserProgress) -> Self {
        self.insert_teammate(identity.into(), progress);
        self
    }

    pub fn with_hidden(mut self, key: impl Into<MemberKey>) -> Self {
        self.hide(key.into());
        self
    }

    /// Add or replace a teammate's mirrored record. The local slot cannot be
    /// overwritten this way.
    pub fn insert_teammate(&mut self, key: MemberKey, progress: UserProgress) -> bool {
        if key.is_local() {
            return false;
        }
        self.members.insert(key, progress);
        true
    }

    pub fn remove_teammate(&mut self, key: &MemberKey) -> Option<UserProgress> {
        if key.is_local() {
            return None;
        }
        self.members.remove(key)
    }

    pub fn hide(&mut self, key: MemberKey) {
        self.hidden.insert(key);
    }

    pub fn unhide(&mut self, key: &MemberKey) {
        self.hidden.remove(key);
    }

    pub fn is_hidden(&self, key: &MemberKey) -> bool {
        self.hidden.contains(key)
    }

    pub fn local(&self) -> Option<&UserProgress> {
        self.members.get(&MemberKey::local())
    }

    pub fn local_identity(&self) -> Option<&str> {
        self.local_identity.as_deref()
    }

    /// Direct lookup by key, ignoring visibility.
    pub fn get(&self, key: &MemberKey) -> Option<&UserProgress> {
        self.members.get(key)
    }

    pub fn member_keys(&self) -> impl Iterator<Item = &MemberKey> + '_ {
        self.members.keys()
    }

    /// Members not hidden by the user.
    pub fn visible(&self) -> TeamView<'_> {
        self.visible_by(|key| !self.hidden.contains(key))
    }

    /// Members admitted by a caller-supplied predicate.
    pub fn visible_by<F>(&self, predicate: F) -> TeamView<'_>
    where
        F: Fn(&MemberKey) -> bool,
    {
        TeamView {
            members: self
                .members
                .iter()
                .filter(|(key, _)| predicate(key))
                .collect(),
        }
    }

    // =========================================================================
    // Point lookups (raw identity in, fallback out)
    // =========================================================================

    /// Map a raw identity to its team key.
    pub fn member_key(&self, raw_identity: &str) -> MemberKey {
        MemberKey::resolve(raw_identity, self.local_identity.as_deref())
    }

    fn lookup(&self, raw_identity: &str) -> Option<&UserProgress> {
        self.get(&self.member_key(raw_identity))
    }

    /// Stored display name, else the first six characters of the identity.
    pub fn display_name(&self, raw_identity: &str) -> String {
        self.lookup(raw_identity)
            .and_then(|progress| progress.current().display_name())
            .map(str::to_string)
            .unwrap_or_else(|| short_identity(raw_identity))
    }

    /// Player level, 1 when the member is unknown.
    pub fn level(&self, raw_identity: &str) -> u32 {
        self.lookup(raw_identity)
            .map_or(1, |progress| progress.current().level())
    }

    /// Faction of a visible member keyed as given; `Unknown` otherwise.
    pub fn faction(&self, key: &str) -> Faction {
        let key = MemberKey::from(key);
        if self.is_hidden(&key) {
            return Faction::Unknown;
        }
        self.get(&key)
            .map_or(Faction::Unknown, |progress| progress.current().pmc_faction())
    }

    pub fn task_status(&self, raw_identity: &str, quest_id: &str) -> QuestStatus {
        self.lookup(raw_identity)
            .map_or(QuestStatus::Incomplete, |progress| {
                progress.current().quest_status(quest_id)
            })
    }

    pub fn has_completed_task(&self, raw_identity: &str, quest_id: &str) -> bool {
        self.task_status(raw_identity, quest_id).is_complete()
    }

    /// Share of recorded entries marked complete, 0 to 100.
    ///
    /// `category` is `"tasks"` or `"hideout"`; anything else yields 0.
    pub fn progress_percentage(&self, raw_identity: &str, category: &str) -> f64 {
        let Ok(category) = category.parse::<ProgressCategory>() else {
            return 0.0;
        };
        let Some(progress) = self.lookup(raw_identity) else {
            return 0.0;
        };
        let data = progress.current();
        let (completed, total) = match category {
            ProgressCategory::Tasks => (
                data.task_completions()
                    .values()
                    .filter(|status| status.is_complete())
                    .count(),
                data.task_completions().len(),
            ),
            ProgressCategory::Hideout => (
                data.hideout_modules()
                    .values()
                    .filter(|module| module.complete)
                    .count(),
                data.hideout_modules().len(),
            ),
        };
        crate::resolver::percentage(completed, total)
    }
}

/// A filtered, borrowed view of team members.
#[derive(Debug, Clone)]
pub struct TeamView<'a> {
    members: Vec<(&'a MemberKey, &'a UserProgress)>,
}

impl<'a> TeamView<'a> {
    pub fn iter(&self) -> impl Iterator<Item = (&'a MemberKey, &'a UserProgress)> + '_ {
        self.members.iter().copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a MemberKey> + '_ {
        self.members.iter().map(|(key, _)| *key)
    }

    pub fn get(&self, key: &MemberKey) -> Option<&'a UserProgress> {
        self.members
            .iter()
            .find(|(member, _)| *member == key)
            .map(|(_, progress)| *progress)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::ProgressData;
    use crate::value_objects::GameMode;

    fn progress_with_level(level: u32) -> UserProgress {
        UserProgress::default().with_partition(GameMode::Pvp, ProgressData::default().with_level(level))
    }

    fn team() -> Team {
        Team::new(Some("user-1".to_string()), progress_with_level(20))
            .with_teammate("user-2", progress_with_level(31))
            .with_teammate("user-3", progress_with_level(5))
            .with_hidden("user-3")
    }

    mod membership {
        use super::*;

        #[test]
        fn local_user_always_present() {
            let team = Team::new(None, UserProgress::default());
            assert!(team.local().is_some());
            assert_eq!(team.visible().len(), 1);
        }

        #[test]
        fn local_slot_cannot_be_replaced_by_teammate() {
            let mut team = Team::new(None, progress_with_level(9));
            assert!(!team.insert_teammate(MemberKey::local(), progress_with_level(50)));
            assert_eq!(team.level("self"), 9);
        }

        #[test]
        fn hidden_member_excluded_from_view_but_resolvable() {
            let team = team();
            let keys: Vec<&str> = team.visible().keys().map(|k| k.as_str()).collect();
            assert_eq!(keys, vec!["self", "user-2"]);
            assert!(team.get(&MemberKey::from("user-3")).is_some());
            assert_eq!(team.level("user-3"), 5);
        }

        #[test]
        fn caller_predicate_filters_view() {
            let team = team();
            let view = team.visible_by(|key| key.is_local());
            assert_eq!(view.len(), 1);
        }
    }

    mod lookups {
        use super::*;

        #[test]
        fn local_identity_resolves_to_self() {
            let team = team();
            assert!(team.member_key("user-1").is_local());
            assert_eq!(team.level("user-1"), 20);
        }

        #[test]
        fn display_name_falls_back_to_identity_prefix() {
            let team = team();
            assert_eq!(team.display_name("user-2"), "user-2");
            assert_eq!(team.display_name("abcdef123456"), "abcdef");
        }

        #[test]
        fn display_name_uses_stored_name() {
            let local = UserProgress::default().with_partition(
                GameMode::Pvp,
                ProgressData::default().with_display_name("Kappa Hunter"),
            );
            let team = Team::new(Some("user-1".to_string()), local);
            assert_eq!(team.display_name("user-1"), "Kappa Hunter");
        }

        #[test]
        fn unknown_member_defaults() {
            let team = team();
            assert_eq!(team.level("nobody"), 1);
            assert_eq!(team.faction("nobody"), Faction::Unknown);
            assert_eq!(team.task_status("nobody", "q1"), QuestStatus::Incomplete);
        }

        #[test]
        fn faction_of_hidden_member_is_unknown() {
            let team = team();
            assert_eq!(team.faction("user-2"), Faction::Usec);
            assert_eq!(team.faction("user-3"), Faction::Unknown);
        }
    }

    mod percentages {
        use super::*;

        #[test]
        fn task_percentage_over_recorded_entries() {
            let local = UserProgress::default().with_partition(
                GameMode::Pvp,
                ProgressData::default()
                    .with_quest_status("q1", QuestStatus::Completed)
                    .with_quest_status("q2", QuestStatus::Failed)
                    .with_quest_status("q3", QuestStatus::Completed)
                    .with_quest_status("q4", QuestStatus::Incomplete),
            );
            let team = Team::new(None, local);
            assert_eq!(team.progress_percentage("self", "tasks"), 50.0);
        }

        #[test]
        fn empty_or_unknown_category_is_zero() {
            let team = team();
            assert_eq!(team.progress_percentage("self", "hideout"), 0.0);
            assert_eq!(team.progress_percentage("self", "traders"), 0.0);
            assert_eq!(team.progress_percentage("ghost", "tasks"), 0.0);
        }
    }
}
