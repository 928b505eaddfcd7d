//! Teammate mirrors and hidden-member preferences.
//!
//! Teammate records are read-only copies of remote rows. A teammate is
//! registered with [`TeamStore::get_or_create`] before its row arrives and
//! stays out of every [`Team`] snapshot until it has loaded.

use std::collections::{BTreeMap, BTreeSet};

use tokio::sync::RwLock;

use questline_domain::{MemberKey, Team, UserProgress};

#[derive(Debug, Clone, PartialEq)]
pub enum TeammateState {
    Loading,
    Loaded(UserProgress),
}

#[derive(Default)]
pub struct TeamStore {
    teammates: RwLock<BTreeMap<MemberKey, TeammateState>>,
    hidden: RwLock<BTreeSet<MemberKey>>,
}

impl TeamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a teammate if not already known. Returns `true` when created.
    pub async fn get_or_create(&self, identity: &str) -> bool {
        let mut teammates = self.teammates.write().await;
        let key = MemberKey::new(identity);
        if teammates.contains_key(&key) {
            return false;
        }
        teammates.insert(key, TeammateState::Loading);
        true
    }

    /// Replace a teammate's mirrored record.
    pub async fn mirror(&self, identity: &str, progress: UserProgress) {
        self.teammates
            .write()
            .await
            .insert(MemberKey::new(identity), TeammateState::Loaded(progress));
    }

    pub async fn remove(&self, identity: &str) -> bool {
        self.teammates.write().await.remove(identity).is_some()
    }

    pub async fn state(&self, identity: &str) -> Option<TeammateState> {
        self.teammates.read().await.get(identity).cloned()
    }

    pub async fn identities(&self) -> Vec<MemberKey> {
        self.teammates.read().await.keys().cloned().collect()
    }

    pub async fn hide(&self, identity: &str) {
        self.hidden.write().await.insert(MemberKey::new(identity));
    }

    pub async fn unhide(&self, identity: &str) {
        self.hidden.write().await.remove(identity);
    }

    pub async fn is_hidden(&self, identity: &str) -> bool {
        self.hidden.read().await.contains(identity)
    }

    /// Build the team around the local record. Teammates still loading are
    /// left out, and so is any teammate entry for the local identity.
    pub async fn snapshot(&self, local_identity: Option<String>, local: UserProgress) -> Team {
        let mut team = Team::new(local_identity.clone(), local);

        for (identity, state) in self.teammates.read().await.iter() {
            if let TeammateState::Loaded(progress) = state {
                let key = MemberKey::resolve(identity.as_str(), local_identity.as_deref());
                team.insert_teammate(key, progress.clone());
            }
        }
        for identity in self.hidden.read().await.iter() {
            team.hide(MemberKey::resolve(identity.as_str(), local_identity.as_deref()));
        }

        team
    }
}
