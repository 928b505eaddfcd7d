//! Sync configuration.
//!
//! Defaults match the hosted client: table `user_progress`, a 250 ms quiet
//! period before pushing, and a 500 ms grace after hydration before local
//! writes are allowed back out.
//!
//! Supported environment variables:
//! - QUESTLINE_SYNC_TABLE: remote table holding progress rows
//! - QUESTLINE_SYNC_DEBOUNCE_MS: quiet period before a push
//! - QUESTLINE_HYDRATION_GRACE_MS: delay between hydration and sync enablement

use std::time::Duration;

pub const DEFAULT_PROGRESS_TABLE: &str = "user_progress";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);
pub const DEFAULT_HYDRATION_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub table: String,
    pub debounce: Duration,
    pub hydration_grace: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_PROGRESS_TABLE.to_string(),
            debounce: DEFAULT_DEBOUNCE,
            hydration_grace: DEFAULT_HYDRATION_GRACE,
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; malformed values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(table) = lookup("QUESTLINE_SYNC_TABLE") {
            if table.trim().is_empty() {
                tracing::warn!("QUESTLINE_SYNC_TABLE is empty, ignoring");
            } else {
                config.table = table.trim().to_string();
            }
        }

        if let Some(ms) = millis(&lookup, "QUESTLINE_SYNC_DEBOUNCE_MS") {
            config.debounce = ms;
        }
        if let Some(ms) = millis(&lookup, "QUESTLINE_HYDRATION_GRACE_MS") {
            config.hydration_grace = ms;
        }

        config
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_hydration_grace(mut self, grace: Duration) -> Self {
        self.hydration_grace = grace;
        self
    }
}

fn millis<F>(lookup: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let val = lookup(key)?;
    match val.trim().parse::<u64>() {
        Ok(ms) => {
            tracing::info!(key, ms, "Applied sync timing override");
            Some(Duration::from_millis(ms))
        }
        Err(_) => {
            tracing::warn!(key, val = %val, "Not a valid millisecond count, ignoring");
            None
        }
    }
}
