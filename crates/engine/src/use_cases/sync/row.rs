//! Remote row shape and the push transform contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use questline_domain::common::serde_helpers::option_u32_from_number_or_string;
use questline_domain::value_objects::DEFAULT_GAME_EDITION;
use questline_domain::{GameMode, UserProgress};

use crate::infrastructure::ports::SyncError;

use super::gateway::SyncPhase;

/// One user's progress as stored remotely.
///
/// Every column but `user_id` is optional so partial rows (a single-mode
/// reset, a realtime payload carrying only changed columns) parse too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressRow {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_game_mode: Option<GameMode>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "option_u32_from_number_or_string"
    )]
    pub game_edition: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvp_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pve_data: Option<Value>,
}

impl ProgressRow {
    /// Full row for `progress`.
    pub fn from_progress(user_id: impl Into<String>, progress: &UserProgress) -> Result<Self, SyncError> {
        Ok(Self {
            user_id: user_id.into(),
            current_game_mode: Some(progress.current_game_mode()),
            game_edition: Some(progress.game_edition()),
            pvp_data: Some(serde_json::to_value(progress.partition(GameMode::Pvp))?),
            pve_data: Some(serde_json::to_value(progress.partition(GameMode::Pve))?),
        })
    }

    /// Row carrying only one mode's partition.
    pub fn partition_only(
        user_id: impl Into<String>,
        mode: GameMode,
        progress: &UserProgress,
    ) -> Result<Self, SyncError> {
        let data = Some(serde_json::to_value(progress.partition(mode))?);
        let mut row = Self {
            user_id: user_id.into(),
            ..Self::default()
        };
        match mode {
            GameMode::Pvp => row.pvp_data = data,
            GameMode::Pve => row.pve_data = data,
        }
        Ok(row)
    }

    pub fn from_value(value: Value) -> Result<Self, SyncError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value, SyncError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Fill the columns a freshly loaded row must carry: mode falls back to
    /// pvp, a missing or zero edition to the base edition.
    pub fn with_defaults(mut self) -> Self {
        self.current_game_mode.get_or_insert(GameMode::Pvp);
        if matches!(self.game_edition, None | Some(0)) {
            self.game_edition = Some(DEFAULT_GAME_EDITION);
        }
        self
    }

    /// Partial progress document holding only the columns present on the row.
    pub fn into_patch(self) -> Value {
        let mut patch = Map::new();
        if let Some(mode) = self.current_game_mode {
            patch.insert("currentGameMode".to_string(), Value::from(mode.as_str()));
        }
        if let Some(edition) = self.game_edition {
            patch.insert("gameEdition".to_string(), Value::from(edition));
        }
        if let Some(data @ Value::Object(_)) = self.pvp_data {
            patch.insert("pvp".to_string(), data);
        }
        if let Some(data @ Value::Object(_)) = self.pve_data {
            patch.insert("pve".to_string(), data);
        }
        Value::Object(patch)
    }
}

// =============================================================================
// Push transform
// =============================================================================

/// What the transform sees at flush time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushContext {
    pub user_id: String,
    pub phase: SyncPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Local state has not yet been hydrated from the remote row
    InitialLoad,
    /// No signed-in user; the transform is never consulted in this case
    Unauthenticated,
    /// A caller-supplied transform declined the push
    Custom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushDecision {
    Push(Value),
    Skip(SkipReason),
}

/// Converts the local record into the remote row, or declines the push.
pub trait PushTransform: Send + Sync {
    fn transform(&self, progress: &UserProgress, context: &PushContext) -> Result<PushDecision, SyncError>;
}

impl<F> PushTransform for F
where
    F: Fn(&UserProgress, &PushContext) -> Result<PushDecision, SyncError> + Send + Sync,
{
    fn transform(&self, progress: &UserProgress, context: &PushContext) -> Result<PushDecision, SyncError> {
        self(progress, context)
    }
}

/// Full-row push, suppressed until hydration has finished.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressRowTransform;

impl PushTransform for ProgressRowTransform {
    fn transform(&self, progress: &UserProgress, context: &PushContext) -> Result<PushDecision, SyncError> {
        if context.phase == SyncPhase::InitialLoad {
            return Ok(PushDecision::Skip(SkipReason::InitialLoad));
        }
        let row = ProgressRow::from_progress(context.user_id.clone(), progress)?;
        Ok(PushDecision::Push(row.to_value()?))
    }
}
