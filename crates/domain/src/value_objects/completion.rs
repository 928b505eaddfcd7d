//! Completion state stored per quest, objective, module, and part

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a quest for one member in one game mode.
///
/// Completed and failed are mutually exclusive by construction. On the wire
/// the status is the `{ complete, failed }` pair older writers produced; a
/// stored pair with both flags set reads as completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "QuestStatusRecord", into = "QuestStatusRecord")]
pub enum QuestStatus {
    #[default]
    Incomplete,
    Completed,
    Failed,
}

impl QuestStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct QuestStatusRecord {
    #[serde(default)]
    complete: bool,
    #[serde(default)]
    failed: bool,
}

impl From<QuestStatusRecord> for QuestStatus {
    fn from(record: QuestStatusRecord) -> Self {
        if record.complete {
            Self::Completed
        } else if record.failed {
            Self::Failed
        } else {
            Self::Incomplete
        }
    }
}

impl From<QuestStatus> for QuestStatusRecord {
    fn from(status: QuestStatus) -> Self {
        Self {
            complete: status.is_complete(),
            failed: status.is_failed(),
        }
    }
}

/// Completion flag for modules and item-requirement parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub complete: bool,
}

impl Completion {
    pub fn done() -> Self {
        Self { complete: true }
    }
}

/// Objective completion plus the found-item count towards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    #[serde(default)]
    pub complete: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub count: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}
