use serde::{Deserialize, Serialize};

use questline_domain::TraderId;

/// A trader quests can require reputation levels with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trader {
    pub id: TraderId,
    #[serde(default)]
    pub name: String,
}

impl Trader {
    pub fn new(id: impl Into<TraderId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
