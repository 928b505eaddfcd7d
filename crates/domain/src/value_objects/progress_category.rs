use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Category a progress percentage is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressCategory {
    Tasks,
    Hideout,
}

impl ProgressCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Hideout => "hideout",
        }
    }
}

impl fmt::Display for ProgressCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tasks" => Ok(Self::Tasks),
            "hideout" => Ok(Self::Hideout),
            _ => Err(DomainError::parse(format!(
                "Unknown progress category: {}",
                s
            ))),
        }
    }
}
