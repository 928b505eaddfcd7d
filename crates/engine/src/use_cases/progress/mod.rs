//! Progress use cases.
//!
//! Queries derive availability, levels and stats for the team; actions edit
//! the local user's record.

use std::sync::Arc;

mod actions;
mod queries;

pub use actions::ProgressActions;
pub use queries::ProgressQueries;

/// Container for progress use cases.
pub struct ProgressUseCases {
    pub queries: Arc<ProgressQueries>,
    pub actions: Arc<ProgressActions>,
}

impl ProgressUseCases {
    pub fn new(queries: Arc<ProgressQueries>, actions: Arc<ProgressActions>) -> Self {
        Self { queries, actions }
    }
}
