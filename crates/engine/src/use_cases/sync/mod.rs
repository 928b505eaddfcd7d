//! Sync use cases.
//!
//! Moves progress between the local record and the remote row store:
//! debounced pushes, hydration after sign-in, realtime patches, and
//! teammate mirrors.

use std::sync::Arc;

mod gateway;
mod row;
mod teammates;

pub use gateway::{HydrationOutcome, PushOutcome, SyncGateway, SyncPhase};
pub use row::{ProgressRow, ProgressRowTransform, PushContext, PushDecision, PushTransform, SkipReason};
pub use teammates::TeammateSync;

/// Container for sync use cases.
pub struct SyncUseCases {
    pub gateway: Arc<SyncGateway>,
    pub teammates: Arc<TeammateSync>,
}

impl SyncUseCases {
    pub fn new(gateway: Arc<SyncGateway>, teammates: Arc<TeammateSync>) -> Self {
        Self { gateway, teammates }
    }
}
