use std::sync::Arc;

use api::{ApiError, TrackingGateway};
use chrono::{DateTime, Utc};
use matelog_core::model::{ActivityContext, ActivityId, ActivityRecord, ScreenKind};

use crate::Clock;
use crate::best_effort::best_effort;

/// One opened screen visit. The id is missing when the backend did not answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedScreen {
    pub kind: ScreenKind,
    pub context: ActivityContext,
    pub opened_at: DateTime<Utc>,
    pub activity_id: Option<ActivityId>,
}

impl TrackedScreen {
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.opened_at).num_seconds()).unwrap_or(0)
    }
}

/// Opens and closes screen-time activities. Never fails the caller.
#[derive(Clone)]
pub struct ScreenTracker {
    clock: Clock,
    tracking: Arc<dyn TrackingGateway>,
}

impl ScreenTracker {
    #[must_use]
    pub fn new(clock: Clock, tracking: Arc<dyn TrackingGateway>) -> Self {
        Self { clock, tracking }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub async fn open(&self, kind: ScreenKind, context: ActivityContext) -> TrackedScreen {
        let opened_at = self.clock.now();
        let activity_id = best_effort(
            "tracking.open",
            self.tracking.start_activity(kind, context),
        )
        .await;
        tracing::debug!(screen = kind.code(), activity = ?activity_id, "screen opened");
        TrackedScreen {
            kind,
            context,
            opened_at,
            activity_id,
        }
    }

    /// Closes the activity if one was obtained; otherwise there is nothing to close.
    pub async fn close(&self, screen: &TrackedScreen) {
        let Some(id) = screen.activity_id else {
            tracing::debug!(screen = screen.kind.code(), "no activity id, close skipped");
            return;
        };
        best_effort("tracking.close", self.tracking.end_activity(id)).await;
    }

    /// Counts a "back" click on the content screen behind `activity`.
    pub async fn content_back(&self, activity: ActivityId) {
        best_effort(
            "tracking.content_back",
            self.tracking.register_content_back(activity),
        )
        .await;
    }

    /// The user's past screen visits, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend cannot be reached.
    pub async fn recent_activities(&self) -> Result<Vec<ActivityRecord>, ApiError> {
        self.tracking.list_activities().await
    }
}
