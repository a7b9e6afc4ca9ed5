//! Best-effort view/click telemetry.
//!
//! Each event is sent once on a detached task. Failures are logged at warn
//! level and dropped; nothing is retried and nothing reaches the caller.

use std::fmt;
use std::sync::Arc;

use cta_core::types::DbId;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::source::BannerSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryEvent {
    View,
    Click,
}

impl fmt::Display for TelemetryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::View => "view",
            Self::Click => "click",
        })
    }
}

/// Handle to an in-flight telemetry send.
///
/// Dropping it does not cancel the send.
#[derive(Debug)]
pub struct Dispatch {
    task: Option<JoinHandle<()>>,
}

impl Dispatch {
    /// Whether the event was skipped because no runtime was available.
    pub fn is_skipped(&self) -> bool {
        self.task.is_none()
    }

    /// Wait for the send to finish, successfully or not.
    pub async fn settled(self) {
        if let Some(task) = self.task {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Telemetry task did not complete");
            }
        }
    }
}

/// Send `event` for banner `id` through `source` without waiting.
pub fn dispatch(source: Arc<dyn BannerSource>, id: DbId, event: TelemetryEvent) -> Dispatch {
    let Ok(runtime) = Handle::try_current() else {
        tracing::warn!(banner_id = id, %event, "No async runtime, telemetry event skipped");
        return Dispatch { task: None };
    };

    let task = runtime.spawn(async move {
        let result = match event {
            TelemetryEvent::View => source.track_view(id).await,
            TelemetryEvent::Click => source.track_click(id).await,
        };
        match result {
            Ok(()) => tracing::debug!(banner_id = id, %event, "Telemetry event recorded"),
            Err(e) => {
                tracing::warn!(banner_id = id, %event, error = %e, "Telemetry event failed")
            }
        }
    });

    Dispatch { task: Some(task) }
}
