//! Resolve a banner id into a live, page-bound banner.
//!
//! [`EmbedResolver::resolve`] fails silently: a fetch error, a missing or
//! inactive banner, an ineligible page and an unknown layout all yield
//! `None` and a log line, never an error for the end user.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cta_core::banner::BannerConfig;
use cta_core::cta::{self, ClickCallback, CtaOutcome};
use cta_core::dismissal::DismissalStore;
use cta_core::placement::is_eligible;
use cta_core::render::{self, BannerView};
use cta_core::types::DbId;
use cta_core::visibility::{VisibilityController, VisibilityState};
use tokio::sync::watch;

use crate::config::EmbedConfig;
use crate::error::EmbedError;
use crate::source::{BannerSource, HttpBannerSource};
use crate::telemetry::{self, Dispatch, TelemetryEvent};

// ---------------------------------------------------------------------------
// EmbedResolver
// ---------------------------------------------------------------------------

pub struct EmbedResolver {
    source: Arc<dyn BannerSource>,
    store: DismissalStore,
    on_click: Option<ClickCallback>,
}

impl EmbedResolver {
    pub fn new(source: Arc<dyn BannerSource>, store: DismissalStore) -> Self {
        Self {
            source,
            store,
            on_click: None,
        }
    }

    /// A resolver talking HTTP to the configured API, with the configured
    /// dismissal store.
    pub fn from_config(config: &EmbedConfig) -> Result<Self, EmbedError> {
        let source = HttpBannerSource::from_config(config)?;
        Ok(Self::new(Arc::new(source), config.dismissal_store()))
    }

    /// Run `callback` on CTA activation instead of navigating.
    pub fn with_click_callback(mut self, callback: ClickCallback) -> Self {
        self.on_click = Some(callback);
        self
    }

    /// Fetch banner `id` and mount it for the page at `current_path`.
    ///
    /// On success exactly one view event is dispatched.
    pub async fn resolve(&self, id: DbId, current_path: &str) -> Option<MountedBanner> {
        let config = match self.source.fetch_embed(id).await {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!(banner_id = id, "No active banner to embed");
                return None;
            }
            Err(e) => {
                tracing::warn!(banner_id = id, error = %e, "Failed to fetch banner");
                return None;
            }
        };

        if !config.is_active() {
            tracing::debug!(banner_id = id, status = config.status.name(), "Banner is not active");
            return None;
        }

        if !is_eligible(&config.placement, current_path) {
            tracing::debug!(banner_id = id, path = current_path, "Banner not placed on this page");
            return None;
        }

        let Some(controller) = VisibilityController::for_config(&config, &self.store) else {
            tracing::debug!(banner_id = id, variant = %config.variant, "Unknown banner variant");
            return None;
        };

        let view_dispatch = telemetry::dispatch(Arc::clone(&self.source), id, TelemetryEvent::View);

        Some(MountedBanner::new(
            config,
            controller,
            self.store.clone(),
            Arc::clone(&self.source),
            self.on_click.clone(),
            view_dispatch,
        ))
    }
}

impl fmt::Debug for EmbedResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedResolver")
            .field("store", &self.store)
            .field("has_click_callback", &self.on_click.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// MountedBanner
// ---------------------------------------------------------------------------

/// Result of activating a banner's main button.
#[derive(Debug)]
pub struct CtaActivation {
    /// What the host should do next.
    pub outcome: CtaOutcome,
    /// The click telemetry send, already under way.
    pub telemetry: Dispatch,
}

/// A resolved banner bound to its page: visibility state, dismissal store
/// and telemetry channel.
///
/// Every method takes `&self`, so the host can render, dismiss or activate
/// the banner while [`MountedBanner::follow_scroll`] is running. Each state
/// change is also published to [`MountedBanner::subscribe`] receivers.
pub struct MountedBanner {
    config: BannerConfig,
    controller: Mutex<VisibilityController>,
    states: watch::Sender<VisibilityState>,
    store: DismissalStore,
    source: Arc<dyn BannerSource>,
    on_click: Option<ClickCallback>,
    view_dispatch: Option<Dispatch>,
}

impl MountedBanner {
    fn new(
        config: BannerConfig,
        controller: VisibilityController,
        store: DismissalStore,
        source: Arc<dyn BannerSource>,
        on_click: Option<ClickCallback>,
        view_dispatch: Dispatch,
    ) -> Self {
        let (states, _) = watch::channel(controller.state());
        Self {
            config,
            controller: Mutex::new(controller),
            states,
            store,
            source,
            on_click,
            view_dispatch: Some(view_dispatch),
        }
    }

    pub fn config(&self) -> &BannerConfig {
        &self.config
    }

    // The controller holds plain data, so a poisoned lock is still usable.
    fn controller(&self) -> MutexGuard<'_, VisibilityController> {
        self.controller.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `change` to the controller and publish the resulting state.
    fn update(
        &self,
        change: impl FnOnce(&mut VisibilityController) -> VisibilityState,
    ) -> VisibilityState {
        let state = change(&mut self.controller());
        self.states.send_if_modified(|current| {
            let modified = *current != state;
            *current = state;
            modified
        });
        state
    }

    pub fn state(&self) -> VisibilityState {
        self.controller().state()
    }

    /// Receive every visibility change from now on.
    pub fn subscribe(&self) -> watch::Receiver<VisibilityState> {
        self.states.subscribe()
    }

    /// Whether the host must keep feeding scroll offsets.
    pub fn listens_to_scroll(&self) -> bool {
        self.controller().listens_to_scroll()
    }

    /// The current render tree, or `None` when nothing is mounted.
    pub fn view(&self) -> Option<BannerView> {
        render::render(&self.config, self.state())
    }

    pub fn on_scroll(&self, offset: u32) -> VisibilityState {
        self.update(|controller| controller.on_scroll(offset))
    }

    /// Dismiss and persist. Repeated calls are no-ops.
    ///
    /// Ignored for non-dismissible banners, which render no close control.
    pub fn dismiss(&self) -> VisibilityState {
        if !self.config.dismissible {
            tracing::debug!(banner_id = self.config.id, "Dismiss ignored for non-dismissible banner");
            return self.state();
        }
        self.update(|controller| controller.dismiss(&self.store))
    }

    /// Send click telemetry, then run the click action.
    ///
    /// The action runs whether or not the telemetry send succeeds.
    pub fn activate_cta(&self) -> CtaActivation {
        let telemetry =
            telemetry::dispatch(Arc::clone(&self.source), self.config.id, TelemetryEvent::Click);
        let outcome = cta::activate(&self.config, self.on_click.as_ref());
        CtaActivation { outcome, telemetry }
    }

    /// Take the handle of the view event sent at resolution.
    pub fn take_view_dispatch(&mut self) -> Option<Dispatch> {
        self.view_dispatch.take()
    }

    /// Apply scroll offsets from `offsets` until the feed closes or the
    /// banner stops listening (dismissed, or a layout that ignores scroll).
    ///
    /// The current value is applied first. A dismissal made while waiting
    /// ends the loop at the next offset.
    pub async fn follow_scroll(&self, mut offsets: watch::Receiver<u32>) {
        while self.listens_to_scroll() {
            let offset = *offsets.borrow_and_update();
            self.on_scroll(offset);
            if offsets.changed().await.is_err() {
                break;
            }
        }
    }
}

impl fmt::Debug for MountedBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedBanner")
            .field("banner_id", &self.config.id)
            .field("variant", &self.config.variant)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
