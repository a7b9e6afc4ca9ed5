//! Visibility state machine for a single banner.
//!
//! The controller never reads ambient state: the host feeds it scroll offsets
//! through [`VisibilityController::on_scroll`] and a [`DismissalStore`] at
//! construction and dismissal time.

use crate::banner::{BannerConfig, Trigger, Variant};
use crate::dismissal::DismissalStore;

/// Scroll offset past which `smart-header` switches to its compact layout.
pub const COMPACT_HEADER_THRESHOLD_PX: u32 = 50;

/// Snapshot of a banner's visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityState {
    /// The user dismissed this banner (now or in an earlier session).
    pub dismissed: bool,
    /// Scroll-derived layout flag: compact mode for `smart-header`, past the
    /// threshold for scroll-triggered variants.
    pub scrolled: bool,
    /// Whether the banner should currently be on screen.
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct VisibilityController {
    variant: Variant,
    show_after_scroll_px: u32,
    storage_key: String,
    state: VisibilityState,
}

impl VisibilityController {
    /// Build a controller, honouring any dismissal already persisted under
    /// `storage_key`.
    pub fn new(
        variant: Variant,
        show_after_scroll_px: u32,
        storage_key: String,
        store: &DismissalStore,
    ) -> Self {
        let dismissed = store.has(&storage_key);
        let visible = !dismissed && variant.trigger() == Trigger::Immediate;
        Self {
            variant,
            show_after_scroll_px,
            storage_key,
            state: VisibilityState {
                dismissed,
                scrolled: false,
                visible,
            },
        }
    }

    /// Build a controller from a config. Returns `None` for an unknown variant.
    pub fn for_config(config: &BannerConfig, store: &DismissalStore) -> Option<Self> {
        let variant = config.variant()?;
        Some(Self::new(
            variant,
            config.show_after_scroll_px,
            config.storage_key(),
            store,
        ))
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Whether the host needs to deliver scroll offsets to this banner.
    ///
    /// False once dismissed, so a dismissed banner holds no scroll listener.
    pub fn listens_to_scroll(&self) -> bool {
        !self.state.dismissed
            && (self.variant.trigger() == Trigger::Scroll || self.variant == Variant::SmartHeader)
    }

    /// Recompute state for a new vertical scroll offset.
    ///
    /// Offsets delivered while not listening are ignored.
    pub fn on_scroll(&mut self, offset: u32) -> VisibilityState {
        if !self.listens_to_scroll() {
            return self.state;
        }
        match self.variant.trigger() {
            Trigger::Scroll => {
                // Strict comparison: a threshold of 0 needs a positive offset.
                let past = offset > self.show_after_scroll_px;
                self.state.scrolled = past;
                self.state.visible = past;
            }
            Trigger::Immediate => {
                self.state.scrolled = offset > COMPACT_HEADER_THRESHOLD_PX;
            }
        }
        self.state
    }

    /// Hide the banner for good and persist the dismissal. Idempotent.
    pub fn dismiss(&mut self, store: &DismissalStore) -> VisibilityState {
        self.state.dismissed = true;
        self.state.visible = false;
        store.set(&self.storage_key);
        self.state
    }
}
