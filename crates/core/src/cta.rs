//! CTA button activation.
//!
//! A banner's main button either runs a caller-supplied callback or, when
//! none is given, asks the host to navigate to the configured link (falling
//! back to the contact route). Keeping the indirection lets the same banner
//! work standalone and database-driven.

use std::sync::Arc;

use crate::banner::BannerConfig;

/// Caller-supplied click handler.
pub type ClickCallback = Arc<dyn Fn() + Send + Sync>;

/// What activating the CTA resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CtaOutcome {
    /// The callback ran; the host has nothing more to do.
    Handled,
    /// The host should navigate to this target.
    Navigate(String),
}

/// Activate the main CTA of `config`.
pub fn activate(config: &BannerConfig, callback: Option<&ClickCallback>) -> CtaOutcome {
    match callback {
        Some(cb) => {
            cb();
            CtaOutcome::Handled
        }
        None => CtaOutcome::Navigate(config.cta_target().to_string()),
    }
}
