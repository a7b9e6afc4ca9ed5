//! Domain core for CTA banners.
//!
//! Holds everything that decides *whether* and *how* a banner appears,
//! with no I/O of its own:
//!
//! - [`banner`] -- the persisted [`BannerConfig`](banner::BannerConfig) model,
//!   variant/status/color enums, and field validation.
//! - [`placement`] -- page-path eligibility rules.
//! - [`visibility`] -- the scroll/dismissal visibility state machine.
//! - [`render`] -- per-variant layout trees and HTML serialization.
//! - [`cta`] -- the CTA click indirection (callback or navigation).
//! - [`dismissal`] -- the injected key-value store behind dismissals.

pub mod banner;
pub mod cta;
pub mod dismissal;
pub mod error;
pub mod placement;
pub mod render;
pub mod types;
pub mod visibility;

#[cfg(test)]
pub(crate) mod fixtures;
