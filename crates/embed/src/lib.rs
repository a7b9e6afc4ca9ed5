//! Client-side runtime for embedding CTA banners.
//!
//! [`resolver::EmbedResolver`] fetches a banner through a
//! [`source::BannerSource`], checks status and page placement, and hands
//! back a [`resolver::MountedBanner`] that owns visibility, dismissal and
//! telemetry for one banner on one page.

pub mod config;
pub mod error;
pub mod file_store;
pub mod resolver;
pub mod source;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod fake;
