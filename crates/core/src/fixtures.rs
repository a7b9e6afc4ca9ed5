//! Shared test fixtures.

use crate::banner::{BannerConfig, BannerStatus, ColorScheme};

/// An active, dismissible banner with a phone number, shown everywhere.
pub(crate) fn sample_config(variant: &str) -> BannerConfig {
    BannerConfig {
        id: 7,
        name: "Spring promo".into(),
        title: "Talk to an expert".into(),
        description: "Free consultation this week".into(),
        button_text: "Book now".into(),
        variant: variant.into(),
        button_url: None,
        phone_number: Some("(555) 010-2000".into()),
        show_phone: true,
        show_after_scroll_px: 300,
        dismissible: true,
        status: BannerStatus::Active,
        placement: vec!["all".into()],
        colors: ColorScheme::default(),
    }
}
