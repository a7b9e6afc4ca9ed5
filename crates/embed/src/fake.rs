//! In-memory [`BannerSource`] for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cta_core::banner::{BannerConfig, BannerStatus, ColorScheme};
use cta_core::types::DbId;

use crate::error::EmbedError;
use crate::source::BannerSource;

/// Calls observed by a [`FakeSource`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch(DbId),
    View(DbId),
    Click(DbId),
}

#[derive(Default)]
pub struct FakeSource {
    pub banners: Vec<BannerConfig>,
    pub fail_fetch: bool,
    pub fail_telemetry: bool,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeSource {
    pub fn with(banner: BannerConfig) -> Self {
        Self {
            banners: vec![banner],
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn telemetry_result(&self) -> Result<(), EmbedError> {
        if self.fail_telemetry {
            return Err(EmbedError::Api {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BannerSource for FakeSource {
    async fn fetch_embed(&self, id: DbId) -> Result<Option<BannerConfig>, EmbedError> {
        self.record(Call::Fetch(id));
        if self.fail_fetch {
            return Err(EmbedError::Api {
                status: 500,
                body: "boom".into(),
            });
        }
        Ok(self.banners.iter().find(|b| b.id == id).cloned())
    }

    async fn track_view(&self, id: DbId) -> Result<(), EmbedError> {
        self.record(Call::View(id));
        self.telemetry_result()
    }

    async fn track_click(&self, id: DbId) -> Result<(), EmbedError> {
        self.record(Call::Click(id));
        self.telemetry_result()
    }
}

/// An active banner with the given id and variant.
pub fn banner(id: DbId, variant: &str) -> BannerConfig {
    BannerConfig {
        id,
        name: format!("banner-{id}"),
        title: "Need a hand?".into(),
        description: "Our team replies within a day".into(),
        button_text: "Contact us".into(),
        variant: variant.into(),
        button_url: None,
        phone_number: Some("+1 (555) 010-2000".into()),
        show_phone: true,
        show_after_scroll_px: 300,
        dismissible: true,
        status: BannerStatus::Active,
        placement: vec!["all".into()],
        colors: ColorScheme::default(),
    }
}
