//! CTA banner row model and DTOs.

use cta_core::banner::{BannerConfig, BannerStatus, ColorScheme, ColorToken};
use cta_core::error::CoreError;
use cta_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `cta_banners` table.
#[derive(Debug, Clone, FromRow)]
pub struct CtaBanner {
    pub id: DbId,
    pub name: String,
    pub title: String,
    pub description: String,
    pub button_text: String,
    pub button_url: Option<String>,
    pub phone_number: Option<String>,
    pub show_phone: bool,
    pub variant: String,
    pub show_after_scroll_px: i32,
    pub dismissible: bool,
    pub status: String,
    pub placement: Vec<String>,
    pub background_color: String,
    pub button_bg_color: String,
    pub button_text_color: String,
    pub text_color: String,
    pub view_count: i64,
    pub click_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CtaBanner {
    /// Convert the row into the wire-level [`BannerConfig`].
    ///
    /// Fails only if a constrained column holds a value the core does not
    /// recognise (e.g. a color token written by hand).
    pub fn to_config(&self) -> Result<BannerConfig, CoreError> {
        let corrupt = |e: CoreError| {
            tracing::error!(banner_id = self.id, error = %e, "Corrupt cta_banners row");
            CoreError::Internal(format!("cta_banners row {} is corrupt: {e}", self.id))
        };
        let show_after_scroll_px = u32::try_from(self.show_after_scroll_px).map_err(|_| {
            corrupt(CoreError::Validation(
                "negative show_after_scroll_px".into(),
            ))
        })?;

        Ok(BannerConfig {
            id: self.id,
            name: self.name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            button_text: self.button_text.clone(),
            variant: self.variant.clone(),
            button_url: self.button_url.clone(),
            phone_number: self.phone_number.clone(),
            show_phone: self.show_phone,
            show_after_scroll_px,
            dismissible: self.dismissible,
            status: BannerStatus::from_name(&self.status).map_err(corrupt)?,
            placement: self.placement.clone(),
            colors: ColorScheme {
                background: ColorToken::from_name(&self.background_color).map_err(corrupt)?,
                button_background: ColorToken::from_name(&self.button_bg_color)
                    .map_err(corrupt)?,
                button_text: ColorToken::from_name(&self.button_text_color).map_err(corrupt)?,
                text: ColorToken::from_name(&self.text_color).map_err(corrupt)?,
            },
        })
    }

    /// Convert the row into the admin detail payload (config plus counters).
    pub fn to_detail(&self) -> Result<CtaBannerDetail, CoreError> {
        Ok(CtaBannerDetail {
            config: self.to_config()?,
            view_count: self.view_count,
            click_count: self.click_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Admin view of a banner: the full config plus telemetry counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaBannerDetail {
    #[serde(flatten)]
    pub config: BannerConfig,
    pub view_count: i64,
    pub click_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new banner. Omitted fields take the column defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCtaBanner {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub phone_number: Option<String>,
    pub show_phone: Option<bool>,
    pub variant: String,
    pub show_after_scroll_px: Option<i32>,
    pub dismissible: Option<bool>,
    /// `draft` when omitted.
    pub status: Option<String>,
    /// Normalized to `["all"]` when omitted or empty.
    pub placement: Option<Vec<String>>,
    pub colors: Option<ColorScheme>,
}

/// DTO for partially updating a banner.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCtaBanner {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub button_text: Option<String>,
    /// An empty string reverts the CTA to the default contact route.
    pub button_url: Option<String>,
    pub phone_number: Option<String>,
    pub show_phone: Option<bool>,
    pub variant: Option<String>,
    pub show_after_scroll_px: Option<i32>,
    pub dismissible: Option<bool>,
    pub status: Option<String>,
    pub placement: Option<Vec<String>>,
    pub colors: Option<ColorScheme>,
}
