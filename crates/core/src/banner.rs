//! CTA banner model, layout/status/color enums, and field validation.
//!
//! [`BannerConfig`] is the wire shape shared by the admin API and the embed
//! runtime (camelCase JSON). The `variant` tag is kept as a raw string so a
//! record with an unrecognised layout still deserializes and simply renders
//! nothing; use [`BannerConfig::variant`] to get the typed [`Variant`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::placement;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix of the per-banner dismissal key, see [`storage_key`].
pub const STORAGE_KEY_PREFIX: &str = "banner-dismissed-";

/// Route used by the CTA button when no `buttonUrl` is configured.
pub const DEFAULT_CONTACT_ROUTE: &str = "/contact";

/// Button label used when `buttonText` is empty.
pub const DEFAULT_BUTTON_TEXT: &str = "Get Started";

/// Scroll threshold applied on create when none is given.
pub const DEFAULT_SHOW_AFTER_SCROLL_PX: i32 = 300;

const MAX_NAME_LEN: usize = 200;
const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_BUTTON_TEXT_LEN: usize = 100;
const MAX_BUTTON_URL_LEN: usize = 2048;
const MAX_PHONE_LEN: usize = 32;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+().\-\s]+$").expect("phone regex is valid"));

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// One of the ten fixed banner layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    StickyTop,
    FloatingButton,
    SlideBottom,
    SmartHeader,
    BannerStrip,
    CornerPopup,
    FullScreenTakeover,
    SlideInLeft,
    StickyBottom,
    NotificationBar,
}

/// How a variant decides to become visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Visible from first render unless dismissed.
    Immediate,
    /// Visible once the page is scrolled past `showAfterScrollPx`.
    Scroll,
}

impl Variant {
    /// Every variant, in admin-form order.
    pub const ALL: [Variant; 10] = [
        Variant::StickyTop,
        Variant::FloatingButton,
        Variant::SlideBottom,
        Variant::SmartHeader,
        Variant::BannerStrip,
        Variant::CornerPopup,
        Variant::FullScreenTakeover,
        Variant::SlideInLeft,
        Variant::StickyBottom,
        Variant::NotificationBar,
    ];

    /// The wire tag, e.g. `"sticky-top"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StickyTop => "sticky-top",
            Self::FloatingButton => "floating-button",
            Self::SlideBottom => "slide-bottom",
            Self::SmartHeader => "smart-header",
            Self::BannerStrip => "banner-strip",
            Self::CornerPopup => "corner-popup",
            Self::FullScreenTakeover => "full-screen-takeover",
            Self::SlideInLeft => "slide-in-left",
            Self::StickyBottom => "sticky-bottom",
            Self::NotificationBar => "notification-bar",
        }
    }

    /// Parse a wire tag. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == tag)
    }

    pub fn trigger(self) -> Trigger {
        match self {
            Self::SlideBottom | Self::FloatingButton | Self::CornerPopup | Self::SlideInLeft => {
                Trigger::Scroll
            }
            Self::StickyTop
            | Self::SmartHeader
            | Self::BannerStrip
            | Self::FullScreenTakeover
            | Self::StickyBottom
            | Self::NotificationBar => Trigger::Immediate,
        }
    }

    /// Whether the layout stays mounted (translated off-screen) while hidden,
    /// so its entrance transition has a start state.
    pub fn stays_mounted_when_hidden(self) -> bool {
        matches!(
            self,
            Self::StickyTop | Self::SlideBottom | Self::SlideInLeft | Self::StickyBottom
        )
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Publication status. Only [`BannerStatus::Active`] banners render publicly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerStatus {
    #[default]
    Draft,
    Active,
    Inactive,
}

impl BannerStatus {
    /// Parse from the database `status` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: draft, active, inactive"
            ))),
        }
    }

    /// Database name value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// A themed color token. Renderers map tokens to CSS classes, never raw colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Primary,
    Secondary,
    Accent,
    Neutral,
    Dark,
    Light,
    White,
    Black,
    Success,
    Warning,
    Danger,
}

impl ColorToken {
    pub const ALL: [ColorToken; 11] = [
        ColorToken::Primary,
        ColorToken::Secondary,
        ColorToken::Accent,
        ColorToken::Neutral,
        ColorToken::Dark,
        ColorToken::Light,
        ColorToken::White,
        ColorToken::Black,
        ColorToken::Success,
        ColorToken::Warning,
        ColorToken::Danger,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Accent => "accent",
            Self::Neutral => "neutral",
            Self::Dark => "dark",
            Self::Light => "light",
            Self::White => "white",
            Self::Black => "black",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|c| c.name()).collect();
                CoreError::Validation(format!(
                    "Invalid color '{name}'. Valid colors: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// The four color slots every variant paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    pub background: ColorToken,
    pub button_background: ColorToken,
    pub button_text: ColorToken,
    pub text: ColorToken,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            background: ColorToken::Primary,
            button_background: ColorToken::White,
            button_text: ColorToken::Primary,
            text: ColorToken::White,
        }
    }
}

// ---------------------------------------------------------------------------
// BannerConfig
// ---------------------------------------------------------------------------

/// A banner as served by the embed endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerConfig {
    pub id: DbId,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub button_text: String,
    pub variant: String,
    #[serde(default)]
    pub button_url: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub show_phone: bool,
    #[serde(default)]
    pub show_after_scroll_px: u32,
    #[serde(default = "default_dismissible")]
    pub dismissible: bool,
    #[serde(default)]
    pub status: BannerStatus,
    #[serde(default = "placement::default_placement")]
    pub placement: Vec<String>,
    #[serde(default)]
    pub colors: ColorScheme,
}

fn default_dismissible() -> bool {
    true
}

impl BannerConfig {
    /// The typed layout, or `None` for an unrecognised tag.
    pub fn variant(&self) -> Option<Variant> {
        Variant::parse(&self.variant)
    }

    pub fn is_active(&self) -> bool {
        self.status == BannerStatus::Active
    }

    /// Key under which this banner's dismissal is persisted.
    pub fn storage_key(&self) -> String {
        storage_key(self.id)
    }

    /// Label for the main CTA button.
    pub fn button_label(&self) -> &str {
        if self.button_text.trim().is_empty() {
            DEFAULT_BUTTON_TEXT
        } else {
            &self.button_text
        }
    }

    /// Where the CTA navigates when no click callback is supplied.
    pub fn cta_target(&self) -> &str {
        match self.button_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_CONTACT_ROUTE,
        }
    }

    /// The phone number to show, if the phone affordance is enabled.
    pub fn phone(&self) -> Option<&str> {
        if !self.show_phone {
            return None;
        }
        self.phone_number
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Derive the dismissal storage key for a banner id.
///
/// The mapping is injective, so distinct ids never share a key.
pub fn storage_key(id: DbId) -> String {
    format!("{STORAGE_KEY_PREFIX}{id}")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_required_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    validate_optional_text(field, value, max)
}

fn validate_optional_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Validate the internal admin label (non-empty, <= 200 chars).
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    validate_required_text("Name", name, MAX_NAME_LEN)
}

/// Validate the display title (non-empty, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    validate_required_text("Title", title, MAX_TITLE_LEN)
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    validate_optional_text("Description", description, MAX_DESCRIPTION_LEN)
}

pub fn validate_button_text(text: &str) -> Result<(), CoreError> {
    validate_optional_text("Button text", text, MAX_BUTTON_TEXT_LEN)
}

/// Validate a variant tag against the ten known layouts.
pub fn validate_variant(tag: &str) -> Result<Variant, CoreError> {
    Variant::parse(tag).ok_or_else(|| {
        let valid: Vec<&str> = Variant::ALL.iter().map(|v| v.as_str()).collect();
        CoreError::Validation(format!(
            "Invalid variant '{tag}'. Valid variants: {}",
            valid.join(", ")
        ))
    })
}

/// Validate a CTA link: site-relative path, http(s) URL, `tel:` or `mailto:`.
pub fn validate_button_url(url: &str) -> Result<(), CoreError> {
    if url.is_empty() {
        return Ok(());
    }
    if url.len() > MAX_BUTTON_URL_LEN {
        return Err(CoreError::Validation(format!(
            "Button URL must be at most {MAX_BUTTON_URL_LEN} characters"
        )));
    }
    if url.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(
            "Button URL must not contain whitespace".into(),
        ));
    }
    let relative = url.starts_with('/') && !url.starts_with("//");
    let absolute = ["http://", "https://", "tel:", "mailto:"]
        .iter()
        .any(|scheme| url.starts_with(scheme));
    if !relative && !absolute {
        return Err(CoreError::Validation(format!(
            "Button URL '{url}' must be a site path or an http(s), tel: or mailto: link"
        )));
    }
    Ok(())
}

/// Validate a display phone number (digits plus common formatting characters).
pub fn validate_phone_number(phone: &str) -> Result<(), CoreError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(());
    }
    if phone.len() > MAX_PHONE_LEN {
        return Err(CoreError::Validation(format!(
            "Phone number must be at most {MAX_PHONE_LEN} characters"
        )));
    }
    if !PHONE_RE.is_match(phone) || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(format!(
            "Invalid phone number '{phone}'"
        )));
    }
    Ok(())
}

/// Validate the scroll threshold (must be non-negative).
pub fn validate_show_after_scroll_px(px: i32) -> Result<(), CoreError> {
    if px < 0 {
        return Err(CoreError::Validation(
            "showAfterScrollPx must be non-negative".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::fixtures::sample_config;

    fn sample() -> BannerConfig {
        sample_config("sticky-top")
    }

    // -- Variant -------------------------------------------------------------

    #[test]
    fn variant_tags_round_trip_through_parse() {
        for v in Variant::ALL {
            assert_eq!(Variant::parse(v.as_str()), Some(v));
        }
    }

    #[test]
    fn unknown_variant_tag_is_none() {
        assert_eq!(Variant::parse("marquee"), None);
        assert_eq!(Variant::parse("Sticky-Top"), None);
    }

    #[test]
    fn trigger_classes_match_layouts() {
        let scroll: Vec<Variant> = Variant::ALL
            .into_iter()
            .filter(|v| v.trigger() == Trigger::Scroll)
            .collect();
        assert_eq!(
            scroll,
            vec![
                Variant::FloatingButton,
                Variant::SlideBottom,
                Variant::CornerPopup,
                Variant::SlideInLeft,
            ]
        );
    }

    #[test]
    fn variant_serializes_as_kebab_case() {
        let json = serde_json::to_string(&Variant::FullScreenTakeover).unwrap();
        assert_eq!(json, "\"full-screen-takeover\"");
    }

    // -- BannerConfig --------------------------------------------------------

    #[test]
    fn storage_key_is_prefixed_id() {
        assert_eq!(storage_key(7), "banner-dismissed-7");
        assert_ne!(storage_key(1), storage_key(11));
        assert_eq!(sample().storage_key(), "banner-dismissed-7");
    }

    #[test]
    fn cta_target_defaults_to_contact_route() {
        let mut config = sample();
        assert_eq!(config.cta_target(), "/contact");
        config.button_url = Some("  ".into());
        assert_eq!(config.cta_target(), "/contact");
        config.button_url = Some("/pricing".into());
        assert_eq!(config.cta_target(), "/pricing");
    }

    #[test]
    fn button_label_falls_back_when_empty() {
        let mut config = sample();
        config.button_text = String::new();
        assert_eq!(config.button_label(), DEFAULT_BUTTON_TEXT);
    }

    #[test]
    fn phone_requires_flag_and_number() {
        let mut config = sample();
        assert_eq!(config.phone(), Some("(555) 010-2000"));
        config.show_phone = false;
        assert_eq!(config.phone(), None);
        config.show_phone = true;
        config.phone_number = Some(String::new());
        assert_eq!(config.phone(), None);
        config.phone_number = None;
        assert_eq!(config.phone(), None);
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let json = serde_json::json!({
            "id": 3,
            "name": "n",
            "title": "Hello",
            "variant": "smart-header",
            "status": "active",
            "showAfterScrollPx": 120,
            "buttonText": "Go"
        });
        let config: BannerConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.variant(), Some(Variant::SmartHeader));
        assert_eq!(config.show_after_scroll_px, 120);
        assert_eq!(config.button_text, "Go");
        assert!(config.dismissible);
        assert_eq!(config.placement, vec!["all".to_string()]);
        assert_eq!(config.colors, ColorScheme::default());
    }

    #[test]
    fn unknown_variant_still_deserializes() {
        let json = serde_json::json!({
            "id": 3, "name": "n", "title": "t", "variant": "hologram"
        });
        let config: BannerConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.variant(), None);
        assert_eq!(config.status, BannerStatus::Draft);
    }

    // -- Status / colors -----------------------------------------------------

    #[test]
    fn status_from_name() {
        assert_eq!(BannerStatus::from_name("active").unwrap(), BannerStatus::Active);
        assert_matches!(
            BannerStatus::from_name("published"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn color_from_name() {
        assert_eq!(ColorToken::from_name("accent").unwrap(), ColorToken::Accent);
        assert!(ColorToken::from_name("#ff0000").is_err());
    }

    // -- Validation ----------------------------------------------------------

    #[test]
    fn name_and_title_required() {
        assert!(validate_name("Promo").is_ok());
        assert!(validate_name("  ").is_err());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"a".repeat(201)).is_err());
    }

    #[test]
    fn description_may_be_empty() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"d".repeat(1001)).is_err());
    }

    #[test]
    fn variant_validation() {
        assert_eq!(validate_variant("corner-popup").unwrap(), Variant::CornerPopup);
        assert_matches!(validate_variant("popup"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn button_url_validation() {
        assert!(validate_button_url("").is_ok());
        assert!(validate_button_url("/contact").is_ok());
        assert!(validate_button_url("https://example.com/a").is_ok());
        assert!(validate_button_url("tel:5550100").is_ok());
        assert!(validate_button_url("mailto:hi@example.com").is_ok());
        assert!(validate_button_url("//evil.example").is_err());
        assert!(validate_button_url("javascript:alert(1)").is_err());
        assert!(validate_button_url("/a b").is_err());
    }

    #[test]
    fn phone_validation() {
        assert!(validate_phone_number("+1 (555) 010-2000").is_ok());
        assert!(validate_phone_number("").is_ok());
        assert!(validate_phone_number("call us").is_err());
        assert!(validate_phone_number("()--").is_err());
    }

    #[test]
    fn scroll_threshold_non_negative() {
        assert!(validate_show_after_scroll_px(0).is_ok());
        assert!(validate_show_after_scroll_px(-1).is_err());
    }
}
