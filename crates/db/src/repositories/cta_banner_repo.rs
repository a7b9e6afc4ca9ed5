//! Repository for the `cta_banners` table.
//!
//! Callers validate input and normalize placement before calling in;
//! the repository only applies column defaults.

use cta_core::banner::{BannerStatus, ColorScheme, DEFAULT_SHOW_AFTER_SCROLL_PX};
use cta_core::types::DbId;
use sqlx::PgPool;

use crate::models::cta_banner::{CreateCtaBanner, CtaBanner, UpdateCtaBanner};

/// Column list for cta_banners queries.
const COLUMNS: &str = "id, name, title, description, button_text, button_url, \
    phone_number, show_phone, variant, show_after_scroll_px, dismissible, status, \
    placement, background_color, button_bg_color, button_text_color, text_color, \
    view_count, click_count, created_at, updated_at";

/// Provides CRUD and counter operations for CTA banners.
pub struct CtaBannerRepo;

impl CtaBannerRepo {
    /// Insert a new banner with an already-normalized placement.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCtaBanner,
        placement: &[String],
    ) -> Result<CtaBanner, sqlx::Error> {
        let colors = input.colors.unwrap_or_default();
        let status = input
            .status
            .as_deref()
            .unwrap_or(BannerStatus::default().name());
        let query = format!(
            "INSERT INTO cta_banners
                (name, title, description, button_text, button_url, phone_number,
                 show_phone, variant, show_after_scroll_px, dismissible, status, placement,
                 background_color, button_bg_color, button_text_color, text_color)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CtaBanner>(&query)
            .bind(&input.name)
            .bind(&input.title)
            .bind(input.description.as_deref().unwrap_or(""))
            .bind(input.button_text.as_deref().unwrap_or(""))
            .bind(&input.button_url)
            .bind(&input.phone_number)
            .bind(input.show_phone.unwrap_or(false))
            .bind(&input.variant)
            .bind(
                input
                    .show_after_scroll_px
                    .unwrap_or(DEFAULT_SHOW_AFTER_SCROLL_PX),
            )
            .bind(input.dismissible.unwrap_or(true))
            .bind(status)
            .bind(placement)
            .bind(colors.background.name())
            .bind(colors.button_background.name())
            .bind(colors.button_text.name())
            .bind(colors.text.name())
            .fetch_one(pool)
            .await
    }

    /// Find a banner by ID regardless of status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CtaBanner>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cta_banners WHERE id = $1");
        sqlx::query_as::<_, CtaBanner>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a banner by ID only if it is publicly renderable (`active`).
    pub async fn find_active_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CtaBanner>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cta_banners WHERE id = $1 AND status = $2");
        sqlx::query_as::<_, CtaBanner>(&query)
            .bind(id)
            .bind(BannerStatus::Active.name())
            .fetch_optional(pool)
            .await
    }

    /// List banners, newest first, with an optional status filter.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CtaBanner>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cta_banners
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CtaBanner>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if the banner does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCtaBanner,
        placement: Option<&[String]>,
    ) -> Result<Option<CtaBanner>, sqlx::Error> {
        let colors: Option<ColorScheme> = input.colors;
        let query = format!(
            "UPDATE cta_banners SET
                name = COALESCE($2, name),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                button_text = COALESCE($5, button_text),
                button_url = COALESCE($6, button_url),
                phone_number = COALESCE($7, phone_number),
                show_phone = COALESCE($8, show_phone),
                variant = COALESCE($9, variant),
                show_after_scroll_px = COALESCE($10, show_after_scroll_px),
                dismissible = COALESCE($11, dismissible),
                status = COALESCE($12, status),
                placement = COALESCE($13, placement),
                background_color = COALESCE($14, background_color),
                button_bg_color = COALESCE($15, button_bg_color),
                button_text_color = COALESCE($16, button_text_color),
                text_color = COALESCE($17, text_color)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CtaBanner>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.button_text)
            .bind(&input.button_url)
            .bind(&input.phone_number)
            .bind(input.show_phone)
            .bind(&input.variant)
            .bind(input.show_after_scroll_px)
            .bind(input.dismissible)
            .bind(&input.status)
            .bind(placement)
            .bind(colors.map(|c| c.background.name()))
            .bind(colors.map(|c| c.button_background.name()))
            .bind(colors.map(|c| c.button_text.name()))
            .bind(colors.map(|c| c.text.name()))
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a banner. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cta_banners WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the view counter. Returns `true` if the banner exists.
    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE cta_banners SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the click counter. Returns `true` if the banner exists.
    pub async fn increment_clicks(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE cta_banners SET click_count = click_count + 1 WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
