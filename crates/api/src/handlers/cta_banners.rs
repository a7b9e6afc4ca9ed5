//! Handlers for CTA banner management and the public embed endpoints.
//!
//! Admin endpoints validate input with the core validators before touching
//! the database. The embed endpoints only ever expose `active` banners.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cta_core::banner::{
    validate_button_text, validate_button_url, validate_description, validate_name,
    validate_phone_number, validate_show_after_scroll_px, validate_title, validate_variant,
    BannerStatus,
};
use cta_core::error::CoreError;
use cta_core::placement::{default_placement, normalize_placement, validate_placement};
use cta_core::types::DbId;
use cta_db::models::cta_banner::{CreateCtaBanner, CtaBannerDetail, UpdateCtaBanner};
use cta_db::repositories::CtaBannerRepo;

use crate::error::{AppError, AppResult};
use crate::query::{clamp_limit, clamp_offset, ListBannersParams, DEFAULT_LIMIT, MAX_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "CtaBanner";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_create(input: &CreateCtaBanner) -> Result<(), CoreError> {
    validate_name(&input.name)?;
    validate_title(&input.title)?;
    validate_variant(&input.variant)?;
    validate_optional_fields(
        input.description.as_deref(),
        input.button_text.as_deref(),
        input.button_url.as_deref(),
        input.phone_number.as_deref(),
        input.show_after_scroll_px,
        input.status.as_deref(),
        input.placement.as_deref(),
    )
}

fn validate_update(input: &UpdateCtaBanner) -> Result<(), CoreError> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    if let Some(variant) = &input.variant {
        validate_variant(variant)?;
    }
    validate_optional_fields(
        input.description.as_deref(),
        input.button_text.as_deref(),
        input.button_url.as_deref(),
        input.phone_number.as_deref(),
        input.show_after_scroll_px,
        input.status.as_deref(),
        input.placement.as_deref(),
    )
}

fn validate_optional_fields(
    description: Option<&str>,
    button_text: Option<&str>,
    button_url: Option<&str>,
    phone_number: Option<&str>,
    show_after_scroll_px: Option<i32>,
    status: Option<&str>,
    placement: Option<&[String]>,
) -> Result<(), CoreError> {
    if let Some(description) = description {
        validate_description(description)?;
    }
    if let Some(text) = button_text {
        validate_button_text(text)?;
    }
    if let Some(url) = button_url {
        validate_button_url(url)?;
    }
    if let Some(phone) = phone_number {
        validate_phone_number(phone)?;
    }
    if let Some(px) = show_after_scroll_px {
        validate_show_after_scroll_px(px)?;
    }
    if let Some(status) = status {
        BannerStatus::from_name(status)?;
    }
    if let Some(placement) = placement {
        validate_placement(placement)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/cta-banners
///
/// List banners newest first. `status` filters, `limit`/`offset` paginate.
pub async fn list_banners(
    State(state): State<AppState>,
    Query(params): Query<ListBannersParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        BannerStatus::from_name(status)?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);

    let rows = CtaBannerRepo::list(&state.pool, params.status.as_deref(), limit, offset).await?;
    let banners = rows
        .iter()
        .map(|row| row.to_detail())
        .collect::<Result<Vec<CtaBannerDetail>, _>>()?;

    Ok(Json(DataResponse { data: banners }))
}

/// POST /api/v1/cta-banners
///
/// Create a banner. Omitted fields take their defaults (draft, `["all"]`,
/// 300px threshold, dismissible).
pub async fn create_banner(
    State(state): State<AppState>,
    Json(input): Json<CreateCtaBanner>,
) -> AppResult<impl IntoResponse> {
    validate_create(&input)?;
    let placement = input
        .placement
        .clone()
        .map(normalize_placement)
        .unwrap_or_else(default_placement);

    let row = CtaBannerRepo::create(&state.pool, &input, &placement).await?;

    tracing::info!(
        banner_id = row.id,
        name = %row.name,
        variant = %row.variant,
        status = %row.status,
        "CTA banner created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: row.to_detail()? })))
}

/// GET /api/v1/cta-banners/{id}
pub async fn get_banner(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = CtaBannerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse { data: row.to_detail()? }))
}

/// PUT /api/v1/cta-banners/{id}
///
/// Partially update a banner. Absent fields are left unchanged.
pub async fn update_banner(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCtaBanner>,
) -> AppResult<impl IntoResponse> {
    validate_update(&input)?;
    let placement = input.placement.clone().map(normalize_placement);

    let row = CtaBannerRepo::update(&state.pool, id, &input, placement.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(banner_id = id, status = %row.status, "CTA banner updated");

    Ok(Json(DataResponse { data: row.to_detail()? }))
}

/// DELETE /api/v1/cta-banners/{id}
pub async fn delete_banner(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CtaBannerRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(banner_id = id, "CTA banner deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Public embed endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/cta-banners/{id}/embed
///
/// Public banner config. Banners that are not `active` are reported as
/// missing so drafts never leak.
pub async fn get_embed_config(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = CtaBannerRepo::find_active_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse { data: row.to_config()? }))
}

/// POST /api/v1/cta-banners/{id}/track-view
pub async fn track_view(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CtaBannerRepo::increment_views(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::debug!(banner_id = id, "CTA banner view recorded");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/cta-banners/{id}/track-click
pub async fn track_click(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CtaBannerRepo::increment_clicks(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::debug!(banner_id = id, "CTA banner click recorded");
    Ok(StatusCode::NO_CONTENT)
}
