//! Route definitions for CTA banners, mounted at `/cta-banners`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cta_banners;
use crate::state::AppState;

/// ```text
/// GET    /                  -> list_banners
/// POST   /                  -> create_banner
/// GET    /{id}              -> get_banner
/// PUT    /{id}              -> update_banner
/// DELETE /{id}              -> delete_banner
/// GET    /{id}/embed        -> get_embed_config
/// POST   /{id}/track-view   -> track_view
/// POST   /{id}/track-click  -> track_click
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cta_banners::list_banners).post(cta_banners::create_banner),
        )
        .route(
            "/{id}",
            get(cta_banners::get_banner)
                .put(cta_banners::update_banner)
                .delete(cta_banners::delete_banner),
        )
        .route("/{id}/embed", get(cta_banners::get_embed_config))
        .route("/{id}/track-view", post(cta_banners::track_view))
        .route("/{id}/track-click", post(cta_banners::track_click))
}
