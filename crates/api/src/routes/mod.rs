pub mod cta_banners;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /cta-banners                       list, create
/// /cta-banners/{id}                  get, update, delete
/// /cta-banners/{id}/embed            public config (active only)
/// /cta-banners/{id}/track-view       view counter
/// /cta-banners/{id}/track-click      click counter
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/cta-banners", cta_banners::router())
}
