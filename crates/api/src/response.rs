//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. The embed client
//! unwraps the same envelope.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: banners }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
