//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })` to keep the shape
//! consistent across handlers.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// `T` may be an `Option`, in which case a missing value serializes as
/// `{ "data": null }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
