//! Extractors whose rejections use the API's JSON error body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::api::ApiErrorResponse;

/// [`axum::Json`] that rejects with `400 INVALID_INPUT`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiErrorResponse))]
pub struct ApiJson<T>(pub T);

/// [`axum::extract::Path`] that rejects with `400 INVALID_INPUT`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiErrorResponse))]
pub struct ApiPath<T>(pub T);
