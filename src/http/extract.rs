//! Extractors whose rejections render as [`ApiError`].

use super::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Typed path segments.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
