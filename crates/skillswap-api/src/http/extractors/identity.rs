//! Caller identity extractors.
//!
//! Authentication happens upstream; the verified user id arrives in the
//! `X-User-Id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use skillswap_types::user::UserId;

use crate::http::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller. Rejects the request when the header is absent.
pub struct Caller(pub UserId);

/// The caller, if the request carries one.
pub struct MaybeCaller(pub Option<UserId>);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        caller_from_headers(parts)?.map(Caller).ok_or_else(|| {
            AppError::Unauthorized(format!("Missing caller identity ({USER_ID_HEADER} header)"))
        })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeCaller(caller_from_headers(parts)?))
    }
}

/// A present but malformed header is rejected rather than treated as anonymous.
fn caller_from_headers(parts: &Parts) -> Result<Option<UserId>, AppError> {
    let Some(value) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };

    let raw = value
        .to_str()
        .map_err(|_| AppError::Unauthorized(format!("Invalid {USER_ID_HEADER} header encoding")))?;

    raw.trim()
        .parse::<UserId>()
        .map(Some)
        .map_err(|_| AppError::Unauthorized(format!("Invalid {USER_ID_HEADER} header: '{raw}'")))
}
