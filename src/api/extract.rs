//! Request extractors for authenticated callers

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::api::AppState;
use crate::service::Caller;
use crate::Error;

/// Any authenticated caller (customer or staff).
pub struct AuthUser(pub Caller);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Error> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(Error::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(Error::Unauthorized)?;
        let caller = state.auth.authenticate(token).await?;
        Ok(Self(caller))
    }
}

/// Staff-only gate on top of [`AuthUser`].
pub struct StaffUser(pub Caller);

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Error> {
        let AuthUser(caller) = AuthUser::from_request_parts(parts, state).await?;
        if !caller.is_staff() {
            return Err(Error::Forbidden);
        }
        Ok(Self(caller))
    }
}
