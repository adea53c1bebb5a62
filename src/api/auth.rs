//! Registration and login endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::api::AppState;
use crate::{Error, Result};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    body.validate()
        .map_err(|e| Error::validation(e.to_string()))?;
    let user = state
        .auth
        .register(body.username, body.email, body.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Account created", "user": user })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>> {
    let (user, session) = state.auth.login(&body.username, &body.password).await?;
    Ok(Json(serde_json::json!({ "token": session.token, "user": user })))
}
