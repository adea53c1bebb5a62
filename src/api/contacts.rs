//! Contact / preorder inquiry endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::extract::StaffUser;
use crate::api::{AppState, Paginated};
use crate::domain::{Inquiry, InquiryStatus, InquiryType};
use crate::service::Submission;
use crate::store::{InquiryFilter, InquiryStats, PageRequest};
use crate::{Error, Result};

/// Required fields stay `Option` here so an omitted one surfaces as the
/// workflow's own validation error instead of a body-decoding rejection.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub inquiry_type: Option<InquiryType>,
    pub product_id: Option<Uuid>,
    pub quantity: Option<i64>,
}

/// Public submission; no auth required.
pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    body.validate()
        .map_err(|e| Error::validation(e.to_string()))?;
    let inquiry = state
        .inquiries
        .submit(Submission {
            name: body.name.unwrap_or_default(),
            email: body.email.unwrap_or_default(),
            phone: body.phone,
            subject: body.subject.unwrap_or_default(),
            message: body.message.unwrap_or_default(),
            inquiry_type: body.inquiry_type,
            product_id: body.product_id,
            quantity: body.quantity,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Your message has been sent successfully. We will get back to you soon!",
            "contactId": inquiry.id,
        })),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub inquiry_type: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Query(params): Query<ContactListParams>,
) -> Result<Json<Paginated<Inquiry>>> {
    let status = params
        .status
        .map(|s| s.parse::<InquiryStatus>().map_err(|_| Error::InvalidStatus(s)))
        .transpose()?;
    let inquiry_type = params
        .inquiry_type
        .map(|t| t.parse::<InquiryType>().map_err(|_| Error::InvalidStatus(t)))
        .transpose()?;
    let filter = InquiryFilter { status, inquiry_type };
    let page = PageRequest::new(params.page, params.limit);
    let result = state.inquiries.list(&filter, page).await?;
    Ok(Json(Paginated::new(result, page)))
}

pub async fn get(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Inquiry>> {
    Ok(Json(state.inquiries.get(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn update_status(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Inquiry>> {
    let status: InquiryStatus = body
        .status
        .parse()
        .map_err(|_| Error::InvalidStatus(body.status.clone()))?;
    Ok(Json(state.inquiries.update_status(id, status).await?))
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub message: String,
}

pub async fn respond(
    State(state): State<AppState>,
    StaffUser(caller): StaffUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RespondRequest>,
) -> Result<Json<Inquiry>> {
    Ok(Json(
        state
            .inquiries
            .respond(id, caller.user_id, body.message)
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub assigned_to: Option<Uuid>,
}

pub async fn assign(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AssignRequest>,
) -> Result<Json<Inquiry>> {
    Ok(Json(state.inquiries.assign(id, body.assigned_to).await?))
}

pub async fn stats(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
) -> Result<Json<InquiryStats>> {
    Ok(Json(state.inquiries.stats().await?))
}
