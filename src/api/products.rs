//! Catalog endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::extract::{AuthUser, StaffUser};
use crate::api::{AppState, Paginated};
use crate::domain::{Category, Product, ProductDraft};
use crate::store::ProductFilter;
use crate::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<Category>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

/// Public listing; staff may additionally request hidden products.
pub async fn list(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<Paginated<Product>>> {
    let is_staff = caller.is_some_and(|AuthUser(c)| c.is_staff());
    let filter = ProductFilter {
        category: params.category,
        featured: params.featured,
        search: params.search.clone(),
        include_inactive: params.include_inactive && is_staff,
    };
    let page = crate::store::PageRequest::new(params.page, params.limit);
    let result = state.catalog.list(&filter, page).await?;
    Ok(Json(Paginated::new(result, page)))
}

pub async fn get(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>> {
    let is_staff = caller.is_some_and(|AuthUser(c)| c.is_staff());
    Ok(Json(state.catalog.get(id, is_staff).await?))
}

pub async fn create(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog.create(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog.update(id, draft).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.catalog.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i64,
}

pub async fn adjust_stock(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AdjustStockRequest>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog.adjust_stock(id, body.delta).await?))
}
