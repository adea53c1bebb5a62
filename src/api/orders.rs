//! Order endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::extract::{AuthUser, StaffUser};
use crate::api::{AppState, Paginated};
use crate::domain::{Order, OrderStatus, ShippingAddress};
use crate::service::ItemRequest;
use crate::store::{OrderFilter, PageRequest};
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<ItemRequest>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub notes: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = state
        .orders
        .create(
            caller.user_id,
            body.items,
            body.shipping_address,
            body.payment_method,
            body.notes,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

fn parse_status(raw: Option<String>) -> Result<Option<OrderStatus>> {
    raw.map(|s| s.parse().map_err(|_| Error::InvalidStatus(s)))
        .transpose()
}

#[derive(Debug, Deserialize)]
pub struct MyOrdersParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

pub async fn list_mine(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(params): Query<MyOrdersParams>,
) -> Result<Json<Paginated<Order>>> {
    let filter = OrderFilter {
        status: parse_status(params.status)?,
        customer_id: Some(caller.user_id),
    };
    let page = PageRequest::new(params.page, params.limit);
    let result = state.orders.list(filter, page, caller).await?;
    Ok(Json(Paginated::new(result, page)))
}

#[derive(Debug, Deserialize)]
pub struct AllOrdersParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub customer: Option<Uuid>,
}

pub async fn list_all(
    State(state): State<AppState>,
    StaffUser(caller): StaffUser,
    Query(params): Query<AllOrdersParams>,
) -> Result<Json<Paginated<Order>>> {
    let filter = OrderFilter {
        status: parse_status(params.status)?,
        customer_id: params.customer,
    };
    let page = PageRequest::new(params.page, params.limit);
    let result = state.orders.list(filter, page, caller).await?;
    Ok(Json(Paginated::new(result, page)))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>> {
    Ok(Json(state.orders.get(id, caller).await?))
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
) -> Result<Json<Order>> {
    let status: OrderStatus = body
        .status
        .parse()
        .map_err(|_| Error::InvalidStatus(body.status.clone()))?;
    Ok(Json(state.orders.update_status(id, status).await?))
}

pub async fn cancel(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>> {
    Ok(Json(state.orders.cancel(id, caller).await?))
}
