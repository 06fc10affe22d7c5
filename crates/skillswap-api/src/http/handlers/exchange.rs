//! Exchange request handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use skillswap_types::exchange::{
    CreateExchangeRequest, Exchange, ExchangeRequestDetail, ExchangeRequestId, RateExchange,
    RespondToRequest,
};

use crate::http::error::AppError;
use crate::http::extractors::identity::Caller;
use crate::http::extractors::query::{RequestListQuery, parse_id};
use crate::http::response::ApiResponse;
use crate::state::AppState;

fn request_id(raw: &str) -> Result<ExchangeRequestId, AppError> {
    parse_id(raw, "exchange request id")
}

/// POST /api/v1/exchange-requests - Propose a trade as the caller.
pub async fn create_request(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(body): Json<CreateExchangeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ExchangeRequestDetail>>), AppError> {
    let start = Instant::now();

    let detail = state.exchange_service.create_request(caller, body).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::since(detail, start))))
}

/// GET /api/v1/exchange-requests - Requests the caller sent or received.
pub async fn list_requests(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<ApiResponse<Vec<ExchangeRequestDetail>>>, AppError> {
    let start = Instant::now();

    let requests = state
        .exchange_service
        .list_for_user(caller, query.try_into()?)
        .await?;

    Ok(Json(ApiResponse::since(requests, start)))
}

/// GET /api/v1/exchange-requests/sent
pub async fn list_sent(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<ApiResponse<Vec<ExchangeRequestDetail>>>, AppError> {
    let start = Instant::now();
    let requests = state.exchange_service.list_sent(caller).await?;
    Ok(Json(ApiResponse::since(requests, start)))
}

/// GET /api/v1/exchange-requests/received
pub async fn list_received(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<ApiResponse<Vec<ExchangeRequestDetail>>>, AppError> {
    let start = Instant::now();
    let requests = state.exchange_service.list_received(caller).await?;
    Ok(Json(ApiResponse::since(requests, start)))
}

/// GET /api/v1/exchange-requests/:id
pub async fn get_request(
    State(state): State<AppState>,
    Caller(_caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ExchangeRequestDetail>>, AppError> {
    let start = Instant::now();
    let detail = state.exchange_service.get_request(&request_id(&id)?).await?;
    Ok(Json(ApiResponse::since(detail, start)))
}

/// PUT /api/v1/exchange-requests/:id/status - Accept or reject as recipient.
pub async fn respond(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(body): Json<RespondToRequest>,
) -> Result<Json<ApiResponse<ExchangeRequestDetail>>, AppError> {
    let start = Instant::now();

    let detail = state
        .exchange_service
        .respond(&request_id(&id)?, caller, body.status)
        .await?;

    Ok(Json(ApiResponse::since(detail, start)))
}

/// DELETE /api/v1/exchange-requests/:id - Withdraw a pending request as sender.
pub async fn cancel(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id = request_id(&id)?;

    state.exchange_service.cancel(&id, caller).await?;

    Ok(Json(ApiResponse::since(
        serde_json::json!({"withdrawn": true, "id": id}),
        start,
    )))
}

/// GET /api/v1/exchange-requests/:id/exchange
pub async fn get_exchange(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Exchange>>, AppError> {
    let start = Instant::now();
    let exchange = state
        .exchange_service
        .get_exchange(&request_id(&id)?, caller)
        .await?;
    Ok(Json(ApiResponse::since(exchange, start)))
}

/// POST /api/v1/exchange-requests/:id/rating
pub async fn rate(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(body): Json<RateExchange>,
) -> Result<Json<ApiResponse<Exchange>>, AppError> {
    let start = Instant::now();

    let exchange = state
        .exchange_service
        .rate(&request_id(&id)?, caller, body)
        .await?;

    Ok(Json(ApiResponse::since(exchange, start)))
}
