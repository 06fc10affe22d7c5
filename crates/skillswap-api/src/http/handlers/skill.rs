//! Skill feed handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};

use skillswap_types::exchange::SkillExchangeOverview;
use skillswap_types::feed::{FeedItem, Page};
use skillswap_types::skill::SkillId;

use crate::http::error::AppError;
use crate::http::extractors::identity::{Caller, MaybeCaller};
use crate::http::extractors::query::{SkillListQuery, parse_id};
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/skills - One page of the feed, ranked for the caller if known.
pub async fn list_skills(
    State(state): State<AppState>,
    MaybeCaller(viewer): MaybeCaller,
    Query(query): Query<SkillListQuery>,
) -> Result<Json<ApiResponse<Page<FeedItem>>>, AppError> {
    let start = Instant::now();

    let page = state.feed_service.list_skills(viewer, query.into()).await?;

    Ok(Json(ApiResponse::since(page, start)))
}

/// GET /api/v1/skills/:id/exchange-status - Where the skill stands in the
/// caller's negotiations.
pub async fn skill_exchange_status(
    State(state): State<AppState>,
    Caller(viewer): Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SkillExchangeOverview>>, AppError> {
    let start = Instant::now();
    let skill_id: SkillId = parse_id(&id, "skill id")?;

    let overview = state
        .exchange_service
        .skill_exchange_status(skill_id, viewer)
        .await?;

    Ok(Json(ApiResponse::since(overview, start)))
}
