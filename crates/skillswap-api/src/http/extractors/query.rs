//! Query parameter extractors for list endpoints.

use std::str::FromStr;

use serde::Deserialize;

use skillswap_core::service::exchange::RequestQuery;
use skillswap_core::service::feed::FeedQuery;
use skillswap_types::category::CategoryId;
use skillswap_types::exchange::RequestStatus;
use skillswap_types::skill::SkillId;

use crate::http::error::AppError;

/// Query parameters for the skill feed.
#[derive(Debug, Deserialize, Default)]
pub struct SkillListQuery {
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    pub category_id: Option<i64>,
    /// 1-based page number.
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<SkillListQuery> for FeedQuery {
    fn from(q: SkillListQuery) -> Self {
        FeedQuery {
            search: q.search,
            category_id: q.category_id.map(CategoryId),
            page: q.page,
            limit: q.limit,
        }
    }
}

/// Query parameters for the caller's exchange request list.
#[derive(Debug, Deserialize, Default)]
pub struct RequestListQuery {
    /// Matches either the offered or the requested skill.
    pub skill_id: Option<String>,
    /// pending, accepted, or rejected.
    pub status: Option<String>,
}

impl TryFrom<RequestListQuery> for RequestQuery {
    type Error = AppError;

    fn try_from(q: RequestListQuery) -> Result<Self, Self::Error> {
        let skill_id = q
            .skill_id
            .as_deref()
            .map(|s| parse_id::<SkillId>(s, "skill_id"))
            .transpose()?;
        let status = q
            .status
            .as_deref()
            .map(|s| s.parse::<RequestStatus>().map_err(AppError::Validation))
            .transpose()?;

        Ok(RequestQuery { skill_id, status })
    }
}

/// Parse an id from a path segment or query value.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid {what}: '{raw}'")))
}
