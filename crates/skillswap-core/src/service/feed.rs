//! Personalized skill feed.
//!
//! For an anonymous caller the feed is the filtered skill set, newest first.
//! For a viewer the same set is reordered into three priority classes:
//!
//! 0. skills the viewer has a pending ask for
//! 1. the viewer's own skills
//! 2. everything else
//!
//! The whole filtered set is sorted once and then sliced, so every skill
//! lands on exactly one page and the page count matches the anonymous feed.

use std::cmp::Reverse;
use std::collections::HashMap;

use skillswap_types::category::CategoryId;
use skillswap_types::config::FeedConfig;
use skillswap_types::error::FeedError;
use skillswap_types::exchange::{ExchangeRequest, RequestStatus};
use skillswap_types::feed::{FeedItem, Page, PageInfo};
use skillswap_types::skill::{Skill, SkillId};
use skillswap_types::user::UserId;
use tracing::debug;

use crate::repository::Window;
use crate::repository::exchange::{ExchangeRepository, RequestFilter};
use crate::repository::skill::{SkillFilter, SkillRepository};

/// Feed listing parameters as received from the caller.
///
/// `page` and `limit` stay signed so that non-positive values reach
/// validation instead of failing to parse.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub struct FeedService<S: SkillRepository, E: ExchangeRepository> {
    skill_repo: S,
    exchange_repo: E,
    config: FeedConfig,
}

impl<S: SkillRepository, E: ExchangeRepository> FeedService<S, E> {
    pub fn new(skill_repo: S, exchange_repo: E, config: FeedConfig) -> Self {
        Self {
            skill_repo,
            exchange_repo,
            config,
        }
    }

    /// List one page of the feed, ranked for `viewer_id` when present.
    pub async fn list_skills(
        &self,
        viewer_id: Option<UserId>,
        query: FeedQuery,
    ) -> Result<Page<FeedItem>, FeedError> {
        let (page, limit) = self.resolve_paging(query.page, query.limit)?;
        let filter = SkillFilter {
            search: query.search.filter(|s| !s.trim().is_empty()),
            category_id: query.category_id,
        };

        // Anonymous callers get the window straight from storage; a viewer's
        // ranking needs the whole filtered set.
        let window = viewer_id.is_none().then(|| Window {
            limit: u64::from(limit),
            offset: u64::from(page - 1) * u64::from(limit),
        });
        let listing = self.skill_repo.list(&filter, window).await?;
        let total = listing.total;
        let meta = PageInfo::new(total, page, limit);

        let items = match viewer_id {
            None => listing.skills.into_iter().map(FeedItem::plain).collect(),
            Some(viewer_id) => {
                let asks = self
                    .exchange_repo
                    .list_requests(&RequestFilter {
                        from_user_id: Some(viewer_id),
                        status: Some(RequestStatus::Pending),
                        ..Default::default()
                    })
                    .await?;
                let asks: Vec<ExchangeRequest> = asks.into_iter().map(|d| d.request).collect();

                rank_feed(listing.skills, viewer_id, &asks)
                    .into_iter()
                    .skip(to_usize(meta.offset()))
                    .take(limit as usize)
                    .collect()
            }
        };

        debug!(
            total,
            page,
            limit,
            viewer = viewer_id.map(|v| v.to_string()),
            "feed page listed"
        );

        Ok(Page { items, meta })
    }

    /// Apply defaults, reject non-positive values, clamp the limit.
    fn resolve_paging(&self, page: Option<i64>, limit: Option<i64>) -> Result<(u32, u32), FeedError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(FeedError::InvalidArgument(format!(
                "page must be a positive integer, got {page}"
            )));
        }
        let limit = limit.unwrap_or(i64::from(self.config.default_limit));
        if limit < 1 {
            return Err(FeedError::InvalidArgument(format!(
                "limit must be a positive integer, got {limit}"
            )));
        }
        let limit = limit.min(i64::from(self.config.max_limit.max(1)));

        let page = u32::try_from(page)
            .map_err(|_| FeedError::InvalidArgument(format!("page {page} is out of range")))?;
        // Bounded by max_limit, which is a u32.
        let limit = u32::try_from(limit).unwrap_or(u32::MAX);
        Ok((page, limit))
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

/// Order `candidates` for `viewer_id`.
///
/// `asks` are the viewer's pending requests; when several target the same
/// skill, the newest one annotates the item. Within a class the order is
/// `created_at` descending, ties broken by id descending.
pub fn rank_feed(candidates: Vec<Skill>, viewer_id: UserId, asks: &[ExchangeRequest]) -> Vec<FeedItem> {
    let mut latest_ask: HashMap<SkillId, &ExchangeRequest> = HashMap::new();
    for ask in asks
        .iter()
        .filter(|r| r.from_user_id == viewer_id && r.status == RequestStatus::Pending)
    {
        latest_ask
            .entry(ask.requested_skill_id)
            .and_modify(|held| {
                if (ask.created_at, ask.id) > (held.created_at, held.id) {
                    *held = ask;
                }
            })
            .or_insert(ask);
    }

    let mut ranked: Vec<(u8, FeedItem)> = candidates
        .into_iter()
        .map(|skill| {
            let ask = latest_ask.get(&skill.id);
            let owned = skill.user_id == viewer_id;
            let class = match (ask, owned) {
                (Some(_), _) => 0,
                (None, true) => 1,
                (None, false) => 2,
            };
            let item = FeedItem {
                is_owned_by_viewer: owned,
                exchange_request_id: ask.map(|r| r.id),
                exchange_request_status: ask.map(|r| r.status),
                skill,
            };
            (class, item)
        })
        .collect();

    ranked.sort_by_key(|(class, item)| (*class, Reverse(item.skill.created_at), Reverse(item.skill.id)));
    ranked.into_iter().map(|(_, item)| item).collect()
}
