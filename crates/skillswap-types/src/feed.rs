//! Feed listing types: ranked skill items and pagination metadata.

use serde::{Deserialize, Serialize};

use crate::exchange::{ExchangeRequestId, RequestStatus};
use crate::skill::Skill;

/// A skill as it appears in a viewer's feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(flatten)]
    pub skill: Skill,
    pub is_owned_by_viewer: bool,
    /// Set only when the viewer has a pending ask for this skill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_request_id: Option<ExchangeRequestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_request_status: Option<RequestStatus>,
}

impl FeedItem {
    /// An item with no viewer-specific annotations.
    pub fn plain(skill: Skill) -> Self {
        Self {
            skill,
            is_owned_by_viewer: false,
            exchange_request_id: None,
            exchange_request_status: None,
        }
    }
}

/// Offset pagination metadata. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageInfo {
    /// Derive page metadata from the size of the full filtered set.
    /// `limit` must be non-zero.
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let total_pages = total.div_ceil(u64::from(limit));
        Self {
            total,
            page,
            limit,
            total_pages,
            has_next_page: u64::from(page) < total_pages,
            has_previous_page: page > 1,
        }
    }

    /// Index of the first item on this page within the full ordering.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_info_exact_multiple() {
        let info = PageInfo::new(20, 2, 10);
        assert_eq!(info.total_pages, 2);
        assert!(!info.has_next_page);
        assert!(info.has_previous_page);
        assert_eq!(info.offset(), 10);
    }

    #[test]
    fn test_page_info_partial_last_page() {
        let info = PageInfo::new(21, 1, 10);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next_page);
        assert!(!info.has_previous_page);
        assert_eq!(info.offset(), 0);
    }

    #[test]
    fn test_page_info_empty_set() {
        let info = PageInfo::new(0, 1, 10);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next_page);
        assert!(!info.has_previous_page);
    }

    #[test]
    fn test_page_info_past_the_end() {
        let info = PageInfo::new(5, 4, 2);
        assert_eq!(info.total_pages, 3);
        assert!(!info.has_next_page);
        assert!(info.has_previous_page);
    }
}
