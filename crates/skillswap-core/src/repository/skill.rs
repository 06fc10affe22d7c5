//! Skill repository trait definition.

use skillswap_types::category::CategoryId;
use skillswap_types::error::RepositoryError;
use skillswap_types::skill::{Skill, SkillId, fold_for_search};

use super::Window;

/// Filter criteria for skill listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillFilter {
    /// Case-insensitive substring matched against title or description.
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl SkillFilter {
    /// In-memory form of the filter, matching what the storage query selects.
    pub fn matches(&self, skill: &Skill) -> bool {
        if let Some(category_id) = self.category_id {
            if skill.category_id != category_id {
                return false;
            }
        }
        match self.search.as_deref() {
            Some(needle) => {
                let needle = fold_for_search(needle);
                fold_for_search(&skill.title).contains(&needle)
                    || fold_for_search(&skill.description).contains(&needle)
            }
            None => true,
        }
    }
}

/// A window of matching skills plus the size of the whole match set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillListing {
    pub total: u64,
    pub skills: Vec<Skill>,
}

/// Repository trait for skill persistence.
///
/// Listings are ordered by `created_at` descending, ties broken by id
/// descending, so the order is total and stable across calls.
pub trait SkillRepository: Send + Sync {
    /// Insert a new skill. Returns the stored skill.
    fn create(
        &self,
        skill: &Skill,
    ) -> impl std::future::Future<Output = Result<Skill, RepositoryError>> + Send;

    /// Get an active skill by id.
    fn get_by_id(
        &self,
        id: &SkillId,
    ) -> impl std::future::Future<Output = Result<Option<Skill>, RepositoryError>> + Send;

    /// List skills matching `filter`, newest first. `None` returns the whole
    /// set. `total` counts every match regardless of the window and is read
    /// from the same snapshot as the rows.
    fn list(
        &self,
        filter: &SkillFilter,
        window: Option<Window>,
    ) -> impl std::future::Future<Output = Result<SkillListing, RepositoryError>> + Send;
}
