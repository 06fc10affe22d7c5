use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::CategoryId;
use crate::user::UserId;

crate::id::uuid_id! {
    /// Unique identifier for a skill listing.
    SkillId
}

/// A skill a user offers to teach.
///
/// Ownership never transfers: `user_id` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Case-fold text for substring search. Storage and in-memory filters must
/// both go through this so they agree on non-ASCII input.
pub fn fold_for_search(text: &str) -> String {
    text.to_lowercase()
}

/// The slice of a skill attached to exchange request details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSummary {
    pub id: SkillId,
    pub title: String,
    pub description: String,
}

impl From<&Skill> for SkillSummary {
    fn from(skill: &Skill) -> Self {
        Self {
            id: skill.id,
            title: skill.title.clone(),
            description: skill.description.clone(),
        }
    }
}
