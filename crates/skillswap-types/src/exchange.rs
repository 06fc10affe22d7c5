use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::skill::{SkillId, SkillSummary};
use crate::user::{UserId, UserSummary};

crate::id::uuid_id! {
    /// Unique identifier for an exchange request.
    ExchangeRequestId
}

crate::id::uuid_id! {
    /// Unique identifier for an exchange (an accepted request's trade record).
    ExchangeId
}

/// Negotiation state of an exchange request.
///
/// - Pending: awaiting the recipient's decision (or the sender's withdrawal)
/// - Accepted: terminal, an `Exchange` exists for the request
/// - Rejected: terminal, no `Exchange` is ever created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Apply the recipient's decision. Only `Pending` may transition; any
    /// terminal status is returned unchanged as the error.
    pub fn decide(self, decision: Decision) -> Result<RequestStatus, RequestStatus> {
        match self {
            RequestStatus::Pending => Ok(decision.into()),
            terminal => Err(terminal),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Accepted => write!(f, "accepted"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(format!("invalid request status: '{other}'")),
        }
    }
}

/// The recipient's answer to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
}

impl From<Decision> for RequestStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Accepted => RequestStatus::Accepted,
            Decision::Rejected => RequestStatus::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&RequestStatus::from(*self), f)
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accepted" => Ok(Decision::Accepted),
            "rejected" => Ok(Decision::Rejected),
            other => Err(format!("invalid decision: '{other}' (expected accepted or rejected)")),
        }
    }
}

/// Which side of a request a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantRole {
    Sender,
    Recipient,
}

/// A proposed bilateral trade: "I offer `offered_skill_id`, I want your
/// `requested_skill_id`".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    pub id: ExchangeRequestId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub offered_skill_id: SkillId,
    pub requested_skill_id: SkillId,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExchangeRequest {
    /// Build a fresh pending request.
    pub fn pending(
        from_user_id: UserId,
        to_user_id: UserId,
        offered_skill_id: SkillId,
        requested_skill_id: SkillId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExchangeRequestId::new(),
            from_user_id,
            to_user_id,
            offered_skill_id,
            requested_skill_id,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn role_of(&self, user_id: &UserId) -> Option<ParticipantRole> {
        if *user_id == self.from_user_id {
            Some(ParticipantRole::Sender)
        } else if *user_id == self.to_user_id {
            Some(ParticipantRole::Recipient)
        } else {
            None
        }
    }

    pub fn involves_skill(&self, skill_id: &SkillId) -> bool {
        self.offered_skill_id == *skill_id || self.requested_skill_id == *skill_id
    }
}

/// An exchange request with participant and skill summaries attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRequestDetail {
    #[serde(flatten)]
    pub request: ExchangeRequest,
    pub from_user: UserSummary,
    pub to_user: UserSummary,
    pub offered_skill: SkillSummary,
    pub requested_skill: SkillSummary,
}

/// A validated rating score in the inclusive range 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Rejects every value outside `MIN..=MAX`, including ones past `u8`.
    pub fn new(value: i64) -> Result<Self, String> {
        match u8::try_from(value) {
            Ok(score) if (Self::MIN..=Self::MAX).contains(&score) => Ok(Self(score)),
            _ => Err(format!(
                "rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value.into())
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// The record of an accepted trade. Created exactly once, when its request
/// transitions to `Accepted`; afterwards only the ratings and feedback change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: ExchangeId,
    pub request_id: ExchangeRequestId,
    pub from_user_rating: Option<Rating>,
    pub to_user_rating: Option<Rating>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Exchange {
    /// Build the unrated exchange paired with an accepted request.
    pub fn for_request(request_id: ExchangeRequestId) -> Self {
        let now = Utc::now();
        Self {
            id: ExchangeId::new(),
            request_id,
            from_user_rating: None,
            to_user_rating: None,
            feedback: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rating_for(&self, role: ParticipantRole) -> Option<Rating> {
        match role {
            ParticipantRole::Sender => self.from_user_rating,
            ParticipantRole::Recipient => self.to_user_rating,
        }
    }
}

/// Body of a create-request call. The sender is the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExchangeRequest {
    pub to_user_id: UserId,
    pub offered_skill_id: SkillId,
    pub requested_skill_id: SkillId,
}

/// Body of a respond call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondToRequest {
    pub status: Decision,
}

/// Body of a rate call. The rating is taken as a plain integer and
/// range-checked by the service, so the caller gets an `InvalidArgument`
/// rather than a deserialization failure for any out-of-range number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateExchange {
    pub rating: i64,
    pub feedback: Option<String>,
}

/// Aggregate exchange state of a skill from one viewer's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillExchangeStatus {
    Available,
    Pending,
    Exchanged,
}

/// A request annotated with which side the viewer is on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerRequest {
    #[serde(flatten)]
    pub detail: ExchangeRequestDetail,
    pub is_from_viewer: bool,
    pub is_to_viewer: bool,
}

/// Result of a skill exchange-status lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillExchangeOverview {
    pub status: SkillExchangeStatus,
    pub requests: Vec<ViewerRequest>,
}
