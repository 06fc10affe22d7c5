//! Exchange request and exchange repository trait definition.

use skillswap_types::error::RepositoryError;
use skillswap_types::exchange::{
    Exchange, ExchangeRequest, ExchangeRequestDetail, ExchangeRequestId, ParticipantRole, Rating,
    RequestStatus,
};
use skillswap_types::skill::SkillId;
use skillswap_types::user::UserId;

/// Filter criteria for listing exchange requests. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    /// User is either the sender or the recipient.
    pub participant: Option<UserId>,
    pub from_user_id: Option<UserId>,
    pub to_user_id: Option<UserId>,
    /// Skill is either the offered or the requested one.
    pub skill_id: Option<SkillId>,
    pub status: Option<RequestStatus>,
}

impl RequestFilter {
    pub fn matches(&self, request: &ExchangeRequest) -> bool {
        self.participant
            .is_none_or(|u| request.from_user_id == u || request.to_user_id == u)
            && self.from_user_id.is_none_or(|u| request.from_user_id == u)
            && self.to_user_id.is_none_or(|u| request.to_user_id == u)
            && self.skill_id.is_none_or(|s| request.involves_skill(&s))
            && self.status.is_none_or(|s| request.status == s)
    }
}

/// Repository trait for exchange requests and their exchanges.
///
/// Status-changing methods are conditional on the request still being
/// `Pending` in storage and return `Conflict` when it is not, so two racing
/// callers cannot both decide (or cancel) the same request.
pub trait ExchangeRepository: Send + Sync {
    /// Insert a pending request. Returns `Conflict` when an active pending
    /// request already exists for the same (from, to, offered, requested)
    /// tuple; the store enforces this with a uniqueness constraint.
    fn create_request(
        &self,
        request: &ExchangeRequest,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_request(
        &self,
        id: &ExchangeRequestId,
    ) -> impl std::future::Future<Output = Result<Option<ExchangeRequest>, RepositoryError>> + Send;

    /// Get a request with participant and skill summaries attached.
    fn get_request_detail(
        &self,
        id: &ExchangeRequestId,
    ) -> impl std::future::Future<Output = Result<Option<ExchangeRequestDetail>, RepositoryError>> + Send;

    /// List requests matching `filter`, newest first.
    fn list_requests(
        &self,
        filter: &RequestFilter,
    ) -> impl std::future::Future<Output = Result<Vec<ExchangeRequestDetail>, RepositoryError>> + Send;

    /// Mark a pending request accepted and insert its exchange as one unit.
    /// Either both writes are visible afterwards or neither is.
    fn accept_request(
        &self,
        id: &ExchangeRequestId,
        exchange: &Exchange,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Mark a pending request rejected.
    fn reject_request(
        &self,
        id: &ExchangeRequestId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Soft-delete a pending request. Its status is left untouched.
    fn withdraw_request(
        &self,
        id: &ExchangeRequestId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_exchange_by_request(
        &self,
        request_id: &ExchangeRequestId,
    ) -> impl std::future::Future<Output = Result<Option<Exchange>, RepositoryError>> + Send;

    /// Set one side's rating (and feedback, when given) on an exchange.
    /// Returns `Conflict` if that side has already rated.
    fn record_rating(
        &self,
        request_id: &ExchangeRequestId,
        role: ParticipantRole,
        rating: Rating,
        feedback: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Exchange, RepositoryError>> + Send;
}
