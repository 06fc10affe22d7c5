//! Exchange negotiation service.
//!
//! Owns the lifecycle of an exchange request: creation by the offering user,
//! a single accept/reject decision by the recipient (or withdrawal by the
//! sender while still pending), and post-trade ratings on the resulting
//! exchange. Every mutating call validates the current status at its
//! boundary; the repository re-checks it inside the write so a concurrent
//! caller that lost the race gets `Conflict` too.

use skillswap_types::error::{ExchangeError, RepositoryError};
use skillswap_types::exchange::{
    CreateExchangeRequest, Decision, Exchange, ExchangeRequest, ExchangeRequestDetail,
    ExchangeRequestId, ParticipantRole, RateExchange, Rating, RequestStatus, SkillExchangeOverview,
    SkillExchangeStatus, ViewerRequest,
};
use skillswap_types::skill::SkillId;
use skillswap_types::user::UserId;
use tracing::{debug, info, warn};

use crate::repository::exchange::{ExchangeRepository, RequestFilter};
use crate::repository::skill::SkillRepository;

/// Optional narrowing for a user's request listing.
#[derive(Debug, Clone, Default)]
pub struct RequestQuery {
    /// Matches either the offered or the requested skill.
    pub skill_id: Option<SkillId>,
    pub status: Option<RequestStatus>,
}

/// Service enforcing who may act on an exchange request, and when.
///
/// Generic over repository traits to maintain clean architecture --
/// skillswap-core never depends on skillswap-infra.
pub struct ExchangeService<E: ExchangeRepository, S: SkillRepository> {
    exchange_repo: E,
    skill_repo: S,
}

impl<E: ExchangeRepository, S: SkillRepository> ExchangeService<E, S> {
    pub fn new(exchange_repo: E, skill_repo: S) -> Self {
        Self {
            exchange_repo,
            skill_repo,
        }
    }

    /// Propose a trade from `from_user_id` to `input.to_user_id`.
    ///
    /// The offered skill must belong to the sender and the requested skill to
    /// the recipient. Resubmitting a tuple that is still pending is rejected
    /// with `Conflict`; once the earlier request is decided or withdrawn the
    /// same tuple may be proposed again.
    pub async fn create_request(
        &self,
        from_user_id: UserId,
        input: CreateExchangeRequest,
    ) -> Result<ExchangeRequestDetail, ExchangeError> {
        if from_user_id == input.to_user_id {
            return Err(ExchangeError::InvalidArgument(
                "cannot propose an exchange with yourself".to_string(),
            ));
        }

        let offered = self.skill_repo.get_by_id(&input.offered_skill_id).await?;
        if !offered.is_some_and(|s| s.user_id == from_user_id) {
            return Err(ExchangeError::NotFound(
                "Offered skill not found or does not belong to you".to_string(),
            ));
        }

        let requested = self.skill_repo.get_by_id(&input.requested_skill_id).await?;
        if !requested.is_some_and(|s| s.user_id == input.to_user_id) {
            return Err(ExchangeError::NotFound(
                "Requested skill not found or does not belong to the target user".to_string(),
            ));
        }

        let request = ExchangeRequest::pending(
            from_user_id,
            input.to_user_id,
            input.offered_skill_id,
            input.requested_skill_id,
        );

        self.exchange_repo
            .create_request(&request)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ExchangeError::Conflict(
                    "A similar exchange request is already pending".to_string(),
                ),
                other => other.into(),
            })?;

        info!(
            request_id = %request.id,
            from = %request.from_user_id,
            to = %request.to_user_id,
            "exchange request created"
        );

        self.get_request(&request.id).await
    }

    /// Accept or reject a pending request. Only the recipient may decide.
    ///
    /// Acceptance sets the status and creates the paired exchange in one
    /// atomic unit.
    pub async fn respond(
        &self,
        request_id: &ExchangeRequestId,
        responder_id: UserId,
        decision: Decision,
    ) -> Result<ExchangeRequestDetail, ExchangeError> {
        let request = self.find_request(request_id).await?;

        if request.to_user_id != responder_id {
            warn!(request_id = %request_id, user = %responder_id, "respond by non-recipient");
            return Err(ExchangeError::Forbidden(
                "Only the recipient can accept or reject this exchange request".to_string(),
            ));
        }

        let next = request
            .status
            .decide(decision)
            .map_err(|current| ExchangeError::Conflict(format!("Exchange request is already {current}")))?;

        let result = match next {
            RequestStatus::Accepted => {
                let exchange = Exchange::for_request(request.id);
                self.exchange_repo.accept_request(request_id, &exchange).await
            }
            _ => self.exchange_repo.reject_request(request_id).await,
        };
        result.map_err(lost_race)?;

        info!(request_id = %request_id, status = %next, "exchange request decided");

        self.get_request(request_id).await
    }

    /// Withdraw a pending request. Only the sender may withdraw, and an
    /// accepted trade cannot be withdrawn unilaterally.
    pub async fn cancel(
        &self,
        request_id: &ExchangeRequestId,
        caller_id: UserId,
    ) -> Result<(), ExchangeError> {
        let request = self.find_request(request_id).await?;

        if request.from_user_id != caller_id {
            return Err(ExchangeError::Forbidden(
                "Only the sender can withdraw this exchange request".to_string(),
            ));
        }
        if request.status != RequestStatus::Pending {
            return Err(ExchangeError::Conflict(format!(
                "Exchange request is already {}",
                request.status
            )));
        }

        self.exchange_repo
            .withdraw_request(request_id)
            .await
            .map_err(lost_race)?;

        info!(request_id = %request_id, "exchange request withdrawn");
        Ok(())
    }

    /// Rate the trade behind an accepted request. Each participant rates once.
    pub async fn rate(
        &self,
        request_id: &ExchangeRequestId,
        rater_id: UserId,
        input: RateExchange,
    ) -> Result<Exchange, ExchangeError> {
        let rating = Rating::new(input.rating).map_err(ExchangeError::InvalidArgument)?;
        let feedback = input
            .feedback
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty());

        let (request, exchange) = self.find_exchange(request_id).await?;

        let role = request.role_of(&rater_id).ok_or_else(|| {
            ExchangeError::Forbidden("You are not a participant in this exchange".to_string())
        })?;

        if exchange.rating_for(role).is_some() {
            return Err(ExchangeError::Conflict(
                "You have already rated this exchange".to_string(),
            ));
        }

        let exchange = self
            .exchange_repo
            .record_rating(request_id, role, rating, feedback)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    ExchangeError::Conflict("You have already rated this exchange".to_string())
                }
                other => other.into(),
            })?;

        info!(request_id = %request_id, ?role, rating = rating.value(), "exchange rated");
        Ok(exchange)
    }

    /// Get the exchange behind an accepted request. Participants only.
    pub async fn get_exchange(
        &self,
        request_id: &ExchangeRequestId,
        caller_id: UserId,
    ) -> Result<Exchange, ExchangeError> {
        let (request, exchange) = self.find_exchange(request_id).await?;
        if request.role_of(&caller_id).is_none() {
            return Err(ExchangeError::Forbidden(
                "You are not a participant in this exchange".to_string(),
            ));
        }
        Ok(exchange)
    }

    // --- Queries ---

    pub async fn get_request(
        &self,
        request_id: &ExchangeRequestId,
    ) -> Result<ExchangeRequestDetail, ExchangeError> {
        self.exchange_repo
            .get_request_detail(request_id)
            .await?
            .ok_or_else(request_not_found)
    }

    /// Requests the user sent or received, newest first.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        query: RequestQuery,
    ) -> Result<Vec<ExchangeRequestDetail>, ExchangeError> {
        let filter = RequestFilter {
            participant: Some(user_id),
            skill_id: query.skill_id,
            status: query.status,
            ..Default::default()
        };
        debug!(?filter, "listing exchange requests");
        Ok(self.exchange_repo.list_requests(&filter).await?)
    }

    pub async fn list_sent(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ExchangeRequestDetail>, ExchangeError> {
        let filter = RequestFilter {
            from_user_id: Some(user_id),
            ..Default::default()
        };
        Ok(self.exchange_repo.list_requests(&filter).await?)
    }

    pub async fn list_received(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ExchangeRequestDetail>, ExchangeError> {
        let filter = RequestFilter {
            to_user_id: Some(user_id),
            ..Default::default()
        };
        Ok(self.exchange_repo.list_requests(&filter).await?)
    }

    /// Summarize where a skill stands in the viewer's own negotiations:
    /// `exchanged` if any of their requests touching it was accepted, else
    /// `pending` if any is still open, else `available`.
    pub async fn skill_exchange_status(
        &self,
        skill_id: SkillId,
        viewer_id: UserId,
    ) -> Result<SkillExchangeOverview, ExchangeError> {
        let filter = RequestFilter {
            participant: Some(viewer_id),
            skill_id: Some(skill_id),
            ..Default::default()
        };
        let requests = self.exchange_repo.list_requests(&filter).await?;

        let status = if requests
            .iter()
            .any(|d| d.request.status == RequestStatus::Accepted)
        {
            SkillExchangeStatus::Exchanged
        } else if requests
            .iter()
            .any(|d| d.request.status == RequestStatus::Pending)
        {
            SkillExchangeStatus::Pending
        } else {
            SkillExchangeStatus::Available
        };

        let requests = requests
            .into_iter()
            .map(|detail| ViewerRequest {
                is_from_viewer: detail.request.from_user_id == viewer_id,
                is_to_viewer: detail.request.to_user_id == viewer_id,
                detail,
            })
            .collect();

        Ok(SkillExchangeOverview { status, requests })
    }

    async fn find_request(
        &self,
        request_id: &ExchangeRequestId,
    ) -> Result<ExchangeRequest, ExchangeError> {
        self.exchange_repo
            .get_request(request_id)
            .await?
            .ok_or_else(request_not_found)
    }

    async fn find_exchange(
        &self,
        request_id: &ExchangeRequestId,
    ) -> Result<(ExchangeRequest, Exchange), ExchangeError> {
        let request = self.find_request(request_id).await?;
        let exchange = self
            .exchange_repo
            .get_exchange_by_request(request_id)
            .await?
            .ok_or_else(|| ExchangeError::NotFound("Exchange not found".to_string()))?;
        Ok((request, exchange))
    }
}

fn request_not_found() -> ExchangeError {
    ExchangeError::NotFound("Exchange request not found".to_string())
}

/// A conditional write found the request no longer pending.
fn lost_race(e: RepositoryError) -> ExchangeError {
    match e {
        RepositoryError::Conflict(_) => {
            ExchangeError::Conflict("Exchange request is no longer pending".to_string())
        }
        RepositoryError::NotFound => request_not_found(),
        other => other.into(),
    }
}
