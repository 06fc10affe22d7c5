//! In-memory repository used by the service tests.
//!
//! Mirrors the storage guarantees the services rely on: the pending-tuple
//! uniqueness rule, conditional status updates, and write-once ratings.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use skillswap_types::category::CategoryId;
use skillswap_types::error::RepositoryError;
use skillswap_types::exchange::{
    Exchange, ExchangeRequest, ExchangeRequestDetail, ExchangeRequestId, ParticipantRole, Rating,
    RequestStatus,
};
use skillswap_types::skill::{Skill, SkillId, SkillSummary};
use skillswap_types::user::{UserId, UserSummary};

use crate::repository::Window;
use crate::repository::exchange::{ExchangeRepository, RequestFilter};
use crate::repository::skill::{SkillFilter, SkillListing, SkillRepository};

#[derive(Default)]
struct State {
    users: HashMap<UserId, UserSummary>,
    skills: Vec<Skill>,
    /// Request plus its soft-delete flag.
    requests: Vec<(ExchangeRequest, bool)>,
    exchanges: Vec<Exchange>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    fail_exchange_insert: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, id: UserId, name: &str) {
        let summary = UserSummary {
            id,
            name: name.to_string(),
            email: format!("{name}@example.com"),
            avatar: None,
        };
        self.state.lock().unwrap().users.insert(id, summary);
    }

    pub fn insert_skill(&self, skill: Skill) {
        self.state.lock().unwrap().skills.push(skill);
    }

    pub fn insert_request(&self, request: ExchangeRequest) {
        self.state.lock().unwrap().requests.push((request, false));
    }

    /// Make the next exchange insert fail, as a storage error would.
    pub fn fail_next_exchange_insert(&self) {
        self.fail_exchange_insert.store(true, Ordering::SeqCst);
    }
}

impl State {
    fn detail(&self, request: &ExchangeRequest) -> Option<ExchangeRequestDetail> {
        let skill = |id: SkillId| self.skills.iter().find(|s| s.id == id).map(SkillSummary::from);
        Some(ExchangeRequestDetail {
            from_user: self.users.get(&request.from_user_id)?.clone(),
            to_user: self.users.get(&request.to_user_id)?.clone(),
            offered_skill: skill(request.offered_skill_id)?,
            requested_skill: skill(request.requested_skill_id)?,
            request: request.clone(),
        })
    }

    fn live_request_mut(&mut self, id: &ExchangeRequestId) -> Option<&mut ExchangeRequest> {
        self.requests
            .iter_mut()
            .find(|(r, deleted)| r.id == *id && !deleted)
            .map(|(r, _)| r)
    }
}

fn pending_or_conflict(request: Option<&mut ExchangeRequest>) -> Result<&mut ExchangeRequest, RepositoryError> {
    match request {
        None => Err(RepositoryError::NotFound),
        Some(r) if r.status != RequestStatus::Pending => {
            Err(RepositoryError::Conflict(format!("request is {}", r.status)))
        }
        Some(r) => Ok(r),
    }
}

fn newest_first<T: Ord>(a: (DateTime<Utc>, T), b: (DateTime<Utc>, T)) -> std::cmp::Ordering {
    b.cmp(&a)
}

impl SkillRepository for InMemoryStore {
    async fn create(&self, skill: &Skill) -> Result<Skill, RepositoryError> {
        self.insert_skill(skill.clone());
        Ok(skill.clone())
    }

    async fn get_by_id(&self, id: &SkillId) -> Result<Option<Skill>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.skills.iter().find(|s| s.id == *id).cloned())
    }

    async fn list(
        &self,
        filter: &SkillFilter,
        window: Option<Window>,
    ) -> Result<SkillListing, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut skills: Vec<Skill> = state
            .skills
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        skills.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
        let total = skills.len() as u64;
        let skills = match window {
            Some(w) => skills
                .into_iter()
                .skip(w.offset as usize)
                .take(w.limit as usize)
                .collect(),
            None => skills,
        };
        Ok(SkillListing { total, skills })
    }
}

impl ExchangeRepository for InMemoryStore {
    async fn create_request(&self, request: &ExchangeRequest) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let duplicate = state.requests.iter().any(|(r, deleted)| {
            !deleted
                && r.status == RequestStatus::Pending
                && r.from_user_id == request.from_user_id
                && r.to_user_id == request.to_user_id
                && r.offered_skill_id == request.offered_skill_id
                && r.requested_skill_id == request.requested_skill_id
        });
        if duplicate {
            return Err(RepositoryError::Conflict("UNIQUE constraint failed".to_string()));
        }
        state.requests.push((request.clone(), false));
        Ok(())
    }

    async fn get_request(
        &self,
        id: &ExchangeRequestId,
    ) -> Result<Option<ExchangeRequest>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .requests
            .iter()
            .find(|(r, deleted)| r.id == *id && !deleted)
            .map(|(r, _)| r.clone()))
    }

    async fn get_request_detail(
        &self,
        id: &ExchangeRequestId,
    ) -> Result<Option<ExchangeRequestDetail>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .requests
            .iter()
            .find(|(r, deleted)| r.id == *id && !deleted)
            .and_then(|(r, _)| state.detail(r)))
    }

    async fn list_requests(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<ExchangeRequestDetail>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut details: Vec<ExchangeRequestDetail> = state
            .requests
            .iter()
            .filter(|(r, deleted)| !deleted && filter.matches(r))
            .filter_map(|(r, _)| state.detail(r))
            .collect();
        details.sort_by(|a, b| {
            newest_first(
                (a.request.created_at, a.request.id),
                (b.request.created_at, b.request.id),
            )
        });
        Ok(details)
    }

    async fn accept_request(
        &self,
        id: &ExchangeRequestId,
        exchange: &Exchange,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        pending_or_conflict(state.live_request_mut(id))?;
        if self.fail_exchange_insert.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::Query("disk I/O error".to_string()));
        }
        if state.exchanges.iter().any(|e| e.request_id == *id) {
            return Err(RepositoryError::Conflict("exchange already exists".to_string()));
        }
        let request = pending_or_conflict(state.live_request_mut(id))?;
        request.status = RequestStatus::Accepted;
        request.updated_at = Utc::now();
        state.exchanges.push(exchange.clone());
        Ok(())
    }

    async fn reject_request(&self, id: &ExchangeRequestId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let request = pending_or_conflict(state.live_request_mut(id))?;
        request.status = RequestStatus::Rejected;
        request.updated_at = Utc::now();
        Ok(())
    }

    async fn withdraw_request(&self, id: &ExchangeRequestId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        pending_or_conflict(state.live_request_mut(id))?;
        if let Some((_, deleted)) = state.requests.iter_mut().find(|(r, _)| r.id == *id) {
            *deleted = true;
        }
        Ok(())
    }

    async fn get_exchange_by_request(
        &self,
        request_id: &ExchangeRequestId,
    ) -> Result<Option<Exchange>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .exchanges
            .iter()
            .find(|e| e.request_id == *request_id)
            .cloned())
    }

    async fn record_rating(
        &self,
        request_id: &ExchangeRequestId,
        role: ParticipantRole,
        rating: Rating,
        feedback: Option<&str>,
    ) -> Result<Exchange, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let exchange = state
            .exchanges
            .iter_mut()
            .find(|e| e.request_id == *request_id)
            .ok_or(RepositoryError::NotFound)?;
        let slot = match role {
            ParticipantRole::Sender => &mut exchange.from_user_rating,
            ParticipantRole::Recipient => &mut exchange.to_user_rating,
        };
        if slot.is_some() {
            return Err(RepositoryError::Conflict("already rated".to_string()));
        }
        *slot = Some(rating);
        if let Some(feedback) = feedback {
            exchange.feedback = Some(feedback.to_string());
        }
        exchange.updated_at = Utc::now();
        Ok(exchange.clone())
    }
}

/// Three users with one skill each.
pub struct TestWorld {
    pub alice: UserId,
    pub bob: UserId,
    pub carol: UserId,
    pub alice_skill: SkillId,
    pub bob_skill: SkillId,
    pub carol_skill: SkillId,
}

impl TestWorld {
    pub async fn seed(store: &InMemoryStore) -> Self {
        let mut ids = Vec::new();
        for (name, title) in [("alice", "Guitar"), ("bob", "Spanish"), ("carol", "Pottery")] {
            let user = UserId::new();
            store.insert_user(user, name);
            let now = Utc::now();
            let skill = Skill {
                id: SkillId::new(),
                user_id: user,
                category_id: CategoryId(1),
                title: title.to_string(),
                description: format!("{title} for beginners"),
                created_at: now,
                updated_at: now,
            };
            store.create(&skill).await.unwrap();
            ids.push((user, skill.id));
        }
        Self {
            alice: ids[0].0,
            bob: ids[1].0,
            carol: ids[2].0,
            alice_skill: ids[0].1,
            bob_skill: ids[1].1,
            carol_skill: ids[2].1,
        }
    }
}
