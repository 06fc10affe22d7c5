//! SQLite exchange repository implementation.
//!
//! Status changes are conditional updates (`WHERE status = 'pending'`), so
//! of two racing deciders only one sees an affected row. Acceptance writes
//! the status change and the exchange row in one transaction.

use chrono::Utc;
use skillswap_core::repository::exchange::{ExchangeRepository, RequestFilter};
use skillswap_types::error::RepositoryError;
use skillswap_types::exchange::{
    Exchange, ExchangeRequest, ExchangeRequestDetail, ExchangeRequestId, ParticipantRole, Rating,
    RequestStatus,
};
use skillswap_types::skill::SkillSummary;
use skillswap_types::user::UserSummary;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::pool::DatabasePool;
use super::row::{format_datetime, map_sqlx_error, parse_datetime, parse_id};

/// SQLite-backed implementation of `ExchangeRepository`.
pub struct SqliteExchangeRepository {
    pool: DatabasePool,
}

impl SqliteExchangeRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

const LIVE_REQUEST: &str = "r.is_active = 1 AND r.deleted_at IS NULL";

const DETAIL_SELECT: &str = "SELECT r.*,
        fu.name AS from_user_name, fu.email AS from_user_email, fu.avatar AS from_user_avatar,
        tu.name AS to_user_name, tu.email AS to_user_email, tu.avatar AS to_user_avatar,
        os.title AS offered_skill_title, os.description AS offered_skill_description,
        rs.title AS requested_skill_title, rs.description AS requested_skill_description
    FROM exchange_requests r
    JOIN users fu ON fu.id = r.from_user_id
    JOIN users tu ON tu.id = r.to_user_id
    JOIN skills os ON os.id = r.offered_skill_id
    JOIN skills rs ON rs.id = r.requested_skill_id";

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

/// Internal row type for mapping SQLite rows to domain ExchangeRequest.
struct RequestRow {
    id: String,
    from_user_id: String,
    to_user_id: String,
    offered_skill_id: String,
    requested_skill_id: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl RequestRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            from_user_id: row.try_get("from_user_id")?,
            to_user_id: row.try_get("to_user_id")?,
            offered_skill_id: row.try_get("offered_skill_id")?,
            requested_skill_id: row.try_get("requested_skill_id")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_request(self) -> Result<ExchangeRequest, RepositoryError> {
        let status: RequestStatus = self.status.parse().map_err(RepositoryError::Query)?;

        Ok(ExchangeRequest {
            id: parse_id(&self.id, "exchange request")?,
            from_user_id: parse_id(&self.from_user_id, "user")?,
            to_user_id: parse_id(&self.to_user_id, "user")?,
            offered_skill_id: parse_id(&self.offered_skill_id, "skill")?,
            requested_skill_id: parse_id(&self.requested_skill_id, "skill")?,
            status,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// Map a row of `DETAIL_SELECT` to a detail.
fn detail_from_row(row: &SqliteRow) -> Result<ExchangeRequestDetail, RepositoryError> {
    let request = RequestRow::from_row(row).map_err(query_err)?.into_request()?;

    let user = |prefix: &str, id| -> Result<UserSummary, sqlx::Error> {
        Ok(UserSummary {
            id,
            name: row.try_get(format!("{prefix}_name").as_str())?,
            email: row.try_get(format!("{prefix}_email").as_str())?,
            avatar: row.try_get(format!("{prefix}_avatar").as_str())?,
        })
    };
    let skill = |prefix: &str, id| -> Result<SkillSummary, sqlx::Error> {
        Ok(SkillSummary {
            id,
            title: row.try_get(format!("{prefix}_title").as_str())?,
            description: row.try_get(format!("{prefix}_description").as_str())?,
        })
    };

    Ok(ExchangeRequestDetail {
        from_user: user("from_user", request.from_user_id).map_err(query_err)?,
        to_user: user("to_user", request.to_user_id).map_err(query_err)?,
        offered_skill: skill("offered_skill", request.offered_skill_id).map_err(query_err)?,
        requested_skill: skill("requested_skill", request.requested_skill_id).map_err(query_err)?,
        request,
    })
}

/// Internal row type for mapping SQLite rows to domain Exchange.
struct ExchangeRow {
    id: String,
    request_id: String,
    from_user_rating: Option<i64>,
    to_user_rating: Option<i64>,
    feedback: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ExchangeRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            request_id: row.try_get("request_id")?,
            from_user_rating: row.try_get("from_user_rating")?,
            to_user_rating: row.try_get("to_user_rating")?,
            feedback: row.try_get("feedback")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_exchange(self) -> Result<Exchange, RepositoryError> {
        Ok(Exchange {
            id: parse_id(&self.id, "exchange")?,
            request_id: parse_id(&self.request_id, "exchange request")?,
            from_user_rating: self.from_user_rating.map(parse_rating).transpose()?,
            to_user_rating: self.to_user_rating.map(parse_rating).transpose()?,
            feedback: self.feedback,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn parse_rating(value: i64) -> Result<Rating, RepositoryError> {
    Rating::new(value).map_err(|e| RepositoryError::Query(format!("invalid stored rating: {e}")))
}

fn rating_column(role: ParticipantRole) -> &'static str {
    match role {
        ParticipantRole::Sender => "from_user_rating",
        ParticipantRole::Recipient => "to_user_rating",
    }
}

/// Explain why a conditional update on a request touched no rows.
async fn classify_missed_update<'e, E>(executor: E, id: &ExchangeRequestId) -> RepositoryError
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let status: Result<Option<(String,)>, sqlx::Error> = sqlx::query_as(
        "SELECT status FROM exchange_requests WHERE id = ? AND is_active = 1 AND deleted_at IS NULL",
    )
    .bind(id.to_string())
    .fetch_optional(executor)
    .await;

    match status {
        Ok(None) => RepositoryError::NotFound,
        Ok(Some((status,))) => RepositoryError::Conflict(format!("exchange request is {status}")),
        Err(e) => map_sqlx_error(e),
    }
}

impl ExchangeRepository for SqliteExchangeRepository {
    async fn create_request(&self, request: &ExchangeRequest) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO exchange_requests (id, from_user_id, to_user_id, offered_skill_id, requested_skill_id, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.id.to_string())
        .bind(request.from_user_id.to_string())
        .bind(request.to_user_id.to_string())
        .bind(request.offered_skill_id.to_string())
        .bind(request.requested_skill_id.to_string())
        .bind(request.status.to_string())
        .bind(format_datetime(&request.created_at))
        .bind(format_datetime(&request.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get_request(
        &self,
        id: &ExchangeRequestId,
    ) -> Result<Option<ExchangeRequest>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT * FROM exchange_requests r WHERE r.id = ? AND {LIVE_REQUEST}"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Ok(Some(
                RequestRow::from_row(&row).map_err(query_err)?.into_request()?,
            )),
            None => Ok(None),
        }
    }

    async fn get_request_detail(
        &self,
        id: &ExchangeRequestId,
    ) -> Result<Option<ExchangeRequestDetail>, RepositoryError> {
        let row = sqlx::query(&format!("{DETAIL_SELECT} WHERE r.id = ? AND {LIVE_REQUEST}"))
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(detail_from_row).transpose()
    }

    async fn list_requests(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<ExchangeRequestDetail>, RepositoryError> {
        let mut conditions = vec![LIVE_REQUEST.to_string()];
        let mut binds: Vec<String> = Vec::new();

        if let Some(user) = filter.participant {
            conditions.push("(r.from_user_id = ? OR r.to_user_id = ?)".to_string());
            binds.push(user.to_string());
            binds.push(user.to_string());
        }
        if let Some(user) = filter.from_user_id {
            conditions.push("r.from_user_id = ?".to_string());
            binds.push(user.to_string());
        }
        if let Some(user) = filter.to_user_id {
            conditions.push("r.to_user_id = ?".to_string());
            binds.push(user.to_string());
        }
        if let Some(skill) = filter.skill_id {
            conditions.push("(r.offered_skill_id = ? OR r.requested_skill_id = ?)".to_string());
            binds.push(skill.to_string());
            binds.push(skill.to_string());
        }
        if let Some(status) = filter.status {
            conditions.push("r.status = ?".to_string());
            binds.push(status.to_string());
        }

        let sql = format!(
            "{DETAIL_SELECT} WHERE {} ORDER BY r.created_at DESC, r.id DESC",
            conditions.join(" AND ")
        );

        let mut query = sqlx::query(&sql);
        for bind in binds {
            query = query.bind(bind);
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(detail_from_row).collect()
    }

    async fn accept_request(
        &self,
        id: &ExchangeRequestId,
        exchange: &Exchange,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            "UPDATE exchange_requests SET status = 'accepted', updated_at = ?
             WHERE id = ? AND status = 'pending' AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(format_datetime(&Utc::now()))
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(classify_missed_update(&mut *tx, id).await);
        }

        sqlx::query(
            "INSERT INTO exchanges (id, request_id, from_user_rating, to_user_rating, feedback, created_at, updated_at)
             VALUES (?, ?, NULL, NULL, NULL, ?, ?)",
        )
        .bind(exchange.id.to_string())
        .bind(exchange.request_id.to_string())
        .bind(format_datetime(&exchange.created_at))
        .bind(format_datetime(&exchange.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        tracing::debug!(request_id = %id, exchange_id = %exchange.id, "request accepted");
        Ok(())
    }

    async fn reject_request(&self, id: &ExchangeRequestId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE exchange_requests SET status = 'rejected', updated_at = ?
             WHERE id = ? AND status = 'pending' AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(format_datetime(&Utc::now()))
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(classify_missed_update(&self.pool.writer, id).await);
        }
        Ok(())
    }

    async fn withdraw_request(&self, id: &ExchangeRequestId) -> Result<(), RepositoryError> {
        let now = format_datetime(&Utc::now());
        let result = sqlx::query(
            "UPDATE exchange_requests SET is_active = 0, deleted_at = ?, updated_at = ?
             WHERE id = ? AND status = 'pending' AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(&now)
        .bind(&now)
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(classify_missed_update(&self.pool.writer, id).await);
        }
        Ok(())
    }

    async fn get_exchange_by_request(
        &self,
        request_id: &ExchangeRequestId,
    ) -> Result<Option<Exchange>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM exchanges WHERE request_id = ? AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(request_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Ok(Some(
                ExchangeRow::from_row(&row).map_err(query_err)?.into_exchange()?,
            )),
            None => Ok(None),
        }
    }

    async fn record_rating(
        &self,
        request_id: &ExchangeRequestId,
        role: ParticipantRole,
        rating: Rating,
        feedback: Option<&str>,
    ) -> Result<Exchange, RepositoryError> {
        let column = rating_column(role);
        let mut tx = self.pool.writer.begin().await.map_err(map_sqlx_error)?;

        // Feedback only ever overwrites with a provided value.
        let result = sqlx::query(&format!(
            "UPDATE exchanges SET {column} = ?, feedback = COALESCE(?, feedback), updated_at = ?
             WHERE request_id = ? AND {column} IS NULL AND is_active = 1 AND deleted_at IS NULL"
        ))
        .bind(i64::from(rating.value()))
        .bind(feedback)
        .bind(format_datetime(&Utc::now()))
        .bind(request_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let row = sqlx::query(
            "SELECT * FROM exchanges WHERE request_id = ? AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(request_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };
        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(format!("{column} is already set")));
        }

        let exchange = ExchangeRow::from_row(&row).map_err(query_err)?.into_exchange()?;
        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;
    use crate::sqlite::skill::SqliteSkillRepository;
    use crate::sqlite::user::{SqliteUserRepository, new_user};
    use chrono::Duration;
    use skillswap_core::repository::skill::SkillRepository;
    use skillswap_types::skill::{Skill, SkillId};
    use skillswap_types::user::UserId;

    struct Seeded {
        repo: SqliteExchangeRepository,
        alice: UserId,
        bob: UserId,
        alice_skill: SkillId,
        bob_skill: SkillId,
    }

    async fn seeded() -> Seeded {
        let pool = test_pool().await;
        let users = SqliteUserRepository::new(pool.clone());
        let skills = SqliteSkillRepository::new(pool.clone());
        let category = users.create_category("General").await.unwrap().id;

        let mut ids = Vec::new();
        for (name, title) in [("alice", "Guitar"), ("bob", "Spanish")] {
            let user = new_user(name, &format!("{name}@example.com"));
            users.create(&user).await.unwrap();
            let now = Utc::now();
            let skill = Skill {
                id: SkillId::new(),
                user_id: user.id,
                category_id: category,
                title: title.to_string(),
                description: format!("{title} basics"),
                created_at: now,
                updated_at: now,
            };
            skills.create(&skill).await.unwrap();
            ids.push((user.id, skill.id));
        }

        Seeded {
            repo: SqliteExchangeRepository::new(pool),
            alice: ids[0].0,
            bob: ids[1].0,
            alice_skill: ids[0].1,
            bob_skill: ids[1].1,
        }
    }

    fn pending(s: &Seeded) -> ExchangeRequest {
        ExchangeRequest::pending(s.alice, s.bob, s.alice_skill, s.bob_skill)
    }

    #[tokio::test]
    async fn test_create_and_get_detail() {
        let s = seeded().await;
        let request = pending(&s);
        s.repo.create_request(&request).await.unwrap();

        let found = s.repo.get_request(&request.id).await.unwrap().unwrap();
        assert_eq!(found.status, RequestStatus::Pending);
        assert_eq!(found.from_user_id, s.alice);

        let detail = s.repo.get_request_detail(&request.id).await.unwrap().unwrap();
        assert_eq!(detail.from_user.name, "alice");
        assert_eq!(detail.to_user.email, "bob@example.com");
        assert_eq!(detail.offered_skill.title, "Guitar");
        assert_eq!(detail.requested_skill.title, "Spanish");
    }

    #[tokio::test]
    async fn test_duplicate_pending_tuple_conflicts() {
        let s = seeded().await;
        s.repo.create_request(&pending(&s)).await.unwrap();

        let err = s.repo.create_request(&pending(&s)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_concurrent_identical_creates_one_wins() {
        let s = seeded().await;
        let other = SqliteExchangeRepository::new(s.repo.pool.clone());
        let (first, second) = (pending(&s), pending(&s));

        let (a, b) = tokio::join!(s.repo.create_request(&first), other.create_request(&second));

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|r| matches!(r, Err(RepositoryError::Conflict(_))))
        );

        let live = s
            .repo
            .list_requests(&RequestFilter {
                from_user_id: Some(s.alice),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(live.len(), 1);
    }

    #[tokio::test]
    async fn test_tuple_reusable_after_rejection_and_withdrawal() {
        let s = seeded().await;
        let first = pending(&s);
        s.repo.create_request(&first).await.unwrap();
        s.repo.reject_request(&first.id).await.unwrap();

        let second = pending(&s);
        s.repo.create_request(&second).await.unwrap();
        s.repo.withdraw_request(&second.id).await.unwrap();

        s.repo.create_request(&pending(&s)).await.unwrap();
    }

    #[tokio::test]
    async fn test_accept_writes_request_and_exchange() {
        let s = seeded().await;
        let request = pending(&s);
        s.repo.create_request(&request).await.unwrap();

        let exchange = Exchange::for_request(request.id);
        s.repo.accept_request(&request.id, &exchange).await.unwrap();

        let found = s.repo.get_request(&request.id).await.unwrap().unwrap();
        assert_eq!(found.status, RequestStatus::Accepted);
        let stored = s.repo.get_exchange_by_request(&request.id).await.unwrap().unwrap();
        assert_eq!(stored.id, exchange.id);
        assert!(stored.from_user_rating.is_none());
    }

    #[tokio::test]
    async fn test_second_decision_conflicts() {
        let s = seeded().await;
        let request = pending(&s);
        s.repo.create_request(&request).await.unwrap();
        s.repo.reject_request(&request.id).await.unwrap();

        let err = s
            .repo
            .accept_request(&request.id, &Exchange::for_request(request.id))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert!(s.repo.get_exchange_by_request(&request.id).await.unwrap().is_none());

        let err = s.repo.reject_request(&request.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_failed_exchange_insert_rolls_back_status() {
        let s = seeded().await;
        let request = pending(&s);
        s.repo.create_request(&request).await.unwrap();

        // An exchange pointing at an unknown request violates the foreign key.
        let broken = Exchange::for_request(ExchangeRequestId::new());
        let err = s.repo.accept_request(&request.id, &broken).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));

        let found = s.repo.get_request(&request.id).await.unwrap().unwrap();
        assert_eq!(found.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_missing_request_not_found() {
        let s = seeded().await;
        let err = s.repo.reject_request(&ExchangeRequestId::new()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_withdrawn_request_is_invisible() {
        let s = seeded().await;
        let request = pending(&s);
        s.repo.create_request(&request).await.unwrap();
        s.repo.withdraw_request(&request.id).await.unwrap();

        assert!(s.repo.get_request(&request.id).await.unwrap().is_none());
        assert!(s.repo.get_request_detail(&request.id).await.unwrap().is_none());
        let all = s.repo.list_requests(&RequestFilter::default()).await.unwrap();
        assert!(all.is_empty());

        let err = s.repo.withdraw_request(&request.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_filters_and_order() {
        let s = seeded().await;
        let mut older = pending(&s);
        older.created_at = Utc::now() - Duration::minutes(10);
        s.repo.create_request(&older).await.unwrap();
        s.repo.reject_request(&older.id).await.unwrap();

        let reverse = ExchangeRequest::pending(s.bob, s.alice, s.bob_skill, s.alice_skill);
        s.repo.create_request(&reverse).await.unwrap();

        let all = s
            .repo
            .list_requests(&RequestFilter {
                participant: Some(s.alice),
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|d| d.request.id).collect();
        assert_eq!(ids, vec![reverse.id, older.id]);

        let sent = s
            .repo
            .list_requests(&RequestFilter {
                from_user_id: Some(s.alice),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].request.id, older.id);

        let pending_for_alice = s
            .repo
            .list_requests(&RequestFilter {
                to_user_id: Some(s.alice),
                status: Some(RequestStatus::Pending),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pending_for_alice.len(), 1);
        assert_eq!(pending_for_alice[0].request.id, reverse.id);

        let by_skill = s
            .repo
            .list_requests(&RequestFilter {
                skill_id: Some(s.bob_skill),
                status: Some(RequestStatus::Rejected),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_skill.len(), 1);
        assert_eq!(by_skill[0].request.id, older.id);
    }

    #[tokio::test]
    async fn test_ratings_are_write_once_per_side() {
        let s = seeded().await;
        let request = pending(&s);
        s.repo.create_request(&request).await.unwrap();
        s.repo
            .accept_request(&request.id, &Exchange::for_request(request.id))
            .await
            .unwrap();

        let five = Rating::new(5).unwrap();
        let three = Rating::new(3).unwrap();

        let exchange = s
            .repo
            .record_rating(&request.id, ParticipantRole::Sender, five, Some("great"))
            .await
            .unwrap();
        assert_eq!(exchange.from_user_rating, Some(five));
        assert_eq!(exchange.feedback.as_deref(), Some("great"));

        let err = s
            .repo
            .record_rating(&request.id, ParticipantRole::Sender, three, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let exchange = s
            .repo
            .record_rating(&request.id, ParticipantRole::Recipient, three, None)
            .await
            .unwrap();
        assert_eq!(exchange.from_user_rating, Some(five));
        assert_eq!(exchange.to_user_rating, Some(three));
        // Absent feedback leaves the stored text alone.
        assert_eq!(exchange.feedback.as_deref(), Some("great"));
    }

    #[tokio::test]
    async fn test_rating_without_exchange_not_found() {
        let s = seeded().await;
        let err = s
            .repo
            .record_rating(
                &ExchangeRequestId::new(),
                ParticipantRole::Sender,
                Rating::new(4).unwrap(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
