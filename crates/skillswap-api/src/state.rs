//! Application state wiring all services together.
//!
//! Services are generic over repository traits; AppState pins them to the
//! SQLite implementations.

use std::path::Path;
use std::sync::Arc;

use skillswap_core::service::exchange::ExchangeService;
use skillswap_core::service::feed::FeedService;
use skillswap_infra::config::resolve_database_url;
use skillswap_infra::sqlite::exchange::SqliteExchangeRepository;
use skillswap_infra::sqlite::pool::DatabasePool;
use skillswap_infra::sqlite::skill::SqliteSkillRepository;
use skillswap_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteExchangeService = ExchangeService<SqliteExchangeRepository, SqliteSkillRepository>;

pub type ConcreteFeedService = FeedService<SqliteSkillRepository, SqliteExchangeRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub exchange_service: Arc<ConcreteExchangeService>,
    pub feed_service: Arc<ConcreteFeedService>,
    pub config: Arc<AppConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Open the database (applying migrations) and wire services.
    pub async fn init(config: AppConfig, data_dir: &Path) -> anyhow::Result<Self> {
        // Ensure data directory exists
        tokio::fs::create_dir_all(data_dir).await?;

        let db_url = resolve_database_url(&config, data_dir);
        let db_pool = DatabasePool::new(&db_url).await?;

        Ok(Self::with_pool(db_pool, config))
    }

    /// Wire services over an already-open pool.
    pub fn with_pool(db_pool: DatabasePool, config: AppConfig) -> Self {
        let exchange_service = ExchangeService::new(
            SqliteExchangeRepository::new(db_pool.clone()),
            SqliteSkillRepository::new(db_pool.clone()),
        );
        let feed_service = FeedService::new(
            SqliteSkillRepository::new(db_pool.clone()),
            SqliteExchangeRepository::new(db_pool.clone()),
            config.feed,
        );

        Self {
            exchange_service: Arc::new(exchange_service),
            feed_service: Arc::new(feed_service),
            config: Arc::new(config),
            db_pool,
        }
    }
}
