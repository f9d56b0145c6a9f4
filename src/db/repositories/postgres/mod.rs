//! Postgres repository implementation using Diesel.
//!
//! Each repository operation executes a single parameterized statement.
//! Diesel binds every value (including the LIKE search pattern) as a query
//! parameter, so client input never reaches the SQL text. Review removal on
//! film delete is handled by the `ON DELETE CASCADE` constraint, keeping the
//! cascade atomic with the parent delete.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use std::time::Duration;

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tokio::task;

use crate::db::models::{FilmRecord, ReviewRecord};
use crate::db::repository::{
    ErrorContext, FilmRepository, RepositoryError, RepositoryResult, ReviewRepository,
};

mod models;
mod schema;

use models::{FilmRow, ReviewRow};
use schema::{films, reviews};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        log::info!("postgres repository initialized, migrations applied");
        Ok(Self { pool })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal(format!("Migration failed: {}", e))
                .with_operation("run_migrations")
        })?;
        Ok(())
    }

    /// Run a Diesel closure on a pooled connection via `spawn_blocking`,
    /// keeping the async scheduler free while the driver blocks.
    async fn run_blocking<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(RepositoryError::from)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal(format!("blocking task join failure: {}", e))
                .with_operation(operation)
        })?
        .map_err(|e| {
            log::warn!("postgres {} failed: {}", operation, e);
            e.with_operation(operation)
        })
    }
}

/// Build a `%term%` LIKE pattern with `\`, `%` and `_` escaped, so the term
/// is matched as literal data.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("%{}%", escaped)
}

#[async_trait]
impl FilmRepository for PostgresRepository {
    async fn list_films(&self, search: Option<&str>) -> RepositoryResult<Vec<FilmRecord>> {
        let pattern = search.map(like_pattern);
        self.run_blocking("list_films", move |conn| {
            let mut query = films::table.select(FilmRow::as_select()).into_boxed();
            if let Some(pattern) = pattern {
                query = query.filter(
                    films::title
                        .like(pattern.clone())
                        .or(films::body.like(pattern)),
                );
            }
            let rows = query.order(films::created_at.desc()).load::<FilmRow>(conn)?;
            Ok(rows.into_iter().map(FilmRecord::from).collect())
        })
        .await
    }

    async fn get_film(&self, film_id: i64) -> RepositoryResult<Option<FilmRecord>> {
        self.run_blocking("get_film", move |conn| {
            let row = films::table
                .find(film_id)
                .select(FilmRow::as_select())
                .first::<FilmRow>(conn)
                .optional()?;
            Ok(row.map(FilmRecord::from))
        })
        .await
    }

    async fn film_exists(&self, film_id: i64) -> RepositoryResult<bool> {
        self.run_blocking("film_exists", move |conn| {
            let present =
                diesel::select(exists(films::table.find(film_id))).get_result::<bool>(conn)?;
            Ok(present)
        })
        .await
    }

    async fn create_film(&self, title: &str, body: &str) -> RepositoryResult<FilmRecord> {
        let title = title.to_string();
        let body = body.to_string();
        self.run_blocking("create_film", move |conn| {
            let row = diesel::insert_into(films::table)
                .values((films::title.eq(title), films::body.eq(body)))
                .returning(FilmRow::as_returning())
                .get_result::<FilmRow>(conn)?;
            Ok(FilmRecord::from(row))
        })
        .await
    }

    async fn update_film(
        &self,
        film_id: i64,
        title: &str,
        body: &str,
    ) -> RepositoryResult<Option<FilmRecord>> {
        let title = title.to_string();
        let body = body.to_string();
        self.run_blocking("update_film", move |conn| {
            let row = diesel::update(films::table.find(film_id))
                .set((films::title.eq(title), films::body.eq(body)))
                .returning(FilmRow::as_returning())
                .get_result::<FilmRow>(conn)
                .optional()?;
            Ok(row.map(FilmRecord::from))
        })
        .await
    }

    async fn delete_film(&self, film_id: i64) -> RepositoryResult<usize> {
        // Single statement; reviews go with it via ON DELETE CASCADE.
        self.run_blocking("delete_film", move |conn| {
            let affected = diesel::delete(films::table.find(film_id)).execute(conn)?;
            Ok(affected)
        })
        .await
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        self.run_blocking("health_check", |conn| {
            diesel::sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl ReviewRepository for PostgresRepository {
    async fn list_reviews(
        &self,
        film_id: i64,
        search: Option<&str>,
    ) -> RepositoryResult<Vec<ReviewRecord>> {
        let pattern = search.map(like_pattern);
        self.run_blocking("list_reviews", move |conn| {
            let mut query = reviews::table
                .select(ReviewRow::as_select())
                .filter(reviews::film_id.eq(film_id))
                .into_boxed();
            if let Some(pattern) = pattern {
                query = query.filter(
                    reviews::title
                        .like(pattern.clone())
                        .or(reviews::body.like(pattern)),
                );
            }
            let rows = query
                .order(reviews::created_at.desc())
                .load::<ReviewRow>(conn)?;
            Ok(rows.into_iter().map(ReviewRecord::from).collect())
        })
        .await
    }

    async fn get_review(
        &self,
        film_id: i64,
        review_id: i64,
    ) -> RepositoryResult<Option<ReviewRecord>> {
        self.run_blocking("get_review", move |conn| {
            let row = reviews::table
                .filter(reviews::film_id.eq(film_id))
                .filter(reviews::review_id.eq(review_id))
                .select(ReviewRow::as_select())
                .first::<ReviewRow>(conn)
                .optional()?;
            Ok(row.map(ReviewRecord::from))
        })
        .await
    }

    async fn create_review(
        &self,
        film_id: i64,
        title: &str,
        body: &str,
    ) -> RepositoryResult<ReviewRecord> {
        let title = title.to_string();
        let body = body.to_string();
        self.run_blocking("create_review", move |conn| {
            let row = diesel::insert_into(reviews::table)
                .values((
                    reviews::film_id.eq(film_id),
                    reviews::title.eq(title),
                    reviews::body.eq(body),
                ))
                .returning(ReviewRow::as_returning())
                .get_result::<ReviewRow>(conn)?;
            Ok(ReviewRecord::from(row))
        })
        .await
    }

    async fn update_review(
        &self,
        film_id: i64,
        review_id: i64,
        title: &str,
        body: &str,
    ) -> RepositoryResult<Option<ReviewRecord>> {
        let title = title.to_string();
        let body = body.to_string();
        self.run_blocking("update_review", move |conn| {
            let target = reviews::table
                .filter(reviews::film_id.eq(film_id))
                .filter(reviews::review_id.eq(review_id));
            let row = diesel::update(target)
                .set((reviews::title.eq(title), reviews::body.eq(body)))
                .returning(ReviewRow::as_returning())
                .get_result::<ReviewRow>(conn)
                .optional()?;
            Ok(row.map(ReviewRecord::from))
        })
        .await
    }

    async fn delete_review(&self, film_id: i64, review_id: i64) -> RepositoryResult<usize> {
        self.run_blocking("delete_review", move |conn| {
            let target = reviews::table
                .filter(reviews::film_id.eq(film_id))
                .filter(reviews::review_id.eq(review_id));
            let affected = diesel::delete(target).execute(conn)?;
            Ok(affected)
        })
        .await
    }
}
