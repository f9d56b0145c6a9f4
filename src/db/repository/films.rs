//! Film repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::FilmRecord;

/// Repository trait for film operations.
///
/// Every operation maps to a single parameterized statement in the SQL
/// backend; search terms are always bound as values, never spliced into
/// query text.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait FilmRepository: Send + Sync {
    /// List all films, newest first.
    ///
    /// When `search` is given, only films whose title or body contains the
    /// term (case-sensitive substring match) are returned.
    async fn list_films(&self, search: Option<&str>) -> RepositoryResult<Vec<FilmRecord>>;

    /// Fetch a single film, or `None` if no row matches the id.
    async fn get_film(&self, film_id: i64) -> RepositoryResult<Option<FilmRecord>>;

    /// Cheap single-column existence probe.
    ///
    /// Used by nested review routes to produce a clean "not found" instead
    /// of a downstream constraint violation.
    async fn film_exists(&self, film_id: i64) -> RepositoryResult<bool>;

    /// Insert a film. Storage assigns `film_id` and `created_at`; the full
    /// created row is returned.
    async fn create_film(&self, title: &str, body: &str) -> RepositoryResult<FilmRecord>;

    /// Update a film's title and body. Returns the updated row, or `None`
    /// if no row matched the id. `created_at` is never touched.
    async fn update_film(
        &self,
        film_id: i64,
        title: &str,
        body: &str,
    ) -> RepositoryResult<Option<FilmRecord>>;

    /// Delete a film, returning the number of film rows removed (0 or 1).
    ///
    /// Dependent reviews are removed as part of the same operation
    /// (cascade delete).
    async fn delete_film(&self, film_id: i64) -> RepositoryResult<usize>;

    /// Verify the storage backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
