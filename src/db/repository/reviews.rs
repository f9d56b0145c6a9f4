//! Review repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::ReviewRecord;

/// Repository trait for review operations.
///
/// Every single-review operation takes the compound `(film_id, review_id)`
/// key. A review id that exists under a different film is treated as not
/// found, so cross-film id collisions can never leak one film's review into
/// another's response.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// List the reviews of one film, newest first, optionally filtered by a
    /// case-sensitive substring match on title or body.
    async fn list_reviews(
        &self,
        film_id: i64,
        search: Option<&str>,
    ) -> RepositoryResult<Vec<ReviewRecord>>;

    /// Fetch a single review matching both keys, or `None`.
    async fn get_review(
        &self,
        film_id: i64,
        review_id: i64,
    ) -> RepositoryResult<Option<ReviewRecord>>;

    /// Insert a review for a film. Storage assigns `review_id` and
    /// `created_at`; the full created row is returned.
    async fn create_review(
        &self,
        film_id: i64,
        title: &str,
        body: &str,
    ) -> RepositoryResult<ReviewRecord>;

    /// Update a review's title and body. Returns the updated row, or `None`
    /// if no row matched both keys.
    async fn update_review(
        &self,
        film_id: i64,
        review_id: i64,
        title: &str,
        body: &str,
    ) -> RepositoryResult<Option<ReviewRecord>>;

    /// Delete a review matching both keys, returning the number of rows
    /// removed (0 or 1).
    async fn delete_review(&self, film_id: i64, review_id: i64) -> RepositoryResult<usize>;
}
