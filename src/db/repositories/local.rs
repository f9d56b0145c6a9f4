//! In-memory repository for unit testing and local development.
//!
//! Mirrors the SQL backend's semantics: monotonically assigned ids,
//! server-set creation timestamps, case-sensitive substring search, and
//! cascade delete of a film's reviews. All state lives behind one mutex;
//! operations never hold the lock across an await point.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::db::models::{FilmRecord, ReviewRecord};
use crate::db::repository::{
    FilmRepository, RepositoryError, RepositoryResult, ReviewRepository,
};

#[derive(Debug, Default)]
struct Store {
    films: BTreeMap<i64, FilmRecord>,
    reviews: BTreeMap<i64, ReviewRecord>,
    next_film_id: i64,
    next_review_id: i64,
}

/// In-memory implementation of the repository traits.
#[derive(Debug, Default)]
pub struct LocalRepository {
    inner: Mutex<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Store>> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::internal("local repository lock poisoned"))
    }
}

fn matches_search(title: &str, body: &str, search: Option<&str>) -> bool {
    match search {
        Some(term) => title.contains(term) || body.contains(term),
        None => true,
    }
}

/// Newest first; ties broken by id so listings stay deterministic.
fn newest_first<T, K>(items: &mut [T], key: K)
where
    K: Fn(&T) -> (Option<chrono::DateTime<Utc>>, i64),
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl FilmRepository for LocalRepository {
    async fn list_films(&self, search: Option<&str>) -> RepositoryResult<Vec<FilmRecord>> {
        let store = self.store()?;
        let mut films: Vec<FilmRecord> = store
            .films
            .values()
            .filter(|f| matches_search(&f.title, &f.body, search))
            .cloned()
            .collect();
        newest_first(&mut films, |f| (f.created_at, f.film_id));
        Ok(films)
    }

    async fn get_film(&self, film_id: i64) -> RepositoryResult<Option<FilmRecord>> {
        let store = self.store()?;
        Ok(store.films.get(&film_id).cloned())
    }

    async fn film_exists(&self, film_id: i64) -> RepositoryResult<bool> {
        let store = self.store()?;
        Ok(store.films.contains_key(&film_id))
    }

    async fn create_film(&self, title: &str, body: &str) -> RepositoryResult<FilmRecord> {
        let mut store = self.store()?;
        store.next_film_id += 1;
        let record = FilmRecord {
            film_id: store.next_film_id,
            title: title.to_string(),
            body: body.to_string(),
            created_at: Some(Utc::now()),
        };
        store.films.insert(record.film_id, record.clone());
        Ok(record)
    }

    async fn update_film(
        &self,
        film_id: i64,
        title: &str,
        body: &str,
    ) -> RepositoryResult<Option<FilmRecord>> {
        let mut store = self.store()?;
        match store.films.get_mut(&film_id) {
            Some(film) => {
                film.title = title.to_string();
                film.body = body.to_string();
                Ok(Some(film.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_film(&self, film_id: i64) -> RepositoryResult<usize> {
        let mut store = self.store()?;
        if store.films.remove(&film_id).is_none() {
            return Ok(0);
        }
        // Cascade: drop every review owned by the film.
        store.reviews.retain(|_, r| r.film_id != film_id);
        Ok(1)
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl ReviewRepository for LocalRepository {
    async fn list_reviews(
        &self,
        film_id: i64,
        search: Option<&str>,
    ) -> RepositoryResult<Vec<ReviewRecord>> {
        let store = self.store()?;
        let mut reviews: Vec<ReviewRecord> = store
            .reviews
            .values()
            .filter(|r| r.film_id == film_id)
            .filter(|r| matches_search(&r.title, &r.body, search))
            .cloned()
            .collect();
        newest_first(&mut reviews, |r| (r.created_at, r.review_id));
        Ok(reviews)
    }

    async fn get_review(
        &self,
        film_id: i64,
        review_id: i64,
    ) -> RepositoryResult<Option<ReviewRecord>> {
        let store = self.store()?;
        Ok(store
            .reviews
            .get(&review_id)
            .filter(|r| r.film_id == film_id)
            .cloned())
    }

    async fn create_review(
        &self,
        film_id: i64,
        title: &str,
        body: &str,
    ) -> RepositoryResult<ReviewRecord> {
        let mut store = self.store()?;
        // Same failure the SQL backend's foreign key would produce.
        if !store.films.contains_key(&film_id) {
            return Err(RepositoryError::query(format!(
                "insert into reviews violates foreign key: film {} does not exist",
                film_id
            )));
        }
        store.next_review_id += 1;
        let record = ReviewRecord {
            review_id: store.next_review_id,
            film_id,
            title: title.to_string(),
            body: body.to_string(),
            created_at: Some(Utc::now()),
        };
        store.reviews.insert(record.review_id, record.clone());
        Ok(record)
    }

    async fn update_review(
        &self,
        film_id: i64,
        review_id: i64,
        title: &str,
        body: &str,
    ) -> RepositoryResult<Option<ReviewRecord>> {
        let mut store = self.store()?;
        match store
            .reviews
            .get_mut(&review_id)
            .filter(|r| r.film_id == film_id)
        {
            Some(review) => {
                review.title = title.to_string();
                review.body = body.to_string();
                Ok(Some(review.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_review(&self, film_id: i64, review_id: i64) -> RepositoryResult<usize> {
        let mut store = self.store()?;
        let matches = store
            .reviews
            .get(&review_id)
            .map(|r| r.film_id == film_id)
            .unwrap_or(false);
        if !matches {
            return Ok(0);
        }
        store.reviews.remove(&review_id);
        Ok(1)
    }
}
