//! Behavioral tests for the in-memory repository backend.
//!
//! These exercise the repository traits directly, without the HTTP layer,
//! so storage semantics (ordering, cascade, compound keys) are pinned down
//! independently of any handler logic.

use films_api::db::repositories::LocalRepository;
use films_api::db::repository::{FilmRepository, ReviewRepository};

#[tokio::test]
async fn test_create_film_assigns_id_and_timestamp() {
    let repo = LocalRepository::new();

    let film = repo.create_film("Citizen Kane", "Rosebud").await.unwrap();
    assert!(film.film_id > 0);
    assert_eq!(film.title, "Citizen Kane");
    assert_eq!(film.body, "Rosebud");
    assert!(film.created_at.is_some());
}

#[tokio::test]
async fn test_get_film_roundtrip() {
    let repo = LocalRepository::new();

    let created = repo.create_film("Alien", "In space").await.unwrap();
    let fetched = repo.get_film(created.film_id).await.unwrap().unwrap();
    assert_eq!(fetched.film_id, created.film_id);
    assert_eq!(fetched.title, "Alien");

    assert!(repo.get_film(created.film_id + 1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_film_exists() {
    let repo = LocalRepository::new();
    let film = repo.create_film("t", "b").await.unwrap();

    assert!(repo.film_exists(film.film_id).await.unwrap());
    assert!(!repo.film_exists(film.film_id + 1).await.unwrap());
}

#[tokio::test]
async fn test_update_film_preserves_created_at() {
    let repo = LocalRepository::new();
    let created = repo.create_film("Draft", "old").await.unwrap();

    let updated = repo
        .update_film(created.film_id, "Final", "new")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.body, "new");
    assert_eq!(updated.created_at, created.created_at);

    assert!(repo.update_film(999, "x", "y").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_film_reports_row_count() {
    let repo = LocalRepository::new();
    let film = repo.create_film("t", "b").await.unwrap();

    assert_eq!(repo.delete_film(film.film_id).await.unwrap(), 1);
    assert_eq!(repo.delete_film(film.film_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_film_cascades_reviews() {
    let repo = LocalRepository::new();
    let kane = repo.create_film("Citizen Kane", "Rosebud").await.unwrap();
    let alien = repo.create_film("Alien", "In space").await.unwrap();
    repo.create_review(kane.film_id, "a", "1").await.unwrap();
    repo.create_review(kane.film_id, "b", "2").await.unwrap();
    let kept = repo.create_review(alien.film_id, "c", "3").await.unwrap();

    repo.delete_film(kane.film_id).await.unwrap();

    assert!(repo
        .list_reviews(kane.film_id, None)
        .await
        .unwrap()
        .is_empty());
    // Reviews of other films survive.
    let remaining = repo.list_reviews(alien.film_id, None).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].review_id, kept.review_id);
}

#[tokio::test]
async fn test_list_films_search_matches_title_and_body() {
    let repo = LocalRepository::new();
    repo.create_film("Citizen Kane", "Rosebud").await.unwrap();
    repo.create_film("Alien", "Rosebud cameo").await.unwrap();
    repo.create_film("Blade Runner", "rain").await.unwrap();

    assert_eq!(repo.list_films(Some("Rosebud")).await.unwrap().len(), 2);
    assert_eq!(repo.list_films(Some("Blade")).await.unwrap().len(), 1);
    assert_eq!(repo.list_films(Some("zzz")).await.unwrap().len(), 0);
    assert_eq!(repo.list_films(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_review_requires_both_keys() {
    let repo = LocalRepository::new();
    let kane = repo.create_film("Citizen Kane", "Rosebud").await.unwrap();
    let alien = repo.create_film("Alien", "In space").await.unwrap();
    let review = repo.create_review(kane.film_id, "t", "b").await.unwrap();

    assert!(repo
        .get_review(kane.film_id, review.review_id)
        .await
        .unwrap()
        .is_some());
    assert!(repo
        .get_review(alien.film_id, review.review_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_review_scoped_to_film() {
    let repo = LocalRepository::new();
    let kane = repo.create_film("Citizen Kane", "Rosebud").await.unwrap();
    let alien = repo.create_film("Alien", "In space").await.unwrap();
    let review = repo.create_review(kane.film_id, "old", "old").await.unwrap();

    // Wrong parent: no update happens.
    assert!(repo
        .update_review(alien.film_id, review.review_id, "new", "new")
        .await
        .unwrap()
        .is_none());

    let updated = repo
        .update_review(kane.film_id, review.review_id, "new", "new")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "new");
}

#[tokio::test]
async fn test_delete_review_scoped_to_film() {
    let repo = LocalRepository::new();
    let kane = repo.create_film("Citizen Kane", "Rosebud").await.unwrap();
    let alien = repo.create_film("Alien", "In space").await.unwrap();
    let review = repo.create_review(kane.film_id, "t", "b").await.unwrap();

    assert_eq!(
        repo.delete_review(alien.film_id, review.review_id)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        repo.delete_review(kane.film_id, review.review_id)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        repo.delete_review(kane.film_id, review.review_id)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_review_ids_unique_across_films() {
    let repo = LocalRepository::new();
    let kane = repo.create_film("Citizen Kane", "Rosebud").await.unwrap();
    let alien = repo.create_film("Alien", "In space").await.unwrap();

    let a = repo.create_review(kane.film_id, "a", "1").await.unwrap();
    let b = repo.create_review(alien.film_id, "b", "2").await.unwrap();
    assert_ne!(a.review_id, b.review_id);
}
