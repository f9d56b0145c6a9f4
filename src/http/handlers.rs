//! HTTP handlers for the REST API.
//!
//! Each handler is a short pipeline with early returns:
//! validate → (child routes) film existence check → repository call → map.
//! Persistence failures terminate the request immediately; there is no
//! retry or backoff at this layer.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::dto::{FilmDoc, HealthResponse, ReviewDoc};
use super::error::AppError;
use super::state::AppState;
use super::validation;

/// Result type for plain JSON handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Response type for create handlers: status, Location header, body.
type CreatedResult<T> = Result<(StatusCode, [(HeaderName, String); 1], Json<T>), AppError>;

/// Optional `?search=` query on collection routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

impl SearchQuery {
    /// An empty search value is treated as no search at all.
    fn term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

fn json_payload(body: Option<Json<Value>>) -> Value {
    body.map(|Json(value)| value).unwrap_or(Value::Null)
}

async fn ensure_film_exists(state: &AppState, film_id: i64) -> Result<(), AppError> {
    if state.repository.film_exists(film_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Film not found".to_string()))
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => {
            tracing::warn!("health check failed: {}", e);
            "error".to_string()
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        database,
    })
}

// =============================================================================
// Films
// =============================================================================

/// GET /films
///
/// List all films, or those matching `?search=` on title or body.
/// List documents carry no embedded reviews.
pub async fn list_films(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> HandlerResult<Vec<FilmDoc>> {
    let films = state.repository.list_films(query.term()).await?;
    Ok(Json(films.iter().map(FilmDoc::from_record).collect()))
}

/// POST /films
///
/// Create a film. The database generates `film_id` and `created_at`, so a
/// client-supplied id (under any alias) is a validation error.
pub async fn create_film(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> CreatedResult<FilmDoc> {
    let payload = json_payload(body);
    let (title, text) = validation::require_title_body(&payload)?;
    validation::reject_client_id(
        &payload,
        &validation::FILM_ID_KEYS,
        validation::FILM_ID_IN_CREATE,
    )?;

    let film = state.repository.create_film(&title, &text).await?;

    let location = format!("/films/{}", film.film_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(FilmDoc::with_reviews(&film, vec![])),
    ))
}

/// GET /films/{film_id}
///
/// Return a single film including its reviews, newest first.
pub async fn get_film(
    State(state): State<AppState>,
    Path(film_id): Path<String>,
) -> HandlerResult<FilmDoc> {
    let film_id = validation::parse_id(&film_id, "film_id")?;

    let film = state
        .repository
        .get_film(film_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Film not found".to_string()))?;
    let reviews = state.repository.list_reviews(film_id, None).await?;

    Ok(Json(FilmDoc::with_reviews(
        &film,
        ReviewDoc::map_rows(&reviews),
    )))
}

/// PUT /films/{film_id}
///
/// Update title and body; `created_at` is never touched.
pub async fn update_film(
    State(state): State<AppState>,
    Path(film_id): Path<String>,
    body: Option<Json<Value>>,
) -> HandlerResult<FilmDoc> {
    let film_id = validation::parse_id(&film_id, "film_id")?;
    let payload = json_payload(body);
    let (title, text) = validation::require_title_body(&payload)?;

    let film = state
        .repository
        .update_film(film_id, &title, &text)
        .await?
        .ok_or_else(|| AppError::NotFound("Film not found".to_string()))?;

    Ok(Json(FilmDoc::with_reviews(&film, vec![])))
}

/// DELETE /films/{film_id}
///
/// Cascade-deletes the film's reviews in the same operation.
pub async fn delete_film(
    State(state): State<AppState>,
    Path(film_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let film_id = validation::parse_id(&film_id, "film_id")?;

    let deleted = state.repository.delete_film(film_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Film not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Reviews (nested under a film)
// =============================================================================

/// GET /films/{film_id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(film_id): Path<String>,
    Query(query): Query<SearchQuery>,
) -> HandlerResult<Vec<ReviewDoc>> {
    let film_id = validation::parse_id(&film_id, "film_id")?;
    ensure_film_exists(&state, film_id).await?;

    let reviews = state.repository.list_reviews(film_id, query.term()).await?;
    Ok(Json(ReviewDoc::map_rows(&reviews)))
}

/// POST /films/{film_id}/reviews
///
/// Create a review for a film. The film reference comes only from the URL;
/// a film key in the body is rejected even when null.
pub async fn create_review(
    State(state): State<AppState>,
    Path(film_id): Path<String>,
    body: Option<Json<Value>>,
) -> CreatedResult<ReviewDoc> {
    let film_id = validation::parse_id(&film_id, "film_id")?;
    ensure_film_exists(&state, film_id).await?;

    let payload = json_payload(body);
    let (title, text) = validation::require_title_body(&payload)?;
    validation::reject_client_id(
        &payload,
        &validation::REVIEW_ID_KEYS,
        validation::REVIEW_ID_IN_CREATE,
    )?;
    validation::reject_film_ref_in_body(&payload)?;

    let review = state.repository.create_review(film_id, &title, &text).await?;

    let location = format!("/films/{}/reviews/{}", film_id, review.review_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ReviewDoc::from_record(&review)),
    ))
}

/// GET /films/{film_id}/reviews/{review_id}
///
/// Both keys must match; a review that exists under a different film is
/// not found here.
pub async fn get_review(
    State(state): State<AppState>,
    Path((film_id, review_id)): Path<(String, String)>,
) -> HandlerResult<ReviewDoc> {
    let film_id = validation::parse_id(&film_id, "film_id")?;
    let review_id = validation::parse_id(&review_id, "review_id")?;
    ensure_film_exists(&state, film_id).await?;

    let review = state
        .repository
        .get_review(film_id, review_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

    Ok(Json(ReviewDoc::from_record(&review)))
}

/// PUT /films/{film_id}/reviews/{review_id}
pub async fn update_review(
    State(state): State<AppState>,
    Path((film_id, review_id)): Path<(String, String)>,
    body: Option<Json<Value>>,
) -> HandlerResult<ReviewDoc> {
    let film_id = validation::parse_id(&film_id, "film_id")?;
    let review_id = validation::parse_id(&review_id, "review_id")?;
    ensure_film_exists(&state, film_id).await?;

    let payload = json_payload(body);
    let (title, text) = validation::require_title_body(&payload)?;

    let review = state
        .repository
        .update_review(film_id, review_id, &title, &text)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

    Ok(Json(ReviewDoc::from_record(&review)))
}

/// DELETE /films/{film_id}/reviews/{review_id}
pub async fn delete_review(
    State(state): State<AppState>,
    Path((film_id, review_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let film_id = validation::parse_id(&film_id, "film_id")?;
    let review_id = validation::parse_id(&review_id, "review_id")?;
    ensure_film_exists(&state, film_id).await?;

    let deleted = state.repository.delete_review(film_id, review_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Review not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Fallback
// =============================================================================

/// Any unmatched route.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}
