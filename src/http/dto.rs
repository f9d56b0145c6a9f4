//! Data Transfer Objects for the HTTP API.
//!
//! Maps persisted rows into the wire representation. Field casing matches
//! the original service contract (`FilmID`, `Title`, ...), and timestamps
//! are rendered as fixed GMT strings for cross-client consistency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::{FilmRecord, ReviewRecord};

/// Render a stored timestamp as an HTTP-style GMT date string
/// (`"Sat, 30 Aug 2025 12:00:00 GMT"`).
///
/// An absent timestamp becomes `None`, which serializes as an explicit
/// `null` rather than being omitted.
pub fn http_date(timestamp: Option<DateTime<Utc>>) -> Option<String> {
    timestamp.map(|t| t.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}

/// Film wire document.
///
/// `Reviews` is present (possibly empty) on single-film and create/update
/// responses, and omitted on list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmDoc {
    #[serde(rename = "FilmID")]
    pub film_id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Reviews", default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<ReviewDoc>>,
}

impl FilmDoc {
    /// Map a film row without an embedded review collection.
    pub fn from_record(record: &FilmRecord) -> Self {
        Self {
            film_id: record.film_id,
            title: record.title.clone(),
            body: record.body.clone(),
            date: http_date(record.created_at),
            reviews: None,
        }
    }

    /// Map a film row with its embedded, ordered review collection.
    pub fn with_reviews(record: &FilmRecord, reviews: Vec<ReviewDoc>) -> Self {
        Self {
            reviews: Some(reviews),
            ..Self::from_record(record)
        }
    }
}

/// Review wire document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDoc {
    #[serde(rename = "ReviewID")]
    pub review_id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "Date")]
    pub date: Option<String>,
}

impl ReviewDoc {
    pub fn from_record(record: &ReviewRecord) -> Self {
        Self {
            review_id: record.review_id,
            title: record.title.clone(),
            body: record.body.clone(),
            date: http_date(record.created_at),
        }
    }

    pub fn map_rows(records: &[ReviewRecord]) -> Vec<Self> {
        records.iter().map(Self::from_record).collect()
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Storage backend connection status
    pub database: String,
}
