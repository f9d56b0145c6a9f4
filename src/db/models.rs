//! Storage-facing row types shared by every repository backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted film row.
///
/// `film_id` and `created_at` are assigned by storage on insert and never
/// change afterwards. `created_at` is optional so the response mapper can
/// emit an explicit `null` if storage ever yields no usable timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmRecord {
    pub film_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// A persisted review row. Always belongs to exactly one film.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub review_id: i64,
    pub film_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
}
