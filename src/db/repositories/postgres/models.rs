//! Diesel row types and conversions into the shared records.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{films, reviews};
use crate::db::models::{FilmRecord, ReviewRecord};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = films)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FilmRow {
    pub film_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<FilmRow> for FilmRecord {
    fn from(row: FilmRow) -> Self {
        Self {
            film_id: row.film_id,
            title: row.title,
            body: row.body,
            created_at: Some(row.created_at),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewRow {
    pub review_id: i64,
    pub film_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for ReviewRecord {
    fn from(row: ReviewRow) -> Self {
        Self {
            review_id: row.review_id,
            film_id: row.film_id,
            title: row.title,
            body: row.body,
            created_at: Some(row.created_at),
        }
    }
}
