//! Request validation helpers.
//!
//! Pure functions that check route parameters and payload shape before any
//! repository call. Validation failures never reach the storage layer.

use serde_json::Value;

use super::error::AppError;

/// Identifier keys a client might use for a film id, in any casing the
/// original API accepted. Presence is checked as set membership, not as a
/// single field name.
pub const FILM_ID_KEYS: [&str; 2] = ["FilmID", "film_id"];

/// Identifier keys a client might use for a review id.
pub const REVIEW_ID_KEYS: [&str; 2] = ["ReviewID", "review_id"];

pub const MISSING_FIELDS: &str = "Missing required field(s): title, body";
pub const FILM_ID_IN_CREATE: &str =
    "Do not include film_id in POST; it is generated by the database";
pub const REVIEW_ID_IN_CREATE: &str =
    "Do not include review_id in POST; it is generated by the database";
pub const FILM_REF_IN_REVIEW_BODY: &str =
    "Do not include film_id in review POST body; use the URL";

/// Parse a numeric path segment.
///
/// Anything that is not an integer id yields a `BadRequest` naming the
/// offending parameter.
pub fn parse_id(raw: &str, label: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("{} must be a number", label)))
}

/// Extract required `title` and `body` fields from a JSON payload.
///
/// Missing, null, non-string, and empty-string values are all treated as
/// missing; an empty string is not a valid zero-length value.
pub fn require_title_body(payload: &Value) -> Result<(String, String), AppError> {
    let title = non_empty_string(payload.get("title"));
    let body = non_empty_string(payload.get("body"));
    match (title, body) {
        (Some(title), Some(body)) => Ok((title, body)),
        _ => Err(AppError::BadRequest(MISSING_FIELDS.to_string())),
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Reject payloads that carry a server-generated identifier.
///
/// Presence of any alias key with a non-null value is the violation,
/// regardless of whether the value would have been "correct".
pub fn reject_client_id(payload: &Value, keys: &[&str], message: &str) -> Result<(), AppError> {
    for key in keys {
        if let Some(value) = payload.get(key) {
            if !value.is_null() {
                return Err(AppError::BadRequest(message.to_string()));
            }
        }
    }
    Ok(())
}

/// Reject review payloads that carry a film reference.
///
/// The film id comes only from the URL; the key's mere presence (even with
/// a null value) is an error.
pub fn reject_film_ref_in_body(payload: &Value) -> Result<(), AppError> {
    for key in FILM_ID_KEYS {
        if payload.get(key).is_some() {
            return Err(AppError::BadRequest(FILM_REF_IN_REVIEW_BODY.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message_of(err: AppError) -> String {
        match err {
            AppError::BadRequest(msg) => msg,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_id_accepts_integers() {
        assert_eq!(parse_id("42", "film_id").unwrap(), 42);
        assert_eq!(parse_id(" 7 ", "film_id").unwrap(), 7);
    }

    #[test]
    fn test_parse_id_rejects_non_numeric() {
        let err = parse_id("abc", "film_id").unwrap_err();
        assert_eq!(message_of(err), "film_id must be a number");

        let err = parse_id("12x", "review_id").unwrap_err();
        assert_eq!(message_of(err), "review_id must be a number");
    }

    #[test]
    fn test_require_title_body_happy_path() {
        let (title, body) =
            require_title_body(&json!({"title": "Alien", "body": "In space"})).unwrap();
        assert_eq!(title, "Alien");
        assert_eq!(body, "In space");
    }

    #[test]
    fn test_empty_string_is_missing() {
        let err = require_title_body(&json!({"title": "", "body": "x"})).unwrap_err();
        assert_eq!(message_of(err), MISSING_FIELDS);
    }

    #[test]
    fn test_null_and_absent_fields_are_missing() {
        assert!(require_title_body(&json!({"title": "x"})).is_err());
        assert!(require_title_body(&json!({"title": "x", "body": null})).is_err());
        assert!(require_title_body(&Value::Null).is_err());
    }

    #[test]
    fn test_non_string_fields_are_missing() {
        assert!(require_title_body(&json!({"title": 5, "body": "x"})).is_err());
    }

    #[test]
    fn test_reject_client_id_on_any_alias() {
        let payload = json!({"title": "t", "body": "b", "FilmID": 9});
        assert!(reject_client_id(&payload, &FILM_ID_KEYS, FILM_ID_IN_CREATE).is_err());

        let payload = json!({"title": "t", "body": "b", "film_id": "not-even-a-number"});
        assert!(reject_client_id(&payload, &FILM_ID_KEYS, FILM_ID_IN_CREATE).is_err());
    }

    #[test]
    fn test_null_id_value_is_tolerated() {
        let payload = json!({"title": "t", "body": "b", "film_id": null});
        assert!(reject_client_id(&payload, &FILM_ID_KEYS, FILM_ID_IN_CREATE).is_ok());
    }

    #[test]
    fn test_film_ref_presence_alone_is_rejected() {
        // Unlike the id check, a null film reference is still an error.
        let payload = json!({"title": "t", "body": "b", "film_id": null});
        assert!(reject_film_ref_in_body(&payload).is_err());

        let payload = json!({"title": "t", "body": "b", "FilmID": 3});
        assert!(reject_film_ref_in_body(&payload).is_err());

        let payload = json!({"title": "t", "body": "b"});
        assert!(reject_film_ref_in_body(&payload).is_ok());
    }
}
