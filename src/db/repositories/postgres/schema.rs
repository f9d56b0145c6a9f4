//! Diesel table definitions for the films schema.

diesel::table! {
    films (film_id) {
        film_id -> Int8,
        title -> Text,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    reviews (review_id) {
        review_id -> Int8,
        film_id -> Int8,
        title -> Text,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(reviews -> films (film_id));

diesel::allow_tables_to_appear_in_same_query!(films, reviews);
