use crate::error::ValidationError;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;

/// A persisted review row.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Review {
    pub id: i32,
    pub username: String,
    pub rating: i32,
    pub comment: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

/// POST body as submitted. Absent or null fields fall back to their
/// defaults so they fail validation rather than deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
}

/// A validated review ready to be inserted.
#[derive(Clone, Debug, PartialEq)]
pub struct NewReview {
    pub username: String,
    pub rating: i32,
    pub comment: String,
}

impl ReviewInput {
    pub fn validate(self) -> Result<NewReview, ValidationError> {
        let username = self.username.trim();
        let comment = self.comment.trim();
        if username.is_empty() || comment.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if !(1.0..=5.0).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange);
        }
        Ok(NewReview {
            username: username.to_owned(),
            rating: self.rating.round() as i32,
            comment: comment.to_owned(),
        })
    }
}

/// Renders a store timestamp the way Postgres `timestamp` values are
/// printed in ISO-8601: no offset, microseconds only when non-zero.
pub fn iso8601(ts: &NaiveDateTime) -> String {
    let format = if ts.nanosecond() == 0 {
        "%Y-%m-%dT%H:%M:%S"
    } else {
        "%Y-%m-%dT%H:%M:%S%.6f"
    };
    ts.format(format).to_string()
}

fn serialize_timestamp<S>(ts: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match ts {
        Some(ts) => serializer.serialize_str(&iso8601(ts)),
        None => serializer.serialize_none(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
