//! Types for store ratings

use serde::{Deserialize, Serialize};

use crate::fetch::{opt_string_or_number, string_or_number};

/// One user's rating of one store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(alias = "storeId", default, deserialize_with = "opt_string_or_number")]
    pub store_id: Option<String>,
    #[serde(alias = "userId", default, deserialize_with = "opt_string_or_number")]
    pub user_id: Option<String>,
    pub rating: u8,
    #[serde(alias = "createdAt", default)]
    pub created_at: Option<String>,
    /// Display name of the rater, present in store listings
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /ratings`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSubmission {
    pub store_id: serde_json::Value,
    pub rating: u8,
}

impl RatingSubmission {
    /// Numeric store ids go out as JSON numbers, anything else as a string
    pub fn new(store_id: &str, rating: u8) -> Self {
        let store_id = match store_id.parse::<i64>() {
            Ok(n) => serde_json::Value::from(n),
            Err(_) => serde_json::Value::from(store_id),
        };
        Self { store_id, rating }
    }
}
