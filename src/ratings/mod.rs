//! Store ratings for StoreRate

mod types;

use log::debug;

use crate::error::Error;
use crate::fetch::ApiContext;
use crate::validation::{self, ValidationErrors};

pub use types::*;

/// Client for the `/ratings` endpoints
#[derive(Clone, Debug)]
pub struct RatingsClient {
    ctx: ApiContext,
}

impl RatingsClient {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// Create or replace the current user's rating of a store.
    ///
    /// The backend keeps one rating per (user, store) and decides whether this is
    /// an insert or an update. Returns the stored rating when the backend echoes
    /// it; a bare acknowledgement or an empty body yields `None`.
    pub async fn submit(&self, store_id: &str, rating: u8) -> Result<Option<Rating>, Error> {
        let mut errors = ValidationErrors::new();
        validation::check_rating(rating, &mut errors);
        errors.into_result()?;

        let builder = self
            .ctx
            .post("/ratings")
            .json(&RatingSubmission::new(store_id, rating))?;
        let value: Option<serde_json::Value> = self.ctx.execute_optional(builder).await?;
        Ok(value.and_then(|v| serde_json::from_value(v).ok()))
    }

    /// Every rating of a store
    pub async fn for_store(&self, store_id: &str) -> Result<Vec<Rating>, Error> {
        self.ctx
            .execute(self.ctx.get(&format!("/ratings/store/{}", store_id)))
            .await
    }

    /// The current user's rating of a store; `None` when there is none yet
    pub async fn mine(&self, store_id: &str) -> Result<Option<Rating>, Error> {
        let builder = self.ctx.get(&format!("/ratings/store/{}/user", store_id));
        match self.ctx.execute::<serde_json::Value>(builder).await {
            Ok(serde_json::Value::Null) => Ok(None),
            Ok(value) => Ok(Some(serde_json::from_value(value)?)),
            Err(e) if e.is_not_found() => {
                debug!("No rating yet for store {}", store_id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submission_body() {
        let body = serde_json::to_value(RatingSubmission::new("12", 4)).unwrap();
        assert_eq!(body, json!({"storeId": 12, "rating": 4}));

        let body = serde_json::to_value(RatingSubmission::new("abc", 2)).unwrap();
        assert_eq!(body, json!({"storeId": "abc", "rating": 2}));
    }

    #[test]
    fn test_rating_from_listing_row() {
        let rating: Rating = serde_json::from_value(json!({
            "id": 1,
            "store_id": 12,
            "rating": 5,
            "created_at": "2024-03-05T10:00:00.000Z",
            "name": "Alexandra Montgomery Smith"
        }))
        .unwrap();
        assert_eq!(rating.store_id.as_deref(), Some("12"));
        assert_eq!(rating.user_id, None);
        assert_eq!(rating.name.as_deref(), Some("Alexandra Montgomery Smith"));
    }
}
