//! Store listing and management for StoreRate

mod types;

use crate::error::Error;
use crate::fetch::ApiContext;
use crate::validation;

pub use types::*;

/// Client for the `/stores` endpoints
#[derive(Clone, Debug)]
pub struct StoresClient {
    ctx: ApiContext,
}

impl StoresClient {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// List stores. Search and sort are applied by the backend.
    pub async fn list(&self, query: &StoreQuery) -> Result<Vec<Store>, Error> {
        let builder = self
            .ctx
            .get("/stores")
            .query("search", &query.search)
            .query("sortBy", query.sort_by.as_str());
        self.ctx.execute(builder).await
    }

    /// Fetch one store
    pub async fn get(&self, id: &str) -> Result<Store, Error> {
        self.ctx.execute(self.ctx.get(&format!("/stores/{}", id))).await
    }

    /// Create a store owned by an existing user
    pub async fn create(&self, store: &NewStore) -> Result<Store, Error> {
        validation::validate_new_store(store)?;
        let builder = self.ctx.post("/stores").json(store)?;
        self.ctx.execute(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_from_backend_row() {
        let store: Store = serde_json::from_value(json!({
            "id": 5,
            "name": "Corner Bakery",
            "address": "1 Main St",
            "email": "bakery@example.com",
            "average_rating": "4.25",
            "total_ratings": 8,
            "owner_id": 2
        }))
        .unwrap();
        assert_eq!(store.id, "5");
        assert_eq!(store.average_rating, 4.25);
        assert_eq!(store.total_ratings, 8);
        assert_eq!(store.owner_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_unrated_store_defaults() {
        let store: Store = serde_json::from_value(json!({
            "id": "s1",
            "name": "New Shop",
            "address": "2 Side St",
            "average_rating": null
        }))
        .unwrap();
        assert_eq!(store.average_rating, 0.0);
        assert_eq!(store.total_ratings, 0);
        assert!(store.owner_id.is_none());
    }

    #[test]
    fn test_new_store_body() {
        let body = serde_json::to_value(NewStore {
            name: "Shop".to_string(),
            email: "shop@example.com".to_string(),
            address: "3 High St".to_string(),
            owner_id: "4".to_string(),
        })
        .unwrap();
        assert_eq!(body["ownerId"], "4");
    }
}
