use log::{error, warn};

use super::Feedback;
use crate::auth::SessionStore;
use crate::ratings::{Rating, RatingsClient};
use crate::stores::{Store, StoresClient};
use crate::validation::{self, ValidationErrors};

/// Where the current user's rating of this store stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingState {
    Unrated,
    /// A submission is in flight
    Pending { previous: Option<u8> },
    Rated(u8),
}

impl RatingState {
    pub fn value(&self) -> Option<u8> {
        match self {
            RatingState::Rated(v) => Some(*v),
            _ => None,
        }
    }

    fn restore(previous: Option<u8>) -> Self {
        previous.map_or(RatingState::Unrated, RatingState::Rated)
    }
}

/// One store with its ratings and the current user's rating control
pub struct StoreDetailPage {
    stores: StoresClient,
    ratings: RatingsClient,
    session: SessionStore,
    pub store_id: String,
    pub store: Option<Store>,
    pub all_ratings: Vec<Rating>,
    pub rating_state: RatingState,
    /// Star currently highlighted, 0 when none
    pub selected: u8,
    pub loading: bool,
    pub feedback: Feedback,
}

impl StoreDetailPage {
    pub fn new(
        stores: StoresClient,
        ratings: RatingsClient,
        session: SessionStore,
        store_id: impl Into<String>,
    ) -> Self {
        Self {
            stores,
            ratings,
            session,
            store_id: store_id.into(),
            store: None,
            all_ratings: Vec::new(),
            rating_state: RatingState::Unrated,
            selected: 0,
            loading: false,
            feedback: Feedback::default(),
        }
    }

    /// Whether the rating control is shown
    pub fn can_rate(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn submit_label(&self) -> &'static str {
        match self.rating_state {
            RatingState::Rated(_) => "Update Rating",
            _ => "Submit Rating",
        }
    }

    pub fn select(&mut self, star: u8) {
        self.selected = star;
    }

    /// Load the store, its ratings and, when signed in, the user's own rating
    pub async fn load(&mut self) {
        self.loading = true;
        self.feedback.clear();
        if self.reload_aggregates().await && self.session.is_authenticated() {
            match self.ratings.mine(&self.store_id).await {
                Ok(Some(rating)) => {
                    self.rating_state = RatingState::Rated(rating.rating);
                    self.selected = rating.rating;
                }
                Ok(None) => {
                    self.rating_state = RatingState::Unrated;
                    self.selected = 0;
                }
                Err(e) => {
                    warn!("Error fetching user rating: {}", e);
                    self.rating_state = RatingState::Unrated;
                    self.selected = 0;
                }
            }
        }
        self.loading = false;
    }

    /// Refresh the store and rating list without touching the user's rating
    async fn reload_aggregates(&mut self) -> bool {
        let result = async {
            let store = self.stores.get(&self.store_id).await?;
            let ratings = self.ratings.for_store(&self.store_id).await?;
            Ok::<_, crate::error::Error>((store, ratings))
        }
        .await;

        match result {
            Ok((store, ratings)) => {
                self.store = Some(store);
                self.all_ratings = ratings;
                true
            }
            Err(e) => {
                error!("Error loading store {}: {}", self.store_id, e);
                self.feedback.show(&e, "Error loading store details");
                false
            }
        }
    }

    /// Submit the selected star. Re-submitting replaces the previous rating.
    pub async fn submit(&mut self) -> bool {
        if !self.session.is_authenticated() {
            self.feedback.set_message("Please login to submit a rating");
            return false;
        }
        if self.selected == 0 {
            self.feedback.set_message("Please select a rating");
            return false;
        }
        let mut errors = ValidationErrors::new();
        validation::check_rating(self.selected, &mut errors);
        if let Err(e) = errors.into_result() {
            self.feedback.show(&e, "Invalid rating");
            return false;
        }

        let previous = self.rating_state.value();
        let value = self.selected;
        self.rating_state = RatingState::Pending { previous };

        match self.ratings.submit(&self.store_id, value).await {
            Ok(_) => {
                self.rating_state = RatingState::Rated(value);
                self.feedback.clear();
                self.reload_aggregates().await;
                true
            }
            Err(e) => {
                self.rating_state = RatingState::restore(previous);
                self.feedback.show(&e, "Error submitting rating");
                false
            }
        }
    }
}
