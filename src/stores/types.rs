//! Types for store listing and management

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::fetch::{lenient_f64, lenient_u64, opt_string_or_number, string_or_number};

/// A store with its server-computed rating aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub average_rating: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_ratings: u64,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub owner_id: Option<String>,
}

/// Body of `POST /stores`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStore {
    pub name: String,
    pub email: String,
    pub address: String,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
}

/// Server-side sort order for the store listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreSort {
    #[default]
    Name,
    Rating,
    Address,
}

impl StoreSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Rating => "rating",
            Self::Address => "address",
        }
    }
}

impl FromStr for StoreSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "rating" => Ok(Self::Rating),
            "address" => Ok(Self::Address),
            other => Err(format!("unknown store sort: {}", other)),
        }
    }
}

/// Parameters passed through to `GET /stores`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreQuery {
    pub search: String,
    pub sort_by: StoreSort,
}

impl StoreQuery {
    pub fn new(search: impl Into<String>, sort_by: StoreSort) -> Self {
        Self {
            search: search.into(),
            sort_by,
        }
    }
}
