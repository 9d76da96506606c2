//! Seed records loaded from YAML and written by [`super::repo::apply_seed`].
//!
//! Categories have no public create endpoint, so seeding is how they come to exist.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub questions: Vec<SeedQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedCategory {
    #[serde(rename = "type")]
    pub kind: String,
}

/// A seed question; `category` is a category label, not an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedQuestion {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub difficulty: i64,
}
