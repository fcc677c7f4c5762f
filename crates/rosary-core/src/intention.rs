//! Monthly prayer intentions, one per calendar month for the whole parish.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assignment::Period;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intention {
  pub period:     Period,
  pub title:      String,
  pub content:    String,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::RosaryStore::upsert_intention`]. Writing an
/// intention for a month that already has one replaces it.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIntention {
  pub period:  Period,
  pub title:   String,
  pub content: String,
}
