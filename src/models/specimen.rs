//! Specimen (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One physical copy of a title, individually loanable.
///
/// A specimen has at most one active loan at a time; the loans table is
/// the single source of truth for that, no flag is kept here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specimen {
    pub id: i32,
    pub title_id: i32,
    /// Physical code (barcode). Unique across specimens.
    pub code: String,
    pub acquired_on: NaiveDate,
    pub notes: Option<String>,
}

/// Create specimen request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSpecimen {
    pub title_id: i32,
    #[validate(length(min = 1, message = "specimen code must not be empty"))]
    pub code: String,
    pub acquired_on: NaiveDate,
    pub notes: Option<String>,
}

/// Update specimen request
///
/// Setting `title_id` reassigns the specimen to another title; both
/// titles' counters are transferred in the same unit of work.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSpecimen {
    pub title_id: Option<i32>,
    #[validate(length(min = 1, message = "specimen code must not be empty"))]
    pub code: Option<String>,
    pub acquired_on: Option<NaiveDate>,
    pub notes: Option<String>,
}
