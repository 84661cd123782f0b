//! Loan model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An active borrowing relationship between one specimen and one patron.
///
/// At most one active loan may reference a given specimen; the loan's
/// existence is what marks the specimen as encumbered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: i32,
    pub specimen_id: i32,
    pub patron_id: i32,
    pub loaned_on: NaiveDate,
    pub due_on: NaiveDate,
}

/// Issue loan request
#[derive(Debug, Deserialize)]
pub struct IssueLoan {
    pub specimen_id: i32,
    pub patron_id: i32,
    /// Explicit due-date override. When absent the due date is computed
    /// from the patron category's loan duration.
    pub due_on: Option<NaiveDate>,
}

/// Historical record of a closed loan. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: i32,
    pub specimen_id: i32,
    pub patron_id: i32,
    pub loaned_on: NaiveDate,
    pub due_on: NaiveDate,
    pub returned_on: NaiveDate,
    /// The fine this return created or extended, if the return was
    /// overdue. Fine ids are stable across archival, so the reference
    /// remains valid after the fine is resolved.
    pub fine_id: Option<i32>,
}
