//! Fine model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An active penalty accrual against a patron for overdue returns.
///
/// A patron carries at most one active fine; further overdue returns
/// extend it instead of opening a second one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fine {
    pub id: i32,
    pub patron_id: i32,
    pub started_on: NaiveDate,
    pub accumulated_days: i64,
    /// Day the penalty runs out: last accrual day + accumulated days.
    pub ends_on: NaiveDate,
}

/// Historical record of a resolved fine. Append-only; keeps the id of
/// the fine it snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FineRecord {
    pub id: i32,
    pub patron_id: i32,
    pub started_on: NaiveDate,
    pub accumulated_days: i64,
    pub ends_on: NaiveDate,
}

impl From<&Fine> for FineRecord {
    fn from(fine: &Fine) -> Self {
        FineRecord {
            id: fine.id,
            patron_id: fine.patron_id,
            started_on: fine.started_on,
            accumulated_days: fine.accumulated_days,
            ends_on: fine.ends_on,
        }
    }
}
