//! Fine ledger: accrual, consolidation and resolution
//!
//! A patron carries at most one active fine. Overdue returns extend it
//! rather than opening a second one; resolution snapshots it to the
//! archive and reopens the account.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use crate::error::AppResult;
use crate::models::patron::PatronStatus;
use crate::models::{Fine, FineRecord};
use crate::store::{MemoryStore, StoreState};

/// Accrue overdue days onto the patron's active fine, creating one when
/// none exists, and mark the patron Fined.
///
/// Runs against already-locked state so the loan manager can fold the
/// accrual into the same unit of work as the return it belongs to.
/// Returns the id of the fine written.
pub(crate) fn accrue_or_create(
    state: &mut StoreState,
    patron_id: i32,
    overdue_days: i64,
    today: NaiveDate,
) -> AppResult<i32> {
    state.patron(patron_id)?;

    let existing = state.fine_by_patron(patron_id).map(|f| f.id);
    let fine_id = match existing {
        Some(id) => {
            let fine = state.fine_mut(id)?;
            fine.accumulated_days += overdue_days;
            fine.ends_on = today + Duration::days(fine.accumulated_days);
            id
        }
        None => state.insert_fine(Fine {
            id: 0,
            patron_id,
            started_on: today,
            accumulated_days: overdue_days,
            ends_on: today + Duration::days(overdue_days),
        })?,
    };

    state.patron_mut(patron_id)?.status = PatronStatus::Fined;

    tracing::info!(fine_id, patron_id, overdue_days, "fine accrued");
    Ok(fine_id)
}

#[derive(Clone)]
pub struct FinesService {
    store: Arc<MemoryStore>,
}

impl FinesService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Resolve an active fine: snapshot it into the archive, delete it,
    /// and set the patron back to Active.
    ///
    /// The reset is unconditional; it does not re-check other overdue
    /// loans the patron may still hold. Resolving an already-resolved
    /// fine fails NotFound since the active fine no longer exists.
    pub async fn resolve(&self, fine_id: i32) -> AppResult<FineRecord> {
        let mut uow = self.store.begin().await;

        let fine = uow.fine(fine_id)?.clone();
        let record = FineRecord::from(&fine);
        uow.push_fine_record(record.clone());
        uow.remove_fine(fine_id)?;
        uow.patron_mut(fine.patron_id)?.status = PatronStatus::Active;
        uow.commit();

        tracing::info!(fine_id, patron_id = fine.patron_id, "fine resolved");
        Ok(record)
    }

    pub async fn fine(&self, fine_id: i32) -> AppResult<Fine> {
        Ok(self.store.read().await.fine(fine_id)?.clone())
    }

    /// The patron's active fine, if any.
    pub async fn active_fine_for(&self, patron_id: i32) -> AppResult<Option<Fine>> {
        let state = self.store.read().await;
        state.patron(patron_id)?;
        Ok(state.fine_by_patron(patron_id).cloned())
    }

    /// Resolved-fine history for a patron, oldest first.
    pub async fn history_of(&self, patron_id: i32) -> AppResult<Vec<FineRecord>> {
        let state = self.store.read().await;
        state.patron(patron_id)?;
        Ok(state
            .fine_history_of(patron_id)
            .into_iter()
            .cloned()
            .collect())
    }
}
