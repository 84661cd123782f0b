//! Loan manager: issuance, return and cancellation
//!
//! Orchestrates the lending lifecycle against the inventory counters,
//! the patron directory and the fine ledger. Each operation validates,
//! mutates and archives inside one unit of work; a failure anywhere,
//! including during fine accrual on an overdue return, rolls the whole
//! operation back.

use std::sync::Arc;

use chrono::Duration;

use crate::clock::Clock;
use crate::config::PolicyConfig;
use crate::error::{AppResult, InvariantViolation};
use crate::models::patron::PatronStatus;
use crate::models::{IssueLoan, Loan, LoanRecord};
use crate::services::fines;
use crate::store::MemoryStore;

#[derive(Clone)]
pub struct LoansService {
    store: Arc<MemoryStore>,
    policy: PolicyConfig,
    clock: Arc<dyn Clock>,
}

impl LoansService {
    pub fn new(store: Arc<MemoryStore>, policy: PolicyConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }

    /// Issue a loan for a specimen to a patron.
    ///
    /// Checks run in order: existence of specimen, title and patron;
    /// the specimen is free; the title has availability; the patron is
    /// Active; the patron is under the category loan limit. The due
    /// date honors an explicit override, otherwise it is today plus the
    /// category's loan duration.
    pub async fn issue(&self, request: IssueLoan) -> AppResult<Loan> {
        let mut uow = self.store.begin().await;

        let specimen = uow.specimen(request.specimen_id)?.clone();
        let title = uow.title(specimen.title_id)?.clone();
        let patron = uow.patron(request.patron_id)?.clone();

        if uow.loan_by_specimen(specimen.id).is_some() {
            return Err(InvariantViolation::SpecimenOnLoan.into());
        }
        if title.available_copies <= 0 {
            return Err(InvariantViolation::NoCopiesAvailable.into());
        }
        if patron.status != PatronStatus::Active {
            return Err(InvariantViolation::PatronNotEligible(patron.status).into());
        }

        let policy = self.policy.for_kind(patron.category.kind());
        let count = uow.count_loans_of_patron(patron.id);
        if count >= policy.max_loans {
            return Err(InvariantViolation::LoanLimitExceeded {
                count,
                limit: policy.max_loans,
            }
            .into());
        }

        let today = self.clock.today();
        let due_on = request
            .due_on
            .unwrap_or_else(|| today + Duration::days(policy.loan_days));

        let loan_id = uow.insert_loan(Loan {
            id: 0,
            specimen_id: specimen.id,
            patron_id: patron.id,
            loaned_on: today,
            due_on,
        })?;
        uow.title_mut(title.id)?.available_copies -= 1;

        let loan = uow.loan(loan_id)?.clone();
        uow.commit();

        tracing::info!(
            loan_id,
            specimen_id = specimen.id,
            patron_id = patron.id,
            due_on = %due_on,
            "loan issued"
        );
        Ok(loan)
    }

    /// Return a specimen: closes its active loan into the archive.
    ///
    /// An overdue return accrues onto the patron's fine (creating one if
    /// none is active) before the record is written; the record carries
    /// the fine's id. Loan deletion and the availability release happen
    /// in the same unit of work.
    pub async fn return_specimen(&self, specimen_id: i32) -> AppResult<LoanRecord> {
        let mut uow = self.store.begin().await;

        let loan = uow
            .loan_by_specimen(specimen_id)
            .cloned()
            .ok_or(InvariantViolation::NotOnLoan)?;

        let today = self.clock.today();
        let overdue_days = (today - loan.due_on).num_days().max(0);

        let fine_id = if overdue_days > 0 {
            Some(fines::accrue_or_create(
                &mut uow,
                loan.patron_id,
                overdue_days,
                today,
            )?)
        } else {
            None
        };

        let mut record = LoanRecord {
            id: 0,
            specimen_id,
            patron_id: loan.patron_id,
            loaned_on: loan.loaned_on,
            due_on: loan.due_on,
            returned_on: today,
            fine_id,
        };
        record.id = uow.push_loan_record(record.clone());

        uow.remove_loan(loan.id)?;
        let title_id = uow.specimen(specimen_id)?.title_id;
        uow.title_mut(title_id)?.available_copies += 1;
        uow.commit();

        tracing::info!(
            loan_id = loan.id,
            specimen_id,
            patron_id = loan.patron_id,
            overdue_days,
            "loan returned"
        );
        Ok(record)
    }

    /// Undo an issuance: deletes the loan and releases availability
    /// without writing an archive record.
    pub async fn cancel(&self, loan_id: i32) -> AppResult<()> {
        let mut uow = self.store.begin().await;

        let loan = uow.loan(loan_id)?.clone();
        uow.remove_loan(loan_id)?;
        let title_id = uow.specimen(loan.specimen_id)?.title_id;
        uow.title_mut(title_id)?.available_copies += 1;
        uow.commit();

        tracing::info!(loan_id, specimen_id = loan.specimen_id, "loan cancelled");
        Ok(())
    }

    /// Active loan currently encumbering a specimen, if any.
    pub async fn active_loan_for(&self, specimen_id: i32) -> AppResult<Option<Loan>> {
        let state = self.store.read().await;
        state.specimen(specimen_id)?;
        Ok(state.loan_by_specimen(specimen_id).cloned())
    }

    /// Active loans held by a patron.
    pub async fn loans_of(&self, patron_id: i32) -> AppResult<Vec<Loan>> {
        let state = self.store.read().await;
        state.patron(patron_id)?;
        Ok(state.loans_of_patron(patron_id).into_iter().cloned().collect())
    }

    /// Closed-loan history for a patron, oldest first.
    pub async fn history_of(&self, patron_id: i32) -> AppResult<Vec<LoanRecord>> {
        let state = self.store.read().await;
        state.patron(patron_id)?;
        Ok(state
            .loan_history_of(patron_id)
            .into_iter()
            .cloned()
            .collect())
    }
}
