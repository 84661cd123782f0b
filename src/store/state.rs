//! Locked store state and entity accessors
//!
//! All accessors take `&self`/`&mut self` on the already-locked state,
//! so they compose freely inside one unit of work. Mutators re-validate
//! the uniqueness constraints the services pre-check; a constraint
//! firing here means a pre-flight check was skipped and surfaces as an
//! integrity failure rather than a business error.

use std::collections::BTreeMap;

use crate::error::{AppError, AppResult, Entity};
use crate::models::{Fine, FineRecord, Loan, LoanRecord, Patron, Specimen, Title};

#[derive(Debug, Clone, Default)]
struct Sequences {
    title: i32,
    specimen: i32,
    patron: i32,
    loan: i32,
    fine: i32,
    loan_record: i32,
}

impl Sequences {
    fn next(seq: &mut i32) -> i32 {
        *seq += 1;
        *seq
    }
}

/// All engine state. Cloneable so a unit of work can snapshot it.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    titles: BTreeMap<i32, Title>,
    specimens: BTreeMap<i32, Specimen>,
    patrons: BTreeMap<i32, Patron>,
    loans: BTreeMap<i32, Loan>,
    fines: BTreeMap<i32, Fine>,
    loan_records: Vec<LoanRecord>,
    fine_records: Vec<FineRecord>,
    sequences: Sequences,
}

// --- Titles ---

impl StoreState {
    pub fn insert_title(&mut self, mut title: Title) -> AppResult<i32> {
        if self
            .titles
            .values()
            .any(|t| t.catalog_no == title.catalog_no)
        {
            return Err(AppError::Conflict("catalog number"));
        }

        let id = Sequences::next(&mut self.sequences.title);
        title.id = id;
        self.titles.insert(id, title);
        Ok(id)
    }

    pub fn title(&self, id: i32) -> AppResult<&Title> {
        self.titles
            .get(&id)
            .ok_or(AppError::NotFound(Entity::Title, id))
    }

    pub fn title_mut(&mut self, id: i32) -> AppResult<&mut Title> {
        self.titles
            .get_mut(&id)
            .ok_or(AppError::NotFound(Entity::Title, id))
    }

    pub fn titles(&self) -> impl Iterator<Item = &Title> {
        self.titles.values()
    }

    pub fn remove_title(&mut self, id: i32) -> AppResult<Title> {
        self.titles
            .remove(&id)
            .ok_or(AppError::NotFound(Entity::Title, id))
    }
}

// --- Specimens ---

impl StoreState {
    pub fn insert_specimen(&mut self, mut specimen: Specimen) -> AppResult<i32> {
        if self.specimens.values().any(|s| s.code == specimen.code) {
            return Err(AppError::Conflict("specimen code"));
        }
        if !self.titles.contains_key(&specimen.title_id) {
            return Err(AppError::Integrity(format!(
                "specimen references missing title {}",
                specimen.title_id
            )));
        }

        let id = Sequences::next(&mut self.sequences.specimen);
        specimen.id = id;
        self.specimens.insert(id, specimen);
        Ok(id)
    }

    pub fn specimen(&self, id: i32) -> AppResult<&Specimen> {
        self.specimens
            .get(&id)
            .ok_or(AppError::NotFound(Entity::Specimen, id))
    }

    pub fn specimen_mut(&mut self, id: i32) -> AppResult<&mut Specimen> {
        self.specimens
            .get_mut(&id)
            .ok_or(AppError::NotFound(Entity::Specimen, id))
    }

    pub fn specimen_by_code(&self, code: &str) -> Option<&Specimen> {
        self.specimens.values().find(|s| s.code == code)
    }

    pub fn specimens_of_title(&self, title_id: i32) -> Vec<&Specimen> {
        self.specimens
            .values()
            .filter(|s| s.title_id == title_id)
            .collect()
    }

    pub fn title_has_specimens(&self, title_id: i32) -> bool {
        self.specimens.values().any(|s| s.title_id == title_id)
    }

    pub fn remove_specimen(&mut self, id: i32) -> AppResult<Specimen> {
        self.specimens
            .remove(&id)
            .ok_or(AppError::NotFound(Entity::Specimen, id))
    }
}

// --- Patrons ---

impl StoreState {
    pub fn insert_patron(&mut self, mut patron: Patron) -> AppResult<i32> {
        if self.patrons.values().any(|p| p.login == patron.login) {
            return Err(AppError::Conflict("login"));
        }
        if self.patrons.values().any(|p| p.email == patron.email) {
            return Err(AppError::Conflict("email"));
        }

        let id = Sequences::next(&mut self.sequences.patron);
        patron.id = id;
        self.patrons.insert(id, patron);
        Ok(id)
    }

    pub fn patron(&self, id: i32) -> AppResult<&Patron> {
        self.patrons
            .get(&id)
            .ok_or(AppError::NotFound(Entity::Patron, id))
    }

    pub fn patron_mut(&mut self, id: i32) -> AppResult<&mut Patron> {
        self.patrons
            .get_mut(&id)
            .ok_or(AppError::NotFound(Entity::Patron, id))
    }

    pub fn patron_by_login(&self, login: &str) -> Option<&Patron> {
        self.patrons.values().find(|p| p.login == login)
    }

    pub fn patron_email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.patrons
            .values()
            .any(|p| p.email == email && Some(p.id) != except)
    }

    pub fn remove_patron(&mut self, id: i32) -> AppResult<Patron> {
        self.patrons
            .remove(&id)
            .ok_or(AppError::NotFound(Entity::Patron, id))
    }
}

// --- Loans ---

impl StoreState {
    /// Insert an active loan. The one-active-loan-per-specimen rule is
    /// enforced here as well as in the loan manager's pre-flight check.
    pub fn insert_loan(&mut self, mut loan: Loan) -> AppResult<i32> {
        if self
            .loans
            .values()
            .any(|l| l.specimen_id == loan.specimen_id)
        {
            return Err(AppError::Integrity(format!(
                "specimen {} already has an active loan",
                loan.specimen_id
            )));
        }

        let id = Sequences::next(&mut self.sequences.loan);
        loan.id = id;
        self.loans.insert(id, loan);
        Ok(id)
    }

    pub fn loan(&self, id: i32) -> AppResult<&Loan> {
        self.loans
            .get(&id)
            .ok_or(AppError::NotFound(Entity::Loan, id))
    }

    pub fn loan_by_specimen(&self, specimen_id: i32) -> Option<&Loan> {
        self.loans.values().find(|l| l.specimen_id == specimen_id)
    }

    pub fn loans_of_patron(&self, patron_id: i32) -> Vec<&Loan> {
        self.loans
            .values()
            .filter(|l| l.patron_id == patron_id)
            .collect()
    }

    pub fn count_loans_of_patron(&self, patron_id: i32) -> usize {
        self.loans
            .values()
            .filter(|l| l.patron_id == patron_id)
            .count()
    }

    pub fn count_loans_of_title(&self, title_id: i32) -> usize {
        self.loans
            .values()
            .filter(|l| {
                self.specimens
                    .get(&l.specimen_id)
                    .is_some_and(|s| s.title_id == title_id)
            })
            .count()
    }

    pub fn remove_loan(&mut self, id: i32) -> AppResult<Loan> {
        self.loans
            .remove(&id)
            .ok_or(AppError::NotFound(Entity::Loan, id))
    }
}

// --- Fines ---

impl StoreState {
    /// Insert an active fine. Enforces one active fine per patron.
    pub fn insert_fine(&mut self, mut fine: Fine) -> AppResult<i32> {
        if self.fines.values().any(|f| f.patron_id == fine.patron_id) {
            return Err(AppError::Integrity(format!(
                "patron {} already has an active fine",
                fine.patron_id
            )));
        }

        let id = Sequences::next(&mut self.sequences.fine);
        fine.id = id;
        self.fines.insert(id, fine);
        Ok(id)
    }

    pub fn fine(&self, id: i32) -> AppResult<&Fine> {
        self.fines
            .get(&id)
            .ok_or(AppError::NotFound(Entity::Fine, id))
    }

    pub fn fine_mut(&mut self, id: i32) -> AppResult<&mut Fine> {
        self.fines
            .get_mut(&id)
            .ok_or(AppError::NotFound(Entity::Fine, id))
    }

    pub fn fine_by_patron(&self, patron_id: i32) -> Option<&Fine> {
        self.fines.values().find(|f| f.patron_id == patron_id)
    }

    pub fn remove_fine(&mut self, id: i32) -> AppResult<Fine> {
        self.fines
            .remove(&id)
            .ok_or(AppError::NotFound(Entity::Fine, id))
    }
}

// --- Archive ---

impl StoreState {
    /// Append a closed loan to the archive, assigning its record id.
    pub fn push_loan_record(&mut self, mut record: LoanRecord) -> i32 {
        let id = Sequences::next(&mut self.sequences.loan_record);
        record.id = id;
        self.loan_records.push(record);
        id
    }

    /// Append a resolved fine to the archive. The record keeps the id of
    /// the fine it snapshots.
    pub fn push_fine_record(&mut self, record: FineRecord) {
        self.fine_records.push(record);
    }

    pub fn loan_history_of(&self, patron_id: i32) -> Vec<&LoanRecord> {
        self.loan_records
            .iter()
            .filter(|r| r.patron_id == patron_id)
            .collect()
    }

    pub fn fine_history_of(&self, patron_id: i32) -> Vec<&FineRecord> {
        self.fine_records
            .iter()
            .filter(|r| r.patron_id == patron_id)
            .collect()
    }
}

// --- Reconciliation ---

/// Counter drift found by [`StoreState::availability_drift`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityDrift {
    pub title_id: i32,
    pub stored_available: i32,
    pub derived_available: i32,
}

impl StoreState {
    /// Recompute `available = total - active loans` for every title and
    /// report any title whose stored counter disagrees. The catalog
    /// service runs this as a test-time and maintenance check; a
    /// non-empty result means something wrote counters out of band.
    pub fn availability_drift(&self) -> Vec<AvailabilityDrift> {
        self.titles
            .values()
            .filter_map(|title| {
                let on_loan = self.count_loans_of_title(title.id) as i32;
                let derived = title.total_copies - on_loan;
                (title.available_copies != derived).then_some(AvailabilityDrift {
                    title_id: title.id,
                    stored_available: title.available_copies,
                    derived_available: derived,
                })
            })
            .collect()
    }
}
