//! Catalog service: titles, specimens and the availability counters
//!
//! This service is the single writer of `total_copies` and
//! `available_copies`. Registering, retiring and reassigning specimens
//! adjust the counters here; issuing and returning loans go through the
//! loan manager, which reserves and releases availability inside its
//! own unit of work.

use std::sync::Arc;

use validator::Validate;

use crate::error::{AppError, AppResult, InvariantViolation};
use crate::models::specimen::{CreateSpecimen, UpdateSpecimen};
use crate::models::title::{CreateTitle, UpdateTitle};
use crate::models::{Specimen, Title};
use crate::store::MemoryStore;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<MemoryStore>,
}

impl CatalogService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Catalogue a new title. Counters start at zero; they only move
    /// when specimens are registered.
    pub async fn create_title(&self, input: CreateTitle) -> AppResult<Title> {
        input.validate()?;

        let mut uow = self.store.begin().await;
        let id = uow.insert_title(Title {
            id: 0,
            catalog_no: input.catalog_no,
            title: input.title,
            author: input.author,
            page_count: input.page_count,
            cover_uri: input.cover_uri,
            total_copies: 0,
            available_copies: 0,
        })?;
        let created = uow.title(id)?.clone();
        uow.commit();

        tracing::info!(title_id = id, catalog_no = %created.catalog_no, "title catalogued");
        Ok(created)
    }

    /// Update a title's descriptive fields. The catalog number is part
    /// of the title's identity and cannot change; counters are never
    /// client-writable.
    pub async fn update_title(&self, id: i32, input: UpdateTitle) -> AppResult<Title> {
        input.validate()?;

        let mut uow = self.store.begin().await;
        let title = uow.title_mut(id)?;
        if let Some(name) = input.title {
            title.title = name;
        }
        if let Some(author) = input.author {
            title.author = author;
        }
        if let Some(page_count) = input.page_count {
            title.page_count = page_count;
        }
        if let Some(cover_uri) = input.cover_uri {
            title.cover_uri = Some(cover_uri);
        }
        let updated = title.clone();
        uow.commit();

        Ok(updated)
    }

    /// Remove a title from the catalog. Blocked while any specimen of
    /// the title remains registered.
    pub async fn delete_title(&self, id: i32) -> AppResult<()> {
        let mut uow = self.store.begin().await;
        uow.title(id)?;
        if uow.title_has_specimens(id) {
            return Err(InvariantViolation::TitleHasSpecimens.into());
        }
        uow.remove_title(id)?;
        uow.commit();

        tracing::info!(title_id = id, "title removed from catalog");
        Ok(())
    }

    /// Register a new physical copy: bumps the owning title's total and
    /// available counters together.
    pub async fn add_specimen(&self, input: CreateSpecimen) -> AppResult<Specimen> {
        input.validate()?;

        let mut uow = self.store.begin().await;
        uow.title(input.title_id)?;
        let id = uow.insert_specimen(Specimen {
            id: 0,
            title_id: input.title_id,
            code: input.code,
            acquired_on: input.acquired_on,
            notes: input.notes,
        })?;
        let title = uow.title_mut(input.title_id)?;
        title.total_copies += 1;
        title.available_copies += 1;
        let created = uow.specimen(id)?.clone();
        uow.commit();

        tracing::info!(specimen_id = id, title_id = created.title_id, "specimen registered");
        Ok(created)
    }

    /// Update a specimen. Reassigning it to another title transfers the
    /// counters: totals always move, availability only moves when the
    /// specimen is not on loan, since a loaned specimen was already
    /// excluded from the old title's availability and stays excluded on
    /// the new one.
    pub async fn update_specimen(&self, id: i32, input: UpdateSpecimen) -> AppResult<Specimen> {
        input.validate()?;

        let mut uow = self.store.begin().await;
        let current = uow.specimen(id)?.clone();

        if let Some(ref code) = input.code {
            if uow
                .specimen_by_code(code)
                .is_some_and(|other| other.id != id)
            {
                return Err(AppError::Conflict("specimen code"));
            }
        }

        if let Some(new_title_id) = input.title_id {
            if new_title_id != current.title_id {
                uow.title(new_title_id)?;
                let on_loan = uow.loan_by_specimen(id).is_some();

                let old = uow.title_mut(current.title_id)?;
                old.total_copies -= 1;
                if !on_loan {
                    old.available_copies -= 1;
                }

                let new = uow.title_mut(new_title_id)?;
                new.total_copies += 1;
                if !on_loan {
                    new.available_copies += 1;
                }

                uow.specimen_mut(id)?.title_id = new_title_id;
            }
        }

        let specimen = uow.specimen_mut(id)?;
        if let Some(code) = input.code {
            specimen.code = code;
        }
        if let Some(acquired_on) = input.acquired_on {
            specimen.acquired_on = acquired_on;
        }
        if let Some(notes) = input.notes {
            specimen.notes = Some(notes);
        }
        let updated = specimen.clone();
        uow.commit();

        Ok(updated)
    }

    /// Retire a physical copy. Blocked while the specimen is on loan;
    /// otherwise it was counted available, so both counters come down.
    pub async fn retire_specimen(&self, id: i32) -> AppResult<()> {
        let mut uow = self.store.begin().await;
        let specimen = uow.specimen(id)?.clone();
        if uow.loan_by_specimen(id).is_some() {
            return Err(InvariantViolation::SpecimenOnLoan.into());
        }
        uow.remove_specimen(id)?;
        let title = uow.title_mut(specimen.title_id)?;
        title.total_copies -= 1;
        title.available_copies -= 1;
        uow.commit();

        tracing::info!(specimen_id = id, title_id = specimen.title_id, "specimen retired");
        Ok(())
    }

    pub async fn title(&self, id: i32) -> AppResult<Title> {
        Ok(self.store.read().await.title(id)?.clone())
    }

    pub async fn list_titles(&self) -> Vec<Title> {
        self.store.read().await.titles().cloned().collect()
    }

    pub async fn specimen(&self, id: i32) -> AppResult<Specimen> {
        Ok(self.store.read().await.specimen(id)?.clone())
    }

    pub async fn specimens_of(&self, title_id: i32) -> AppResult<Vec<Specimen>> {
        let state = self.store.read().await;
        state.title(title_id)?;
        Ok(state
            .specimens_of_title(title_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Current availability for a title.
    pub async fn availability(&self, title_id: i32) -> AppResult<i32> {
        Ok(self.store.read().await.title(title_id)?.available_copies)
    }

    /// Check every title's stored availability against the count derived
    /// from active loans. Drift means some writer bypassed the ledger.
    pub async fn reconcile(&self) -> AppResult<()> {
        let drift = self.store.read().await.availability_drift();
        if drift.is_empty() {
            return Ok(());
        }

        for d in &drift {
            tracing::error!(
                title_id = d.title_id,
                stored = d.stored_available,
                derived = d.derived_available,
                "availability counter drift"
            );
        }
        Err(AppError::Integrity(format!(
            "availability drift on {} title(s)",
            drift.len()
        )))
    }
}
