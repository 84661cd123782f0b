//! Patron directory service
//!
//! Registration, profile updates and removal of patrons. Category is
//! fixed at registration and status only moves through the fine
//! lifecycle; neither is client-mutable here. Removal is guarded by the
//! patron's active loans and fine.

use std::sync::Arc;

use validator::Validate;

use crate::error::{AppError, AppResult, InvariantViolation};
use crate::models::patron::{CreatePatron, PatronCategory, PatronStatus, UpdatePatron};
use crate::models::Patron;
use crate::store::MemoryStore;

#[derive(Clone)]
pub struct PatronService {
    store: Arc<MemoryStore>,
}

impl PatronService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Register a new patron. Login and email must be unique; the new
    /// account starts Active.
    pub async fn register(&self, input: CreatePatron) -> AppResult<Patron> {
        input.validate()?;

        let mut uow = self.store.begin().await;
        let id = uow.insert_patron(Patron {
            id: 0,
            login: input.login,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            street: input.street,
            number: input.number,
            floor: input.floor,
            city: input.city,
            postal_code: input.postal_code,
            category: input.category,
            status: PatronStatus::Active,
        })?;
        let created = uow.patron(id)?.clone();
        uow.commit();

        tracing::info!(patron_id = id, login = %created.login, category = %created.category.kind(), "patron registered");
        Ok(created)
    }

    /// Update contact and category-payload fields.
    pub async fn update(&self, id: i32, input: UpdatePatron) -> AppResult<Patron> {
        input.validate()?;

        let mut uow = self.store.begin().await;
        if let Some(ref email) = input.email {
            if uow.patron_email_taken(email, Some(id)) {
                return Err(AppError::Conflict("email"));
            }
        }

        let patron = uow.patron_mut(id)?;
        if let Some(first_name) = input.first_name {
            patron.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            patron.last_name = last_name;
        }
        if let Some(email) = input.email {
            patron.email = email;
        }
        if let Some(street) = input.street {
            patron.street = street;
        }
        if let Some(number) = input.number {
            patron.number = number;
        }
        if let Some(floor) = input.floor {
            patron.floor = Some(floor);
        }
        if let Some(city) = input.city {
            patron.city = city;
        }
        if let Some(postal_code) = input.postal_code {
            patron.postal_code = postal_code;
        }
        // Category payloads apply only to the matching kind; the kind
        // itself never changes after registration.
        match &mut patron.category {
            PatronCategory::Student { guardian_phone } => {
                if let Some(phone) = input.guardian_phone {
                    *guardian_phone = phone;
                }
            }
            PatronCategory::Teacher { department } => {
                if let Some(dep) = input.department {
                    *department = dep;
                }
            }
        }
        let updated = patron.clone();
        uow.commit();

        Ok(updated)
    }

    /// Remove a patron. Blocked while the patron holds active loans or
    /// an active fine.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut uow = self.store.begin().await;
        uow.patron(id)?;
        if uow.count_loans_of_patron(id) > 0 {
            return Err(InvariantViolation::PatronHasLoans.into());
        }
        if uow.fine_by_patron(id).is_some() {
            return Err(InvariantViolation::PatronHasFine.into());
        }
        uow.remove_patron(id)?;
        uow.commit();

        tracing::info!(patron_id = id, "patron removed from directory");
        Ok(())
    }

    pub async fn patron(&self, id: i32) -> AppResult<Patron> {
        Ok(self.store.read().await.patron(id)?.clone())
    }

    pub async fn by_login(&self, login: &str) -> Option<Patron> {
        self.store.read().await.patron_by_login(login).cloned()
    }

    /// Whether the patron currently holds any active loan. Exposed for
    /// the calling layer's own removal checks.
    pub async fn has_active_loans(&self, id: i32) -> AppResult<bool> {
        let state = self.store.read().await;
        state.patron(id)?;
        Ok(state.count_loans_of_patron(id) > 0)
    }

    /// Whether the patron currently carries an active fine.
    pub async fn has_active_fine(&self, id: i32) -> AppResult<bool> {
        let state = self.store.read().await;
        state.patron(id)?;
        Ok(state.fine_by_patron(id).is_some())
    }
}
