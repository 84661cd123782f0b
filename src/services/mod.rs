//! Business services
//!
//! Each service owns one slice of the lending lifecycle and runs every
//! mutating operation as a single unit of work against the shared
//! store. The request layer talks to these; nothing here decides
//! transport-level representation.

pub mod catalog;
pub mod fines;
pub mod loans;
pub mod patrons;

use std::sync::Arc;

use crate::clock::Clock;
use crate::config::PolicyConfig;
use crate::store::MemoryStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub patrons: patrons::PatronService,
    pub loans: loans::LoansService,
    pub fines: fines::FinesService,
}

impl Services {
    /// Create all services over one shared store and clock.
    pub fn new(store: Arc<MemoryStore>, policy: PolicyConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store.clone()),
            patrons: patrons::PatronService::new(store.clone()),
            loans: loans::LoansService::new(store.clone(), policy, clock),
            fines: fines::FinesService::new(store),
        }
    }
}
