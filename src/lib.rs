//! Alexandria Lending Engine
//!
//! The lending and fine lifecycle engine of a school library system:
//! copy availability, per-patron loan eligibility and limits, due-date
//! computation, overdue detection, fine accrual and resolution, and the
//! archival of closed loans and fines. A request layer (not part of
//! this crate) maps these operations onto its own wire format.

use std::sync::Arc;

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod telemetry;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use clock::{Clock, SystemClock};
use store::MemoryStore;

/// Engine entry point: configuration, shared store and services.
#[derive(Clone)]
pub struct Engine {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl Engine {
    /// Build an engine with an explicit clock. Tests inject a fixed
    /// clock here; deployments use [`Engine::with_system_clock`].
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let services = services::Services::new(store, config.policy.clone(), clock);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }

    pub fn with_system_clock(config: AppConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }
}
