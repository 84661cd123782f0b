//! Engine state store
//!
//! The engine keeps all circulation state (titles, specimens, patrons,
//! loans, fines, archive) in one in-memory store. Durable persistence is
//! an external collaborator; this store is the engine's single writer
//! and the place where uniqueness constraints are enforced a second
//! time, after the services' pre-flight checks.
//!
//! Every public engine operation runs inside one [`UnitOfWork`]: the
//! store lock is held for the whole operation, so conflicting operations
//! on the same specimen or patron serialize, and dropping the unit of
//! work without committing restores the pre-operation state. No
//! operation can leave partial mutations behind.

mod state;

pub use state::{AvailabilityDrift, StoreState};

use std::ops::{Deref, DerefMut};

use tokio::sync::{Mutex, MutexGuard};

/// Shared in-memory store guarding all engine state.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a unit of work for a mutating operation. Rolls back on drop
    /// unless [`UnitOfWork::commit`] is called.
    pub async fn begin(&self) -> UnitOfWork<'_> {
        let guard = self.state.lock().await;
        let snapshot = Box::new(guard.clone());
        UnitOfWork {
            guard,
            snapshot: Some(snapshot),
        }
    }

    /// Lock the store for a read-only query. No snapshot is taken.
    pub async fn read(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().await
    }
}

/// One atomic unit of work over the store.
///
/// Holds the store lock from first read to commit. Early returns (`?`)
/// drop the unit of work, which restores the snapshot taken at `begin`,
/// so a failure after partial mutation undoes every change.
pub struct UnitOfWork<'a> {
    guard: MutexGuard<'a, StoreState>,
    snapshot: Option<Box<StoreState>>,
}

impl UnitOfWork<'_> {
    /// Make all mutations performed through this unit of work permanent.
    pub fn commit(mut self) {
        self.snapshot = None;
    }
}

impl Deref for UnitOfWork<'_> {
    type Target = StoreState;

    fn deref(&self) -> &StoreState {
        &self.guard
    }
}

impl DerefMut for UnitOfWork<'_> {
    fn deref_mut(&mut self) -> &mut StoreState {
        &mut self.guard
    }
}

impl Drop for UnitOfWork<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.guard = *snapshot;
        }
    }
}
