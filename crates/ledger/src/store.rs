//! Durable counter cell behind the ledger.

use std::sync::Mutex;

use crate::LedgerError;

/// Storage for the single committed counter. `None` means not yet initialized.
///
/// Implementations must apply `update_with` as one atomic read-modify-write:
/// concurrent callers observe a single global order, and a rejected update
/// leaves the stored value untouched.
pub trait CounterStore: Send + Sync {
    fn read(&self) -> Result<Option<u64>, LedgerError>;

    /// Set the counter to 0. Fails if it was already initialized.
    fn initialize(&self) -> Result<(), LedgerError>;

    /// Atomically replace the counter with `f(current)`. Returns the previous value.
    fn update_with(
        &self,
        f: &mut dyn FnMut(u64) -> Result<u64, LedgerError>,
    ) -> Result<u64, LedgerError>;
}

#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    cell: Mutex<Option<u64>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryCounterStore {
    fn read(&self) -> Result<Option<u64>, LedgerError> {
        let cell = self.cell.lock().map_err(|_| LedgerError::Poisoned)?;
        Ok(*cell)
    }

    fn initialize(&self) -> Result<(), LedgerError> {
        let mut cell = self.cell.lock().map_err(|_| LedgerError::Poisoned)?;
        if cell.is_some() {
            return Err(LedgerError::AlreadyInitialized);
        }
        *cell = Some(0);
        Ok(())
    }

    fn update_with(
        &self,
        f: &mut dyn FnMut(u64) -> Result<u64, LedgerError>,
    ) -> Result<u64, LedgerError> {
        let mut cell = self.cell.lock().map_err(|_| LedgerError::Poisoned)?;
        let current = cell.ok_or(LedgerError::NotInitialized)?;
        let next = f(current)?;
        *cell = Some(next);
        Ok(current)
    }
}
