//! # Machine State
//!
//! The session's one `Machine`, shared by every request.
//!
//! ## Thread Safety
//! The machine is wrapped in `Arc<Mutex<T>>` because:
//! 1. axum runs handlers concurrently on a multi-threaded runtime
//! 2. A purchase must check stock, check funds and mutate in one step
//! 3. Saves must see the state they were triggered by
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request A ──► with_machine_mut ─┐                                      │
//! │  request B ──► with_machine_mut ─┼──► Mutex<Machine>  (one at a time)   │
//! │  request C ──► with_machine    ──┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! No handler holds the lock across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard};

use vend_core::Machine;

#[derive(Debug, Clone)]
pub struct MachineState {
    machine: Arc<Mutex<Machine>>,
}

impl MachineState {
    pub fn new(machine: Machine) -> Self {
        MachineState {
            machine: Arc::new(Mutex::new(machine)),
        }
    }

    /// Every core operation completes or leaves the machine untouched, so a
    /// panic elsewhere while the lock was held cannot leave it half-applied.
    fn lock(&self) -> MutexGuard<'_, Machine> {
        self.machine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Executes a function with read access to the machine.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let balance = machine_state.with_machine(|m| m.balance());
    /// ```
    pub fn with_machine<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Machine) -> R,
    {
        let machine = self.lock();
        f(&machine)
    }

    /// Executes a function with write access to the machine.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let receipt = machine_state.with_machine_mut(|m| m.purchase("A1"))?;
    /// ```
    pub fn with_machine_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Machine) -> R,
    {
        let mut machine = self.lock();
        f(&mut machine)
    }
}

impl Default for MachineState {
    fn default() -> Self {
        MachineState::new(Machine::with_defaults())
    }
}
