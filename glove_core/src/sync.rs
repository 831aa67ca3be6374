//! Shared-state cells for main-loop / handler contention.
//!
//! On the device every queue access sits inside an interrupt-masking
//! critical section that restores the interrupt state on exit. Here
//! the same contract is expressed as an explicitly synchronized cell
//! with one scoped-access operation: exclusion is taken for the span of
//! the closure and restored on scope exit, including early returns.
//!
//! Contention on an [`IrqCell`] is only ever between the control loop
//! and a single handler entry point, each performing short bounded
//! operations; there are no waiting threads to deadlock against, and a
//! handler never takes the same cell twice (handlers are not
//! re-entrant).

use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable handle to a value shared between the control loop and one
/// asynchronous handler context.
pub struct IrqCell<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for IrqCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> IrqCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value)),
        }
    }

    /// Run `f` with exclusive access to the cell.
    ///
    /// The enclosed update always runs to completion; a poisoned lock
    /// (a panicking test thread) is recovered rather than propagated so
    /// the control loop can keep going.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_value() {
        let cell = IrqCell::new(0u32);
        let handle = cell.clone();
        handle.with(|v| *v += 5);
        assert_eq!(cell.with(|v| *v), 5);
    }

    #[test]
    fn scoped_access_returns_closure_result() {
        let cell = IrqCell::new(vec![1, 2, 3]);
        let sum: i32 = cell.with(|v| v.iter().sum());
        assert_eq!(sum, 6);
    }
}
