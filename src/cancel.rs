// creal: exact real arithmetic
// cancel.rs
//
// Process-wide cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::CrealError;

/// A cooperative stop flag polled by every potentially-long-running loop:
/// transcendental Taylor series, the Gauss-Legendre AGM iteration, CR
/// comparison doubling, `refine_msd`, the monotone-inverse solver,
/// `common_power`, and integer-log search.
///
/// There is no per-call cancellation token. A caller that wants to abort an
/// in-flight computation sets the flag, waits for the unwinding call to
/// return a [`CrealError::Cancelled`], and clears the flag before invoking
/// the library again; racing overlapping computations against one shared
/// flag is undefined behavior at the semantic (not memory-safety) level.
#[derive(Clone, Debug)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates a fresh, unset flag. Use this for a scoped cancellation
    /// token distinct from [`CancellationFlag::global`].
    pub fn new() -> Self {
        CancellationFlag(Arc::new(AtomicBool::new(false)))
    }

    /// Sets the flag, requesting that in-flight computations unwind.
    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Clears the flag. Callers must do this before reusing the library
    /// after a cancelled computation.
    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    /// Returns whether the flag is currently set.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Polls the flag, returning [`CrealError::Cancelled`] if set. Called
    /// once per iteration boundary by every iterative algorithm in the
    /// crate.
    pub fn check(&self) -> Result<(), CrealError> {
        if self.is_set() {
            Err(CrealError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// The default library-global flag, shared by every `Cr` node unless a
    /// scoped flag is threaded through explicitly.
    pub fn global() -> Self {
        CancellationFlag(PROCESS_FLAG.get_or_init(|| Arc::new(AtomicBool::new(false))).clone())
    }
}

impl Default for CancellationFlag {
    fn default() -> Self {
        CancellationFlag::global()
    }
}

static PROCESS_FLAG: std::sync::OnceLock<Arc<AtomicBool>> = std::sync::OnceLock::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_flag_round_trips() {
        let flag = CancellationFlag::new();
        assert!(flag.check().is_ok());
        flag.set();
        assert_eq!(flag.check(), Err(CrealError::Cancelled));
        flag.clear();
        assert!(flag.check().is_ok());
    }

    #[test]
    fn global_flag_is_shared_process_wide() {
        let a = CancellationFlag::global();
        let b = CancellationFlag::global();
        a.set();
        assert!(b.is_set());
        b.clear();
        assert!(!a.is_set());
    }
}
