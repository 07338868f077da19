//! Termination signal handling.
//!
//! In raw mode Ctrl+C arrives as a key press, so the handler here only sees
//! signals sent from outside (SIGINT, SIGTERM, SIGHUP). It sets a flag; the
//! session notices it at the next pause or key wait and unwinds, which lets the
//! terminal guard restore the console.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "a termination signal arrived" flag.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    /// A flag that is not set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a termination signal arrived.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Checks if a termination signal has been received.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Install the process-wide handler and return the flag it sets.
///
/// # Errors
///
/// Returns `ctrlc::Error` if a handler is already installed or the platform
/// refuses the registration.
pub fn install() -> Result<InterruptFlag, ctrlc::Error> {
    let flag = InterruptFlag::new();
    let handler_flag = flag.clone();
    ctrlc::set_handler(move || handler_flag.trigger())?;
    Ok(flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_flag_is_clear() {
        assert!(!InterruptFlag::new().is_set());
    }

    #[test]
    fn trigger_is_visible_through_clones() {
        let flag = InterruptFlag::new();
        let seen_by_handler = flag.clone();

        seen_by_handler.trigger();

        assert!(flag.is_set());
    }
}
