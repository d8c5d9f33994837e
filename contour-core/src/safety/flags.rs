//! Shared abort flags
//!
//! Both flags start false and only ever become true during a scan. They
//! are written by the watchers and read by the main sequence, so plain
//! atomic loads and stores are enough; no read-modify-write is needed.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::error::ScanError;

/// Early-stop and fault flags shared by the scan tasks
#[derive(Debug, Default)]
pub struct AbortFlags {
    stop_early: AtomicBool,
    fault: AtomicBool,
}

impl AbortFlags {
    /// Create cleared flags
    pub const fn new() -> Self {
        Self {
            stop_early: AtomicBool::new(false),
            fault: AtomicBool::new(false),
        }
    }

    /// Request a graceful early stop
    ///
    /// Returns true only for the request that raised the flag.
    pub fn request_stop(&self) -> bool {
        if self.stop_early.load(Ordering::Acquire) {
            return false;
        }
        self.stop_early.store(true, Ordering::Release);
        true
    }

    /// Check if an early stop was requested
    pub fn stop_requested(&self) -> bool {
        self.stop_early.load(Ordering::Acquire)
    }

    /// Latch a tilt fault
    ///
    /// Returns true only for the call that raised the flag.
    pub fn signal_fault(&self) -> bool {
        if self.fault.load(Ordering::Acquire) {
            return false;
        }
        self.fault.store(true, Ordering::Release);
        true
    }

    /// Check if a tilt fault was latched
    pub fn fault_detected(&self) -> bool {
        self.fault.load(Ordering::Acquire)
    }

    /// Fail with [`ScanError::TiltFault`] once a fault is latched
    ///
    /// Called before every commanded move.
    pub fn check_fault(&self) -> Result<(), ScanError> {
        if self.fault_detected() {
            Err(ScanError::TiltFault)
        } else {
            Ok(())
        }
    }
}
