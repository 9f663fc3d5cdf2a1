use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::CushionsError;

/// Admission control for uploads: at most one runs at a time, extra requests
/// are rejected rather than queued.
#[derive(Debug, Clone, Default)]
pub struct UploadSlot {
    running: Arc<AtomicBool>,
}

impl UploadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Claim the slot. It frees itself when the guard drops.
    pub fn try_acquire(&self) -> Result<SlotGuard, CushionsError> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| CushionsError::UploadInProgress)?;
        Ok(SlotGuard {
            running: Arc::clone(&self.running),
        })
    }
}

/// Proof of holding the upload slot.
#[derive(Debug)]
pub struct SlotGuard {
    running: Arc<AtomicBool>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
