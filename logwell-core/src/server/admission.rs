use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts admitted connections against an optional limit.
#[derive(Debug)]
pub struct AdmissionControl {
    active: AtomicUsize,
    max: Option<usize>,
}

impl AdmissionControl {
    pub fn new(max: Option<usize>) -> Self {
        Self {
            active: AtomicUsize::new(0),
            max,
        }
    }

    /// Attempt to take one connection slot.
    ///
    /// On success the slot is held by the returned guard until it is dropped.
    pub fn try_acquire(self: &Arc<Self>) -> Option<AdmissionGuard> {
        match self.max {
            None => {
                self.active.fetch_add(1, Ordering::Relaxed);
            }
            Some(max) => {
                let mut current = self.active.load(Ordering::Relaxed);
                loop {
                    if current >= max {
                        return None;
                    }
                    match self.active.compare_exchange_weak(
                        current,
                        current + 1,
                        Ordering::Relaxed,
                        Ordering::Relaxed,
                    ) {
                        Ok(_) => break,
                        Err(actual) => current = actual,
                    }
                }
            }
        }

        Some(AdmissionGuard {
            state: Arc::clone(self),
        })
    }

    fn release(&self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }
}

/// One admitted connection. The slot is released exactly once, on drop.
#[derive(Debug)]
pub struct AdmissionGuard {
    state: Arc<AdmissionControl>,
}

impl Drop for AdmissionGuard {
    fn drop(&mut self) {
        self.state.release();
    }
}
