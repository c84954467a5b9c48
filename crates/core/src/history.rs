//! Queue version counter.
//!
//! Every successful submission bumps the shared [`QueueVersion`]. Job list
//! readers compare it with the version they last loaded and reload only when
//! it differs. There is no polling.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter incremented after each successful submission.
#[derive(Debug, Default)]
pub struct QueueVersion(AtomicU64);

impl QueueVersion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal that the queue changed. Returns the new version.
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn version_bumps_monotonically() {
        let version = QueueVersion::new();
        assert_eq!(version.get(), 0);
        assert_eq!(version.bump(), 1);
        assert_eq!(version.bump(), 2);
        assert_eq!(version.get(), 2);
    }

    #[test]
    fn concurrent_bumps_are_not_lost() {
        let version = Arc::new(QueueVersion::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let version = Arc::clone(&version);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        version.bump();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(version.get(), 800);
    }
}
