// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::sync::atomic::{AtomicUsize, Ordering};

use log::error;

/// Cross-region count of accepted bookings that have not been matched to a
/// driver yet. Only [`increment`](Self::increment) and
/// [`decrement`](Self::decrement) mutate it.
#[derive(Debug, Default)]
pub struct AwaitingDriverCounter {
    count: AtomicUsize,
}

impl AwaitingDriverCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn decrement(&self) {
        let previous = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| c.checked_sub(1));
        if previous.is_err() {
            error!("awaiting-driver counter decremented below zero");
            debug_assert!(false, "awaiting-driver counter underflow");
        }
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_concurrent_increments_and_decrements_balance() {
        let counter = Arc::new(AwaitingDriverCounter::new());
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        counter.increment();
                        counter.decrement();
                    }
                    counter.increment();
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        assert_eq!(counter.get(), 8);
    }
}
