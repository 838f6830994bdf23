//! Worker-pool driver: reduces a [`Net`] across several OS threads sharing
//! one arena.
//!
//! Every worker pops from the same `parking_lot::Mutex`-guarded queue behind
//! [`Net::step_one`], and any redex a rewrite produces is pushed straight
//! back onto it. A per-thread local bag with periodic exchange would earn
//! its complexity if workers needed to inline global definitions on demand
//! and wanted to batch that work, but this vocabulary has no such
//! bookkeeping to exchange — a single shared queue is simpler and no less
//! correct.
//!
//! Per-worker [`Stats`] are folded into a shared [`AtomicStats`] only once,
//! when each worker finishes, so the hot loop never contends on an atomic
//! per rewrite.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use crate::error::CoreError;
use crate::net::Net;
use crate::stats::{AtomicStats, Outcome, Stats};

/// Reduces `net` to normal form using `workers` threads (clamped to at
/// least one). Returns the combined statistics, or the first [`CoreError`]
/// any worker hit. A worker that errors stops immediately; siblings run to
/// completion (or their own error) rather than being torn down mid-rewrite,
/// since aborting another thread while it holds no lock but is mid-sequence
/// of `swap`s on a node would leave that node half-rewritten.
pub fn reduce(net: &Net, workers: usize, max_steps: Option<u64>) -> Result<Outcome, CoreError> {
    let workers = workers.max(1);

    let totals = AtomicStats::default();
    let steps_taken = AtomicU64::new(0);
    let hit_limit = AtomicBool::new(false);
    let first_error: Mutex<Option<CoreError>> = Mutex::new(None);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let totals = &totals;
            let steps_taken = &steps_taken;
            let hit_limit = &hit_limit;
            let first_error = &first_error;
            scope.spawn(move || {
                let mut stats = Stats::default();
                loop {
                    if hit_limit.load(Ordering::Relaxed) {
                        break;
                    }
                    if first_error.lock().unwrap().is_some() {
                        break;
                    }
                    match net.step_one(&mut stats) {
                        Ok(false) => break,
                        Ok(true) => {}
                        Err(e) => {
                            let mut slot = first_error.lock().unwrap();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            break;
                        }
                    }
                    if let Some(limit) = max_steps {
                        let seen = steps_taken.fetch_add(1, Ordering::Relaxed) + 1;
                        if seen >= limit {
                            hit_limit.store(true, Ordering::Relaxed);
                            break;
                        }
                    }
                }
                totals.add(&stats);
            });
        }
    });

    if let Some(e) = first_error.into_inner().unwrap() {
        return Err(e);
    }
    let stats = totals.load();
    if hit_limit.load(Ordering::Relaxed) {
        Ok(Outcome::StepLimitReached(stats))
    } else {
        Ok(Outcome::Completed(stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{Ptr, Tag};

    #[test]
    fn reduces_many_independent_pairs_across_workers() {
        let net = Net::new(4096);
        for _ in 0..64 {
            net.link(Ptr::new(Tag::Era, 0), Ptr::new(Tag::Nul, 0)).unwrap();
        }
        let outcome = reduce(&net, 4, None).unwrap();
        assert_eq!(outcome.stats().annihilations, 64);
    }

    #[test]
    fn step_budget_is_respected_across_workers() {
        let net = Net::new(4096);
        for _ in 0..64 {
            net.link(Ptr::new(Tag::Era, 0), Ptr::new(Tag::Nul, 0)).unwrap();
        }
        let outcome = reduce(&net, 4, Some(10)).unwrap();
        // Workers race on the shared step counter, so the exact cutoff can
        // overshoot by a handful of in-flight steps; it must still stop well
        // short of draining all 64 redexes.
        assert!(matches!(outcome, Outcome::StepLimitReached(s) if (1..64).contains(&s.total())));
    }
}
