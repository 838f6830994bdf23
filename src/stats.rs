//! Rewrite statistics: the four monotone counters that are the sole
//! required trace of a reduction.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-worker (or single-threaded) rewrite counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub beta_reductions: u64,
    pub duplications: u64,
    pub erasures: u64,
    pub annihilations: u64,
}

impl Stats {
    pub fn total(&self) -> u64 {
        self.beta_reductions + self.duplications + self.erasures + self.annihilations
    }

    pub fn merge(&mut self, other: &Stats) {
        self.beta_reductions += other.beta_reductions;
        self.duplications += other.duplications;
        self.erasures += other.erasures;
        self.annihilations += other.annihilations;
    }
}

/// Shared atomic counters, used to merge per-worker [`Stats`] at join points
/// without a lock: each worker accumulates into its own plain [`Stats`] and
/// folds it in once, on exit, rather than contending on atomics per step.
#[derive(Default)]
pub struct AtomicStats {
    pub beta_reductions: AtomicU64,
    pub duplications: AtomicU64,
    pub erasures: AtomicU64,
    pub annihilations: AtomicU64,
}

impl AtomicStats {
    pub fn add(&self, stats: &Stats) {
        self.beta_reductions.fetch_add(stats.beta_reductions, Ordering::Relaxed);
        self.duplications.fetch_add(stats.duplications, Ordering::Relaxed);
        self.erasures.fetch_add(stats.erasures, Ordering::Relaxed);
        self.annihilations.fetch_add(stats.annihilations, Ordering::Relaxed);
    }

    pub fn load(&self) -> Stats {
        Stats {
            beta_reductions: self.beta_reductions.load(Ordering::Relaxed),
            duplications: self.duplications.load(Ordering::Relaxed),
            erasures: self.erasures.load(Ordering::Relaxed),
            annihilations: self.annihilations.load(Ordering::Relaxed),
        }
    }
}

/// The result of draining the redex queue: either it ran dry (`Completed`) or
/// a step budget cut it short (`StepLimitReached`). Neither is an error —
/// `StepLimitReached` is a clean halt with a partial, still-valid net.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed(Stats),
    StepLimitReached(Stats),
}

impl Outcome {
    pub fn stats(&self) -> Stats {
        match self {
            Outcome::Completed(s) | Outcome::StepLimitReached(s) => *s,
        }
    }
}
