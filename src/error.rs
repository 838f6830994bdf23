//! Typed fatal conditions for the core.
//!
//! The core never logs. Every fatal condition is returned to the caller as a
//! `CoreError`, paired with the `Stats` snapshot at the point of failure by
//! whichever API surfaced it (`Net::evaluate`, `Net::link`, ...).

use crate::prelude::Loc;
use crate::port::Tag;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid term: tag={tag} target={target} (target must be < 2^56)")]
    InvalidTerm { tag: u8, target: u64 },

    #[error("arena exhausted: requested {requested} words, only {available} remain")]
    ArenaExhausted { requested: usize, available: usize },

    #[error("wiring overflow: link/move chain at loc {loc} exceeded {max_depth} steps")]
    WiringOverflow { loc: Loc, max_depth: u32 },

    #[error("unknown interaction: no rewrite rule for ({neg_tag:?}, {pos_tag:?})")]
    UnknownInteraction { neg_tag: Tag, pos_tag: Tag },
}
