//! An interaction-combinator runtime: a packed-word term encoding, a shared
//! node arena, the `link`/`move` wiring protocol, and the rewrite rules that
//! reduce a net to normal form — single-threaded or across a worker pool.
//!
//! See `demos/church.rs` for worked examples built directly against the
//! constructor contract in [`net`].

pub mod arena;
pub mod error;
pub mod net;
pub mod parallel;
pub mod port;
pub mod prelude;
pub mod readback;
pub mod stats;
pub mod util;
pub mod visualize;

pub use crate::error::CoreError;
pub use crate::net::Net;
pub use crate::port::{Polarity, Ptr, Tag};
pub use crate::prelude::{Loc, VarId};
pub use crate::readback::{read_back, Value};
pub use crate::stats::{AtomicStats, Outcome, Stats};
