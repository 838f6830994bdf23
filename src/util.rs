//! Small helpers with no other natural home.

/// Runs `f`, growing the native stack first if less than 1MiB remains.
///
/// Used by [`crate::net::Net::erase`], the one place in this crate that
/// recurses over structure of unbounded depth (a cascading erasure can walk
/// an entire Church-numeral body).
pub fn maybe_grow<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(1024 * 1024, 8 * 1024 * 1024, f)
}
