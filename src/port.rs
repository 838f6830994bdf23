//! Term encoding: a port value is one machine word, an 8-bit tag packed with
//! a 56-bit target.

use crate::error::CoreError;
use crate::prelude::Loc;

/// Bit width of the tag field.
pub const TAG_BITS: u32 = 8;
/// Bit width of the target field.
pub const TARGET_BITS: u32 = 56;
/// Mask selecting the low 56 bits.
pub const TARGET_MASK: u64 = (1u64 << TARGET_BITS) - 1;

/// Packs a raw tag byte and target into one word. Total over `tag` (any `u8`
/// fits), fallible over `target`: anything `>= 2^56` is `InvalidTerm`.
#[inline(always)]
pub fn pack_raw(tag: u8, target: u64) -> Result<u64, CoreError> {
    if target > TARGET_MASK {
        return Err(CoreError::InvalidTerm { tag, target });
    }
    Ok(((tag as u64) << TARGET_BITS) | target)
}

/// Unpacks a word into its raw tag byte and target. Total for any word.
#[inline(always)]
pub fn unpack_raw(word: u64) -> (u8, u64) {
    ((word >> TARGET_BITS) as u8, word & TARGET_MASK)
}

/// The eight port tags. Discriminants double as the raw tag byte stored in
/// the high byte of a packed word.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// bound variable occurrence (use site)
    Var = 0,
    /// binder slot (definition site) awaiting a value
    Sub = 1,
    /// trivial value (erased)
    Nul = 2,
    /// erasing context
    Era = 3,
    /// lambda constructor principal port
    Lam = 4,
    /// application principal port
    App = 5,
    /// superposition (dup-pair value) principal port
    Sup = 6,
    /// duplicator principal port
    Dup = 7,
}

/// Polarity of a port: positive ports produce values, negative ports consume
/// them. A well-formed link always joins one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Pos,
    Neg,
}

impl Tag {
    /// Recovers a `Tag` from its raw byte, or `None` if it doesn't name one of
    /// the eight tags. Only ever fails on a corrupted word; every `Ptr` this
    /// crate constructs carries a valid tag by construction.
    #[inline(always)]
    pub fn from_u8(byte: u8) -> Option<Tag> {
        use Tag::*;
        Some(match byte {
            0 => Var,
            1 => Sub,
            2 => Nul,
            3 => Era,
            4 => Lam,
            5 => App,
            6 => Sup,
            7 => Dup,
            _ => return None,
        })
    }

    #[inline(always)]
    pub fn polarity(self) -> Polarity {
        use Tag::*;
        match self {
            Var | Nul | Lam | Sup => Polarity::Pos,
            Sub | Era | App | Dup => Polarity::Neg,
        }
    }

    #[inline(always)]
    pub fn is_pos(self) -> bool {
        self.polarity() == Polarity::Pos
    }

    #[inline(always)]
    pub fn is_neg(self) -> bool {
        self.polarity() == Polarity::Neg
    }
}

/// A packed port value: `(tag, target)` in one word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub struct Ptr(pub u64);

impl std::fmt::Debug for Ptr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self.tag(), self.target())
    }
}

impl Ptr {
    /// Sentinel for a not-yet-wired / erased slot. Its raw bit pattern is 0,
    /// which decodes as `Tag::Var` target 0 — never produced by a real
    /// constructor, since variable ids and arena locations are assigned
    /// starting at 1 in practice, but callers should not rely on that; use
    /// [`Ptr::NULL`] explicitly instead of comparing against tag/target.
    pub const NULL: Ptr = Ptr(0);

    #[inline(always)]
    pub fn pack(tag: Tag, target: Loc) -> Result<Ptr, CoreError> {
        pack_raw(tag as u8, target).map(Ptr)
    }

    /// Infallible pack for callers that already know `target` fits; used
    /// internally once an arena location is known to be in range.
    #[inline(always)]
    pub fn new(tag: Tag, target: Loc) -> Ptr {
        debug_assert!(target <= TARGET_MASK, "target {target} exceeds 56 bits");
        Ptr(((tag as u64) << TARGET_BITS) | (target & TARGET_MASK))
    }

    #[inline(always)]
    pub fn tag(&self) -> Tag {
        let (raw, _) = unpack_raw(self.0);
        Tag::from_u8(raw).expect("Ptr always carries one of the eight well-known tags")
    }

    #[inline(always)]
    pub fn target(&self) -> Loc {
        unpack_raw(self.0).1
    }

    #[inline(always)]
    pub fn is_var(&self) -> bool {
        self.tag() == Tag::Var
    }

    #[inline(always)]
    pub fn is_sub(&self) -> bool {
        self.tag() == Tag::Sub
    }

    #[inline(always)]
    pub fn is_pos(&self) -> bool {
        self.tag().is_pos()
    }

    #[inline(always)]
    pub fn is_neg(&self) -> bool {
        self.tag().is_neg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_round_trip() {
        // Exhaustive over tags (only 0..=255 raw bytes matter structurally),
        // sampled over targets since 2^56 values is infeasible to exhaust.
        for tag in 0u16..=255 {
            let tag = tag as u8;
            for &target in &[0u64, 1, 42, (1 << 56) - 1, 1 << 40, 0xDEAD_BEEF] {
                let word = pack_raw(tag, target).unwrap();
                assert_eq!(unpack_raw(word), (tag, target));
            }
        }
    }

    #[test]
    fn pack_rejects_oversized_target() {
        assert!(matches!(
            pack_raw(0, 1 << 56),
            Err(CoreError::InvalidTerm { target, .. }) if target == 1 << 56
        ));
    }

    #[test]
    fn polarity_matches_spec_table() {
        use Tag::*;
        for t in [Var, Nul, Lam, Sup] {
            assert!(t.is_pos(), "{t:?} should be positive");
        }
        for t in [Sub, Era, App, Dup] {
            assert!(t.is_neg(), "{t:?} should be negative");
        }
    }
}
