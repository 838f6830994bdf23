//! The net itself: constructors, the `link`/`move` wiring protocol, the
//! rewrite rules, and the single-threaded evaluation loop.
//!
//! [`crate::parallel`] drives the same [`Net`] from multiple worker threads;
//! everything here is written so that sharing is safe (all node access goes
//! through [`Arena`]'s atomic operations), but this module does not itself
//! spawn threads.

use parking_lot::Mutex;

use crate::arena::Arena;
use crate::error::CoreError;
use crate::port::{Ptr, Tag};
use crate::prelude::{Loc, VarId};
use crate::stats::{Outcome, Stats};
use crate::util::maybe_grow;

/// Bound on `link`/`move` trampoline iterations. Exists only to turn a
/// malformed net (a forwarding cycle) into a reported error instead of an
/// infinite loop; well-formed nets never come close to it.
const MAX_WIRING_STEPS: u32 = 1 << 20;

/// An interaction net: a shared node [`Arena`] plus the queue of active
/// pairs (redexes) still waiting to be rewritten.
///
/// Construction (the `create_*` methods) is meant to run single-threaded,
/// before any call to [`Net::evaluate`] or [`crate::parallel::reduce`].
/// Once reduction starts, every mutation goes through `link`/`move`, which
/// are safe to call concurrently.
pub struct Net {
    arena: Arena,
    redexes: Mutex<Vec<(Ptr, Ptr)>>,
}

impl Net {
    pub fn new(capacity_words: usize) -> Net {
        Net { arena: Arena::with_capacity(capacity_words), redexes: Mutex::new(Vec::new()) }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Reads any port. Exposed directly since readback and visualization
    /// both need to walk the net without going through a rewrite rule.
    pub fn get(&self, loc: Loc) -> Ptr {
        self.arena.get(loc)
    }

    /// Reserves `n` raw words for a custom construction, for callers that
    /// need to hand-wire a shape none of the `create_*` helpers cover.
    pub fn alloc(&self, n: usize) -> Result<Loc, CoreError> {
        self.arena.alloc(n)
    }

    pub fn pending_redexes(&self) -> usize {
        self.redexes.lock().len()
    }

    // ---- Constructors ---------------------------------------------------

    /// Builds a standalone one-word VAR occurrence, referencing whatever
    /// SUB-bearing slot lives at `var_id`. `var_id` is always an arena
    /// location here, never a free-floating name — there is no separate
    /// variable-name table to look one up in.
    pub fn create_var(&self, var_id: VarId) -> Result<Loc, CoreError> {
        let loc = self.arena.alloc(1)?;
        self.arena.set(loc, Ptr::new(Tag::Var, var_id));
        Ok(loc)
    }

    /// Builds a standalone one-word SUB slot. `var_id` only labels the slot
    /// (for display/debugging); the rewrite rules never read it back, they
    /// only test the tag.
    pub fn create_sub(&self, var_id: VarId) -> Result<Loc, CoreError> {
        let loc = self.arena.alloc(1)?;
        self.arena.set(loc, Ptr::new(Tag::Sub, var_id));
        Ok(loc)
    }

    /// Builds a LAM node. The binder's variable id is only known once the
    /// node itself is allocated (it's the node's own `L+1`), so the body is
    /// built by a callback that receives it — this is how a body referring
    /// to its own binder (e.g. the identity function) gets wired without a
    /// forward reference. A flat `create_lam(var_id, body_loc)` signature
    /// would need the binder's location before the node exists to give it
    /// one, which is exactly backwards.
    pub fn create_lam(
        &self,
        build_body: impl FnOnce(&Net, VarId) -> Result<Loc, CoreError>,
    ) -> Result<Loc, CoreError> {
        let base = self.arena.alloc(3)?;
        self.arena.set(base, Ptr::new(Tag::Lam, base));
        self.arena.set(base + 1, Ptr::new(Tag::Sub, base + 1));
        let body_loc = build_body(self, base + 1)?;
        self.arena.set(base + 2, Ptr::new(Tag::Var, body_loc));
        Ok(base)
    }

    /// Builds an APP node applying `arg`, the argument's own principal-port
    /// value (not a location to wrap in another VAR hop: `arg` is stored
    /// verbatim, since this slot is only ever consumed once, directly, by
    /// `applam`'s own swap). The return slot is the node's own `L+2`;
    /// callers read the result from `base + 2` once reduction routes a body
    /// into it.
    pub fn create_app(&self, arg: Ptr) -> Result<Loc, CoreError> {
        let base = self.arena.alloc(3)?;
        self.arena.set(base, Ptr::new(Tag::App, base));
        self.arena.set(base + 1, arg);
        self.arena.set(base + 2, Ptr::new(Tag::Sub, base + 2));
        Ok(base)
    }

    /// Builds a DUP node with two fresh output slots, returned alongside
    /// its own location so callers can wire occurrence sites to them
    /// before the original (single) occurrence is redirected to the DUP's
    /// principal port.
    pub fn create_dup(&self) -> Result<(Loc, VarId, VarId), CoreError> {
        let base = self.arena.alloc(3)?;
        self.arena.set(base, Ptr::new(Tag::Dup, base));
        self.arena.set(base + 1, Ptr::new(Tag::Sub, base + 1));
        self.arena.set(base + 2, Ptr::new(Tag::Sub, base + 2));
        Ok((base, base + 1, base + 2))
    }

    /// Builds a SUP node superposing the values already built at `val1_loc`
    /// and `val2_loc`.
    pub fn create_sup(&self, val1_loc: Loc, val2_loc: Loc) -> Result<Loc, CoreError> {
        let base = self.arena.alloc(3)?;
        self.arena.set(base, Ptr::new(Tag::Sup, base));
        self.arena.set(base + 1, Ptr::new(Tag::Var, val1_loc));
        self.arena.set(base + 2, Ptr::new(Tag::Var, val2_loc));
        Ok(base)
    }

    // ---- Wiring protocol --------------------------------------------------

    /// Installs `pos` into the negative slot at `loc`. See the module-level
    /// note on [`Net::wire`] for the trampoline.
    pub fn move_(&self, loc: Loc, pos: Ptr) -> Result<(), CoreError> {
        self.wire(Step::Move(loc, pos))
    }

    /// Wires a negative port `neg` to a positive term `pos`, resolving any
    /// VAR forwarding chain and enqueueing a redex once both sides are
    /// principal.
    pub fn link(&self, neg: Ptr, pos: Ptr) -> Result<(), CoreError> {
        self.wire(Step::Link(neg, pos))
    }

    /// Single iterative loop alternating `move`/`link`. Written this way
    /// instead of as mutually recursive functions so a long forwarding
    /// chain never grows the call stack. Bounded by [`MAX_WIRING_STEPS`];
    /// exceeding it means the net contains a forwarding cycle.
    fn wire(&self, start: Step) -> Result<(), CoreError> {
        let mut step = start;
        let mut last_loc = 0;
        for _ in 0..MAX_WIRING_STEPS {
            step = match step {
                Step::Move(loc, pos) => {
                    last_loc = loc;
                    let prev = self.arena.swap(loc, pos);
                    if prev.tag() == Tag::Sub {
                        return Ok(());
                    }
                    Step::Link(prev, pos)
                }
                Step::Link(neg, pos) => {
                    if pos.tag() == Tag::Var {
                        let s = pos.target();
                        last_loc = s;
                        let prev = self.arena.swap(s, neg);
                        if prev.tag() == Tag::Sub {
                            return Ok(());
                        }
                        Step::Move(s, prev)
                    } else {
                        self.redexes.lock().push((neg, pos));
                        return Ok(());
                    }
                }
            };
        }
        Err(CoreError::WiringOverflow { loc: last_loc, max_depth: MAX_WIRING_STEPS })
    }

    // ---- Rewrite rules ----------------------------------------------------

    fn interact(&self, neg: Ptr, pos: Ptr, stats: &mut Stats) -> Result<(), CoreError> {
        use Tag::*;
        match (neg.tag(), pos.tag()) {
            (App, Lam) => self.applam(neg.target(), pos.target(), stats),
            (Dup, Lam) => self.duplam(neg.target(), pos.target(), stats),
            (Era, Lam) => self.eralam(neg.target(), pos.target(), stats),
            (Era, Sup) => self.erasup(neg.target(), pos.target(), stats),
            (Era, Nul) => {
                stats.annihilations += 1;
                Ok(())
            }
            (Dup, Sup) => self.annihilate_dup_sup(neg.target(), pos.target(), stats),
            (neg_tag, pos_tag) => Err(CoreError::UnknownInteraction { neg_tag, pos_tag }),
        }
    }

    /// APP ⋈ LAM: beta reduction.
    fn applam(&self, app_loc: Loc, lam_loc: Loc, stats: &mut Stats) -> Result<(), CoreError> {
        let arg = self.arena.swap(app_loc + 1, Ptr::NULL);
        let body = self.arena.swap(lam_loc + 2, Ptr::NULL);
        self.move_(lam_loc + 1, arg)?;
        self.move_(app_loc + 2, body)?;
        stats.beta_reductions += 1;
        Ok(())
    }

    /// DUP ⋈ LAM: duplicate a lambda. Builds two fresh lambda copies and
    /// two fresh duplicators threading the shared binder and body through
    /// a superposition.
    fn duplam(&self, dup_loc: Loc, lam_loc: Loc, stats: &mut Stats) -> Result<(), CoreError> {
        let c1 = self.arena.alloc(3)?;
        let c2 = self.arena.alloc(3)?;
        let d1 = self.arena.alloc(3)?;
        let d2 = self.arena.alloc(3)?;

        self.arena.set(d1, Ptr::new(Tag::Dup, d1));
        self.arena.set(d1 + 1, Ptr::new(Tag::Var, c1 + 1));
        self.arena.set(d1 + 2, Ptr::new(Tag::Var, c2 + 1));

        self.arena.set(d2, Ptr::new(Tag::Dup, d2));
        self.arena.set(d2 + 1, Ptr::new(Tag::Var, c1 + 2));
        self.arena.set(d2 + 2, Ptr::new(Tag::Var, c2 + 2));

        self.arena.set(c1, Ptr::new(Tag::Lam, c1));
        self.arena.set(c1 + 1, Ptr::new(Tag::Sub, c1 + 1));
        self.arena.set(c1 + 2, Ptr::new(Tag::Sub, c1 + 2));

        self.arena.set(c2, Ptr::new(Tag::Lam, c2));
        self.arena.set(c2 + 1, Ptr::new(Tag::Sub, c2 + 1));
        self.arena.set(c2 + 2, Ptr::new(Tag::Sub, c2 + 2));

        let sup = self.arena.alloc(3)?;
        self.arena.set(sup, Ptr::new(Tag::Sup, sup));
        self.arena.set(sup + 1, Ptr::new(Tag::Var, d1 + 1));
        self.arena.set(sup + 2, Ptr::new(Tag::Var, d1 + 2));
        // Install the SUP's own value (not a further VAR indirection around
        // it): the binder slot we're replacing may already be occupied by a
        // waiting consumer, and only a raw principal-port value lets that
        // consumer's forwarding-chain resolution terminate correctly.
        self.move_(lam_loc + 1, Ptr::new(Tag::Sup, sup))?;

        let original_body = self.arena.swap(lam_loc + 2, Ptr::NULL);
        self.link(Ptr::new(Tag::Dup, d2), original_body)?;

        self.move_(dup_loc + 1, Ptr::new(Tag::Lam, c1))?;
        self.move_(dup_loc + 2, Ptr::new(Tag::Lam, c2))?;

        stats.duplications += 1;
        Ok(())
    }

    /// ERA ⋈ LAM: erase a lambda, cascading into its body.
    fn eralam(&self, _era_loc: Loc, lam_loc: Loc, stats: &mut Stats) -> Result<(), CoreError> {
        self.move_(lam_loc + 1, Ptr::new(Tag::Nul, 0))?;
        let body = self.arena.swap(lam_loc + 2, Ptr::NULL);
        self.erase(body)?;
        stats.erasures += 1;
        Ok(())
    }

    /// ERA ⋈ SUP: erase a superposition, cascading into both components.
    fn erasup(&self, _era_loc: Loc, sup_loc: Loc, stats: &mut Stats) -> Result<(), CoreError> {
        let v1 = self.arena.swap(sup_loc + 1, Ptr::NULL);
        let v2 = self.arena.swap(sup_loc + 2, Ptr::NULL);
        self.erase(v1)?;
        self.erase(v2)?;
        stats.erasures += 1;
        Ok(())
    }

    /// DUP ⋈ SUP: annihilation. Forwards each superposed value straight to
    /// the matching duplicator output, same wiring shape as two identical
    /// constructors annihilating.
    fn annihilate_dup_sup(&self, dup_loc: Loc, sup_loc: Loc, stats: &mut Stats) -> Result<(), CoreError> {
        let v1 = self.arena.swap(sup_loc + 1, Ptr::NULL);
        let v2 = self.arena.swap(sup_loc + 2, Ptr::NULL);
        self.move_(dup_loc + 1, v1)?;
        self.move_(dup_loc + 2, v2)?;
        stats.annihilations += 1;
        Ok(())
    }

    /// Recursively tears down the subgraph rooted at `term`. Runs under
    /// [`maybe_grow`] at every descent since a cascading erasure can walk
    /// an arbitrarily deep structure (a large Church numeral's body).
    pub fn erase(&self, term: Ptr) -> Result<(), CoreError> {
        if matches!(term.tag(), Tag::Var | Tag::Sub) {
            return Ok(());
        }
        let loc = term.target();
        let a = self.arena.swap(loc + 1, Ptr::NULL);
        let b = self.arena.swap(loc + 2, Ptr::NULL);
        maybe_grow(|| self.erase(a))?;
        maybe_grow(|| self.erase(b))
    }

    // ---- Evaluation ---------------------------------------------------

    /// Pops and processes one redex, recording its effect in `stats`.
    /// Returns `false` once the queue is empty. The shared entry point both
    /// [`Net::evaluate`] and [`crate::parallel::reduce`] drive; each worker
    /// in the parallel driver just calls this in a loop over the same
    /// `Mutex`-guarded queue.
    pub fn step_one(&self, stats: &mut Stats) -> Result<bool, CoreError> {
        let redex = self.redexes.lock().pop();
        match redex {
            None => Ok(false),
            Some((neg, pos)) => {
                self.interact(neg, pos, stats)?;
                Ok(true)
            }
        }
    }

    /// Drains the redex queue until empty, with no step budget.
    pub fn evaluate(&self) -> Result<Outcome, CoreError> {
        self.evaluate_with_limit(None)
    }

    /// Drains the redex queue, halting early with [`Outcome::StepLimitReached`]
    /// once the sum of the statistics counters reaches `max_steps`.
    pub fn evaluate_with_limit(&self, max_steps: Option<u64>) -> Result<Outcome, CoreError> {
        let mut stats = Stats::default();
        loop {
            if !self.step_one(&mut stats)? {
                return Ok(Outcome::Completed(stats));
            }
            if let Some(limit) = max_steps {
                if stats.total() >= limit {
                    return Ok(Outcome::StepLimitReached(stats));
                }
            }
        }
    }
}

enum Step {
    Move(Loc, Ptr),
    Link(Ptr, Ptr),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applam_routes_argument_and_body() {
        let net = Net::new(64);
        let arg = net.create_var(999).unwrap();
        let lam = net.create_lam(|n, x| n.create_var(x)).unwrap();
        let app = net.create_app(net.get(arg)).unwrap();

        net.link(Ptr::new(Tag::App, app), Ptr::new(Tag::Lam, lam)).unwrap();
        let outcome = net.evaluate().unwrap();

        assert_eq!(outcome.stats().beta_reductions, 1);
        // identity applied to arg: the app's return slot now forwards to
        // the var node built for arg, since the body was exactly `x`.
        let routed = net.get(app + 2);
        assert!(routed.is_var());
    }

    #[test]
    fn era_nul_annihilates_with_no_structural_change() {
        let net = Net::new(16);
        net.link(Ptr::new(Tag::Era, 0), Ptr::new(Tag::Nul, 0)).unwrap();
        let outcome = net.evaluate().unwrap();
        assert_eq!(outcome.stats().annihilations, 1);
    }

    #[test]
    fn unknown_interaction_is_reported() {
        let net = Net::new(64);
        let arg = net.create_var(1).unwrap();
        let app = net.create_app(net.get(arg)).unwrap();
        let sup = net.create_sup(arg, arg).unwrap();
        net.link(Ptr::new(Tag::App, app), Ptr::new(Tag::Sup, sup)).unwrap();
        let err = net.evaluate().unwrap_err();
        assert!(matches!(err, CoreError::UnknownInteraction { .. }));
    }

    #[test]
    fn step_limit_halts_cleanly() {
        let net = Net::new(64);
        net.link(Ptr::new(Tag::Era, 0), Ptr::new(Tag::Nul, 0)).unwrap();
        let outcome = net.evaluate_with_limit(Some(0)).unwrap();
        assert!(matches!(outcome, Outcome::StepLimitReached(_)));
    }
}
