//! Worked examples built directly against the constructor contract in
//! [`icomb::net`], not against some higher-level surface syntax (this crate
//! has none). Each scenario hand-wires a small net, reduces it, and reads
//! the normal form back.
//!
//! Two points these examples lean on:
//!
//! - A variable used more than once must be threaded through an explicit
//!   DUP node (see `church_double`, `duplication_of_identity`); a variable
//!   used zero times must be explicitly paired with ERA (see
//!   `church_select`) — linearity is not checked for you.
//! - `apply` always VAR-wraps both sides rather than reading an
//!   already-built value out with `Net::get`. Either is correct, since the
//!   `link`/`move` trampoline converges the same way regardless, but
//!   VAR-wrapping also works when the function or argument is itself still
//!   a pending result of an earlier application that hasn't reduced yet,
//!   which several scenarios below rely on.

use icomb::{read_back, CoreError, Loc, Net, Outcome, Ptr, Tag, Value};

fn apply(net: &Net, func_loc: Loc, arg_loc: Loc) -> Result<Loc, CoreError> {
    let app = net.create_app(Ptr::new(Tag::Var, arg_loc))?;
    net.link(Ptr::new(Tag::App, app), Ptr::new(Tag::Var, func_loc))?;
    Ok(app + 2)
}

/// `λf.λx. f (f (... (f x)))`, `n` applications deep.
fn church_numeral(net: &Net, n: u64) -> Result<Loc, CoreError> {
    net.create_lam(|net, f| {
        net.create_lam(|net, x| {
            let mut prev = net.create_var(x)?;
            for _ in 0..n {
                let app = net.alloc(3)?;
                net.arena().set(app, Ptr::new(Tag::App, app));
                net.arena().set(app + 1, Ptr::new(Tag::Var, f));
                net.arena().set(app + 2, Ptr::new(Tag::Var, prev));
                prev = app;
            }
            Ok(prev)
        })
    })
}

/// `λx.λy. x` (keep_first) or `λx.λy. y`. The unused binder is paired
/// directly with ERA: the graph would otherwise have a binder with no
/// occurrence, which interaction combinators don't allow.
fn church_select(net: &Net, keep_first: bool) -> Result<Loc, CoreError> {
    net.create_lam(|net, x| {
        net.create_lam(|net, y| {
            if keep_first {
                net.arena().set(y, Ptr::new(Tag::Era, 0));
                net.create_var(x)
            } else {
                net.arena().set(x, Ptr::new(Tag::Era, 0));
                net.create_var(y)
            }
        })
    })
}

/// `λn.λf.λx. n f (n f x)`: doubles a Church numeral. `n` occurs twice, so
/// its binder is routed through an explicit DUP instead of the default
/// single-occurrence SUB.
fn church_double(net: &Net) -> Result<Loc, CoreError> {
    net.create_lam(|net, n| {
        let (dup_loc, n1, n2) = net.create_dup()?;
        net.arena().set(n, Ptr::new(Tag::Dup, dup_loc));

        net.create_lam(|net, f| {
            net.create_lam(|net, x| {
                let inner = net.create_app(Ptr::new(Tag::Var, f))?;
                net.link(Ptr::new(Tag::App, inner), Ptr::new(Tag::Var, n2))?;
                let inner_x = net.create_app(Ptr::new(Tag::Var, x))?;
                net.link(Ptr::new(Tag::App, inner_x), Ptr::new(Tag::Var, inner + 2))?;

                let outer = net.create_app(Ptr::new(Tag::Var, f))?;
                net.link(Ptr::new(Tag::App, outer), Ptr::new(Tag::Var, n1))?;
                let outer_x = net.create_app(Ptr::new(Tag::Var, inner_x + 2))?;
                net.link(Ptr::new(Tag::App, outer_x), Ptr::new(Tag::Var, outer + 2))?;

                Ok(outer_x + 2)
            })
        })
    })
}

/// `λm.λn.λf. m (n f)`: Church multiplication. `m` and `n` each occur
/// exactly once, so no duplication is needed here.
fn church_times(net: &Net) -> Result<Loc, CoreError> {
    net.create_lam(|net, m| {
        net.create_lam(|net, n| {
            net.create_lam(|net, f| {
                let nf = net.create_app(Ptr::new(Tag::Var, f))?;
                net.link(Ptr::new(Tag::App, nf), Ptr::new(Tag::Var, n))?;
                let mnf = net.create_app(Ptr::new(Tag::Var, nf + 2))?;
                net.link(Ptr::new(Tag::App, mnf), Ptr::new(Tag::Var, m))?;
                Ok(mnf + 2)
            })
        })
    })
}

/// Follows VAR forwarding from `loc` far enough to report the tag a
/// non-numeral, non-boolean result settled on (used only by the
/// duplication scenario below, whose result is a bare atom rather than a
/// two-lambda Church value that `read_back` understands).
fn resolve_tag(net: &Net, loc: Loc) -> Ptr {
    let mut p = net.get(loc);
    for _ in 0..64 {
        if p.tag() != Tag::Var {
            return p;
        }
        p = net.get(p.target());
    }
    p
}

fn report(name: &str, value: Value, outcome: Outcome) {
    let s = outcome.stats();
    println!(
        "{name:24} -> {value:?}  (beta={} dup={} era={} ann={})",
        s.beta_reductions, s.duplications, s.erasures, s.annihilations
    );
}

fn identity() -> Result<(), CoreError> {
    let net = Net::new(1024);
    let id = net.create_lam(|net, x| net.create_var(x))?;
    let three = church_numeral(&net, 3)?;
    let result = apply(&net, id, three)?;
    let outcome = net.evaluate()?;
    report("identity", read_back(&net, result), outcome);
    Ok(())
}

fn double_three() -> Result<(), CoreError> {
    let net = Net::new(1024);
    let double = church_double(&net)?;
    let three = church_numeral(&net, 3)?;
    let result = apply(&net, double, three)?;
    let outcome = net.evaluate()?;
    report("double-three", read_back(&net, result), outcome);
    Ok(())
}

fn four_times_three() -> Result<(), CoreError> {
    let net = Net::new(1024);
    let times = church_times(&net)?;
    let four = church_numeral(&net, 4)?;
    let three = church_numeral(&net, 3)?;
    let partial = apply(&net, times, four)?;
    let result = apply(&net, partial, three)?;
    let outcome = net.evaluate()?;
    report("four-times-three", read_back(&net, result), outcome);
    Ok(())
}

/// Applies the K-combinator (Church `true`) to a kept value and a large,
/// immediately-discarded one, to show the discarded argument's whole
/// subgraph gets torn down through `eralam`/`erase` rather than just
/// leaked.
fn k_combinator_erasure() -> Result<(), CoreError> {
    let net = Net::new(8192);
    let k = church_select(&net, true)?;
    let kept = church_numeral(&net, 1)?;
    let discarded = church_numeral(&net, 50)?;
    let partial = apply(&net, k, kept)?;
    let result = apply(&net, partial, discarded)?;
    let outcome = net.evaluate()?;
    report("k-combinator-erasure", read_back(&net, result), outcome);
    Ok(())
}

/// `(λf. f (f z)) (λx.x)`: `f` occurs twice in the body, so it's threaded
/// through a DUP; each occurrence ends up applying its own copy of the
/// identity function to `z`.
fn duplication() -> Result<(), CoreError> {
    let net = Net::new(1024);
    let z = net.alloc(1)?;
    net.arena().set(z, Ptr::new(Tag::Nul, 0));

    let (dup_loc, f1, f2) = net.create_dup()?;

    let inner_app = net.create_app(Ptr::new(Tag::Var, z))?;
    net.link(Ptr::new(Tag::App, inner_app), Ptr::new(Tag::Var, f2))?;
    let outer_app = net.create_app(Ptr::new(Tag::Var, inner_app + 2))?;
    net.link(Ptr::new(Tag::App, outer_app), Ptr::new(Tag::Var, f1))?;

    let lam_f = net.create_lam(|net, x| {
        net.arena().set(x, Ptr::new(Tag::Dup, dup_loc));
        Ok(outer_app)
    })?;
    let identity = net.create_lam(|net, y| net.create_var(y))?;
    let result = apply(&net, lam_f, identity)?;

    let outcome = net.evaluate()?;
    let settled = resolve_tag(&net, result);
    let s = outcome.stats();
    println!(
        "{:24} -> {settled:?}  (beta={} dup={} era={} ann={})",
        "duplication", s.beta_reductions, s.duplications, s.erasures, s.annihilations
    );
    Ok(())
}

fn if_true() -> Result<(), CoreError> {
    let net = Net::new(1024);
    let cond = church_select(&net, true)?;
    let then_branch = church_numeral(&net, 7)?;
    let else_branch = church_numeral(&net, 3)?;
    let partial = apply(&net, cond, then_branch)?;
    let result = apply(&net, partial, else_branch)?;
    let outcome = net.evaluate()?;
    report("if-true", read_back(&net, result), outcome);
    Ok(())
}

fn main() -> Result<(), CoreError> {
    identity()?;
    double_three()?;
    four_times_three()?;
    k_combinator_erasure()?;
    duplication()?;
    if_true()?;
    Ok(())
}
