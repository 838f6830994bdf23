//! Structural properties that must hold regardless of which scenario
//! produced the net: the redex queue always drains, reduction gives the
//! same answer no matter how many workers share the work, and an erased
//! subgraph's slots are actually cleared rather than left dangling.

use icomb::{parallel, read_back, CoreError, Loc, Net, Ptr, Tag, Value};

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

fn apply(net: &Net, func_loc: Loc, arg_loc: Loc) -> Result<Loc, CoreError> {
    let app = net.create_app(Ptr::new(Tag::Var, arg_loc))?;
    net.link(Ptr::new(Tag::App, app), Ptr::new(Tag::Var, func_loc))?;
    Ok(app + 2)
}

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

/// Builds `identity applied to numeral(n)`, once per `n` in `ns`, as a set
/// of independent active pairs in the same net.
fn build_independent_applications(net: &Net, ns: &[u64]) -> Vec<Loc> {
    ns.iter()
        .map(|&n| {
            let id = net.create_lam(|net, x| net.create_var(x)).unwrap();
            let numeral = church_numeral(net, n).unwrap();
            apply(net, id, numeral).unwrap()
        })
        .collect()
}

#[test]
fn redex_queue_always_drains() {
    let net = Net::new(4096);
    for _ in 0..100 {
        net.link(Ptr::new(Tag::Era, 0), Ptr::new(Tag::Nul, 0)).unwrap();
    }
    let outcome = net.evaluate().unwrap();
    assert_eq!(outcome.stats().annihilations, 100);
    assert_eq!(net.pending_redexes(), 0);
}

#[test]
fn reduction_is_confluent_across_worker_counts() {
    let ns: Vec<u64> = (0..20).collect();

    let single = Net::new(65536);
    build_independent_applications(&single, &ns);
    let single_outcome = parallel::reduce(&single, 1, None).unwrap();

    let parallel_net = Net::new(65536);
    build_independent_applications(&parallel_net, &ns);
    let parallel_outcome = parallel::reduce(&parallel_net, 8, None).unwrap();

    assert_eq!(single_outcome.stats(), parallel_outcome.stats());
}

/// Builds `double` applied to `numeral(n)`, once per `n` in `ns`, pushing
/// the initial active pairs onto the net's redex queue in the order given.
/// Doubling goes through `duplam`, which itself spawns fresh redexes mid-
/// reduction, so the n independent computations end up with their
/// sub-redexes genuinely interleaved on the shared queue rather than simply
/// processed one whole computation at a time.
fn build_doublings(net: &Net, ns: &[u64]) -> Vec<(u64, Loc)> {
    ns.iter()
        .map(|&n| {
            let double = church_double(net).unwrap();
            let numeral = church_numeral(net, n).unwrap();
            (n, apply(net, double, numeral).unwrap())
        })
        .collect()
}

#[test]
fn numeral_readback_is_invariant_under_redex_push_order() {
    let ns: Vec<u64> = (0..12).collect();
    let mut reversed = ns.clone();
    reversed.reverse();

    let forward_net = Net::new(1 << 20);
    let forward_results = build_doublings(&forward_net, &ns);
    forward_net.evaluate().unwrap();

    let reversed_net = Net::new(1 << 20);
    let reversed_results = build_doublings(&reversed_net, &reversed);
    reversed_net.evaluate().unwrap();

    for &(n, loc) in &forward_results {
        assert_eq!(read_back(&forward_net, loc), Value::Number(2 * n));
    }
    for &(n, loc) in &reversed_results {
        assert_eq!(read_back(&reversed_net, loc), Value::Number(2 * n));
    }
}

#[test]
fn erased_subgraph_slots_are_cleared() {
    let net = Net::new(1024);
    let numeral = church_numeral(&net, 5).unwrap();
    let numeral_val = net.get(numeral);

    net.link(Ptr::new(Tag::Era, 0), numeral_val).unwrap();
    net.evaluate().unwrap();

    // `eralam` replaces the (unused, single-occurrence) binder with a bare
    // NUL and clears the body slot outright once its own subtree is torn
    // down — neither should still reference the erased numeral's structure.
    let base = numeral_val.target();
    assert_eq!(net.get(base + 1), Ptr::new(Tag::Nul, 0));
    assert_eq!(net.get(base + 2), Ptr::NULL);
}
