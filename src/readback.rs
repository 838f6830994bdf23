//! Readback: recovering a Church numeral, a Church boolean, or an opaque
//! function from a fully reduced term, by walking its shape rather than
//! re-entering the reducer with synthetic arguments. This vocabulary has no
//! native-hook tag a reduced term could call back into, so shape inspection
//! is the only way to get a host-level value back out.

use crate::net::Net;
use crate::port::{Ptr, Tag};
use crate::prelude::Loc;

/// The result of reading back a normal-form term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Number(u64),
    Boolean(bool),
    /// Neither shape matched; the term is some other function value.
    Function,
}

/// Follows a chain of VAR forwarding pointers starting at `loc`, stopping at
/// the first non-VAR port. Bounded, since a dangling or cyclic forward
/// (a malformed net) must not hang readback.
fn deref(net: &Net, loc: Loc) -> Ptr {
    let mut p = net.get(loc);
    for _ in 0..64 {
        if p.tag() != Tag::Var {
            return p;
        }
        p = net.get(p.target());
    }
    p
}

/// What a port, once any forwarding is resolved, turns out to be relative to
/// the two binders `f_id`/`x_id` currently in scope.
enum Shape {
    F,
    X,
    App(Loc),
    Other,
}

fn classify(net: &Net, start: Ptr, f_id: Loc, x_id: Loc) -> Shape {
    let mut cur = start;
    for _ in 0..64 {
        match cur.tag() {
            Tag::Var => {
                let t = cur.target();
                if t == f_id {
                    return Shape::F;
                }
                if t == x_id {
                    return Shape::X;
                }
                cur = net.get(t);
            }
            Tag::App => return Shape::App(cur.target()),
            _ => return Shape::Other,
        }
    }
    Shape::Other
}

/// Reads back the term rooted at `loc`. Conservative: any deviation from the
/// two expected Church shapes falls back to [`Value::Function`].
pub fn read_back(net: &Net, loc: Loc) -> Value {
    let outer = deref(net, loc);
    if outer.tag() != Tag::Lam {
        return Value::Function;
    }
    let outer_base = outer.target();
    let f_id = outer_base + 1;

    let inner = deref(net, outer_base + 2);
    if inner.tag() != Tag::Lam {
        return Value::Function;
    }
    let inner_base = inner.target();
    let x_id = inner_base + 1;

    let body = net.get(inner_base + 2);
    match classify(net, body, f_id, x_id) {
        Shape::F => Value::Boolean(true),
        Shape::X => Value::Boolean(false),
        Shape::App(first) => walk_numeral_chain(net, first, f_id, x_id),
        Shape::Other => Value::Function,
    }
}

fn walk_numeral_chain(net: &Net, first_app: Loc, f_id: Loc, x_id: Loc) -> Value {
    let mut app_base = first_app;
    let mut n: u64 = 0;
    loop {
        let func = net.get(app_base + 1);
        if !matches!(classify(net, func, f_id, x_id), Shape::F) {
            return Value::Function;
        }
        n += 1;

        let next = net.get(app_base + 2);
        match classify(net, next, f_id, x_id) {
            Shape::X => return Value::Number(n),
            Shape::App(b) => app_base = b,
            _ => return Value::Function,
        }
    }
}
