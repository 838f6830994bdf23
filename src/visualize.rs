//! DOT graph export: a debugging aid, not part of the reduction engine.
//! Walks every port reachable from a root and renders it as a Graphviz
//! digraph, one node per tag-carrying location.

use nohash_hasher::IntSet;

use crate::net::Net;
use crate::port::Tag;
use crate::prelude::Loc;

/// Renders the subgraph reachable from `root` as a DOT digraph, labeling
/// each node by its tag and location. VAR/SUB occurrences are single-word
/// nodes; LAM/APP/DUP/SUP contribute their own node plus edges to both aux
/// ports.
pub fn visualize(net: &Net, root: Loc) -> String {
    let mut out = String::from("digraph net {\n");
    let mut seen: IntSet<Loc> = IntSet::default();
    let mut stack = vec![root];

    while let Some(loc) = stack.pop() {
        if !seen.insert(loc) {
            continue;
        }
        let p = net.get(loc);
        out.push_str(&format!("  n{loc} [label=\"{:?}@{loc}\"];\n", p.tag()));

        match p.tag() {
            Tag::Var => {
                out.push_str(&format!("  n{loc} -> n{} [label=\"fwd\"];\n", p.target()));
                stack.push(p.target());
            }
            // SUB/NUL/ERA are self-contained (ERA in particular is always
            // the singleton `Ptr::new(Tag::Era, 0)`, never a 3-word node of
            // its own), so none of them have aux ports to walk into.
            Tag::Sub | Tag::Nul | Tag::Era => {}
            _ => {
                let base = p.target();
                for i in 1..=2u64 {
                    let aux_loc = base + i;
                    out.push_str(&format!("  n{loc} -> n{aux_loc} [label=\"aux{i}\"];\n"));
                    stack.push(aux_loc);
                }
            }
        }
    }

    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visualizes_a_simple_lambda() {
        let net = Net::new(32);
        let lam = net.create_lam(|net, x| net.create_var(x)).unwrap();
        let dot = visualize(&net, lam);
        assert!(dot.starts_with("digraph net {\n"));
        assert!(dot.contains("Lam"));
        assert!(dot.ends_with("}\n"));
    }
}
