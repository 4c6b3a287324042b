//! A single generic tree descent used to discover every node the
//! planner cares about (function-likes, casts, JSON codec calls) in
//! source order, without having to special-case each statement/
//! expression kind's children convention individually.
//!
//! `NodeArena::children()` only holds a node's *positional* children;
//! some node kinds (function bodies, arrow expression bodies, variable
//! initializers) hang off side tables instead. Descending into
//! `children()` plus those three side tables, uniformly, for every
//! node, reaches everything a statement/expression can contain without
//! per-`NodeKind` bookkeeping.

use tsassert_syntax::{NodeArena, NodeIndex};

pub fn descend<F: FnMut(NodeIndex)>(arena: &NodeArena, idx: NodeIndex, f: &mut F) {
    f(idx);
    for &child in arena.children(idx) {
        descend(arena, child, f);
    }
    if let Some(body) = arena.body_of(idx) {
        descend(arena, body, f);
    }
    if let Some(expr) = arena.arrow_expr_body_of(idx) {
        descend(arena, expr, f);
    }
    if let Some(init) = arena.initializer_of(idx) {
        descend(arena, init, f);
    }
}

#[cfg(test)]
#[path = "tests/walk.rs"]
mod tests;
