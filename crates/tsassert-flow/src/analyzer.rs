//! The forward intra-procedural dataflow walk (§4.3 paragraph 2):
//! function bodies are walked once, threading an environment of
//! binding -> [`Fact`] through statements, joining at `if`/`else`
//! merges. Cross-file and cross-function callees are treated
//! conservatively: an opaque call's return value is `Dirty`, and
//! passing a binding into one escapes it unless the callee is a
//! recognized JSON codec.

use rustc_hash::FxHashMap;
use tsassert_syntax::{NodeArena, NodeIndex, NodeKind};

use crate::lattice::Fact;

type Env = FxHashMap<String, Fact>;

/// Result of analyzing one function body: a fact for each `return`
/// expression's node (the expression node itself, for `SitePlanner` to
/// key its Return site on), in source order.
#[derive(Debug, Default)]
pub struct FunctionAnalysis {
    pub returns: Vec<(NodeIndex, Fact)>,
}

pub struct EscapeAnalyzer<'a> {
    arena: &'a NodeArena,
}

impl<'a> EscapeAnalyzer<'a> {
    #[must_use]
    pub fn new(arena: &'a NodeArena) -> Self {
        Self { arena }
    }

    /// Analyzes one function-like node (`FunctionDeclaration` or
    /// `ArrowFunctionExpression`). Parameters seed the environment as
    /// `Dirty` - the analyzer itself never decides whether a parameter
    /// may SKIP (that depends on the whole call graph); it only tracks
    /// what happens to each binding once inside the body.
    #[must_use]
    pub fn analyze_function(&self, fn_idx: NodeIndex) -> FunctionAnalysis {
        let mut env: Env = FxHashMap::default();
        for &param in self.arena.params_of(fn_idx) {
            if let Some(name) = self.arena.name(param) {
                env.insert(name.to_string(), Fact::Dirty);
            }
        }

        let mut returns = Vec::new();
        if let Some(body) = self.arena.body_of(fn_idx) {
            self.walk_block(body, &mut env, &mut returns);
        } else if let Some(expr) = self.arena.arrow_expr_body_of(fn_idx) {
            let fact = self.eval_expr(expr, &env);
            returns.push((expr, fact));
        }
        FunctionAnalysis { returns }
    }

    fn walk_block(&self, block: NodeIndex, env: &mut Env, returns: &mut Vec<(NodeIndex, Fact)>) {
        for &stmt in self.arena.children(block) {
            self.walk_statement(stmt, env, returns);
        }
    }

    fn walk_statement(&self, stmt: NodeIndex, env: &mut Env, returns: &mut Vec<(NodeIndex, Fact)>) {
        match self.arena.kind(stmt) {
            NodeKind::Block => self.walk_block(stmt, env, returns),

            NodeKind::VariableStatement => {
                for &decl in self.arena.children(stmt) {
                    let fact = self
                        .arena
                        .initializer_of(decl)
                        .map(|init| self.eval_expr(init, env))
                        .unwrap_or(Fact::Dirty);
                    if let Some(name) = self.arena.name(decl) {
                        env.insert(name.to_string(), fact);
                    }
                }
            }

            NodeKind::ExpressionStatement => {
                if let Some(&expr) = self.arena.children(stmt).first() {
                    self.exec_for_effects(expr, env);
                }
            }

            NodeKind::ReturnStatement => {
                if let Some(&expr) = self.arena.children(stmt).first() {
                    let fact = self.eval_expr(expr, env);
                    returns.push((expr, fact));
                } else {
                    returns.push((stmt, Fact::Clean)); // bare `return;` returns no value
                }
            }

            NodeKind::IfStatement => {
                let children = self.arena.children(stmt).to_vec();
                let cond = children[0];
                self.exec_for_effects(cond, env);

                let mut then_env = env.clone();
                self.walk_statement(children[1], &mut then_env, returns);

                let mut else_env = env.clone();
                if let Some(&else_branch) = children.get(2) {
                    self.walk_statement(else_branch, &mut else_env, returns);
                }

                *env = join_envs(&then_env, &else_env);
            }

            _ => {}
        }
    }

    /// Evaluates the `Fact` an expression yields as a value, without
    /// mutating `env` - used for `return e` and initializers.
    fn eval_expr(&self, expr: NodeIndex, env: &Env) -> Fact {
        match self.arena.kind(expr) {
            NodeKind::Identifier => {
                let name = self.arena.name(expr).unwrap_or_default();
                env.get(name).copied().unwrap_or(Fact::Dirty)
            }

            NodeKind::StringLiteralExpr
            | NodeKind::NumberLiteralExpr
            | NodeKind::BooleanLiteralExpr
            | NodeKind::NullLiteralExpr
            | NodeKind::TemplateLiteralExpr
            | NodeKind::ObjectLiteralExpression
            | NodeKind::ArrayLiteralExpression => Fact::Clean,

            NodeKind::ParenthesizedExpression => {
                let inner = self.arena.children(expr)[0];
                self.eval_expr(inner, env)
            }

            NodeKind::PropertyAccessExpression => {
                // Direct property access of a Clean object yields Clean.
                let inner = self.arena.children(expr)[0];
                self.eval_expr(inner, env)
            }

            NodeKind::AwaitExpression => {
                let inner = self.arena.children(expr)[0];
                let inner_fact = self.eval_expr(inner, env);
                if inner_fact == Fact::Escaped {
                    Fact::Dirty // an external holder may have mutated it while suspended
                } else {
                    inner_fact
                }
            }

            NodeKind::CallExpression => {
                if is_json_parse_call(self.arena, expr) {
                    Fact::Clean // JSON.parse-as-T validates its own result
                } else {
                    Fact::Dirty // opaque callee: not proven to return a validated value
                }
            }

            NodeKind::AssignmentExpression => {
                let rhs = self.arena.children(expr)[1];
                self.eval_expr(rhs, env)
            }

            _ => Fact::Dirty,
        }
    }

    /// Executes an expression for its side effects, updating `env` in
    /// place: writes dirty the written binding, calls escape their
    /// non-builtin identifier arguments.
    fn exec_for_effects(&self, expr: NodeIndex, env: &mut Env) {
        match self.arena.kind(expr) {
            NodeKind::AssignmentExpression => {
                let children = self.arena.children(expr);
                let (lhs, rhs) = (children[0], children[1]);
                self.exec_for_effects(rhs, env);
                let fact = self.eval_expr(rhs, env);
                match self.arena.kind(lhs) {
                    NodeKind::Identifier => {
                        let name = self.arena.name(lhs).unwrap_or_default().to_string();
                        env.insert(name, fact);
                    }
                    NodeKind::PropertyAccessExpression => {
                        // Writing through a nested property dirties the
                        // whole root binding (§4.3 "on any write ... to a
                        // nested property").
                        if let Some(root) = root_identifier_name(self.arena, lhs) {
                            env.insert(root.to_string(), Fact::Dirty);
                        }
                    }
                    _ => {}
                }
            }

            NodeKind::CallExpression => {
                let children = self.arena.children(expr);
                let callee = children[0];
                let is_builtin_codec = is_json_parse_call(self.arena, expr) || is_json_stringify_call(self.arena, expr);
                for &arg in &children[1..] {
                    self.exec_for_effects(arg, env);
                    if !is_builtin_codec {
                        if let Some(name) = identifier_name(self.arena, arg) {
                            env.insert(name.to_string(), Fact::Escaped);
                        }
                    }
                }
                let _ = callee;
            }

            NodeKind::AwaitExpression => {
                let inner = self.arena.children(expr)[0];
                self.exec_for_effects(inner, env);
                if let Some(name) = identifier_name(self.arena, inner) {
                    if env.get(name).copied() == Some(Fact::Escaped) {
                        env.insert(name.to_string(), Fact::Dirty);
                    }
                }
            }

            NodeKind::PropertyAccessExpression | NodeKind::ParenthesizedExpression => {
                let inner = self.arena.children(expr)[0];
                self.exec_for_effects(inner, env);
            }

            _ => {}
        }
    }
}

fn identifier_name<'a>(arena: &'a NodeArena, idx: NodeIndex) -> Option<&'a str> {
    if arena.kind(idx) == NodeKind::Identifier {
        arena.name(idx)
    } else {
        None
    }
}

fn root_identifier_name(arena: &NodeArena, idx: NodeIndex) -> Option<&str> {
    match arena.kind(idx) {
        NodeKind::Identifier => arena.name(idx),
        NodeKind::PropertyAccessExpression => root_identifier_name(arena, arena.children(idx)[0]),
        _ => None,
    }
}

/// Recognizes `JSON.parse(...)` by shape: a call whose callee is a
/// `JSON.parse` property access.
pub fn is_json_parse_call(arena: &NodeArena, call: NodeIndex) -> bool {
    matches_builtin_call(arena, call, "JSON", "parse")
}

/// Recognizes `JSON.stringify(...)` by shape.
pub fn is_json_stringify_call(arena: &NodeArena, call: NodeIndex) -> bool {
    matches_builtin_call(arena, call, "JSON", "stringify")
}

fn matches_builtin_call(arena: &NodeArena, call: NodeIndex, object: &str, method: &str) -> bool {
    if arena.kind(call) != NodeKind::CallExpression {
        return false;
    }
    let Some(&callee) = arena.children(call).first() else { return false };
    if arena.kind(callee) != NodeKind::PropertyAccessExpression {
        return false;
    }
    if arena.name(callee) != Some(method) {
        return false;
    }
    let Some(&obj) = arena.children(callee).first() else { return false };
    arena.kind(obj) == NodeKind::Identifier && arena.name(obj) == Some(object)
}

fn join_envs(a: &Env, b: &Env) -> Env {
    let mut out = Env::default();
    for (name, fact_a) in a {
        let fact_b = b.get(name).copied().unwrap_or(Fact::Dirty);
        out.insert(name.clone(), fact_a.join(fact_b));
    }
    for (name, fact_b) in b {
        out.entry(name.clone()).or_insert(*fact_b);
    }
    out
}

#[cfg(test)]
#[path = "tests/analyzer.rs"]
mod tests;
