//! `SitePlanner` (§4.4, component C4): walks a parsed file for every
//! candidate injection point, resolves its expected `TypeModel`, asks
//! `EscapeAnalyzer`/`decide_*` whether it needs a runtime check, and
//! synthesizes the validator fragment for the ones that do.

use std::collections::{BTreeSet, HashSet};

use rustc_hash::FxHashMap;
use tsassert_common::{CoreError, Span, TransformerOptions};
use tsassert_flow::{
    decide_cast, decide_json_parse, decide_json_stringify, decide_parameter, decide_return, is_json_parse_call,
    is_json_stringify_call, Decision, EscapeAnalyzer, SiteKind,
};
use tsassert_ir::{lower, IrCache, IrNode, LowerMode};
use tsassert_model::{Resolver, TypeModel, TypeParamScope};
use tsassert_synth::{emit_validator_fn, Synthesizer};
use tsassert_syntax::{NodeArena, NodeIndex, NodeKind, ParsedFile};

use crate::site::CandidateSite;
use crate::walk::descend;

/// Knobs the planner needs out of `TransformerOptions` (§6), kept as
/// its own struct so the planner doesn't depend on the session crate.
#[derive(Debug, Clone)]
pub struct PlannerOptions {
    pub ignored: rustc_hash::FxHashSet<String>,
    pub policy: tsassert_common::ReusableValidators,
    pub max_generated_functions: Option<usize>,
    pub validate_casts: bool,
}

impl PlannerOptions {
    #[must_use]
    pub fn from_transformer_options(opts: &TransformerOptions) -> Self {
        Self {
            ignored: opts.ignore_types.iter().cloned().collect(),
            policy: opts.reusable_validators,
            max_generated_functions: opts.max_generated_functions,
            validate_casts: opts.validate_casts,
        }
    }
}

/// A `_checkRef_<name>` top-of-file helper for a named interface/type
/// alias reachable from a validated site, keyed by name rather than IR
/// hash so recursive references resolve (§9).
#[derive(Debug, Clone)]
pub struct ReferenceStub {
    pub name: String,
    pub source: String,
}

#[derive(Debug, Default)]
pub struct PlanResult {
    pub sites: Vec<CandidateSite>,
    pub reference_stubs: Vec<ReferenceStub>,
}

pub struct SitePlanner<'a> {
    arena: &'a NodeArena,
    root: NodeIndex,
    type_params_of: &'a FxHashMap<NodeIndex, Vec<(String, Option<NodeIndex>)>>,
    resolver: Resolver<'a>,
    ir_cache: IrCache,
    synth: Synthesizer,
    options: PlannerOptions,
}

impl<'a> SitePlanner<'a> {
    #[must_use]
    pub fn new(parsed: &'a ParsedFile, options: PlannerOptions) -> Self {
        let mut resolver = Resolver::new(&parsed.arena);
        resolver.register_program(parsed.root);
        let synth = Synthesizer::new(options.policy, options.max_generated_functions);
        Self {
            arena: &parsed.arena,
            root: parsed.root,
            type_params_of: &parsed.type_params_of,
            resolver,
            ir_cache: IrCache::new(),
            synth,
            options,
        }
    }

    pub fn plan(&mut self) -> Result<PlanResult, CoreError> {
        let mut sites = Vec::new();
        let mut referenced = BTreeSet::new();
        let mut cast_exclude: HashSet<NodeIndex> = HashSet::new();
        let declared = self.collect_declared_types();

        for (fn_idx, exported) in collect_function_likes(self.arena, self.root) {
            self.plan_function(fn_idx, exported, &mut sites, &mut referenced, &mut cast_exclude)?;
        }
        self.plan_casts_and_wrapped_parse(&mut sites, &mut referenced, &cast_exclude)?;
        self.plan_json_parse_declarators(&mut sites, &mut referenced)?;
        self.plan_json_stringify(&mut sites, &mut referenced, &declared, &cast_exclude)?;

        sites.sort_by_key(|s| s.byte_span.start);

        let reference_stubs = self.build_reference_stubs(referenced);
        Ok(PlanResult { sites, reference_stubs })
    }

    fn plan_function(
        &mut self,
        fn_idx: NodeIndex,
        exported: bool,
        sites: &mut Vec<CandidateSite>,
        referenced: &mut BTreeSet<String>,
        cast_exclude: &mut HashSet<NodeIndex>,
    ) -> Result<(), CoreError> {
        let (scope, unconstrained) = self.build_type_param_scope(fn_idx)?;
        let fn_name = self.arena.name(fn_idx).map(str::to_string);

        for (i, &param) in self.arena.params_of(fn_idx).to_vec().iter().enumerate() {
            let Some(ty_node) = self.arena.type_annotation_of(param) else { continue };
            let name = self.arena.name(param).unwrap_or_default().to_string();

            if self.arena.kind(ty_node) == NodeKind::TypeReference {
                if let Some(rname) = self.arena.name(ty_node) {
                    if unconstrained.contains(rname) {
                        sites.push(CandidateSite {
                            kind: SiteKind::Parameter,
                            byte_span: self.arena.span(param),
                            insertion: self.parameter_insertion_point(fn_idx),
                            name,
                            expected_type: None,
                            decision: Decision::skip("unconstrained generic"),
                            fragment: None,
                        });
                        continue;
                    }
                }
            }

            let expected = self.resolver.resolve_with_scope(ty_node, &scope)?;
            let all_clean = fn_name
                .as_deref()
                .map(|n| all_call_sites_pass_clean(self.arena, self.root, n, i))
                .unwrap_or(false);
            let decision = decide_parameter(exported, all_clean);
            let fragment = if decision.validate {
                collect_referenced_type_names(&expected, referenced);
                let node = lower(&mut self.ir_cache, &expected, LowerMode::Assert, &self.options.ignored);
                Some(self.synth.synthesize(&node, LowerMode::Assert, &name))
            } else {
                None
            };
            sites.push(CandidateSite {
                kind: SiteKind::Parameter,
                byte_span: self.arena.span(param),
                insertion: self.parameter_insertion_point(fn_idx),
                name,
                expected_type: Some(expected),
                decision,
                fragment,
            });
        }

        let Some(ty_node) = self.arena.return_type_of(fn_idx) else { return Ok(()) };
        let analysis = EscapeAnalyzer::new(self.arena).analyze_function(fn_idx);
        for (expr_idx, fact) in analysis.returns {
            if self.arena.kind(expr_idx) == NodeKind::ReturnStatement {
                continue; // bare `return;`: no value to check
            }

            let expected_node = if self.arena.kind(expr_idx) == NodeKind::AsExpression {
                cast_exclude.insert(expr_idx);
                self.arena.children(expr_idx)[1]
            } else {
                ty_node
            };
            let expected = self.resolver.resolve_with_scope(expected_node, &scope)?;
            let decision = decide_return(fact);
            let fragment = if decision.validate {
                collect_referenced_type_names(&expected, referenced);
                let node = lower(&mut self.ir_cache, &expected, LowerMode::Assert, &self.options.ignored);
                Some(self.synth.synthesize(&node, LowerMode::Assert, "return"))
            } else {
                None
            };
            let span = self.arena.span(expr_idx);
            sites.push(CandidateSite {
                kind: SiteKind::Return,
                byte_span: span,
                insertion: span,
                name: "return".to_string(),
                expected_type: Some(expected),
                decision,
                fragment,
            });
        }
        Ok(())
    }

    /// Walks every `x as T`. A cast wrapping a `JSON.parse` call becomes
    /// a `JsonParse` site (the cast's `T` supplies the contextual type
    /// JSON.parse itself can't carry); every other cast becomes a
    /// `Cast` site. Casts already coalesced into a `Return` site are
    /// skipped via `exclude`.
    fn plan_casts_and_wrapped_parse(
        &mut self,
        sites: &mut Vec<CandidateSite>,
        referenced: &mut BTreeSet<String>,
        exclude: &HashSet<NodeIndex>,
    ) -> Result<(), CoreError> {
        let mut casts = Vec::new();
        descend(self.arena, self.root, &mut |n| {
            if self.arena.kind(n) == NodeKind::AsExpression {
                casts.push(n);
            }
        });

        for cast in casts {
            if exclude.contains(&cast) {
                continue;
            }
            let children = self.arena.children(cast).to_vec();
            let (inner, ty_node) = (children[0], children[1]);
            let expected = self.resolver.resolve(ty_node)?;
            let span = self.arena.span(cast);

            if self.arena.kind(inner) == NodeKind::CallExpression && is_json_parse_call(self.arena, inner) {
                collect_referenced_type_names(&expected, referenced);
                let node = lower(&mut self.ir_cache, &expected, LowerMode::Assert, &self.options.ignored);
                let fragment = Some(self.synth.synthesize(&node, LowerMode::Assert, "JSON.parse"));
                sites.push(CandidateSite {
                    kind: SiteKind::JsonParse,
                    byte_span: span,
                    insertion: span,
                    name: "JSON.parse".to_string(),
                    expected_type: Some(expected),
                    decision: decide_json_parse(),
                    fragment,
                });
                continue;
            }

            if !self.options.validate_casts {
                continue;
            }
            let (source_is_top_type, statically_assignable) = self.shallow_assignability(inner, &expected);
            let decision = decide_cast(source_is_top_type, statically_assignable);
            let fragment = if decision.validate {
                collect_referenced_type_names(&expected, referenced);
                let node = lower(&mut self.ir_cache, &expected, LowerMode::Assert, &self.options.ignored);
                Some(self.synth.synthesize(&node, LowerMode::Assert, "as"))
            } else {
                None
            };
            sites.push(CandidateSite {
                kind: SiteKind::Cast,
                byte_span: span,
                insertion: span,
                name: "as".to_string(),
                expected_type: Some(expected),
                decision,
                fragment,
            });
        }
        Ok(())
    }

    /// `const v: T = JSON.parse(x);` - the declarator's own annotation
    /// supplies the contextual type, with no `as` cast involved.
    fn plan_json_parse_declarators(
        &mut self,
        sites: &mut Vec<CandidateSite>,
        referenced: &mut BTreeSet<String>,
    ) -> Result<(), CoreError> {
        let mut decls = Vec::new();
        descend(self.arena, self.root, &mut |n| {
            if self.arena.kind(n) == NodeKind::VariableDeclarator {
                decls.push(n);
            }
        });

        for decl in decls {
            let Some(ty_node) = self.arena.type_annotation_of(decl) else { continue };
            let Some(init) = self.arena.initializer_of(decl) else { continue };
            if self.arena.kind(init) != NodeKind::CallExpression || !is_json_parse_call(self.arena, init) {
                continue;
            }
            let expected = self.resolver.resolve(ty_node)?;
            collect_referenced_type_names(&expected, referenced);
            let node = lower(&mut self.ir_cache, &expected, LowerMode::Assert, &self.options.ignored);
            let fragment = Some(self.synth.synthesize(&node, LowerMode::Assert, "JSON.parse"));
            let span = self.arena.span(init);
            sites.push(CandidateSite {
                kind: SiteKind::JsonParse,
                byte_span: span,
                insertion: span,
                name: "JSON.parse".to_string(),
                expected_type: Some(expected),
                decision: decide_json_parse(),
                fragment,
            });
        }
        Ok(())
    }

    /// `JSON.stringify(arg)` where `arg` is an identifier with a
    /// declared object/array type: validate by key-projection. Casts
    /// already planned (their span may equal a stringify argument's
    /// span in degenerate cases) are irrelevant here and `exclude` is
    /// unused beyond documenting the shared call shape with
    /// `plan_casts_and_wrapped_parse`.
    fn plan_json_stringify(
        &mut self,
        sites: &mut Vec<CandidateSite>,
        referenced: &mut BTreeSet<String>,
        declared: &FxHashMap<String, NodeIndex>,
        _exclude: &HashSet<NodeIndex>,
    ) -> Result<(), CoreError> {
        let mut calls = Vec::new();
        descend(self.arena, self.root, &mut |n| {
            if self.arena.kind(n) == NodeKind::CallExpression && is_json_stringify_call(self.arena, n) {
                calls.push(n);
            }
        });

        for call in calls {
            let children = self.arena.children(call).to_vec();
            let Some(&arg) = children.get(1) else { continue };
            let span = self.arena.span(call);

            let ty_node = if self.arena.kind(arg) == NodeKind::Identifier {
                self.arena.name(arg).and_then(|n| declared.get(n)).copied()
            } else {
                None
            };

            let expected = match ty_node {
                Some(t) => Some(self.resolver.resolve(t)?),
                None => None,
            };
            let decision = decide_json_stringify(expected.is_some());
            let fragment = match &expected {
                Some(expected) => {
                    collect_referenced_type_names(expected, referenced);
                    let node = lower(&mut self.ir_cache, expected, LowerMode::Stringify, &self.options.ignored);
                    Some(self.synth.synthesize(&node, LowerMode::Stringify, "JSON.stringify"))
                }
                None => None,
            };
            sites.push(CandidateSite {
                kind: SiteKind::JsonStringify,
                byte_span: span,
                insertion: span,
                name: "JSON.stringify".to_string(),
                expected_type: expected,
                decision,
                fragment,
            });
        }
        Ok(())
    }

    fn build_type_param_scope(&mut self, fn_idx: NodeIndex) -> Result<(TypeParamScope, HashSet<String>), CoreError> {
        let mut scope = TypeParamScope::default();
        let mut unconstrained = HashSet::new();
        if let Some(params) = self.type_params_of.get(&fn_idx) {
            for (name, constraint) in params.clone() {
                match constraint {
                    Some(c) => {
                        let resolved = self.resolver.resolve(c)?;
                        scope.insert(name, Some(resolved));
                    }
                    None => {
                        unconstrained.insert(name.clone());
                        scope.insert(name, None);
                    }
                }
            }
        }
        Ok((scope, unconstrained))
    }

    fn parameter_insertion_point(&self, fn_idx: NodeIndex) -> Span {
        if let Some(body) = self.arena.body_of(fn_idx) {
            let s = self.arena.span(body);
            return Span::at(s.start + 1);
        }
        // Expression-bodied arrow: no `{` to insert after; anchor on
        // the expression itself (EditApplier wraps rather than inserts
        // for this shape).
        self.arena
            .arrow_expr_body_of(fn_idx)
            .map(|e| self.arena.span(e))
            .unwrap_or_else(|| self.arena.span(fn_idx))
    }

    /// A same-file, unscoped lookup of `inner`'s declared type, used to
    /// decide cast skip-ability. Only a plain identifier with a visible
    /// declared type can be proven statically assignable; anything else
    /// (a call result, a computed member, a parameter from another
    /// function with a shadowing name) is conservatively treated as an
    /// unproven top-type source, which always forces MUST-VALIDATE.
    fn shallow_assignability(&mut self, inner: NodeIndex, target: &TypeModel) -> (bool, bool) {
        if self.arena.kind(inner) != NodeKind::Identifier {
            return (true, false);
        }
        let Some(name) = self.arena.name(inner) else { return (true, false) };
        let declared = self.collect_declared_types();
        let Some(&ty_node) = declared.get(name) else { return (true, false) };
        match self.resolver.resolve(ty_node) {
            Ok(source) => (source.is_top_type(), source.hash() == target.hash()),
            Err(_) => (true, false),
        }
    }

    /// Every `Parameter`/`VariableDeclarator` in the file with a type
    /// annotation, keyed by name. Deliberately unscoped (first
    /// declaration of a name wins): a full lexical binder is out of
    /// scope for this engine.
    fn collect_declared_types(&self) -> FxHashMap<String, NodeIndex> {
        let mut out = FxHashMap::default();
        descend(self.arena, self.root, &mut |n| {
            if matches!(self.arena.kind(n), NodeKind::Parameter | NodeKind::VariableDeclarator) {
                if let (Some(name), Some(ty)) = (self.arena.name(n), self.arena.type_annotation_of(n)) {
                    out.entry(name.to_string()).or_insert(ty);
                }
            }
        });
        out
    }

    fn build_reference_stubs(&mut self, mut pending: BTreeSet<String>) -> Vec<ReferenceStub> {
        let mut done: HashSet<String> = HashSet::new();
        let mut stubs = Vec::new();
        while let Some(id) = pending.iter().next().cloned() {
            pending.remove(&id);
            if !done.insert(id.clone()) {
                continue;
            }
            let Some(resolved) = self.resolver.cache().lookup_named(&id) else { continue };
            let node = lower(&mut self.ir_cache, &resolved, LowerMode::Assert, &self.options.ignored);
            let mut nested = BTreeSet::new();
            collect_reference_ids_in_ir(&node, &mut nested);
            for n in nested {
                if !done.contains(&n) {
                    pending.insert(n);
                }
            }
            let body = emit_validator_fn(&node);
            let name = format!("_checkRef_{id}");
            stubs.push(ReferenceStub { name: name.clone(), source: format!("const {name} = {body};") });
        }
        stubs
    }
}

fn collect_referenced_type_names(ty: &TypeModel, out: &mut BTreeSet<String>) {
    match ty {
        TypeModel::Reference { id, .. } => {
            out.insert(id.clone());
        }
        TypeModel::Array { element, .. } => collect_referenced_type_names(element, out),
        TypeModel::Tuple { elements, rest, .. } => {
            for e in elements {
                collect_referenced_type_names(e, out);
            }
            if let Some(r) = rest {
                collect_referenced_type_names(r, out);
            }
        }
        TypeModel::Union { arms, .. } | TypeModel::Intersection { arms, .. } => {
            for a in arms {
                collect_referenced_type_names(a, out);
            }
        }
        TypeModel::Object { fields, index, .. } => {
            for field in fields.values() {
                collect_referenced_type_names(&field.ty, out);
            }
            if let Some(i) = index {
                collect_referenced_type_names(&i.value, out);
            }
        }
        TypeModel::Primitive { .. }
        | TypeModel::Literal { .. }
        | TypeModel::TemplateLiteral { .. }
        | TypeModel::Unsupported { .. } => {}
    }
}

fn collect_reference_ids_in_ir(node: &IrNode, out: &mut BTreeSet<String>) {
    match node {
        IrNode::Reference { id, .. } => {
            out.insert(id.clone());
        }
        IrNode::CheckArray { elem, .. } => collect_reference_ids_in_ir(elem, out),
        IrNode::CheckTuple { elements, rest, .. } => {
            for e in elements {
                collect_reference_ids_in_ir(e, out);
            }
            if let Some(r) = rest {
                collect_reference_ids_in_ir(r, out);
            }
        }
        IrNode::CheckObject { fields, index, .. } => {
            for f in fields {
                collect_reference_ids_in_ir(&f.check, out);
            }
            if let Some(i) = index {
                collect_reference_ids_in_ir(&i.value, out);
            }
        }
        IrNode::CheckUnion { arms, .. } => {
            for a in arms {
                collect_reference_ids_in_ir(a, out);
            }
        }
        IrNode::Filter { fields, .. } | IrNode::Pure { fields, .. } => {
            for f in fields {
                collect_reference_ids_in_ir(&f.check, out);
            }
        }
        _ => {}
    }
}

/// Function-like declarations in source order, paired with whether each
/// is reachable from an exported top-level binding. Nested closures
/// (found inside a body) are always internal.
fn collect_function_likes(arena: &NodeArena, root: NodeIndex) -> Vec<(NodeIndex, bool)> {
    let mut out = Vec::new();
    collect_function_likes_in(arena, root, false, &mut out);
    out
}

fn collect_function_likes_in(arena: &NodeArena, idx: NodeIndex, exported_ctx: bool, out: &mut Vec<(NodeIndex, bool)>) {
    match arena.kind(idx) {
        NodeKind::Program => {
            for &c in arena.children(idx) {
                collect_function_likes_in(arena, c, false, out);
            }
        }
        NodeKind::VariableStatement => {
            let exported = arena.flags(idx).is_exported;
            for &decl in arena.children(idx) {
                if let Some(init) = arena.initializer_of(decl) {
                    collect_function_likes_in(arena, init, exported, out);
                }
            }
        }
        NodeKind::FunctionDeclaration => {
            let exported = exported_ctx || arena.flags(idx).is_exported;
            out.push((idx, exported));
            if let Some(body) = arena.body_of(idx) {
                collect_nested_function_likes(arena, body, out);
            }
        }
        NodeKind::ArrowFunctionExpression => {
            out.push((idx, exported_ctx));
            if let Some(body) = arena.body_of(idx) {
                collect_nested_function_likes(arena, body, out);
            } else if let Some(expr) = arena.arrow_expr_body_of(idx) {
                collect_nested_function_likes(arena, expr, out);
            }
        }
        _ => collect_nested_function_likes(arena, idx, out),
    }
}

fn collect_nested_function_likes(arena: &NodeArena, idx: NodeIndex, out: &mut Vec<(NodeIndex, bool)>) {
    descend(arena, idx, &mut |n| {
        if matches!(arena.kind(n), NodeKind::FunctionDeclaration | NodeKind::ArrowFunctionExpression) {
            out.push((n, false));
        }
    });
}

/// Whether every call site of `fn_name` in the file passes a
/// structurally-clean argument in the parameter's position (§4.3's
/// "every call site passes an already-validated value"). A shallow
/// check: only literals and `JSON.parse` results are recognized as
/// clean without running a caller's own dataflow; an identifier
/// argument is conservatively treated as unproven, since resolving its
/// fact would require analyzing the calling function too. A function
/// never called in this file is also treated as unproven (it may be
/// called from elsewhere).
fn all_call_sites_pass_clean(arena: &NodeArena, root: NodeIndex, fn_name: &str, param_index: usize) -> bool {
    let mut any_call = false;
    let mut all_clean = true;
    descend(arena, root, &mut |n| {
        if arena.kind(n) != NodeKind::CallExpression {
            return;
        }
        let children = arena.children(n);
        let Some(&callee) = children.first() else { return };
        if arena.kind(callee) != NodeKind::Identifier || arena.name(callee) != Some(fn_name) {
            return;
        }
        any_call = true;
        match children.get(param_index + 1) {
            Some(&arg) if is_structurally_clean_arg(arena, arg) => {}
            _ => all_clean = false,
        }
    });
    any_call && all_clean
}

fn is_structurally_clean_arg(arena: &NodeArena, expr: NodeIndex) -> bool {
    match arena.kind(expr) {
        NodeKind::StringLiteralExpr
        | NodeKind::NumberLiteralExpr
        | NodeKind::BooleanLiteralExpr
        | NodeKind::NullLiteralExpr
        | NodeKind::TemplateLiteralExpr
        | NodeKind::ObjectLiteralExpression
        | NodeKind::ArrayLiteralExpression => true,
        NodeKind::CallExpression => is_json_parse_call(arena, expr),
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/plan.rs"]
mod tests;
