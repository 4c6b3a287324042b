//! `Resolve(node) -> TypeModel`: the canonicalisation engine described
//! in §4.1. Consumes a type-annotation node from a parsed file's AST
//! and produces a normalized, content-hashed `TypeModel`, sharing
//! structure with every other structurally-equal type resolved in the
//! same session via [`TypeCache`].

use crate::hash;
use crate::template;
use crate::types::{IndexSignature, LiteralValue, ObjectField, TemplateChunk, TypeHash, TypeModel};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tsassert_common::CoreError;
use tsassert_syntax::{LiteralValue as AstLiteral, NodeArena, NodeIndex, NodeKind, PrimitiveKind};

/// Session-scoped, content-hash-keyed store of every resolved
/// `TypeModel`. Shared across files in a session per §5 ("the
/// TypeModel cache ... is session-scoped and read-mostly after
/// warmup").
#[derive(Default)]
pub struct TypeCache {
    by_hash: FxHashMap<TypeHash, (String, Arc<TypeModel>)>,
    by_name: FxHashMap<String, Arc<TypeModel>>,
}

impl TypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a freshly built `TypeModel` under its canonical
    /// signature, verifying that a prior entry under the same hash is
    /// truly the same type (I1's "collision check"). A mismatch is an
    /// `InternalError`: the hash space is wide enough that this should
    /// never legitimately happen.
    fn intern(&mut self, signature: String, build: impl FnOnce(TypeHash) -> TypeModel) -> Result<Arc<TypeModel>, CoreError> {
        let hash = hash::hash_str(&signature);
        if let Some((existing_sig, existing)) = self.by_hash.get(&hash) {
            if existing_sig == &signature {
                return Ok(existing.clone());
            }
            return Err(CoreError::Internal(format!(
                "type hash collision between distinct signatures at {hash}"
            )));
        }
        let model = Arc::new(build(hash));
        self.by_hash.insert(hash, (signature, model.clone()));
        Ok(model)
    }

    pub fn register_named(&mut self, name: &str, model: Arc<TypeModel>) {
        self.by_name.insert(name.to_string(), model);
    }

    pub fn lookup_named(&self, name: &str) -> Option<Arc<TypeModel>> {
        self.by_name.get(name).cloned()
    }
}

/// A single named type-parameter substitution in scope: `T extends U`
/// substitutes to `U` (or `unknown` when unconstrained, per §4.4 / §9).
pub type TypeParamScope = FxHashMap<String, Option<Arc<TypeModel>>>;

pub struct Resolver<'a> {
    arena: &'a NodeArena,
    type_aliases: FxHashMap<String, NodeIndex>,
    interfaces: FxHashMap<String, NodeIndex>,
    cache: TypeCache,
    /// Names currently being resolved, for cycle detection (I2).
    stack: Vec<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(arena: &'a NodeArena) -> Self {
        Resolver {
            arena,
            type_aliases: FxHashMap::default(),
            interfaces: FxHashMap::default(),
            cache: TypeCache::new(),
            stack: Vec::new(),
        }
    }

    pub fn cache(&self) -> &TypeCache {
        &self.cache
    }

    pub fn into_cache(self) -> TypeCache {
        self.cache
    }

    /// Scans a parsed file's top-level declarations and registers
    /// interface/type-alias names so `TypeReference`s to them resolve
    /// instead of degrading to `Unsupported`.
    pub fn register_program(&mut self, root: NodeIndex) {
        for &decl in self.arena.children(root) {
            match self.arena.kind(decl) {
                NodeKind::InterfaceDeclaration => {
                    if let Some(name) = self.arena.name(decl) {
                        self.interfaces.insert(name.to_string(), decl);
                    }
                }
                NodeKind::TypeAliasDeclaration => {
                    if let Some(name) = self.arena.name(decl) {
                        let rhs = self.arena.children(decl)[0];
                        self.type_aliases.insert(name.to_string(), rhs);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn resolve(&mut self, node: NodeIndex) -> Result<Arc<TypeModel>, CoreError> {
        self.resolve_with_scope(node, &TypeParamScope::default())
    }

    pub fn resolve_with_scope(
        &mut self,
        node: NodeIndex,
        scope: &TypeParamScope,
    ) -> Result<Arc<TypeModel>, CoreError> {
        match self.arena.kind(node) {
            NodeKind::PrimitiveType => self.resolve_primitive(node),
            NodeKind::LiteralType => self.resolve_literal(node),
            NodeKind::TemplateLiteralType => self.resolve_template_literal(node, scope),
            NodeKind::ArrayType => self.resolve_array(node, scope),
            NodeKind::TupleType => self.resolve_tuple(node, scope),
            NodeKind::UnionType => self.resolve_union(node, scope),
            NodeKind::IntersectionType => self.resolve_intersection(node, scope),
            NodeKind::ObjectType => self.resolve_object(node, scope),
            NodeKind::ParenthesizedType => {
                self.resolve_with_scope(self.arena.children(node)[0], scope)
            }
            NodeKind::TypeReference => self.resolve_reference(node, scope),
            other => self.unsupported(format!("unsupported type node kind {other:?}")),
        }
    }

    fn unsupported(&mut self, reason: String) -> Result<Arc<TypeModel>, CoreError> {
        self.cache.intern(format!("Unsupported:{reason}"), |hash| TypeModel::Unsupported { reason, hash })
    }

    fn resolve_primitive(&mut self, node: NodeIndex) -> Result<Arc<TypeModel>, CoreError> {
        let kind = self.arena.primitive(node);
        let sig = format!("Primitive:{kind:?}");
        self.cache.intern(sig, |hash| TypeModel::Primitive { kind, hash })
    }

    fn resolve_literal(&mut self, node: NodeIndex) -> Result<Arc<TypeModel>, CoreError> {
        let value = match self.arena.literal(node) {
            Some(AstLiteral::String(s)) => LiteralValue::String(s.clone()),
            Some(AstLiteral::Number(n)) => LiteralValue::number(*n),
            Some(AstLiteral::Bigint(s)) => LiteralValue::Bigint(s.clone()),
            Some(AstLiteral::Boolean(b)) => LiteralValue::Boolean(*b),
            None => return self.unsupported("literal type missing a value".to_string()),
        };
        let sig = format!("Literal:{value:?}");
        self.cache.intern(sig, |hash| TypeModel::Literal { value, hash })
    }

    fn resolve_template_literal(
        &mut self,
        node: NodeIndex,
        scope: &TypeParamScope,
    ) -> Result<Arc<TypeModel>, CoreError> {
        let ast_chunks = self.arena.template_chunks(node).to_vec();
        let mut chunks = Vec::with_capacity(ast_chunks.len());
        for chunk in &ast_chunks {
            match chunk {
                tsassert_syntax::TemplateChunk::Text(t) => chunks.push(TemplateChunk::Text(t.clone())),
                tsassert_syntax::TemplateChunk::Placeholder(p) => {
                    let ty = self.resolve_with_scope(*p, scope)?;
                    chunks.push(TemplateChunk::Placeholder(ty));
                }
            }
        }
        if template::is_trivial_string_wrapper(&chunks) {
            return self.resolve_bare_primitive(PrimitiveKind::String);
        }
        let regex = Arc::new(template::compile(&chunks));
        let sig = format!("TemplateLiteral:{}", regex.as_str());
        self.cache.intern(sig, |hash| TypeModel::TemplateLiteral { chunks, regex, hash })
    }

    fn resolve_bare_primitive(&mut self, kind: PrimitiveKind) -> Result<Arc<TypeModel>, CoreError> {
        let sig = format!("Primitive:{kind:?}");
        self.cache.intern(sig, |hash| TypeModel::Primitive { kind, hash })
    }

    fn resolve_array(&mut self, node: NodeIndex, scope: &TypeParamScope) -> Result<Arc<TypeModel>, CoreError> {
        let elem_node = self.arena.children(node)[0];
        let element = self.resolve_with_scope(elem_node, scope)?;
        let sig = format!("Array:{}", element.hash());
        self.cache
            .intern(sig, |hash| TypeModel::Array { element, min_len: None, max_len: None, hash })
    }

    fn resolve_tuple(&mut self, node: NodeIndex, scope: &TypeParamScope) -> Result<Arc<TypeModel>, CoreError> {
        let children = self.arena.children(node).to_vec();
        let mut elements = Vec::new();
        let mut rest = None;
        for child in &children {
            let flags = self.arena.flags(*child);
            let resolved = self.resolve_with_scope(*child, scope)?;
            if flags.is_rest {
                // `...number[]` parses as an ArrayType; unwrap it to the
                // rest element's own type rather than an array-of-array.
                rest = Some(match resolved.as_ref() {
                    TypeModel::Array { element, .. } => element.clone(),
                    _ => resolved,
                });
            } else {
                elements.push(resolved);
            }
        }
        let sig = format!(
            "Tuple:[{}]:rest={}",
            elements.iter().map(|e| e.hash().to_string()).collect::<Vec<_>>().join(","),
            rest.as_ref().map(|r| r.hash().to_string()).unwrap_or_default()
        );
        self.cache.intern(sig, |hash| TypeModel::Tuple { elements, rest, hash })
    }

    fn resolve_union(&mut self, node: NodeIndex, scope: &TypeParamScope) -> Result<Arc<TypeModel>, CoreError> {
        let children = self.arena.children(node).to_vec();
        let mut arms = Vec::new();
        for child in &children {
            let resolved = self.resolve_with_scope(*child, scope)?;
            flatten_union_into(resolved, &mut arms);
        }

        // `T | any` -> `any`.
        if arms.iter().any(|a| matches!(a.as_ref(), TypeModel::Primitive { kind: PrimitiveKind::Any, .. })) {
            return self.resolve_bare_primitive(PrimitiveKind::Any);
        }
        // `T | never` -> drop `never` arms.
        arms.retain(|a| !matches!(a.as_ref(), TypeModel::Primitive { kind: PrimitiveKind::Never, .. }));
        if arms.is_empty() {
            return self.resolve_bare_primitive(PrimitiveKind::Never);
        }

        // Dedupe by hash, then sort by hash for canonical order.
        let mut seen = std::collections::BTreeMap::new();
        for arm in arms {
            seen.entry(arm.hash()).or_insert(arm);
        }
        let arms: Vec<Arc<TypeModel>> = seen.into_values().collect();
        if arms.len() == 1 {
            return Ok(arms[0].clone());
        }

        let discriminant = find_discriminant(&arms);
        let sig = format!(
            "Union:[{}]",
            arms.iter().map(|a| a.hash().to_string()).collect::<Vec<_>>().join(",")
        );
        self.cache.intern(sig, |hash| TypeModel::Union { arms, discriminant, hash })
    }

    fn resolve_intersection(&mut self, node: NodeIndex, scope: &TypeParamScope) -> Result<Arc<TypeModel>, CoreError> {
        let children = self.arena.children(node).to_vec();
        let mut resolved = Vec::with_capacity(children.len());
        for child in &children {
            resolved.push(self.resolve_with_scope(*child, scope)?);
        }
        if resolved.iter().all(|r| matches!(r.as_ref(), TypeModel::Object { .. })) {
            let mut merged: IndexMap<String, ObjectField> = IndexMap::new();
            for r in &resolved {
                if let TypeModel::Object { fields, .. } = r.as_ref() {
                    for (name, field) in fields {
                        merged.insert(name.clone(), field.clone());
                    }
                }
            }
            let sig = object_signature(&merged, &None);
            return self.cache.intern(sig, |hash| TypeModel::Object { fields: merged, index: None, hash });
        }
        let sig = format!(
            "Intersection:[{}]",
            resolved.iter().map(|a| a.hash().to_string()).collect::<Vec<_>>().join(",")
        );
        self.cache.intern(sig, |hash| TypeModel::Intersection { arms: resolved, hash })
    }

    fn resolve_object(&mut self, node: NodeIndex, scope: &TypeParamScope) -> Result<Arc<TypeModel>, CoreError> {
        let members = self.arena.children(node).to_vec();
        let mut fields = IndexMap::new();
        let mut index = None;
        for member in members {
            match self.arena.kind(member) {
                NodeKind::PropertySignature => {
                    let name = self.arena.name(member).unwrap_or_default().to_string();
                    let flags = self.arena.flags(member);
                    let ty_node = self.arena.children(member)[0];
                    let ty = self.resolve_with_scope(ty_node, scope)?;
                    fields.insert(name, ObjectField { ty, optional: flags.optional, readonly: flags.readonly });
                }
                NodeKind::IndexSignature => {
                    let kids = self.arena.children(member);
                    let key_ty = self.resolve_with_scope(kids[0], scope)?;
                    let value = self.resolve_with_scope(kids[1], scope)?;
                    let key = match key_ty.as_ref() {
                        TypeModel::Primitive { kind: PrimitiveKind::Number, .. } => PrimitiveKind::Number,
                        _ => PrimitiveKind::String,
                    };
                    index = Some(IndexSignature { key, value });
                }
                _ => {}
            }
        }
        let sig = object_signature(&fields, &index);
        self.cache.intern(sig, |hash| TypeModel::Object { fields, index, hash })
    }

    fn resolve_reference(&mut self, node: NodeIndex, scope: &TypeParamScope) -> Result<Arc<TypeModel>, CoreError> {
        let name = self.arena.name(node).unwrap_or("__unsupported__").to_string();

        if let Some(substitution) = scope.get(&name) {
            return match substitution {
                Some(ty) => Ok(ty.clone()),
                None => self.resolve_bare_primitive(PrimitiveKind::Unknown),
            };
        }

        if self.stack.contains(&name) {
            let sig = format!("Reference:{name}");
            return self.cache.intern(sig, |hash| TypeModel::Reference { id: name.clone(), hash });
        }

        if let Some(&target) = self.type_aliases.get(&name) {
            self.stack.push(name.clone());
            let resolved = self.resolve_with_scope(target, scope);
            self.stack.pop();
            let resolved = resolved?;
            self.cache.register_named(&name, resolved.clone());
            return Ok(resolved);
        }

        if let Some(&decl) = self.interfaces.get(&name) {
            self.stack.push(name.clone());
            let resolved = self.resolve_object(decl, scope);
            self.stack.pop();
            let resolved = resolved?;
            self.cache.register_named(&name, resolved.clone());
            return Ok(resolved);
        }

        self.unsupported(format!("unresolved type reference '{name}'"))
    }
}

fn flatten_union_into(model: Arc<TypeModel>, out: &mut Vec<Arc<TypeModel>>) {
    match model.as_ref() {
        TypeModel::Union { arms, .. } => {
            for arm in arms {
                out.push(arm.clone());
            }
        }
        _ => out.push(model),
    }
}

fn object_signature(fields: &IndexMap<String, ObjectField>, index: &Option<IndexSignature>) -> String {
    let mut names: Vec<&String> = fields.keys().collect();
    names.sort();
    let body = names
        .iter()
        .map(|n| {
            let f = &fields[*n];
            format!("{n}:{}:{}:{}", f.ty.hash(), f.optional, f.readonly)
        })
        .collect::<Vec<_>>()
        .join(",");
    let idx = index
        .as_ref()
        .map(|i| format!("[{:?}]:{}", i.key, i.value.hash()))
        .unwrap_or_default();
    format!("Object:{{{body}}}:{idx}")
}

/// Finds the smallest single discriminant property for a union of
/// object arms: a property present on every arm whose value type is a
/// distinct literal per arm (§4.1).
fn find_discriminant(arms: &[Arc<TypeModel>]) -> Option<String> {
    let object_arms: Vec<&IndexMap<String, ObjectField>> =
        arms.iter().filter_map(|a| a.as_object_fields()).collect();
    if object_arms.len() != arms.len() || object_arms.len() < 2 {
        return None;
    }
    let first = object_arms[0];
    'candidate: for name in first.keys() {
        let mut seen_literals = std::collections::HashSet::new();
        for fields in &object_arms {
            let Some(field) = fields.get(name) else { continue 'candidate };
            let TypeModel::Literal { hash, .. } = field.ty.as_ref() else { continue 'candidate };
            if !seen_literals.insert(*hash) {
                continue 'candidate;
            }
        }
        return Some(name.clone());
    }
    None
}

#[cfg(test)]
#[path = "tests/resolve.rs"]
mod tests;
