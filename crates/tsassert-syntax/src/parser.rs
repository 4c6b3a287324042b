//! Recursive-descent parser over the scanner's token stream.
//!
//! This is deliberately a subset grammar: function-likes, parameters,
//! return statements, `as` casts, call/property-access chains, `await`,
//! simple assignment, `if`/block statements, and the type-annotation
//! grammar (primitives, literals, object/array/tuple/union/intersection,
//! references, template literal types). Anything else encountered at
//! statement position (loops, switch, try, classes, decorators) is
//! skipped as a balanced, opaque `UnknownStatement` so one unsupported
//! construct never fails the parse of an entire file — it only means the
//! site planner won't find candidate sites nested inside it.
//!
//! A single parse error (malformed syntax within the supported subset)
//! is fatal for the file, matching spec §7's `ParseError`.

use crate::ast::{LiteralValue, NodeArena, NodeFlags, NodeIndex, PrimitiveKind, TemplateChunk};
use crate::scanner::{Scanner, Token};
use crate::syntax_kind::{Keyword, NodeKind, TokenKind};
use rustc_hash::FxHashMap;
use tsassert_common::Span;

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.span)
    }
}

impl std::error::Error for ParseError {}

type PResult<T> = Result<T, ParseError>;

/// Per-function generic type parameter list: name plus optional
/// `extends` constraint type node. Unconstrained parameters carry `None`.
pub struct ParsedFile {
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub type_params_of: FxHashMap<NodeIndex, Vec<(String, Option<NodeIndex>)>>,
}

pub fn parse(source: &str) -> PResult<ParsedFile> {
    let mut parser = Parser::new(source);
    let root = parser.parse_program()?;
    Ok(ParsedFile {
        arena: parser.arena,
        root,
        type_params_of: parser.type_params_of,
    })
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    cur: Token,
    arena: NodeArena,
    type_params_of: FxHashMap<NodeIndex, Vec<(String, Option<NodeIndex>)>>,
    src: &'a str,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        let mut scanner = Scanner::new(src);
        let cur = scanner.next_token();
        Parser {
            scanner,
            cur,
            arena: NodeArena::new(),
            type_params_of: FxHashMap::default(),
            src,
        }
    }

    // ---- token helpers ----

    fn bump(&mut self) -> Token {
        let t = self.cur;
        self.cur = self.scanner.next_token();
        t
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    fn at_kw(&self, kw: Keyword) -> bool {
        self.cur.kind == TokenKind::Keyword(kw)
    }

    fn text_of(&self, span: Span) -> &'a str {
        span.slice(self.src)
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.cur.kind == kind {
            Ok(self.bump())
        } else {
            Err(ParseError { message: format!("expected {what}"), span: self.cur.span })
        }
    }

    fn ident_text(&mut self) -> PResult<String> {
        if self.at(TokenKind::Identifier) {
            let tok = self.bump();
            Ok(self.text_of(tok.span).to_string())
        } else {
            Err(ParseError { message: "expected identifier".into(), span: self.cur.span })
        }
    }

    fn checkpoint(&self) -> (u32, Token) {
        (self.scanner.pos(), self.cur)
    }

    fn restore(&mut self, cp: (u32, Token)) {
        self.scanner.set_pos(cp.0);
        self.cur = cp.1;
    }

    // ---- program / statements ----

    fn parse_program(&mut self) -> PResult<NodeIndex> {
        let start = self.cur.span.start;
        let mut stmts = Vec::new();
        while !self.at(TokenKind::Eof) {
            stmts.push(self.parse_statement()?);
        }
        let end = self.cur.span.end;
        let root = self.arena.alloc(NodeKind::Program, Span::new(start, end));
        self.arena.set_children(root, stmts);
        Ok(root)
    }

    fn parse_statement(&mut self) -> PResult<NodeIndex> {
        let exported = if self.at_kw(Keyword::Export) {
            self.bump();
            if self.at_kw(Keyword::Default) {
                self.bump();
            }
            true
        } else {
            false
        };

        if self.at_kw(Keyword::Async) || self.at_kw(Keyword::Function) {
            return self.parse_function_declaration(exported);
        }
        if self.at_kw(Keyword::Interface) {
            return self.parse_interface_declaration(exported);
        }
        if self.at_kw(Keyword::Type) {
            return self.parse_type_alias_declaration(exported);
        }
        if self.at_kw(Keyword::Const) || self.at_kw(Keyword::Let) || self.at_kw(Keyword::Var) {
            return self.parse_variable_statement(exported);
        }
        if self.at_kw(Keyword::Return) {
            return self.parse_return_statement();
        }
        if self.at_kw(Keyword::If) {
            return self.parse_if_statement();
        }
        if self.at(TokenKind::OpenBrace) {
            return self.parse_block();
        }
        if self.at(TokenKind::Semicolon) {
            let tok = self.bump();
            return Ok(self.arena.alloc(NodeKind::ExpressionStatement, tok.span));
        }

        // Anything recognizable as the start of an expression becomes a
        // real ExpressionStatement; anything else (for/while/switch/try/
        // class/labelled statements) is skipped as an opaque unit.
        if self.looks_like_expression_start() {
            return self.parse_expression_statement();
        }
        self.skip_unknown_statement()
    }

    fn looks_like_expression_start(&self) -> bool {
        matches!(
            self.cur.kind,
            TokenKind::Identifier
                | TokenKind::StringLiteral
                | TokenKind::NumberLiteral
                | TokenKind::BigIntLiteral
                | TokenKind::Backtick
                | TokenKind::OpenParen
                | TokenKind::OpenBrace
                | TokenKind::OpenBracket
                | TokenKind::Keyword(Keyword::Await)
                | TokenKind::Keyword(Keyword::New)
                | TokenKind::Keyword(Keyword::True)
                | TokenKind::Keyword(Keyword::False)
                | TokenKind::Keyword(Keyword::Null)
        )
    }

    /// Skip one statement-shaped unit we don't model (loops, switch, try,
    /// classes, ...), balancing braces/parens/brackets so the cursor ends
    /// up past it cleanly. Intentionally does not recurse into it, so any
    /// candidate sites nested inside are not discovered — see module docs.
    fn skip_unknown_statement(&mut self) -> PResult<NodeIndex> {
        let start = self.cur.span.start;
        let mut depth: i32 = 0;
        loop {
            match self.cur.kind {
                TokenKind::Eof => break,
                TokenKind::OpenBrace | TokenKind::OpenParen | TokenKind::OpenBracket => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::CloseBrace | TokenKind::CloseParen | TokenKind::CloseBracket => {
                    depth -= 1;
                    self.bump();
                    if depth <= 0 {
                        break;
                    }
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.bump();
                    break;
                }
                _ => {
                    self.bump();
                }
            }
        }
        let end = self.scanner.pos().max(start);
        Ok(self.arena.alloc(NodeKind::UnknownStatement, Span::new(start, end)))
    }

    fn parse_block(&mut self) -> PResult<NodeIndex> {
        let open = self.expect(TokenKind::OpenBrace, "'{'")?;
        let mut stmts = Vec::new();
        while !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::Eof) {
            stmts.push(self.parse_statement()?);
        }
        let close = self.expect(TokenKind::CloseBrace, "'}'")?;
        let block = self.arena.alloc(NodeKind::Block, Span::new(open.span.start, close.span.end));
        self.arena.set_children(block, stmts);
        Ok(block)
    }

    fn parse_if_statement(&mut self) -> PResult<NodeIndex> {
        let kw = self.expect(TokenKind::Keyword(Keyword::If), "'if'")?;
        self.expect(TokenKind::OpenParen, "'('")?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::CloseParen, "')'")?;
        let then_branch = self.parse_statement()?;
        let mut children = vec![cond, then_branch];
        let mut end = self.arena.span(then_branch).end;
        if self.at_kw(Keyword::Else) {
            self.bump();
            let else_branch = self.parse_statement()?;
            end = self.arena.span(else_branch).end;
            children.push(else_branch);
        }
        let node = self.arena.alloc(NodeKind::IfStatement, Span::new(kw.span.start, end));
        self.arena.set_children(node, children);
        Ok(node)
    }

    fn parse_return_statement(&mut self) -> PResult<NodeIndex> {
        let kw = self.expect(TokenKind::Keyword(Keyword::Return), "'return'")?;
        let mut end = kw.span.end;
        let mut children = Vec::new();
        if !self.at(TokenKind::Semicolon) && !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::Eof) {
            let expr = self.parse_expression()?;
            end = self.arena.span(expr).end;
            children.push(expr);
        }
        if self.at(TokenKind::Semicolon) {
            end = self.bump().span.end;
        }
        let node = self.arena.alloc(NodeKind::ReturnStatement, Span::new(kw.span.start, end));
        self.arena.set_children(node, children);
        Ok(node)
    }

    fn parse_expression_statement(&mut self) -> PResult<NodeIndex> {
        let start = self.cur.span.start;
        let expr = self.parse_expression()?;
        let mut end = self.arena.span(expr).end;
        if self.at(TokenKind::Semicolon) {
            end = self.bump().span.end;
        }
        let node = self.arena.alloc(NodeKind::ExpressionStatement, Span::new(start, end));
        self.arena.set_children(node, vec![expr]);
        Ok(node)
    }

    fn parse_variable_statement(&mut self, exported: bool) -> PResult<NodeIndex> {
        let start_kw = self.bump(); // const | let | var
        let mut decls = Vec::new();
        loop {
            let name_start = self.cur.span.start;
            let name = self.ident_text()?;
            let mut ty = None;
            if self.at(TokenKind::Colon) {
                self.bump();
                ty = Some(self.parse_type()?);
            }
            let mut init = None;
            if self.at(TokenKind::Equals) {
                self.bump();
                init = Some(self.parse_assignment()?);
            }
            let end = init
                .map(|i| self.arena.span(i).end)
                .or_else(|| ty.map(|t| self.arena.span(t).end))
                .unwrap_or(self.cur.span.start);
            let decl = self.arena.alloc(NodeKind::VariableDeclarator, Span::new(name_start, end));
            self.arena.set_name(decl, name);
            if let Some(t) = ty {
                self.arena.set_type_annotation(decl, t);
            }
            if let Some(i) = init {
                self.arena.set_initializer(decl, i);
            }
            decls.push(decl);
            if self.at(TokenKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        let mut end = decls.last().map(|d| self.arena.span(*d).end).unwrap_or(start_kw.span.end);
        if self.at(TokenKind::Semicolon) {
            end = self.bump().span.end;
        }
        let stmt = self.arena.alloc(NodeKind::VariableStatement, Span::new(start_kw.span.start, end));
        self.arena.set_children(stmt, decls);
        self.arena.set_flags(stmt, NodeFlags { is_exported: exported, ..Default::default() });
        Ok(stmt)
    }

    // ---- function-likes ----

    fn parse_type_parameter_list(&mut self) -> PResult<Vec<(String, Option<NodeIndex>)>> {
        let mut out = Vec::new();
        if !self.at(TokenKind::LessThan) {
            return Ok(out);
        }
        self.bump();
        loop {
            if self.at(TokenKind::GreaterThan) {
                break;
            }
            let name = self.ident_text()?;
            let mut constraint = None;
            if self.at_kw(Keyword::Extends) {
                self.bump();
                constraint = Some(self.parse_type()?);
            }
            if self.at(TokenKind::Equals) {
                self.bump();
                let _default = self.parse_type()?;
            }
            out.push((name, constraint));
            if self.at(TokenKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        self.expect(TokenKind::GreaterThan, "'>'")?;
        Ok(out)
    }

    fn parse_function_declaration(&mut self, exported: bool) -> PResult<NodeIndex> {
        let start = self.cur.span.start;
        let is_async = if self.at_kw(Keyword::Async) {
            self.bump();
            true
        } else {
            false
        };
        self.expect(TokenKind::Keyword(Keyword::Function), "'function'")?;
        let name = if self.at(TokenKind::Identifier) { Some(self.ident_text()?) } else { None };
        let type_params = self.parse_type_parameter_list()?;
        self.expect(TokenKind::OpenParen, "'('")?;
        let params = self.parse_parameter_list()?;
        self.expect(TokenKind::CloseParen, "')'")?;
        let return_type = if self.at(TokenKind::Colon) {
            self.bump();
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = if self.at(TokenKind::OpenBrace) {
            Some(self.parse_block()?)
        } else {
            if self.at(TokenKind::Semicolon) {
                self.bump();
            }
            None
        };
        let end = body
            .map(|b| self.arena.span(b).end)
            .or_else(|| return_type.map(|t| self.arena.span(t).end))
            .unwrap_or(self.cur.span.start);
        let fn_idx = self.arena.alloc(NodeKind::FunctionDeclaration, Span::new(start, end));
        self.arena.set_children(fn_idx, params);
        if let Some(n) = name {
            self.arena.set_name(fn_idx, n);
        }
        if let Some(t) = return_type {
            self.arena.set_return_type(fn_idx, t);
        }
        if let Some(b) = body {
            self.arena.set_body(fn_idx, b);
        }
        self.arena.set_flags(fn_idx, NodeFlags { is_async, is_exported: exported, ..Default::default() });
        if !type_params.is_empty() {
            self.type_params_of.insert(fn_idx, type_params);
        }
        Ok(fn_idx)
    }

    fn parse_parameter_list(&mut self) -> PResult<Vec<NodeIndex>> {
        let mut params = Vec::new();
        while !self.at(TokenKind::CloseParen) && !self.at(TokenKind::Eof) {
            let start = self.cur.span.start;
            let is_rest = if self.at(TokenKind::Ellipsis) {
                self.bump();
                true
            } else {
                false
            };
            let name = self.ident_text()?;
            let mut optional = if self.at(TokenKind::Question) {
                self.bump();
                true
            } else {
                false
            };
            let ty = if self.at(TokenKind::Colon) {
                self.bump();
                Some(self.parse_type()?)
            } else {
                None
            };
            if self.at(TokenKind::Equals) {
                self.bump();
                let _default = self.parse_assignment()?;
                optional = true;
            }
            let end = self.cur.span.start;
            let param = self.arena.alloc(NodeKind::Parameter, Span::new(start, end));
            self.arena.set_name(param, name);
            if let Some(t) = ty {
                self.arena.set_type_annotation(param, t);
            }
            self.arena.set_flags(param, NodeFlags { optional, is_rest, ..Default::default() });
            params.push(param);
            if self.at(TokenKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        Ok(params)
    }

    // ---- expressions ----

    fn parse_expression(&mut self) -> PResult<NodeIndex> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> PResult<NodeIndex> {
        if let Some(arrow) = self.try_parse_arrow()? {
            return Ok(arrow);
        }
        let lhs = self.parse_await_or_unary()?;
        if self.at(TokenKind::Equals) {
            self.bump();
            let rhs = self.parse_assignment()?;
            let span = Span::new(self.arena.span(lhs).start, self.arena.span(rhs).end);
            let node = self.arena.alloc(NodeKind::AssignmentExpression, span);
            self.arena.set_children(node, vec![lhs, rhs]);
            return Ok(node);
        }
        Ok(lhs)
    }

    fn try_parse_arrow(&mut self) -> PResult<Option<NodeIndex>> {
        if !(self.at(TokenKind::OpenParen) || self.at(TokenKind::Identifier) || self.at_kw(Keyword::Async)) {
            return Ok(None);
        }
        let cp = self.checkpoint();
        match self.attempt_parse_arrow() {
            Ok(Some(idx)) => Ok(Some(idx)),
            Ok(None) | Err(_) => {
                self.restore(cp);
                Ok(None)
            }
        }
    }

    fn attempt_parse_arrow(&mut self) -> PResult<Option<NodeIndex>> {
        let start = self.cur.span.start;
        let is_async = if self.at_kw(Keyword::Async) {
            self.bump();
            true
        } else {
            false
        };
        let params = if self.at(TokenKind::OpenParen) {
            self.bump();
            let p = self.parse_parameter_list()?;
            if !self.at(TokenKind::CloseParen) {
                return Ok(None);
            }
            self.bump();
            p
        } else if self.at(TokenKind::Identifier) {
            let pname_start = self.cur.span.start;
            let name = self.ident_text()?;
            let p = self.arena.alloc(NodeKind::Parameter, Span::new(pname_start, self.cur.span.start));
            self.arena.set_name(p, name);
            vec![p]
        } else {
            return Ok(None);
        };
        let return_type = if self.at(TokenKind::Colon) {
            self.bump();
            Some(self.parse_type()?)
        } else {
            None
        };
        if !self.at(TokenKind::EqualsGreaterThan) {
            return Ok(None);
        }
        self.bump();
        let fn_idx_placeholder_span_start = start;
        let body_is_block = self.at(TokenKind::OpenBrace);
        let (end, body, expr_body) = if body_is_block {
            let b = self.parse_block()?;
            let e = self.arena.span(b).end;
            (e, Some(b), None)
        } else {
            let e = self.parse_assignment()?;
            let end = self.arena.span(e).end;
            (end, None, Some(e))
        };
        let fn_idx = self
            .arena
            .alloc(NodeKind::ArrowFunctionExpression, Span::new(fn_idx_placeholder_span_start, end));
        self.arena.set_children(fn_idx, params);
        if let Some(t) = return_type {
            self.arena.set_return_type(fn_idx, t);
        }
        if let Some(b) = body {
            self.arena.set_body(fn_idx, b);
        }
        if let Some(e) = expr_body {
            self.arena.set_arrow_expr_body(fn_idx, e);
        }
        self.arena.set_flags(fn_idx, NodeFlags { is_async, ..Default::default() });
        Ok(Some(fn_idx))
    }

    fn parse_await_or_unary(&mut self) -> PResult<NodeIndex> {
        if self.at_kw(Keyword::Await) {
            let kw = self.bump();
            let inner = self.parse_await_or_unary()?;
            let span = Span::new(kw.span.start, self.arena.span(inner).end);
            let node = self.arena.alloc(NodeKind::AwaitExpression, span);
            self.arena.set_children(node, vec![inner]);
            return Ok(node);
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PResult<NodeIndex> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.cur.kind {
                TokenKind::Dot | TokenKind::QuestionDot => {
                    let optional = self.cur.kind == TokenKind::QuestionDot;
                    self.bump();
                    let name = self.ident_text()?;
                    let end = self.cur.span.start;
                    let node = self.arena.alloc(
                        NodeKind::PropertyAccessExpression,
                        Span::new(self.arena.span(expr).start, end),
                    );
                    self.arena.set_children(node, vec![expr]);
                    self.arena.set_name(node, name);
                    self.arena.set_flags(node, NodeFlags { optional, ..Default::default() });
                    expr = node;
                }
                TokenKind::OpenParen => {
                    let mut args = vec![expr];
                    self.bump();
                    while !self.at(TokenKind::CloseParen) && !self.at(TokenKind::Eof) {
                        args.push(self.parse_assignment()?);
                        if self.at(TokenKind::Comma) {
                            self.bump();
                            continue;
                        }
                        break;
                    }
                    let close = self.expect(TokenKind::CloseParen, "')'")?;
                    let node = self.arena.alloc(
                        NodeKind::CallExpression,
                        Span::new(self.arena.span(expr).start, close.span.end),
                    );
                    self.arena.set_children(node, args);
                    expr = node;
                }
                TokenKind::Keyword(Keyword::As) => {
                    self.bump();
                    let ty = self.parse_type()?;
                    let span = Span::new(self.arena.span(expr).start, self.arena.span(ty).end);
                    let node = self.arena.alloc(NodeKind::AsExpression, span);
                    self.arena.set_children(node, vec![expr, ty]);
                    expr = node;
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<NodeIndex> {
        match self.cur.kind {
            TokenKind::Identifier => {
                let tok = self.bump();
                let node = self.arena.alloc(NodeKind::Identifier, tok.span);
                self.arena.set_name(node, self.text_of(tok.span).to_string());
                Ok(node)
            }
            TokenKind::Keyword(Keyword::True) | TokenKind::Keyword(Keyword::False) => {
                let tok = self.bump();
                let node = self.arena.alloc(NodeKind::BooleanLiteralExpr, tok.span);
                self.arena
                    .set_literal(node, LiteralValue::Boolean(tok.kind == TokenKind::Keyword(Keyword::True)));
                Ok(node)
            }
            TokenKind::Keyword(Keyword::Null) => {
                let tok = self.bump();
                Ok(self.arena.alloc(NodeKind::NullLiteralExpr, tok.span))
            }
            TokenKind::StringLiteral => {
                let tok = self.bump();
                let raw = self.text_of(tok.span);
                let value = unquote(raw);
                let node = self.arena.alloc(NodeKind::StringLiteralExpr, tok.span);
                self.arena.set_literal(node, LiteralValue::String(value));
                Ok(node)
            }
            TokenKind::NumberLiteral => {
                let tok = self.bump();
                let raw = self.text_of(tok.span);
                let value: f64 = raw.parse().unwrap_or(f64::NAN);
                let node = self.arena.alloc(NodeKind::NumberLiteralExpr, tok.span);
                self.arena.set_literal(node, LiteralValue::Number(value));
                Ok(node)
            }
            TokenKind::Backtick => {
                let start = self.cur.span.start;
                let (span, _placeholders) = self.scanner.scan_template(start);
                let node = self.arena.alloc(NodeKind::TemplateLiteralExpr, span);
                self.cur = self.scanner.next_token();
                Ok(node)
            }
            TokenKind::OpenParen => {
                self.bump();
                let inner = self.parse_expression()?;
                let close = self.expect(TokenKind::CloseParen, "')'")?;
                let node = self
                    .arena
                    .alloc(NodeKind::ParenthesizedExpression, Span::new(self.arena.span(inner).start, close.span.end));
                self.arena.set_children(node, vec![inner]);
                Ok(node)
            }
            TokenKind::OpenBrace => {
                let span = self.skip_balanced();
                Ok(self.arena.alloc(NodeKind::ObjectLiteralExpression, span))
            }
            TokenKind::OpenBracket => {
                let span = self.skip_balanced();
                Ok(self.arena.alloc(NodeKind::ArrayLiteralExpression, span))
            }
            TokenKind::Keyword(Keyword::New) => {
                // `new Foo(...)` - treat the whole construct opaquely; we
                // don't need constructor semantics for site planning.
                let start = self.cur.span.start;
                self.bump();
                let _callee = self.parse_postfix()?;
                Ok(self.arena.alloc(NodeKind::UnknownExpression, Span::new(start, self.cur.span.start)))
            }
            _ => {
                let tok = self.bump();
                Ok(self.arena.alloc(NodeKind::UnknownExpression, tok.span))
            }
        }
    }

    fn skip_balanced(&mut self) -> Span {
        let start = self.cur.span.start;
        let mut depth: i32 = 0;
        loop {
            match self.cur.kind {
                TokenKind::Eof => break,
                TokenKind::OpenBrace | TokenKind::OpenBracket | TokenKind::OpenParen => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::CloseBrace | TokenKind::CloseBracket | TokenKind::CloseParen => {
                    depth -= 1;
                    self.bump();
                    if depth <= 0 {
                        break;
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
        Span::new(start, self.scanner.pos().max(start))
    }

    // ---- types ----

    fn parse_type(&mut self) -> PResult<NodeIndex> {
        self.parse_union_type()
    }

    fn parse_union_type(&mut self) -> PResult<NodeIndex> {
        // Leading `|` is legal TS (`type T = | A | B`).
        if self.at(TokenKind::Pipe) {
            self.bump();
        }
        let first = self.parse_intersection_type()?;
        if !self.at(TokenKind::Pipe) {
            return Ok(first);
        }
        let mut arms = vec![first];
        while self.at(TokenKind::Pipe) {
            self.bump();
            arms.push(self.parse_intersection_type()?);
        }
        let span = Span::new(
            self.arena.span(arms[0]).start,
            self.arena.span(*arms.last().unwrap()).end,
        );
        let node = self.arena.alloc(NodeKind::UnionType, span);
        self.arena.set_children(node, arms);
        Ok(node)
    }

    fn parse_intersection_type(&mut self) -> PResult<NodeIndex> {
        if self.at(TokenKind::Ampersand) {
            self.bump();
        }
        let first = self.parse_postfix_type()?;
        if !self.at(TokenKind::Ampersand) {
            return Ok(first);
        }
        let mut arms = vec![first];
        while self.at(TokenKind::Ampersand) {
            self.bump();
            arms.push(self.parse_postfix_type()?);
        }
        let span = Span::new(
            self.arena.span(arms[0]).start,
            self.arena.span(*arms.last().unwrap()).end,
        );
        let node = self.arena.alloc(NodeKind::IntersectionType, span);
        self.arena.set_children(node, arms);
        Ok(node)
    }

    fn parse_postfix_type(&mut self) -> PResult<NodeIndex> {
        let mut base = self.parse_primary_type()?;
        while self.at(TokenKind::OpenBracket) {
            self.bump();
            if self.at(TokenKind::CloseBracket) {
                let close = self.bump();
                let span = Span::new(self.arena.span(base).start, close.span.end);
                let node = self.arena.alloc(NodeKind::ArrayType, span);
                self.arena.set_children(node, vec![base]);
                base = node;
            } else {
                // indexed access type `T[K]` - not modeled; skip to `]`.
                let _index = self.parse_type()?;
                self.expect(TokenKind::CloseBracket, "']'")?;
            }
        }
        Ok(base)
    }

    fn parse_primary_type(&mut self) -> PResult<NodeIndex> {
        match self.cur.kind {
            TokenKind::Keyword(kw) if primitive_for(kw).is_some() => {
                let tok = self.bump();
                let node = self.arena.alloc(NodeKind::PrimitiveType, tok.span);
                self.arena.set_primitive(node, primitive_for(kw).unwrap());
                Ok(node)
            }
            TokenKind::Keyword(Keyword::True) | TokenKind::Keyword(Keyword::False) => {
                let tok = self.bump();
                let node = self.arena.alloc(NodeKind::LiteralType, tok.span);
                self.arena
                    .set_literal(node, LiteralValue::Boolean(tok.kind == TokenKind::Keyword(Keyword::True)));
                Ok(node)
            }
            TokenKind::StringLiteral => {
                let tok = self.bump();
                let node = self.arena.alloc(NodeKind::LiteralType, tok.span);
                self.arena.set_literal(node, LiteralValue::String(unquote(self.text_of(tok.span))));
                Ok(node)
            }
            TokenKind::NumberLiteral => {
                let tok = self.bump();
                let raw = self.text_of(tok.span);
                let node = self.arena.alloc(NodeKind::LiteralType, tok.span);
                self.arena.set_literal(node, LiteralValue::Number(raw.parse().unwrap_or(f64::NAN)));
                Ok(node)
            }
            TokenKind::BigIntLiteral => {
                let tok = self.bump();
                let raw = self.text_of(tok.span).trim_end_matches('n').to_string();
                let node = self.arena.alloc(NodeKind::LiteralType, tok.span);
                self.arena.set_literal(node, LiteralValue::Bigint(raw));
                Ok(node)
            }
            TokenKind::Backtick => self.parse_template_literal_type(),
            TokenKind::OpenParen => {
                self.bump();
                let inner = self.parse_type()?;
                let close = self.expect(TokenKind::CloseParen, "')'")?;
                let span = Span::new(self.arena.span(inner).start, close.span.end);
                let node = self.arena.alloc(NodeKind::ParenthesizedType, span);
                self.arena.set_children(node, vec![inner]);
                Ok(node)
            }
            TokenKind::OpenBracket => self.parse_tuple_type(),
            TokenKind::OpenBrace => self.parse_object_type(),
            TokenKind::Identifier => {
                let tok = self.bump();
                let name = self.text_of(tok.span).to_string();
                let mut qualified = name.clone();
                while self.at(TokenKind::Dot) {
                    self.bump();
                    let part = self.ident_text()?;
                    qualified.push('.');
                    qualified.push_str(&part);
                }
                let mut end = self.cur.span.start;
                if self.at(TokenKind::LessThan) {
                    self.skip_type_arguments()?;
                    end = self.cur.span.start;
                }
                let node = self.arena.alloc(NodeKind::TypeReference, Span::new(tok.span.start, end.max(tok.span.end)));
                self.arena.set_name(node, qualified);
                Ok(node)
            }
            _ => {
                // Unsupported type syntax (conditional/mapped/infer/typeof
                // queries, etc.) - degrade to an untyped reference so the
                // caller can treat it as `Unsupported` rather than
                // aborting the whole parse.
                let tok = self.bump();
                let node = self.arena.alloc(NodeKind::TypeReference, tok.span);
                self.arena.set_name(node, "__unsupported__".to_string());
                Ok(node)
            }
        }
    }

    fn skip_type_arguments(&mut self) -> PResult<()> {
        self.bump(); // `<`
        let mut depth = 1i32;
        while depth > 0 && !self.at(TokenKind::Eof) {
            match self.cur.kind {
                TokenKind::LessThan => depth += 1,
                TokenKind::GreaterThan => depth -= 1,
                _ => {}
            }
            self.bump();
        }
        Ok(())
    }

    fn parse_tuple_type(&mut self) -> PResult<NodeIndex> {
        let open = self.expect(TokenKind::OpenBracket, "'['")?;
        let mut elems = Vec::new();
        while !self.at(TokenKind::CloseBracket) && !self.at(TokenKind::Eof) {
            let is_rest = if self.at(TokenKind::Ellipsis) {
                self.bump();
                true
            } else {
                false
            };
            let elem = self.parse_type()?;
            if is_rest {
                self.arena.set_flags(elem, NodeFlags { is_rest: true, ..self.arena.flags(elem) });
            }
            elems.push(elem);
            if self.at(TokenKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        let close = self.expect(TokenKind::CloseBracket, "']'")?;
        let node = self.arena.alloc(NodeKind::TupleType, Span::new(open.span.start, close.span.end));
        self.arena.set_children(node, elems);
        Ok(node)
    }

    fn parse_object_type(&mut self) -> PResult<NodeIndex> {
        let open = self.expect(TokenKind::OpenBrace, "'{'")?;
        let members = self.parse_type_members_until_close_brace()?;
        let close = self.expect(TokenKind::CloseBrace, "'}'")?;
        let node = self.arena.alloc(NodeKind::ObjectType, Span::new(open.span.start, close.span.end));
        self.arena.set_children(node, members);
        Ok(node)
    }

    fn parse_type_members_until_close_brace(&mut self) -> PResult<Vec<NodeIndex>> {
        let mut members = Vec::new();
        while !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::Eof) {
            let start = self.cur.span.start;
            let readonly = if self.at_kw(Keyword::Readonly) {
                self.bump();
                true
            } else {
                false
            };
            if self.at(TokenKind::OpenBracket) {
                self.bump();
                let _key_name = self.ident_text()?;
                self.expect(TokenKind::Colon, "':'")?;
                let key_ty = self.parse_type()?;
                self.expect(TokenKind::CloseBracket, "']'")?;
                self.expect(TokenKind::Colon, "':'")?;
                let value_ty = self.parse_type()?;
                let end = self.arena.span(value_ty).end;
                let node = self.arena.alloc(NodeKind::IndexSignature, Span::new(start, end));
                self.arena.set_children(node, vec![key_ty, value_ty]);
                self.arena.set_flags(node, NodeFlags { readonly, ..Default::default() });
                members.push(node);
            } else {
                let name = if self.at(TokenKind::StringLiteral) {
                    let tok = self.bump();
                    unquote(self.text_of(tok.span))
                } else {
                    self.ident_text()?
                };
                let optional = if self.at(TokenKind::Question) {
                    self.bump();
                    true
                } else {
                    false
                };
                self.expect(TokenKind::Colon, "':'")?;
                let ty = self.parse_type()?;
                let end = self.arena.span(ty).end;
                let node = self.arena.alloc(NodeKind::PropertySignature, Span::new(start, end));
                self.arena.set_children(node, vec![ty]);
                self.arena.set_name(node, name);
                self.arena.set_flags(node, NodeFlags { optional, readonly, ..Default::default() });
                members.push(node);
            }
            if self.at(TokenKind::Comma) || self.at(TokenKind::Semicolon) {
                self.bump();
            }
        }
        Ok(members)
    }

    /// Parse a template literal TYPE by hand-scanning raw bytes: plain
    /// text chunks and `${...}` placeholders restricted to
    /// string/number/bigint/literal-union forms, per spec §3 I3 (a
    /// `TemplateLiteral`'s placeholders are restricted to exactly that
    /// set, so a full recursive type grammar inside `${}` isn't needed).
    fn parse_template_literal_type(&mut self) -> PResult<NodeIndex> {
        let start = self.cur.span.start;
        self.bump(); // consume the backtick token; scanner.pos is now just past it.
        let mut chunks = Vec::new();
        let mut text_start = self.scanner.pos();
        loop {
            match self.scanner.peek_byte() {
                None => break,
                Some(b'`') => {
                    let text_end = self.scanner.pos();
                    if text_end > text_start {
                        chunks.push(TemplateChunk::Text(raw_text(self.src, text_start, text_end)));
                    }
                    self.scanner.advance_byte();
                    break;
                }
                Some(b'$') if self.scanner.peek_byte_at(1) == Some(b'{') => {
                    let text_end = self.scanner.pos();
                    if text_end > text_start {
                        chunks.push(TemplateChunk::Text(raw_text(self.src, text_start, text_end)));
                    }
                    self.scanner.advance_byte();
                    self.scanner.advance_byte();
                    let placeholder = self.parse_template_placeholder()?;
                    chunks.push(TemplateChunk::Placeholder(placeholder));
                    text_start = self.scanner.pos();
                }
                Some(_) => {
                    self.scanner.advance_byte();
                }
            }
        }
        let end = self.scanner.pos();
        self.cur = self.scanner.next_token();
        let node = self.arena.alloc(NodeKind::TemplateLiteralType, Span::new(start, end));
        self.arena.set_template_chunks(node, chunks);
        Ok(node)
    }

    /// Parse the content of a single `${...}` placeholder inside a
    /// template literal type: a `|`-separated list of primitive keywords
    /// or literal values.
    fn parse_template_placeholder(&mut self) -> PResult<NodeIndex> {
        let mut arms = Vec::new();
        loop {
            while self.scanner.peek_byte() == Some(b' ') {
                self.scanner.advance_byte();
            }
            let word_start = self.scanner.pos();
            if self.scanner.peek_byte() == Some(b'\'') || self.scanner.peek_byte() == Some(b'"') {
                let quote = self.scanner.peek_byte().unwrap();
                self.scanner.advance_byte();
                while let Some(b) = self.scanner.peek_byte() {
                    self.scanner.advance_byte();
                    if b == quote {
                        break;
                    }
                }
                let raw = raw_text(self.src, word_start, self.scanner.pos());
                let node = self.arena.alloc(NodeKind::LiteralType, Span::new(word_start, self.scanner.pos()));
                self.arena.set_literal(node, LiteralValue::String(unquote(&raw)));
                arms.push(node);
            } else {
                while self.scanner.peek_byte().is_some_and(|b| b.is_ascii_alphanumeric()) {
                    self.scanner.advance_byte();
                }
                let word = raw_text(self.src, word_start, self.scanner.pos());
                let span = Span::new(word_start, self.scanner.pos());
                let node = match word.as_str() {
                    "string" => {
                        let n = self.arena.alloc(NodeKind::PrimitiveType, span);
                        self.arena.set_primitive(n, PrimitiveKind::String);
                        n
                    }
                    "number" => {
                        let n = self.arena.alloc(NodeKind::PrimitiveType, span);
                        self.arena.set_primitive(n, PrimitiveKind::Number);
                        n
                    }
                    "bigint" => {
                        let n = self.arena.alloc(NodeKind::PrimitiveType, span);
                        self.arena.set_primitive(n, PrimitiveKind::Bigint);
                        n
                    }
                    _ => {
                        let n = self.arena.alloc(NodeKind::TypeReference, span);
                        self.arena.set_name(n, word);
                        n
                    }
                };
                arms.push(node);
            }
            while self.scanner.peek_byte() == Some(b' ') {
                self.scanner.advance_byte();
            }
            if self.scanner.peek_byte() == Some(b'|') {
                self.scanner.advance_byte();
                continue;
            }
            break;
        }
        // consume the closing `}` of the placeholder.
        if self.scanner.peek_byte() == Some(b'}') {
            self.scanner.advance_byte();
        }
        if arms.len() == 1 {
            Ok(arms[0])
        } else {
            let span = Span::new(self.arena.span(arms[0]).start, self.arena.span(*arms.last().unwrap()).end);
            let node = self.arena.alloc(NodeKind::UnionType, span);
            self.arena.set_children(node, arms);
            Ok(node)
        }
    }

    // ---- declarations ----

    fn parse_interface_declaration(&mut self, exported: bool) -> PResult<NodeIndex> {
        let kw = self.expect(TokenKind::Keyword(Keyword::Interface), "'interface'")?;
        let name = self.ident_text()?;
        let type_params = self.parse_type_parameter_list()?;
        // skip `extends A, B` clause if present.
        if self.at_kw(Keyword::Extends) {
            while !self.at(TokenKind::OpenBrace) && !self.at(TokenKind::Eof) {
                self.bump();
            }
        }
        let open = self.expect(TokenKind::OpenBrace, "'{'")?;
        let members = self.parse_type_members_until_close_brace()?;
        let close = self.expect(TokenKind::CloseBrace, "'}'")?;
        let _ = open;
        let node = self.arena.alloc(NodeKind::InterfaceDeclaration, Span::new(kw.span.start, close.span.end));
        self.arena.set_children(node, members);
        self.arena.set_name(node, name);
        self.arena.set_flags(node, NodeFlags { is_exported: exported, ..Default::default() });
        if !type_params.is_empty() {
            self.type_params_of.insert(node, type_params);
        }
        Ok(node)
    }

    fn parse_type_alias_declaration(&mut self, exported: bool) -> PResult<NodeIndex> {
        let kw = self.expect(TokenKind::Keyword(Keyword::Type), "'type'")?;
        let name = self.ident_text()?;
        let type_params = self.parse_type_parameter_list()?;
        self.expect(TokenKind::Equals, "'='")?;
        let ty = self.parse_type()?;
        let mut end = self.arena.span(ty).end;
        if self.at(TokenKind::Semicolon) {
            end = self.bump().span.end;
        }
        let node = self.arena.alloc(NodeKind::TypeAliasDeclaration, Span::new(kw.span.start, end));
        self.arena.set_children(node, vec![ty]);
        self.arena.set_name(node, name);
        self.arena.set_flags(node, NodeFlags { is_exported: exported, ..Default::default() });
        if !type_params.is_empty() {
            self.type_params_of.insert(node, type_params);
        }
        Ok(node)
    }
}

fn primitive_for(kw: Keyword) -> Option<PrimitiveKind> {
    Some(match kw {
        Keyword::String => PrimitiveKind::String,
        Keyword::Number => PrimitiveKind::Number,
        Keyword::Boolean => PrimitiveKind::Boolean,
        Keyword::Bigint => PrimitiveKind::Bigint,
        Keyword::Null => PrimitiveKind::Null,
        Keyword::Undefined => PrimitiveKind::Undefined,
        Keyword::Any => PrimitiveKind::Any,
        Keyword::Unknown => PrimitiveKind::Unknown,
        Keyword::Never => PrimitiveKind::Never,
        Keyword::Void => PrimitiveKind::Void,
        _ => return None,
    })
}

fn raw_text(src: &str, start: u32, end: u32) -> String {
    src.get(start as usize..end as usize).unwrap_or("").to_string()
}

/// Strip surrounding quotes and resolve the small set of escapes we
/// actually need for literal TypeModel comparisons.
fn unquote(raw: &str) -> String {
    let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/parser.rs"]
mod tests;
