//! JavaScript parser infrastructure.
//!
//! - [`scanner`] — ES2025 lexer that converts raw source text into a
//!   stream of [`scanner::Token`]s.
//! - [`ast`] — ES2025 Abstract Syntax Tree node definitions.
//! - [`plugin`] — the hook points through which extensions change how
//!   tokens are read and how individual productions parse.
//! - [`Parser`] — recursive-descent parser producing an [`ast::Program`].

/// ES2025 Abstract Syntax Tree node types.
pub mod ast;
/// Token-cursor helpers shared by every production.
mod cursor;
/// Expression productions.
mod expression;
/// Destructuring targets and their validation.
mod pattern;
/// Extension hooks.
pub mod plugin;
/// ES2025 JavaScript lexer.
pub mod scanner;
/// Statement and module-item productions.
mod statement;

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::options::ParserOptions;
use ast::{Directive, Expr, Name, NodeList, Pat, Program, SourceType, Stmt, VarDeclarator, VarKind};
use plugin::PluginSet;
use scanner::{Position, Scanner, Token, TokenKind, TokenValue};
use tracing::debug;

/// The result of the block-body production: a directive prologue followed by
/// statements.
#[derive(Debug, Clone, Default)]
pub struct BlockBody {
    pub directives: Vec<Directive>,
    pub body: NodeList<Stmt>,
}

/// Where an assignment or binding target appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LValContext {
    /// Left of `=` or a compound assignment operator.
    Assignment,
    /// Operand of `++` / `--`.
    Update,
    /// Left of `in` / `of` in a `for` head without a declaration.
    ForInOf,
    /// A declared name or pattern.
    Declaration(VarKind),
    /// A formal parameter.
    Param,
    /// The `catch (…)` binding.
    CatchClause,
}

impl LValContext {
    /// `true` when the target introduces a new binding.
    pub fn is_binding(self) -> bool {
        matches!(
            self,
            LValContext::Declaration(_) | LValContext::Param | LValContext::CatchClause
        )
    }

    /// Phrase used in `Invalid left-hand side in …` messages.
    pub fn describe(self) -> &'static str {
        match self {
            LValContext::Assignment => "assignment expression",
            LValContext::Update => "update expression",
            LValContext::ForInOf => "for-in/of statement",
            LValContext::Declaration(_) => "variable declaration",
            LValContext::Param => "function parameter list",
            LValContext::CatchClause => "catch clause",
        }
    }
}

pub(crate) const SHORTHAND_DEFAULT: &str = "Invalid shorthand property initializer";
pub(crate) const PARENTHESIZED_PATTERN: &str = "Invalid parenthesized assignment pattern";

/// Flags describing the syntactic region being parsed.
///
/// Saved and restored around functions, classes and bracketed groups with
/// [`Parser::with_context`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Context {
    pub strict: bool,
    pub in_function: bool,
    pub in_generator: bool,
    pub in_async: bool,
    /// `in` is not a binary operator (the head of a `for` statement).
    pub no_in: bool,
}

/// Recursive-descent ES2025 parser.
///
/// Each hookable production has a public entry point that runs the
/// installed plugins and a crate-private `*_base` method holding the
/// built-in grammar.
///
/// # Example
///
/// ```
/// use jspat_core::options::ParserOptions;
/// use jspat_core::parser::Parser;
///
/// let program = Parser::new("let x = 1;", &ParserOptions::default())
///     .and_then(|mut p| p.parse_program())
///     .unwrap();
/// assert_eq!(program.body.len(), 1);
/// ```
pub struct Parser<'src> {
    source: &'src str,
    scanner: Scanner<'src>,
    /// The current (not yet consumed) token.  Never a comment.
    token: Token,
    /// End of the most recently consumed token.
    prev_token_end: Position,
    plugins: PluginSet,
    source_type: SourceType,
    allow_return_outside_function: bool,
    ctx: Context,
    /// Productions currently open, see [`Parser::nested`].
    depth: usize,
    max_depth: usize,
    /// Byte ranges of expressions that were written inside parentheses.
    parenthesized: HashSet<(usize, usize)>,
    /// The first `{ a = 1 }` shorthand default not yet turned into a
    /// pattern by a following `=`, `=>` or `of`.
    shorthand_default: Option<Position>,
    /// The next [`Parser::parse_maybe_assign`] may hand a pending shorthand
    /// default back to its caller.
    cover_allowed: bool,
}

impl<'src> Parser<'src> {
    /// Create a parser over `source` and read the first token.
    pub fn new(source: &'src str, options: &ParserOptions) -> Result<Self> {
        let plugins = options.plugin_set();
        let mut parser = Self {
            source,
            scanner: Scanner::with_plugins(source, plugins.clone()),
            token: Token {
                kind: TokenKind::Eof,
                value: TokenValue::None,
                span: scanner::Span {
                    start: Position::ORIGIN,
                    end: Position::ORIGIN,
                },
                had_line_terminator_before: false,
            },
            prev_token_end: Position::ORIGIN,
            plugins,
            source_type: options.source_type,
            allow_return_outside_function: options.allow_return_outside_function,
            ctx: Context {
                strict: options.source_type == SourceType::Module,
                ..Context::default()
            },
            depth: 0,
            max_depth: options.max_depth,
            parenthesized: HashSet::new(),
            shorthand_default: None,
            cover_allowed: false,
        };
        parser.next()?;
        parser.prev_token_end = Position::ORIGIN;
        Ok(parser)
    }

    /// The complete source text.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// The installed plugins.
    pub fn plugins(&self) -> &PluginSet {
        &self.plugins
    }

    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    /// Whether the current position is strict-mode code.
    pub fn is_strict(&self) -> bool {
        self.ctx.strict
    }

    /// Whether the current position is inside a generator body.
    pub fn in_generator(&self) -> bool {
        self.ctx.in_generator
    }

    /// `true` when the expression at `loc` was written inside parentheses.
    pub fn is_parenthesized(&self, loc: scanner::Span) -> bool {
        self.parenthesized
            .contains(&(loc.start.offset, loc.end.offset))
    }

    pub(crate) fn mark_parenthesized(&mut self, loc: scanner::Span) {
        self.parenthesized.insert((loc.start.offset, loc.end.offset));
    }

    /// The scanner, positioned just past the current token.
    pub(crate) fn scanner(&self) -> &Scanner<'src> {
        &self.scanner
    }

    // ── Entry points ────────────────────────────────────────────────────────

    /// Parse a complete script or module.
    pub fn parse_program(&mut self) -> Result<Program> {
        let top = Context {
            in_function: self.allow_return_outside_function,
            in_async: self.source_type == SourceType::Module,
            ..self.ctx
        };
        debug!(
            source_type = ?self.source_type,
            len = self.source.len(),
            "parse program"
        );
        let BlockBody { directives, body } =
            self.with_context(top, |p| p.parse_block_body(TokenKind::Eof, true, true))?;
        debug!(statements = body.len(), list_capture = body.is_capture(), "parsed program");
        Ok(Program {
            loc: scanner::Span {
                start: Position::ORIGIN,
                end: self.token.span.end,
            },
            source_type: self.source_type,
            directives,
            body,
        })
    }

    /// Parse a single expression that must span the whole input.
    pub fn parse_standalone_expression(&mut self) -> Result<Expr> {
        let expr = self.parse_expression()?;
        if !self.at(TokenKind::Eof) {
            return self.unexpected();
        }
        Ok(expr)
    }

    // ── Hookable productions ────────────────────────────────────────────────

    pub fn parse_identifier(&mut self, liberal: bool) -> Result<Name> {
        self.plugins.clone().parse_identifier(self, liberal)
    }

    pub fn parse_function_id(&mut self, require: bool) -> Result<Option<Name>> {
        self.plugins.clone().parse_function_id(self, require)
    }

    pub fn parse_binding_atom(&mut self) -> Result<Pat> {
        self.nested(|p| p.plugins.clone().parse_binding_atom(p))
    }

    pub fn parse_expr_atom(&mut self) -> Result<Expr> {
        self.nested(|p| p.plugins.clone().parse_expr_atom(p))
    }

    /// `AssignmentExpression`.
    ///
    /// An object literal holding `{ a = 1 }` is only valid once it becomes a
    /// pattern, so one left over here is an error.
    pub fn parse_maybe_assign(&mut self) -> Result<Expr> {
        let cover_allowed = std::mem::take(&mut self.cover_allowed);
        let outer = self.shorthand_default.take();
        let expr = self.nested(|p| p.plugins.clone().parse_maybe_assign(p))?;
        let inner = self.shorthand_default.take();
        if let Some(pos) = inner.filter(|_| !cover_allowed) {
            return Err(Error::syntax(SHORTHAND_DEFAULT, pos));
        }
        self.shorthand_default = outer.or(inner);
        Ok(expr)
    }

    /// [`Parser::parse_maybe_assign`] for an element of an array or object
    /// literal or a bracketed list, which may still become a pattern.
    pub(crate) fn parse_maybe_assign_cover(&mut self) -> Result<Expr> {
        self.cover_allowed = true;
        self.parse_maybe_assign()
    }

    pub fn parse_var(&mut self, kind: VarKind, is_for: bool) -> Result<NodeList<VarDeclarator>> {
        self.plugins.clone().parse_var(self, kind, is_for)
    }

    pub fn parse_block_body(
        &mut self,
        end: TokenKind,
        allow_directives: bool,
        top_level: bool,
    ) -> Result<BlockBody> {
        self.plugins
            .clone()
            .parse_block_body(self, end, allow_directives, top_level)
    }

    pub fn parse_binding_list(
        &mut self,
        close: TokenKind,
        allow_empty: bool,
    ) -> Result<NodeList<Option<Pat>>> {
        self.plugins
            .clone()
            .parse_binding_list(self, close, allow_empty)
    }

    pub fn parse_expr_list(
        &mut self,
        close: TokenKind,
        allow_empty: bool,
    ) -> Result<NodeList<Option<Expr>>> {
        self.plugins.clone().parse_expr_list(self, close, allow_empty)
    }

    pub fn parse_call_arguments(&mut self, close: TokenKind) -> Result<NodeList<Expr>> {
        self.plugins.clone().parse_call_arguments(self, close)
    }

    pub fn parse_paren_items(&mut self) -> Result<NodeList<Expr>> {
        self.plugins.clone().parse_paren_items(self)
    }

    pub fn check_lval(&mut self, pat: &Pat, ctx: LValContext) -> Result<()> {
        self.plugins.clone().check_lval(self, pat, ctx)
    }

    pub fn to_assignable_list(
        &mut self,
        list: NodeList<Option<Expr>>,
    ) -> Result<NodeList<Option<Pat>>> {
        self.plugins.clone().to_assignable_list(self, list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::*;

    fn parse(src: &str) -> Program {
        crate::parse(src, &ParserOptions::default()).unwrap()
    }

    fn parse_module(src: &str) -> Program {
        let options = ParserOptions::default().with_source_type(SourceType::Module);
        crate::parse(src, &options).unwrap()
    }

    fn parse_err(src: &str) -> String {
        crate::parse(src, &ParserOptions::default())
            .unwrap_err()
            .message()
            .unwrap_or_default()
            .to_string()
    }

    fn stmts(program: &Program) -> &[Stmt] {
        program.body.items().unwrap()
    }

    fn expr_of(src: &str) -> Expr {
        crate::parse_expression(src, &ParserOptions::default()).unwrap()
    }

    // ── Statements ───────────────────────────────────────────────────────────

    #[test]
    fn test_var_declarations() {
        let program = parse("var a = 1, b; let [c] = d; const {e} = f;");
        let kinds: Vec<_> = stmts(&program)
            .iter()
            .map(|s| match s {
                Stmt::VarDecl(d) => (d.kind, d.declarators.len()),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![(VarKind::Var, 2), (VarKind::Let, 1), (VarKind::Const, 1)]
        );
    }

    #[test]
    fn test_let_as_identifier() {
        let program = parse("let = 1;");
        assert!(matches!(&stmts(&program)[0], Stmt::Expr(_)));
    }

    #[test]
    fn test_const_requires_initializer() {
        assert_eq!(parse_err("const a;"), "Missing initializer in const declaration");
    }

    #[test]
    fn test_directive_prologue_is_collected() {
        let program = parse("'use client'; \"other\"; x;");
        let values: Vec<_> = program.directives.iter().map(|d| d.value.as_str()).collect();
        assert_eq!(values, vec!["use client", "other"]);
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_use_strict_rejects_with() {
        assert_eq!(parse_err("'use strict'; with (a) {}"), "'with' in strict mode");
    }

    #[test]
    fn test_for_variants() {
        let program = parse(
            "for (;;) {} for (var i = 0; i < n; i++) {} for (k in o) {} \
             for (const v of xs) {} for (let [a, b] of pairs) ;",
        );
        let body = stmts(&program);
        assert!(matches!(body[0], Stmt::For(_)));
        assert!(matches!(body[1], Stmt::For(_)));
        assert!(matches!(&body[2], Stmt::ForIn(f) if matches!(f.left, ForInOfLeft::Pat(Pat::Ident(_)))));
        assert!(matches!(&body[3], Stmt::ForOf(f) if matches!(f.left, ForInOfLeft::VarDecl(_))));
        assert!(matches!(body[4], Stmt::ForOf(_)));
    }

    #[test]
    fn test_in_operator_inside_for_init_parens() {
        let program = parse("for (var x = (a in b); x;) {}");
        assert!(matches!(stmts(&program)[0], Stmt::For(_)));
    }

    #[test]
    fn test_control_flow_statements() {
        let program = parse(
            "if (a) b; else c; while (x) break; do { continue; } while (y); \
             switch (s) { case 1: f(); default: g(); } \
             try { t() } catch (e) { h() } finally { z() } \
             outer: for (;;) { break outer; } debugger; ;",
        );
        let kinds: Vec<&str> = stmts(&program)
            .iter()
            .map(|s| match s {
                Stmt::If(_) => "if",
                Stmt::While(_) => "while",
                Stmt::DoWhile(_) => "do",
                Stmt::Switch(_) => "switch",
                Stmt::Try(_) => "try",
                Stmt::Labeled(_) => "label",
                Stmt::Debugger(_) => "debugger",
                Stmt::Empty(_) => "empty",
                _ => "other",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["if", "while", "do", "switch", "try", "label", "debugger", "empty"]
        );
    }

    #[test]
    fn test_optional_catch_binding() {
        let program = parse("try {} catch { }");
        match &stmts(&program)[0] {
            Stmt::Try(t) => assert!(t.handler.as_ref().unwrap().param.is_none()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_try_requires_handler() {
        assert_eq!(parse_err("try {}"), "Missing catch or finally clause");
    }

    #[test]
    fn test_return_outside_function() {
        assert_eq!(parse_err("return 1;"), "'return' outside of function");
        let options = ParserOptions::default().allow_return_outside_function(true);
        assert!(crate::parse("return 1;", &options).is_ok());
    }

    #[test]
    fn test_asi() {
        let program = parse("a = 1\nb = 2\n++c");
        assert_eq!(program.body.len(), 3);
        assert_eq!(
            parse_err("a b"),
            "Unexpected token, expected \";\""
        );
    }

    #[test]
    fn test_return_with_line_break_has_no_argument() {
        let program = parse("function f() { return\n1 }");
        match &stmts(&program)[0] {
            Stmt::FnDecl(f) => match &f.body.body.items().unwrap()[0] {
                Stmt::Return(r) => assert!(r.argument.is_none()),
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    // ── Functions and classes ────────────────────────────────────────────────

    #[test]
    fn test_function_declaration_shapes() {
        let program = parse("async function* f(a, b = 1, ...c) { 'use strict'; yield a; }");
        match &stmts(&program)[0] {
            Stmt::FnDecl(f) => {
                assert!(f.is_async && f.is_generator);
                assert_eq!(f.id.as_ref().and_then(Name::as_ident).map(|i| i.name.as_str()), Some("f"));
                let params = f.params.items().unwrap();
                assert!(matches!(params[1], Pat::Assign(_)));
                assert!(matches!(params[2], Pat::Rest(_)));
                assert_eq!(f.body.directives[0].value, "use strict");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_function_declaration_requires_name() {
        assert_eq!(parse_err("function () {}"), "Unexpected token, expected \"name\"");
    }

    #[test]
    fn test_class_members() {
        let program = parse(
            "class A extends B { constructor() { super(); } static #n = 1; get x() { return 1 } \
             set x(v) {} *gen() {} async m() {} static { init(); } }",
        );
        match &stmts(&program)[0] {
            Stmt::ClassDecl(c) => {
                assert!(c.super_class.is_some());
                let kinds: Vec<_> = c
                    .body
                    .body
                    .iter()
                    .map(|m| match m {
                        ClassMember::Method(m) => format!("{:?}", m.kind),
                        ClassMember::Property(p) => format!("field static={}", p.is_static),
                        ClassMember::StaticBlock(_) => "static block".to_string(),
                    })
                    .collect();
                assert_eq!(
                    kinds,
                    vec![
                        "Constructor",
                        "field static=true",
                        "Get",
                        "Set",
                        "Method",
                        "Method",
                        "static block"
                    ]
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_arrow_functions() {
        assert!(matches!(expr_of("x => x * 2"), Expr::Arrow(a) if a.params.len() == 1));
        assert!(matches!(expr_of("(a, {b}, ...c) => {}"), Expr::Arrow(a) if a.params.len() == 3));
        assert!(matches!(expr_of("async (a) => await a"), Expr::Arrow(a) if a.is_async));
        assert!(matches!(expr_of("async x => x"), Expr::Arrow(a) if a.is_async));
        assert!(matches!(expr_of("() => ({})"), Expr::Arrow(_)));
    }

    #[test]
    fn test_async_call_is_not_arrow() {
        assert!(matches!(expr_of("async(a, b)"), Expr::Call(_)));
    }

    // ── Expressions ──────────────────────────────────────────────────────────

    #[test]
    fn test_binary_precedence() {
        match expr_of("1 + 2 * 3") {
            Expr::Binary(b) => {
                assert_eq!(b.op, BinaryOp::Add);
                assert!(matches!(&*b.right, Expr::Binary(r) if r.op == BinaryOp::Mul));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_exponent_is_right_associative() {
        match expr_of("2 ** 3 ** 2") {
            Expr::Binary(b) => assert!(matches!(&*b.right, Expr::Binary(_))),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unary_before_exponent_is_rejected() {
        let err = crate::parse_expression("-2 ** 2", &ParserOptions::default()).unwrap_err();
        assert!(err.message().unwrap().starts_with("Illegal expression"));
    }

    #[test]
    fn test_logical_and_conditional() {
        assert!(matches!(expr_of("a ?? b"), Expr::Logical(l) if l.op == LogicalOp::NullishCoalesce));
        assert!(matches!(expr_of("a ? b : c"), Expr::Conditional(_)));
    }

    #[test]
    fn test_destructuring_assignment() {
        match expr_of("[a, , {b, c: d = 1}, ...e] = f") {
            Expr::Assign(a) => match a.left {
                Pat::Array(arr) => {
                    let elems = arr.elements.items().unwrap();
                    assert_eq!(elems.len(), 4);
                    assert!(elems[1].is_none());
                    assert!(matches!(elems[3], Some(Pat::Rest(_))));
                }
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_object_shorthand_default_becomes_pattern() {
        match expr_of("({a = 1} = b)") {
            Expr::Assign(a) => assert!(matches!(a.left, Pat::Object(_))),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = crate::parse_expression("a + b = c", &ParserOptions::default()).unwrap_err();
        assert_eq!(
            err.message(),
            Some("Invalid left-hand side in assignment expression")
        );
        let err = crate::parse_expression("[...a, b] = c", &ParserOptions::default()).unwrap_err();
        assert_eq!(err.message(), Some("Rest element must be last element"));
    }

    #[test]
    fn test_member_call_and_optional_chain() {
        assert!(matches!(expr_of("a.b[c](d)"), Expr::Call(_)));
        assert!(matches!(expr_of("a?.b"), Expr::OptionalMember(_)));
        assert!(matches!(expr_of("a?.(b)"), Expr::OptionalCall(_)));
        assert!(matches!(expr_of("new A.B(c).d"), Expr::Member(m) if matches!(*m.object, Expr::New(_))));
        assert!(matches!(expr_of("new.target"), Expr::MetaProp(_)));
    }

    #[test]
    fn test_literals() {
        assert!(matches!(expr_of("0x1F"), Expr::Num(n) if n.value == 31.0));
        assert!(matches!(expr_of("10n"), Expr::BigInt(b) if b.value == "10"));
        assert!(matches!(expr_of("'a\\nb'"), Expr::Str(s) if s.value == "a\nb"));
        assert!(matches!(expr_of("/ab+c/gi"), Expr::Regexp(r) if r.pattern == "ab+c" && r.flags == "gi"));
        assert!(matches!(expr_of("null"), Expr::Null(_)));
    }

    #[test]
    fn test_template_literals() {
        match expr_of("`a${b}c${d}e`") {
            Expr::Template(t) => {
                assert_eq!(t.quasis.len(), 3);
                assert_eq!(t.expressions.len(), 2);
                assert_eq!(t.quasis[1].cooked.as_deref(), Some("c"));
                assert!(t.quasis[2].tail);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(expr_of("tag`x`"), Expr::TaggedTemplate(_)));
    }

    #[test]
    fn test_object_literal_members() {
        match expr_of("({ a, b: 1, [c]: 2, d() {}, get e() {}, ...f, 'g': 3, 4: 5 })") {
            Expr::Object(o) => assert_eq!(o.properties.len(), 8),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_sequence_and_parenthesised() {
        assert!(matches!(expr_of("(a, b)"), Expr::Sequence(s) if s.expressions.len() == 2));
        assert!(matches!(expr_of("(a)"), Expr::Ident(_)));
    }

    #[test]
    fn test_yield_is_identifier_outside_generators() {
        let program = parse("var yield = 1;");
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_yield_in_generator() {
        let program = parse("function* g() { yield; yield* a; yield b }");
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_strict_mode_eval_binding() {
        assert_eq!(
            parse_err("'use strict'; var eval;"),
            "Binding 'eval' in strict mode"
        );
    }

    // ── Modules ──────────────────────────────────────────────────────────────

    #[test]
    fn test_import_export() {
        let program = parse_module(
            "import a, { b as c, 'd' as e } from './m'; import * as ns from './n'; \
             import './side' with { type: 'json' }; export const x = 1; \
             export { c as default, e }; export * as all from './o'; export default class {}",
        );
        let decls: Vec<_> = stmts(&program)
            .iter()
            .map(|s| match s {
                Stmt::ModuleDecl(ModuleDecl::Import(i)) => format!("import {}", i.specifiers.len()),
                Stmt::ModuleDecl(ModuleDecl::ExportNamed(e)) => {
                    format!("export {}", e.specifiers.len())
                }
                Stmt::ModuleDecl(ModuleDecl::ExportAll(_)) => "export *".to_string(),
                Stmt::ModuleDecl(ModuleDecl::ExportDefault(_)) => "default".to_string(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            decls,
            vec![
                "import 3", "import 1", "import 0", "export 0", "export 2", "export *", "default"
            ]
        );
    }

    #[test]
    fn test_import_in_script_is_rejected() {
        assert_eq!(
            parse_err("import a from 'b';"),
            "'import' and 'export' may appear only with 'sourceType: module'"
        );
    }

    #[test]
    fn test_dynamic_import_and_meta() {
        assert!(matches!(expr_of("import('./a')"), Expr::Import(_)));
        let program = parse_module("import.meta.url;");
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_parenthesized_arrow_takes_subscripts() {
        for src in ["(() => {})();", "(async () => 1)();", "(e => n => e + n)(1)(2);"] {
            match &stmts(&parse(src))[0] {
                Stmt::Expr(stmt) => assert!(matches!(&*stmt.expr, Expr::Call(_)), "{src}"),
                other => panic!("unexpected {other:?}"),
            }
        }
        match expr_of("x = (a => a).call(b)") {
            Expr::Assign(a) => assert!(matches!(&*a.right, Expr::Call(c) if matches!(&*c.callee, Expr::Member(_)))),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(expr_of("(a => a) + 1"), Expr::Binary(_)));
    }

    #[test]
    fn test_parenthesized_patterns_are_rejected() {
        for src in ["({a}) = 1;", "([a]) = 1;", "[({b})] = c;", "((a)) => 1;", "(a, [(b)]) => 1;"] {
            assert_eq!(parse_err(src), "Invalid parenthesized assignment pattern", "{src}");
        }
        for src in ["(a) = 1;", "[(a)] = 1;", "({a: (b.c)} = d);", "((a)) = 1;"] {
            assert!(crate::parse(src, &ParserOptions::default()).is_ok(), "{src}");
        }
    }

    #[test]
    fn test_shorthand_default_needs_a_pattern() {
        for src in [
            "x = {a = 1};",
            "f({a = 1});",
            "({a = 1});",
            "({a = 1}).b = 2;",
            "[{a = 1}];",
            "x = {b: {a = 1}};",
            "for ({a = 1};;);",
        ] {
            assert_eq!(parse_err(src), "Invalid shorthand property initializer", "{src}");
        }
        for src in [
            "({a = 1} = b);",
            "[{a = 1}] = c;",
            "({b: {a = 1}} = c);",
            "({a = 1}) => a;",
            "async ({a = 1}) => a;",
            "for ({a = 1} of xs);",
        ] {
            assert!(crate::parse(src, &ParserOptions::default()).is_ok(), "{src}");
        }
    }

    #[test]
    fn test_nullish_mixed_with_logical_operators() {
        for src in ["a ?? b || c;", "a || b ?? c;", "a ?? b && c;", "a && b ?? c;"] {
            assert!(
                parse_err(src).starts_with("Nullish coalescing operator(??) requires parens"),
                "{src}"
            );
        }
        assert!(matches!(expr_of("(a ?? b) || c"), Expr::Logical(l) if l.op == LogicalOp::Or));
        assert!(matches!(expr_of("a ?? (b && c)"), Expr::Logical(_)));
        assert!(matches!(expr_of("a ?? b ?? c"), Expr::Logical(_)));
    }

    #[test]
    fn test_nesting_limit() {
        let shallow = ParserOptions::default().with_max_depth(8);
        assert!(crate::parse("((((a))));", &shallow).is_err());
        assert!(crate::parse("a;", &shallow).is_ok());

        // The default limit is reached far below the frames a 64 MiB stack holds.
        let messages = std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(|| {
                let n = 20_000;
                let sources = [
                    format!("{}a{}", "(".repeat(n), ")".repeat(n)),
                    format!("{}{}", "[".repeat(n), "]".repeat(n)),
                    format!("{}{}", "{".repeat(n), "}".repeat(n)),
                    format!("{}a", "!".repeat(n)),
                    format!("x = {}1", "a => ".repeat(n)),
                ];
                let nested_ok = format!("{}a{}", "(".repeat(100), ")".repeat(100));
                assert!(crate::parse(&nested_ok, &ParserOptions::default()).is_ok());
                sources
                    .iter()
                    .map(|src| {
                        crate::parse(src, &ParserOptions::default())
                            .unwrap_err()
                            .message()
                            .unwrap_or_default()
                            .to_string()
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap()
            .join()
            .unwrap();
        for message in messages {
            assert_eq!(message, "Maximum nesting depth exceeded");
        }
    }

    // ── Spans ────────────────────────────────────────────────────────────────

    #[test]
    fn test_statement_span_excludes_trailing_whitespace() {
        let src = "  foo(1);  ";
        let program = parse(src);
        assert_eq!(stmts(&program)[0].loc().text(src), "foo(1);");
        assert_eq!(program.loc.end.offset, src.len());
    }

    #[test]
    fn test_comments_are_skipped() {
        let program = parse("/* a */ x /* b */ + // c\n y");
        assert_eq!(program.body.len(), 1);
    }
}
