//! ES2025 Abstract Syntax Tree node definitions, extended with capture
//! placeholders.
//!
//! Every node struct carries a [`SourceLocation`] field (`loc`) that pinpoints
//! its position in the source text.  [`SourceLocation`] is a type alias for
//! [`crate::parser::scanner::Span`] so it is [`Copy`].
//!
//! # Structure
//!
//! - [`Program`] — root node.
//! - [`Stmt`] — statement nodes.
//! - [`Expr`] — expression nodes.
//! - [`Pat`] — binding/assignment pattern nodes.
//! - [`ModuleDecl`] — `import`/`export` module declarations.
//! - [`Capture`] — a `{{name}}` or `{{...name}}` placeholder.
//! - [`NodeList`] — a list slot that is either ordinary items or one list
//!   capture standing in for the whole list.
//!
//! All nodes implement [`serde::Serialize`] using serde's default externally
//! tagged representation.

use serde::Serialize;

use crate::parser::scanner::{Span, TokenKind};

/// Source location attached to every AST node — a half-open `[start, end)`
/// byte span in the source text.
pub type SourceLocation = Span;

// ─────────────────────────────────────────────────────────────────────────────
// Captures
// ─────────────────────────────────────────────────────────────────────────────

/// A named placeholder in a code template.
///
/// `{{name}}` stands for one node (`is_list_capture == false`); `{{...name}}`
/// stands for a whole list of nodes (`is_list_capture == true`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capture {
    /// From the opening `{{` through the closing `}}`.
    pub loc: SourceLocation,
    /// The placeholder's identifier.
    pub name: String,
    /// `true` for the `{{...name}}` form.
    pub is_list_capture: bool,
}

/// A list-valued slot of the tree.
///
/// Ordinary code fills it with [`NodeList::Items`]; a list capture replaces
/// the entire list with [`NodeList::Capture`].
#[derive(Debug, Clone, Serialize)]
pub enum NodeList<T> {
    /// The list's elements in source order.
    Items(Vec<T>),
    /// A `{{...name}}` standing in for the whole list.
    Capture(Capture),
}

impl<T> NodeList<T> {
    /// The elements, or `None` when the list was replaced by a capture.
    pub fn items(&self) -> Option<&[T]> {
        match self {
            NodeList::Items(items) => Some(items),
            NodeList::Capture(_) => None,
        }
    }

    /// The list capture, if the slot holds one.
    pub fn capture(&self) -> Option<&Capture> {
        match self {
            NodeList::Items(_) => None,
            NodeList::Capture(capture) => Some(capture),
        }
    }

    /// `true` when the slot holds a list capture.
    pub fn is_capture(&self) -> bool {
        matches!(self, NodeList::Capture(_))
    }

    /// Number of elements; a list capture counts as zero.
    pub fn len(&self) -> usize {
        self.items().map_or(0, <[T]>::len)
    }

    /// `true` for an empty item list.  A list capture is never empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, NodeList::Items(items) if items.is_empty())
    }

    /// Transform the item vector, passing a capture through untouched.
    pub fn map_items<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> NodeList<U> {
        match self {
            NodeList::Items(items) => NodeList::Items(f(items)),
            NodeList::Capture(capture) => NodeList::Capture(capture),
        }
    }

    /// Fallible [`NodeList::map_items`].
    pub fn try_map_items<U, E>(
        self,
        f: impl FnOnce(Vec<T>) -> Result<Vec<U>, E>,
    ) -> Result<NodeList<U>, E> {
        Ok(match self {
            NodeList::Items(items) => NodeList::Items(f(items)?),
            NodeList::Capture(capture) => NodeList::Capture(capture),
        })
    }
}

impl<T> Default for NodeList<T> {
    fn default() -> Self {
        NodeList::Items(Vec::new())
    }
}

impl<T> From<Vec<T>> for NodeList<T> {
    fn from(items: Vec<T>) -> Self {
        NodeList::Items(items)
    }
}

/// An identifier-or-capture slot: function and class names.
#[derive(Debug, Clone, Serialize)]
pub enum Name {
    /// A plain identifier.
    Ident(Ident),
    /// A `{{name}}` placeholder.
    Capture(Capture),
}

impl Name {
    /// Returns the source location of this name.
    pub fn loc(&self) -> SourceLocation {
        match self {
            Name::Ident(i) => i.loc,
            Name::Capture(c) => c.loc,
        }
    }

    /// The identifier, when this is not a capture.
    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Name::Ident(i) => Some(i),
            Name::Capture(_) => None,
        }
    }
}

impl From<Capture> for Name {
    fn from(capture: Capture) -> Self {
        Name::Capture(capture)
    }
}

impl From<Capture> for Expr {
    fn from(capture: Capture) -> Self {
        Expr::Capture(capture)
    }
}

impl From<Capture> for Pat {
    fn from(capture: Capture) -> Self {
        Pat::Capture(capture)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Program
// ─────────────────────────────────────────────────────────────────────────────

/// Whether the source file is a classic script or an ES module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SourceType {
    /// A classic `<script>` — top-level `import`/`export` are not allowed.
    #[default]
    Script,
    /// An ES module — strict, and top-level `import`/`export` are allowed.
    Module,
}

/// The root node of a parsed JavaScript source file.
#[derive(Debug, Clone, Serialize)]
pub struct Program {
    /// Source location of the entire program.
    pub loc: SourceLocation,
    /// Whether the file is a script or a module.
    pub source_type: SourceType,
    /// Directive prologue (`"use strict";` …).
    pub directives: Vec<Directive>,
    /// Top-level statements, including module declarations.
    pub body: NodeList<Stmt>,
}

/// One entry of a directive prologue.
#[derive(Debug, Clone, Serialize)]
pub struct Directive {
    /// Source location, excluding the terminating semicolon.
    pub loc: SourceLocation,
    /// The raw text between the quotes.
    pub value: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Common helpers
// ─────────────────────────────────────────────────────────────────────────────

/// A JavaScript identifier (name, label, or binding).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    /// Source location.
    pub loc: SourceLocation,
    /// The identifier text with escapes decoded.
    pub name: String,
}

/// A private identifier beginning with `#` (class fields/methods).
#[derive(Debug, Clone, Serialize)]
pub struct PrivateIdent {
    /// Source location.
    pub loc: SourceLocation,
    /// The identifier text, **without** the leading `#`.
    pub name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

/// A JavaScript statement.
#[derive(Debug, Clone, Serialize)]
pub enum Stmt {
    /// `{ … }` block statement.
    Block(BlockStmt),
    /// `var / let / const` variable declaration.
    VarDecl(VarDecl),
    /// `function` declaration.
    FnDecl(Box<Function>),
    /// `class` declaration.
    ClassDecl(Box<Class>),
    /// Expression statement (`expr ;`).
    Expr(ExprStmt),
    If(IfStmt),
    For(ForStmt),
    ForIn(ForInStmt),
    ForOf(ForOfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    Switch(SwitchStmt),
    Try(TryStmt),
    Return(ReturnStmt),
    Throw(ThrowStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Labeled(LabeledStmt),
    Debugger(DebuggerStmt),
    With(WithStmt),
    /// Empty statement `;`.
    Empty(EmptyStmt),
    /// Top-level `import` / `export` (modules only).
    ModuleDecl(ModuleDecl),
}

impl Stmt {
    /// Returns the source location of this statement.
    pub fn loc(&self) -> SourceLocation {
        match self {
            Stmt::Block(s) => s.loc,
            Stmt::VarDecl(s) => s.loc,
            Stmt::FnDecl(s) => s.loc,
            Stmt::ClassDecl(s) => s.loc,
            Stmt::Expr(s) => s.loc,
            Stmt::If(s) => s.loc,
            Stmt::For(s) => s.loc,
            Stmt::ForIn(s) => s.loc,
            Stmt::ForOf(s) => s.loc,
            Stmt::While(s) => s.loc,
            Stmt::DoWhile(s) => s.loc,
            Stmt::Switch(s) => s.loc,
            Stmt::Try(s) => s.loc,
            Stmt::Return(s) => s.loc,
            Stmt::Throw(s) => s.loc,
            Stmt::Break(s) => s.loc,
            Stmt::Continue(s) => s.loc,
            Stmt::Labeled(s) => s.loc,
            Stmt::Debugger(s) => s.loc,
            Stmt::With(s) => s.loc,
            Stmt::Empty(s) => s.loc,
            Stmt::ModuleDecl(s) => s.loc(),
        }
    }
}

/// `{ statements }` block statement, also used for function bodies.
#[derive(Debug, Clone, Serialize)]
pub struct BlockStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// Directive prologue; only function bodies have one.
    pub directives: Vec<Directive>,
    /// Statements in the block.
    pub body: NodeList<Stmt>,
}

/// Expression statement: `expr ;`
#[derive(Debug, Clone, Serialize)]
pub struct ExprStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// The expression.
    pub expr: Box<Expr>,
}

/// `if (test) consequent else alternate`
#[derive(Debug, Clone, Serialize)]
pub struct IfStmt {
    pub loc: SourceLocation,
    pub test: Box<Expr>,
    pub consequent: Box<Stmt>,
    pub alternate: Option<Box<Stmt>>,
}

/// `for (init; test; update) body`
#[derive(Debug, Clone, Serialize)]
pub struct ForStmt {
    pub loc: SourceLocation,
    pub init: Option<ForInit>,
    pub test: Option<Box<Expr>>,
    pub update: Option<Box<Expr>>,
    pub body: Box<Stmt>,
}

/// The initializer slot in a C-style `for` statement.
#[derive(Debug, Clone, Serialize)]
pub enum ForInit {
    /// `var / let / const` declaration.
    VarDecl(VarDecl),
    /// Plain expression.
    Expr(Box<Expr>),
}

/// `for (left in right) body`
#[derive(Debug, Clone, Serialize)]
pub struct ForInStmt {
    pub loc: SourceLocation,
    pub left: ForInOfLeft,
    pub right: Box<Expr>,
    pub body: Box<Stmt>,
}

/// `for [await] (left of right) body`
#[derive(Debug, Clone, Serialize)]
pub struct ForOfStmt {
    pub loc: SourceLocation,
    /// `true` for `for await (…)`.
    pub is_await: bool,
    pub left: ForInOfLeft,
    pub right: Box<Expr>,
    pub body: Box<Stmt>,
}

/// The left-hand side of a `for-in` or `for-of` statement.
#[derive(Debug, Clone, Serialize)]
pub enum ForInOfLeft {
    /// `var / let / const` declaration.
    VarDecl(VarDecl),
    /// An assignment target.
    Pat(Pat),
}

/// `while (test) body`
#[derive(Debug, Clone, Serialize)]
pub struct WhileStmt {
    pub loc: SourceLocation,
    pub test: Box<Expr>,
    pub body: Box<Stmt>,
}

/// `do body while (test);`
#[derive(Debug, Clone, Serialize)]
pub struct DoWhileStmt {
    pub loc: SourceLocation,
    pub body: Box<Stmt>,
    pub test: Box<Expr>,
}

/// `switch (discriminant) { cases }`
#[derive(Debug, Clone, Serialize)]
pub struct SwitchStmt {
    pub loc: SourceLocation,
    pub discriminant: Box<Expr>,
    pub cases: Vec<SwitchCase>,
}

/// A single `case expr:` or `default:` clause in a `switch` statement.
#[derive(Debug, Clone, Serialize)]
pub struct SwitchCase {
    /// Source location.
    pub loc: SourceLocation,
    /// `None` for the `default:` clause; `Some(expr)` for `case expr:`.
    pub test: Option<Expr>,
    /// Body statements for this clause.
    pub consequent: Vec<Stmt>,
}

/// `try { block } catch (param) { handler } finally { finalizer }`
#[derive(Debug, Clone, Serialize)]
pub struct TryStmt {
    pub loc: SourceLocation,
    pub block: BlockStmt,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStmt>,
}

/// `catch (param) body`
#[derive(Debug, Clone, Serialize)]
pub struct CatchClause {
    /// Source location.
    pub loc: SourceLocation,
    /// Binding parameter; `None` for optional-catch `catch { … }`.
    pub param: Option<Pat>,
    /// The catch block.
    pub body: BlockStmt,
}

/// `return argument?;`
#[derive(Debug, Clone, Serialize)]
pub struct ReturnStmt {
    pub loc: SourceLocation,
    pub argument: Option<Box<Expr>>,
}

/// `throw argument;`
#[derive(Debug, Clone, Serialize)]
pub struct ThrowStmt {
    pub loc: SourceLocation,
    pub argument: Box<Expr>,
}

/// `break label?;`
#[derive(Debug, Clone, Serialize)]
pub struct BreakStmt {
    pub loc: SourceLocation,
    pub label: Option<Ident>,
}

/// `continue label?;`
#[derive(Debug, Clone, Serialize)]
pub struct ContinueStmt {
    pub loc: SourceLocation,
    pub label: Option<Ident>,
}

/// `label: body`
#[derive(Debug, Clone, Serialize)]
pub struct LabeledStmt {
    pub loc: SourceLocation,
    pub label: Ident,
    pub body: Box<Stmt>,
}

/// `debugger;`
#[derive(Debug, Clone, Serialize)]
pub struct DebuggerStmt {
    pub loc: SourceLocation,
}

/// `with (object) body`
#[derive(Debug, Clone, Serialize)]
pub struct WithStmt {
    pub loc: SourceLocation,
    pub object: Box<Expr>,
    pub body: Box<Stmt>,
}

/// Empty statement `;`.
#[derive(Debug, Clone, Serialize)]
pub struct EmptyStmt {
    pub loc: SourceLocation,
}

// ─────────────────────────────────────────────────────────────────────────────
// Variable declarations
// ─────────────────────────────────────────────────────────────────────────────

/// `var / let / const declarators`
#[derive(Debug, Clone, Serialize)]
pub struct VarDecl {
    /// Source location.
    pub loc: SourceLocation,
    /// Declaration keyword.
    pub kind: VarKind,
    /// One or more declarators, or a list capture.
    pub declarators: NodeList<VarDeclarator>,
}

/// Whether a variable declaration uses `var`, `let`, or `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VarKind {
    /// `var` — function-scoped.
    Var,
    /// `let` — block-scoped, reassignable.
    Let,
    /// `const` — block-scoped, non-reassignable.
    Const,
}

impl VarKind {
    /// Map a declaration keyword token to its kind.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Var => Some(VarKind::Var),
            TokenKind::Let => Some(VarKind::Let),
            TokenKind::Const => Some(VarKind::Const),
            _ => None,
        }
    }
}

/// A single `pattern [= initializer]` in a variable declaration.
#[derive(Debug, Clone, Serialize)]
pub struct VarDeclarator {
    /// Source location.
    pub loc: SourceLocation,
    /// The binding pattern.
    pub id: Pat,
    /// Optional initializer expression.
    pub init: Option<Box<Expr>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Functions and classes
// ─────────────────────────────────────────────────────────────────────────────

/// `function [id] (params) { body }`, as a declaration, an expression, or the
/// value of a method.
#[derive(Debug, Clone, Serialize)]
pub struct Function {
    /// Source location.
    pub loc: SourceLocation,
    /// Name; always present for declarations except `export default`.
    pub id: Option<Name>,
    /// `true` for `async function`.
    pub is_async: bool,
    /// `true` for generator functions (`function*`).
    pub is_generator: bool,
    /// Parameters; defaults are [`Pat::Assign`], rest is [`Pat::Rest`].
    pub params: NodeList<Pat>,
    /// Function body.
    pub body: BlockStmt,
}

/// `[async] (params) => body`
#[derive(Debug, Clone, Serialize)]
pub struct ArrowExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// `true` for `async (…) => …`.
    pub is_async: bool,
    /// Parameter list.
    pub params: NodeList<Pat>,
    /// Either a block body `{ … }` or a concise expression body.
    pub body: ArrowBody,
}

/// The body of an arrow function.
#[derive(Debug, Clone, Serialize)]
pub enum ArrowBody {
    /// `{ statements }` block body.
    Block(BlockStmt),
    /// Concise expression body.
    Expr(Box<Expr>),
}

/// `class [id] [extends superClass] { body }`, as a declaration or expression.
#[derive(Debug, Clone, Serialize)]
pub struct Class {
    /// Source location.
    pub loc: SourceLocation,
    /// Class name; always present for declarations except `export default`.
    pub id: Option<Name>,
    /// Optional super-class expression.
    pub super_class: Option<Box<Expr>>,
    /// Class body.
    pub body: ClassBody,
}

/// The `{ … }` body of a class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassBody {
    pub loc: SourceLocation,
    pub body: Vec<ClassMember>,
}

/// A member inside a class body.
#[derive(Debug, Clone, Serialize)]
pub enum ClassMember {
    /// A method definition (`constructor`, regular, getter, or setter).
    Method(MethodDef),
    /// A class field (public or private).
    Property(PropertyDef),
    /// A `static { … }` initialization block.
    StaticBlock(StaticBlock),
}

/// `[static] [get|set] key(params) { body }`
#[derive(Debug, Clone, Serialize)]
pub struct MethodDef {
    pub loc: SourceLocation,
    pub is_static: bool,
    pub kind: MethodKind,
    pub key: PropKey,
    pub value: Function,
}

/// The variant of a method definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

/// `[static] key [= value]` — class field definition.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyDef {
    pub loc: SourceLocation,
    pub is_static: bool,
    pub key: PropKey,
    pub value: Option<Box<Expr>>,
}

/// `static { … }` initialization block inside a class body.
#[derive(Debug, Clone, Serialize)]
pub struct StaticBlock {
    pub loc: SourceLocation,
    pub body: NodeList<Stmt>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Module declarations
// ─────────────────────────────────────────────────────────────────────────────

/// A top-level module declaration (`import` or `export`).
#[derive(Debug, Clone, Serialize)]
pub enum ModuleDecl {
    /// `import … from "source"`
    Import(ImportDecl),
    /// `export { … } [from "source"]` or `export declaration`
    ExportNamed(ExportNamedDecl),
    /// `export default …`
    ExportDefault(ExportDefaultDecl),
    /// `export * [as name] from "source"`
    ExportAll(ExportAllDecl),
}

impl ModuleDecl {
    /// Returns the source location of this declaration.
    pub fn loc(&self) -> SourceLocation {
        match self {
            ModuleDecl::Import(d) => d.loc,
            ModuleDecl::ExportNamed(d) => d.loc,
            ModuleDecl::ExportDefault(d) => d.loc,
            ModuleDecl::ExportAll(d) => d.loc,
        }
    }
}

/// `import specifiers from "source" [with { … }]`
#[derive(Debug, Clone, Serialize)]
pub struct ImportDecl {
    pub loc: SourceLocation,
    pub specifiers: Vec<ImportSpecifier>,
    pub source: StringLit,
    /// Import attributes (`with { type: "json" }`).
    pub attributes: Vec<ImportAttribute>,
}

/// A single binding inside an `import` declaration.
#[derive(Debug, Clone, Serialize)]
pub enum ImportSpecifier {
    /// `{ imported as local }` or `{ local }`.
    Named {
        loc: SourceLocation,
        imported: ModuleExportName,
        local: Ident,
    },
    /// `defaultExport`
    Default { loc: SourceLocation, local: Ident },
    /// `* as ns`
    Namespace { loc: SourceLocation, local: Ident },
}

/// A single `key: "value"` pair in an import attribute clause.
#[derive(Debug, Clone, Serialize)]
pub struct ImportAttribute {
    pub loc: SourceLocation,
    pub key: ModuleExportName,
    pub value: StringLit,
}

/// `export { specifiers } [from "source"]` or `export declaration`
#[derive(Debug, Clone, Serialize)]
pub struct ExportNamedDecl {
    pub loc: SourceLocation,
    pub specifiers: Vec<ExportSpecifier>,
    pub source: Option<StringLit>,
    /// Inline declaration (`export function f() { … }`, etc.).
    pub declaration: Option<Box<Stmt>>,
    pub attributes: Vec<ImportAttribute>,
}

/// `{ local as exported }` — named export specifier.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSpecifier {
    pub loc: SourceLocation,
    pub local: ModuleExportName,
    pub exported: ModuleExportName,
}

/// `export default expression | function | class`
#[derive(Debug, Clone, Serialize)]
pub struct ExportDefaultDecl {
    pub loc: SourceLocation,
    pub declaration: ExportDefaultExpr,
}

/// The exported item in an `export default …` declaration.
#[derive(Debug, Clone, Serialize)]
pub enum ExportDefaultExpr {
    Fn(Box<Function>),
    Class(Box<Class>),
    Expr(Box<Expr>),
}

/// `export * [as name] from "source"`
#[derive(Debug, Clone, Serialize)]
pub struct ExportAllDecl {
    pub loc: SourceLocation,
    pub exported: Option<ModuleExportName>,
    pub source: StringLit,
    pub attributes: Vec<ImportAttribute>,
}

/// An identifier or string literal used as a module export/import name.
#[derive(Debug, Clone, Serialize)]
pub enum ModuleExportName {
    Ident(Ident),
    Str(StringLit),
}

// ─────────────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────────────

/// `null` literal.
#[derive(Debug, Clone, Serialize)]
pub struct NullLit {
    pub loc: SourceLocation,
}

/// `true` or `false` literal.
#[derive(Debug, Clone, Serialize)]
pub struct BoolLit {
    pub loc: SourceLocation,
    pub value: bool,
}

/// Numeric literal (decimal, hex, binary, or octal).
#[derive(Debug, Clone, Serialize)]
pub struct NumLit {
    /// Source location.
    pub loc: SourceLocation,
    /// The parsed numeric value.
    pub value: f64,
    /// The raw source text.
    pub raw: String,
}

/// BigInt literal (e.g. `42n`).
#[derive(Debug, Clone, Serialize)]
pub struct BigIntLit {
    /// Source location.
    pub loc: SourceLocation,
    /// The digits without the trailing `n`.
    pub value: String,
}

/// String literal.
#[derive(Debug, Clone, Serialize)]
pub struct StringLit {
    /// Source location.
    pub loc: SourceLocation,
    /// The decoded string value.
    pub value: String,
}

/// Regular-expression literal `/pattern/flags`.
#[derive(Debug, Clone, Serialize)]
pub struct RegExpLit {
    pub loc: SourceLocation,
    pub pattern: String,
    pub flags: String,
}

/// `` `quasis ${expressions} quasis` `` — template literal.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateLit {
    /// Source location.
    pub loc: SourceLocation,
    /// The string parts (one more than `expressions`).
    pub quasis: Vec<TemplateElement>,
    /// The interpolated expressions.
    pub expressions: Vec<Expr>,
}

/// A static string fragment inside a template literal.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateElement {
    /// Source location.
    pub loc: SourceLocation,
    /// Raw source text of this fragment (backslashes not interpreted).
    pub raw: String,
    /// Cooked (decoded) value; `None` if the fragment has an invalid escape.
    pub cooked: Option<String>,
    /// `true` for the final quasi.
    pub tail: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

/// A JavaScript expression.
#[derive(Debug, Clone, Serialize)]
pub enum Expr {
    // ── Literals ──────────────────────────────────────────────────────────
    Null(NullLit),
    Bool(BoolLit),
    Num(NumLit),
    Str(StringLit),
    BigInt(BigIntLit),
    Regexp(RegExpLit),
    Template(Box<TemplateLit>),

    // ── Primary ───────────────────────────────────────────────────────────
    /// Plain identifier.
    Ident(Ident),
    /// `this`
    This(ThisExpr),
    /// `super`, only as a callee or member object.
    Super(SuperExpr),
    /// Array literal `[elements]`.
    Array(Box<ArrayExpr>),
    /// Object literal `{ properties }`.
    Object(Box<ObjectExpr>),
    /// `{{name}}` placeholder in expression position.
    Capture(Capture),

    // ── Function-like ─────────────────────────────────────────────────────
    Fn(Box<Function>),
    Arrow(Box<ArrowExpr>),
    Class(Box<Class>),

    // ── Operators ─────────────────────────────────────────────────────────
    Unary(Box<UnaryExpr>),
    Update(Box<UpdateExpr>),
    Binary(Box<BinaryExpr>),
    /// Logical `&&` / `||` / `??` operator.
    Logical(Box<LogicalExpr>),
    Conditional(Box<ConditionalExpr>),
    /// Assignment expression (`=`, `+=`, …).
    Assign(Box<AssignExpr>),
    /// Comma-separated sequence `a, b, c`.
    Sequence(Box<SequenceExpr>),

    // ── Member / call ─────────────────────────────────────────────────────
    Member(Box<MemberExpr>),
    OptionalMember(Box<MemberExpr>),
    Call(Box<CallExpr>),
    OptionalCall(Box<CallExpr>),
    New(Box<NewExpr>),
    /// `` tag`template` ``
    TaggedTemplate(Box<TaggedTemplateExpr>),

    /// `...argument` inside an array literal, call, or parenthesised
    /// arrow-parameter list.
    Spread(Box<SpreadElement>),

    Yield(Box<YieldExpr>),
    Await(Box<AwaitExpr>),

    /// `import(source)`
    Import(Box<ImportExpr>),
    /// `import.meta` or `new.target`
    MetaProp(MetaPropExpr),
}

impl Expr {
    /// Returns the source location of this expression.
    pub fn loc(&self) -> SourceLocation {
        match self {
            Expr::Null(e) => e.loc,
            Expr::Bool(e) => e.loc,
            Expr::Num(e) => e.loc,
            Expr::Str(e) => e.loc,
            Expr::BigInt(e) => e.loc,
            Expr::Regexp(e) => e.loc,
            Expr::Template(e) => e.loc,
            Expr::Ident(e) => e.loc,
            Expr::This(e) => e.loc,
            Expr::Super(e) => e.loc,
            Expr::Array(e) => e.loc,
            Expr::Object(e) => e.loc,
            Expr::Capture(e) => e.loc,
            Expr::Fn(e) => e.loc,
            Expr::Arrow(e) => e.loc,
            Expr::Class(e) => e.loc,
            Expr::Unary(e) => e.loc,
            Expr::Update(e) => e.loc,
            Expr::Binary(e) => e.loc,
            Expr::Logical(e) => e.loc,
            Expr::Conditional(e) => e.loc,
            Expr::Assign(e) => e.loc,
            Expr::Sequence(e) => e.loc,
            Expr::Member(e) | Expr::OptionalMember(e) => e.loc,
            Expr::Call(e) | Expr::OptionalCall(e) => e.loc,
            Expr::New(e) => e.loc,
            Expr::TaggedTemplate(e) => e.loc,
            Expr::Spread(e) => e.loc,
            Expr::Yield(e) => e.loc,
            Expr::Await(e) => e.loc,
            Expr::Import(e) => e.loc,
            Expr::MetaProp(e) => e.loc,
        }
    }
}

/// `this`
#[derive(Debug, Clone, Serialize)]
pub struct ThisExpr {
    pub loc: SourceLocation,
}

/// `super`
#[derive(Debug, Clone, Serialize)]
pub struct SuperExpr {
    pub loc: SourceLocation,
}

/// Array literal: `[elements]`.
#[derive(Debug, Clone, Serialize)]
pub struct ArrayExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// Elements, where `None` represents an elision (`,`).
    pub elements: NodeList<Option<Expr>>,
}

/// Object literal: `{ properties }`.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectExpr {
    pub loc: SourceLocation,
    pub properties: Vec<ObjectProp>,
}

/// A single property (or spread) in an object literal.
#[derive(Debug, Clone, Serialize)]
pub enum ObjectProp {
    /// `key: value`, shorthand, getter/setter, or method.
    Prop(Box<Prop>),
    /// `...expr` spread property.
    Spread(SpreadElement),
}

/// A concrete property in an object literal.
#[derive(Debug, Clone, Serialize)]
pub struct Prop {
    pub loc: SourceLocation,
    pub key: PropKey,
    pub value: PropValue,
}

/// The key in an object property or class member.
#[derive(Debug, Clone, Serialize)]
pub enum PropKey {
    Ident(Ident),
    /// Private identifier key (`#name`), class members only.
    Private(PrivateIdent),
    Str(StringLit),
    Num(NumLit),
    /// Computed key `[expr]`.
    Computed(Box<Expr>),
    /// `{{name}}` in key position.
    Capture(Capture),
}

/// The value of a property in an object literal.
#[derive(Debug, Clone, Serialize)]
pub enum PropValue {
    /// `key: value`
    Value(Box<Expr>),
    /// `{ key }`
    Shorthand,
    /// `{ key = default }`; only valid once the object becomes a pattern.
    CoverInit(Box<Expr>),
    /// `get key() { … }`
    Get(Function),
    /// `set key(v) { … }`
    Set(Function),
    /// `key(params) { … }`
    Method(Function),
}

/// `...argument` — spread element in array literals or function calls.
#[derive(Debug, Clone, Serialize)]
pub struct SpreadElement {
    pub loc: SourceLocation,
    pub argument: Box<Expr>,
}

/// Unary prefix expression: `op argument`.
#[derive(Debug, Clone, Serialize)]
pub struct UnaryExpr {
    pub loc: SourceLocation,
    pub op: UnaryOp,
    pub argument: Box<Expr>,
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

impl UnaryOp {
    /// Map a prefix operator token to its operator.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Typeof => UnaryOp::Typeof,
            TokenKind::Void => UnaryOp::Void,
            TokenKind::Delete => UnaryOp::Delete,
            _ => return None,
        })
    }
}

/// `++` / `--` update expression.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// `++` or `--`.
    pub op: UpdateOp,
    /// `true` for prefix, `false` for postfix.
    pub prefix: bool,
    /// The operand; an identifier, member expression or capture.
    pub argument: Box<Expr>,
}

/// The increment / decrement operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

/// Binary infix expression: `left op right`.
#[derive(Debug, Clone, Serialize)]
pub struct BinaryExpr {
    pub loc: SourceLocation,
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// A binary (non-assignment, non-logical) infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
    BitOr,
    BitXor,
    BitAnd,
    In,
    Instanceof,
}

/// Logical short-circuit expression: `left op right`.
#[derive(Debug, Clone, Serialize)]
pub struct LogicalExpr {
    pub loc: SourceLocation,
    pub op: LogicalOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// A logical (short-circuit) operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOp {
    And,
    Or,
    NullishCoalesce,
}

/// `test ? consequent : alternate`
#[derive(Debug, Clone, Serialize)]
pub struct ConditionalExpr {
    pub loc: SourceLocation,
    pub test: Box<Expr>,
    pub consequent: Box<Expr>,
    pub alternate: Box<Expr>,
}

/// Assignment expression: `left op right`.
#[derive(Debug, Clone, Serialize)]
pub struct AssignExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// The assignment operator.
    pub op: AssignOp,
    /// Target: a pattern, or [`Pat::Expr`] for member expressions.
    pub left: Pat,
    /// Right-hand side.
    pub right: Box<Expr>,
}

/// An assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    ExpAssign,
    ShlAssign,
    ShrAssign,
    UShrAssign,
    BitOrAssign,
    BitXorAssign,
    BitAndAssign,
    LogicalAndAssign,
    LogicalOrAssign,
    NullishAssign,
}

impl AssignOp {
    /// Map an assignment operator token to its operator.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        use TokenKind as T;
        Some(match kind {
            T::Equal => AssignOp::Assign,
            T::PlusEqual => AssignOp::AddAssign,
            T::MinusEqual => AssignOp::SubAssign,
            T::StarEqual => AssignOp::MulAssign,
            T::SlashEqual => AssignOp::DivAssign,
            T::PercentEqual => AssignOp::RemAssign,
            T::StarStarEqual => AssignOp::ExpAssign,
            T::LessLessEqual => AssignOp::ShlAssign,
            T::GreaterGreaterEqual => AssignOp::ShrAssign,
            T::GreaterGreaterGreaterEqual => AssignOp::UShrAssign,
            T::PipeEqual => AssignOp::BitOrAssign,
            T::CaretEqual => AssignOp::BitXorAssign,
            T::AmpersandEqual => AssignOp::BitAndAssign,
            T::AmpersandAmpersandEqual => AssignOp::LogicalAndAssign,
            T::PipePipeEqual => AssignOp::LogicalOrAssign,
            T::QuestionQuestionEqual => AssignOp::NullishAssign,
            _ => return None,
        })
    }
}

/// Comma-separated sequence expression: `a, b, c`.
///
/// A parenthesised list capture `({{...xs}})` also produces a sequence whose
/// expressions are [`NodeList::Capture`].
#[derive(Debug, Clone, Serialize)]
pub struct SequenceExpr {
    pub loc: SourceLocation,
    pub expressions: NodeList<Expr>,
}

/// `object.property`, `object[expr]`, or their optional-chaining forms.
#[derive(Debug, Clone, Serialize)]
pub struct MemberExpr {
    pub loc: SourceLocation,
    pub object: Box<Expr>,
    pub property: MemberProp,
}

/// The property part of a member expression.
#[derive(Debug, Clone, Serialize)]
pub enum MemberProp {
    /// Static identifier (`.name`).
    Ident(Ident),
    /// Private identifier (`.#name`).
    Private(PrivateIdent),
    /// Computed expression (`[expr]`).
    Computed(Box<Expr>),
    /// `.{{name}}`
    Capture(Capture),
}

/// `callee(arguments)` or `callee?.(arguments)`.
#[derive(Debug, Clone, Serialize)]
pub struct CallExpr {
    pub loc: SourceLocation,
    pub callee: Box<Expr>,
    pub arguments: NodeList<Expr>,
}

/// `new callee(arguments)`
#[derive(Debug, Clone, Serialize)]
pub struct NewExpr {
    pub loc: SourceLocation,
    pub callee: Box<Expr>,
    pub arguments: NodeList<Expr>,
}

/// `` tag`template` `` — tagged template expression.
#[derive(Debug, Clone, Serialize)]
pub struct TaggedTemplateExpr {
    pub loc: SourceLocation,
    pub tag: Box<Expr>,
    pub quasi: TemplateLit,
}

/// `yield [*] [argument]`
#[derive(Debug, Clone, Serialize)]
pub struct YieldExpr {
    pub loc: SourceLocation,
    /// `true` for `yield*`.
    pub delegate: bool,
    pub argument: Option<Box<Expr>>,
}

/// `await argument`
#[derive(Debug, Clone, Serialize)]
pub struct AwaitExpr {
    pub loc: SourceLocation,
    pub argument: Box<Expr>,
}

/// `import(source [, options])` — dynamic import expression.
#[derive(Debug, Clone, Serialize)]
pub struct ImportExpr {
    pub loc: SourceLocation,
    pub source: Box<Expr>,
    pub options: Option<Box<Expr>>,
}

/// `import.meta` or `new.target` — meta property expression.
#[derive(Debug, Clone, Serialize)]
pub struct MetaPropExpr {
    pub loc: SourceLocation,
    pub meta: Ident,
    pub property: Ident,
}

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

/// A binding or assignment pattern.
#[derive(Debug, Clone, Serialize)]
pub enum Pat {
    /// Simple identifier binding.
    Ident(Ident),
    /// Array destructuring `[a, b, ...rest]`.
    Array(Box<ArrayPat>),
    /// Object destructuring `{ a, b: c, ...rest }`.
    Object(Box<ObjectPat>),
    /// Rest element `...pattern`.
    Rest(Box<RestElement>),
    /// Default-value binding `pattern = default`.
    Assign(Box<AssignPat>),
    /// An expression in target position; valid only as a member expression
    /// in assignments.
    Expr(Box<Expr>),
    /// `{{name}}` in binding or target position.
    Capture(Capture),
}

impl Pat {
    /// Returns the source location of this pattern.
    pub fn loc(&self) -> SourceLocation {
        match self {
            Pat::Ident(p) => p.loc,
            Pat::Array(p) => p.loc,
            Pat::Object(p) => p.loc,
            Pat::Rest(p) => p.loc,
            Pat::Assign(p) => p.loc,
            Pat::Expr(e) => e.loc(),
            Pat::Capture(c) => c.loc,
        }
    }
}

/// Array destructuring pattern: `[a, , b, ...rest]`.
#[derive(Debug, Clone, Serialize)]
pub struct ArrayPat {
    /// Source location.
    pub loc: SourceLocation,
    /// Elements, where `None` represents an elision.
    pub elements: NodeList<Option<Pat>>,
}

/// Object destructuring pattern: `{ a, b: c, ...rest }`.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectPat {
    pub loc: SourceLocation,
    pub properties: Vec<ObjectPatProp>,
}

/// A single property inside an object destructuring pattern.
#[derive(Debug, Clone, Serialize)]
pub enum ObjectPatProp {
    /// `key: pat`
    KeyValue(KeyValuePatProp),
    /// `id [= default]`
    Assign(AssignPatProp),
    /// `...rest`
    Rest(RestElement),
}

/// `key: pattern` in an object pattern.
#[derive(Debug, Clone, Serialize)]
pub struct KeyValuePatProp {
    pub loc: SourceLocation,
    pub key: PropKey,
    pub value: Pat,
}

/// Shorthand `{ id [= default] }` in an object pattern.
#[derive(Debug, Clone, Serialize)]
pub struct AssignPatProp {
    pub loc: SourceLocation,
    pub key: Ident,
    pub value: Option<Box<Expr>>,
}

/// `...pattern` — rest element.
#[derive(Debug, Clone, Serialize)]
pub struct RestElement {
    pub loc: SourceLocation,
    pub argument: Box<Pat>,
}

/// `pattern = default` — default-value pattern.
#[derive(Debug, Clone, Serialize)]
pub struct AssignPat {
    pub loc: SourceLocation,
    pub left: Box<Pat>,
    pub right: Box<Expr>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scanner::Position;

    fn loc(start: usize, end: usize) -> SourceLocation {
        let at = |offset| Position {
            offset,
            line: 1,
            column: offset as u32 + 1,
        };
        Span {
            start: at(start),
            end: at(end),
        }
    }

    fn capture(name: &str, is_list_capture: bool) -> Capture {
        Capture {
            loc: loc(0, name.len() + 4),
            name: name.into(),
            is_list_capture,
        }
    }

    #[test]
    fn test_node_list_items_and_capture_accessors() {
        let items: NodeList<u32> = vec![1, 2].into();
        assert_eq!(items.items(), Some(&[1, 2][..]));
        assert_eq!(items.len(), 2);
        assert!(!items.is_capture());

        let list: NodeList<u32> = NodeList::Capture(capture("xs", true));
        assert!(list.is_capture());
        assert_eq!(list.items(), None);
        assert_eq!(list.capture().map(|c| c.name.as_str()), Some("xs"));
        assert_eq!(list.len(), 0);
        assert!(!list.is_empty());
        assert!(NodeList::<u32>::default().is_empty());
    }

    #[test]
    fn test_node_list_map_passes_capture_through() {
        let doubled = NodeList::Items(vec![1, 2]).map_items(|v| v.into_iter().map(|n| n * 2).collect());
        assert_eq!(doubled.items(), Some(&[2, 4][..]));

        let kept: NodeList<String> =
            NodeList::<u32>::Capture(capture("xs", true)).map_items(|_| unreachable!());
        assert_eq!(kept.capture().map(|c| c.is_list_capture), Some(true));

        let failed: Result<NodeList<u32>, &str> = NodeList::Items(vec![1]).try_map_items(|_| Err("no"));
        assert_eq!(failed.unwrap_err(), "no");
    }

    #[test]
    fn test_capture_converts_into_every_single_slot() {
        let c = capture("x", false);
        assert!(matches!(Expr::from(c.clone()), Expr::Capture(ref e) if e.name == "x"));
        assert!(matches!(Pat::from(c.clone()), Pat::Capture(_)));
        let name = Name::from(c.clone());
        assert_eq!(name.loc(), c.loc);
        assert!(name.as_ident().is_none());
    }

    #[test]
    fn test_loc_of_capture_variants() {
        let c = capture("abc", false);
        assert_eq!(Expr::Capture(c.clone()).loc(), c.loc);
        assert_eq!(Pat::Capture(c.clone()).loc(), c.loc);
        let member = Pat::Expr(Box::new(Expr::Ident(Ident {
            loc: loc(3, 4),
            name: "m".into(),
        })));
        assert_eq!(member.loc(), loc(3, 4));
    }

    #[test]
    fn test_stmt_loc_covers_module_decl() {
        let decl = Stmt::ModuleDecl(ModuleDecl::ExportAll(ExportAllDecl {
            loc: loc(0, 20),
            exported: None,
            source: StringLit {
                loc: loc(14, 19),
                value: "./m".into(),
            },
            attributes: vec![],
        }));
        assert_eq!(decl.loc(), loc(0, 20));
    }

    #[test]
    fn test_operator_token_mapping() {
        assert_eq!(VarKind::from_token(TokenKind::Const), Some(VarKind::Const));
        assert_eq!(VarKind::from_token(TokenKind::Of), None);
        assert_eq!(UnaryOp::from_token(TokenKind::Typeof), Some(UnaryOp::Typeof));
        assert_eq!(AssignOp::from_token(TokenKind::QuestionQuestionEqual), Some(AssignOp::NullishAssign));
        assert_eq!(AssignOp::from_token(TokenKind::EqualEqual), None);
    }

    #[test]
    fn test_serialize_list_capture() {
        let call = Expr::Call(Box::new(CallExpr {
            loc: loc(0, 14),
            callee: Box::new(Expr::Ident(Ident {
                loc: loc(0, 1),
                name: "f".into(),
            })),
            arguments: NodeList::Capture(capture("args", true)),
        }));
        let json = serde_json::to_value(&call).unwrap();
        let capture = &json["Call"]["arguments"]["Capture"];
        assert_eq!(capture["name"], "args");
        assert_eq!(capture["is_list_capture"], true);
    }
}
