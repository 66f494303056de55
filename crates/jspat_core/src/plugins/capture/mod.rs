//! Capture placeholders: `{{name}}` and `{{...name}}`.
//!
//! A single capture stands wherever an identifier, function name, binding
//! or primary expression is parsed.  A list capture replaces a whole list:
//! declarators, a block body, parameters or array-pattern elements,
//! array-literal and `new` arguments, call arguments, or the items of a
//! parenthesised expression.  When a list capture follows other elements
//! after a comma, those elements are parsed and then dropped, so the
//! capture is the list's only content.
//!
//! ```
//! use jspat_core::options::ParserOptions;
//! use jspat_core::parser::ast::{Expr, Stmt};
//! use jspat_core::plugins::capture::CapturePlugin;
//!
//! let options = ParserOptions::default().with_plugin(CapturePlugin);
//! let program = jspat_core::parse("f({{...args}});", &options).unwrap();
//! let Some(Stmt::Expr(stmt)) = program.body.items().and_then(|b| b.first()) else {
//!     panic!("expected an expression statement");
//! };
//! let Expr::Call(call) = &*stmt.expr else { panic!("expected a call") };
//! assert_eq!(call.arguments.capture().map(|c| c.name.as_str()), Some("args"));
//! ```

mod lexer;
pub mod node;
pub(crate) mod token;

use tracing::debug;

use crate::error::Result;
use crate::parser::ast::{Capture, Expr, Name, NodeList, Pat, VarDeclarator, VarKind};
use crate::parser::plugin::Plugin;
use crate::parser::scanner::{Scanner, Token, TokenKind};
use crate::parser::{BlockBody, LValContext, Parser};

pub use node::{is_list_capture, parse_capture_at, parse_list_capture, parse_single_capture};

/// Registry name of [`CapturePlugin`].
pub const NAME: &str = "capture";

/// The capture grammar extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapturePlugin;

/// Parse a single capture if one starts here.
fn single(p: &mut Parser<'_>, production: &'static str) -> Result<Option<Capture>> {
    if !p.at(TokenKind::CaptureOpen) {
        return Ok(None);
    }
    let capture = parse_single_capture(p)?;
    debug!(production, name = %capture.name, list = false, "capture");
    Ok(Some(capture))
}

/// Parse a list capture if one starts here, or if one follows after a comma
/// further along the same list.  Elements before it are handed to `skip`
/// and dropped.
fn whole_list(
    p: &mut Parser<'_>,
    production: &'static str,
    end: Option<TokenKind>,
    allow_holes: bool,
    stop_at_semicolon: bool,
    skip: impl Fn(&mut Parser<'_>) -> Result<()>,
) -> Result<Option<Capture>> {
    let mut dropped = 0usize;
    if !is_list_capture(p)? {
        if !node::list_capture_ahead(p, stop_at_semicolon) {
            return Ok(None);
        }
        while !is_list_capture(p)? {
            if !(allow_holes && p.at(TokenKind::Comma)) {
                skip(p)?;
                dropped += 1;
            }
            p.expect(TokenKind::Comma)?;
        }
    }
    let capture = parse_list_capture(p, end)?;
    debug!(production, name = %capture.name, list = true, dropped, "capture");
    Ok(Some(capture))
}

fn skip_expr_item(p: &mut Parser<'_>) -> Result<()> {
    p.parse_expr_list_item().map(drop)
}

fn skip_binding_item(p: &mut Parser<'_>) -> Result<()> {
    if p.eat(TokenKind::DotDotDot)? {
        return p.parse_binding_atom().map(drop);
    }
    p.parse_binding_element().map(drop)
}

impl Plugin for CapturePlugin {
    fn name(&self) -> &'static str {
        NAME
    }

    fn read_token<'src>(
        &self,
        sc: &mut Scanner<'src>,
        next: &dyn Fn(&mut Scanner<'src>) -> Result<Token>,
    ) -> Result<Token> {
        match lexer::read_delimiter(sc) {
            Some(token) => Ok(token),
            None => next(sc),
        }
    }

    // ── Single positions ────────────────────────────────────────────────────

    fn parse_identifier<'src>(
        &self,
        p: &mut Parser<'src>,
        liberal: bool,
        next: &dyn Fn(&mut Parser<'src>, bool) -> Result<Name>,
    ) -> Result<Name> {
        match single(p, "identifier")? {
            Some(capture) => Ok(Name::Capture(capture)),
            None => next(p, liberal),
        }
    }

    fn parse_function_id<'src>(
        &self,
        p: &mut Parser<'src>,
        require: bool,
        next: &dyn Fn(&mut Parser<'src>, bool) -> Result<Option<Name>>,
    ) -> Result<Option<Name>> {
        match single(p, "function_id")? {
            Some(capture) => Ok(Some(Name::Capture(capture))),
            None => next(p, require),
        }
    }

    fn parse_binding_atom<'src>(
        &self,
        p: &mut Parser<'src>,
        next: &dyn Fn(&mut Parser<'src>) -> Result<Pat>,
    ) -> Result<Pat> {
        match single(p, "binding_atom")? {
            Some(capture) => Ok(Pat::Capture(capture)),
            None => next(p),
        }
    }

    fn parse_expr_atom<'src>(
        &self,
        p: &mut Parser<'src>,
        next: &dyn Fn(&mut Parser<'src>) -> Result<Expr>,
    ) -> Result<Expr> {
        match single(p, "expr_atom")? {
            Some(capture) => Ok(Expr::Capture(capture)),
            None => next(p),
        }
    }

    /// Wherever `yield` is reserved it starts a yield expression, inside
    /// generators or not.  Sloppy code keeps `yield` as an identifier.
    fn parse_maybe_assign<'src>(
        &self,
        p: &mut Parser<'src>,
        next: &dyn Fn(&mut Parser<'src>) -> Result<Expr>,
    ) -> Result<Expr> {
        if p.at(TokenKind::Yield) && (p.is_strict() || p.in_generator()) {
            return p.parse_yield();
        }
        next(p)
    }

    // ── List positions ──────────────────────────────────────────────────────

    fn parse_var<'src>(
        &self,
        p: &mut Parser<'src>,
        kind: VarKind,
        is_for: bool,
        next: &dyn Fn(&mut Parser<'src>, VarKind, bool) -> Result<NodeList<VarDeclarator>>,
    ) -> Result<NodeList<VarDeclarator>> {
        let skip = |p: &mut Parser<'_>| p.parse_var_declarator(kind, is_for).map(drop);
        match whole_list(p, "var", None, false, true, skip)? {
            Some(capture) => Ok(NodeList::Capture(capture)),
            None => next(p, kind, is_for),
        }
    }

    fn parse_block_body<'src>(
        &self,
        p: &mut Parser<'src>,
        end: TokenKind,
        allow_directives: bool,
        top_level: bool,
        next: &dyn Fn(&mut Parser<'src>, TokenKind, bool, bool) -> Result<BlockBody>,
    ) -> Result<BlockBody> {
        if !is_list_capture(p)? {
            return next(p, end, allow_directives, top_level);
        }
        let capture = parse_list_capture(p, (end != TokenKind::Eof).then_some(end))?;
        if end == TokenKind::Eof && !p.at(TokenKind::Eof) {
            return p.unexpected();
        }
        debug!(production = "block_body", name = %capture.name, list = true, "capture");
        Ok(BlockBody {
            directives: Vec::new(),
            body: NodeList::Capture(capture),
        })
    }

    fn parse_binding_list<'src>(
        &self,
        p: &mut Parser<'src>,
        close: TokenKind,
        allow_empty: bool,
        next: &dyn Fn(&mut Parser<'src>, TokenKind, bool) -> Result<NodeList<Option<Pat>>>,
    ) -> Result<NodeList<Option<Pat>>> {
        match whole_list(p, "binding_list", Some(close), allow_empty, false, skip_binding_item)? {
            Some(capture) => Ok(NodeList::Capture(capture)),
            None => next(p, close, allow_empty),
        }
    }

    fn parse_expr_list<'src>(
        &self,
        p: &mut Parser<'src>,
        close: TokenKind,
        allow_empty: bool,
        next: &dyn Fn(&mut Parser<'src>, TokenKind, bool) -> Result<NodeList<Option<Expr>>>,
    ) -> Result<NodeList<Option<Expr>>> {
        match whole_list(p, "expr_list", Some(close), allow_empty, false, skip_expr_item)? {
            Some(capture) => Ok(NodeList::Capture(capture)),
            None => next(p, close, allow_empty),
        }
    }

    fn parse_call_arguments<'src>(
        &self,
        p: &mut Parser<'src>,
        close: TokenKind,
        next: &dyn Fn(&mut Parser<'src>, TokenKind) -> Result<NodeList<Expr>>,
    ) -> Result<NodeList<Expr>> {
        match whole_list(p, "call_arguments", Some(close), false, false, skip_expr_item)? {
            Some(capture) => Ok(NodeList::Capture(capture)),
            None => next(p, close),
        }
    }

    /// The closing `)` stays for the caller, which decides between a
    /// sequence and arrow parameters.
    fn parse_paren_items<'src>(
        &self,
        p: &mut Parser<'src>,
        next: &dyn Fn(&mut Parser<'src>) -> Result<NodeList<Expr>>,
    ) -> Result<NodeList<Expr>> {
        match whole_list(p, "paren_items", None, false, false, skip_expr_item)? {
            Some(capture) => Ok(NodeList::Capture(capture)),
            None => next(p),
        }
    }

    // ── Target validation ───────────────────────────────────────────────────

    fn check_lval<'src>(
        &self,
        p: &mut Parser<'src>,
        pat: &Pat,
        ctx: LValContext,
        next: &dyn Fn(&mut Parser<'src>, &Pat, LValContext) -> Result<()>,
    ) -> Result<()> {
        if let Pat::Capture(_) = pat {
            return Ok(());
        }
        next(p, pat, ctx)
    }

    fn to_assignable_list<'src>(
        &self,
        p: &mut Parser<'src>,
        list: NodeList<Option<Expr>>,
        next: &dyn Fn(&mut Parser<'src>, NodeList<Option<Expr>>) -> Result<NodeList<Option<Pat>>>,
    ) -> Result<NodeList<Option<Pat>>> {
        match list {
            NodeList::Capture(capture) => Ok(NodeList::Capture(capture)),
            items => next(p, items),
        }
    }
}
