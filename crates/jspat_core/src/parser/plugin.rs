//! Extension seam for the scanner and parser.
//!
//! A [`Plugin`] overrides individual productions.  Every hook receives the
//! parser (or scanner), the production's arguments and a `next`
//! continuation that runs the remaining plugins and finally the built-in
//! production.  A hook that does not want to intervene simply calls `next`,
//! which is what every default method does.
//!
//! Plugins are stacked in a [`PluginSet`]; the plugin added last runs first.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::parser::ast::{Expr, Name, NodeList, Pat, VarDeclarator, VarKind};
use crate::parser::scanner::{Scanner, Token, TokenKind};
use crate::parser::{BlockBody, LValContext, Parser};

/// A grammar extension.
///
/// The list-producing hooks (`parse_var`, `parse_block_body`,
/// `parse_binding_list`, `parse_expr_list`, `parse_call_arguments`) consume
/// the closing token they are given; `parse_paren_items` leaves the `)` for
/// its caller.
pub trait Plugin {
    /// Registry name, e.g. `"capture"`.
    fn name(&self) -> &'static str;

    /// Read the next token.  The scanner has already skipped whitespace and
    /// is not at end of input.
    fn read_token<'src>(
        &self,
        sc: &mut Scanner<'src>,
        next: &dyn Fn(&mut Scanner<'src>) -> Result<Token>,
    ) -> Result<Token> {
        next(sc)
    }

    /// Identifier references, bindings and (with `liberal`) property names.
    fn parse_identifier<'src>(
        &self,
        p: &mut Parser<'src>,
        liberal: bool,
        next: &dyn Fn(&mut Parser<'src>, bool) -> Result<Name>,
    ) -> Result<Name> {
        next(p, liberal)
    }

    /// The name after `function`.
    fn parse_function_id<'src>(
        &self,
        p: &mut Parser<'src>,
        require: bool,
        next: &dyn Fn(&mut Parser<'src>, bool) -> Result<Option<Name>>,
    ) -> Result<Option<Name>> {
        next(p, require)
    }

    /// A binding identifier or destructuring pattern.
    fn parse_binding_atom<'src>(
        &self,
        p: &mut Parser<'src>,
        next: &dyn Fn(&mut Parser<'src>) -> Result<Pat>,
    ) -> Result<Pat> {
        next(p)
    }

    /// A primary expression.
    fn parse_expr_atom<'src>(
        &self,
        p: &mut Parser<'src>,
        next: &dyn Fn(&mut Parser<'src>) -> Result<Expr>,
    ) -> Result<Expr> {
        next(p)
    }

    /// An assignment expression.
    fn parse_maybe_assign<'src>(
        &self,
        p: &mut Parser<'src>,
        next: &dyn Fn(&mut Parser<'src>) -> Result<Expr>,
    ) -> Result<Expr> {
        next(p)
    }

    /// The declarators after `var`/`let`/`const`.
    fn parse_var<'src>(
        &self,
        p: &mut Parser<'src>,
        kind: VarKind,
        is_for: bool,
        next: &dyn Fn(&mut Parser<'src>, VarKind, bool) -> Result<NodeList<VarDeclarator>>,
    ) -> Result<NodeList<VarDeclarator>> {
        next(p, kind, is_for)
    }

    /// Statements up to and including `end`.
    fn parse_block_body<'src>(
        &self,
        p: &mut Parser<'src>,
        end: TokenKind,
        allow_directives: bool,
        top_level: bool,
        next: &dyn Fn(&mut Parser<'src>, TokenKind, bool, bool) -> Result<BlockBody>,
    ) -> Result<BlockBody> {
        next(p, end, allow_directives, top_level)
    }

    /// Array-pattern elements or formal parameters up to and including `close`.
    fn parse_binding_list<'src>(
        &self,
        p: &mut Parser<'src>,
        close: TokenKind,
        allow_empty: bool,
        next: &dyn Fn(&mut Parser<'src>, TokenKind, bool) -> Result<NodeList<Option<Pat>>>,
    ) -> Result<NodeList<Option<Pat>>> {
        next(p, close, allow_empty)
    }

    /// Array-literal elements or `new` arguments up to and including `close`.
    fn parse_expr_list<'src>(
        &self,
        p: &mut Parser<'src>,
        close: TokenKind,
        allow_empty: bool,
        next: &dyn Fn(&mut Parser<'src>, TokenKind, bool) -> Result<NodeList<Option<Expr>>>,
    ) -> Result<NodeList<Option<Expr>>> {
        next(p, close, allow_empty)
    }

    /// Call arguments up to and including `close`.
    fn parse_call_arguments<'src>(
        &self,
        p: &mut Parser<'src>,
        close: TokenKind,
        next: &dyn Fn(&mut Parser<'src>, TokenKind) -> Result<NodeList<Expr>>,
    ) -> Result<NodeList<Expr>> {
        next(p, close)
    }

    /// The contents of a parenthesised expression or arrow parameter list.
    fn parse_paren_items<'src>(
        &self,
        p: &mut Parser<'src>,
        next: &dyn Fn(&mut Parser<'src>) -> Result<NodeList<Expr>>,
    ) -> Result<NodeList<Expr>> {
        next(p)
    }

    /// Validate an assignment or binding target.
    fn check_lval<'src>(
        &self,
        p: &mut Parser<'src>,
        pat: &Pat,
        ctx: LValContext,
        next: &dyn Fn(&mut Parser<'src>, &Pat, LValContext) -> Result<()>,
    ) -> Result<()> {
        next(p, pat, ctx)
    }

    /// Convert a parsed expression list to destructuring targets.
    fn to_assignable_list<'src>(
        &self,
        p: &mut Parser<'src>,
        list: NodeList<Option<Expr>>,
        next: &dyn Fn(&mut Parser<'src>, NodeList<Option<Expr>>) -> Result<NodeList<Option<Pat>>>,
    ) -> Result<NodeList<Option<Pat>>> {
        next(p, list)
    }
}

/// An ordered, cheaply clonable stack of plugins.
#[derive(Clone, Default)]
pub struct PluginSet {
    plugins: Rc<Vec<Rc<dyn Plugin>>>,
}

impl PluginSet {
    /// Add `plugin` on top of the stack.
    pub fn with(self, plugin: impl Plugin + 'static) -> Self {
        self.with_rc(Rc::new(plugin))
    }

    /// Add an already shared plugin on top of the stack.
    pub fn with_rc(mut self, plugin: Rc<dyn Plugin>) -> Self {
        Rc::make_mut(&mut self.plugins).push(plugin);
        self
    }

    /// `true` when a plugin called `name` is installed.
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    /// `true` when no plugin is installed and only the built-in grammar runs.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run the token hooks, innermost last, ending in the built-in rule.
    pub(crate) fn read_token<'src>(&self, sc: &mut Scanner<'src>) -> Result<Token> {
        fn chain<'s>(plugins: &[Rc<dyn Plugin>], sc: &mut Scanner<'s>) -> Result<Token> {
            match plugins.split_last() {
                None => sc.read_token_base(),
                Some((outer, inner)) => {
                    outer.read_token(sc, &|sc: &mut Scanner<'s>| chain(inner, sc))
                }
            }
        }
        chain(&self.plugins, sc)
    }
}

/// Generate the parser-side dispatch for one hookable production.
macro_rules! dispatch {
    ($method:ident => $base:ident ( $($arg:ident : $ty:ty),* ) -> $ret:ty) => {
        pub(crate) fn $method<'src>(&self, p: &mut Parser<'src>, $($arg: $ty),*) -> Result<$ret> {
            fn chain<'s>(
                plugins: &[Rc<dyn Plugin>],
                p: &mut Parser<'s>,
                $($arg: $ty),*
            ) -> Result<$ret> {
                match plugins.split_last() {
                    None => p.$base($($arg),*),
                    Some((outer, inner)) => outer.$method(
                        p,
                        $($arg,)*
                        &|p: &mut Parser<'s>, $($arg: $ty),*| chain(inner, p, $($arg),*),
                    ),
                }
            }
            chain(&self.plugins, p, $($arg),*)
        }
    };
}

impl PluginSet {
    dispatch!(parse_identifier => parse_identifier_base(liberal: bool) -> Name);
    dispatch!(parse_function_id => parse_function_id_base(require: bool) -> Option<Name>);
    dispatch!(parse_binding_atom => parse_binding_atom_base() -> Pat);
    dispatch!(parse_expr_atom => parse_expr_atom_base() -> Expr);
    dispatch!(parse_maybe_assign => parse_maybe_assign_base() -> Expr);
    dispatch!(parse_var => parse_var_base(kind: VarKind, is_for: bool) -> NodeList<VarDeclarator>);
    dispatch!(parse_block_body => parse_block_body_base(
        end: TokenKind,
        allow_directives: bool,
        top_level: bool
    ) -> BlockBody);
    dispatch!(parse_binding_list => parse_binding_list_base(
        close: TokenKind,
        allow_empty: bool
    ) -> NodeList<Option<Pat>>);
    dispatch!(parse_expr_list => parse_expr_list_base(
        close: TokenKind,
        allow_empty: bool
    ) -> NodeList<Option<Expr>>);
    dispatch!(parse_call_arguments => parse_call_arguments_base(close: TokenKind) -> NodeList<Expr>);
    dispatch!(parse_paren_items => parse_paren_items_base() -> NodeList<Expr>);
    dispatch!(check_lval => check_lval_base(pat: &Pat, ctx: LValContext) -> ());
    dispatch!(to_assignable_list => to_assignable_list_base(
        list: NodeList<Option<Expr>>
    ) -> NodeList<Option<Pat>>);
}

impl fmt::Debug for PluginSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::options::ParserOptions;
    use crate::parser::ast::{Ident, Stmt};

    /// Records the order in which hooks run.
    struct Tracer {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Plugin for Tracer {
        fn name(&self) -> &'static str {
            self.name
        }

        fn parse_expr_atom<'src>(
            &self,
            p: &mut Parser<'src>,
            next: &dyn Fn(&mut Parser<'src>) -> Result<Expr>,
        ) -> Result<Expr> {
            self.log.borrow_mut().push(self.name);
            next(p)
        }
    }

    /// Replaces every identifier reference with `renamed`.
    struct Renamer;

    impl Plugin for Renamer {
        fn name(&self) -> &'static str {
            "renamer"
        }

        fn parse_identifier<'src>(
            &self,
            p: &mut Parser<'src>,
            liberal: bool,
            next: &dyn Fn(&mut Parser<'src>, bool) -> Result<Name>,
        ) -> Result<Name> {
            Ok(match next(p, liberal)? {
                Name::Ident(id) => Name::Ident(Ident {
                    name: "renamed".into(),
                    ..id
                }),
                other => other,
            })
        }
    }

    fn first_expr(program: &crate::parser::ast::Program) -> &Expr {
        match program.body.items().and_then(|b| b.first()) {
            Some(Stmt::Expr(s)) => &s.expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_last_installed_plugin_runs_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let options = ParserOptions::default()
            .with_plugin(Tracer { name: "a", log: log.clone() })
            .with_plugin(Tracer { name: "b", log: log.clone() });
        crate::parse("x", &options).unwrap();
        assert_eq!(*log.borrow(), vec!["b", "a"]);
    }

    #[test]
    fn test_hook_can_rewrite_base_result() {
        let options = ParserOptions::default().with_plugin(Renamer);
        let program = crate::parse("original", &options).unwrap();
        match first_expr(&program) {
            Expr::Ident(id) => assert_eq!(id.name, "renamed"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_plugin_set_debug_lists_names() {
        let set = PluginSet::default().with(Renamer);
        assert!(set.contains("renamer"));
        assert_eq!(format!("{set:?}"), r#"["renamer"]"#);
    }
}
