//! Binding patterns, expression-to-pattern conversion and target checks.

use crate::error::{Error, Result};
use crate::parser::ast::*;
use crate::parser::scanner::TokenKind;
use crate::parser::{LValContext, PARENTHESIZED_PATTERN, Parser};

/// Words that can never name a binding.
const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with",
];

impl<'src> Parser<'src> {
    // ── Binding patterns ────────────────────────────────────────────────────

    pub(crate) fn parse_binding_atom_base(&mut self) -> Result<Pat> {
        match self.kind() {
            TokenKind::LeftBracket => {
                let start = self.start_node();
                self.next()?;
                let elements = self.parse_binding_list(TokenKind::RightBracket, true)?;
                Ok(Pat::Array(Box::new(ArrayPat {
                    loc: self.finish_node(start),
                    elements,
                })))
            }
            TokenKind::LeftBrace => self.parse_object_pattern(),
            _ => Ok(match self.parse_identifier(false)? {
                Name::Ident(id) => Pat::Ident(id),
                Name::Capture(capture) => Pat::Capture(capture),
            }),
        }
    }

    pub(crate) fn parse_binding_list_base(
        &mut self,
        close: TokenKind,
        allow_empty: bool,
    ) -> Result<NodeList<Option<Pat>>> {
        let mut elements = Vec::new();
        let mut first = true;
        while !self.eat(close)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::Comma)?;
                if self.eat(close)? {
                    break;
                }
            }
            if allow_empty && self.at(TokenKind::Comma) {
                elements.push(None);
                continue;
            }
            if self.at(TokenKind::DotDotDot) {
                elements.push(Some(self.parse_binding_rest()?));
                if self.at(TokenKind::Comma) {
                    return Err(self.error_here("Rest element must be last element"));
                }
                self.expect(close)?;
                break;
            }
            elements.push(Some(self.parse_binding_element()?));
        }
        Ok(NodeList::Items(elements))
    }

    /// A binding with an optional `= default`.
    pub(crate) fn parse_binding_element(&mut self) -> Result<Pat> {
        let start = self.start_node();
        let left = self.parse_binding_atom()?;
        if !self.eat(TokenKind::Equal)? {
            return Ok(left);
        }
        let right = Box::new(self.allow_in(|p| p.parse_maybe_assign())?);
        Ok(Pat::Assign(Box::new(AssignPat {
            loc: self.finish_node(start),
            left: Box::new(left),
            right,
        })))
    }

    fn parse_binding_rest(&mut self) -> Result<Pat> {
        let start = self.start_node();
        self.expect(TokenKind::DotDotDot)?;
        let argument = Box::new(self.parse_binding_atom()?);
        Ok(Pat::Rest(Box::new(RestElement {
            loc: self.finish_node(start),
            argument,
        })))
    }

    fn parse_object_pattern(&mut self) -> Result<Pat> {
        let start = self.start_node();
        self.expect(TokenKind::LeftBrace)?;
        let mut properties = Vec::new();
        while !self.eat(TokenKind::RightBrace)? {
            if self.at(TokenKind::DotDotDot) {
                let rest_start = self.start_node();
                self.next()?;
                let argument = Box::new(self.parse_binding_atom()?);
                properties.push(ObjectPatProp::Rest(RestElement {
                    loc: self.finish_node(rest_start),
                    argument,
                }));
                if self.at(TokenKind::Comma) {
                    return Err(self.error_here("Rest element must be last element"));
                }
                self.expect(TokenKind::RightBrace)?;
                break;
            }
            properties.push(self.parse_object_pattern_prop()?);
            if !self.at(TokenKind::RightBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(Pat::Object(Box::new(ObjectPat {
            loc: self.finish_node(start),
            properties,
        })))
    }

    fn parse_object_pattern_prop(&mut self) -> Result<ObjectPatProp> {
        let start = self.start_node();
        let key = self.parse_property_key()?;
        if self.eat(TokenKind::Colon)? {
            let value = self.parse_binding_element()?;
            return Ok(ObjectPatProp::KeyValue(KeyValuePatProp {
                loc: self.finish_node(start),
                key,
                value,
            }));
        }
        let default = if self.eat(TokenKind::Equal)? {
            Some(Box::new(self.allow_in(|p| p.parse_maybe_assign())?))
        } else {
            None
        };
        let loc = self.finish_node(start);
        match key {
            PropKey::Ident(key) => Ok(ObjectPatProp::Assign(AssignPatProp {
                loc,
                key,
                value: default,
            })),
            PropKey::Capture(capture) => Ok(ObjectPatProp::KeyValue(KeyValuePatProp {
                loc,
                key: PropKey::Capture(capture.clone()),
                value: with_default(loc, Pat::Capture(capture), default),
            })),
            _ => Err(Error::syntax("Unexpected token", start)),
        }
    }

    // ── Expression to pattern ───────────────────────────────────────────────

    /// Reinterpret an expression parsed ahead of `=`, `=>` or a `for` head as
    /// a destructuring target.
    ///
    /// Shapes that cannot be targets become [`Pat::Expr`] and are rejected by
    /// [`Parser::check_lval`].
    pub(crate) fn to_assignable(&mut self, expr: Expr) -> Result<Pat> {
        if matches!(expr, Expr::Object(_) | Expr::Array(_)) && self.is_parenthesized(expr.loc()) {
            return Err(Error::syntax(PARENTHESIZED_PATTERN, expr.loc().start));
        }
        Ok(match expr {
            Expr::Ident(id) => Pat::Ident(id),
            Expr::Capture(capture) => Pat::Capture(capture),
            Expr::Array(array) => {
                let ArrayExpr { loc, elements } = *array;
                let elements = self.to_assignable_list(elements)?;
                Pat::Array(Box::new(ArrayPat { loc, elements }))
            }
            Expr::Object(object) => self.object_to_pattern(*object)?,
            Expr::Assign(assign) if assign.op == AssignOp::Assign => {
                let AssignExpr {
                    loc, left, right, ..
                } = *assign;
                Pat::Assign(Box::new(AssignPat {
                    loc,
                    left: Box::new(left),
                    right,
                }))
            }
            other => Pat::Expr(Box::new(other)),
        })
    }

    fn object_to_pattern(&mut self, object: ObjectExpr) -> Result<Pat> {
        let ObjectExpr { loc, properties } = object;
        let count = properties.len();
        let mut converted = Vec::with_capacity(count);
        for (i, prop) in properties.into_iter().enumerate() {
            converted.push(match prop {
                ObjectProp::Spread(spread) => {
                    if i + 1 != count {
                        return Err(Error::syntax(
                            "Rest element must be last element",
                            spread.loc.start,
                        ));
                    }
                    ObjectPatProp::Rest(RestElement {
                        loc: spread.loc,
                        argument: Box::new(self.to_assignable(*spread.argument)?),
                    })
                }
                ObjectProp::Prop(prop) => {
                    let Prop { loc, key, value } = *prop;
                    match (key, value) {
                        (key, PropValue::Value(value)) => ObjectPatProp::KeyValue(KeyValuePatProp {
                            loc,
                            key,
                            value: self.to_assignable(*value)?,
                        }),
                        (PropKey::Ident(key), PropValue::Shorthand) => {
                            ObjectPatProp::Assign(AssignPatProp {
                                loc,
                                key,
                                value: None,
                            })
                        }
                        (PropKey::Ident(key), PropValue::CoverInit(default)) => {
                            ObjectPatProp::Assign(AssignPatProp {
                                loc,
                                key,
                                value: Some(default),
                            })
                        }
                        (PropKey::Capture(capture), PropValue::Shorthand) => {
                            ObjectPatProp::KeyValue(KeyValuePatProp {
                                loc,
                                key: PropKey::Capture(capture.clone()),
                                value: Pat::Capture(capture),
                            })
                        }
                        (PropKey::Capture(capture), PropValue::CoverInit(default)) => {
                            ObjectPatProp::KeyValue(KeyValuePatProp {
                                loc,
                                key: PropKey::Capture(capture.clone()),
                                value: with_default(loc, Pat::Capture(capture), Some(default)),
                            })
                        }
                        _ => {
                            return Err(Error::syntax(
                                "Invalid destructuring assignment target",
                                loc.start,
                            ));
                        }
                    }
                }
            });
        }
        Ok(Pat::Object(Box::new(ObjectPat {
            loc,
            properties: converted,
        })))
    }

    pub(crate) fn to_assignable_list_base(
        &mut self,
        list: NodeList<Option<Expr>>,
    ) -> Result<NodeList<Option<Pat>>> {
        let items = match list {
            NodeList::Items(items) => items,
            NodeList::Capture(capture) => {
                return Err(Error::syntax("Invalid destructuring target", capture.loc.start));
            }
        };
        let count = items.len();
        let mut pats = Vec::with_capacity(count);
        for (i, item) in items.into_iter().enumerate() {
            pats.push(match item {
                None => None,
                Some(Expr::Spread(spread)) => {
                    if i + 1 != count {
                        return Err(Error::syntax(
                            "Rest element must be last element",
                            spread.loc.start,
                        ));
                    }
                    let SpreadElement { loc, argument } = *spread;
                    Some(Pat::Rest(Box::new(RestElement {
                        loc,
                        argument: Box::new(self.to_assignable(*argument)?),
                    })))
                }
                Some(expr) => Some(self.to_assignable(expr)?),
            });
        }
        Ok(NodeList::Items(pats))
    }

    // ── Target checks ───────────────────────────────────────────────────────

    pub(crate) fn check_lval_base(&mut self, pat: &Pat, ctx: LValContext) -> Result<()> {
        // Only arrow parameters can be bindings written in parentheses.
        if ctx.is_binding() && self.is_parenthesized(pat.loc()) {
            return Err(Error::syntax(PARENTHESIZED_PATTERN, pat.loc().start));
        }
        match pat {
            Pat::Ident(id) => self.check_binding_name(id, ctx),
            Pat::Expr(expr) => match **expr {
                Expr::Member(_) if !ctx.is_binding() => Ok(()),
                _ => Err(invalid_target(pat, ctx)),
            },
            Pat::Capture(_) => Err(invalid_target(pat, ctx)),
            _ if ctx == LValContext::Update => Err(invalid_target(pat, ctx)),
            Pat::Array(array) => {
                // A list capture stands for the whole element list and has
                // nothing to check.
                for element in array.elements.items().unwrap_or_default().iter().flatten() {
                    self.check_lval(element, ctx)?;
                }
                Ok(())
            }
            Pat::Object(object) => {
                for prop in &object.properties {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => self.check_lval(&kv.value, ctx)?,
                        ObjectPatProp::Assign(assign) => self.check_binding_name(&assign.key, ctx)?,
                        ObjectPatProp::Rest(rest) => self.check_lval(&rest.argument, ctx)?,
                    }
                }
                Ok(())
            }
            Pat::Rest(rest) => self.check_lval(&rest.argument, ctx),
            Pat::Assign(assign) => self.check_lval(&assign.left, ctx),
        }
    }

    fn check_binding_name(&self, id: &Ident, ctx: LValContext) -> Result<()> {
        let name = id.name.as_str();
        if RESERVED_WORDS.contains(&name) {
            return Err(Error::syntax(format!("Unexpected keyword '{name}'"), id.loc.start));
        }
        if self.ctx.strict && matches!(name, "eval" | "arguments") {
            let verb = if ctx.is_binding() { "Binding" } else { "Assigning to" };
            return Err(Error::syntax(
                format!("{verb} '{name}' in strict mode"),
                id.loc.start,
            ));
        }
        if name == "let" && matches!(ctx, LValContext::Declaration(VarKind::Let | VarKind::Const)) {
            return Err(Error::syntax(
                "'let' is disallowed as a lexically bound name",
                id.loc.start,
            ));
        }
        Ok(())
    }
}

fn with_default(loc: SourceLocation, pat: Pat, default: Option<Box<Expr>>) -> Pat {
    match default {
        Some(right) => Pat::Assign(Box::new(AssignPat {
            loc,
            left: Box::new(pat),
            right,
        })),
        None => pat,
    }
}

fn invalid_target(pat: &Pat, ctx: LValContext) -> Error {
    Error::syntax(
        format!("Invalid left-hand side in {}", ctx.describe()),
        pat.loc().start,
    )
}
