//! Expressions, functions and classes.

use crate::error::{Error, Result};
use crate::parser::ast::*;
use crate::parser::scanner::{Position, Span, TokenKind, TokenValue, cook};
use crate::parser::{Context, LValContext, Parser, SHORTHAND_DEFAULT};

/// A binary or logical operator together with its binding power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Infix {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

fn infix(kind: TokenKind, no_in: bool) -> Option<(Infix, u8)> {
    use Infix::{Binary as B, Logical as L};
    use TokenKind as T;
    Some(match kind {
        T::QuestionQuestion => (L(LogicalOp::NullishCoalesce), 1),
        T::PipePipe => (L(LogicalOp::Or), 1),
        T::AmpersandAmpersand => (L(LogicalOp::And), 2),
        T::Pipe => (B(BinaryOp::BitOr), 3),
        T::Caret => (B(BinaryOp::BitXor), 4),
        T::Ampersand => (B(BinaryOp::BitAnd), 5),
        T::EqualEqual => (B(BinaryOp::Eq), 6),
        T::BangEqual => (B(BinaryOp::NotEq), 6),
        T::EqualEqualEqual => (B(BinaryOp::StrictEq), 6),
        T::BangEqualEqual => (B(BinaryOp::StrictNotEq), 6),
        T::Less => (B(BinaryOp::Lt), 7),
        T::Greater => (B(BinaryOp::Gt), 7),
        T::LessEqual => (B(BinaryOp::LtEq), 7),
        T::GreaterEqual => (B(BinaryOp::GtEq), 7),
        T::Instanceof => (B(BinaryOp::Instanceof), 7),
        T::In if !no_in => (B(BinaryOp::In), 7),
        T::LessLess => (B(BinaryOp::Shl), 8),
        T::GreaterGreater => (B(BinaryOp::Shr), 8),
        T::GreaterGreaterGreater => (B(BinaryOp::UShr), 8),
        T::Plus => (B(BinaryOp::Add), 9),
        T::Minus => (B(BinaryOp::Sub), 9),
        T::Star => (B(BinaryOp::Mul), 10),
        T::Slash => (B(BinaryOp::Div), 10),
        T::Percent => (B(BinaryOp::Rem), 10),
        T::StarStar => (B(BinaryOp::Exp), 11),
        _ => return None,
    })
}

impl<'src> Parser<'src> {
    // ── Comma / assignment ──────────────────────────────────────────────────

    /// `Expression`: one or more assignment expressions separated by commas.
    pub fn parse_expression(&mut self) -> Result<Expr> {
        let start = self.start_node();
        let first = self.parse_maybe_assign()?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(TokenKind::Comma)? {
            expressions.push(self.parse_maybe_assign()?);
        }
        Ok(Expr::Sequence(Box::new(SequenceExpr {
            loc: self.finish_node(start),
            expressions: NodeList::Items(expressions),
        })))
    }

    pub(crate) fn parse_maybe_assign_base(&mut self) -> Result<Expr> {
        if self.at(TokenKind::Yield) && self.ctx.in_generator {
            return self.parse_yield();
        }
        let start = self.start_node();
        let left = self.parse_conditional()?;
        let shorthand_default = self.shorthand_default.take();
        if let Some(pos) = shorthand_default {
            if !self.may_become_pattern(&left) {
                return Err(Error::syntax(SHORTHAND_DEFAULT, pos));
            }
        }

        if self.at(TokenKind::Arrow) {
            let param = match left {
                _ if self.token.had_line_terminator_before => return self.unexpected(),
                Expr::Ident(id) => Pat::Ident(id),
                Expr::Capture(capture) => Pat::Capture(capture),
                _ => return self.unexpected(),
            };
            self.check_lval(&param, LValContext::Param)?;
            return self.parse_arrow(start, NodeList::Items(vec![param]), false);
        }

        let Some(op) = AssignOp::from_token(self.kind()) else {
            self.shorthand_default = shorthand_default;
            return Ok(left);
        };
        let target = if op == AssignOp::Assign {
            self.to_assignable(left)?
        } else {
            simple_target(left)
        };
        self.check_lval(&target, LValContext::Assignment)?;
        self.next()?;
        let right = Box::new(self.parse_maybe_assign()?);
        Ok(Expr::Assign(Box::new(AssignExpr {
            loc: self.finish_node(start),
            op,
            left: target,
            right,
        })))
    }

    /// An unparenthesized array or object literal, which `=` or `=>` can
    /// still turn into a pattern.
    fn may_become_pattern(&self, expr: &Expr) -> bool {
        matches!(expr, Expr::Object(_) | Expr::Array(_)) && !self.is_parenthesized(expr.loc())
    }

    /// Settle the pending shorthand default: `target` is the expression about
    /// to become a pattern, if any.
    pub(crate) fn take_shorthand_default(&mut self, target: Option<&Expr>) -> Result<()> {
        match self.shorthand_default.take() {
            Some(pos) if !target.is_some_and(|expr| self.may_become_pattern(expr)) => {
                Err(Error::syntax(SHORTHAND_DEFAULT, pos))
            }
            _ => Ok(()),
        }
    }

    /// `yield`, `yield expr` or `yield* expr`.
    pub(crate) fn parse_yield(&mut self) -> Result<Expr> {
        let start = self.start_node();
        self.next()?;
        let (delegate, argument) = if self.token.had_line_terminator_before {
            (false, None)
        } else if self.eat(TokenKind::Star)? {
            (true, Some(Box::new(self.parse_maybe_assign()?)))
        } else if self.kind().starts_expr() {
            (false, Some(Box::new(self.parse_maybe_assign()?)))
        } else {
            (false, None)
        };
        Ok(Expr::Yield(Box::new(YieldExpr {
            loc: self.finish_node(start),
            delegate,
            argument,
        })))
    }

    fn parse_conditional(&mut self) -> Result<Expr> {
        let start = self.start_node();
        let test = self.parse_expr_ops()?;
        if !self.eat(TokenKind::Question)? {
            return Ok(test);
        }
        let consequent = Box::new(self.allow_in(|p| p.parse_maybe_assign())?);
        self.expect(TokenKind::Colon)?;
        let alternate = Box::new(self.parse_maybe_assign()?);
        Ok(Expr::Conditional(Box::new(ConditionalExpr {
            loc: self.finish_node(start),
            test: Box::new(test),
            consequent,
            alternate,
        })))
    }

    // ── Operators ───────────────────────────────────────────────────────────

    fn parse_expr_ops(&mut self) -> Result<Expr> {
        let start = self.start_node();
        let left = self.parse_unary()?;
        if matches!(left, Expr::Arrow(_)) && !self.is_parenthesized(left.loc()) {
            return Ok(left);
        }
        self.parse_expr_op(left, start, 0)
    }

    /// Precedence climbing over binary and logical operators.
    fn parse_expr_op(&mut self, mut left: Expr, left_start: Position, min_prec: u8) -> Result<Expr> {
        loop {
            let Some((op, prec)) = infix(self.kind(), self.ctx.no_in) else {
                return Ok(left);
            };
            if prec <= min_prec {
                return Ok(left);
            }
            let is_exp = op == Infix::Binary(BinaryOp::Exp);
            if is_exp
                && matches!(left, Expr::Unary(_) | Expr::Await(_))
                && left.loc().start == left_start
            {
                return Err(Error::syntax(
                    "Illegal expression. Wrap left hand side or entire exponentiation in parentheses.",
                    left_start,
                ));
            }
            self.next()?;
            let right_start = self.start_node();
            let right = self.parse_unary()?;
            let right = self.parse_expr_op(right, right_start, if is_exp { prec - 1 } else { prec })?;
            if let Infix::Logical(op) = op {
                self.check_nullish_mixing(op, &left)?;
                self.check_nullish_mixing(op, &right)?;
            }
            let loc = self.finish_node(left_start);
            let (left_box, right_box) = (Box::new(left), Box::new(right));
            left = match op {
                Infix::Binary(op) => Expr::Binary(Box::new(BinaryExpr {
                    loc,
                    op,
                    left: left_box,
                    right: right_box,
                })),
                Infix::Logical(op) => Expr::Logical(Box::new(LogicalExpr {
                    loc,
                    op,
                    left: left_box,
                    right: right_box,
                })),
            };
        }
    }

    /// `??` cannot share an operand with `||` or `&&` without parentheses.
    fn check_nullish_mixing(&self, op: LogicalOp, operand: &Expr) -> Result<()> {
        let Expr::Logical(inner) = operand else {
            return Ok(());
        };
        let nullish = |op: LogicalOp| op == LogicalOp::NullishCoalesce;
        if nullish(op) != nullish(inner.op) && !self.is_parenthesized(inner.loc) {
            return Err(Error::syntax(
                "Nullish coalescing operator(??) requires parens when mixing with logical operators",
                inner.loc.start,
            ));
        }
        Ok(())
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let start = self.start_node();
        if let Some(op) = UnaryOp::from_token(self.kind()) {
            self.next()?;
            let argument = Box::new(self.nested(|p| p.parse_unary())?);
            if op == UnaryOp::Delete && self.ctx.strict && matches!(*argument, Expr::Ident(_)) {
                return Err(Error::syntax("Deleting local variable in strict mode", start));
            }
            return Ok(Expr::Unary(Box::new(UnaryExpr {
                loc: self.finish_node(start),
                op,
                argument,
            })));
        }
        if let Some(op) = update_op(self.kind()) {
            self.next()?;
            let argument = self.nested(|p| p.parse_unary())?;
            let argument = Box::new(self.check_update_target(argument)?);
            return Ok(Expr::Update(Box::new(UpdateExpr {
                loc: self.finish_node(start),
                op,
                prefix: true,
                argument,
            })));
        }
        if self.at(TokenKind::Await) && self.ctx.in_async {
            self.next()?;
            let argument = Box::new(self.nested(|p| p.parse_unary())?);
            return Ok(Expr::Await(Box::new(AwaitExpr {
                loc: self.finish_node(start),
                argument,
            })));
        }

        let expr = self.parse_expr_subscripts()?;
        match update_op(self.kind()) {
            Some(op) if !self.token.had_line_terminator_before => {
                let argument = Box::new(self.check_update_target(expr)?);
                self.next()?;
                Ok(Expr::Update(Box::new(UpdateExpr {
                    loc: self.finish_node(start),
                    op,
                    prefix: false,
                    argument,
                })))
            }
            _ => Ok(expr),
        }
    }

    /// Validate the operand of `++` / `--` through the target check.
    fn check_update_target(&mut self, argument: Expr) -> Result<Expr> {
        let target = simple_target(argument);
        self.check_lval(&target, LValContext::Update)?;
        match target {
            Pat::Ident(id) => Ok(Expr::Ident(id)),
            Pat::Capture(capture) => Ok(Expr::Capture(capture)),
            Pat::Expr(expr) => Ok(*expr),
            other => Err(Error::syntax(
                "Invalid left-hand side in update expression",
                other.loc().start,
            )),
        }
    }

    // ── Member / call ───────────────────────────────────────────────────────

    fn parse_expr_subscripts(&mut self) -> Result<Expr> {
        let start = self.start_node();
        let expr = self.parse_expr_atom()?;
        if matches!(expr, Expr::Arrow(_)) && !self.is_parenthesized(expr.loc()) {
            return Ok(expr);
        }
        self.parse_subscripts(expr, start, false)
    }

    fn parse_subscripts(&mut self, mut base: Expr, start: Position, no_calls: bool) -> Result<Expr> {
        loop {
            base = match self.kind() {
                TokenKind::Dot => {
                    self.next()?;
                    let property = self.parse_member_property()?;
                    Expr::Member(Box::new(MemberExpr {
                        loc: self.finish_node(start),
                        object: Box::new(base),
                        property,
                    }))
                }
                TokenKind::QuestionDot => {
                    if no_calls {
                        return Err(self.error_here(
                            "Constructors in/after an Optional Chain are not allowed",
                        ));
                    }
                    self.next()?;
                    match self.kind() {
                        TokenKind::LeftParen => {
                            self.next()?;
                            let arguments =
                                self.allow_in(|p| p.parse_call_arguments(TokenKind::RightParen))?;
                            Expr::OptionalCall(Box::new(CallExpr {
                                loc: self.finish_node(start),
                                callee: Box::new(base),
                                arguments,
                            }))
                        }
                        TokenKind::LeftBracket => {
                            let property = self.parse_computed_member()?;
                            Expr::OptionalMember(Box::new(MemberExpr {
                                loc: self.finish_node(start),
                                object: Box::new(base),
                                property,
                            }))
                        }
                        _ => {
                            let property = self.parse_member_property()?;
                            Expr::OptionalMember(Box::new(MemberExpr {
                                loc: self.finish_node(start),
                                object: Box::new(base),
                                property,
                            }))
                        }
                    }
                }
                TokenKind::LeftBracket => {
                    let property = self.parse_computed_member()?;
                    Expr::Member(Box::new(MemberExpr {
                        loc: self.finish_node(start),
                        object: Box::new(base),
                        property,
                    }))
                }
                TokenKind::LeftParen if !no_calls => {
                    let maybe_async_arrow = !self.token.had_line_terminator_before
                        && matches!(&base, Expr::Ident(id) if id.name == "async" && id.loc.start == start);
                    self.next()?;
                    let outer = self.shorthand_default.take();
                    let arguments =
                        self.allow_in(|p| p.parse_call_arguments(TokenKind::RightParen))?;
                    if maybe_async_arrow
                        && self.at(TokenKind::Arrow)
                        && !self.token.had_line_terminator_before
                    {
                        self.shorthand_default = outer;
                        let params = self.arguments_to_params(arguments)?;
                        return self.parse_arrow(start, params, true);
                    }
                    self.shorthand_default = outer.or(self.shorthand_default);
                    Expr::Call(Box::new(CallExpr {
                        loc: self.finish_node(start),
                        callee: Box::new(base),
                        arguments,
                    }))
                }
                TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => {
                    let quasi = self.parse_template(true)?;
                    Expr::TaggedTemplate(Box::new(TaggedTemplateExpr {
                        loc: self.finish_node(start),
                        tag: Box::new(base),
                        quasi,
                    }))
                }
                _ => return Ok(base),
            };
        }
    }

    /// `[expr]` after an object.
    fn parse_computed_member(&mut self) -> Result<MemberProp> {
        self.expect(TokenKind::LeftBracket)?;
        let property = self.allow_in(|p| p.parse_expression())?;
        self.expect(TokenKind::RightBracket)?;
        Ok(MemberProp::Computed(Box::new(property)))
    }

    /// The name after `.` or `?.`.
    fn parse_member_property(&mut self) -> Result<MemberProp> {
        if self.at(TokenKind::PrivateIdentifier) {
            return Ok(MemberProp::Private(self.parse_private_ident()?));
        }
        Ok(match self.parse_identifier(true)? {
            Name::Ident(id) => MemberProp::Ident(id),
            Name::Capture(capture) => MemberProp::Capture(capture),
        })
    }

    pub(crate) fn parse_call_arguments_base(&mut self, close: TokenKind) -> Result<NodeList<Expr>> {
        let mut arguments = Vec::new();
        while !self.eat(close)? {
            if !arguments.is_empty() {
                self.expect(TokenKind::Comma)?;
                if self.eat(close)? {
                    break;
                }
            }
            arguments.push(self.parse_expr_list_item()?);
        }
        Ok(NodeList::Items(arguments))
    }

    pub(crate) fn parse_expr_list_base(
        &mut self,
        close: TokenKind,
        allow_empty: bool,
    ) -> Result<NodeList<Option<Expr>>> {
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
            elements.push(Some(self.parse_expr_list_item()?));
        }
        Ok(NodeList::Items(elements))
    }

    /// An element of an argument or array list: an expression or `...expr`.
    pub(crate) fn parse_expr_list_item(&mut self) -> Result<Expr> {
        if !self.at(TokenKind::DotDotDot) {
            return self.parse_maybe_assign_cover();
        }
        let start = self.start_node();
        self.next()?;
        let argument = Box::new(self.parse_maybe_assign_cover()?);
        Ok(Expr::Spread(Box::new(SpreadElement {
            loc: self.finish_node(start),
            argument,
        })))
    }

    // ── Atoms ───────────────────────────────────────────────────────────────

    pub(crate) fn parse_expr_atom_base(&mut self) -> Result<Expr> {
        let start = self.start_node();
        let loc = self.token.span;
        match self.kind() {
            TokenKind::Super => {
                self.next()?;
                if !matches!(
                    self.kind(),
                    TokenKind::LeftParen | TokenKind::Dot | TokenKind::LeftBracket
                ) {
                    return Err(Error::syntax(
                        "'super' can only be used with function calls or in property accesses",
                        start,
                    ));
                }
                Ok(Expr::Super(SuperExpr { loc }))
            }
            TokenKind::This => {
                self.next()?;
                Ok(Expr::This(ThisExpr { loc }))
            }
            TokenKind::Null => {
                self.next()?;
                Ok(Expr::Null(NullLit { loc }))
            }
            TokenKind::True | TokenKind::False => {
                let value = self.at(TokenKind::True);
                self.next()?;
                Ok(Expr::Bool(BoolLit { loc, value }))
            }
            TokenKind::NumericLiteral => self.parse_numeric_literal(),
            TokenKind::StringLiteral => Ok(Expr::Str(self.parse_string_literal()?)),
            TokenKind::RegExpLiteral => {
                let raw = self.token_text();
                let Some(split) = raw.rfind('/').filter(|&i| i > 0) else {
                    return self.unexpected();
                };
                self.next()?;
                Ok(Expr::Regexp(RegExpLit {
                    loc,
                    pattern: raw[1..split].to_string(),
                    flags: raw[split + 1..].to_string(),
                }))
            }
            TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => {
                Ok(Expr::Template(Box::new(self.parse_template(false)?)))
            }
            TokenKind::LeftParen => self.parse_paren_and_distinguish(),
            TokenKind::LeftBracket => {
                self.next()?;
                let elements = self.allow_in(|p| p.parse_expr_list(TokenKind::RightBracket, true))?;
                Ok(Expr::Array(Box::new(ArrayExpr {
                    loc: self.finish_node(start),
                    elements,
                })))
            }
            TokenKind::LeftBrace => self.parse_object_literal(),
            TokenKind::Function => Ok(Expr::Fn(Box::new(self.parse_function(start, false, false)?))),
            TokenKind::Class => Ok(Expr::Class(Box::new(self.parse_class(start, false)?))),
            TokenKind::New => self.parse_new(),
            TokenKind::Import => self.parse_import_expr(),
            TokenKind::Async if self.at_async_function()? => {
                self.next()?;
                Ok(Expr::Fn(Box::new(self.parse_function(start, true, false)?)))
            }
            TokenKind::Async => {
                let ahead = self.lookahead()?;
                if !ahead.kind.is_name() || ahead.had_line_terminator_before {
                    return self.parse_name_expr();
                }
                self.next()?;
                let param = match self.parse_identifier(false)? {
                    Name::Ident(id) => Pat::Ident(id),
                    Name::Capture(capture) => Pat::Capture(capture),
                };
                self.check_lval(&param, LValContext::Param)?;
                if !self.at(TokenKind::Arrow) || self.token.had_line_terminator_before {
                    return self.unexpected();
                }
                self.parse_arrow(start, NodeList::Items(vec![param]), true)
            }
            kind if kind.is_name() || matches!(kind, TokenKind::Yield | TokenKind::Await) => {
                self.parse_name_expr()
            }
            _ => self.unexpected(),
        }
    }

    fn parse_name_expr(&mut self) -> Result<Expr> {
        Ok(match self.parse_identifier(false)? {
            Name::Ident(id) => Expr::Ident(id),
            Name::Capture(capture) => Expr::Capture(capture),
        })
    }

    fn parse_numeric_literal(&mut self) -> Result<Expr> {
        let loc = self.token.span;
        let raw = self.token_text();
        let value = match self.token.value {
            TokenValue::Number(n) => n,
            _ => f64::NAN,
        };
        self.next()?;
        Ok(match raw.strip_suffix('n') {
            Some(digits) => Expr::BigInt(BigIntLit {
                loc,
                value: digits.replace('_', ""),
            }),
            None => Expr::Num(NumLit {
                loc,
                value,
                raw: raw.to_string(),
            }),
        })
    }

    pub(crate) fn parse_string_literal(&mut self) -> Result<StringLit> {
        if !self.at(TokenKind::StringLiteral) {
            return Err(self.error_here("Unexpected token, expected \"string\""));
        }
        let loc = self.token.span;
        let raw = self.token_text();
        let Some(value) = cook(&raw[1..raw.len() - 1], false) else {
            return Err(self.error_here("Invalid escape sequence"));
        };
        self.next()?;
        Ok(StringLit { loc, value })
    }

    fn parse_private_ident(&mut self) -> Result<PrivateIdent> {
        let loc = self.token.span;
        let name = self.token.str_value().unwrap_or_default().to_string();
        self.expect(TokenKind::PrivateIdentifier)?;
        Ok(PrivateIdent { loc, name })
    }

    pub(crate) fn parse_identifier_base(&mut self, liberal: bool) -> Result<Name> {
        Ok(Name::Ident(self.parse_ident_plain(liberal)?))
    }

    /// An identifier that no plugin may replace: labels, import and export
    /// names, meta properties.
    pub(crate) fn parse_ident_plain(&mut self, liberal: bool) -> Result<Ident> {
        let kind = self.kind();
        let allowed = if liberal {
            kind.is_identifier_name()
        } else {
            (kind.is_name() && !(self.ctx.strict && matches!(kind, TokenKind::Let | TokenKind::Static)))
                || (kind == TokenKind::Yield && !self.ctx.in_generator && !self.ctx.strict)
                || (kind == TokenKind::Await && !self.ctx.in_async)
        };
        if !allowed {
            return Err(self.error_here(format!(
                "Unexpected token, expected \"{}\"",
                TokenKind::Identifier.label()
            )));
        }
        let name = match self.token.str_value() {
            Some(name) => name.to_string(),
            None => self.token_text().to_string(),
        };
        let loc = self.token.span;
        self.next()?;
        Ok(Ident { loc, name })
    }

    pub(crate) fn parse_function_id_base(&mut self, require: bool) -> Result<Option<Name>> {
        if !require && self.at(TokenKind::LeftParen) {
            return Ok(None);
        }
        self.parse_identifier(false).map(Some)
    }

    // ── Templates ───────────────────────────────────────────────────────────

    pub(crate) fn parse_template(&mut self, tagged: bool) -> Result<TemplateLit> {
        let start = self.start_node();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let kind = self.kind();
            let opening = matches!(
                kind,
                TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead
            );
            let continuing = matches!(kind, TokenKind::TemplateMiddle | TokenKind::TemplateTail);
            if (quasis.is_empty() && !opening) || (!quasis.is_empty() && !continuing) {
                return Err(self.error_here("Unexpected token, expected \"}\""));
            }
            let raw = self.token.str_value().unwrap_or_default().to_string();
            let cooked = cook(&raw, true);
            if cooked.is_none() && !tagged {
                return Err(self.error_here("Invalid escape sequence in template"));
            }
            let tail = matches!(
                kind,
                TokenKind::NoSubstitutionTemplate | TokenKind::TemplateTail
            );
            quasis.push(TemplateElement {
                loc: self.token.span,
                raw,
                cooked,
                tail,
            });
            self.next()?;
            if tail {
                break;
            }
            expressions.push(self.allow_in(|p| p.parse_expression())?);
        }
        Ok(TemplateLit {
            loc: self.finish_node(start),
            quasis,
            expressions,
        })
    }

    // ── Parentheses and arrows ──────────────────────────────────────────────

    /// `( … )`: a parenthesised expression, a sequence, or arrow parameters.
    fn parse_paren_and_distinguish(&mut self) -> Result<Expr> {
        let start = self.start_node();
        self.expect(TokenKind::LeftParen)?;
        let outer = self.shorthand_default.take();
        let items = self.allow_in(|p| p.parse_paren_items())?;
        let close = self.start_node();
        self.expect(TokenKind::RightParen)?;

        if self.at(TokenKind::Arrow) && !self.token.had_line_terminator_before {
            self.shorthand_default = outer;
            let params = self.arguments_to_params(items)?;
            return self.parse_arrow(start, params, false);
        }
        self.take_shorthand_default(None)?;
        self.shorthand_default = outer;

        let mut items = match items {
            NodeList::Capture(capture) => {
                return Ok(Expr::Sequence(Box::new(SequenceExpr {
                    loc: capture.loc,
                    expressions: NodeList::Capture(capture),
                })));
            }
            NodeList::Items(items) => items,
        };
        if let Some(spread) = items.iter().find(|e| matches!(e, Expr::Spread(_))) {
            return Err(Error::syntax("Unexpected token", spread.loc().start));
        }
        match items.len() {
            0 => Err(Error::syntax("Unexpected token", close)),
            1 => {
                let item = items.swap_remove(0);
                self.mark_parenthesized(item.loc());
                Ok(item)
            }
            n => {
                let loc = Span {
                    start: items[0].loc().start,
                    end: items[n - 1].loc().end,
                };
                self.mark_parenthesized(loc);
                Ok(Expr::Sequence(Box::new(SequenceExpr {
                    loc,
                    expressions: NodeList::Items(items),
                })))
            }
        }
    }

    /// Items between `(` and `)`; leaves the `)` in place.
    pub(crate) fn parse_paren_items_base(&mut self) -> Result<NodeList<Expr>> {
        let mut items = Vec::new();
        while !self.at(TokenKind::RightParen) {
            if !items.is_empty() {
                self.expect(TokenKind::Comma)?;
                if self.at(TokenKind::RightParen) {
                    break;
                }
            }
            items.push(self.parse_expr_list_item()?);
        }
        Ok(NodeList::Items(items))
    }

    /// Reinterpret call arguments or parenthesised items as arrow parameters.
    pub(crate) fn arguments_to_params(&mut self, items: NodeList<Expr>) -> Result<NodeList<Pat>> {
        let list = items.map_items(|items| items.into_iter().map(Some).collect());
        let params = self
            .to_assignable_list(list)?
            .map_items(|items| items.into_iter().flatten().collect());
        self.check_params(&params)?;
        Ok(params)
    }

    fn check_params(&mut self, params: &NodeList<Pat>) -> Result<()> {
        for param in params.items().unwrap_or_default() {
            self.check_lval(param, LValContext::Param)?;
        }
        Ok(())
    }

    /// `=> body`, with the parameters already parsed.
    fn parse_arrow(&mut self, start: Position, params: NodeList<Pat>, is_async: bool) -> Result<Expr> {
        self.expect(TokenKind::Arrow)?;
        let ctx = Context {
            in_function: true,
            in_generator: false,
            in_async: is_async,
            ..self.ctx
        };
        let body = self.with_context(ctx, |p| {
            if p.at(TokenKind::LeftBrace) {
                Ok(ArrowBody::Block(p.allow_in(|p| p.parse_function_body())?))
            } else {
                Ok(ArrowBody::Expr(Box::new(p.parse_maybe_assign()?)))
            }
        })?;
        Ok(Expr::Arrow(Box::new(ArrowExpr {
            loc: self.finish_node(start),
            is_async,
            params,
            body,
        })))
    }

    // ── new / import ────────────────────────────────────────────────────────

    fn parse_new(&mut self) -> Result<Expr> {
        let start = self.start_node();
        let meta_loc = self.token.span;
        self.expect(TokenKind::New)?;
        if self.eat(TokenKind::Dot)? {
            let property = self.parse_ident_plain(true)?;
            if property.name != "target" {
                return Err(Error::syntax(
                    "The only valid meta property for new is new.target",
                    property.loc.start,
                ));
            }
            return Ok(Expr::MetaProp(MetaPropExpr {
                loc: self.finish_node(start),
                meta: Ident {
                    loc: meta_loc,
                    name: "new".into(),
                },
                property,
            }));
        }
        if self.at(TokenKind::Import) {
            return Err(self.error_here("Cannot use new with import(...)"));
        }
        let callee_start = self.start_node();
        let callee = self.parse_expr_atom()?;
        let callee = Box::new(self.parse_subscripts(callee, callee_start, true)?);
        let arguments = if self.eat(TokenKind::LeftParen)? {
            self.allow_in(|p| p.parse_expr_list(TokenKind::RightParen, false))?
                .map_items(|items| items.into_iter().flatten().collect())
        } else {
            NodeList::default()
        };
        Ok(Expr::New(Box::new(NewExpr {
            loc: self.finish_node(start),
            callee,
            arguments,
        })))
    }

    /// `import(…)` or `import.meta`.
    fn parse_import_expr(&mut self) -> Result<Expr> {
        let start = self.start_node();
        let meta_loc = self.token.span;
        self.expect(TokenKind::Import)?;
        if self.eat(TokenKind::Dot)? {
            let property = self.parse_ident_plain(true)?;
            if property.name != "meta" || self.source_type != SourceType::Module {
                return Err(Error::syntax(
                    "import.meta may appear only with 'sourceType: module'",
                    start,
                ));
            }
            return Ok(Expr::MetaProp(MetaPropExpr {
                loc: self.finish_node(start),
                meta: Ident {
                    loc: meta_loc,
                    name: "import".into(),
                },
                property,
            }));
        }
        self.expect(TokenKind::LeftParen)?;
        let (source, options) = self.allow_in(|p| {
            let source = Box::new(p.parse_maybe_assign()?);
            let options = if p.eat(TokenKind::Comma)? && !p.at(TokenKind::RightParen) {
                Some(Box::new(p.parse_maybe_assign()?))
            } else {
                None
            };
            p.eat(TokenKind::Comma)?;
            Ok((source, options))
        })?;
        self.expect(TokenKind::RightParen)?;
        Ok(Expr::Import(Box::new(ImportExpr {
            loc: self.finish_node(start),
            source,
            options,
        })))
    }

    // ── Object literals ─────────────────────────────────────────────────────

    fn parse_object_literal(&mut self) -> Result<Expr> {
        let start = self.start_node();
        self.expect(TokenKind::LeftBrace)?;
        let properties = self.allow_in(|p| {
            let mut properties = Vec::new();
            while !p.eat(TokenKind::RightBrace)? {
                properties.push(p.parse_object_member()?);
                if !p.at(TokenKind::RightBrace) {
                    p.expect(TokenKind::Comma)?;
                }
            }
            Ok(properties)
        })?;
        Ok(Expr::Object(Box::new(ObjectExpr {
            loc: self.finish_node(start),
            properties,
        })))
    }

    fn parse_object_member(&mut self) -> Result<ObjectProp> {
        let start = self.start_node();
        if self.eat(TokenKind::DotDotDot)? {
            let argument = Box::new(self.parse_maybe_assign()?);
            return Ok(ObjectProp::Spread(SpreadElement {
                loc: self.finish_node(start),
                argument,
            }));
        }
        let (is_async, is_generator, kind) = self.parse_method_modifiers()?;
        let key = self.parse_property_key()?;
        let value = match kind {
            MethodKind::Get => PropValue::Get(self.parse_method(false, false)?),
            MethodKind::Set => PropValue::Set(self.parse_method(false, false)?),
            _ if self.at(TokenKind::LeftParen) => {
                PropValue::Method(self.parse_method(is_async, is_generator)?)
            }
            _ if is_async || is_generator => return self.unexpected(),
            _ if self.eat(TokenKind::Colon)? => {
                PropValue::Value(Box::new(self.parse_maybe_assign_cover()?))
            }
            _ if matches!(key, PropKey::Ident(_) | PropKey::Capture(_)) => {
                let equal = self.start_node();
                if self.eat(TokenKind::Equal)? {
                    self.shorthand_default.get_or_insert(equal);
                    PropValue::CoverInit(Box::new(self.parse_maybe_assign()?))
                } else {
                    PropValue::Shorthand
                }
            }
            _ => return self.unexpected(),
        };
        Ok(ObjectProp::Prop(Box::new(Prop {
            loc: self.finish_node(start),
            key,
            value,
        })))
    }

    /// `async`, `*`, `get` and `set` in front of a method name.  Each is a
    /// modifier only when a property name follows it.
    fn parse_method_modifiers(&mut self) -> Result<(bool, bool, MethodKind)> {
        let mut is_async = false;
        if self.at(TokenKind::Async) {
            let ahead = self.lookahead()?;
            if names_member(ahead.kind) && !ahead.had_line_terminator_before {
                self.next()?;
                is_async = true;
            }
        }
        let is_generator = self.eat(TokenKind::Star)?;
        let mut kind = MethodKind::Method;
        if !is_async && !is_generator && matches!(self.kind(), TokenKind::Get | TokenKind::Set) {
            if names_member(self.lookahead()?.kind) {
                kind = if self.at(TokenKind::Get) {
                    MethodKind::Get
                } else {
                    MethodKind::Set
                };
                self.next()?;
            }
        }
        Ok((is_async, is_generator, kind))
    }

    pub(crate) fn parse_property_key(&mut self) -> Result<PropKey> {
        match self.kind() {
            TokenKind::StringLiteral => Ok(PropKey::Str(self.parse_string_literal()?)),
            TokenKind::NumericLiteral => {
                let loc = self.token.span;
                let raw = self.token_text().to_string();
                let value = match self.token.value {
                    TokenValue::Number(n) => n,
                    _ => f64::NAN,
                };
                self.next()?;
                Ok(PropKey::Num(NumLit { loc, value, raw }))
            }
            TokenKind::LeftBracket => {
                self.next()?;
                let key = self.allow_in(|p| p.parse_maybe_assign())?;
                self.expect(TokenKind::RightBracket)?;
                Ok(PropKey::Computed(Box::new(key)))
            }
            TokenKind::PrivateIdentifier => Ok(PropKey::Private(self.parse_private_ident()?)),
            _ => Ok(match self.parse_identifier(true)? {
                Name::Ident(id) => PropKey::Ident(id),
                Name::Capture(capture) => PropKey::Capture(capture),
            }),
        }
    }

    // ── Functions ───────────────────────────────────────────────────────────

    /// `function [*] [id] (params) { body }`; `async` is already consumed.
    pub(crate) fn parse_function(
        &mut self,
        start: Position,
        is_async: bool,
        require_id: bool,
    ) -> Result<Function> {
        self.expect(TokenKind::Function)?;
        let is_generator = self.eat(TokenKind::Star)?;
        let id = self.parse_function_id(require_id)?;
        let (params, body) = self.parse_function_rest(is_async, is_generator)?;
        Ok(Function {
            loc: self.finish_node(start),
            id,
            is_async,
            is_generator,
            params,
            body,
        })
    }

    /// A method's parameters and body; the key is already consumed.
    fn parse_method(&mut self, is_async: bool, is_generator: bool) -> Result<Function> {
        let start = self.start_node();
        let (params, body) = self.parse_function_rest(is_async, is_generator)?;
        Ok(Function {
            loc: self.finish_node(start),
            id: None,
            is_async,
            is_generator,
            params,
            body,
        })
    }

    fn parse_function_rest(
        &mut self,
        is_async: bool,
        is_generator: bool,
    ) -> Result<(NodeList<Pat>, BlockStmt)> {
        let ctx = Context {
            strict: self.ctx.strict,
            in_function: true,
            in_generator: is_generator,
            in_async: is_async,
            no_in: false,
        };
        self.with_context(ctx, |p| {
            p.expect(TokenKind::LeftParen)?;
            let params = p
                .parse_binding_list(TokenKind::RightParen, false)?
                .map_items(|items| items.into_iter().flatten().collect());
            p.check_params(&params)?;
            let body = p.parse_function_body()?;
            Ok((params, body))
        })
    }

    // ── Classes ─────────────────────────────────────────────────────────────

    /// `class [id] [extends expr] { body }`.  Class bodies are strict.
    pub(crate) fn parse_class(&mut self, start: Position, require_id: bool) -> Result<Class> {
        self.expect(TokenKind::Class)?;
        let ctx = Context {
            strict: true,
            ..self.ctx
        };
        self.with_context(ctx, |p| {
            let id = if matches!(p.kind(), TokenKind::Extends | TokenKind::LeftBrace) {
                if require_id {
                    return Err(p.error_here("A class name is required"));
                }
                None
            } else {
                Some(p.parse_identifier(false)?)
            };
            let super_class = if p.eat(TokenKind::Extends)? {
                let super_start = p.start_node();
                let atom = p.parse_expr_atom()?;
                let heritage = p.parse_subscripts(atom, super_start, false)?;
                p.take_shorthand_default(None)?;
                Some(Box::new(heritage))
            } else {
                None
            };
            let body = p.parse_class_body()?;
            Ok(Class {
                loc: p.finish_node(start),
                id,
                super_class,
                body,
            })
        })
    }

    fn parse_class_body(&mut self) -> Result<ClassBody> {
        let start = self.start_node();
        self.expect(TokenKind::LeftBrace)?;
        let mut body = Vec::new();
        while !self.eat(TokenKind::RightBrace)? {
            if self.eat(TokenKind::Semicolon)? {
                continue;
            }
            if self.at(TokenKind::Eof) {
                return self.unexpected();
            }
            body.push(self.parse_class_member()?);
        }
        Ok(ClassBody {
            loc: self.finish_node(start),
            body,
        })
    }

    fn parse_class_member(&mut self) -> Result<ClassMember> {
        let start = self.start_node();
        let mut is_static = false;
        if self.at(TokenKind::Static) {
            let ahead = self.lookahead()?.kind;
            if ahead == TokenKind::LeftBrace {
                self.next()?;
                self.next()?;
                let ctx = Context {
                    in_function: false,
                    in_generator: false,
                    in_async: false,
                    no_in: false,
                    ..self.ctx
                };
                let body = self
                    .with_context(ctx, |p| p.parse_block_body(TokenKind::RightBrace, false, false))?
                    .body;
                return Ok(ClassMember::StaticBlock(StaticBlock {
                    loc: self.finish_node(start),
                    body,
                }));
            }
            if names_member(ahead) {
                self.next()?;
                is_static = true;
            }
        }

        let (is_async, is_generator, kind) = self.parse_method_modifiers()?;
        let key = self.parse_property_key()?;
        if self.at(TokenKind::LeftParen) || is_async || is_generator || kind != MethodKind::Method {
            let is_constructor = !is_static
                && kind == MethodKind::Method
                && !is_async
                && !is_generator
                && key_is(&key, "constructor");
            let value = self.parse_method(is_async, is_generator)?;
            return Ok(ClassMember::Method(MethodDef {
                loc: self.finish_node(start),
                is_static,
                kind: if is_constructor {
                    MethodKind::Constructor
                } else {
                    kind
                },
                key,
                value,
            }));
        }

        let value = if self.eat(TokenKind::Equal)? {
            let ctx = Context {
                in_generator: false,
                in_async: false,
                no_in: false,
                ..self.ctx
            };
            Some(Box::new(self.with_context(ctx, |p| p.parse_maybe_assign())?))
        } else {
            None
        };
        self.semicolon()?;
        Ok(ClassMember::Property(PropertyDef {
            loc: self.finish_node(start),
            is_static,
            key,
            value,
        }))
    }
}

/// `true` when a modifier followed by `kind` is really a modifier, not a
/// member named `async`, `get`, `set` or `static`.
fn names_member(kind: TokenKind) -> bool {
    !matches!(
        kind,
        TokenKind::LeftParen
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::RightBrace
            | TokenKind::Equal
            | TokenKind::Semicolon
            | TokenKind::Eof
    )
}

fn key_is(key: &PropKey, name: &str) -> bool {
    match key {
        PropKey::Ident(id) => id.name == name,
        PropKey::Str(s) => s.value == name,
        _ => false,
    }
}

fn update_op(kind: TokenKind) -> Option<UpdateOp> {
    match kind {
        TokenKind::PlusPlus => Some(UpdateOp::Increment),
        TokenKind::MinusMinus => Some(UpdateOp::Decrement),
        _ => None,
    }
}

/// The target of a compound assignment or update: names and captures keep
/// their own pattern form, anything else is left for the target check.
fn simple_target(expr: Expr) -> Pat {
    match expr {
        Expr::Ident(id) => Pat::Ident(id),
        Expr::Capture(capture) => Pat::Capture(capture),
        other => Pat::Expr(Box::new(other)),
    }
}
