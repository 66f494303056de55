//! Statements, declarations and module items.

use crate::error::{Error, Result};
use crate::parser::ast::*;
use crate::parser::scanner::{Position, TokenKind};
use crate::parser::{BlockBody, Context, LValContext, Parser};

impl<'src> Parser<'src> {
    // ── Block bodies ────────────────────────────────────────────────────────

    pub(crate) fn parse_block_body_base(
        &mut self,
        end: TokenKind,
        allow_directives: bool,
        top_level: bool,
    ) -> Result<BlockBody> {
        let mut directives = Vec::new();
        let mut body = Vec::new();
        let mut in_prologue = allow_directives;
        while !self.at(end) {
            if self.at(TokenKind::Eof) {
                self.expect(end)?;
            }
            let stmt = if top_level {
                self.parse_module_item()?
            } else {
                self.parse_statement_list_item()?
            };
            if in_prologue {
                if let Some(directive) = self.as_directive(&stmt) {
                    if directive.value == "use strict" {
                        self.ctx.strict = true;
                    }
                    directives.push(directive);
                    continue;
                }
                in_prologue = false;
            }
            body.push(stmt);
        }
        if end != TokenKind::Eof {
            self.next()?;
        }
        Ok(BlockBody {
            directives,
            body: NodeList::Items(body),
        })
    }

    /// A statement is a directive when it is an unparenthesised string
    /// literal on its own.
    fn as_directive(&self, stmt: &Stmt) -> Option<Directive> {
        let Stmt::Expr(ExprStmt { loc, expr }) = stmt else {
            return None;
        };
        let Expr::Str(lit) = &**expr else {
            return None;
        };
        if lit.loc.start != loc.start {
            return None;
        }
        let raw = lit.loc.text(self.source);
        Some(Directive {
            loc: lit.loc,
            value: raw[1..raw.len() - 1].to_string(),
        })
    }

    /// `{ … }` with the braces.
    pub(crate) fn parse_block(&mut self) -> Result<BlockStmt> {
        let start = self.start_node();
        self.expect(TokenKind::LeftBrace)?;
        let BlockBody { body, .. } = self.parse_block_body(TokenKind::RightBrace, false, false)?;
        Ok(BlockStmt {
            loc: self.finish_node(start),
            directives: Vec::new(),
            body,
        })
    }

    /// A function body, which may open with a directive prologue.
    pub(crate) fn parse_function_body(&mut self) -> Result<BlockStmt> {
        let start = self.start_node();
        self.expect(TokenKind::LeftBrace)?;
        let BlockBody { directives, body } =
            self.parse_block_body(TokenKind::RightBrace, true, false)?;
        Ok(BlockStmt {
            loc: self.finish_node(start),
            directives,
            body,
        })
    }

    // ── Statements ──────────────────────────────────────────────────────────

    fn parse_module_item(&mut self) -> Result<Stmt> {
        match self.kind() {
            TokenKind::Import => {
                let ahead = self.lookahead()?.kind;
                if matches!(ahead, TokenKind::LeftParen | TokenKind::Dot) {
                    return self.parse_statement_list_item();
                }
                self.require_module()?;
                Ok(Stmt::ModuleDecl(self.parse_import()?))
            }
            TokenKind::Export => {
                self.require_module()?;
                Ok(Stmt::ModuleDecl(self.parse_export()?))
            }
            _ => self.parse_statement_list_item(),
        }
    }

    fn require_module(&self) -> Result<()> {
        if self.source_type == SourceType::Module {
            return Ok(());
        }
        Err(self.error_here(
            "'import' and 'export' may appear only with 'sourceType: module'",
        ))
    }

    /// A statement or a declaration.
    pub(crate) fn parse_statement_list_item(&mut self) -> Result<Stmt> {
        match self.kind() {
            TokenKind::Function => {
                let start = self.start_node();
                Ok(Stmt::FnDecl(Box::new(self.parse_function(start, false, true)?)))
            }
            TokenKind::Async if self.at_async_function()? => {
                let start = self.start_node();
                self.next()?;
                Ok(Stmt::FnDecl(Box::new(self.parse_function(start, true, true)?)))
            }
            TokenKind::Class => {
                let start = self.start_node();
                Ok(Stmt::ClassDecl(Box::new(self.parse_class(start, true)?)))
            }
            TokenKind::Const => self.parse_var_statement(VarKind::Const),
            TokenKind::Let if self.lookahead()?.kind.starts_binding() => {
                self.parse_var_statement(VarKind::Let)
            }
            _ => self.parse_statement(),
        }
    }

    /// `async` directly followed by `function` on the same line.
    pub(crate) fn at_async_function(&self) -> Result<bool> {
        if !self.at(TokenKind::Async) {
            return Ok(false);
        }
        let ahead = self.lookahead()?;
        Ok(ahead.kind == TokenKind::Function && !ahead.had_line_terminator_before)
    }

    pub(crate) fn parse_statement(&mut self) -> Result<Stmt> {
        self.nested(|p| p.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt> {
        let start = self.start_node();
        match self.kind() {
            TokenKind::LeftBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Var => self.parse_var_statement(VarKind::Var),
            TokenKind::Const | TokenKind::Class | TokenKind::Function => {
                self.parse_statement_list_item()
            }
            TokenKind::Async if self.at_async_function()? => self.parse_statement_list_item(),
            TokenKind::Let if self.lookahead()?.kind == TokenKind::LeftBracket => {
                self.parse_var_statement(VarKind::Let)
            }
            TokenKind::If => self.parse_if(start),
            TokenKind::For => self.parse_for(start),
            TokenKind::While => {
                self.next()?;
                let test = self.parse_paren_expression()?;
                let body = Box::new(self.parse_statement()?);
                Ok(Stmt::While(WhileStmt {
                    loc: self.finish_node(start),
                    test,
                    body,
                }))
            }
            TokenKind::Do => {
                self.next()?;
                let body = Box::new(self.parse_statement()?);
                self.expect(TokenKind::While)?;
                let test = self.parse_paren_expression()?;
                self.eat(TokenKind::Semicolon)?;
                Ok(Stmt::DoWhile(DoWhileStmt {
                    loc: self.finish_node(start),
                    body,
                    test,
                }))
            }
            TokenKind::Switch => self.parse_switch(start),
            TokenKind::Try => self.parse_try(start),
            TokenKind::Return => {
                if !self.ctx.in_function {
                    return Err(self.error_here("'return' outside of function"));
                }
                self.next()?;
                let argument = if self.at(TokenKind::Semicolon) || self.can_insert_semicolon() {
                    None
                } else {
                    Some(Box::new(self.parse_expression()?))
                };
                self.semicolon()?;
                Ok(Stmt::Return(ReturnStmt {
                    loc: self.finish_node(start),
                    argument,
                }))
            }
            TokenKind::Throw => {
                self.next()?;
                if self.token.had_line_terminator_before {
                    return Err(self.error_here("Illegal newline after throw"));
                }
                let argument = Box::new(self.parse_expression()?);
                self.semicolon()?;
                Ok(Stmt::Throw(ThrowStmt {
                    loc: self.finish_node(start),
                    argument,
                }))
            }
            TokenKind::Break | TokenKind::Continue => self.parse_break_continue(start),
            TokenKind::Debugger => {
                self.next()?;
                self.semicolon()?;
                Ok(Stmt::Debugger(DebuggerStmt {
                    loc: self.finish_node(start),
                }))
            }
            TokenKind::With => {
                if self.ctx.strict {
                    return Err(self.error_here("'with' in strict mode"));
                }
                self.next()?;
                let object = self.parse_paren_expression()?;
                let body = Box::new(self.parse_statement()?);
                Ok(Stmt::With(WithStmt {
                    loc: self.finish_node(start),
                    object,
                    body,
                }))
            }
            TokenKind::Semicolon => {
                self.next()?;
                Ok(Stmt::Empty(EmptyStmt {
                    loc: self.finish_node(start),
                }))
            }
            kind if kind.is_name() && self.lookahead()?.kind == TokenKind::Colon => {
                let label = self.parse_ident_plain(false)?;
                self.expect(TokenKind::Colon)?;
                let body = Box::new(self.parse_statement()?);
                Ok(Stmt::Labeled(LabeledStmt {
                    loc: self.finish_node(start),
                    label,
                    body,
                }))
            }
            _ => {
                let expr = Box::new(self.parse_expression()?);
                self.semicolon()?;
                Ok(Stmt::Expr(ExprStmt {
                    loc: self.finish_node(start),
                    expr,
                }))
            }
        }
    }

    /// `( expression )`
    fn parse_paren_expression(&mut self) -> Result<Box<Expr>> {
        self.expect(TokenKind::LeftParen)?;
        let expr = self.allow_in(|p| p.parse_expression())?;
        self.expect(TokenKind::RightParen)?;
        Ok(Box::new(expr))
    }

    fn parse_if(&mut self, start: Position) -> Result<Stmt> {
        self.next()?;
        let test = self.parse_paren_expression()?;
        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.eat(TokenKind::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::If(IfStmt {
            loc: self.finish_node(start),
            test,
            consequent,
            alternate,
        }))
    }

    fn parse_break_continue(&mut self, start: Position) -> Result<Stmt> {
        let is_break = self.at(TokenKind::Break);
        self.next()?;
        let label = if !self.can_insert_semicolon() && self.kind().is_name() {
            Some(self.parse_ident_plain(false)?)
        } else {
            None
        };
        self.semicolon()?;
        let loc = self.finish_node(start);
        Ok(if is_break {
            Stmt::Break(BreakStmt { loc, label })
        } else {
            Stmt::Continue(ContinueStmt { loc, label })
        })
    }

    fn parse_switch(&mut self, start: Position) -> Result<Stmt> {
        self.next()?;
        let discriminant = self.parse_paren_expression()?;
        self.expect(TokenKind::LeftBrace)?;
        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.eat(TokenKind::RightBrace)? {
            let case_start = self.start_node();
            let test = if self.eat(TokenKind::Case)? {
                Some(self.allow_in(|p| p.parse_expression())?)
            } else if self.at(TokenKind::Default) {
                if seen_default {
                    return Err(self.error_here("Multiple default clauses"));
                }
                seen_default = true;
                self.next()?;
                None
            } else {
                return self.unexpected();
            };
            self.expect(TokenKind::Colon)?;
            let mut consequent = Vec::new();
            while !matches!(
                self.kind(),
                TokenKind::Case | TokenKind::Default | TokenKind::RightBrace
            ) {
                if self.at(TokenKind::Eof) {
                    return self.unexpected();
                }
                consequent.push(self.parse_statement_list_item()?);
            }
            cases.push(SwitchCase {
                loc: self.finish_node(case_start),
                test,
                consequent,
            });
        }
        Ok(Stmt::Switch(SwitchStmt {
            loc: self.finish_node(start),
            discriminant,
            cases,
        }))
    }

    fn parse_try(&mut self, start: Position) -> Result<Stmt> {
        self.next()?;
        let block = self.parse_block()?;
        let handler = if self.at(TokenKind::Catch) {
            let catch_start = self.start_node();
            self.next()?;
            let param = if self.eat(TokenKind::LeftParen)? {
                let param = self.parse_binding_atom()?;
                self.check_lval(&param, LValContext::CatchClause)?;
                self.expect(TokenKind::RightParen)?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause {
                loc: self.finish_node(catch_start),
                param,
                body,
            })
        } else {
            None
        };
        let finalizer = if self.eat(TokenKind::Finally)? {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.error_here("Missing catch or finally clause"));
        }
        Ok(Stmt::Try(TryStmt {
            loc: self.finish_node(start),
            block,
            handler,
            finalizer,
        }))
    }

    // ── Variables ───────────────────────────────────────────────────────────

    fn parse_var_statement(&mut self, kind: VarKind) -> Result<Stmt> {
        let start = self.start_node();
        self.next()?;
        let declarators = self.parse_var(kind, false)?;
        self.semicolon()?;
        Ok(Stmt::VarDecl(VarDecl {
            loc: self.finish_node(start),
            kind,
            declarators,
        }))
    }

    pub(crate) fn parse_var_base(
        &mut self,
        kind: VarKind,
        is_for: bool,
    ) -> Result<NodeList<VarDeclarator>> {
        let mut declarators = Vec::new();
        loop {
            declarators.push(self.parse_var_declarator(kind, is_for)?);
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(NodeList::Items(declarators))
    }

    /// One `pattern [= init]`.
    pub(crate) fn parse_var_declarator(
        &mut self,
        kind: VarKind,
        is_for: bool,
    ) -> Result<VarDeclarator> {
        let start = self.start_node();
        let id = self.parse_binding_atom()?;
        self.check_lval(&id, LValContext::Declaration(kind))?;
        let init = if self.eat(TokenKind::Equal)? {
            Some(Box::new(self.parse_maybe_assign()?))
        } else {
            let for_head = is_for && matches!(self.kind(), TokenKind::In | TokenKind::Of);
            if kind == VarKind::Const && !for_head {
                return Err(self.error_here("Missing initializer in const declaration"));
            }
            if matches!(id, Pat::Array(_) | Pat::Object(_)) && !for_head {
                return Err(self.error_here("Missing initializer in destructuring declaration"));
            }
            None
        };
        Ok(VarDeclarator {
            loc: self.finish_node(start),
            id,
            init,
        })
    }

    // ── for ─────────────────────────────────────────────────────────────────

    fn parse_for(&mut self, start: Position) -> Result<Stmt> {
        self.next()?;
        let is_await = self.ctx.in_async && self.eat(TokenKind::Await)?;
        self.expect(TokenKind::LeftParen)?;

        if self.at(TokenKind::Semicolon) {
            return self.parse_for_rest(start, None);
        }

        let no_in = Context {
            no_in: true,
            ..self.ctx
        };
        let kind = match self.kind() {
            TokenKind::Let if self.lookahead()?.kind.starts_binding() => Some(VarKind::Let),
            other => VarKind::from_token(other).filter(|k| *k != VarKind::Let),
        };

        if let Some(kind) = kind {
            let decl_start = self.start_node();
            self.next()?;
            let declarators = self.with_context(no_in, |p| p.parse_var(kind, true))?;
            let decl = VarDecl {
                loc: self.finish_node(decl_start),
                kind,
                declarators,
            };
            if matches!(self.kind(), TokenKind::In | TokenKind::Of) {
                if decl.declarators.items().is_some_and(|d| d.len() != 1) {
                    return Err(self.error_here(
                        "Invalid left-hand side in for-in/of statement",
                    ));
                }
                return self.parse_for_in_of(start, is_await, ForInOfLeft::VarDecl(decl));
            }
            return self.parse_for_rest(start, Some(ForInit::VarDecl(decl)));
        }

        let init = self.with_context(no_in, |p| {
            p.cover_allowed = true;
            p.parse_expression()
        })?;
        let is_in_of = matches!(self.kind(), TokenKind::In | TokenKind::Of);
        self.take_shorthand_default(is_in_of.then_some(&init))?;
        if is_in_of {
            let target = self.to_assignable(init)?;
            self.check_lval(&target, LValContext::ForInOf)?;
            return self.parse_for_in_of(start, is_await, ForInOfLeft::Pat(target));
        }
        self.parse_for_rest(start, Some(ForInit::Expr(Box::new(init))))
    }

    fn parse_for_rest(&mut self, start: Position, init: Option<ForInit>) -> Result<Stmt> {
        self.expect(TokenKind::Semicolon)?;
        let test = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect(TokenKind::Semicolon)?;
        let update = if self.at(TokenKind::RightParen) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect(TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::For(ForStmt {
            loc: self.finish_node(start),
            init,
            test,
            update,
            body,
        }))
    }

    fn parse_for_in_of(
        &mut self,
        start: Position,
        is_await: bool,
        left: ForInOfLeft,
    ) -> Result<Stmt> {
        let is_in = self.at(TokenKind::In);
        if is_in && is_await {
            return self.unexpected();
        }
        self.next()?;
        let right = Box::new(if is_in {
            self.parse_expression()?
        } else {
            self.parse_maybe_assign()?
        });
        self.expect(TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement()?);
        let loc = self.finish_node(start);
        Ok(if is_in {
            Stmt::ForIn(ForInStmt {
                loc,
                left,
                right,
                body,
            })
        } else {
            Stmt::ForOf(ForOfStmt {
                loc,
                is_await,
                left,
                right,
                body,
            })
        })
    }

    // ── Modules ─────────────────────────────────────────────────────────────

    fn parse_import(&mut self) -> Result<ModuleDecl> {
        let start = self.start_node();
        self.expect(TokenKind::Import)?;
        let mut specifiers = Vec::new();
        if !self.at(TokenKind::StringLiteral) {
            if self.kind().is_name() {
                let local = self.parse_ident_plain(false)?;
                specifiers.push(ImportSpecifier::Default {
                    loc: local.loc,
                    local,
                });
                if !self.eat(TokenKind::Comma)? {
                    return self.finish_import(start, specifiers);
                }
            }
            if self.at(TokenKind::Star) {
                let spec_start = self.start_node();
                self.next()?;
                self.expect(TokenKind::As)?;
                let local = self.parse_ident_plain(false)?;
                specifiers.push(ImportSpecifier::Namespace {
                    loc: self.finish_node(spec_start),
                    local,
                });
            } else {
                self.expect(TokenKind::LeftBrace)?;
                while !self.eat(TokenKind::RightBrace)? {
                    let spec_start = self.start_node();
                    let imported = self.parse_module_export_name()?;
                    let local = if self.eat(TokenKind::As)? {
                        self.parse_ident_plain(false)?
                    } else {
                        match &imported {
                            ModuleExportName::Ident(id) => id.clone(),
                            ModuleExportName::Str(s) => {
                                return Err(Error::syntax(
                                    "A string literal cannot be used as an imported binding",
                                    s.loc.start,
                                ));
                            }
                        }
                    };
                    specifiers.push(ImportSpecifier::Named {
                        loc: self.finish_node(spec_start),
                        imported,
                        local,
                    });
                    if !self.at(TokenKind::RightBrace) {
                        self.expect(TokenKind::Comma)?;
                    }
                }
            }
            return self.finish_import(start, specifiers);
        }
        let source = self.parse_string_literal()?;
        let attributes = self.parse_import_attributes()?;
        self.semicolon()?;
        Ok(ModuleDecl::Import(ImportDecl {
            loc: self.finish_node(start),
            specifiers,
            source,
            attributes,
        }))
    }

    fn finish_import(
        &mut self,
        start: Position,
        specifiers: Vec<ImportSpecifier>,
    ) -> Result<ModuleDecl> {
        self.expect(TokenKind::From)?;
        let source = self.parse_string_literal()?;
        let attributes = self.parse_import_attributes()?;
        self.semicolon()?;
        Ok(ModuleDecl::Import(ImportDecl {
            loc: self.finish_node(start),
            specifiers,
            source,
            attributes,
        }))
    }

    /// `with { key: "value", … }`
    fn parse_import_attributes(&mut self) -> Result<Vec<ImportAttribute>> {
        let mut attributes = Vec::new();
        if !self.eat(TokenKind::With)? {
            return Ok(attributes);
        }
        self.expect(TokenKind::LeftBrace)?;
        while !self.eat(TokenKind::RightBrace)? {
            let start = self.start_node();
            let key = self.parse_module_export_name()?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_string_literal()?;
            attributes.push(ImportAttribute {
                loc: self.finish_node(start),
                key,
                value,
            });
            if !self.at(TokenKind::RightBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(attributes)
    }

    fn parse_module_export_name(&mut self) -> Result<ModuleExportName> {
        if self.at(TokenKind::StringLiteral) {
            return Ok(ModuleExportName::Str(self.parse_string_literal()?));
        }
        Ok(ModuleExportName::Ident(self.parse_ident_plain(true)?))
    }

    fn parse_export(&mut self) -> Result<ModuleDecl> {
        let start = self.start_node();
        self.expect(TokenKind::Export)?;
        match self.kind() {
            TokenKind::Star => {
                self.next()?;
                let exported = if self.eat(TokenKind::As)? {
                    Some(self.parse_module_export_name()?)
                } else {
                    None
                };
                self.expect(TokenKind::From)?;
                let source = self.parse_string_literal()?;
                let attributes = self.parse_import_attributes()?;
                self.semicolon()?;
                Ok(ModuleDecl::ExportAll(ExportAllDecl {
                    loc: self.finish_node(start),
                    exported,
                    source,
                    attributes,
                }))
            }
            TokenKind::Default => {
                self.next()?;
                let decl_start = self.start_node();
                let declaration = if self.at(TokenKind::Function) {
                    ExportDefaultExpr::Fn(Box::new(self.parse_function(decl_start, false, false)?))
                } else if self.at_async_function()? {
                    self.next()?;
                    ExportDefaultExpr::Fn(Box::new(self.parse_function(decl_start, true, false)?))
                } else if self.at(TokenKind::Class) {
                    ExportDefaultExpr::Class(Box::new(self.parse_class(decl_start, false)?))
                } else {
                    let expr = self.parse_maybe_assign()?;
                    self.semicolon()?;
                    ExportDefaultExpr::Expr(Box::new(expr))
                };
                Ok(ModuleDecl::ExportDefault(ExportDefaultDecl {
                    loc: self.finish_node(start),
                    declaration,
                }))
            }
            TokenKind::LeftBrace => {
                self.next()?;
                let mut specifiers = Vec::new();
                while !self.eat(TokenKind::RightBrace)? {
                    let spec_start = self.start_node();
                    let local = self.parse_module_export_name()?;
                    let exported = if self.eat(TokenKind::As)? {
                        self.parse_module_export_name()?
                    } else {
                        local.clone()
                    };
                    specifiers.push(ExportSpecifier {
                        loc: self.finish_node(spec_start),
                        local,
                        exported,
                    });
                    if !self.at(TokenKind::RightBrace) {
                        self.expect(TokenKind::Comma)?;
                    }
                }
                let (source, attributes) = if self.eat(TokenKind::From)? {
                    let source = self.parse_string_literal()?;
                    (Some(source), self.parse_import_attributes()?)
                } else {
                    (None, Vec::new())
                };
                self.semicolon()?;
                Ok(ModuleDecl::ExportNamed(ExportNamedDecl {
                    loc: self.finish_node(start),
                    specifiers,
                    source,
                    declaration: None,
                    attributes,
                }))
            }
            TokenKind::Var | TokenKind::Let | TokenKind::Const | TokenKind::Function
            | TokenKind::Class | TokenKind::Async => {
                let declaration = if self.at(TokenKind::Var) {
                    self.parse_statement()?
                } else if self.at(TokenKind::Let) {
                    self.parse_var_statement(VarKind::Let)?
                } else {
                    self.parse_statement_list_item()?
                };
                if !matches!(
                    declaration,
                    Stmt::VarDecl(_) | Stmt::FnDecl(_) | Stmt::ClassDecl(_)
                ) {
                    return Err(Error::syntax("Unexpected token", declaration.loc().start));
                }
                Ok(ModuleDecl::ExportNamed(ExportNamedDecl {
                    loc: self.finish_node(start),
                    specifiers: Vec::new(),
                    source: None,
                    declaration: Some(Box::new(declaration)),
                    attributes: Vec::new(),
                }))
            }
            _ => self.unexpected(),
        }
    }
}
