//! Navigation over the token stream.

use crate::error::{Error, Result};
use crate::parser::scanner::{Position, Scanner, Span, Token, TokenKind};
use crate::parser::{Context, Parser};

impl<'src> Parser<'src> {
    /// The current token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Kind of the current token.
    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    /// Checks if the current token has kind `kind`.
    #[inline]
    pub fn at(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    /// Source text of the current token.
    pub fn token_text(&self) -> &'src str {
        self.token.span.text(self.source)
    }

    /// Move to the next significant token.
    ///
    /// Comments are skipped; a line break before or inside a skipped comment
    /// is carried over to the token that follows it.
    pub fn next(&mut self) -> Result<()> {
        self.prev_token_end = self.token.span.end;
        self.token = read_significant(&mut self.scanner)?;
        Ok(())
    }

    /// Advance and return `true` if the current token is `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> Result<bool> {
        if self.at(kind) {
            self.next()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Consume a token of `kind`, or fail with
    /// `Unexpected token, expected "<label>"`.
    pub fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.eat(kind)? {
            return Ok(());
        }
        Err(self.error_here(format!("Unexpected token, expected \"{}\"", kind.label())))
    }

    /// Fail with `Unexpected token` at the current token.
    pub fn unexpected<T>(&self) -> Result<T> {
        Err(self.error_here("Unexpected token"))
    }

    /// A syntax error positioned at the start of the current token.
    pub fn error_here(&self, message: impl Into<String>) -> Error {
        Error::syntax(message, self.token.span.start)
    }

    /// Peek at the token after the current one without consuming anything.
    pub fn lookahead(&self) -> Result<Token> {
        let mut scanner = self.scanner.clone();
        read_significant(&mut scanner)
    }

    /// Record the start of a node at the current token.
    #[inline]
    pub fn start_node(&self) -> Position {
        self.token.span.start
    }

    /// Close a node started at `start` at the end of the last consumed token.
    #[inline]
    pub fn finish_node(&self, start: Position) -> Span {
        Span {
            start,
            end: self.prev_token_end,
        }
    }

    /// [Automatic Semicolon Insertion](https://tc39.es/ecma262/#sec-automatic-semicolon-insertion)
    pub(crate) fn semicolon(&mut self) -> Result<()> {
        if self.eat(TokenKind::Semicolon)? || self.can_insert_semicolon() {
            return Ok(());
        }
        Err(self.error_here("Unexpected token, expected \";\""))
    }

    pub(crate) fn can_insert_semicolon(&self) -> bool {
        matches!(self.kind(), TokenKind::RightBrace | TokenKind::Eof)
            || self.token.had_line_terminator_before
    }

    /// Run `f` with `ctx` in place of the current context, restoring the
    /// previous one afterwards (on success and on error).
    pub(crate) fn with_context<T>(
        &mut self,
        ctx: Context,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = self.ctx;
        self.ctx = ctx;
        let result = f(self);
        self.ctx = saved;
        result
    }

    /// Run `f` one nesting level deeper.  Input nested past
    /// [`ParserOptions::max_depth`](crate::options::ParserOptions::max_depth)
    /// fails instead of exhausting the stack.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_depth {
            return Err(self.error_here("Maximum nesting depth exceeded"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Run `f` with `in` re-enabled as an operator, as inside any bracket.
    pub(crate) fn allow_in<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let ctx = Context {
            no_in: false,
            ..self.ctx
        };
        self.with_context(ctx, f)
    }
}

fn read_significant(scanner: &mut Scanner<'_>) -> Result<Token> {
    let mut line_break = false;
    loop {
        let token = scanner.next_token()?;
        line_break |= token.had_line_terminator_before;
        if !token.kind.is_comment() {
            return Ok(Token {
                had_line_terminator_before: line_break,
                ..token
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParserOptions;
    use crate::parser::Parser;
    use crate::parser::scanner::TokenKind;

    #[test]
    fn test_next_skips_comments_and_keeps_line_breaks() {
        let mut p = Parser::new("a /* x\n */ b", &ParserOptions::default()).unwrap();
        assert!(p.at(TokenKind::Identifier));
        p.next().unwrap();
        assert_eq!(p.token_text(), "b");
        assert!(p.token().had_line_terminator_before);
    }

    #[test]
    fn test_lookahead_does_not_consume() {
        let p = Parser::new("a // c\n(", &ParserOptions::default()).unwrap();
        let ahead = p.lookahead().unwrap();
        assert_eq!(ahead.kind, TokenKind::LeftParen);
        assert!(ahead.had_line_terminator_before);
        assert_eq!(p.token_text(), "a");
    }

    #[test]
    fn test_expect_reports_label_and_position() {
        let mut p = Parser::new("\n  x", &ParserOptions::default()).unwrap();
        let err = p.expect(TokenKind::Semicolon).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected token, expected \";\" (2:3)");
    }

    #[test]
    fn test_node_span_ends_at_previous_token() {
        let mut p = Parser::new("foo  bar", &ParserOptions::default()).unwrap();
        let start = p.start_node();
        p.next().unwrap();
        assert_eq!(p.finish_node(start).text(p.source()), "foo");
    }
}
