//! ES2025 JavaScript lexer (scanner) with a context stack.
//!
//! See [`Scanner`] for the main entry point.  The scanner keeps a stack of
//! [`LexContext`] entries so that `}` can be classified (plain brace, end of
//! a template substitution, or part of a plugin delimiter) and tracks whether
//! an expression may start at the current position, which decides between
//! `/` as division and `/` as the start of a regular expression.

use serde::Serialize;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::parser::plugin::PluginSet;
use crate::plugins::capture;

// ─────────────────────────────────────────────────────────────────────────────
// Position / Span
// ─────────────────────────────────────────────────────────────────────────────

/// A byte offset + line/column location in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    /// Byte offset from the beginning of the source string.
    pub offset: usize,
    /// 1-based line number (incremented on every *LineTerminator*).
    pub line: u32,
    /// 1-based column number, measured in Unicode scalar values.
    pub column: u32,
}

impl Position {
    /// The position of the first character of any source text.
    pub const ORIGIN: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

/// A half-open `[start, end)` source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Inclusive start of the span.
    pub start: Position,
    /// Exclusive end of the span.
    pub end: Position,
}

impl Span {
    /// The source text covered by this span.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start.offset..self.end.offset]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────────────

/// The syntactic category of a JavaScript lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────────────────
    /// Decimal, hex, binary, octal, or BigInt (trailing `n`) numeric literal.
    NumericLiteral,
    /// String literal enclosed in `"` or `'`.
    StringLiteral,
    /// A complete template literal with no substitutions: `` `…` ``.
    NoSubstitutionTemplate,
    /// Opening span of a substituted template: `` `…${ ``.
    TemplateHead,
    /// Middle span between two substitutions: `}…${`.
    TemplateMiddle,
    /// Closing span of a substituted template: `}…`` ` ``.
    TemplateTail,
    /// Regular expression literal `/pattern/flags`.
    RegExpLiteral,

    // ── Identifiers ───────────────────────────────────────────────────────
    /// An identifier that is not a reserved word.
    Identifier,
    /// A private identifier beginning with `#`.
    PrivateIdentifier,

    // ── Reserved words ────────────────────────────────────────────────────
    Await,
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Enum,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    Let,
    New,
    Null,
    Of,
    Return,
    Static,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,
    Yield,

    // ── Contextual keywords ───────────────────────────────────────────────
    Async,
    From,
    As,
    Get,
    Set,
    Target,
    Meta,

    // ── Punctuators ───────────────────────────────────────────────────────
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,
    DotDotDot,
    Semicolon,
    Comma,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    BangEqual,
    EqualEqualEqual,
    BangEqualEqual,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    LessLess,
    GreaterGreater,
    GreaterGreaterGreater,
    Ampersand,
    Pipe,
    Caret,
    Bang,
    Tilde,
    AmpersandAmpersand,
    PipePipe,
    QuestionQuestion,
    Question,
    Colon,
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    StarStarEqual,
    SlashEqual,
    PercentEqual,
    LessLessEqual,
    GreaterGreaterEqual,
    GreaterGreaterGreaterEqual,
    AmpersandEqual,
    PipeEqual,
    CaretEqual,
    AmpersandAmpersandEqual,
    PipePipeEqual,
    QuestionQuestionEqual,
    Arrow,
    QuestionDot,

    // ── Capture delimiters ────────────────────────────────────────────────
    /// `{{`, only produced when the capture plugin is installed.
    CaptureOpen,
    /// `}}` closing a capture, only produced inside a capture context.
    CaptureClose,

    // ── Comments ──────────────────────────────────────────────────────────
    /// Single-line comment `// …` (also used for a leading `#!` line).
    SingleLineComment,
    /// Block comment `/* … */`.
    MultiLineComment,

    /// End of input.
    Eof,
}

/// Reserved and contextual words with their source text.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("await", TokenKind::Await),
    ("break", TokenKind::Break),
    ("case", TokenKind::Case),
    ("catch", TokenKind::Catch),
    ("class", TokenKind::Class),
    ("const", TokenKind::Const),
    ("continue", TokenKind::Continue),
    ("debugger", TokenKind::Debugger),
    ("default", TokenKind::Default),
    ("delete", TokenKind::Delete),
    ("do", TokenKind::Do),
    ("else", TokenKind::Else),
    ("enum", TokenKind::Enum),
    ("export", TokenKind::Export),
    ("extends", TokenKind::Extends),
    ("false", TokenKind::False),
    ("finally", TokenKind::Finally),
    ("for", TokenKind::For),
    ("function", TokenKind::Function),
    ("if", TokenKind::If),
    ("import", TokenKind::Import),
    ("in", TokenKind::In),
    ("instanceof", TokenKind::Instanceof),
    ("let", TokenKind::Let),
    ("new", TokenKind::New),
    ("null", TokenKind::Null),
    ("of", TokenKind::Of),
    ("return", TokenKind::Return),
    ("static", TokenKind::Static),
    ("super", TokenKind::Super),
    ("switch", TokenKind::Switch),
    ("this", TokenKind::This),
    ("throw", TokenKind::Throw),
    ("true", TokenKind::True),
    ("try", TokenKind::Try),
    ("typeof", TokenKind::Typeof),
    ("var", TokenKind::Var),
    ("void", TokenKind::Void),
    ("while", TokenKind::While),
    ("with", TokenKind::With),
    ("yield", TokenKind::Yield),
    ("async", TokenKind::Async),
    ("from", TokenKind::From),
    ("as", TokenKind::As),
    ("get", TokenKind::Get),
    ("set", TokenKind::Set),
    ("target", TokenKind::Target),
    ("meta", TokenKind::Meta),
];

impl TokenKind {
    /// Source text of a reserved or contextual word.
    pub fn keyword_text(self) -> Option<&'static str> {
        KEYWORDS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(text, _)| *text)
    }

    /// `true` for every reserved and contextual word.
    pub fn is_keyword(self) -> bool {
        self.keyword_text().is_some()
    }

    /// `true` for tokens the grammar accepts as a plain binding or reference
    /// name: identifiers and the words that are only contextually reserved.
    pub fn is_name(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Async
                | TokenKind::From
                | TokenKind::As
                | TokenKind::Get
                | TokenKind::Set
                | TokenKind::Target
                | TokenKind::Meta
                | TokenKind::Of
                | TokenKind::Let
                | TokenKind::Static
        )
    }

    /// `true` for tokens allowed as an *IdentifierName* (property keys,
    /// member names): any identifier or keyword.
    pub fn is_identifier_name(self) -> bool {
        self == TokenKind::Identifier || self.is_keyword()
    }

    /// `true` when a token of this kind can begin an expression.
    pub fn starts_expr(self) -> bool {
        use TokenKind::*;
        self.is_name()
            || matches!(
                self,
                NumericLiteral
                    | StringLiteral
                    | NoSubstitutionTemplate
                    | TemplateHead
                    | RegExpLiteral
                    | PrivateIdentifier
                    | Await
                    | Class
                    | Delete
                    | False
                    | Function
                    | Import
                    | New
                    | Null
                    | Super
                    | This
                    | True
                    | Typeof
                    | Void
                    | Yield
                    | LeftBrace
                    | LeftParen
                    | LeftBracket
                    | Plus
                    | Minus
                    | PlusPlus
                    | MinusMinus
                    | Bang
                    | Tilde
                    | Slash
                    | SlashEqual
                    | DotDotDot
                    | Less
                    | CaptureOpen
            )
    }

    /// `true` when an expression is expected after a token of this kind, so
    /// that a following `/` starts a regular expression.
    pub fn before_expr(self) -> bool {
        use TokenKind::*;
        !matches!(
            self,
            Identifier
                | PrivateIdentifier
                | NumericLiteral
                | StringLiteral
                | NoSubstitutionTemplate
                | TemplateTail
                | RegExpLiteral
                | RightParen
                | RightBracket
                | PlusPlus
                | MinusMinus
                | True
                | False
                | Null
                | This
                | Super
                | Async
                | From
                | As
                | Get
                | Set
                | Target
                | Meta
                | Of
                | Let
                | Static
                | CaptureClose
        )
    }

    /// `true` when a binding pattern may begin with a token of this kind.
    pub fn starts_binding(self) -> bool {
        self.is_name()
            || matches!(
                self,
                TokenKind::Yield
                    | TokenKind::Await
                    | TokenKind::LeftBracket
                    | TokenKind::LeftBrace
                    | TokenKind::CaptureOpen
            )
    }

    /// `true` for `=` and the compound assignment operators.
    pub fn is_assign(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Equal
                | PlusEqual
                | MinusEqual
                | StarEqual
                | StarStarEqual
                | SlashEqual
                | PercentEqual
                | LessLessEqual
                | GreaterGreaterEqual
                | GreaterGreaterGreaterEqual
                | AmpersandEqual
                | PipeEqual
                | CaretEqual
                | AmpersandAmpersandEqual
                | PipePipeEqual
                | QuestionQuestionEqual
        )
    }

    /// The label used for this kind in `expected …` error messages.
    pub fn label(self) -> &'static str {
        use TokenKind::*;
        if let Some(text) = self.keyword_text() {
            return text;
        }
        match self {
            NumericLiteral => "num",
            StringLiteral => "string",
            NoSubstitutionTemplate | TemplateHead | TemplateMiddle | TemplateTail => "template",
            RegExpLiteral => "regexp",
            Identifier => "name",
            PrivateIdentifier => "#name",
            LeftBrace => "{",
            RightBrace => "}",
            LeftParen => "(",
            RightParen => ")",
            LeftBracket => "[",
            RightBracket => "]",
            Dot => ".",
            DotDotDot => "...",
            Semicolon => ";",
            Comma => ",",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            EqualEqual => "==",
            BangEqual => "!=",
            EqualEqualEqual => "===",
            BangEqualEqual => "!==",
            Plus => "+",
            Minus => "-",
            Star => "*",
            StarStar => "**",
            Slash => "/",
            Percent => "%",
            PlusPlus => "++",
            MinusMinus => "--",
            LessLess => "<<",
            GreaterGreater => ">>",
            GreaterGreaterGreater => ">>>",
            Ampersand => "&",
            Pipe => "|",
            Caret => "^",
            Bang => "!",
            Tilde => "~",
            AmpersandAmpersand => "&&",
            PipePipe => "||",
            QuestionQuestion => "??",
            Question => "?",
            Colon => ":",
            Equal => "=",
            PlusEqual => "+=",
            MinusEqual => "-=",
            StarEqual => "*=",
            StarStarEqual => "**=",
            SlashEqual => "/=",
            PercentEqual => "%=",
            LessLessEqual => "<<=",
            GreaterGreaterEqual => ">>=",
            GreaterGreaterGreaterEqual => ">>>=",
            AmpersandEqual => "&=",
            PipeEqual => "|=",
            CaretEqual => "^=",
            AmpersandAmpersandEqual => "&&=",
            PipePipeEqual => "||=",
            QuestionQuestionEqual => "??=",
            Arrow => "=>",
            QuestionDot => "?.",
            CaptureOpen => "{{",
            CaptureClose => "}}",
            SingleLineComment | MultiLineComment => "comment",
            Eof => "eof",
            _ => "token",
        }
    }

    /// `true` for comment tokens, which the parser skips.
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            TokenKind::SingleLineComment | TokenKind::MultiLineComment
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TokenValue / Token
// ─────────────────────────────────────────────────────────────────────────────

/// The payload value associated with a [`Token`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// No semantic value (punctuators, reserved words, EOF, …).
    None,
    /// Identifier names (escapes decoded), or the raw source text of strings,
    /// templates, comments, and regular-expression literals.
    Str(String),
    /// Parsed numeric value for [`TokenKind::NumericLiteral`].
    Number(f64),
}

/// A single lexical token produced by the [`Scanner`].
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The syntactic category.
    pub kind: TokenKind,
    /// The associated value, if any.
    pub value: TokenValue,
    /// Source location of this token.
    pub span: Span,
    /// `true` when at least one *LineTerminator* appeared between the previous
    /// token and this one.  Drives automatic semicolon insertion.
    pub had_line_terminator_before: bool,
}

impl Token {
    /// The string payload, if the token carries one.
    pub fn str_value(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lexer context
// ─────────────────────────────────────────────────────────────────────────────

/// One entry of the scanner's context stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexContext {
    /// A plain `{ … }` block, object literal or class body.
    Brace,
    /// Inside a template substitution `${ … }`.
    Template,
    /// Between `{{` and `}}`.
    Capture,
}

// ─────────────────────────────────────────────────────────────────────────────
// Character-classification helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Returns `true` for ES2025 *LineTerminator* code points.
fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Returns `true` for ES2025 *WhiteSpace* **or** *LineTerminator* characters.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\x0B'
            | '\x0C'
            | ' '
            | '\u{00A0}'
            | '\u{FEFF}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    ) || is_line_terminator(c)
}

fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

fn is_id_continue(c: char) -> bool {
    c == '$' || c == '_' || c == '\u{200C}' || c == '\u{200D}' || c.is_alphanumeric()
}

fn keyword_kind(s: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(text, _)| *text == s)
        .map(|(_, kind)| *kind)
}

// ─────────────────────────────────────────────────────────────────────────────
// Scanner
// ─────────────────────────────────────────────────────────────────────────────

/// ES2025 JavaScript lexer.
///
/// Produces a stream of [`Token`]s from a UTF-8 source string.  Call
/// [`Scanner::next_token`] repeatedly until a token with
/// [`TokenKind::Eof`] is returned.  Installed plugins get the first look at
/// every token through [`crate::parser::plugin::Plugin::read_token`].
///
/// # Example
///
/// ```
/// use jspat_core::parser::scanner::{Scanner, TokenKind};
///
/// let mut sc = Scanner::new("let x = 42;");
/// loop {
///     let tok = sc.next_token().unwrap();
///     if tok.kind == TokenKind::Eof { break; }
///     println!("{:?}", tok.kind);
/// }
/// ```
#[derive(Clone)]
pub struct Scanner<'src> {
    source: &'src str,
    pos: usize,
    line: u32,
    column: u32,
    /// Open braces, template substitutions and captures, innermost last.
    context: SmallVec<[LexContext; 16]>,
    /// Whether an expression may begin at the current position.
    expr_allowed: bool,
    /// Start of the token currently being read.
    token_start: Position,
    /// Whether a line terminator preceded the token currently being read.
    line_break_before: bool,
    plugins: PluginSet,
}

impl<'src> Scanner<'src> {
    /// Create a scanner for `source` with no plugins installed.
    pub fn new(source: &'src str) -> Self {
        Self::with_plugins(source, PluginSet::default())
    }

    /// Create a scanner whose token reading is extended by `plugins`.
    pub fn with_plugins(source: &'src str, plugins: PluginSet) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            context: SmallVec::new(),
            expr_allowed: true,
            token_start: Position::ORIGIN,
            line_break_before: false,
            plugins,
        }
    }

    /// The complete source string.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Returns `true` when all input has been consumed.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// The innermost open context, if any.
    pub fn current_context(&self) -> Option<LexContext> {
        self.context.last().copied()
    }

    /// Number of open contexts.
    pub fn context_depth(&self) -> usize {
        self.context.len()
    }

    /// Whether a `/` at the current position would start a regular expression.
    pub fn expr_allowed(&self) -> bool {
        self.expr_allowed
    }

    pub(crate) fn push_context(&mut self, ctx: LexContext) {
        self.context.push(ctx);
    }

    pub(crate) fn pop_context(&mut self) -> Option<LexContext> {
        self.context.pop()
    }

    pub(crate) fn set_expr_allowed(&mut self, allowed: bool) {
        self.expr_allowed = allowed;
    }

    // ── Low-level character helpers ─────────────────────────────────────────

    pub(crate) fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    pub(crate) fn peek2(&self) -> Option<char> {
        self.source[self.pos..].chars().nth(1)
    }

    /// Advance past the current character and update line/column tracking.
    ///
    /// `\r\n` is treated as a single line terminator.  Callers check
    /// [`Scanner::peek`] first; at end of input this is a no-op returning
    /// `'\0'`.
    pub(crate) fn advance(&mut self) -> char {
        let Some(ch) = self.peek() else {
            return '\0';
        };
        self.pos += ch.len_utf8();
        match ch {
            '\r' => {
                if self.source[self.pos..].starts_with('\n') {
                    self.pos += 1;
                }
                self.line += 1;
                self.column = 1;
            }
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }
        ch
    }

    /// Consume `c` if it is the next character.
    fn eat_char(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current_pos(&self) -> Position {
        Position {
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T> {
        Err(Error::syntax(message, self.token_start))
    }

    /// Consume all leading whitespace and return `true` if any line
    /// terminators were encountered.
    fn skip_whitespace(&mut self) -> bool {
        let mut had_lt = false;
        while let Some(c) = self.peek() {
            if !is_js_whitespace(c) {
                break;
            }
            had_lt |= is_line_terminator(c);
            self.advance();
        }
        had_lt
    }

    // ── Token completion ────────────────────────────────────────────────────

    /// Build the token that started at the current token start and ends at
    /// the current position, then apply its context effect.
    pub(crate) fn finish_token(&mut self, kind: TokenKind, value: TokenValue) -> Token {
        let token = Token {
            kind,
            value,
            span: Span {
                start: self.token_start,
                end: self.current_pos(),
            },
            had_line_terminator_before: self.line_break_before,
        };
        self.update_context(kind);
        token
    }

    /// Apply the context-stack effect of a token of `kind` that was just read.
    fn update_context(&mut self, kind: TokenKind) {
        match kind {
            TokenKind::SingleLineComment | TokenKind::MultiLineComment | TokenKind::Eof => return,
            TokenKind::CaptureOpen => return capture::token::enter_capture(self),
            TokenKind::CaptureClose => return capture::token::exit_capture(self),
            TokenKind::LeftBrace => self.context.push(LexContext::Brace),
            TokenKind::TemplateHead => self.context.push(LexContext::Template),
            TokenKind::RightBrace | TokenKind::TemplateTail => {
                self.context.pop();
            }
            _ => {}
        }
        self.expr_allowed = kind.before_expr();
    }

    // ── Digit-run helpers ───────────────────────────────────────────────────

    fn scan_digits(&mut self, is_digit: fn(char) -> bool) {
        while matches!(self.peek(), Some(c) if is_digit(c) || c == '_') {
            self.advance();
        }
    }

    fn scan_exponent(&mut self) {
        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.scan_digits(|c| c.is_ascii_digit());
        }
    }

    // ── Escapes ─────────────────────────────────────────────────────────────

    /// Consume one escape sequence starting *after* the leading `\`.
    fn scan_escape_sequence(&mut self) -> Result<()> {
        let Some(c) = self.peek() else {
            return self.error("unterminated escape sequence");
        };
        self.advance();
        match c {
            'u' if self.eat_char('{') => {
                let mut count = 0usize;
                while matches!(self.peek(), Some(d) if d.is_ascii_hexdigit()) {
                    self.advance();
                    count += 1;
                }
                if count == 0 || !self.eat_char('}') {
                    return self.error("invalid Unicode escape sequence");
                }
            }
            'u' => self.scan_hex_run(4, "invalid Unicode escape sequence")?,
            'x' => self.scan_hex_run(2, "invalid hex escape sequence")?,
            _ => {}
        }
        Ok(())
    }

    fn scan_hex_run(&mut self, count: usize, message: &str) -> Result<()> {
        for _ in 0..count {
            if !matches!(self.peek(), Some(d) if d.is_ascii_hexdigit()) {
                return self.error(message);
            }
            self.advance();
        }
        Ok(())
    }

    // ── Literals ────────────────────────────────────────────────────────────

    /// Scan a string literal; the opening quote is already consumed.
    fn scan_string(&mut self, quote: char) -> Result<Token> {
        loop {
            match self.peek() {
                None | Some('\n' | '\r') => return self.error("unterminated string literal"),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.scan_escape_sequence()?;
                }
                _ => {
                    self.advance();
                }
            }
        }
        let raw = self.source[self.token_start.offset..self.pos].to_string();
        Ok(self.finish_token(TokenKind::StringLiteral, TokenValue::Str(raw)))
    }

    /// Scan template characters after the opening `` ` `` or after a `}` that
    /// closes a substitution.  Returns the raw text between the delimiters
    /// and whether the body was terminated by `${`.
    fn scan_template_body(&mut self) -> Result<(String, bool)> {
        let body_start = self.pos;
        loop {
            match self.peek() {
                None => return self.error("unterminated template literal"),
                Some('`') => {
                    let raw = self.source[body_start..self.pos].to_string();
                    self.advance();
                    return Ok((raw, false));
                }
                Some('$') if self.peek2() == Some('{') => {
                    let raw = self.source[body_start..self.pos].to_string();
                    self.advance();
                    self.advance();
                    return Ok((raw, true));
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Scan a regular-expression literal; the opening `/` is already consumed.
    fn scan_regexp(&mut self) -> Result<Token> {
        let mut in_class = false;
        loop {
            match self.peek() {
                None => return self.error("unterminated regular expression literal"),
                Some(c) if is_line_terminator(c) => {
                    return self.error("unterminated regular expression literal");
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if matches!(self.peek(), None | Some('\n' | '\r')) {
                        return self.error("unterminated regular expression literal");
                    }
                }
                _ => {}
            }
            self.advance();
        }
        while matches!(self.peek(), Some(c) if is_id_continue(c)) {
            self.advance();
        }
        let raw = self.source[self.token_start.offset..self.pos].to_string();
        Ok(self.finish_token(TokenKind::RegExpLiteral, TokenValue::Str(raw)))
    }

    /// Scan a numeric literal given that `first` has already been consumed.
    fn scan_numeric(&mut self, first: char) -> Result<Token> {
        let radix_digits: Option<fn(char) -> bool> = if first == '0' {
            match self.peek() {
                Some('x' | 'X') => Some(|c: char| c.is_ascii_hexdigit()),
                Some('o' | 'O') => Some(|c: char| matches!(c, '0'..='7')),
                Some('b' | 'B') => Some(|c: char| matches!(c, '0' | '1')),
                _ => None,
            }
        } else {
            None
        };

        if let Some(is_digit) = radix_digits {
            self.advance();
            self.scan_digits(is_digit);
            self.eat_char('n');
        } else {
            if first != '.' {
                self.scan_digits(|c| c.is_ascii_digit());
                if self.eat_char('n') {
                    return Ok(self.finish_numeric());
                }
                if self.eat_char('.') {
                    self.scan_digits(|c| c.is_ascii_digit());
                }
            } else {
                self.scan_digits(|c| c.is_ascii_digit());
            }
            self.scan_exponent();
        }

        if matches!(self.peek(), Some(c) if is_id_start(c) || c.is_ascii_digit()) {
            return self.error("identifier starts immediately after numeric literal");
        }
        Ok(self.finish_numeric())
    }

    fn finish_numeric(&mut self) -> Token {
        let raw = &self.source[self.token_start.offset..self.pos];
        let value = parse_numeric_raw(raw);
        self.finish_token(TokenKind::NumericLiteral, TokenValue::Number(value))
    }

    // ── Identifier / keyword ────────────────────────────────────────────────

    /// Consume the rest of an identifier name.  Returns `true` when it
    /// contained a Unicode escape.
    fn scan_identifier_rest(&mut self) -> Result<bool> {
        let mut escaped = false;
        loop {
            match self.peek() {
                Some(c) if is_id_continue(c) => {
                    self.advance();
                }
                Some('\\') => {
                    self.advance();
                    if self.peek() != Some('u') {
                        return self.error("invalid escape in identifier");
                    }
                    self.scan_escape_sequence()?;
                    escaped = true;
                }
                _ => return Ok(escaped),
            }
        }
    }

    /// Scan an identifier or keyword; the first character is already consumed.
    fn scan_identifier(&mut self, first: char) -> Result<Token> {
        let mut escaped = false;
        if first == '\\' {
            if self.peek() != Some('u') {
                return self.error("invalid escape in identifier");
            }
            self.scan_escape_sequence()?;
            escaped = true;
        }
        escaped |= self.scan_identifier_rest()?;
        let raw = &self.source[self.token_start.offset..self.pos];
        if escaped {
            // Escaped words are never keywords.
            let Some(name) = cook(raw, false) else {
                return self.error("invalid escape in identifier");
            };
            return Ok(self.finish_token(TokenKind::Identifier, TokenValue::Str(name)));
        }
        Ok(match keyword_kind(raw) {
            Some(kind) => self.finish_token(kind, TokenValue::None),
            None => {
                let name = raw.to_string();
                self.finish_token(TokenKind::Identifier, TokenValue::Str(name))
            }
        })
    }

    // ── Comments ────────────────────────────────────────────────────────────

    fn scan_line_comment(&mut self) -> Token {
        let text_start = self.pos;
        while matches!(self.peek(), Some(c) if !is_line_terminator(c)) {
            self.advance();
        }
        let text = self.source[text_start..self.pos].to_string();
        self.finish_token(TokenKind::SingleLineComment, TokenValue::Str(text))
    }

    fn scan_block_comment(&mut self) -> Result<Token> {
        let text_start = self.pos;
        loop {
            match self.peek() {
                None => return self.error("unterminated block comment"),
                Some('*') if self.peek2() == Some('/') => {
                    let text = self.source[text_start..self.pos].to_string();
                    self.advance();
                    self.advance();
                    return Ok(self.finish_token(TokenKind::MultiLineComment, TokenValue::Str(text)));
                }
                Some(c) => {
                    self.line_break_before |= is_line_terminator(c);
                    self.advance();
                }
            }
        }
    }

    // ── Main public API ─────────────────────────────────────────────────────

    /// Scan and return the next [`Token`].
    ///
    /// Returns a token with [`TokenKind::Eof`] when the input is exhausted.
    /// Comment tokens are returned too; the parser skips them.
    pub fn next_token(&mut self) -> Result<Token> {
        self.line_break_before = self.skip_whitespace();
        self.token_start = self.current_pos();
        if self.is_eof() {
            return Ok(self.finish_token(TokenKind::Eof, TokenValue::None));
        }
        let plugins = self.plugins.clone();
        plugins.read_token(self)
    }

    /// The built-in token rule, run after every plugin declined the input.
    pub(crate) fn read_token_base(&mut self) -> Result<Token> {
        if self.pos == 0 && self.peek() == Some('#') && self.peek2() == Some('!') {
            self.advance();
            self.advance();
            return Ok(self.scan_line_comment());
        }

        let c = self.advance();
        let kind = match c {
            '/' if self.eat_char('/') => return Ok(self.scan_line_comment()),
            '/' if self.eat_char('*') => return self.scan_block_comment(),
            '/' if self.expr_allowed => return self.scan_regexp(),
            '/' if self.eat_char('=') => TokenKind::SlashEqual,
            '/' => TokenKind::Slash,

            '"' | '\'' => return self.scan_string(c),

            '`' => {
                let (raw, has_sub) = self.scan_template_body()?;
                let kind = if has_sub {
                    TokenKind::TemplateHead
                } else {
                    TokenKind::NoSubstitutionTemplate
                };
                return Ok(self.finish_token(kind, TokenValue::Str(raw)));
            }

            '}' if self.current_context() == Some(LexContext::Template) => {
                let (raw, has_sub) = self.scan_template_body()?;
                let kind = if has_sub {
                    TokenKind::TemplateMiddle
                } else {
                    TokenKind::TemplateTail
                };
                return Ok(self.finish_token(kind, TokenValue::Str(raw)));
            }

            c if c.is_ascii_digit() => return self.scan_numeric(c),
            '.' if matches!(self.peek(), Some(d) if d.is_ascii_digit()) => {
                return self.scan_numeric('.');
            }
            '.' if self.peek() == Some('.') && self.peek2() == Some('.') => {
                self.advance();
                self.advance();
                TokenKind::DotDotDot
            }
            '.' => TokenKind::Dot,

            '#' => {
                if !matches!(self.peek(), Some(n) if is_id_start(n) || n == '\\') {
                    return self.error("invalid or unexpected token '#'");
                }
                let name_start = self.pos;
                self.scan_identifier_rest()?;
                let name = self.source[name_start..self.pos].to_string();
                return Ok(self.finish_token(TokenKind::PrivateIdentifier, TokenValue::Str(name)));
            }

            c if is_id_start(c) || c == '\\' => return self.scan_identifier(c),

            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '~' => TokenKind::Tilde,
            ':' => TokenKind::Colon,

            c => match self.scan_operator(c) {
                Some(kind) => kind,
                None => return self.error(format!("unexpected character {c:?}")),
            },
        };
        Ok(self.finish_token(kind, TokenValue::None))
    }

    /// Longest-match scan of an operator whose first character is `c`.
    fn scan_operator(&mut self, c: char) -> Option<TokenKind> {
        use TokenKind::*;
        let kind = match c {
            '<' if self.eat_char('<') => {
                if self.eat_char('=') { LessLessEqual } else { LessLess }
            }
            '<' if self.eat_char('=') => LessEqual,
            '<' => Less,
            '>' if self.eat_char('>') => {
                if self.eat_char('>') {
                    if self.eat_char('=') { GreaterGreaterGreaterEqual } else { GreaterGreaterGreater }
                } else if self.eat_char('=') {
                    GreaterGreaterEqual
                } else {
                    GreaterGreater
                }
            }
            '>' if self.eat_char('=') => GreaterEqual,
            '>' => Greater,
            '=' if self.eat_char('=') => {
                if self.eat_char('=') { EqualEqualEqual } else { EqualEqual }
            }
            '=' if self.eat_char('>') => Arrow,
            '=' => Equal,
            '!' if self.eat_char('=') => {
                if self.eat_char('=') { BangEqualEqual } else { BangEqual }
            }
            '!' => Bang,
            '+' if self.eat_char('+') => PlusPlus,
            '+' if self.eat_char('=') => PlusEqual,
            '+' => Plus,
            '-' if self.eat_char('-') => MinusMinus,
            '-' if self.eat_char('=') => MinusEqual,
            '-' => Minus,
            '*' if self.eat_char('*') => {
                if self.eat_char('=') { StarStarEqual } else { StarStar }
            }
            '*' if self.eat_char('=') => StarEqual,
            '*' => Star,
            '%' if self.eat_char('=') => PercentEqual,
            '%' => Percent,
            '&' if self.eat_char('&') => {
                if self.eat_char('=') { AmpersandAmpersandEqual } else { AmpersandAmpersand }
            }
            '&' if self.eat_char('=') => AmpersandEqual,
            '&' => Ampersand,
            '|' if self.eat_char('|') => {
                if self.eat_char('=') { PipePipeEqual } else { PipePipe }
            }
            '|' if self.eat_char('=') => PipeEqual,
            '|' => Pipe,
            '^' if self.eat_char('=') => CaretEqual,
            '^' => Caret,
            '?' if self.eat_char('?') => {
                if self.eat_char('=') { QuestionQuestionEqual } else { QuestionQuestion }
            }
            // `?.` but not `?.0`, which is `?` followed by `.0`.
            '?' if self.peek() == Some('.') && !matches!(self.peek2(), Some(d) if d.is_ascii_digit()) => {
                self.advance();
                QuestionDot
            }
            '?' => Question,
            _ => return None,
        };
        Some(kind)
    }

    /// Tokenize the entire `source` string and return all tokens, comments
    /// included (the [`TokenKind::Eof`] sentinel is **not** included).
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::Syntax`] encountered.
    pub fn tokenize_all(source: &'src str) -> Result<Vec<Token>> {
        Scanner::new(source).collect_tokens()
    }

    /// Drain this scanner into a token vector, stopping before `Eof`.
    pub fn collect_tokens(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            if tok.kind == TokenKind::Eof {
                return Ok(tokens);
            }
            tokens.push(tok);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Literal decoding helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Parse the raw text of a numeric literal to an `f64`.
///
/// Numeric separators (`_`) and the BigInt suffix (`n`) are stripped before
/// parsing.  Returns [`f64::NAN`] if the text cannot be parsed.
fn parse_numeric_raw(raw: &str) -> f64 {
    let clean: String = raw.chars().filter(|&c| c != '_' && c != 'n').collect();
    let radix = |digits: &str, radix: u32| {
        u128::from_str_radix(digits, radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN)
    };
    match clean.get(..2) {
        Some("0x" | "0X") => radix(&clean[2..], 16),
        Some("0o" | "0O") => radix(&clean[2..], 8),
        Some("0b" | "0B") => radix(&clean[2..], 2),
        _ if clean.len() > 1 && clean.starts_with('0') && clean.bytes().all(|b| matches!(b, b'0'..=b'7')) => {
            radix(&clean[1..], 8)
        }
        _ => clean.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// Decode the escape sequences in the body of a string or template literal,
/// or in an escaped identifier.
///
/// Returns `None` for escapes that are malformed, and for legacy octal
/// escapes inside templates (`template == true`), whose cooked value is
/// undefined.
pub fn cook(raw: &str, template: bool) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            // Template literals normalise CRLF and CR to LF.
            if template && c == '\r' {
                chars.next_if_eq(&'\n');
                out.push('\n');
            } else {
                out.push(c);
            }
            continue;
        }
        let esc = chars.next()?;
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(|d| d.is_ascii_digit()) => out.push('\0'),
            '0'..='7' => {
                if template {
                    return None;
                }
                let mut value = esc.to_digit(8)?;
                let max_len = if esc <= '3' { 3 } else { 2 };
                for _ in 1..max_len {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value)?);
            }
            '8' | '9' if template => return None,
            'x' => {
                let hex: String = (0..2).filter_map(|_| chars.next()).collect();
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            'u' => {
                let code = if chars.next_if_eq(&'{').is_some() {
                    let hex: String = chars.by_ref().take_while(|&d| d != '}').collect();
                    u32::from_str_radix(&hex, 16).ok()?
                } else {
                    let hex: String = (0..4).filter_map(|_| chars.next()).collect();
                    u32::from_str_radix(&hex, 16).ok()?
                };
                // Lone surrogates have no `char`; substitute U+FFFD.
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }
    Some(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::capture::CapturePlugin;

    /// Tokenise `src`, ignoring comments, and return a list of token kinds.
    fn kinds(src: &str) -> Vec<TokenKind> {
        Scanner::tokenize_all(src)
            .unwrap()
            .into_iter()
            .filter(|t| !t.kind.is_comment())
            .map(|t| t.kind)
            .collect()
    }

    fn capture_kinds(src: &str) -> Vec<TokenKind> {
        let plugins = PluginSet::default().with(CapturePlugin);
        Scanner::with_plugins(src, plugins)
            .collect_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn tokens(src: &str) -> Vec<Token> {
        Scanner::tokenize_all(src).unwrap()
    }

    // ── Keywords and identifiers ─────────────────────────────────────────────

    #[test]
    fn test_keywords_round_trip_through_table() {
        for (text, kind) in KEYWORDS {
            assert_eq!(kinds(text), vec![*kind], "keyword {text}");
            assert_eq!(kind.keyword_text(), Some(*text));
        }
    }

    #[test]
    fn test_identifier_value() {
        let toks = tokens("foo $bar _baz");
        assert_eq!(toks[0].value, TokenValue::Str("foo".into()));
        assert_eq!(toks[1].value, TokenValue::Str("$bar".into()));
        assert_eq!(toks[2].value, TokenValue::Str("_baz".into()));
    }

    #[test]
    fn test_escaped_identifier_is_decoded_and_never_a_keyword() {
        let toks = tokens(r"\u006Cet");
        assert_eq!(toks[0].kind, TokenKind::Identifier);
        assert_eq!(toks[0].value, TokenValue::Str("let".into()));
    }

    #[test]
    fn test_private_identifier() {
        let toks = tokens("#secret");
        assert_eq!(toks[0].kind, TokenKind::PrivateIdentifier);
        assert_eq!(toks[0].value, TokenValue::Str("secret".into()));
    }

    // ── Numbers and strings ──────────────────────────────────────────────────

    #[test]
    fn test_numeric_forms() {
        let values: Vec<f64> = tokens("42 3.5 .5 1e3 0xff 0o17 0b101 1_000 017")
            .into_iter()
            .map(|t| match t.value {
                TokenValue::Number(n) => n,
                other => panic!("expected number, got {other:?}"),
            })
            .collect();
        assert_eq!(values, vec![42.0, 3.5, 0.5, 1000.0, 255.0, 15.0, 5.0, 1000.0, 15.0]);
    }

    #[test]
    fn test_bigint_keeps_suffix_in_source() {
        let src = "10n";
        let toks = tokens(src);
        assert_eq!(toks[0].kind, TokenKind::NumericLiteral);
        assert_eq!(toks[0].span.text(src), "10n");
    }

    #[test]
    fn test_identifier_directly_after_number_is_an_error() {
        assert!(Scanner::tokenize_all("3in x").is_err());
    }

    #[test]
    fn test_string_raw_value_and_cooking() {
        let toks = tokens(r#""a\n\x41\u{1F600}""#);
        assert_eq!(toks[0].kind, TokenKind::StringLiteral);
        let raw = toks[0].str_value().unwrap();
        assert_eq!(cook(&raw[1..raw.len() - 1], false).unwrap(), "a\nA\u{1F600}");
    }

    #[test]
    fn test_string_unterminated_error() {
        let err = Scanner::tokenize_all("x = \"open").unwrap_err();
        assert_eq!(err.position().unwrap().column, 5);
    }

    #[test]
    fn test_cook_template_rejects_octal() {
        assert_eq!(cook(r"\1", true), None);
        assert_eq!(cook(r"\1", false).as_deref(), Some("\u{1}"));
        assert_eq!(cook("a\r\nb", true).as_deref(), Some("a\nb"));
    }

    // ── Templates and the context stack ──────────────────────────────────────

    #[test]
    fn test_template_with_substitutions() {
        let toks = tokens("`${a} and ${b}`");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::TemplateHead,
                TokenKind::Identifier,
                TokenKind::TemplateMiddle,
                TokenKind::Identifier,
                TokenKind::TemplateTail,
            ]
        );
        assert_eq!(toks[2].value, TokenValue::Str(" and ".into()));
    }

    #[test]
    fn test_template_substitution_containing_object() {
        assert_eq!(
            kinds("`a ${{k:1}} b`"),
            vec![
                TokenKind::TemplateHead,
                TokenKind::LeftBrace,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::NumericLiteral,
                TokenKind::RightBrace,
                TokenKind::TemplateTail,
            ]
        );
    }

    #[test]
    fn test_nested_template_in_block() {
        assert_eq!(
            kinds("{ `x${ `y${z}` }` }"),
            vec![
                TokenKind::LeftBrace,
                TokenKind::TemplateHead,
                TokenKind::TemplateHead,
                TokenKind::Identifier,
                TokenKind::TemplateTail,
                TokenKind::TemplateTail,
                TokenKind::RightBrace,
            ]
        );
    }

    // ── Regexp vs division ───────────────────────────────────────────────────

    #[test]
    fn test_regexp_and_division() {
        assert_eq!(kinds("/ab+c/gi")[0], TokenKind::RegExpLiteral);
        assert_eq!(kinds("/[/]/")[0], TokenKind::RegExpLiteral);
        assert_eq!(kinds("a / b")[1], TokenKind::Slash);
        assert_eq!(kinds("(a) / 2")[3], TokenKind::Slash);
        assert_eq!(kinds("x = /re/")[2], TokenKind::RegExpLiteral);
        assert_eq!(kinds("return /re/")[1], TokenKind::RegExpLiteral);
        assert_eq!(kinds("a /= 2")[1], TokenKind::SlashEqual);
        assert_eq!(kinds("x.get / 2")[3], TokenKind::Slash);
    }

    // ── Comments, lines and ASI flags ────────────────────────────────────────

    #[test]
    fn test_comments_do_not_change_regexp_state() {
        let toks = tokens("a /* c */ / b // tail");
        assert_eq!(toks[1].kind, TokenKind::MultiLineComment);
        assert_eq!(toks[2].kind, TokenKind::Slash);
        assert_eq!(toks[4].kind, TokenKind::SingleLineComment);
    }

    #[test]
    fn test_shebang_is_a_comment() {
        assert_eq!(kinds("#!/usr/bin/env node\nx"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn test_line_tracking_and_line_break_flag() {
        let toks = tokens("x\r\n  y /*\n*/ z");
        assert_eq!(toks[1].span.start.line, 2);
        assert_eq!(toks[1].span.start.column, 3);
        assert!(toks[1].had_line_terminator_before);
        // A block comment spanning lines reports the break itself.
        assert_eq!(toks[2].kind, TokenKind::MultiLineComment);
        assert!(toks[2].had_line_terminator_before);
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(
            kinds(">>>= ?. ?.5 ??= => ** ..."),
            vec![
                TokenKind::GreaterGreaterGreaterEqual,
                TokenKind::QuestionDot,
                TokenKind::Question,
                TokenKind::NumericLiteral,
                TokenKind::QuestionQuestionEqual,
                TokenKind::Arrow,
                TokenKind::StarStar,
                TokenKind::DotDotDot,
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = Scanner::tokenize_all("a @ b").unwrap_err();
        assert_eq!(err.position().unwrap().column, 3);
    }

    // ── Capture delimiters ───────────────────────────────────────────────────

    #[test]
    fn test_double_braces_without_plugin_are_plain_braces() {
        assert_eq!(
            kinds("{{x}}"),
            vec![
                TokenKind::LeftBrace,
                TokenKind::LeftBrace,
                TokenKind::Identifier,
                TokenKind::RightBrace,
                TokenKind::RightBrace,
            ]
        );
    }

    #[test]
    fn test_capture_delimiters_with_plugin() {
        assert_eq!(
            capture_kinds("{{x}}"),
            vec![
                TokenKind::CaptureOpen,
                TokenKind::Identifier,
                TokenKind::CaptureClose,
            ]
        );
        assert_eq!(
            capture_kinds("{{...xs}}"),
            vec![
                TokenKind::CaptureOpen,
                TokenKind::DotDotDot,
                TokenKind::Identifier,
                TokenKind::CaptureClose,
            ]
        );
    }

    #[test]
    fn test_closing_braces_outside_capture_stay_plain() {
        assert_eq!(
            capture_kinds("{ a: { b } }}"),
            vec![
                TokenKind::LeftBrace,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::LeftBrace,
                TokenKind::Identifier,
                TokenKind::RightBrace,
                TokenKind::RightBrace,
                TokenKind::RightBrace,
            ]
        );
    }

    #[test]
    fn test_slash_after_capture_is_division() {
        assert_eq!(capture_kinds("{{a}} / 2")[3], TokenKind::Slash);
        assert_eq!(capture_kinds("x = {{a}}")[2], TokenKind::CaptureOpen);
    }

    #[test]
    fn test_capture_inside_template_substitution() {
        assert_eq!(
            capture_kinds("`a${ {{x}} }b`"),
            vec![
                TokenKind::TemplateHead,
                TokenKind::CaptureOpen,
                TokenKind::Identifier,
                TokenKind::CaptureClose,
                TokenKind::TemplateTail,
            ]
        );
    }
}
