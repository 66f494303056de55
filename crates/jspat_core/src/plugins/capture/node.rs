//! Parsing of capture nodes.

use crate::error::Result;
use crate::parser::Parser;
use crate::parser::ast::Capture;
use crate::parser::scanner::{Position, TokenKind};

/// Finish a capture whose `{{` (and `...`) started at `start`: the name and
/// the closing `}}`.
pub fn parse_capture_at(p: &mut Parser<'_>, start: Position, is_list_capture: bool) -> Result<Capture> {
    if !p.kind().is_name() {
        return Err(p.error_here("Unexpected token, expected Capture name"));
    }
    let name = match p.token().str_value() {
        Some(name) => name.to_string(),
        None => p.token_text().to_string(),
    };
    p.next()?;
    p.expect(TokenKind::CaptureClose)?;
    Ok(Capture {
        loc: p.finish_node(start),
        name,
        is_list_capture,
    })
}

/// `{{name}}` in a position that holds exactly one node.
pub fn parse_single_capture(p: &mut Parser<'_>) -> Result<Capture> {
    let start = p.start_node();
    p.expect(TokenKind::CaptureOpen)?;
    if p.at(TokenKind::DotDotDot) {
        return Err(p.error_here("Cannot use list Capture here"));
    }
    parse_capture_at(p, start, false)
}

/// `{{...name}}`, followed by `end` when one is given.
pub fn parse_list_capture(p: &mut Parser<'_>, end: Option<TokenKind>) -> Result<Capture> {
    let start = p.start_node();
    p.expect(TokenKind::CaptureOpen)?;
    p.expect(TokenKind::DotDotDot)?;
    let capture = parse_capture_at(p, start, true)?;
    if let Some(end) = end {
        p.expect(end)?;
    }
    Ok(capture)
}

/// `true` when the current token opens a `{{...name}}`.  Consumes nothing.
pub fn is_list_capture(p: &Parser<'_>) -> Result<bool> {
    Ok(p.at(TokenKind::CaptureOpen) && p.lookahead()?.kind == TokenKind::DotDotDot)
}

/// `true` when a later element of the comma-separated list starting at the
/// current token is a `{{...name}}`.
///
/// Only elements at the list's own nesting level count.  The scan ends at
/// the list's closing bracket, at end of input, at a lexical error, and with
/// `stop_at_semicolon` at a top-level `;`.
pub(crate) fn list_capture_ahead(p: &Parser<'_>, stop_at_semicolon: bool) -> bool {
    let rest = &p.source()[p.token().span.start.offset..];
    if !rest.contains("{{") {
        return false;
    }
    let mut sc = p.scanner().clone();
    let mut depth = 0usize;
    let (mut prev2, mut prev) = (TokenKind::Eof, TokenKind::Eof);
    let mut kind = p.kind();
    loop {
        match kind {
            TokenKind::LeftParen
            | TokenKind::LeftBracket
            | TokenKind::LeftBrace
            | TokenKind::TemplateHead
            | TokenKind::CaptureOpen => depth += 1,
            TokenKind::RightParen
            | TokenKind::RightBracket
            | TokenKind::RightBrace
            | TokenKind::TemplateTail
            | TokenKind::CaptureClose => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            TokenKind::DotDotDot
                if depth == 1 && prev == TokenKind::CaptureOpen && prev2 == TokenKind::Comma =>
            {
                return true;
            }
            TokenKind::Semicolon if depth == 0 && stop_at_semicolon => return false,
            TokenKind::Eof => return false,
            _ => {}
        }
        (prev2, prev) = (prev, kind);
        kind = loop {
            match sc.next_token() {
                Ok(token) if token.kind.is_comment() => continue,
                Ok(token) => break token.kind,
                Err(_) => return false,
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParserOptions;
    use crate::plugins::capture::CapturePlugin;

    fn parser(src: &str) -> Parser<'_> {
        Parser::new(src, &ParserOptions::default().with_plugin(CapturePlugin)).unwrap()
    }

    #[test]
    fn test_single_capture_span_and_name() {
        let mut p = parser(" {{ name }} ");
        let capture = parse_single_capture(&mut p).unwrap();
        assert_eq!(capture.name, "name");
        assert!(!capture.is_list_capture);
        assert_eq!(capture.loc.text(p.source()), "{{ name }}");
    }

    #[test]
    fn test_single_capture_rejects_list_form() {
        let err = parse_single_capture(&mut parser("{{...xs}}")).unwrap_err();
        assert_eq!(err.message(), Some("Cannot use list Capture here"));
        assert_eq!(err.position().map(|pos| pos.offset), Some(2));
    }

    #[test]
    fn test_missing_name() {
        let err = parse_single_capture(&mut parser("{{}}")).unwrap_err();
        assert_eq!(err.message(), Some("Unexpected token, expected Capture name"));
        let err = parse_single_capture(&mut parser("{{ if }}")).unwrap_err();
        assert_eq!(err.message(), Some("Unexpected token, expected Capture name"));
    }

    #[test]
    fn test_unterminated_capture() {
        let err = parse_single_capture(&mut parser("{{x}")).unwrap_err();
        assert_eq!(err.message(), Some("Unexpected token, expected \"}}\""));
    }

    #[test]
    fn test_list_capture_consumes_end_token() {
        let mut p = parser("{{...xs}})");
        let capture = parse_list_capture(&mut p, Some(TokenKind::RightParen)).unwrap();
        assert!(capture.is_list_capture);
        assert_eq!(capture.loc.text(p.source()), "{{...xs}}");
        assert!(p.at(TokenKind::Eof));
    }

    #[test]
    fn test_list_capture_requires_ellipsis() {
        let err = parse_list_capture(&mut parser("{{xs}}"), None).unwrap_err();
        assert_eq!(err.message(), Some("Unexpected token, expected \"...\""));
    }

    #[test]
    fn test_is_list_capture_does_not_consume() {
        let p = parser("{{...xs}}");
        assert!(is_list_capture(&p).unwrap());
        assert!(p.at(TokenKind::CaptureOpen));
        assert!(!is_list_capture(&parser("{{x}}")).unwrap());
        assert!(!is_list_capture(&parser("...x")).unwrap());
    }

    #[test]
    fn test_list_capture_ahead_stays_on_its_level() {
        assert!(list_capture_ahead(&parser("{{x}}, {{...y}})"), false));
        assert!(list_capture_ahead(&parser("a, /* c */ {{...y}}]"), false));
        assert!(!list_capture_ahead(&parser("f(a, {{...y}}), b)"), false));
        assert!(!list_capture_ahead(&parser("a) + g(b, {{...y}})"), false));
        assert!(!list_capture_ahead(&parser("a = 1; f(b, {{...y}})"), true));
        assert!(!list_capture_ahead(&parser("a, b)"), false));
    }
}
