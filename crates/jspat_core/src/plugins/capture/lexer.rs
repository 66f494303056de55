//! The `{{` / `}}` token rule.

use crate::parser::scanner::{LexContext, Scanner, Token, TokenKind, TokenValue};

/// Read a capture delimiter at the scanner's position, if there is one.
///
/// `{{` always opens a capture, ahead of any brace rule.  `}}` closes one
/// only while a capture is the innermost context; elsewhere it is left to
/// the built-in rule as two `}` tokens.
pub(crate) fn read_delimiter(sc: &mut Scanner<'_>) -> Option<Token> {
    let kind = match (sc.peek(), sc.peek2()) {
        (Some('{'), Some('{')) => TokenKind::CaptureOpen,
        (Some('}'), Some('}')) if sc.current_context() == Some(LexContext::Capture) => {
            TokenKind::CaptureClose
        }
        _ => return None,
    };
    sc.advance();
    sc.advance();
    Some(sc.finish_token(kind, TokenValue::None))
}

#[cfg(test)]
mod tests {
    use crate::parser::plugin::PluginSet;
    use crate::parser::scanner::{Scanner, TokenKind};
    use crate::plugins::capture::CapturePlugin;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Scanner::with_plugins(src, PluginSet::default().with(CapturePlugin))
            .collect_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_open_takes_priority_over_brace() {
        assert_eq!(kinds("{{")[0], TokenKind::CaptureOpen);
        assert_eq!(kinds("{ {")[0], TokenKind::LeftBrace);
    }

    #[test]
    fn test_close_requires_capture_context() {
        assert_eq!(
            kinds("f() {}}"),
            vec![
                TokenKind::Identifier,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::RightBrace,
            ]
        );
    }

    #[test]
    fn test_delimiter_spans_cover_both_braces() {
        let tokens = Scanner::with_plugins("  {{ a }}", PluginSet::default().with(CapturePlugin))
            .collect_tokens()
            .unwrap();
        assert_eq!(tokens[0].span.start.offset, 2);
        assert_eq!(tokens[0].span.end.offset, 4);
        assert_eq!(tokens[2].span.text("  {{ a }}"), "}}");
    }

    #[test]
    fn test_nested_object_inside_capture_does_not_close_early() {
        // A `}` that closes a brace opened inside the capture is plain.
        assert_eq!(
            kinds("{{ {a} }}"),
            vec![
                TokenKind::CaptureOpen,
                TokenKind::LeftBrace,
                TokenKind::Identifier,
                TokenKind::RightBrace,
                TokenKind::CaptureClose,
            ]
        );
    }
}
