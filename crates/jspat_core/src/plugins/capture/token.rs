//! Context effects of the capture delimiters.
//!
//! [`TokenKind::CaptureOpen`](crate::parser::scanner::TokenKind::CaptureOpen)
//! starts an expression and opens a [`LexContext::Capture`];
//! [`TokenKind::CaptureClose`](crate::parser::scanner::TokenKind::CaptureClose)
//! closes it and behaves like the end of a value, so a following `/` is
//! division.

use tracing::trace;

use crate::parser::scanner::{LexContext, Scanner};

/// Run when `{{` has been read.
pub(crate) fn enter_capture(sc: &mut Scanner<'_>) {
    sc.push_context(LexContext::Capture);
    sc.set_expr_allowed(true);
    trace!(depth = sc.context_depth(), "enter capture context");
}

/// Run when `}}` has been read.
pub(crate) fn exit_capture(sc: &mut Scanner<'_>) {
    sc.pop_context();
    sc.set_expr_allowed(false);
    trace!(depth = sc.context_depth(), "exit capture context");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_and_exit_balance_the_stack() {
        let mut sc = Scanner::new("");
        sc.set_expr_allowed(false);
        enter_capture(&mut sc);
        assert_eq!(sc.current_context(), Some(LexContext::Capture));
        assert!(sc.expr_allowed());
        exit_capture(&mut sc);
        assert_eq!(sc.context_depth(), 0);
        assert!(!sc.expr_allowed());
    }
}
