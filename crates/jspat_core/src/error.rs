//! Error types for the jspat parser.

use thiserror::Error;

use crate::parser::scanner::Position;

/// All errors that can be produced while configuring or running a parse.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A lexical or grammatical violation in the source text.
    ///
    /// `pos` is the start of the offending token (1-based line and column).
    #[error("{message} ({}:{})", pos.line, pos.column)]
    Syntax {
        /// Human-readable description, e.g. `Unexpected token, expected ;`.
        message: String,
        /// Where the violation was detected.
        pos: Position,
    },

    /// A plugin was requested by a name that is not registered.
    #[error("unknown parser plugin '{0}'")]
    UnknownPlugin(String),
}

impl Error {
    /// Build a [`Error::Syntax`] at `pos`.
    pub fn syntax(message: impl Into<String>, pos: Position) -> Self {
        Error::Syntax {
            message: message.into(),
            pos,
        }
    }

    /// The bare message of a syntax error, without the position suffix.
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::Syntax { message, .. } => Some(message),
            Error::UnknownPlugin(_) => None,
        }
    }

    /// The source position of a syntax error.
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Syntax { pos, .. } => Some(*pos),
            Error::UnknownPlugin(_) => None,
        }
    }
}

/// Convenient `Result` alias for fallible parser operations.
pub type Result<T> = std::result::Result<T, Error>;
