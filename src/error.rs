//! Error type shared by the operand parser, the instruction encoder and the
//! module pipeline. Every error here is fatal for the whole encode: a machine
//! code section cannot be produced partially.

use thiserror::Error;

/// Position of a token inside the assembly text, used to point syntax errors
/// at the offending operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// Malformed operand or instruction text.
    #[error("{position}: {message}")]
    Syntax {
        position: SourcePosition,
        message: String,
    },

    /// The mnemonic is not in the operation index table.
    #[error("could not understand the instruction '{0}'")]
    UnknownInstruction(String),

    /// No table entry accepts this operand shape/size combination.
    #[error("could not find instruction encoding for '{0}'")]
    MissingEncoding(String),

    /// The same label is declared in more than one place.
    #[error("label '{0}' is created multiple times")]
    DuplicateLabel(String),

    /// An encoding route was selected whose operand layout does not match
    /// the instruction's actual operands.
    #[error("unsupported encoding route for '{0}'")]
    UnsupportedRoute(String),

    /// Immediates can only be 1, 2, 4 or 8 bytes wide.
    #[error("invalid constant size {0}")]
    InvalidConstantSize(u8),

    /// An encode worker terminated abnormally.
    #[error("encoder worker failed unexpectedly")]
    WorkerFailure,
}

impl EncodeError {
    pub fn syntax(position: SourcePosition, message: impl Into<String>) -> Self {
        EncodeError::Syntax { position, message: message.into() }
    }
}
