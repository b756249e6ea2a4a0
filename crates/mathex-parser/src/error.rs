use thiserror::Error;

/// Syntax errors raised eagerly by `parse`. `char` fields are 1-based
/// character offsets into the original source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unexpected end of expression (char {char})")]
    UnexpectedEnd { char: usize },

    #[error("Value expected (char {char})")]
    ValueExpected { char: usize },

    #[error("Syntax error in part \"{part}\" (char {char})")]
    SyntaxInPart { part: String, char: usize },

    #[error("Invalid assignment LHS (char {char})")]
    InvalidAssignmentLhs { char: usize },

    #[error("Parenthesis ) expected")]
    ParenExpected,

    #[error("Parenthesis ] expected")]
    BracketExpected,

    #[error("End of matrix ] expected")]
    EndOfMatrixExpected,

    #[error("Column dimensions mismatch")]
    ColumnDimensionsMismatch,

    #[error("False part of conditional expression expected")]
    FalsePartExpected,

    #[error("Unexpected part \"{part}\"")]
    UnexpectedPart { part: String },
}
