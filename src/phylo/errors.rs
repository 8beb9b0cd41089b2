//! Errors for newick tokenization and tree construction.
//!
//! [`TreeError`] covers lexical problems (bad characters, unterminated
//! quotes or comments), grammatical problems (unexpected or missing tokens),
//! and malformed branch lengths. Positions are 0-based character offsets into
//! the input string.

/// Result alias for tree parsing and traversal.
pub type TreeResult<T> = Result<T, TreeError>;

#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    // ---- Lexical ----
    /// Input contained nothing but whitespace.
    EmptyInput,

    /// A quoted label or bracket comment was never closed.
    Unterminated { what: &'static str, position: usize },

    // ---- Grammar ----
    /// Parser found a token it did not expect.
    UnexpectedToken { expected: &'static str, found: String, position: usize },

    /// Input ended in the middle of a tree.
    UnexpectedEnd { expected: &'static str },

    /// Tokens remained after the terminating `;`.
    TrailingInput { position: usize },

    // ---- Values ----
    /// A branch length could not be parsed as a finite float.
    InvalidLength { text: String, position: usize },
}

impl std::error::Error for TreeError {}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::EmptyInput => write!(f, "Empty newick string"),
            TreeError::Unterminated { what, position } => {
                write!(f, "Unterminated {what} starting at position {position}")
            }
            TreeError::UnexpectedToken { expected, found, position } => {
                write!(f, "Expected {expected} at position {position}, found '{found}'")
            }
            TreeError::UnexpectedEnd { expected } => {
                write!(f, "Unexpected end of newick string, expected {expected}")
            }
            TreeError::TrailingInput { position } => {
                write!(f, "Unexpected input after ';' at position {position}")
            }
            TreeError::InvalidLength { text, position } => {
                write!(f, "Invalid branch length '{text}' at position {position}")
            }
        }
    }
}
