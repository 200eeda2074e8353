use miette::Diagnostic;
use thiserror::Error;

/// Result type for scrubbing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Flow comment scrubber
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum Error {
    #[error("I/O error: {0}")]
    #[diagnostic(code(flow_comment_scrub::io_error))]
    Io(String),

    #[error("Parse error: {message}")]
    #[diagnostic(code(flow_comment_scrub::parse_error))]
    Parse { message: String },

    #[error("Malformed syntax tree: {message}")]
    #[diagnostic(
        code(flow_comment_scrub::malformed_input),
        help("the tree must come from SyntaxTree::parse or uphold the same attachment rules")
    )]
    MalformedInput { message: String },

    #[error("{count} file(s) contain Flow comments")]
    #[diagnostic(code(flow_comment_scrub::check_failed))]
    Check { count: usize },
}

impl Error {
    /// Create a malformed input error
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }
}
