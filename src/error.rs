use miette::Diagnostic;
use thiserror::Error;

/// Main error type for stipple operations.
///
/// Core transforms never fail; a missing buffer or degenerate configuration
/// produces an empty (or clamped) result instead. Errors only arise at the
/// CLI boundary: file IO, image decoding, and stops-file parsing.
#[derive(Error, Diagnostic, Debug)]
pub enum StippleError {
    #[error("IO error: {0}")]
    #[diagnostic(code(stipple::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(stipple::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(stipple::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Input error: {message}")]
    #[diagnostic(code(stipple::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, StippleError>;
