use thiserror::Error;

#[derive(Debug, Error)]
pub enum AstError {
    #[error("source code too large ({0} bytes), potential DoS risk")]
    SourceTooLarge(usize),

    #[error("failed to parse Java source code")]
    ParseFailed,

    #[error("source code contains syntax errors that prevent analysis")]
    SyntaxError,
}
