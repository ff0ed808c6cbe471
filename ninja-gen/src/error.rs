/// Errors raised while building escapable strings or writing statements.
///
/// Construction errors are terminal for the one string being parsed; write
/// errors are terminal for the whole generation pass. Nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed variable reference in {input:?} at byte {offset}: {reason}")]
    MalformedReference {
        input: String,
        offset: usize,
        reason: &'static str,
    },
    #[error("variable '{0}' is not declared in scope")]
    UndeclaredVariable(String),
    #[error("failed to write build file: {0}")]
    WriteFailure(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
