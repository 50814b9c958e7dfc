//! Error type shared by the loader, the parameter checks and the writer.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("edge list, line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid parameter: {0}")]
    Config(String),

    #[error("network has no vertices")]
    EmptyNetwork,
}

impl SimError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        SimError::Parse { line, message: message.into() }
    }
}
