use thiserror::Error as ThisError;

/// Problem-file syntax error, reported against the 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("line:{line} {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new<M: Into<String>>(line: usize, message: M) -> Self {
        Self { line, message: message.into() }
    }
}

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },
}
