use std::path::PathBuf;

use thiserror::Error;

use crate::model::Protocol;

#[derive(Error, Debug)]
pub enum WhoportError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot list processes: {0}")]
    ProcessTree(#[source] std::io::Error),
    #[error("{protocol} table, line {line}: {source}")]
    Table {
        protocol: Protocol,
        line: usize,
        #[source]
        source: LineError,
    },
    #[error("invalid port: {0:?}")]
    InvalidPort(String),
    #[error("unknown signal: {0:?}")]
    InvalidSignal(String),
}

impl WhoportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WhoportError::Io {
            path: path.into(),
            source,
        }
    }

    /// Errors caused by what the user typed rather than by system state.
    pub fn is_user_error(&self) -> bool {
        matches!(self, WhoportError::InvalidPort(_) | WhoportError::InvalidSignal(_))
    }
}

/// A data line that does not match the kernel's socket table schema.
#[derive(Error, Debug)]
pub enum LineError {
    #[error("expected at least 10 fields, found {found}")]
    TooFewFields { found: usize },
    #[error("malformed address field {0:?}")]
    Endpoint(String),
    #[error("malformed {field} field {value:?}")]
    Numeric { field: &'static str, value: String },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Failures of the hex field decoders.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected {expected} hex digits, got {value:?}")]
    Length { expected: usize, value: String },
    #[error("not a hex number: {0:?}")]
    NotHex(String),
    #[error("port {0:#x} does not fit in 16 bits")]
    PortRange(u64),
    #[error("unknown TCP state index {0}")]
    UnknownState(u64),
}

pub type Result<T> = std::result::Result<T, WhoportError>;
