use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Loop-wide error.
///
/// Tree edits never produce one: a missing node is reported through the edit's return value.
#[derive(Debug)]
pub enum LoopError {
    /// The loop was shut down; no further frames run.
    ExitRequested,

    ConfigIo(PathBuf, io::Error),
    ConfigParse(PathBuf, toml::de::Error),

    /// Generic error (fallback).
    Other(String),
}

impl LoopError {
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopError::ExitRequested => write!(f, "exit requested"),
            LoopError::ConfigIo(path, e) => write!(f, "config '{}': {e}", path.display()),
            LoopError::ConfigParse(path, e) => write!(f, "config '{}': {e}", path.display()),
            LoopError::Other(s) => write!(f, "{s}"),
        }
    }
}

impl Error for LoopError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoopError::ConfigIo(_, e) => Some(e),
            LoopError::ConfigParse(_, e) => Some(e),
            _ => None,
        }
    }
}

impl From<&str> for LoopError {
    #[inline]
    fn from(value: &str) -> Self {
        LoopError::Other(value.to_string())
    }
}

impl From<String> for LoopError {
    #[inline]
    fn from(value: String) -> Self {
        LoopError::Other(value)
    }
}

pub type LoopResult<T> = Result<T, LoopError>;
