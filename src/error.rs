//! Error taxonomy
//!
//! Startup failures are fatal; missing assets are always recovered by the
//! caller with a placeholder and only ever logged.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum GameError {
    /// Terminal, renderer, or audio backend could not be brought up
    StartupFailure { stage: &'static str, reason: String },
    /// Image or sound missing or undecodable
    AssetMissing { path: PathBuf, reason: String },
    /// I/O failure while presenting a frame or reading input
    Io(std::io::Error),
}

impl GameError {
    pub fn startup(stage: &'static str, reason: impl fmt::Display) -> Self {
        Self::StartupFailure {
            stage,
            reason: reason.to_string(),
        }
    }

    pub fn asset(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::AssetMissing {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors that must end the process
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::AssetMissing { .. })
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartupFailure { stage, reason } => {
                write!(f, "startup failed during {stage}: {reason}")
            }
            Self::AssetMissing { path, reason } => {
                write!(f, "asset {} unavailable: {reason}", path.display())
            }
            Self::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_errors_are_recoverable() {
        let err = GameError::asset("assets/coin/coin_0.png", "not found");
        assert!(!err.is_fatal());
        assert_eq!(
            err.to_string(),
            "asset assets/coin/coin_0.png unavailable: not found"
        );
    }

    #[test]
    fn test_startup_errors_are_fatal() {
        let err = GameError::startup("terminal", "not a tty");
        assert!(err.is_fatal());
        assert!(err.to_string().contains("terminal"));
    }
}
