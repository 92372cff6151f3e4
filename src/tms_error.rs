// Error types for the game core and the preferences file

use std::path::PathBuf;

use crate::tms_session::Phase;

/// Failures reported by [`Minefield`](crate::tms_field::Minefield) and
/// [`GameSession`](crate::tms_session::GameSession).
///
/// Routine player missteps (revealing a flagged cell, chording with the wrong
/// number of flags, flagging an opened cell) are not errors; those calls
/// succeed with an empty change set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid board {width}x{height} with {mines} mines: {reason}")]
    InvalidConfiguration {
        width: usize,
        height: usize,
        mines: usize,
        reason: &'static str,
    },

    #[error("cell ({row}, {col}) is outside the {width}x{height} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("the game has already finished ({0:?})")]
    Finished(Phase),
}

impl GameError {
    /// True for errors caused by a bad request against a live board rather
    /// than by bad board dimensions.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, GameError::OutOfBounds { .. } | GameError::Finished(_))
    }
}

/// Errors that can occur while loading or saving preferences.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no per-user config directory is available")]
    NoConfigDir,

    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

/// Errors from the start-up checks that run before the game takes over the terminal.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("startup check failed: {0}")]
    Failed(&'static str),

    #[error("interrupted")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_display() {
        let err = GameError::InvalidConfiguration {
            width: 1,
            height: 1,
            mines: 1,
            reason: "mines must leave at least one safe cell",
        };
        assert_eq!(
            err.to_string(),
            "invalid board 1x1 with 1 mines: mines must leave at least one safe cell"
        );
        assert!(!err.is_invalid_operation());
    }

    #[test]
    fn test_invalid_operation_kinds() {
        let oob = GameError::OutOfBounds {
            row: 9,
            col: 2,
            width: 9,
            height: 9,
        };
        assert_eq!(oob.to_string(), "cell (9, 2) is outside the 9x9 board");
        assert!(oob.is_invalid_operation());
        assert!(GameError::Finished(Phase::Lost).is_invalid_operation());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::FileRead {
            path: PathBuf::from("tmines.toml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "failed to read config file tmines.toml: denied");
    }

    #[test]
    fn test_check_error_display() {
        assert_eq!(
            CheckError::Failed("window size").to_string(),
            "startup check failed: window size"
        );
    }
}
