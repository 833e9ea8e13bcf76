//! # Theme Error Types
//!
//! Error types for the theming system. Every fallible operation returns
//! [ThemeResult], and every error carries enough context to be reported
//! without further lookups (theme name, file path, or source location).
//!
//! Resolution itself never fails: an element that matches no rule simply
//! resolves to an empty style.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the theming system.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// A stylesheet could not be parsed. The theme was not registered.
    #[error("Failed to parse theme '{theme}' at {line}:{column}: {message}")]
    Parse {
        /// The name of the theme being parsed.
        theme: String,
        /// 1-based line of the offending input.
        line: usize,
        /// 1-based column of the offending input.
        column: usize,
        /// What went wrong.
        message: String,
    },

    /// Theme with the specified name is not registered.
    #[error("Theme '{name}' not found")]
    UnknownTheme {
        /// The name of the theme that was not found.
        name: String,
    },

    /// Theme stylesheet file was not found.
    #[error("Theme file not found: {path:?}")]
    ThemeFileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Theme configuration could not be read or is invalid.
    #[error("Invalid theme configuration: {details}")]
    Config {
        /// Details about the configuration problem.
        details: String,
    },

    /// Error reloading a theme (hot reload failure).
    #[error("Failed to reload theme: {source}")]
    ThemeReloadError {
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error setting up file watcher for hot reload.
    #[error("Failed to setup file watcher: {source}")]
    FileWatcherError {
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for theme operations.
pub type ThemeResult<T> = Result<T, ThemeError>;

impl ThemeError {
    /// Create a parse error at the given source location.
    pub fn parse(
        theme: impl Into<String>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            theme: theme.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an unknown theme error.
    pub fn unknown_theme(name: impl Into<String>) -> Self {
        Self::UnknownTheme { name: name.into() }
    }

    /// Create a theme file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ThemeFileNotFound { path: path.into() }
    }

    /// Create a configuration error.
    pub fn config(details: impl Into<String>) -> Self {
        Self::Config {
            details: details.into(),
        }
    }

    /// Create a theme reload error from any error type.
    pub fn reload_error(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ThemeReloadError {
            source: Box::new(source),
        }
    }

    /// Create a file watcher error from any error type.
    pub fn file_watcher_error(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::FileWatcherError {
            source: Box::new(source),
        }
    }

    /// Source location of a parse error, as `(line, column)`.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::Parse { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}
