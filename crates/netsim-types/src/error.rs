//! Error types for netsim.

use std::io;

/// Errors produced while loading labs, reading files, or serializing state.
#[derive(Debug, thiserror::Error)]
pub enum NetsimError {
    #[error("config error: {0}")]
    Config(String),

    #[error("unknown device: {0}")]
    UnknownDevice(String),

    #[error("no device attached")]
    NotAttached,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, NetsimError>;

/// A command line the interpreter refused.
///
/// Every variant renders as the `%`-prefixed text shown to the operator.
/// Returning one of these guarantees the device was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    /// More than one grammar path matches the abbreviation.
    #[error("% Ambiguous command")]
    Ambiguous,

    /// No grammar path in the current mode matches.
    #[error("% Invalid input detected at '^' marker.")]
    Unresolved,

    /// The command resolved but a required argument is missing.
    #[error("% Incomplete command.")]
    Incomplete,

    /// The command names something that does not exist or is malformed,
    /// e.g. `interface Gig9/9` or `address 300.1.1.1`.
    #[error("% Invalid {0}")]
    InvalidTarget(String),

    /// An interface-scoped change was attempted with no interface selected.
    #[error("% No interface selected")]
    NoActiveInterface,

    /// The grammar knows the command but nothing handles it.
    #[error("% Command not implemented")]
    NotImplemented,
}
