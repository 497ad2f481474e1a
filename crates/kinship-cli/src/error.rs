//! Error types for the console binary.

use kinship_core::CoreError;

/// Failures that end the interactive shell.
///
/// Expected conditions (unknown user, empty log, bad input) are printed by
/// the shell and never reach this type; only I/O failures do.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Reading the console or writing to it failed.
    #[error("console I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Persisting the network failed.
    #[error("persistence failed: {source}")]
    Core {
        /// The underlying session error.
        #[from]
        source: CoreError,
    },
}
