//! Error handling for the bake application.
//! Defines the error taxonomy and result type used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for bake operations.
///
/// Every variant is fatal for the run that raised it. Existing destination
/// files are not errors and never show up here.
#[derive(Error, Debug)]
pub enum Error {
    /// No search root defines a template with the requested name.
    #[error("Template '{name}' not found.")]
    TemplateNotFound { name: String },

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// File system failure tied to a specific path.
    #[error("Filesystem error on '{}': {source}.", .path.display())]
    FilesystemError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed JSON in a template or destination manifest.
    #[error("Failed to parse manifest '{}': {reason}.", .path.display())]
    ManifestParseError { path: PathBuf, reason: String },

    /// A hook command could not be spawned or exited unsuccessfully.
    #[error("Script '{script}' failed: {reason}.")]
    ScriptExecutionError { script: String, reason: String },

    /// Two template files would be written to the same destination.
    #[error("Multiple template files target '{}'.", .target.display())]
    DuplicateDestination { target: PathBuf },
}

impl Error {
    /// Wraps an I/O error together with the path it happened on.
    pub fn fs<P: Into<PathBuf>>(path: P) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Error::FilesystemError { path, source }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{err}");
    std::process::exit(1);
}
