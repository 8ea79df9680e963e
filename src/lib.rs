//! bake scaffolds a project from a named, user-extensible template.
//! It copies the template's files into the working directory, merges its
//! package manifest into an existing one and runs lifecycle hook scripts
//! before and after the files are written.

/// Command-line interface module for the bake application
pub mod cli;

/// Search roots for template discovery
pub mod config;

/// Reserved file names, keys and defaults
pub mod constants;

/// Skip, merge or overwrite decisions for existing destinations
pub mod conflict;

/// Error types and handling for the bake application
pub mod error;

/// `prestart`/`start`/`poststart` and `preinstall`/`install`/`postinstall` hooks
pub mod hooks;

/// Logger setup
pub mod logger;

/// `package.json` parsing and merging
pub mod manifest;

/// Concurrent expansion of template files into the destination
pub mod processor;

/// Template discovery across ordered search roots
pub mod registry;

/// Resolve, hook, expand, hook
pub mod scaffold;
