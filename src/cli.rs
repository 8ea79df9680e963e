//! Command-line interface implementation for bake.
//! Provides argument parsing and help text formatting using clap.

use crate::constants::DEFAULT_TEMPLATE;
use clap::{error::ErrorKind, Args as ClapArgs, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for bake.
#[derive(Parser, Debug)]
#[command(author, version, about = "bake: scaffold a project from a named template", long_about = None)]
pub struct Args {
    /// Enable debug logging output
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Apply a template to the current directory
    Init {
        /// Name of the template to apply
        #[arg(value_name = "TEMPLATE", default_value = DEFAULT_TEMPLATE)]
        template: String,

        /// Overwrite existing files instead of skipping them.
        /// An existing package.json is always merged.
        #[arg(short, long)]
        force: bool,

        #[command(flatten)]
        roots: RootArgs,
    },

    /// List the templates found in every search root
    List {
        #[command(flatten)]
        roots: RootArgs,
    },
}

/// Extra search roots, searched before the standard locations.
#[derive(ClapArgs, Debug, Default, PartialEq, Eq)]
pub struct RootArgs {
    /// Additional template directory, searched first (repeatable)
    #[arg(short, long = "templates", value_name = "DIR")]
    pub templates: Vec<PathBuf>,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 and the help text if no subcommand is given
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(
                e.kind(),
                ErrorKind::MissingSubcommand
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let mut command = Args::command().help_template(
                    r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                );
                if command.print_help().is_err() {
                    e.exit();
                }
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
