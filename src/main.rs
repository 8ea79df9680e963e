//! bake's main application entry point.
//! Parses arguments, sets up logging and dispatches to the library.

use bake::{
    cli::{get_args, Command},
    config::Config,
    error::{default_error_handler, Error, Result},
    hooks::ShellRunner,
    logger::init_logger,
    registry::Registry,
    scaffold::{run, InitOptions},
};

/// Main application entry point.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = get_args();
    init_logger(args.debug);

    if let Err(err) = dispatch(args.command).await {
        default_error_handler(err);
    }
}

async fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init { template, force, roots } => {
            let registry = Registry::discover(&Config::from_env(&roots.templates)?.roots)?;
            let destination = std::env::current_dir().map_err(Error::IoError)?;

            run(&registry, &template, &destination, InitOptions { force }, &ShellRunner::new())
                .await?;

            log::info!("Template '{template}' applied in '{}'.", destination.display());
            Ok(())
        }
        Command::List { roots } => {
            let registry = Registry::discover(&Config::from_env(&roots.templates)?.roots)?;
            for template in registry.templates() {
                let marker = if registry.is_shadowed(template) { " (shadowed)" } else { "" };
                println!("{}\t{}{marker}", template.name, template.directory.display());
            }
            Ok(())
        }
    }
}
