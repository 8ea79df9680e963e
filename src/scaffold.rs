//! Core template processing orchestration.
//! Resolves a template, then runs the `start` hooks, the file expansion and
//! the `install` hooks, each stage settling fully before the next begins.

use crate::constants::MANIFEST_FILE;
use crate::error::Result;
use crate::hooks::{invoke_phase, CommandRunner, HookConfig, HookContext, Phase};
use crate::processor::{FileOutcome, Processor};
use crate::registry::{Registry, Template};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Flags accepted by `init`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitOptions {
    /// Overwrite existing regular files instead of skipping them.
    pub force: bool,
}

/// State owned by a single `run`. Never shared between runs.
#[derive(Debug)]
pub struct RunContext<'a> {
    pub template: &'a Template,
    pub hooks: HookConfig,
    pub destination: PathBuf,
    pub outcomes: Vec<FileOutcome>,
}

impl<'a> RunContext<'a> {
    /// Builds the context, reading the hook block from the template manifest.
    pub fn new<P: Into<PathBuf>>(template: &'a Template, destination: P) -> Result<Self> {
        let manifest_path = template.directory.join(MANIFEST_FILE);
        let hooks = HookConfig::from_manifest(&template.manifest, &manifest_path)?;

        Ok(Self { template, hooks, destination: destination.into(), outcomes: Vec::new() })
    }

    pub fn hook_context(&self) -> HookContext<'_> {
        HookContext {
            template_name: &self.template.name,
            template_dir: &self.template.directory,
            working_dir: &self.destination,
        }
    }
}

/// Applies template `name` to `destination`.
///
/// # Flow
/// 1. Resolves the template; nothing touches the disk if it is unknown
/// 2. Runs `prestart`, `start`, `poststart`
/// 3. Expands the template files and waits for all of them
/// 4. Runs `preinstall`, `install`, `postinstall`
///
/// # Arguments
/// * `registry` - Templates discovered at startup
/// * `name` - Template to apply
/// * `destination` - Directory files are written to and hooks run in
/// * `options` - Flags given to `init`
/// * `runner` - Executes hook scripts
///
/// # Returns
/// * `Result<Vec<FileOutcome>>` - What happened to each template file
///
/// The first failure stops the run and is returned as is.
pub async fn run(
    registry: &Registry,
    name: &str,
    destination: &Path,
    options: InitOptions,
    runner: &dyn CommandRunner,
) -> Result<Vec<FileOutcome>> {
    let template = registry.resolve(name)?;
    info!("Using template '{}' from '{}'", template.name, template.directory.display());

    let mut context = RunContext::new(template, destination)?;

    invoke_phase(Phase::Start, &context.hooks, &context.hook_context(), runner).await?;

    let processor = Processor::new(context.template, &context.destination, options.force);
    context.outcomes = processor.expand().await?;
    debug!("Expansion finished with {} file(s)", context.outcomes.len());

    invoke_phase(Phase::Install, &context.hooks, &context.hook_context(), runner).await?;

    Ok(context.outcomes)
}
