//! Lifecycle hook processing.
//!
//! A template's manifest may carry shell commands under `bake.scripts`. Each
//! phase runs up to three of them in strict sequence: `pre<phase>`, `<phase>`
//! and `post<phase>`. Missing or empty scripts are skipped without spawning
//! anything; the first failing script aborts the phase.

use crate::constants::HOOK_KEY;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Named lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Runs before any template file is written.
    Start,
    /// Runs once every template file has been written.
    Install,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::Install => "install",
        }
    }

    /// Script keys run for this phase, in execution order.
    pub fn script_keys(&self) -> [String; 3] {
        let name = self.name();
        [format!("pre{name}"), name.to_string(), format!("post{name}")]
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hook configuration found under the manifest's `bake` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HookConfig {
    /// Script bodies by key. A `null` body counts as absent.
    #[serde(default)]
    pub scripts: BTreeMap<String, Option<String>>,
}

impl HookConfig {
    /// Extracts the hook block from a template manifest read from `path`.
    ///
    /// A manifest without a `bake` key yields an empty configuration.
    pub fn from_manifest(manifest: &Manifest, path: &Path) -> Result<Self> {
        match manifest.get(HOOK_KEY) {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(block) => serde_json::from_value(block.clone()).map_err(|e| {
                Error::ManifestParseError {
                    path: path.to_path_buf(),
                    reason: format!("invalid '{HOOK_KEY}' block: {e}"),
                }
            }),
        }
    }

    /// Returns the command for `key`, ignoring blank entries.
    pub fn script(&self, key: &str) -> Option<&str> {
        self.scripts
            .get(key)
            .and_then(Option::as_deref)
            .filter(|command| !command.trim().is_empty())
    }
}

/// Values exposed to a running hook.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// Name of the template being applied.
    pub template_name: &'a str,
    /// Directory holding the template.
    pub template_dir: &'a Path,
    /// Directory the hook runs in; the destination of the expansion.
    pub working_dir: &'a Path,
}

/// Result of a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    Success,
    /// Non-zero exit. `None` when the process was killed by a signal.
    Failed(Option<i32>),
}

/// Executes hook commands.
#[async_trait(?Send)]
pub trait CommandRunner {
    /// Runs `command` to completion.
    ///
    /// An `Err` means the command could not be started at all.
    async fn exec(&self, command: &str, context: &HookContext<'_>) -> std::io::Result<ExecOutcome>;
}

/// Runs hooks through the platform shell with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        }
    }
}

#[async_trait(?Send)]
impl CommandRunner for ShellRunner {
    async fn exec(&self, command: &str, context: &HookContext<'_>) -> std::io::Result<ExecOutcome> {
        let status = Self::command(command)
            .current_dir(context.working_dir)
            .env("BAKE_TEMPLATE", context.template_name)
            .env("BAKE_TEMPLATE_DIR", context.template_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        Ok(if status.success() { ExecOutcome::Success } else { ExecOutcome::Failed(status.code()) })
    }
}

/// Runs the script registered under `key`, if any.
///
/// # Arguments
/// * `key` - Script key, such as `preinstall`
/// * `hooks` - Hook configuration of the current run
/// * `context` - Values handed to the running command
/// * `runner` - Executes the command
///
/// # Returns
/// * `Result<bool>` - Whether a command was actually executed
///
/// # Errors
/// * `Error::ScriptExecutionError` if the command cannot be spawned or exits unsuccessfully
pub async fn run_script(
    key: &str,
    hooks: &HookConfig,
    context: &HookContext<'_>,
    runner: &dyn CommandRunner,
) -> Result<bool> {
    let Some(command) = hooks.script(key) else {
        debug!("No '{key}' script, skipping");
        return Ok(false);
    };

    info!("Running '{key}' script: {command}");
    let failure = |reason: String| Error::ScriptExecutionError { script: key.to_string(), reason };

    match runner.exec(command, context).await {
        Ok(ExecOutcome::Success) => Ok(true),
        Ok(ExecOutcome::Failed(Some(code))) => Err(failure(format!("exited with status {code}"))),
        Ok(ExecOutcome::Failed(None)) => Err(failure("terminated by signal".to_string())),
        Err(e) => Err(failure(format!("could not be started: {e}"))),
    }
}

/// Runs `pre<phase>`, `<phase>` and `post<phase>` one after another.
///
/// Each script finishes before the next starts; the first failure aborts the
/// rest of the sequence. A phase with no scripts spawns nothing.
///
/// # Errors
/// * `Error::ScriptExecutionError` from the first script that fails
pub async fn invoke_phase(
    phase: Phase,
    hooks: &HookConfig,
    context: &HookContext<'_>,
    runner: &dyn CommandRunner,
) -> Result<()> {
    debug!("Entering '{phase}' phase");
    for key in phase.script_keys() {
        run_script(&key, hooks, context, runner).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_script_keys() {
        assert_eq!(Phase::Start.script_keys(), ["prestart", "start", "poststart"]);
        assert_eq!(Phase::Install.script_keys(), ["preinstall", "install", "postinstall"]);
    }

    #[test]
    fn test_hook_config_from_manifest() {
        let path = Path::new("package.json");
        let block = json!({"scripts": {"install": "make", "start": "  ", "poststart": null}});
        let manifest = match json!({ "bake": block }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };

        let hooks = HookConfig::from_manifest(&manifest, path).unwrap();
        assert_eq!(hooks.script("install"), Some("make"));
        assert_eq!(hooks.script("start"), None);
        assert_eq!(hooks.script("poststart"), None);
        assert_eq!(hooks.script("postinstall"), None);

        assert_eq!(HookConfig::from_manifest(&Manifest::new(), path).unwrap(), HookConfig::default());
    }

    #[test]
    fn test_malformed_hook_block() {
        let manifest = match json!({"bake": {"scripts": ["make"]}}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };

        let result = HookConfig::from_manifest(&manifest, Path::new("package.json"));
        assert!(matches!(result, Err(Error::ManifestParseError { .. })));
    }
}
