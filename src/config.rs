//! Search-root configuration for bake.
//! Builds the ordered list of directories templates are discovered in.

use crate::constants::{APP_DIR, BUNDLED_TEMPLATES_ENV, TEMPLATES_DIR};
use crate::error::{Error, Result};
use include_dir::{include_dir, Dir};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Templates shipped inside the binary.
static BUNDLED_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Ordered search roots, highest priority first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub roots: Vec<PathBuf>,
}

impl Config {
    /// Creates a configuration from an explicit list of roots.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Builds the standard layout, with `extra` roots taking precedence.
    ///
    /// # Errors
    /// * `Error::FilesystemError` if the bundled templates cannot be written out
    pub fn from_env(extra: &[PathBuf]) -> Result<Self> {
        Ok(Self::layered(extra, bundled_templates_dir()?))
    }

    /// Builds the standard layout around an already known bundled root.
    ///
    /// Priority order:
    /// 1. `extra`, in the order given
    /// 2. `<config dir>/bake/templates`
    /// 3. `<home dir>/.bake/templates`
    /// 4. `bundled`
    pub fn layered(extra: &[PathBuf], bundled: PathBuf) -> Self {
        let mut roots: Vec<PathBuf> = extra.to_vec();

        if let Some(config_dir) = dirs::config_dir() {
            roots.push(config_dir.join(APP_DIR).join(TEMPLATES_DIR));
        }
        if let Some(home_dir) = dirs::home_dir() {
            roots.push(home_dir.join(format!(".{APP_DIR}")).join(TEMPLATES_DIR));
        }
        roots.push(bundled);

        debug!("Template search roots: {roots:?}");
        Self { roots }
    }
}

/// Returns the directory holding the templates shipped with bake.
///
/// `$BAKE_BUNDLED_TEMPLATES` wins when set. Otherwise the embedded templates
/// are written once per version under the user's cache directory.
pub fn bundled_templates_dir() -> Result<PathBuf> {
    match std::env::var_os(BUNDLED_TEMPLATES_ENV) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => {
            let cache = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
            let target = cache
                .join(APP_DIR)
                .join(format!("bundled-{}", env!("CARGO_PKG_VERSION")));
            materialize_bundled(&target)
        }
    }
}

/// Writes the embedded templates to `target` unless it already exists.
///
/// Files are extracted into a sibling staging directory first and renamed
/// into place, so `target` never holds a partial copy.
///
/// # Arguments
/// * `target` - Directory that becomes the bundled search root
///
/// # Returns
/// * `Result<PathBuf>` - `target`, ready to be scanned
pub fn materialize_bundled(target: &Path) -> Result<PathBuf> {
    if target.is_dir() {
        return Ok(target.to_path_buf());
    }

    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let staging = parent.join(format!(".staging-{}", std::process::id()));
    if staging.exists() {
        fs::remove_dir_all(&staging).map_err(Error::fs(&staging))?;
    }
    fs::create_dir_all(&staging).map_err(Error::fs(&staging))?;
    BUNDLED_TEMPLATES.extract(&staging).map_err(Error::fs(&staging))?;

    if let Err(e) = fs::rename(&staging, target) {
        if let Err(cleanup) = fs::remove_dir_all(&staging) {
            debug!("Could not remove '{}': {cleanup}", staging.display());
        }
        // Another process may have put the templates in place first.
        if !target.is_dir() {
            return Err(Error::fs(target)(e));
        }
    }

    debug!("Bundled templates available in '{}'", target.display());
    Ok(target.to_path_buf())
}
