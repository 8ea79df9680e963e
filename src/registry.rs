//! Template discovery and resolution.
//!
//! Templates are the immediate subdirectories of each search root. Roots are
//! scanned in priority order and a name resolves to the first template found,
//! so a template in a higher-priority root shadows every same-named template
//! below it. Shadowed templates are never merged with the winner.

use crate::constants::MANIFEST_FILE;
use crate::error::{Error, Result};
use crate::manifest::{load_manifest, Manifest};
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A named template directory and its parsed manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Basename of the template directory.
    pub name: String,
    /// Template directory.
    pub directory: PathBuf,
    /// Parsed `package.json`, empty when the template has none.
    pub manifest: Manifest,
}

impl Template {
    /// Loads the template stored in `directory`.
    pub fn load<P: Into<PathBuf>>(directory: P) -> Result<Self> {
        let directory = directory.into();
        let name = directory
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let manifest = load_manifest(&directory.join(MANIFEST_FILE))?;

        Ok(Self { name, directory, manifest })
    }
}

/// Read-only snapshot of every template found in the search roots.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    templates: Vec<Template>,
}

impl Registry {
    /// Scans `roots` in priority order.
    ///
    /// Roots that do not exist are skipped, as are entries whose link target is
    /// gone. Within a root, templates are sorted by name.
    ///
    /// # Arguments
    /// * `roots` - Search roots, highest priority first
    ///
    /// # Returns
    /// * `Result<Registry>` - Every template found, in resolution order
    ///
    /// # Errors
    /// * `Error::ManifestParseError` if a template carries a malformed manifest
    /// * `Error::FilesystemError` if a root cannot be listed
    pub fn discover<P: AsRef<Path>>(roots: &[P]) -> Result<Self> {
        let mut templates = Vec::new();

        for root in roots {
            let root = root.as_ref();
            if !root.is_dir() {
                debug!("Skipping missing search root '{}'", root.display());
                continue;
            }

            let walker = WalkDir::new(root)
                .min_depth(1)
                .max_depth(1)
                .follow_links(true)
                .sort_by_file_name();
            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) if e.io_error().map(|io| io.kind()) == Some(ErrorKind::NotFound) => {
                        debug!("Skipping unresolvable entry in '{}': {e}", root.display());
                        continue;
                    }
                    Err(e) => return Err(Error::fs(root)(e.into())),
                };
                if !entry.file_type().is_dir() {
                    continue;
                }
                let template = Template::load(entry.path())?;
                debug!("Found template '{}' in '{}'", template.name, root.display());
                templates.push(template);
            }
        }

        Ok(Self { templates })
    }

    /// Every discovered template, in resolution order, shadowed ones included.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Resolves `name` to the template from the highest-priority root defining it.
    ///
    /// # Errors
    /// * `Error::TemplateNotFound` if no root defines `name`
    pub fn resolve(&self, name: &str) -> Result<&Template> {
        self.templates
            .iter()
            .find(|template| template.name == name)
            .ok_or_else(|| Error::TemplateNotFound { name: name.to_string() })
    }

    /// Returns true if `template` is hidden by an earlier template of the same name.
    pub fn is_shadowed(&self, template: &Template) -> bool {
        self.resolve(&template.name)
            .map(|winner| winner.directory != template.directory)
            .unwrap_or(false)
    }
}
