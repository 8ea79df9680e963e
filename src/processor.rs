//! Template expansion.
//!
//! Copies the top-level files of a template into a destination directory.
//! Subdirectories are ignored and paths are flattened to their basename. All
//! file operations are started together and joined before returning; a
//! failure does not undo the operations that already completed.

use crate::conflict::{resolve_conflict, FileKind, Resolution};
use crate::error::{Error, Result};
use crate::manifest::{merge, read_manifest, strip_hooks, write_manifest};
use crate::registry::Template;
use futures::future::join_all;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A single template file and where it is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub source: PathBuf,
    pub target: PathBuf,
    pub kind: FileKind,
}

/// What happened to a destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Regular file copied to an absent destination.
    Copied,
    /// Manifest written to an absent destination.
    Written,
    /// Existing manifest merged with the template's.
    Merged,
    /// Existing regular file replaced (force).
    Overwritten,
    /// Existing regular file left untouched.
    Skipped,
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            FileAction::Copied => "Copied",
            FileAction::Written => "Written",
            FileAction::Merged => "Merged",
            FileAction::Overwritten => "Overwritten",
            FileAction::Skipped => "Skipped",
        };
        f.write_str(action)
    }
}

/// Outcome of one file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub target: PathBuf,
    pub action: FileAction,
}

/// Maps each source file to `destination/<basename>`.
///
/// # Arguments
/// * `sources` - Template files to expand
/// * `destination` - Directory the files are written to
///
/// # Returns
/// * `Result<Vec<TemplateFile>>` - One entry per source, in input order
///
/// # Errors
/// * `Error::DuplicateDestination` if two sources share a basename
pub fn plan<P: AsRef<Path>>(sources: &[PathBuf], destination: P) -> Result<Vec<TemplateFile>> {
    let destination = destination.as_ref();
    let mut seen = HashSet::new();
    let mut files = Vec::with_capacity(sources.len());

    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = destination.join(name);
        if !seen.insert(target.clone()) {
            return Err(Error::DuplicateDestination { target });
        }
        files.push(TemplateFile { source: source.clone(), target, kind: FileKind::of(source) });
    }

    Ok(files)
}

/// Lists the regular files directly inside `dir`, sorted by path.
///
/// Symlinks are followed; links whose target is gone are ignored like directories.
///
/// # Arguments
/// * `dir` - Template directory to list
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Paths of the regular files, not recursing
pub async fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(Error::fs(dir))?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(Error::fs(dir))? {
        let path = entry.path();
        let is_file = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata.is_file(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(Error::fs(&path)(e)),
        };
        if is_file {
            files.push(path);
        } else {
            debug!("Ignoring non-file entry '{}'", path.display());
        }
    }

    files.sort();
    Ok(files)
}

/// Expands one template into one destination directory.
pub struct Processor<'a> {
    template: &'a Template,
    destination: &'a Path,
    force: bool,
}

impl<'a> Processor<'a> {
    /// `force` lets regular files overwrite existing destinations.
    pub fn new(template: &'a Template, destination: &'a Path, force: bool) -> Self {
        Self { template, destination, force }
    }

    /// Lists the template's files and their destinations.
    pub async fn plan(&self) -> Result<Vec<TemplateFile>> {
        let sources = list_files(&self.template.directory).await?;
        plan(&sources, self.destination)
    }

    /// Applies the conflict policy to one file and performs the resulting operation.
    pub async fn process(&self, file: &TemplateFile) -> Result<FileOutcome> {
        let exists = tokio::fs::try_exists(&file.target).await.map_err(Error::fs(&file.target))?;
        let target = file.target.display();

        let action = match resolve_conflict(file.kind, exists, self.force) {
            Resolution::Skip => {
                warn!("'{target}' already exists, skipping");
                FileAction::Skipped
            }
            Resolution::Overwrite => {
                warn!("'{target}' already exists, overwriting");
                copy_file(&file.source, &file.target).await?;
                FileAction::Overwritten
            }
            Resolution::Merge => {
                warn!("'{target}' already exists, merging");
                let template = read_manifest(&file.source).await?;
                let existing = read_manifest(&file.target).await?;
                write_manifest(&file.target, &merge(&existing, &template)).await?;
                FileAction::Merged
            }
            Resolution::Create => match file.kind {
                FileKind::Regular => {
                    copy_file(&file.source, &file.target).await?;
                    FileAction::Copied
                }
                FileKind::Manifest => {
                    let template = read_manifest(&file.source).await?;
                    write_manifest(&file.target, &strip_hooks(&template)).await?;
                    FileAction::Written
                }
            },
        };

        info!("{action}: '{target}'");
        Ok(FileOutcome { source: file.source.clone(), target: file.target.clone(), action })
    }

    /// Processes every file concurrently and waits for all of them to settle.
    ///
    /// # Returns
    /// * `Result<Vec<FileOutcome>>` - One outcome per template file
    ///
    /// # Errors
    /// Returns the first failure in file order once every operation has
    /// finished. Files written by the other operations stay on disk.
    pub async fn expand(&self) -> Result<Vec<FileOutcome>> {
        let files = self.plan().await?;
        debug!(
            "Expanding {} file(s) from '{}' into '{}'",
            files.len(),
            self.template.directory.display(),
            self.destination.display()
        );

        let results = join_all(files.iter().map(|file| self.process(file))).await;

        let mut outcomes = Vec::with_capacity(results.len());
        let mut first_error = None;
        for result in results {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => debug!("Additional expansion failure: {e}"),
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(outcomes),
        }
    }
}

async fn copy_file(source: &Path, target: &Path) -> Result<()> {
    tokio::fs::copy(source, target).await.map(|_| ()).map_err(Error::fs(target))
}
