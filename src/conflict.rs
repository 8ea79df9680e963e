//! Per-file conflict policy.
//! Decides what happens to a template file when its destination may already exist.

use crate::constants::MANIFEST_FILE;
use std::path::Path;

/// Kind of a top-level template file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// The package manifest, merged into an existing one.
    Manifest,
    /// Any other file, copied byte for byte.
    Regular,
}

impl FileKind {
    /// Classifies a file by its basename; only an exact `package.json` is a manifest.
    pub fn of<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().file_name() {
            Some(name) if name == MANIFEST_FILE => FileKind::Manifest,
            _ => FileKind::Regular,
        }
    }
}

/// Action chosen for a single destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Destination is absent; write it.
    Create,
    /// Destination exists and is left untouched.
    Skip,
    /// Destination exists and is replaced.
    Overwrite,
    /// Destination manifest exists and receives the template's fields.
    Merge,
}

/// Applies the conflict policy.
///
/// Absent destinations are always created. An existing manifest is always
/// merged, whatever `force` says. An existing regular file is skipped unless
/// `force` is set, in which case it is overwritten.
pub fn resolve_conflict(kind: FileKind, destination_exists: bool, force: bool) -> Resolution {
    match (kind, destination_exists) {
        (_, false) => Resolution::Create,
        (FileKind::Manifest, true) => Resolution::Merge,
        (FileKind::Regular, true) if force => Resolution::Overwrite,
        (FileKind::Regular, true) => Resolution::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind() {
        assert_eq!(FileKind::of("/tpl/package.json"), FileKind::Manifest);
        assert_eq!(FileKind::of("package.json"), FileKind::Manifest);
        assert_eq!(FileKind::of("/tpl/package.json.bak"), FileKind::Regular);
        assert_eq!(FileKind::of("/tpl/Package.json"), FileKind::Regular);
        assert_eq!(FileKind::of("/tpl/Makefile"), FileKind::Regular);
    }

    #[test]
    fn test_absent_destination_is_created() {
        for force in [false, true] {
            assert_eq!(resolve_conflict(FileKind::Regular, false, force), Resolution::Create);
            assert_eq!(resolve_conflict(FileKind::Manifest, false, force), Resolution::Create);
        }
    }

    #[test]
    fn test_existing_regular_file() {
        assert_eq!(resolve_conflict(FileKind::Regular, true, false), Resolution::Skip);
        assert_eq!(resolve_conflict(FileKind::Regular, true, true), Resolution::Overwrite);
    }

    #[test]
    fn test_existing_manifest_always_merges() {
        assert_eq!(resolve_conflict(FileKind::Manifest, true, false), Resolution::Merge);
        assert_eq!(resolve_conflict(FileKind::Manifest, true, true), Resolution::Merge);
    }
}
