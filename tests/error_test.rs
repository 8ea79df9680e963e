use std::io;
use std::path::PathBuf;

use bake::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::TemplateNotFound { name: "node".to_string() };
    assert_eq!(err.to_string(), "Template 'node' not found.");

    let err = Error::ScriptExecutionError {
        script: "preinstall".to_string(),
        reason: "exited with status 2".to_string(),
    };
    assert_eq!(err.to_string(), "Script 'preinstall' failed: exited with status 2.");

    let err = Error::ManifestParseError {
        path: PathBuf::from("package.json"),
        reason: "expected a JSON object".to_string(),
    };
    assert_eq!(err.to_string(), "Failed to parse manifest 'package.json': expected a JSON object.");
}

#[test]
fn test_fs_error_keeps_path() {
    let err = Error::fs("out/Makefile")(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));

    match err {
        Error::FilesystemError { path, source } => {
            assert_eq!(path, PathBuf::from("out/Makefile"));
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        _ => panic!("Expected FilesystemError variant"),
    }
}
