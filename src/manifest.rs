//! Package manifest handling.
//! Parses `package.json` files, strips the reserved hook block and merges a
//! template manifest into one that already exists at the destination.

use crate::constants::{DEPENDENCY_KEYS, HOOK_KEY};
use crate::error::{Error, Result};
use log::debug;
use serde_json::{Map, Value};
use std::path::Path;

/// Top-level manifest object. Key order is preserved from the source file.
pub type Manifest = Map<String, Value>;

/// Parses manifest content read from `path`.
///
/// The document must be a JSON object, and any dependency map it carries must
/// itself be an object.
///
/// # Arguments
/// * `path` - File the content came from, used in error messages
/// * `content` - Raw JSON text
///
/// # Returns
/// * `Result<Manifest>` - The top-level object
///
/// # Errors
/// * `Error::ManifestParseError` if the JSON is malformed or has the wrong shape
pub fn parse_manifest(path: &Path, content: &str) -> Result<Manifest> {
    let invalid = |reason: String| Error::ManifestParseError { path: path.to_path_buf(), reason };

    let value: Value = serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;
    let Value::Object(manifest) = value else {
        return Err(invalid("expected a JSON object".to_string()));
    };

    for key in DEPENDENCY_KEYS {
        if let Some(deps) = manifest.get(key) {
            if !deps.is_object() {
                return Err(invalid(format!("'{key}' must be an object")));
            }
        }
    }

    Ok(manifest)
}

/// Loads the manifest at `path`, returning an empty one if the file is absent.
///
/// Used during template discovery, which happens once before any run starts.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_manifest(path, &content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No manifest at '{}'", path.display());
            Ok(Manifest::new())
        }
        Err(e) => Err(Error::fs(path)(e)),
    }
}

/// Reads and parses the manifest at `path`. Nothing is cached between reads.
pub async fn read_manifest(path: &Path) -> Result<Manifest> {
    let content = tokio::fs::read_to_string(path).await.map_err(Error::fs(path))?;
    parse_manifest(path, &content)
}

/// Returns `manifest` without the reserved hook block.
pub fn strip_hooks(manifest: &Manifest) -> Manifest {
    let mut stripped = manifest.clone();
    stripped.retain(|key, _| key != HOOK_KEY);
    stripped
}

/// Merges a template manifest into an existing one.
///
/// Top-level fields of `existing` win over `template` on collision. The
/// dependency maps are merged key by key with the same precedence, so entries
/// contributed only by the template are added and pinned versions already in
/// `existing` are kept. The hook block is always dropped.
///
/// # Arguments
/// * `existing` - Manifest already present at the destination
/// * `template` - Manifest shipped with the template
///
/// # Returns
/// * `Manifest` - Merged manifest; merging it again with `template` changes nothing
pub fn merge(existing: &Manifest, template: &Manifest) -> Manifest {
    let mut result = template.clone();
    for (key, value) in existing {
        result.insert(key.clone(), value.clone());
    }

    for key in DEPENDENCY_KEYS {
        let theirs = template.get(key).and_then(Value::as_object);
        let ours = existing.get(key).and_then(Value::as_object);
        if theirs.is_none() && ours.is_none() {
            continue;
        }

        let mut deps = theirs.cloned().unwrap_or_default();
        if let Some(ours) = ours {
            for (name, version) in ours {
                deps.insert(name.clone(), version.clone());
            }
        }
        result.insert(key.to_string(), Value::Object(deps));
    }

    result.retain(|key, _| key != HOOK_KEY);
    result
}

/// Serializes a manifest as two-space indented JSON with a trailing newline.
pub fn to_pretty_json(manifest: &Manifest) -> Result<String> {
    let mut content = serde_json::to_string_pretty(manifest).map_err(|e| Error::IoError(e.into()))?;
    content.push('\n');
    Ok(content)
}

/// Overwrites `path` with the serialized manifest.
pub async fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let content = to_pretty_json(manifest)?;
    tokio::fs::write(path, content).await.map_err(Error::fs(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(value: Value) -> Manifest {
        match value {
            Value::Object(map) => map,
            _ => panic!("test manifest must be an object"),
        }
    }

    #[test]
    fn test_existing_dependency_wins() {
        let existing = manifest(json!({"dependencies": {"lodash": "^3.0.0"}}));
        let template = manifest(json!({"dependencies": {"lodash": "^4.0.0", "chalk": "^2.0.0"}}));

        let merged = merge(&existing, &template);

        assert_eq!(merged["dependencies"], json!({"lodash": "^3.0.0", "chalk": "^2.0.0"}));
    }

    #[test]
    fn test_existing_only_dependencies_are_kept() {
        let existing = manifest(json!({"devDependencies": {"jest": "^29.0.0"}}));
        let template = manifest(json!({"devDependencies": {"eslint": "^8.0.0"}}));

        let merged = merge(&existing, &template);

        assert_eq!(merged["devDependencies"], json!({"eslint": "^8.0.0", "jest": "^29.0.0"}));
    }

    #[test]
    fn test_existing_scalars_win() {
        let existing = manifest(json!({"name": "mine", "private": true}));
        let template = manifest(json!({"name": "template", "license": "MIT"}));

        let merged = merge(&existing, &template);

        assert_eq!(Value::Object(merged), json!({"name": "mine", "license": "MIT", "private": true}));
    }

    #[test]
    fn test_hook_block_never_survives() {
        let hooks = json!({"scripts": {"install": "make"}});
        let existing = manifest(json!({"name": "a", "bake": hooks.clone()}));
        let template = manifest(json!({"bake": hooks}));

        assert!(!merge(&existing, &template).contains_key(HOOK_KEY));
        assert!(!merge(&Manifest::new(), &template).contains_key(HOOK_KEY));
        assert!(!strip_hooks(&template).contains_key(HOOK_KEY));
    }

    #[test]
    fn test_absent_dependency_maps_are_not_invented() {
        let merged = merge(&manifest(json!({"name": "a"})), &manifest(json!({"version": "1.0.0"})));
        assert!(!merged.contains_key("dependencies"));
        assert!(!merged.contains_key("devDependencies"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let existing = manifest(json!({
            "name": "app",
            "dependencies": {"lodash": "^3.0.0"},
            "scripts": {"test": "jest"}
        }));
        let template = manifest(json!({
            "dependencies": {"lodash": "^4.0.0", "chalk": "^2.0.0"},
            "devDependencies": {"jest": "^29.0.0"},
            "scripts": {"build": "tsc"},
            "bake": {"scripts": {"install": "npm install"}}
        }));

        let once = merge(&existing, &template);
        let twice = merge(&once, &template);

        assert_eq!(once, twice);
        assert_eq!(to_pretty_json(&once).unwrap(), to_pretty_json(&twice).unwrap());
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        let path = Path::new("package.json");
        assert!(matches!(parse_manifest(path, "[1, 2]"), Err(Error::ManifestParseError { .. })));
        assert!(matches!(parse_manifest(path, "{"), Err(Error::ManifestParseError { .. })));
        assert!(matches!(
            parse_manifest(path, r#"{"dependencies": "lodash"}"#),
            Err(Error::ManifestParseError { .. })
        ));
    }

    #[test]
    fn test_pretty_json_uses_two_spaces() {
        let content = to_pretty_json(&manifest(json!({"name": "app"}))).unwrap();
        assert_eq!(content, "{\n  \"name\": \"app\"\n}\n");
    }
}
