//! Common constants used throughout the bake application.

/// Basename that marks a template file as a manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Reserved manifest key holding hook configuration.
pub const HOOK_KEY: &str = "bake";

/// Template used when `init` is called without a name.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Dependency maps merged key by key.
pub const DEPENDENCY_KEYS: [&str; 2] = ["dependencies", "devDependencies"];

/// Directory name used under the user's config and home directories.
pub const APP_DIR: &str = "bake";

/// Templates directory name under each override location.
pub const TEMPLATES_DIR: &str = "templates";

/// Environment variable overriding the bundled templates directory.
pub const BUNDLED_TEMPLATES_ENV: &str = "BAKE_BUNDLED_TEMPLATES";
