//! Input, state and output names shared with `action.yml` and the post-job
//! step.

pub mod input {
    pub const NODE_VERSION: &str = "node-version";
    pub const NODE_VERSION_FILE: &str = "node-version-file";
    pub const ARCHITECTURE: &str = "architecture";
    pub const CACHE: &str = "cache";
    pub const CACHE_DEPENDENCY_PATH: &str = "cache-dependency-path";
    pub const TOKEN: &str = "token";
    pub const STABLE: &str = "stable";
    pub const CHECK_LATEST: &str = "check-latest";
    pub const REGISTRY_URL: &str = "registry-url";
    pub const ALWAYS_AUTH: &str = "always-auth";
    pub const SCOPE: &str = "scope";
}

pub mod state {
    pub const CACHE_PACKAGE_MANAGER: &str = "SETUP_NODE_CACHE_PACKAGE_MANAGER";
    pub const CACHE_PRIMARY_KEY: &str = "CACHE_KEY";
    pub const CACHE_PATHS: &str = "CACHE_PATHS";
}

pub mod output {
    pub const NODE_VERSION: &str = "node-version";
    pub const CACHE_HIT: &str = "cache-hit";
}
