use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use sha2::{Digest, Sha256};

use setup_node_backend::{BackendError, CacheRestorer, CacheSupport, StateStore};
use setup_node_core::keys::{output, state};
use setup_node_platform::{RunnerEnvironment, WorkflowFiles, capture_stdout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        }
    }

    /// Lock files looked up in the workspace root when no
    /// `cache-dependency-path` is given, in priority order.
    #[must_use]
    pub const fn lockfile_patterns(self) -> &'static [&'static str] {
        match self {
            Self::Npm => &["package-lock.json", "npm-shrinkwrap.json", "yarn.lock"],
            Self::Yarn => &["yarn.lock"],
            Self::Pnpm => &["pnpm-lock.yaml"],
        }
    }

    /// Directory the package manager downloads packages into.
    ///
    /// # Errors
    /// Returns the underlying command error when the tool is missing or
    /// fails.
    pub async fn cache_dir(self, search_path: &std::ffi::OsStr) -> Result<String, BackendError> {
        let tool = self.as_str();
        let path = Some(search_path);
        match self {
            Self::Npm => capture_stdout("npm", &["config", "get", "cache"], path).await,
            Self::Pnpm => capture_stdout("pnpm", &["store", "path", "--silent"], path).await,
            Self::Yarn => {
                let version = capture_stdout("yarn", &["--version"], path).await?;
                debug!("Detected {tool} {version}");
                if version.starts_with("1.") {
                    capture_stdout("yarn", &["cache", "dir"], path).await
                } else {
                    capture_stdout("yarn", &["config", "get", "cacheFolder"], path).await
                }
            }
        }
    }
}

impl FromStr for PackageManager {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "npm" => Ok(Self::Npm),
            "yarn" => Ok(Self::Yarn),
            "pnpm" => Ok(Self::Pnpm),
            other => Err(BackendError::UnsupportedPackageManager {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SHA-256 over the SHA-256 digests of each file, in the given order.
///
/// # Errors
/// Returns an IO error if any file cannot be read.
pub fn hash_lockfiles(files: &[PathBuf]) -> Result<String, BackendError> {
    let mut combined = Sha256::new();
    for file in files {
        let contents = std::fs::read(file)?;
        combined.update(Sha256::digest(&contents));
    }
    Ok(format!("{:x}", combined.finalize()))
}

/// Computes the dependency cache key and directories for the post-job step.
/// Archive transfer itself happens outside this tool.
pub struct PackageManagerCache {
    workspace: PathBuf,
    platform: String,
    arch: String,
    files: Arc<WorkflowFiles>,
}

impl PackageManagerCache {
    #[must_use]
    pub fn new(
        runner: &RunnerEnvironment,
        platform: impl Into<String>,
        arch: impl Into<String>,
        files: Arc<WorkflowFiles>,
    ) -> Self {
        let workspace = runner
            .workspace
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            workspace,
            platform: platform.into(),
            arch: arch.into(),
            files,
        }
    }

    /// Lock files named by `cache-dependency-path` (one per line), or the
    /// first default pattern present in the workspace root.
    fn lockfiles(
        &self,
        manager: PackageManager,
        dependency_path: Option<&str>,
    ) -> Result<Vec<PathBuf>, BackendError> {
        let listed: Option<Vec<&str>> = dependency_path.map(|paths| {
            paths
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect()
        });

        let mut found: Vec<PathBuf> = match &listed {
            Some(paths) => paths
                .iter()
                .map(|line| self.workspace.join(line))
                .filter(|path| path.is_file())
                .collect(),
            None => manager
                .lockfile_patterns()
                .iter()
                .map(|pattern| self.workspace.join(pattern))
                .find(|path| path.is_file())
                .into_iter()
                .collect(),
        };

        if found.is_empty() {
            let patterns = listed.map_or_else(
                || manager.lockfile_patterns().join(", "),
                |paths| paths.join(", "),
            );
            return Err(BackendError::LockfileNotFound {
                workspace: self.workspace.display().to_string(),
                patterns,
            });
        }

        found.sort();
        found.dedup();
        Ok(found)
    }

    #[must_use]
    pub fn primary_key(&self, manager: PackageManager, hash: &str) -> String {
        format!(
            "node-cache-{}-{}-{manager}-{hash}",
            self.platform, self.arch
        )
    }
}

#[async_trait]
impl CacheRestorer for PackageManagerCache {
    async fn restore(
        &self,
        package_manager: &str,
        dependency_path: Option<&str>,
    ) -> Result<(), BackendError> {
        let manager: PackageManager = package_manager.parse()?;
        let lockfiles = self.lockfiles(manager, dependency_path)?;
        let key = self.primary_key(manager, &hash_lockfiles(&lockfiles)?);

        let cache_dir = manager.cache_dir(&self.files.search_path()).await?;
        let paths = serde_json::to_string(&[cache_dir.as_str()])
            .map_err(|error| BackendError::file_command("GITHUB_STATE", error))?;

        debug!("{manager} cache paths: {paths}");
        self.files.save_state(state::CACHE_PRIMARY_KEY, &key)?;
        self.files.save_state(state::CACHE_PATHS, &paths)?;
        self.files.set_output(output::CACHE_HIT, "false")?;
        info!("{manager} cache key is {key}");
        Ok(())
    }
}

/// Whether the runner exposes a cache service.
#[derive(Debug, Clone, Copy)]
pub struct ActionsCacheSupport {
    available: bool,
}

impl ActionsCacheSupport {
    #[must_use]
    pub fn new(runner: &RunnerEnvironment) -> Self {
        let unavailable = unavailable_reason(runner);
        if let Some(reason) = unavailable {
            debug!("Package manager caching is skipped: {reason}");
        }
        Self {
            available: unavailable.is_none(),
        }
    }
}

fn unavailable_reason(runner: &RunnerEnvironment) -> Option<&'static str> {
    if runner.cache_service_url.is_some() {
        None
    } else if runner.is_ghes() {
        Some("the cache service is only available on GHES 3.5 or later")
    } else {
        Some("the runner did not expose a cache service")
    }
}

impl CacheSupport for ActionsCacheSupport {
    fn is_available(&self) -> bool {
        self.available
    }
}
