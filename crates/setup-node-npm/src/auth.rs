use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};
use setup_node_backend::{AuthConfigurator, BackendError};
use setup_node_platform::{RunnerEnvironment, WorkflowFiles};

pub const PLACEHOLDER_TOKEN: &str = "XXXXX-XXXXX-XXXXX-XXXXX";

const GITHUB_PACKAGES_HOST: &str = "npm.pkg.github.com";

/// A user-level `.npmrc` and its current contents.
pub struct NpmrcFile {
    pub path: PathBuf,
    pub content: String,
}

/// Proposed contents for an `.npmrc`, kept next to the original so callers
/// can inspect the change before writing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmrcEdit {
    pub original: String,
    pub modified: String,
}

impl NpmrcEdit {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.original != self.modified
    }
}

impl NpmrcFile {
    /// # Errors
    /// Returns an IO error if an existing file cannot be read.
    pub fn load(path: PathBuf) -> Result<Self, BackendError> {
        let content = if path.exists() {
            fs::read_to_string(&path)?
        } else {
            String::new()
        };

        Ok(Self { path, content })
    }

    /// Replace any `<scope>registry` entry with one pointing at
    /// `registry_url` and append the matching auth token reference. Lines
    /// identical to the appended ones are dropped first, so configuring the
    /// same registry twice leaves the file unchanged.
    ///
    /// `registry_url` must already end with `/`; `scope` is either empty or
    /// of the form `@name:`.
    #[must_use]
    pub fn set_registry(&self, registry_url: &str, scope: &str, always_auth: &str) -> NpmrcEdit {
        let registry_key = format!("{scope}registry");
        let without_scheme = registry_url
            .split_once("//")
            .filter(|(scheme, _)| scheme.is_empty() || scheme.ends_with(':'))
            .map_or(registry_url, |(_, rest)| rest);
        let token_line = format!("//{without_scheme}:_authToken=${{NODE_AUTH_TOKEN}}");
        let always_auth_line = format!("always-auth={always_auth}");

        let mut modified = String::new();
        for line in self.content.lines() {
            if line.to_ascii_lowercase().starts_with(&registry_key)
                || line == token_line
                || line == always_auth_line
            {
                debug!("Dropping existing npmrc entry {line:?}");
                continue;
            }
            modified.push_str(line);
            modified.push('\n');
        }

        let _ = writeln!(modified, "{token_line}");
        let _ = writeln!(modified, "{registry_key}={registry_url}");
        modified.push_str(&always_auth_line);

        NpmrcEdit {
            original: self.content.clone(),
            modified,
        }
    }

    /// # Errors
    /// Returns an IO error if the file or its parent directory cannot be
    /// written.
    pub fn apply_edit(&mut self, edit: &NpmrcEdit) -> Result<(), BackendError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, &edit.modified)?;
        self.content.clone_from(&edit.modified);
        Ok(())
    }
}

/// Points npm at a registry through a job-scoped `.npmrc`. The token itself
/// is never written; the file references `${NODE_AUTH_TOKEN}`.
pub struct NpmrcAuth {
    npmrc_dir: PathBuf,
    scope: String,
    repository_owner: Option<String>,
    existing_token: Option<String>,
    files: Arc<WorkflowFiles>,
}

impl NpmrcAuth {
    #[must_use]
    pub fn new(runner: &RunnerEnvironment, files: Arc<WorkflowFiles>) -> Self {
        let npmrc_dir = runner
            .temp_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            npmrc_dir,
            scope: String::new(),
            repository_owner: runner.repository_owner.clone(),
            existing_token: runner.node_auth_token.clone(),
            files,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    #[must_use]
    pub fn npmrc_path(&self) -> PathBuf {
        self.npmrc_dir.join(".npmrc")
    }

    /// `@scope:` for the configured scope, falling back to the repository
    /// owner for GitHub Packages. Empty when unscoped.
    fn scope_prefix(&self, registry_url: &str) -> String {
        let scope = match self.scope.trim() {
            "" if registry_url.contains(GITHUB_PACKAGES_HOST) => {
                self.repository_owner.clone().unwrap_or_default()
            }
            scope => scope.to_string(),
        };

        if scope.is_empty() {
            return scope;
        }

        let scope = scope.to_lowercase();
        if scope.starts_with('@') {
            format!("{scope}:")
        } else {
            format!("@{scope}:")
        }
    }
}

impl AuthConfigurator for NpmrcAuth {
    fn configure(&self, registry_url: &str, always_auth: &str) -> Result<(), BackendError> {
        let registry_url = if registry_url.ends_with('/') {
            registry_url.to_string()
        } else {
            format!("{registry_url}/")
        };
        let scope = self.scope_prefix(&registry_url);

        let mut npmrc = NpmrcFile::load(self.npmrc_path())?;
        let edit = npmrc.set_registry(&registry_url, &scope, always_auth);
        if edit.has_changes() {
            npmrc.apply_edit(&edit)?;
            info!("Configured {registry_url} in {}", npmrc.path.display());
        } else {
            debug!("{} already points at {registry_url}", npmrc.path.display());
        }

        self.files
            .export_variable("NPM_CONFIG_USERCONFIG", &npmrc.path.to_string_lossy())?;
        self.files.export_variable(
            "NODE_AUTH_TOKEN",
            self.existing_token.as_deref().unwrap_or(PLACEHOLDER_TOKEN),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use setup_node_platform::{RunnerEnvironment, WorkflowFiles};

    use super::{NpmrcAuth, NpmrcFile};

    fn npmrc(content: &str) -> NpmrcFile {
        NpmrcFile {
            path: PathBuf::from("/tmp/.npmrc"),
            content: content.to_string(),
        }
    }

    fn auth(owner: Option<&str>) -> NpmrcAuth {
        let runner = RunnerEnvironment {
            temp_dir: Some(PathBuf::from("/tmp/runner")),
            repository_owner: owner.map(str::to_string),
            ..RunnerEnvironment::default()
        };
        NpmrcAuth::new(&runner, Arc::new(WorkflowFiles::default()))
    }

    #[test]
    fn unscoped_registry_appends_three_entries() {
        let edit = npmrc("").set_registry("https://registry.npmjs.org/", "", "false");

        assert_eq!(
            edit.modified,
            "//registry.npmjs.org/:_authToken=${NODE_AUTH_TOKEN}\n\
             registry=https://registry.npmjs.org/\n\
             always-auth=false"
        );
        assert!(edit.has_changes());
    }

    #[test]
    fn configuring_the_same_registry_again_is_a_no_op() {
        let first =
            npmrc("fund=false\n").set_registry("https://npm.pkg.github.com/", "@octo:", "true");

        let again =
            npmrc(&first.modified).set_registry("https://npm.pkg.github.com/", "@octo:", "true");

        assert!(first.has_changes());
        assert!(!again.has_changes());
        assert_eq!(again.modified, first.modified);
    }

    #[test]
    fn existing_registry_for_same_scope_is_replaced() {
        let existing = "@octo:registry=https://old.example/\n\
                        fund=false\n\
                        registry=https://keep.example/\n";

        let edit = npmrc(existing).set_registry("https://npm.pkg.github.com/", "@octo:", "");

        assert!(!edit.modified.contains("old.example"));
        assert!(edit.modified.contains("registry=https://keep.example/"));
        assert!(edit.modified.starts_with("fund=false\n"));
        assert!(edit.modified.contains("@octo:registry=https://npm.pkg.github.com/\n"));
        assert!(edit.modified.ends_with("always-auth="));
    }

    #[test]
    fn github_packages_defaults_scope_to_owner() {
        assert_eq!(
            auth(Some("OctoOrg")).scope_prefix("https://npm.pkg.github.com/"),
            "@octoorg:"
        );
    }

    #[test]
    fn explicit_scope_is_prefixed_and_lowercased() {
        let auth = auth(Some("ignored")).with_scope("MyScope");

        assert_eq!(auth.scope_prefix("https://registry.npmjs.org/"), "@myscope:");
        assert_eq!(
            auth.with_scope("@already").scope_prefix("https://registry.npmjs.org/"),
            "@already:"
        );
    }

    #[test]
    fn other_registries_stay_unscoped() {
        assert_eq!(auth(Some("octo")).scope_prefix("https://registry.npmjs.org/"), "");
    }

    #[test]
    fn npmrc_lives_in_runner_temp() {
        assert_eq!(auth(None).npmrc_path(), PathBuf::from("/tmp/runner/.npmrc"));
    }
}
