use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, trace};
use tokio::process::Command;

use setup_node_backend::{
    BackendError, DistributionKind, NodeDistribution, NodeVersion, SetupRequest,
};
use setup_node_platform::{HideWindow, WorkflowFiles};

use crate::version::{
    install_args, matching_installed, numeric_spec, parse_installed_versions, using_selector,
};

const PRINT_BIN_DIR: &str = "require('path').dirname(process.execPath)";

/// Installs one Node.js runtime with `fnm` and puts it on PATH for the rest
/// of the job.
pub struct FnmDistribution {
    fnm: PathBuf,
    fnm_dir: Option<PathBuf>,
    request: SetupRequest,
    files: Arc<WorkflowFiles>,
}

impl FnmDistribution {
    #[must_use]
    pub fn new(fnm: PathBuf, request: SetupRequest, files: Arc<WorkflowFiles>) -> Self {
        Self {
            fnm,
            fnm_dir: None,
            request,
            files,
        }
    }

    #[must_use]
    pub fn with_fnm_dir(mut self, dir: PathBuf) -> Self {
        self.fnm_dir = Some(dir);
        self
    }

    fn build_command(&self, args: &[&str]) -> Command {
        debug!("Building fnm command: {} {}", self.fnm.display(), args.join(" "));

        let mut cmd = Command::new(&self.fnm);
        cmd.args(args);

        if let Some(dir) = &self.fnm_dir {
            debug!("Setting FNM_DIR={}", dir.display());
            cmd.env("FNM_DIR", dir);
        }

        let kind = self.kind();
        if kind != DistributionKind::Official {
            debug!("Setting FNM_NODE_DIST_MIRROR={}", kind.mirror_url());
            cmd.env("FNM_NODE_DIST_MIRROR", kind.mirror_url());
        }

        cmd.env("FNM_ARCH", &self.request.arch);
        cmd.hide_window();
        cmd
    }

    async fn execute(&self, args: &[&str]) -> Result<String, BackendError> {
        info!("Executing fnm command: {}", args.join(" "));

        let output = self.build_command(args).output().await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                BackendError::NotFound { tool: "fnm" }
            } else {
                BackendError::from(err)
            }
        })?;

        debug!("fnm command exit status: {:?}", output.status);
        trace!("fnm stdout: {}", String::from_utf8_lossy(&output.stdout));

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("fnm command failed: args={args:?}, stderr='{stderr}'");
            Err(BackendError::command_failed(
                format!("fnm {}", args.join(" ")),
                stderr,
            ))
        }
    }

    async fn list_installed(&self) -> Result<Vec<NodeVersion>, BackendError> {
        let output = self.execute(&["list"]).await?;
        Ok(parse_installed_versions(&output))
    }

    /// Install the requested version spec unless a matching version is
    /// already present and `check-latest` is off. Returns the `--using`
    /// selector of the version to activate.
    ///
    /// Plain numeric specs are matched against `fnm list` after the install.
    /// Aliases, codenames and prerelease builds are left for fnm to resolve.
    async fn install(&self) -> Result<String, BackendError> {
        let spec = &self.request.version_spec;
        let numeric = numeric_spec(spec).is_some();

        if numeric && !self.request.check_latest {
            let installed = self.list_installed().await?;
            if let Some(version) = matching_installed(spec, &installed) {
                info!("Found {version} in the fnm cache, skipping download");
                return Ok(version.to_string());
            }
        }

        let args = install_args(spec);
        let mut command = vec!["install"];
        command.extend(args.iter().map(String::as_str));
        self.execute(&command).await?;

        if !numeric {
            return Ok(using_selector(spec));
        }

        let installed = self.list_installed().await?;
        matching_installed(spec, &installed)
            .map(|version| version.to_string())
            .ok_or_else(|| {
                BackendError::install_failed(
                    "resolve",
                    format!("fnm did not list a version matching {spec} after installing it"),
                )
            })
    }

    async fn bin_dir(&self, using: &str) -> Result<PathBuf, BackendError> {
        let output = self
            .execute(&["exec", "--using", using, "node", "-p", PRINT_BIN_DIR])
            .await?;
        let dir = output.trim();
        if dir.is_empty() {
            return Err(BackendError::install_failed(
                "activate",
                format!("node {using} did not report its install location"),
            ));
        }
        Ok(PathBuf::from(dir))
    }
}

#[async_trait]
impl NodeDistribution for FnmDistribution {
    fn kind(&self) -> DistributionKind {
        self.request.distribution()
    }

    fn request(&self) -> &SetupRequest {
        &self.request
    }

    async fn setup_node(&self) -> Result<(), BackendError> {
        if self.request.auth.is_some() {
            debug!("fnm downloads anonymously, ignoring the token input");
        }
        if !self.request.stable {
            debug!("fnm resolves release lines itself, ignoring stable=false");
        }

        let version = self.install().await?;
        let bin_dir = self.bin_dir(&version).await?;
        info!("Activating Node.js {version} from {}", bin_dir.display());
        self.files.add_path(&bin_dir)
    }
}
