use std::path::PathBuf;

use log::{debug, error};
use setup_node_backend::{
    AuthConfigurator, BackendError, CacheRestorer, CacheSupport, DistributionFactory,
    EnvironmentReporter, InputSource, LogSink, VersionFileParser,
};

use crate::arch::resolve_arch;
use crate::context::{RunContext, RunOutcome};
use crate::diagnostics::emit_matchers;
use crate::dispatch::{build_request, dispatch};
use crate::keys::{input, state};
use crate::version::resolve_version;

/// The services a setup run delegates to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub inputs: &'a dyn InputSource,
    pub distributions: &'a dyn DistributionFactory,
    pub version_files: &'a dyn VersionFileParser,
    pub environment: &'a dyn EnvironmentReporter,
    pub auth: &'a dyn AuthConfigurator,
    pub cache_support: &'a dyn CacheSupport,
    pub cache: &'a dyn CacheRestorer,
    pub sink: &'a dyn LogSink,
}

pub struct SetupOrchestrator<'a> {
    services: Collaborators<'a>,
    workspace: Option<PathBuf>,
    host_arch: String,
    install_dir: PathBuf,
}

impl<'a> SetupOrchestrator<'a> {
    pub fn new(
        services: Collaborators<'a>,
        host_arch: impl Into<String>,
        install_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            services,
            workspace: None,
            host_arch: host_arch.into(),
            install_dir: install_dir.into(),
        }
    }

    #[must_use]
    pub fn with_workspace(mut self, workspace: Option<PathBuf>) -> Self {
        self.workspace = workspace;
        self
    }

    /// Run every applicable step. The first error stops the run and is
    /// reported once through the sink; completed steps are not undone.
    pub async fn run(&self, context: &mut RunContext<'_>) -> RunOutcome {
        match self.execute(context).await {
            Ok(()) => {
                debug!("Setup finished");
                RunOutcome::Succeeded
            }
            Err(err) => {
                let message = err.to_string();
                error!("Setup failed: {message}");
                self.services.sink.error(&message);
                RunOutcome::Failed { message }
            }
        }
    }

    async fn execute(&self, context: &mut RunContext<'_>) -> Result<(), BackendError> {
        let services = self.services;

        let version = resolve_version(
            services.inputs,
            self.workspace.as_deref(),
            services.version_files,
            services.sink,
        )?;
        let arch = resolve_arch(
            &services.inputs.get_input(input::ARCHITECTURE),
            &version,
            &self.host_arch,
            services.sink,
        );

        if version.is_empty() {
            debug!("No node version requested, skipping installation");
        } else {
            let request = build_request(services.inputs, version, arch);
            dispatch(services.distributions, request).await?;
        }

        services.environment.report(services.sink).await?;

        let registry_url = services.inputs.get_input(input::REGISTRY_URL);
        if !registry_url.is_empty() {
            let always_auth = services.inputs.get_input(input::ALWAYS_AUTH);
            services.auth.configure(&registry_url, &always_auth)?;
        }

        let cache = services.inputs.get_input(input::CACHE);
        if !cache.is_empty() && services.cache_support.is_available() {
            context.save_once(state::CACHE_PACKAGE_MANAGER, &cache)?;
            let dependency_path = services.inputs.get_input(input::CACHE_DEPENDENCY_PATH);
            let hint = (!dependency_path.is_empty()).then_some(dependency_path.as_str());
            services.cache.restore(&cache, hint).await?;
        }

        emit_matchers(services.sink, &self.install_dir);
        Ok(())
    }
}
