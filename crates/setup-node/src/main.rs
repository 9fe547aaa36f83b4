mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use setup_node_backend::InputSource;
use setup_node_core::keys::input;
use setup_node_core::{Collaborators, NodeVersionFile, RunContext, SetupOrchestrator, ToolVersions};
use setup_node_fnm::FnmProvider;
use setup_node_npm::{ActionsCacheSupport, NpmrcAuth, PackageManagerCache};
use setup_node_platform::{
    EnvInputs, RunnerEnvironment, WorkflowFiles, WorkflowLog, host_arch, host_platform,
};

const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let runner = RunnerEnvironment::from_env();
    logging::init_logging(runner.debug, runner.temp_dir.as_deref(), MAX_LOG_SIZE);

    let inputs = EnvInputs;
    let sink = WorkflowLog::stdout();
    let files = Arc::new(WorkflowFiles::from_env());

    let distributions = FnmProvider::detect(Arc::clone(&files)).await;
    let environment = ToolVersions::new(Arc::clone(&files));
    let auth =
        NpmrcAuth::new(&runner, Arc::clone(&files)).with_scope(inputs.get_input(input::SCOPE));
    let cache_support = ActionsCacheSupport::new(&runner);
    let cache = PackageManagerCache::new(&runner, host_platform(), host_arch(), Arc::clone(&files));

    let services = Collaborators {
        inputs: &inputs,
        distributions: &distributions,
        version_files: &NodeVersionFile,
        environment: &environment,
        auth: &auth,
        cache_support: &cache_support,
        cache: &cache,
        sink: &sink,
    };

    let orchestrator = SetupOrchestrator::new(services, host_arch(), install_dir())
        .with_workspace(runner.workspace.clone());
    let mut context = RunContext::new(files.as_ref());

    orchestrator.run(&mut context).await.exit_code()
}

fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
