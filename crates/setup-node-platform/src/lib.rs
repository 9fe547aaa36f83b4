mod arch;
mod commands;
mod environment;
mod inputs;
mod reporter;
mod workflow;

pub use arch::{host_arch, host_platform, node_arch, node_platform};
pub use commands::{HideWindow, capture_stdout, capture_stdout_from};
pub use environment::RunnerEnvironment;
pub use inputs::{EnvInputs, MapInputs};
pub use reporter::WorkflowLog;
pub use workflow::WorkflowFiles;
