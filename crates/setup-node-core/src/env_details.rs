use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use setup_node_backend::{BackendError, EnvironmentReporter, LogSink};
use setup_node_platform::{WorkflowFiles, capture_stdout_from};

use crate::keys::output;

const TOOLS: [&str; 3] = ["node", "npm", "yarn"];

/// Prints the versions of the Node.js toolchain visible to later steps and
/// publishes the `node-version` output.
pub struct ToolVersions {
    files: Arc<WorkflowFiles>,
}

impl ToolVersions {
    #[must_use]
    pub fn new(files: Arc<WorkflowFiles>) -> Self {
        Self { files }
    }
}

#[async_trait]
impl EnvironmentReporter for ToolVersions {
    async fn report(&self, sink: &dyn LogSink) -> Result<(), BackendError> {
        let search_path = self.files.search_path();

        sink.start_group("Environment details");
        let mut node_version = String::new();
        for tool in TOOLS {
            let version = tool_version(tool, &search_path).await;
            sink.info(&format!("{tool}: {version}"));
            if tool == "node" {
                node_version = version;
            }
        }
        sink.end_group();

        self.files.set_output(output::NODE_VERSION, &node_version)
    }
}

/// `<tool> --version`, or an empty string when the tool is missing or fails.
async fn tool_version(tool: &'static str, search_path: &OsStr) -> String {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let Ok(program) = which::which_in(tool, Some(search_path), cwd) else {
        debug!("{tool} is not on PATH");
        return String::new();
    };

    match capture_stdout_from(tool, &program, &["--version"], Some(search_path)).await {
        Ok(version) => version,
        Err(error) => {
            debug!("{tool} --version failed: {error}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use setup_node_backend::EnvironmentReporter;
    use setup_node_platform::{WorkflowFiles, WorkflowLog};

    use super::{ToolVersions, tool_version};

    #[tokio::test]
    async fn missing_tool_reports_empty_version() {
        let version = tool_version("node", std::ffi::OsStr::new("")).await;

        assert_eq!(version, "");
    }

    #[tokio::test]
    async fn report_prints_every_tool_inside_a_group() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let files = Arc::new(WorkflowFiles::in_dir(temp_dir.path()));
        let log = WorkflowLog::buffered();

        ToolVersions::new(Arc::clone(&files))
            .report(&log)
            .await
            .expect("report succeeds");

        let captured = log.captured();
        let lines: Vec<&str> = captured.lines().collect();
        assert_eq!(lines.first(), Some(&"::group::Environment details"));
        assert!(lines[1].starts_with("node: "));
        assert!(lines[2].starts_with("npm: "));
        assert!(lines[3].starts_with("yarn: "));
        assert_eq!(lines.last(), Some(&"::endgroup::"));

        let outputs = std::fs::read_to_string(temp_dir.path().join("output"))
            .expect("node-version output should be written");
        assert!(outputs.starts_with("node-version<<"));
    }
}
