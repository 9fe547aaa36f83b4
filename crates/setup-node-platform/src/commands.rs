use std::ffi::OsStr;
use std::path::Path;

use log::{debug, trace};
use setup_node_backend::BackendError;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

pub trait HideWindow {
    fn hide_window(&mut self) -> &mut Self;
}

impl HideWindow for tokio::process::Command {
    #[cfg(windows)]
    fn hide_window(&mut self) -> &mut Self {
        self.creation_flags(CREATE_NO_WINDOW)
    }

    #[cfg(not(windows))]
    fn hide_window(&mut self) -> &mut Self {
        self
    }
}

/// Run a tool found through `PATH` to completion and return its trimmed
/// stdout.
///
/// `search_path` replaces `PATH` for the child when given, so tools activated
/// earlier in the run are found without mutating the process environment.
///
/// # Errors
/// Returns [`BackendError::NotFound`] when the executable does not exist,
/// [`BackendError::CommandFailed`] on a non-zero exit status, and an IO error
/// for any other spawn failure.
pub async fn capture_stdout<S>(
    tool: &'static str,
    args: &[S],
    search_path: Option<&OsStr>,
) -> Result<String, BackendError>
where
    S: AsRef<OsStr>,
{
    capture_stdout_from(tool, Path::new(tool), args, search_path).await
}

/// Like [`capture_stdout`], but runs an already resolved `program` and only
/// uses `tool` for diagnostics.
///
/// # Errors
/// Same as [`capture_stdout`].
pub async fn capture_stdout_from<S>(
    tool: &'static str,
    program: &Path,
    args: &[S],
    search_path: Option<&OsStr>,
) -> Result<String, BackendError>
where
    S: AsRef<OsStr>,
{
    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args);
    if let Some(path) = search_path {
        cmd.env("PATH", path);
    }
    cmd.hide_window();

    let rendered = render(tool, args);
    debug!("Running {rendered} ({})", program.display());

    let output = cmd.output().await.map_err(|error| {
        if error.kind() == std::io::ErrorKind::NotFound {
            BackendError::NotFound { tool }
        } else {
            BackendError::from(error)
        }
    })?;

    trace!("{tool} stdout: {}", String::from_utf8_lossy(&output.stdout));

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(BackendError::command_failed(rendered, stderr))
    }
}

fn render<S: AsRef<OsStr>>(tool: &str, args: &[S]) -> String {
    let mut rendered = tool.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.as_ref().to_string_lossy());
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::{HideWindow, capture_stdout, render};
    use setup_node_backend::BackendError;

    #[test]
    fn tokio_command_hide_window_is_chainable() {
        let mut cmd = tokio::process::Command::new("echo");
        let before = &mut cmd as *mut tokio::process::Command;
        let after = cmd.hide_window() as *mut tokio::process::Command;
        assert_eq!(before, after);
    }

    #[test]
    fn render_joins_tool_and_arguments() {
        assert_eq!(
            render("npm", &["config", "get", "cache"]),
            "npm config get cache"
        );
    }

    #[tokio::test]
    async fn missing_tool_maps_to_not_found() {
        let result = capture_stdout(
            "setup-node-definitely-missing-tool",
            &["--version"],
            None,
        )
        .await;

        assert_eq!(
            result,
            Err(BackendError::NotFound {
                tool: "setup-node-definitely-missing-tool"
            })
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captured_stdout_is_trimmed() {
        let output = capture_stdout("echo", &["  v20.0.0  "], None)
            .await
            .expect("echo should run");

        assert_eq!(output, "v20.0.0");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_maps_to_command_failed() {
        let result = capture_stdout("false", &[] as &[&str], None).await;

        assert!(matches!(
            result,
            Err(BackendError::CommandFailed { ref command, .. }) if command == "false"
        ));
    }
}
