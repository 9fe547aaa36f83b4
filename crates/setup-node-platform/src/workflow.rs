use std::ffi::OsString;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use setup_node_backend::{BackendError, StateStore};

use crate::reporter::{escape_data, escape_property};

/// Runner file commands: outputs, saved state, exported variables and PATH
/// additions, each appended to the file the runner names in its environment.
///
/// When the runner does not name a file, the value is written as the
/// equivalent stdout workflow command (`::save-state`, `::set-output`,
/// `::set-env`, `::add-path`) instead.
pub struct WorkflowFiles {
    output: Option<PathBuf>,
    state: Option<PathBuf>,
    env: Option<PathBuf>,
    path: Option<PathBuf>,
    added_paths: Mutex<Vec<PathBuf>>,
    commands: Arc<Mutex<dyn Write + Send>>,
}

impl Default for WorkflowFiles {
    fn default() -> Self {
        Self::with_commands(Arc::new(Mutex::new(io::stdout())))
    }
}

impl fmt::Debug for WorkflowFiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowFiles")
            .field("output", &self.output)
            .field("state", &self.state)
            .field("env", &self.env)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
enum FileCommand {
    Output,
    State,
    Env,
    Path,
}

impl FileCommand {
    const fn variable(self) -> &'static str {
        match self {
            Self::Output => "GITHUB_OUTPUT",
            Self::State => "GITHUB_STATE",
            Self::Env => "GITHUB_ENV",
            Self::Path => "GITHUB_PATH",
        }
    }

    const fn stdout_command(self) -> &'static str {
        match self {
            Self::Output => "set-output",
            Self::State => "save-state",
            Self::Env => "set-env",
            Self::Path => "add-path",
        }
    }
}

impl WorkflowFiles {
    #[must_use]
    pub fn from_env() -> Self {
        let var = |command: FileCommand| {
            std::env::var_os(command.variable())
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        };

        Self {
            output: var(FileCommand::Output),
            state: var(FileCommand::State),
            env: var(FileCommand::Env),
            path: var(FileCommand::Path),
            ..Self::default()
        }
    }

    /// No file commands; every value goes to `commands` as a stdout
    /// workflow command.
    #[must_use]
    pub fn with_commands(commands: Arc<Mutex<dyn Write + Send>>) -> Self {
        Self {
            output: None,
            state: None,
            env: None,
            path: None,
            added_paths: Mutex::new(Vec::new()),
            commands,
        }
    }

    /// All four file commands written below `dir`, used by tests and local
    /// dry runs.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            output: Some(dir.join("output")),
            state: Some(dir.join("state")),
            env: Some(dir.join("env")),
            path: Some(dir.join("path")),
            ..Self::default()
        }
    }

    /// # Errors
    /// Returns an error if the output file cannot be appended to.
    pub fn set_output(&self, name: &str, value: &str) -> Result<(), BackendError> {
        self.append_key_value(FileCommand::Output, self.output.as_deref(), name, value)
    }

    /// # Errors
    /// Returns an error if the env file cannot be appended to.
    pub fn export_variable(&self, name: &str, value: &str) -> Result<(), BackendError> {
        self.append_key_value(FileCommand::Env, self.env.as_deref(), name, value)
    }

    /// Prepend `dir` to PATH for later steps and for tools spawned by this
    /// run.
    ///
    /// # Errors
    /// Returns an error if the path file cannot be appended to.
    pub fn add_path(&self, dir: &Path) -> Result<(), BackendError> {
        let line = dir.display().to_string();
        if let Some(file) = self.path.as_deref() {
            append(FileCommand::Path, file, &format!("{line}\n"))?;
        } else {
            debug!("GITHUB_PATH is not set, adding {line} with a workflow command");
            self.command(FileCommand::Path, &format!("::add-path::{}", escape_data(&line)))?;
        }

        self.added_paths
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(dir.to_path_buf());
        Ok(())
    }

    /// The PATH value child processes of this run should see.
    #[must_use]
    pub fn search_path(&self) -> OsString {
        let added = self
            .added_paths
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        let current = std::env::var_os("PATH").unwrap_or_default();

        let entries = added
            .into_iter()
            .rev()
            .chain(std::env::split_paths(&current));
        std::env::join_paths(entries).unwrap_or(current)
    }

    fn append_key_value(
        &self,
        command: FileCommand,
        file: Option<&Path>,
        name: &str,
        value: &str,
    ) -> Result<(), BackendError> {
        let Some(file) = file else {
            debug!("{} is not set, writing {name} with a workflow command", command.variable());
            return self.command(
                command,
                &format!(
                    "::{} name={}::{}",
                    command.stdout_command(),
                    escape_property(name),
                    escape_data(value)
                ),
            );
        };

        let delimiter = delimiter();
        if name.contains(&delimiter) || value.contains(&delimiter) {
            return Err(BackendError::file_command(
                command.variable(),
                format!("{name} contains the reserved delimiter"),
            ));
        }

        append(
            command,
            file,
            &format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"),
        )
    }

    fn command(&self, command: FileCommand, line: &str) -> Result<(), BackendError> {
        let mut writer = self
            .commands
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        writeln!(writer, "{line}")
            .and_then(|()| writer.flush())
            .map_err(|error| BackendError::file_command(command.variable(), error))
    }
}

impl StateStore for WorkflowFiles {
    fn save_state(&self, name: &str, value: &str) -> Result<(), BackendError> {
        self.append_key_value(FileCommand::State, self.state.as_deref(), name, value)
    }
}

fn delimiter() -> String {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    format!("ghadelimiter_{}_{nonce}", std::process::id())
}

fn append(command: FileCommand, file: &Path, contents: &str) -> Result<(), BackendError> {
    let mut handle = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .map_err(|error| BackendError::file_command(command.variable(), error))?;
    handle
        .write_all(contents.as_bytes())
        .map_err(|error| BackendError::file_command(command.variable(), error))
}
