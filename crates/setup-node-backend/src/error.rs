use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Unable to locate executable file: {tool}")]
    NotFound { tool: &'static str },

    #[error("Command `{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error(transparent)]
    ParseError(#[from] crate::types::VersionParseError),

    #[error("Installation failed during {phase}: {details}")]
    InstallFailed {
        phase: &'static str,
        details: String,
    },

    #[error("Environment variable {name} is not set")]
    MissingEnvironment { name: &'static str },

    #[error("IO error ({kind}): {message}")]
    IoError {
        kind: std::io::ErrorKind,
        message: String,
    },

    #[error("Caching for '{name}' is not supported")]
    UnsupportedPackageManager { name: String },

    #[error("Dependencies lock file is not found in {workspace}. Supported file patterns: {patterns}")]
    LockfileNotFound { workspace: String, patterns: String },

    #[error("Failed to write {target}: {details}")]
    FileCommand {
        target: &'static str,
        details: String,
    },
}

impl BackendError {
    pub fn install_failed(phase: &'static str, details: impl Into<String>) -> Self {
        Self::InstallFailed {
            phase,
            details: details.into(),
        }
    }

    pub fn command_failed(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    pub fn file_command<E>(target: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::FileCommand {
            target,
            details: error.to_string(),
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
