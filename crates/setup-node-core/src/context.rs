use std::collections::HashSet;
use std::process::ExitCode;

use log::debug;
use setup_node_backend::{BackendError, StateStore};

/// Per-run handoff to the post-job step. Each key is written at most once
/// and never read back.
pub struct RunContext<'a> {
    store: &'a dyn StateStore,
    written: HashSet<String>,
}

impl<'a> RunContext<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StateStore) -> Self {
        Self {
            store,
            written: HashSet::new(),
        }
    }

    /// Persist `value` under `key` unless the key was already written during
    /// this run. Returns whether a write happened.
    ///
    /// # Errors
    /// Returns the store's error when persisting fails.
    pub fn save_once(&mut self, key: &str, value: &str) -> Result<bool, BackendError> {
        if self.written.contains(key) {
            debug!("State {key} already saved for this run, ignoring new value");
            return Ok(false);
        }

        self.store.save_state(key, value)?;
        self.written.insert(key.to_string());
        Ok(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    Failed { message: String },
}

impl RunOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Succeeded => ExitCode::SUCCESS,
            Self::Failed { .. } => ExitCode::FAILURE,
        }
    }
}
