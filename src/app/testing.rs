use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::app::adb::commands::AdbCommands;
use crate::app::adb::runner::{CommandExecutor, CommandOutput, HostCommand};
use crate::app::error::AppError;
use crate::app::state::AppState;
use crate::app::store::{SelectedDeviceStore, SqliteDeviceStore};

/// Records every command and replays scripted results in order.
/// Once the script runs out it keeps answering with `fallback`.
#[derive(Default)]
pub struct FakeExecutor {
    issued: Mutex<Vec<HostCommand>>,
    script: Mutex<VecDeque<Result<CommandOutput, AppError>>>,
    fallback: String,
}

impl FakeExecutor {
    pub fn answering(stdout: &str) -> Self {
        Self {
            fallback: stdout.to_string(),
            ..Self::default()
        }
    }

    pub fn scripted<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let script = outputs
            .into_iter()
            .map(|stdout| Ok(stdout_only(stdout.into())))
            .collect();
        Self {
            script: Mutex::new(script),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        let executor = Self::default();
        executor
            .script
            .lock()
            .expect("script lock")
            .push_back(Err(AppError::system("Failed to spawn adb", "")));
        executor
    }

    pub fn issued(&self) -> Vec<String> {
        self.issued
            .lock()
            .expect("issued lock")
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn issued_commands(&self) -> Vec<HostCommand> {
        self.issued.lock().expect("issued lock").clone()
    }
}

impl CommandExecutor for FakeExecutor {
    fn execute(&self, command: &HostCommand, trace_id: &str) -> Result<CommandOutput, AppError> {
        self.issued.lock().expect("issued lock").push(command.clone());
        match self.script.lock().expect("script lock").pop_front() {
            Some(Ok(output)) => Ok(output),
            Some(Err(err)) => Err(err.with_trace_id(trace_id)),
            None => Ok(stdout_only(self.fallback.clone())),
        }
    }
}

/// Store whose every call fails.
pub struct BrokenStore;

impl SelectedDeviceStore for BrokenStore {
    fn get(&self, trace_id: &str) -> Result<Option<String>, AppError> {
        Err(AppError::storage("Device store unavailable", trace_id))
    }

    fn set(&self, _serial_number: &str, trace_id: &str) -> Result<(), AppError> {
        Err(AppError::storage("Device store unavailable", trace_id))
    }
}

fn stdout_only(stdout: String) -> CommandOutput {
    CommandOutput {
        stdout,
        stderr: String::new(),
        exit_code: Some(0),
    }
}

/// State over `executor` with an in-memory store, optionally pre-selecting `selected`.
pub fn state_with(executor: Arc<FakeExecutor>, selected: Option<&str>) -> AppState {
    let store = SqliteDeviceStore::open_in_memory().expect("in-memory store");
    if let Some(serial) = selected {
        store.set(serial, "test-setup").expect("preselect device");
    }
    AppState::new(AdbCommands::new("adb"), executor, Arc::new(store))
}
