use std::sync::Arc;

use crate::app::adb::commands::AdbCommands;
use crate::app::adb::runner::{CommandExecutor, SystemExecutor};
use crate::app::config::AppConfig;
use crate::app::error::AppError;
use crate::app::store::{SelectedDeviceStore, SqliteDeviceStore};

/// Everything a request needs: how to build adb commands, how to run them,
/// and where the selected device lives.
#[derive(Clone)]
pub struct AppState {
    pub adb: AdbCommands,
    pub executor: Arc<dyn CommandExecutor>,
    pub store: Arc<dyn SelectedDeviceStore>,
}

impl AppState {
    pub fn new(
        adb: AdbCommands,
        executor: Arc<dyn CommandExecutor>,
        store: Arc<dyn SelectedDeviceStore>,
    ) -> Self {
        Self {
            adb,
            executor,
            store,
        }
    }

    /// Real processes and the SQLite store described by `config`.
    pub fn from_config(config: &AppConfig, adb_program: String) -> Result<Self, AppError> {
        let store = SqliteDeviceStore::open(&config.storage.database_path)?;
        Ok(Self::new(
            AdbCommands::new(adb_program),
            Arc::new(SystemExecutor::from_timeout_secs(
                config.adb.command_timeout_secs,
            )),
            Arc::new(store),
        ))
    }
}
