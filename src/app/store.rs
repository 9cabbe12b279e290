use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::app::error::AppError;

/// Persistence for the single "currently selected device" value.
pub trait SelectedDeviceStore: Send + Sync {
    fn get(&self, trace_id: &str) -> Result<Option<String>, AppError>;

    /// Replaces any previous selection.
    fn set(&self, serial_number: &str, trace_id: &str) -> Result<(), AppError>;
}

/// Single-row SQLite table `current_device(serial_number TEXT)`.
pub struct SqliteDeviceStore {
    connection: Mutex<Connection>,
}

impl SqliteDeviceStore {
    /// Opens (or creates) the database at `path`; `:memory:` keeps it in process.
    pub fn open(path: &str) -> Result<Self, AppError> {
        let connection = if path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(Path::new(path))
        }
        .map_err(|err| AppError::storage(format!("Failed to open device store: {err}"), ""))?;
        Self::from_connection(connection)
    }

    pub fn open_in_memory() -> Result<Self, AppError> {
        Self::open(":memory:")
    }

    fn from_connection(connection: Connection) -> Result<Self, AppError> {
        // A selection never outlives the process that made it.
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS current_device (serial_number TEXT);
                 DELETE FROM current_device;",
            )
            .map_err(|err| AppError::storage(format!("Failed to initialize device store: {err}"), ""))?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self, trace_id: &str) -> Result<std::sync::MutexGuard<'_, Connection>, AppError> {
        self.connection
            .lock()
            .map_err(|_| AppError::storage("Device store locked", trace_id))
    }
}

impl SelectedDeviceStore for SqliteDeviceStore {
    fn get(&self, trace_id: &str) -> Result<Option<String>, AppError> {
        let connection = self.lock(trace_id)?;
        connection
            .query_row(
                "SELECT serial_number FROM current_device LIMIT 1",
                [],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()
            .map(Option::flatten)
            .map_err(|err| {
                AppError::storage(format!("Failed to read selected device: {err}"), trace_id)
            })
    }

    fn set(&self, serial_number: &str, trace_id: &str) -> Result<(), AppError> {
        let mut connection = self.lock(trace_id)?;
        let tx = connection.transaction().map_err(|err| {
            AppError::storage(format!("Failed to start selection transaction: {err}"), trace_id)
        })?;
        tx.execute("DELETE FROM current_device", [])
            .and_then(|_| {
                tx.execute(
                    "INSERT INTO current_device (serial_number) VALUES (?1)",
                    params![serial_number],
                )
            })
            .map_err(|err| {
                AppError::storage(format!("Failed to store selected device: {err}"), trace_id)
            })?;
        tx.commit().map_err(|err| {
            AppError::storage(format!("Failed to commit selected device: {err}"), trace_id)
        })
    }
}
