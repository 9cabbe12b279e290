use tracing::{debug, info};

use crate::app::adb::parse::{mark_selected, parse_adb_devices};
use crate::app::adb::runner::execute_or_empty;
use crate::app::error::AppError;
use crate::app::models::{DeviceRecord, OperationStatus};
use crate::app::state::AppState;

pub fn list_devices(state: &AppState, trace_id: &str) -> Result<Vec<DeviceRecord>, AppError> {
    let output = execute_or_empty(state.executor.as_ref(), &state.adb.list_devices(), trace_id);
    let mut devices = if output.is_empty() {
        Vec::new()
    } else {
        parse_adb_devices(&output)
    };
    let selected = get_selected_device(state, trace_id)?;
    mark_selected(&mut devices, selected.as_deref());
    debug!(
        trace_id = %trace_id,
        device_count = devices.len(),
        selected = ?selected,
        "listed devices"
    );
    Ok(devices)
}

pub fn listing_status(devices: &[DeviceRecord]) -> OperationStatus {
    if devices.is_empty() {
        OperationStatus::NoConnectedDevice
    } else {
        OperationStatus::Success
    }
}

pub fn get_selected_device(state: &AppState, trace_id: &str) -> Result<Option<String>, AppError> {
    state.store.get(trace_id)
}

pub fn set_selected_device(
    state: &AppState,
    serial_number: &str,
    trace_id: &str,
) -> Result<bool, AppError> {
    state.store.set(serial_number, trace_id)?;
    info!(trace_id = %trace_id, serial = %serial_number, "selected device");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::app::adb::commands::AdbCommands;
    use crate::app::testing::{state_with, BrokenStore, FakeExecutor};

    const DEVICES_OUTPUT: &str = "List of devices attached\n\
        serial123 device product:sdk_gphone_x86 model:Pixel_3a device:generic_x86\n\
        serial456 device product:sdk_gphone_x86 model:Nexus_5 device:generic_x86\n\
        serial789 unauthorized\n";

    #[test]
    fn marks_the_selected_device() {
        let executor = Arc::new(FakeExecutor::answering(DEVICES_OUTPUT));
        let state = state_with(executor.clone(), Some("serial456"));

        let devices = list_devices(&state, "trace").expect("list");

        assert_eq!(devices.len(), 3);
        let selected: Vec<_> = devices.iter().filter(|device| device.is_selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].serial_number, "serial456");
        assert_eq!(devices[2].model, "Unknown");
        assert_eq!(executor.issued(), vec!["adb devices -l".to_string()]);
    }

    #[test]
    fn empty_output_lists_nothing() {
        let state = state_with(Arc::new(FakeExecutor::answering("")), None);
        let devices = list_devices(&state, "trace").expect("list");
        assert!(devices.is_empty());
        assert_eq!(listing_status(&devices), OperationStatus::NoConnectedDevice);
    }

    #[test]
    fn header_only_lists_nothing() {
        let state = state_with(
            Arc::new(FakeExecutor::answering("List of devices attached\n")),
            Some("serial123"),
        );
        assert!(list_devices(&state, "trace").expect("list").is_empty());
    }

    #[test]
    fn executor_failure_lists_nothing() {
        let state = state_with(Arc::new(FakeExecutor::failing()), None);
        assert!(list_devices(&state, "trace").expect("list").is_empty());
    }

    #[test]
    fn selection_round_trips_and_replaces() {
        let state = state_with(Arc::new(FakeExecutor::default()), None);
        assert_eq!(get_selected_device(&state, "trace").expect("get"), None);
        assert!(set_selected_device(&state, "serial123", "trace").expect("set"));
        assert!(set_selected_device(&state, "serial456", "trace").expect("set"));
        assert_eq!(
            get_selected_device(&state, "trace").expect("get").as_deref(),
            Some("serial456")
        );
    }

    #[test]
    fn store_failure_propagates() {
        let state = AppState::new(
            AdbCommands::new("adb"),
            Arc::new(FakeExecutor::answering(DEVICES_OUTPUT)),
            Arc::new(BrokenStore),
        );
        let err = list_devices(&state, "trace-store").unwrap_err();
        assert_eq!(err.code, "ERR_STORAGE");
        assert_eq!(err.trace_id, "trace-store");
        assert!(set_selected_device(&state, "serial123", "trace").is_err());
    }
}
