use tracing::{debug, info, warn};

use crate::app::adb::parse::parse_package_list;
use crate::app::adb::runner::{execute_or_empty, HostCommand};
use crate::app::devices::get_selected_device;
use crate::app::error::AppError;
use crate::app::models::{OperationStatus, PackageAction, PackageOutcome};
use crate::app::state::AppState;

pub const ACTION_FIELD_PREFIX: &str = "action_";

/// Substring a successful `pm disable-user` / `pm uninstall` prints.
const ACTION_SUCCESS_MARKER: &str = "Success";

pub fn list_packages(state: &AppState, trace_id: &str) -> Result<PackageOutcome, AppError> {
    let Some(serial) = get_selected_device(state, trace_id)? else {
        return Ok(PackageOutcome::empty(OperationStatus::NoDeviceSelected));
    };
    let output = execute_or_empty(
        state.executor.as_ref(),
        &state.adb.list_packages(&serial),
        trace_id,
    );
    if output.is_empty() {
        warn!(trace_id = %trace_id, serial = %serial, "no packages found");
        return Ok(PackageOutcome::empty(OperationStatus::NoPackagesFound));
    }
    let packages = parse_package_list(&output);
    debug!(trace_id = %trace_id, serial = %serial, package_count = packages.len(), "listed packages");
    Ok(PackageOutcome::new(OperationStatus::Success, packages))
}

/// Collapses repeated form keys into one entry each: the last value wins,
/// the entry keeps the position where the key first appeared.
fn collapse_fields(form: &[(String, String)]) -> Vec<(&str, &str)> {
    let mut fields: Vec<(&str, &str)> = Vec::with_capacity(form.len());
    for (key, value) in form {
        match fields.iter_mut().find(|(seen, _)| *seen == key.as_str()) {
            Some(field) => field.1 = value.as_str(),
            None => fields.push((key.as_str(), value.as_str())),
        }
    }
    fields
}

/// Picks the `action_<package>` fields that carry a non-empty action, in form order.
pub fn requested_actions(form: &[(String, String)]) -> Vec<(String, PackageAction)> {
    collapse_fields(form)
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .filter_map(|(key, value)| {
            key.strip_prefix(ACTION_FIELD_PREFIX)
                .map(|package| (package.to_string(), PackageAction::from_form_value(value)))
        })
        .collect()
}

/// Applies every requested action one after another on the selected device.
///
/// The outcome lists the packages whose action output lacked `"Success"`,
/// in form order.
pub fn apply_actions(
    state: &AppState,
    form: &[(String, String)],
    trace_id: &str,
) -> Result<PackageOutcome, AppError> {
    let Some(serial) = get_selected_device(state, trace_id)? else {
        return Ok(PackageOutcome::empty(OperationStatus::NoDeviceSelected));
    };

    let mut failed: Vec<String> = Vec::new();
    for (package, action) in requested_actions(form) {
        info!(trace_id = %trace_id, serial = %serial, package = %package, action = ?action, "applying package action");
        let command = match action {
            PackageAction::Disable => state.adb.disable_user(&serial, &package),
            PackageAction::Uninstall => state.adb.uninstall(&serial, &package),
            PackageAction::Unrecognized => HostCommand::noop(),
        };
        let output = execute_or_empty(state.executor.as_ref(), &command, trace_id);
        debug!(trace_id = %trace_id, package = %package, stdout = %output.trim(), "package action output");
        if !output.contains(ACTION_SUCCESS_MARKER) {
            failed.push(package);
        }
    }

    let status = if failed.is_empty() {
        OperationStatus::Success
    } else {
        OperationStatus::FailedOperation
    };
    Ok(PackageOutcome::new(status, failed))
}
