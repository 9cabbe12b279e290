use tracing::{debug, warn};

use crate::app::state::AppState;

/// Marker `adb pair` prints when pairing did not go through.
const PAIR_FAILURE_MARKER: &str = "failed";

/// Pairs with a device in wireless-debugging pairing mode.
///
/// Success is the absence of `"failed"` (case-sensitive) in the tool's output;
/// any blank input short-circuits to `false` without running anything.
pub fn pair_device(state: &AppState, ip: &str, port: &str, code: &str, trace_id: &str) -> bool {
    if [ip, port, code].iter().any(|value| value.trim().is_empty()) {
        return false;
    }
    debug!(trace_id = %trace_id, address = %format!("{ip}:{port}"), "pairing device");
    let command = state.adb.pair(ip, port, code);
    let paired = match state.executor.execute(&command, trace_id) {
        Ok(output) => !output.combined().contains(PAIR_FAILURE_MARKER),
        Err(err) => {
            warn!(trace_id = %trace_id, error = %err, "adb pair could not run");
            false
        }
    };
    debug!(trace_id = %trace_id, address = %format!("{ip}:{port}"), paired, "pairing finished");
    paired
}
