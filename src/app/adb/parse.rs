use std::sync::OnceLock;

use regex::Regex;

use crate::app::models::{DeviceRecord, UNKNOWN_MODEL};

const PACKAGE_PREFIX: &str = "package:";

fn device_line_regex() -> &'static Regex {
    static DEVICE_LINE: OnceLock<Regex> = OnceLock::new();
    DEVICE_LINE.get_or_init(|| {
        Regex::new(r"^(\S+)\s+(\S+)(?:\s+.*model:(\S+))?").expect("device line regex should compile")
    })
}

/// Parses `adb devices -l`. The first line is always treated as the header;
/// lines that do not start with `<serial> <state>` are skipped.
pub fn parse_adb_devices(output: &str) -> Vec<DeviceRecord> {
    let regex = device_line_regex();
    output
        .trim()
        .split('\n')
        .skip(1)
        .filter_map(|line| {
            let caps = regex.captures(line)?;
            Some(DeviceRecord {
                serial_number: caps[1].to_string(),
                state: caps[2].to_string(),
                model: caps
                    .get(3)
                    .map(|model| model.as_str().to_string())
                    .unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
                is_selected: false,
            })
        })
        .collect()
}

/// Flags the record whose serial equals `selected`.
pub fn mark_selected(devices: &mut [DeviceRecord], selected: Option<&str>) {
    let Some(selected) = selected else {
        return;
    };
    for device in devices.iter_mut() {
        if device.serial_number == selected {
            device.is_selected = true;
        }
    }
}

/// Parses `pm list packages`: blank lines dropped, one leading `package:` removed.
pub fn parse_package_list(output: &str) -> Vec<String> {
    output
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.replacen(PACKAGE_PREFIX, "", 1))
        .collect()
}
