use std::path::Path;

use tracing::info;

use crate::app::adb::commands::AdbCommands;
use crate::app::adb::runner::CommandExecutor;
use crate::app::error::AppError;

pub const DEFAULT_ADB_PROGRAM: &str = "adb";

pub fn normalize_command_path(value: &str) -> String {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|candidate| candidate.strip_suffix(quote))
        {
            return inner.trim().to_string();
        }
    }
    trimmed.to_string()
}

pub fn resolve_adb_program(config_command_path: &str) -> String {
    let normalized = normalize_command_path(config_command_path);
    if normalized.is_empty() {
        DEFAULT_ADB_PROGRAM.to_string()
    } else {
        normalized
    }
}

pub fn validate_adb_program(program: &str) -> Result<(), String> {
    if program.trim().is_empty() {
        return Err("ADB command is empty".to_string());
    }
    if program == DEFAULT_ADB_PROGRAM {
        return Ok(());
    }
    let path = Path::new(program);
    if path.is_dir() {
        return Err("ADB path must point to an executable file".to_string());
    }
    if !path.exists() {
        return Err("ADB executable not found at the configured path".to_string());
    }
    Ok(())
}

/// Runs `adb version` and returns its first output line.
pub fn probe_adb(
    executor: &dyn CommandExecutor,
    adb: &AdbCommands,
    trace_id: &str,
) -> Result<String, AppError> {
    let output = executor.execute(&adb.version(), trace_id).map_err(|err| {
        AppError::dependency(
            format!(
                "ADB not found ({}). Install the Android SDK Platform Tools: \
                 https://developer.android.com/studio/releases/platform-tools",
                err.error
            ),
            trace_id,
        )
    })?;
    if output.exit_code != Some(0) {
        return Err(AppError::dependency(
            format!("ADB found but not working properly: {}", output.stderr.trim()),
            trace_id,
        ));
    }
    let version = output
        .stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string();
    info!(trace_id = %trace_id, version = %version, "ADB found and working");
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::adb::runner::{CommandOutput, HostCommand};

    struct Scripted(Result<CommandOutput, AppError>);

    impl CommandExecutor for Scripted {
        fn execute(&self, _command: &HostCommand, _trace_id: &str) -> Result<CommandOutput, AppError> {
            self.0.clone()
        }
    }

    #[test]
    fn strips_wrapping_quotes() {
        assert_eq!(
            normalize_command_path("  \"/opt/android/platform-tools/adb\"  "),
            "/opt/android/platform-tools/adb"
        );
        assert_eq!(
            normalize_command_path("  '/opt/android/platform-tools/adb'  "),
            "/opt/android/platform-tools/adb"
        );
    }

    #[test]
    fn resolves_empty_to_default_adb() {
        assert_eq!(resolve_adb_program(""), "adb");
        assert_eq!(resolve_adb_program("   "), "adb");
    }

    #[test]
    fn validates_nonexistent_path() {
        let err = validate_adb_program("/this/path/should/not/exist/adb").unwrap_err();
        assert!(err.to_lowercase().contains("not found"));
        let dir = tempfile::tempdir().expect("tempdir");
        let err = validate_adb_program(&dir.path().to_string_lossy()).unwrap_err();
        assert!(err.contains("executable file"));
    }

    #[test]
    fn probe_reports_first_version_line() {
        let executor = Scripted(Ok(CommandOutput {
            stdout: "Android Debug Bridge version 1.0.41\nVersion 35.0.2\n".to_string(),
            stderr: String::new(),
            exit_code: Some(0),
        }));
        let version = probe_adb(&executor, &AdbCommands::new("adb"), "trace-probe").expect("probe");
        assert_eq!(version, "Android Debug Bridge version 1.0.41");
    }

    #[test]
    fn probe_rejects_non_zero_exit() {
        let executor = Scripted(Ok(CommandOutput {
            stdout: String::new(),
            stderr: "broken".to_string(),
            exit_code: Some(1),
        }));
        let err = probe_adb(&executor, &AdbCommands::new("adb"), "trace-probe").unwrap_err();
        assert_eq!(err.code, "ERR_DEPENDENCY");
        assert!(err.error.contains("not working"));
    }

    #[test]
    fn probe_maps_spawn_failure_to_dependency_error() {
        let executor = Scripted(Err(AppError::system("Failed to spawn adb", "")));
        let err = probe_adb(&executor, &AdbCommands::new("adb"), "trace-probe").unwrap_err();
        assert_eq!(err.code, "ERR_DEPENDENCY");
        assert!(err.error.contains("platform-tools"));
    }
}
