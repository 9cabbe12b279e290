use std::fmt;
use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::app::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// A host command: program, argument vector and an optional stdin payload.
///
/// Arguments are passed to the host program directly, never through a host shell.
/// `adb shell` still joins its trailing arguments into one command line for the
/// device's `sh`, so values forwarded there are not escaped on the device side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommand {
    pub program: String,
    pub args: Vec<String>,
    pub input: Option<String>,
}

impl HostCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            input: None,
        }
    }

    /// Completes immediately with empty output.
    pub fn noop() -> Self {
        Self {
            program: String::new(),
            args: Vec::new(),
            input: None,
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn is_noop(&self) -> bool {
        self.program.is_empty()
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_noop() {
            return f.write_str(":");
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Seam between the registries and the process table.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, command: &HostCommand, trace_id: &str) -> Result<CommandOutput, AppError>;
}

/// Spawns real processes.
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor {
    timeout: Option<Duration>,
}

impl SystemExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn from_timeout_secs(secs: u64) -> Self {
        Self::new((secs > 0).then(|| Duration::from_secs(secs)))
    }
}

impl CommandExecutor for SystemExecutor {
    fn execute(&self, command: &HostCommand, trace_id: &str) -> Result<CommandOutput, AppError> {
        if command.is_noop() {
            return Ok(CommandOutput::default());
        }
        debug!(trace_id = %trace_id, command = %command, "executing command");
        run_command_with_timeout(
            &command.program,
            &command.args,
            command.input.as_deref(),
            self.timeout,
            trace_id,
        )
    }
}

/// Runs `command` and returns its stdout, or an empty string when it could not run.
pub fn execute_or_empty(
    executor: &dyn CommandExecutor,
    command: &HostCommand,
    trace_id: &str,
) -> String {
    match executor.execute(command, trace_id) {
        Ok(output) => output.stdout,
        Err(err) => {
            warn!(trace_id = %trace_id, command = %command, error = %err, "command failed");
            String::new()
        }
    }
}

pub fn run_command_with_timeout(
    program: &str,
    args: &[String],
    input: Option<&str>,
    timeout: Option<Duration>,
    trace_id: &str,
) -> Result<CommandOutput, AppError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| AppError::system(format!("Failed to spawn {program}: {err}"), trace_id))?;

    // Both pipes are drained on their own threads so a chatty child cannot fill a pipe
    // buffer and stall while we wait on it.
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| AppError::system("Failed to capture stdout", trace_id))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| AppError::system("Failed to capture stderr", trace_id))?;
    let stdout_handle = drain_pipe(stdout);
    let stderr_handle = drain_pipe(stderr);

    if let Some(payload) = input {
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(payload.as_bytes()) {
                warn!(trace_id = %trace_id, error = %err, "failed to write command stdin");
            }
        }
    }

    let start = Instant::now();
    let exit_code = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status.code(),
            Ok(None) => {
                if timeout.is_some_and(|limit| start.elapsed() > limit) {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stdout_handle.join();
                    let _ = stderr_handle.join();
                    return Err(AppError::system("Command timed out", trace_id));
                }
                std::thread::sleep(Duration::from_millis(20));
            }
            Err(err) => {
                let _ = stdout_handle.join();
                let _ = stderr_handle.join();
                return Err(AppError::system(
                    format!("Failed to poll command: {err}"),
                    trace_id,
                ));
            }
        }
    };

    let stdout_bytes = stdout_handle.join().unwrap_or_default();
    let stderr_bytes = stderr_handle.join().unwrap_or_default();

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&stdout_bytes).to_string(),
        stderr: String::from_utf8_lossy(&stderr_bytes).to_string(),
        exit_code,
    })
}

fn drain_pipe<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buffer = Vec::<u8>::new();
        let mut temp = [0u8; 4096];
        loop {
            match reader.read(&mut temp) {
                Ok(0) => break,
                Ok(count) => buffer.extend_from_slice(&temp[..count]),
                Err(_) => break,
            }
        }
        buffer
    })
}
