use crate::app::adb::runner::HostCommand;

/// User id passed to `pm` so actions apply to the primary user without root.
const PRIMARY_USER: &str = "0";

/// Builds the `adb` invocations this application issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdbCommands {
    program: String,
}

impl AdbCommands {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn version(&self) -> HostCommand {
        HostCommand::new(&self.program, ["version"])
    }

    pub fn list_devices(&self) -> HostCommand {
        HostCommand::new(&self.program, ["devices", "-l"])
    }

    /// The pairing code is written to stdin, not passed on the command line.
    pub fn pair(&self, ip: &str, port: &str, code: &str) -> HostCommand {
        HostCommand::new(&self.program, ["pair".to_string(), format!("{ip}:{port}")])
            .with_input(format!("{code}\n"))
    }

    pub fn list_packages(&self, serial: &str) -> HostCommand {
        self.device_shell(serial, ["pm", "list", "packages"])
    }

    pub fn disable_user(&self, serial: &str, package: &str) -> HostCommand {
        self.device_shell(
            serial,
            ["pm", "disable-user", "--user", PRIMARY_USER, package],
        )
    }

    pub fn uninstall(&self, serial: &str, package: &str) -> HostCommand {
        self.device_shell(serial, ["pm", "uninstall", "--user", PRIMARY_USER, package])
    }

    fn device_shell<'a>(
        &self,
        serial: &str,
        shell_args: impl IntoIterator<Item = &'a str>,
    ) -> HostCommand {
        let mut args = vec!["-s".to_string(), serial.to_string(), "shell".to_string()];
        args.extend(shell_args.into_iter().map(str::to_string));
        HostCommand::new(&self.program, args)
    }
}
