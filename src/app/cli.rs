use std::path::PathBuf;

use clap::Parser;

use crate::app::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "bloatware_remover")]
#[command(
    about = "Bloatware Remover - remove unwanted apps from Android devices over ADB",
    long_about = "Starts a local web server. After starting, open the printed URL in your browser \
                  to pair a device, pick it, and disable or uninstall its packages."
)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to $BLOATWARE_REMOVER_CONFIG_PATH or ~/.bloatware_remover_config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the adb executable
    #[arg(long)]
    pub adb_path: Option<String>,

    /// Start even if `adb version` does not succeed
    #[arg(long)]
    pub skip_adb_check: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    pub write_config: bool,
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(host) = self.host.as_ref().filter(|host| !host.trim().is_empty()) {
            config.server.host = host.trim().to_string();
        }
        if let Some(port) = self.port.filter(|port| *port != 0) {
            config.server.port = port;
        }
        if let Some(adb_path) = &self.adb_path {
            config.adb.command_path = adb_path.clone();
        }
    }
}
