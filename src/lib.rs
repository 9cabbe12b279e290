pub mod app;

use clap::Parser;
use tracing::{info, warn};
use uuid::Uuid;

use app::adb::locator::{probe_adb, resolve_adb_program, validate_adb_program};
use app::cli::Cli;
use app::config::{config_path, load_config_from_path, save_config_to_path};
use app::error::AppError;
use app::logging::init_logging;
use app::state::AppState;
use app::web::serve;

pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let path = cli.config.clone().unwrap_or_else(config_path);
    let mut config = load_config_from_path(&path)?;
    cli.apply_overrides(&mut config);

    if cli.write_config {
        save_config_to_path(&config, &path)?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    init_logging(&config.logging.log_level);
    let trace_id = Uuid::new_v4().to_string();

    let adb_program = resolve_adb_program(&config.adb.command_path);
    validate_adb_program(&adb_program)
        .map_err(|message| AppError::validation(message, &trace_id))?;
    let state = AppState::from_config(&config, adb_program)
        .map_err(|err| err.with_trace_id(&trace_id))?;

    if cli.skip_adb_check {
        warn!(trace_id = %trace_id, "skipping adb availability check");
    } else {
        probe_adb(state.executor.as_ref(), &state.adb, &trace_id)?;
    }

    info!(trace_id = %trace_id, config = %path.display(), "Starting Bloatware Remover...");
    info!(url = %config.browse_url(), "Open your browser and go to the printed URL");
    info!("Press Ctrl+C to stop the application");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::system(format!("Failed to start runtime: {err}"), &trace_id))?;
    runtime.block_on(serve(state, &config.bind_address()))
}
