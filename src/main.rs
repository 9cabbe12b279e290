use std::process::ExitCode;

fn main() -> ExitCode {
    match bloatware_remover_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(trace_id = %err.trace_id, code = %err.code, "{}", err.error);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
