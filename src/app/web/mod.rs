pub mod pages;


use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::app::connection::pair_device;
use crate::app::devices::{list_devices, listing_status, set_selected_device};
use crate::app::error::AppError;
use crate::app::models::{OperationStatus, StatusMessage};
use crate::app::packages::{apply_actions, list_packages};
use crate::app::state::AppState;
use pages::{render_connect, render_devices, render_packages, render_status};

const TRACE_HEADER: &str = "x-request-id";

pub const NO_DEVICES_MESSAGE: &str =
    "No connected devices found. Please refresh or connect a device.";
pub const NO_PACKAGES_MESSAGE: &str = "No packages found on the device.";
pub const ACTIONS_APPLIED_MESSAGE: &str = "Successfully applied actions.";
pub const ACTIONS_FAILED_PREFIX: &str = "Failed to perform actions on: ";
pub const SELECT_FAILED_MESSAGE: &str = "Failed to select device.";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(devices_page))
        .route("/connect", get(connect_page))
        .route("/connect-to-device", post(connect_to_device))
        .route("/packages", get(packages_page))
        .route("/apply-actions", post(apply_package_actions))
        .route("/select-device", post(select_device))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn serve(state: AppState, bind_address: &str) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .map_err(|err| AppError::system(format!("Failed to bind {bind_address}: {err}"), ""))?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::system(format!("Server error: {err}"), ""))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down Bloatware Remover...");
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(trace_id = %self.trace_id, code = %self.code, error = %self.error, "request failed");
        let status = StatusMessage::failure(format!(
            "Something went wrong while talking to the device (trace {}).",
            self.trace_id
        ));
        (StatusCode::INTERNAL_SERVER_ERROR, Html(render_status(&status))).into_response()
    }
}

fn resolve_trace_id(headers: &HeaderMap) -> String {
    headers
        .get(TRACE_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Runs blocking device work off the async executor.
async fn run_blocking<T, F>(state: &AppState, trace_id: &str, work: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&AppState, &str) -> T + Send + 'static,
{
    let state = state.clone();
    let trace = trace_id.to_string();
    tokio::task::spawn_blocking(move || work(&state, &trace))
        .await
        .map_err(|err| AppError::system(format!("Background task failed: {err}"), trace_id))
}

async fn devices_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let trace_id = resolve_trace_id(&headers);
    info!(trace_id = %trace_id, "devices_page");
    let devices = run_blocking(&state, &trace_id, list_devices).await??;
    let status = match listing_status(&devices) {
        OperationStatus::NoConnectedDevice => StatusMessage::failure(NO_DEVICES_MESSAGE),
        _ => StatusMessage::none(),
    };
    Ok(Html(render_devices(&devices, &status)))
}

async fn connect_page() -> Html<String> {
    Html(render_connect(None))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PairForm {
    device_ip: String,
    device_port: String,
    pair_code: String,
}

async fn connect_to_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<PairForm>,
) -> Result<Response, AppError> {
    let trace_id = resolve_trace_id(&headers);
    info!(trace_id = %trace_id, "connect_to_device");
    let paired = run_blocking(&state, &trace_id, move |state, trace_id| {
        pair_device(
            state,
            &form.device_ip,
            &form.device_port,
            &form.pair_code,
            trace_id,
        )
    })
    .await?;
    if paired {
        return Ok(Redirect::to("/").into_response());
    }
    Ok(Html(render_connect(Some(false))).into_response())
}

async fn packages_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let trace_id = resolve_trace_id(&headers);
    info!(trace_id = %trace_id, "packages_page");
    let outcome = run_blocking(&state, &trace_id, list_packages).await??;
    info!(trace_id = %trace_id, status = outcome.status.code(), package_count = outcome.packages.len(), "packages_page done");
    let page = match outcome.status {
        OperationStatus::NoDeviceSelected => return Ok(Redirect::to("/").into_response()),
        OperationStatus::NoPackagesFound => {
            render_packages(&[], &StatusMessage::failure(NO_PACKAGES_MESSAGE))
        }
        _ => render_packages(&outcome.packages, &StatusMessage::none()),
    };
    Ok(Html(page).into_response())
}

async fn apply_package_actions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let trace_id = resolve_trace_id(&headers);
    info!(trace_id = %trace_id, field_count = form.len(), "apply_actions");
    let outcome = run_blocking(&state, &trace_id, move |state, trace_id| {
        apply_actions(state, &form, trace_id)
    })
    .await??;
    info!(trace_id = %trace_id, status = outcome.status.code(), failed_count = outcome.packages.len(), "apply_actions done");
    if outcome.status == OperationStatus::NoDeviceSelected {
        return Ok(Redirect::to("/").into_response());
    }
    let status = if outcome.status.is_success() {
        StatusMessage::ok(ACTIONS_APPLIED_MESSAGE)
    } else {
        StatusMessage::failure(format!(
            "{ACTIONS_FAILED_PREFIX}{}",
            outcome.packages.join("\n")
        ))
    };
    Ok(Html(render_status(&status)).into_response())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SelectDeviceForm {
    selected_device: String,
}

async fn select_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SelectDeviceForm>,
) -> Result<Response, AppError> {
    let trace_id = resolve_trace_id(&headers);
    info!(trace_id = %trace_id, serial = %form.selected_device, "select_device");
    let selected = run_blocking(&state, &trace_id, move |state, trace_id| {
        let serial = form.selected_device.trim();
        if serial.is_empty() {
            return Err(AppError::validation("selected_device is required", trace_id));
        }
        set_selected_device(state, serial, trace_id)
    })
    .await?;
    match selected {
        Ok(true) => return Ok(Redirect::to("/packages").into_response()),
        Ok(false) => {}
        Err(err) => error!(trace_id = %trace_id, error = %err, "failed to select device"),
    }
    let devices = run_blocking(&state, &trace_id, list_devices)
        .await?
        .unwrap_or_default();
    Ok(Html(render_devices(&devices, &StatusMessage::failure(SELECT_FAILED_MESSAGE))).into_response())
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "adb": state.adb.program(),
    }))
}
