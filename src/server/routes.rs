//! Route handlers for the recorder's HTTP surface

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::error;

use crate::application::ports::{RecordingStore, StorageError};
use crate::application::record::{
    RecordSessionUseCase, RecorderState, RecordingOutcome, StartError,
};

/// Shared state behind the route handlers
#[derive(Clone)]
pub struct ApiState {
    pub recorder: Arc<RecordSessionUseCase>,
    pub store: Arc<dyn RecordingStore>,
}

/// Build the service router
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/start", get(start_recording))
        .route("/download", get(download))
        .route("/status", get(status))
        .with_state(state)
}

async fn root() -> &'static str {
    "Welcome to the vibecap recorder"
}

/// Begin a new recording; returns as soon as the WAV header is on disk
async fn start_recording(State(state): State<ApiState>) -> Response {
    match state.recorder.start().await {
        Ok(()) => (StatusCode::OK, "Recording started").into_response(),
        Err(StartError::AlreadyRecording) => {
            (StatusCode::CONFLICT, "Recording already in progress").into_response()
        }
        Err(e @ StartError::Storage(_)) => {
            error!(error = %e, "failed to start recording");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create file").into_response()
        }
    }
}

/// Serve the most recent completed recording
async fn download(State(state): State<ApiState>) -> Response {
    match state.store.read_latest().await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "audio/wav")], bytes).into_response(),
        Err(StorageError::NotFound) => (StatusCode::NOT_FOUND, "File not found").into_response(),
        Err(e) => {
            error!(error = %e, "failed to read recording");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read recording").into_response()
        }
    }
}

#[derive(Serialize)]
struct StatusResponse {
    state: RecorderState,
    last_outcome: Option<RecordingOutcome>,
}

/// Report where the orchestrator is and how the last session ended
async fn status(State(state): State<ApiState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        state: state.recorder.state(),
        last_outcome: state.recorder.last_outcome(),
    })
}
