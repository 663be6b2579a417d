//! Request handlers
//!
//! The slice endpoint never reports details to the client: every failure is
//! logged and answered with the configured plain-text message.

use std::fmt;

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use log::{debug, error, info};
use tokio::task::{self, JoinError};

use crate::errors::SliceError;
use crate::slicer::SliceOutput;

use super::state::AppState;

/// Multipart field carrying the original image
pub const IMAGE_FIELD: &str = "image";
/// Multipart field carrying the coordinate document
pub const COORDS_FIELD: &str = "coords";

/// Everything that can go wrong between request and archive
#[derive(Debug)]
enum HandlerError {
    Rejected(MultipartRejection),
    Multipart(MultipartError),
    Slice(SliceError),
    Task(JoinError),
}

impl HandlerError {
    fn status(&self) -> StatusCode {
        match self {
            // the body limit trips while streaming chunked uploads
            HandlerError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Rejected(e) => write!(f, "Multipart rejected: {}", e.body_text()),
            HandlerError::Multipart(e) => write!(f, "Multipart error: {}", e.body_text()),
            HandlerError::Slice(e) => write!(f, "{}", e),
            HandlerError::Task(e) => write!(f, "Slicing task failed: {}", e),
        }
    }
}

impl From<MultipartError> for HandlerError {
    fn from(error: MultipartError) -> Self {
        HandlerError::Multipart(error)
    }
}

impl From<SliceError> for HandlerError {
    fn from(error: SliceError) -> Self {
        HandlerError::Slice(error)
    }
}

impl From<JoinError> for HandlerError {
    fn from(error: JoinError) -> Self {
        HandlerError::Task(error)
    }
}

/// `POST /api/slice`
pub async fn slice_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match run_slice(&state, multipart).await {
        Ok(output) => archive_response(&state, output),
        Err(e) => {
            error!("Slice request failed: {}", e);
            failure_response(&state, e.status())
        }
    }
}

async fn run_slice(state: &AppState, multipart: Result<Multipart, MultipartRejection>)
                   -> Result<SliceOutput, HandlerError> {
    let mut multipart = multipart.map_err(HandlerError::Rejected)?;
    let (image, coords) = read_fields(&mut multipart).await?;
    info!("Slice request: {} image bytes, coords {}", image.len(), coords);

    let service = state.service;
    let output = task::spawn_blocking(move || service.process(&image, &coords)).await??;
    Ok(output)
}

async fn read_fields(multipart: &mut Multipart) -> Result<(Bytes, String), HandlerError> {
    let mut image = None;
    let mut coords = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(IMAGE_FIELD) => image = Some(field.bytes().await?),
            Some(COORDS_FIELD) => coords = Some(field.text().await?),
            other => debug!("Ignoring form field {:?}", other),
        }
    }

    let image = image.ok_or(SliceError::MissingField(IMAGE_FIELD))?;
    let coords = coords.ok_or(SliceError::MissingField(COORDS_FIELD))?;
    Ok((image, coords))
}

fn archive_response(state: &AppState, output: SliceOutput) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", state.archive_name);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        output.archive,
    ).into_response()
}

fn failure_response(state: &AppState, status: StatusCode) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.failure_message.to_string(),
    ).into_response()
}
