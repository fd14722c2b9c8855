// src/errors.rs
use crate::state::UiState;
use thiserror::Error;

/// Banner text when no file is selected at dispatch time.
pub const NO_IMAGE_MESSAGE: &str = "Please select an image";

/// Banner text when the server gives no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred";

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("No image selected")]
    NoImageSelected,

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Preview error: {0}")]
    Preview(String),

    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: UiState, to: UiState },

    #[error("An analysis is already in progress")]
    AnalysisInFlight,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    /// Text shown in the error banner for this failure.
    pub fn user_message(&self) -> String {
        match self {
            StudioError::NoImageSelected => NO_IMAGE_MESSAGE.to_string(),
            StudioError::Server { message, .. } => message.clone(),
            StudioError::Transport(_) | StudioError::MalformedResponse(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}
