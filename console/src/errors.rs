use common::errors::ExportError;
use thiserror::Error;

use crate::controller::ConsoleState;

/// Failure of one request to the report query service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The user aborted the request
    #[error("Request canceled")]
    Canceled,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Console usage errors
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Failed to load user list: {0}")]
    UserList(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Report not available for this user: {0}")]
    ReportNotAllowed(String),

    #[error("Cannot {action} while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: ConsoleState,
    },

    #[error("Execution {0} is not among the loaded dates")]
    UnknownExecution(i32),

    #[error("No report data to export")]
    NothingToExport,

    #[error("Failed to render report: {0}")]
    Render(String),

    #[error(transparent)]
    Export(#[from] ExportError),
}
