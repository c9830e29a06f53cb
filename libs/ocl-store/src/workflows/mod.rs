//! Workflows that turn user intents into terminology requests and actions
//!
//! Each workflow dispatches an ordered sequence of [`crate::Action`]s; tests
//! assert on that sequence.

pub mod bulk_concepts;
pub mod dictionary_concepts;
pub mod specific_concept;

use crate::actions::Toast;
use crate::error::Error;

/// Generic message for requests the service answered with an error status.
pub const REQUEST_FAILED_MESSAGE: &str = "Request can't be made";

/// Toast for a failed client request: responses with a status get the
/// generic message, anything else gets whatever the error body said.
pub fn request_error_toast(err: &ocldm_client::Error) -> Toast {
    match err.status() {
        Some(_) => Toast::error(REQUEST_FAILED_MESSAGE),
        None => Toast::error(err.message().resolve(REQUEST_FAILED_MESSAGE)),
    }
}

/// Toast for a failed workflow, preferring the service's own message.
pub(crate) fn workflow_error_toast(err: &Error) -> Toast {
    match err {
        Error::Client(e) => Toast::error(e.message().resolve(REQUEST_FAILED_MESSAGE)),
        other => Toast::error(other.to_string()),
    }
}
