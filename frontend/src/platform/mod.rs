//! Platform abstraction layer for the release controls.
//!
//! The core components talk to the browser only through these traits, so the
//! host page stays in charge of navigation and prompts, and tests can swap in
//! scripted implementations.

use shared::{
    ApiAction, CreateReleaseParams, DeleteReleaseParams, Release, RevertParams,
    UpdateReleaseParams,
};

pub mod web;

/// How a release request can fail. Write paths surface these to the user,
/// read paths only log them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The request itself never completed (network down, CORS, aborted).
    #[error("request to {endpoint} failed: {reason}")]
    Transport {
        endpoint: &'static str,
        reason: String,
    },
    /// The server answered with a non-200 status. `message` is the
    /// structured `error.message` extracted from the body when present;
    /// `body` keeps the raw text for diagnostics.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: Option<String>,
        body: String,
    },
    /// A 200 response whose body did not parse as the expected shape.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedBody {
        endpoint: &'static str,
        reason: String,
    },
}

impl ApiError {
    /// Server-supplied message suitable for verbatim display, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Remote endpoint family for dataset releases. One method per action the
/// module performs; each call maps to exactly one HTTP request.
pub trait ReleaseApi {
    async fn list_releases(&self, dataset: &str) -> Result<Vec<Release>, ApiError>;
    async fn create_release(&self, params: &CreateReleaseParams) -> Result<(), ApiError>;
    async fn update_release(&self, params: &UpdateReleaseParams) -> Result<(), ApiError>;
    async fn delete_release(&self, params: &DeleteReleaseParams) -> Result<(), ApiError>;
    async fn revert_dataset(&self, params: &RevertParams) -> Result<(), ApiError>;
}

/// Capabilities the host page provides to the action controller: modal
/// confirmation, user-visible notices, and navigation. `confirm` is
/// synchronous from the caller's point of view; a non-blocking modal would
/// implement it as a two-step continuation behind this seam.
pub trait HostPage {
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
    fn notify_success(&self, title: &str, message: &str);
    fn reload(&self);
    fn navigate_to(&self, url: &str);
    fn scroll_to_top(&self);
}

/// Format the failure of a mutating call for the user, per the two-tier
/// contract: a server-supplied `error.message` is shown verbatim; anything
/// else becomes a generic notice while the details go to the diagnostic log.
pub fn failure_notice(error: &ApiError, action: ApiAction, params_json: &str) -> String {
    if let Some(message) = error.server_message() {
        return message.to_string();
    }
    log::error!(
        "{} failed without a structured message: {error}; params: {params_json}",
        action.endpoint()
    );
    format!("There was an error {} the dataset release.", action.verb())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_notice_prefers_server_message() {
        let error = ApiError::Status {
            endpoint: "dataset_release_delete",
            status: 500,
            message: Some("Release is locked".to_string()),
            body: r#"{"error":{"message":"Release is locked"}}"#.to_string(),
        };
        let notice = failure_notice(&error, ApiAction::DeleteRelease, "{}");
        assert_eq!(notice, "Release is locked");
    }

    #[test]
    fn failure_notice_falls_back_to_generic_verb_text() {
        let error = ApiError::Status {
            endpoint: "dataset_release_delete",
            status: 500,
            message: None,
            body: "<html>Internal Server Error</html>".to_string(),
        };
        let notice = failure_notice(&error, ApiAction::DeleteRelease, "{}");
        assert!(notice.contains("deleting"));

        let error = ApiError::Transport {
            endpoint: "dataset_release_create",
            reason: "network down".to_string(),
        };
        let notice = failure_notice(&error, ApiAction::CreateRelease, "{}");
        assert!(notice.contains("creating"));
    }
}
