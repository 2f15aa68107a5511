//! Release action controller.
//!
//! User gestures arrive on an unbounded channel from the DOM bindings and
//! are processed one at a time, so each gesture issues at most one network
//! call and no two mutating requests overlap. Destructive gestures are gated
//! by the host's modal confirmation; declining one is not an error, the
//! gesture is simply abandoned with no request sent.

use crate::config::{ControlsConfig, RevertFollowUp};
use crate::platform::{failure_notice, ApiError, HostPage, ReleaseApi};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use shared::{
    ApiAction, CreateReleaseParams, DeleteReleaseParams, RevertParams, RevisionRef,
    UpdateReleaseParams,
};

/// One user gesture, with its raw form/button inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Create { name: String, description: String },
    Update { name: String, description: String },
    Delete { release: String },
    Revert { revision_ref: String },
}

/// Channel pair feeding gestures from DOM event handlers into the
/// controller loop.
pub fn gesture_channel() -> (UnboundedSender<Gesture>, UnboundedReceiver<Gesture>) {
    unbounded()
}

pub struct ReleaseActions<A, H> {
    api: A,
    page: H,
    config: ControlsConfig,
}

impl<A: ReleaseApi, H: HostPage> ReleaseActions<A, H> {
    pub fn new(api: A, page: H, config: ControlsConfig) -> Self {
        Self { api, page, config }
    }

    /// Drive the controller until the gesture channel closes. Gestures are
    /// human-paced; sequential processing is the concurrency model.
    pub async fn run(self, mut gestures: UnboundedReceiver<Gesture>) {
        while let Some(gesture) = gestures.next().await {
            self.handle(gesture).await;
        }
    }

    pub async fn handle(&self, gesture: Gesture) {
        match gesture {
            Gesture::Create { name, description } => {
                self.create(name.trim(), description.trim()).await
            }
            Gesture::Update { name, description } => {
                self.update(name.trim(), description.trim()).await
            }
            Gesture::Delete { release } => self.delete(release.trim()).await,
            Gesture::Revert { revision_ref } => self.revert(revision_ref.trim()).await,
        }
    }

    async fn create(&self, name: &str, description: &str) {
        if name.is_empty() {
            self.page.alert("Please enter a name for the release.");
            return;
        }
        let params = CreateReleaseParams {
            dataset: self.config.dataset_id.clone(),
            name: name.to_string(),
            description: description.to_string(),
        };
        match self.api.create_release(&params).await {
            Ok(()) => self.page.reload(),
            Err(e) => self.surface_failure(&e, ApiAction::CreateRelease, &params),
        }
    }

    async fn update(&self, name: &str, description: &str) {
        let Some(current) = self.config.release.as_deref() else {
            log::error!("update gesture received but no release is configured as open");
            self.page.alert("No release is currently open for editing.");
            return;
        };
        if name.is_empty() {
            self.page.alert("Please enter a name for the release.");
            return;
        }
        let params = UpdateReleaseParams {
            dataset: self.config.dataset_id.clone(),
            release: current.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        };
        match self.api.update_release(&params).await {
            Ok(()) => self.page.reload(),
            Err(e) => self.surface_failure(&e, ApiAction::UpdateRelease, &params),
        }
    }

    async fn delete(&self, release: &str) {
        let prompt = format!(
            "Are you sure you want to delete the release \"{release}\" of this dataset?"
        );
        if !self.page.confirm(&prompt) {
            return;
        }
        let params = DeleteReleaseParams {
            release: release.to_string(),
            dataset: self.config.dataset_id.clone(),
        };
        match self.api.delete_release(&params).await {
            // The release's page no longer exists, so leave for the dataset.
            Ok(()) => self.page.navigate_to(&self.config.dataset_url),
            Err(e) => self.surface_failure(&e, ApiAction::DeleteRelease, &params),
        }
    }

    async fn revert(&self, revision_ref: &str) {
        let prompt = format!(
            "Are you sure you want to revert this dataset to the older release \
             \"{revision_ref}\"?\n\nNote that when doing this the current state will be \
             lost. If you want to preserve it, please cancel and create a release for it \
             first."
        );
        if !self.page.confirm(&prompt) {
            return;
        }
        let params = RevertParams {
            revision_ref: RevisionRef::parse(revision_ref),
            dataset: self.config.dataset_id.clone(),
        };
        match self.api.revert_dataset(&params).await {
            Ok(()) => match self.config.revert_follow_up {
                RevertFollowUp::ReturnToDataset => {
                    self.page.navigate_to(&self.config.dataset_url)
                }
                RevertFollowUp::NotifyInPlace => {
                    self.page.notify_success(
                        "Success:",
                        "Dataset reverted successfully. You can now go back to the main \
                         dataset page to see the changes.",
                    );
                    self.page.scroll_to_top();
                }
            },
            Err(e) => self.surface_failure(&e, ApiAction::Revert, &params),
        }
    }

    fn surface_failure(
        &self,
        error: &ApiError,
        action: ApiAction,
        params: &impl serde::Serialize,
    ) {
        let params_json = serde_json::to_string(params)
            .unwrap_or_else(|_| "<params not serializable>".to_string());
        self.page.alert(&failure_notice(error, action, &params_json));
    }
}
