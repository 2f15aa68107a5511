//! Release list loader: fetches the release collection for a dataset and
//! drives the host-rendered table through three display states,
//! loading → empty | populated.
//!
//! Read failures degrade silently for the user: the loading indicator stays
//! up and the failure goes to the diagnostic log. Only a fresh `load` call
//! leaves that state; the loader never polls.

use crate::platform::ReleaseApi;
use shared::Release;

/// Rendering surface for the release list, implemented over the host's DOM
/// in `views` and by recording fakes in tests.
pub trait ListView {
    /// Hide the loading indicator; called once per successful fetch.
    fn loading_finished(&self);
    /// Show the "no releases" placeholder.
    fn show_empty_state(&self);
    /// Drop all previously rendered rows.
    fn clear_rows(&self);
    /// Render one release row, in server-supplied order.
    fn append_row(&self, release: &Release);
    /// Reveal the populated list container.
    fn show_list(&self);
}

pub struct ReleaseListLoader<A, V> {
    api: A,
    view: V,
}

impl<A: ReleaseApi, V: ListView> ReleaseListLoader<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self { api, view }
    }

    /// One full fetch-and-render pass. Prior rows are cleared before any new
    /// row is inserted, so repeated calls fully replace the rendering.
    pub async fn load(&self, dataset_id: &str) {
        let releases = match self.api.list_releases(dataset_id).await {
            Ok(releases) => releases,
            Err(e) => {
                log::error!("failed to fetch list of releases: {e}");
                return;
            }
        };

        self.view.loading_finished();

        if releases.is_empty() {
            self.view.show_empty_state();
            return;
        }

        self.view.clear_rows();
        for release in &releases {
            self.view.append_row(release);
        }
        self.view.show_list();
    }
}
