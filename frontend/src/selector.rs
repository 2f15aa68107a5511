//! Release selector populator: fills a single-choice control with one option
//! per release, optionally followed by the synthetic "current live" option,
//! and applies a host-requested pre-selection.

use crate::config::SelectorConfig;
use crate::platform::ReleaseApi;
use shared::CURRENT_REVISION;

/// Rendering surface for the selector control.
pub trait SelectorView {
    fn clear_options(&self);
    fn append_option(&self, value: &str, label: &str);
    fn set_selected(&self, value: &str);
    /// Empty collection: the control stays hidden/disabled, host-styled.
    fn show_empty_state(&self);
}

pub struct ReleaseSelector<A, V> {
    api: A,
    view: V,
    config: SelectorConfig,
}

impl<A: ReleaseApi, V: SelectorView> ReleaseSelector<A, V> {
    pub fn new(api: A, view: V, config: SelectorConfig) -> Self {
        Self { api, view, config }
    }

    /// One full fetch-and-populate pass. Options are rebuilt from scratch
    /// each time; the sentinel option, when enabled, is always appended last
    /// so the live state stays visually separate from historical releases.
    pub async fn populate(&self) {
        let releases = match self.api.list_releases(&self.config.dataset_id).await {
            Ok(releases) => releases,
            Err(e) => {
                log::error!("failed to fetch releases for selector: {e}");
                return;
            }
        };

        if releases.is_empty() {
            self.view.show_empty_state();
            return;
        }

        self.view.clear_options();
        for release in &releases {
            // Label is the name, not the description.
            self.view.append_option(&release.name, &release.name);
        }
        if self.config.include_current {
            self.view
                .append_option(CURRENT_REVISION, &self.config.current_label);
        }
        if let Some(selected) = self.config.selected_id.as_deref() {
            // The sentinel is an ordinary option value by now; no special
            // casing at selection time.
            self.view.set_selected(selected);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CURRENT_LABEL;
    use crate::platform::ApiError;
    use shared::Release;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct StubApi {
        response: Result<Vec<Release>, ApiError>,
    }

    impl ReleaseApi for StubApi {
        async fn list_releases(&self, _dataset: &str) -> Result<Vec<Release>, ApiError> {
            self.response.clone()
        }

        async fn create_release(
            &self,
            _params: &shared::CreateReleaseParams,
        ) -> Result<(), ApiError> {
            unreachable!()
        }

        async fn update_release(
            &self,
            _params: &shared::UpdateReleaseParams,
        ) -> Result<(), ApiError> {
            unreachable!()
        }

        async fn delete_release(
            &self,
            _params: &shared::DeleteReleaseParams,
        ) -> Result<(), ApiError> {
            unreachable!()
        }

        async fn revert_dataset(&self, _params: &shared::RevertParams) -> Result<(), ApiError> {
            unreachable!()
        }
    }

    #[derive(Clone, Default)]
    struct RecordingView {
        options: Rc<RefCell<Vec<(String, String)>>>,
        selected: Rc<RefCell<Option<String>>>,
        empty_shown: Rc<RefCell<bool>>,
    }

    impl SelectorView for RecordingView {
        fn clear_options(&self) {
            self.options.borrow_mut().clear();
        }

        fn append_option(&self, value: &str, label: &str) {
            self.options
                .borrow_mut()
                .push((value.to_string(), label.to_string()));
        }

        fn set_selected(&self, value: &str) {
            *self.selected.borrow_mut() = Some(value.to_string());
        }

        fn show_empty_state(&self) {
            *self.empty_shown.borrow_mut() = true;
        }
    }

    fn release(name: &str) -> Release {
        Release {
            name: name.to_string(),
            description: String::new(),
            created: "2020-09-04T12:34:56".to_string(),
        }
    }

    fn config(include_current: bool, selected_id: Option<&str>) -> SelectorConfig {
        SelectorConfig {
            api_url: "/api/3/action/".to_string(),
            dataset_id: "ds".to_string(),
            include_current,
            selected_id: selected_id.map(str::to_string),
            current_label: DEFAULT_CURRENT_LABEL.to_string(),
        }
    }

    #[tokio::test]
    async fn appends_one_option_per_release_labelled_by_name() {
        let view = RecordingView::default();
        let selector = ReleaseSelector::new(
            StubApi {
                response: Ok(vec![release("v2"), release("v1")]),
            },
            view.clone(),
            config(false, None),
        );
        selector.populate().await;

        assert_eq!(
            *view.options.borrow(),
            vec![
                ("v2".to_string(), "v2".to_string()),
                ("v1".to_string(), "v1".to_string())
            ]
        );
        assert_eq!(*view.selected.borrow(), None);
    }

    #[tokio::test]
    async fn current_option_is_always_last_regardless_of_count() {
        for releases in [vec![release("v1")], vec![release("v1"), release("v2")]] {
            let view = RecordingView::default();
            let selector = ReleaseSelector::new(
                StubApi {
                    response: Ok(releases),
                },
                view.clone(),
                config(true, None),
            );
            selector.populate().await;

            let options = view.options.borrow();
            let last = options.last().unwrap();
            assert_eq!(last.0, "current");
            assert_eq!(last.1, DEFAULT_CURRENT_LABEL);
        }
    }

    #[tokio::test]
    async fn preselecting_the_sentinel_behaves_like_any_release() {
        let view = RecordingView::default();
        let selector = ReleaseSelector::new(
            StubApi {
                response: Ok(vec![release("v1")]),
            },
            view.clone(),
            config(true, Some("current")),
        );
        selector.populate().await;
        assert_eq!(view.selected.borrow().as_deref(), Some("current"));

        let view = RecordingView::default();
        let selector = ReleaseSelector::new(
            StubApi {
                response: Ok(vec![release("v1")]),
            },
            view.clone(),
            config(true, Some("v1")),
        );
        selector.populate().await;
        assert_eq!(view.selected.borrow().as_deref(), Some("v1"));
    }

    #[tokio::test]
    async fn empty_collection_shows_empty_state_and_no_options() {
        let view = RecordingView::default();
        let selector = ReleaseSelector::new(
            StubApi { response: Ok(vec![]) },
            view.clone(),
            config(true, Some("current")),
        );
        selector.populate().await;

        assert!(*view.empty_shown.borrow());
        assert!(view.options.borrow().is_empty());
        assert_eq!(*view.selected.borrow(), None);
    }

    #[tokio::test]
    async fn repopulating_clears_previous_options_first() {
        let view = RecordingView::default();
        let selector = ReleaseSelector::new(
            StubApi {
                response: Ok(vec![release("v1")]),
            },
            view.clone(),
            config(true, None),
        );
        selector.populate().await;
        selector.populate().await;

        // One release option plus the sentinel, not doubled.
        assert_eq!(view.options.borrow().len(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_touches_nothing() {
        let view = RecordingView::default();
        let selector = ReleaseSelector::new(
            StubApi {
                response: Err(ApiError::Transport {
                    endpoint: "dataset_release_list",
                    reason: "offline".to_string(),
                }),
            },
            view.clone(),
            config(true, None),
        );
        selector.populate().await;

        assert!(view.options.borrow().is_empty());
        assert!(!*view.empty_shown.borrow());
    }
}
