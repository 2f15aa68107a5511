//! DOM-backed implementations of the list and selector view traits, plus the
//! linked-resources advisory notice.
//!
//! The host owns all markup: rows are produced by cloning the template row
//! found in the host's table, options are plain `<option>` elements, and
//! visibility is toggled through the `hidden` attribute so styling stays
//! with the host stylesheet.

use shared::Release;
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlOptionElement, HtmlSelectElement};

use crate::release_list::ListView;
use crate::selector::SelectorView;

/// Placeholder the host leaves in the template row's link href; replaced
/// with the release name per rendered row.
pub const REVISION_REF_PLACEHOLDER: &str = "__REVISION_REF__";

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("host markup is missing `{0}`")]
    MissingElement(&'static str),
    #[error("template row link has no href")]
    MissingHrefTemplate,
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

fn query(root: &Element, selector: &'static str) -> Result<Element, ViewError> {
    root.query_selector(selector)
        .map_err(|e| ViewError::Dom(format!("{e:?}")))?
        .ok_or(ViewError::MissingElement(selector))
}

fn hide(element: &Element) {
    if element.set_attribute("hidden", "hidden").is_err() {
        log::error!("failed to hide element");
    }
}

fn show(element: &Element) {
    if element.remove_attribute("hidden").is_err() {
        log::error!("failed to show element");
    }
}

pub fn substitute_revision_ref(href_template: &str, name: &str) -> String {
    href_template.replace(REVISION_REF_PLACEHOLDER, name)
}

/// `ListView` over the host's release table. The template row is captured
/// (detached) at construction so `clear_rows` cannot destroy it.
pub struct DomListView {
    document: Document,
    loading: Element,
    table: Element,
    tbody: Element,
    empty_message: Element,
    compare_button: Option<Element>,
    row_template: Element,
    href_template: String,
}

impl DomListView {
    pub fn from_root(document: Document, root: &Element) -> Result<Self, ViewError> {
        let loading = query(root, ".release-list__loading")?;
        let table = query(root, ".release-list__list")?;
        let tbody = query(&table, "tbody")?;
        let empty_message = query(root, ".release-list__no-releases")?;
        let compare_button = root
            .query_selector(".compare-releases-btn")
            .map_err(|e| ViewError::Dom(format!("{e:?}")))?;

        let template_row = query(&tbody, "tr")?;
        let href_template = query(&template_row, ".release-list__release-name a")?
            .get_attribute("href")
            .ok_or(ViewError::MissingHrefTemplate)?;
        let row_template = template_row
            .clone_node_with_deep(true)
            .map_err(|e| ViewError::Dom(format!("{e:?}")))?
            .dyn_into::<Element>()
            .map_err(|_| ViewError::Dom("template row clone is not an element".to_string()))?;

        Ok(Self {
            document,
            loading,
            table,
            tbody,
            empty_message,
            compare_button,
            row_template,
            href_template,
        })
    }

    fn build_row(&self, release: &Release) -> Result<Element, ViewError> {
        let row = self
            .row_template
            .clone_node_with_deep(true)
            .map_err(|e| ViewError::Dom(format!("{e:?}")))?
            .dyn_into::<Element>()
            .map_err(|_| ViewError::Dom("row clone is not an element".to_string()))?;

        let link = query(&row, ".release-list__release-name a")?;
        link.set_attribute(
            "href",
            &substitute_revision_ref(&self.href_template, &release.name),
        )
        .map_err(|e| ViewError::Dom(format!("{e:?}")))?;
        link.set_text_content(Some(&release.name));

        query(&row, ".release-list__release-description")?
            .set_text_content(Some(&release.description));

        let timestamp = self
            .document
            .create_element("span")
            .map_err(|e| ViewError::Dom(format!("{e:?}")))?;
        timestamp.set_class_name("automatic-local-datetime");
        timestamp.set_text_content(Some(&shared::created_timestamp_or_raw(&release.created)));
        timestamp
            .set_attribute("data-datetime", &release.created)
            .map_err(|e| ViewError::Dom(format!("{e:?}")))?;
        query(&row, ".release-list__release-timestamp")?
            .append_child(&timestamp)
            .map_err(|e| ViewError::Dom(format!("{e:?}")))?;

        Ok(row)
    }
}

impl ListView for DomListView {
    fn loading_finished(&self) {
        hide(&self.loading);
    }

    fn show_empty_state(&self) {
        show(&self.empty_message);
    }

    fn clear_rows(&self) {
        self.tbody.set_inner_html("");
    }

    fn append_row(&self, release: &Release) {
        let appended = self
            .build_row(release)
            .and_then(|row| {
                self.tbody
                    .append_child(&row)
                    .map_err(|e| ViewError::Dom(format!("{e:?}")))
            });
        if let Err(e) = appended {
            log::error!("failed to render release row for {}: {e}", release.name);
        }
    }

    fn show_list(&self) {
        show(&self.table);
        if let Some(button) = &self.compare_button {
            show(button);
        }
    }
}

/// `SelectorView` over the host's `<select>` control.
pub struct DomSelectorView {
    select: HtmlSelectElement,
}

impl DomSelectorView {
    pub fn new(select: HtmlSelectElement) -> Self {
        Self { select }
    }
}

impl SelectorView for DomSelectorView {
    fn clear_options(&self) {
        self.select.set_length(0);
    }

    fn append_option(&self, value: &str, label: &str) {
        match HtmlOptionElement::new_with_text_and_value(label, value) {
            Ok(option) => {
                if self.select.append_child(&option).is_err() {
                    log::error!("failed to append option {value}");
                }
            }
            Err(e) => log::error!("failed to create option {value}: {e:?}"),
        }
    }

    fn set_selected(&self, value: &str) {
        self.select.set_value(value);
    }

    fn show_empty_state(&self) {
        self.select.set_disabled(true);
        hide(&self.select);
    }
}

/// Advisory shown in the release dialog for datasets whose resources are
/// links into external systems; their URLs version, their content does not.
pub const LINK_RESOURCES_NOTICE: &str = "This dataset contains resources that are links to \
external systems. The URL to the file will be versioned but we cannot guarantee that the \
data itself will remain the same over time. If the content of the external URL changes \
(while the URL doesn't), you will no longer have the ability to get the old version of \
the data.";

pub fn inject_link_resources_notice(
    document: &Document,
    dialog_body: &Element,
) -> Result<(), ViewError> {
    let group = document
        .create_element("div")
        .map_err(|e| ViewError::Dom(format!("{e:?}")))?;
    group.set_class_name("form-group");
    let span = document
        .create_element("span")
        .map_err(|e| ViewError::Dom(format!("{e:?}")))?;
    let icon = document
        .create_element("i")
        .map_err(|e| ViewError::Dom(format!("{e:?}")))?;
    icon.set_class_name("fa fa-info-circle");
    span.append_child(&icon)
        .map_err(|e| ViewError::Dom(format!("{e:?}")))?;
    span.append_child(&document.create_text_node(LINK_RESOURCES_NOTICE))
        .map_err(|e| ViewError::Dom(format!("{e:?}")))?;
    group
        .append_child(&span)
        .map_err(|e| ViewError::Dom(format!("{e:?}")))?;
    dialog_body
        .append_child(&group)
        .map_err(|e| ViewError::Dom(format!("{e:?}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_ref_placeholder_is_substituted_per_row() {
        let href = "/dataset/ds/release/__REVISION_REF__";
        assert_eq!(
            substitute_revision_ref(href, "v1"),
            "/dataset/ds/release/v1"
        );
        // A template without the placeholder passes through unchanged.
        assert_eq!(substitute_revision_ref("/dataset/ds", "v1"), "/dataset/ds");
    }
}
