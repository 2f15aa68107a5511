//! Typed configuration for each mounted component, parsed from `data-*`
//! attributes on the host-supplied root element.
//!
//! Parsing goes through an injectable attribute lookup instead of touching
//! the DOM directly, so the mapping is testable with a plain closure.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required attribute `{0}`")]
    MissingAttribute(&'static str),
    #[error("attribute `{name}` has unsupported value `{value}`")]
    InvalidValue { name: &'static str, value: String },
}

/// What the action controller does after a successful revert. Both are valid
/// per-deployment behaviors; the host picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevertFollowUp {
    /// Navigate back to the canonical dataset page.
    ReturnToDataset,
    /// Stay on the page, show a success notice and scroll to top.
    #[default]
    NotifyInPlace,
}

/// Configuration for the action controller root.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsConfig {
    /// Base path all endpoint names are appended to.
    pub api_url: String,
    pub dataset_id: String,
    /// Canonical dataset page, navigated to after delete (and revert, under
    /// the `ReturnToDataset` policy).
    pub dataset_url: String,
    /// When set, the enclosing dialog gets an advisory notice that linked
    /// resources are not content-versioned.
    pub link_resources: bool,
    /// Name of the release currently being edited; required only for the
    /// update gesture.
    pub release: Option<String>,
    pub revert_follow_up: RevertFollowUp,
}

impl ControlsConfig {
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: required(&lookup, "data-api-url")?,
            dataset_id: required(&lookup, "data-dataset-id")?,
            dataset_url: required(&lookup, "data-dataset-url")?,
            link_resources: flag(&lookup, "data-link-resources")?,
            release: lookup("data-release").filter(|v| !v.is_empty()),
            revert_follow_up: revert_follow_up(&lookup)?,
        })
    }
}

/// Configuration for the release selector control.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    pub api_url: String,
    pub dataset_id: String,
    /// Append the synthetic "current live" option after all releases.
    pub include_current: bool,
    /// Pre-selected value: a release name or the `current` sentinel.
    pub selected_id: Option<String>,
    /// Host-localized label for the sentinel option.
    pub current_label: String,
}

pub const DEFAULT_CURRENT_LABEL: &str = "[Current live revision]";

impl SelectorConfig {
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: required(&lookup, "data-api-url")?,
            dataset_id: required(&lookup, "data-dataset-id")?,
            include_current: flag(&lookup, "data-include-current")?,
            selected_id: lookup("data-selected-id").filter(|v| !v.is_empty()),
            current_label: lookup("data-current-label")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENT_LABEL.to_string()),
        })
    }
}

/// Configuration for the release list root.
#[derive(Debug, Clone, PartialEq)]
pub struct ListConfig {
    pub api_url: String,
    pub dataset_id: String,
}

impl ListConfig {
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: required(&lookup, "data-api-url")?,
            dataset_id: required(&lookup, "data-dataset-id")?,
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    lookup(name)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingAttribute(name))
}

/// Boolean attributes as the host template engine renders them: absent means
/// false, and "True"/"False" (Python-style) is accepted alongside the usual
/// lowercase forms.
fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<bool, ConfigError> {
    match lookup(name).as_deref() {
        None | Some("") => Ok(false),
        Some("true") | Some("True") | Some("1") => Ok(true),
        Some("false") | Some("False") | Some("0") => Ok(false),
        Some(other) => Err(ConfigError::InvalidValue {
            name,
            value: other.to_string(),
        }),
    }
}

fn revert_follow_up(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<RevertFollowUp, ConfigError> {
    const NAME: &str = "data-revert-follow-up";
    match lookup(NAME).as_deref() {
        None | Some("") => Ok(RevertFollowUp::default()),
        Some("notify") => Ok(RevertFollowUp::NotifyInPlace),
        Some("navigate") => Ok(RevertFollowUp::ReturnToDataset),
        Some(other) => Err(ConfigError::InvalidValue {
            name: NAME,
            value: other.to_string(),
        }),
    }
}
