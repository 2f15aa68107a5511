use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ===== CORE DATA TYPES =====

/// A named, immutable snapshot of a dataset as reported by the server.
///
/// `created` is the server-assigned creation timestamp in ISO-8601 form;
/// it is kept as the raw wire string and only interpreted for display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Release {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created: String,
}

/// Sentinel accepted wherever a release name is expected, meaning the live,
/// unsnapshotted state of the dataset.
pub const CURRENT_REVISION: &str = "current";

/// Either a release name or the `current` sentinel. Input-only: it is sent
/// to the revert endpoint and never stored client-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionRef {
    Current,
    Release(String),
}

impl RevisionRef {
    pub fn parse(raw: &str) -> Self {
        if raw == CURRENT_REVISION {
            RevisionRef::Current
        } else {
            RevisionRef::Release(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RevisionRef::Current => CURRENT_REVISION,
            RevisionRef::Release(name) => name,
        }
    }
}

impl fmt::Display for RevisionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RevisionRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ===== REQUEST PAYLOADS =====

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CreateReleaseParams {
    pub dataset: String,
    pub name: String,
    pub description: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UpdateReleaseParams {
    pub dataset: String,
    /// Name the release currently has on the server.
    pub release: String,
    /// New name for the release.
    pub name: String,
    pub description: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DeleteReleaseParams {
    pub release: String,
    pub dataset: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RevertParams {
    pub revision_ref: RevisionRef,
    pub dataset: String,
}

// ===== RESPONSE ENVELOPES =====

/// Successful `dataset_release_list` body: `{"result": [...]}`.
#[derive(Deserialize, Debug, Clone)]
pub struct ListEnvelope {
    pub result: Vec<Release>,
}

/// Best-effort shape of a non-200 body: `{"error": {"message": "..."}}`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: ErrorBody,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Extract the server-supplied message from a raw response body, if the
    /// body parses and carries one.
    pub fn message_from_body(body: &str) -> Option<String> {
        let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
        envelope.error.message.filter(|m| !m.is_empty())
    }
}

// ===== ENDPOINTS =====

/// The remote actions this module talks to, with their endpoint names and
/// the verb used when reporting a failure to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiAction {
    CreateRelease,
    UpdateRelease,
    DeleteRelease,
    Revert,
    ListReleases,
}

impl ApiAction {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ApiAction::CreateRelease => "dataset_release_create",
            ApiAction::UpdateRelease => "dataset_release_update",
            ApiAction::DeleteRelease => "dataset_release_delete",
            ApiAction::Revert => "dataset_revert",
            ApiAction::ListReleases => "dataset_release_list",
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            ApiAction::CreateRelease => "creating",
            ApiAction::UpdateRelease => "updating",
            ApiAction::DeleteRelease => "deleting",
            ApiAction::Revert => "reverting",
            ApiAction::ListReleases => "listing",
        }
    }
}

// ===== TIMESTAMP RENDERING =====

/// Render a server `created` timestamp for display, e.g.
/// "September 4, 2020, 12:34 PM (UTC+00:00)".
///
/// Accepts RFC 3339 as well as the naive ISO form some backends emit
/// (no offset, optional fractional seconds); naive timestamps are taken
/// as UTC. Returns `None` when the string parses as neither.
pub fn format_created_timestamp(raw: &str) -> Option<String> {
    let parsed: DateTime<FixedOffset> = match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt,
        Err(_) => {
            let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
                .ok()?;
            naive.and_utc().fixed_offset()
        }
    };
    Some(parsed.format("%B %-d, %Y, %-I:%M %p (UTC%:z)").to_string())
}

/// Display fallback used when `created` does not parse: the raw string,
/// which is still meaningful to the user.
pub fn created_timestamp_or_raw(raw: &str) -> String {
    format_created_timestamp(raw).unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_deserializes_from_list_payload() {
        let body = r#"{"result": [
            {"name": "v1", "description": "first", "created": "2020-09-04T12:34:56"},
            {"name": "v2", "created": "2020-10-01T08:00:00"}
        ]}"#;
        let envelope: ListEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.result.len(), 2);
        assert_eq!(envelope.result[0].name, "v1");
        assert_eq!(envelope.result[0].description, "first");
        // Missing description defaults to empty rather than failing the parse.
        assert_eq!(envelope.result[1].description, "");
    }

    #[test]
    fn revision_ref_recognizes_sentinel() {
        assert_eq!(RevisionRef::parse("current"), RevisionRef::Current);
        assert_eq!(
            RevisionRef::parse("v1.2"),
            RevisionRef::Release("v1.2".to_string())
        );
        assert_eq!(RevisionRef::parse("current").as_str(), "current");
    }

    #[test]
    fn revert_params_serialize_with_flat_revision_ref() {
        let params = RevertParams {
            revision_ref: RevisionRef::Release("v1".to_string()),
            dataset: "ds".to_string(),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["revision_ref"], "v1");
        assert_eq!(json["dataset"], "ds");

        let params = RevertParams {
            revision_ref: RevisionRef::Current,
            dataset: "ds".to_string(),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["revision_ref"], "current");
    }

    #[test]
    fn update_params_carry_old_and_new_name() {
        let params = UpdateReleaseParams {
            dataset: "ds".to_string(),
            release: "old".to_string(),
            name: "new".to_string(),
            description: "d".to_string(),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["release"], "old");
        assert_eq!(json["name"], "new");
    }

    #[test]
    fn error_message_extracted_from_structured_body() {
        let body = r#"{"error": {"message": "Release is locked"}}"#;
        assert_eq!(
            ErrorEnvelope::message_from_body(body),
            Some("Release is locked".to_string())
        );
    }

    #[test]
    fn error_message_absent_for_malformed_or_empty_bodies() {
        assert_eq!(ErrorEnvelope::message_from_body("<html>oops</html>"), None);
        assert_eq!(ErrorEnvelope::message_from_body("{}"), None);
        assert_eq!(
            ErrorEnvelope::message_from_body(r#"{"error": {"message": ""}}"#),
            None
        );
        assert_eq!(ErrorEnvelope::message_from_body(r#"{"error": {}}"#), None);
    }

    #[test]
    fn endpoint_names_match_remote_api() {
        assert_eq!(ApiAction::CreateRelease.endpoint(), "dataset_release_create");
        assert_eq!(ApiAction::ListReleases.endpoint(), "dataset_release_list");
        assert_eq!(ApiAction::Revert.endpoint(), "dataset_revert");
        assert_eq!(ApiAction::DeleteRelease.verb(), "deleting");
    }

    #[test]
    fn created_timestamp_renders_localized_text() {
        let rendered = format_created_timestamp("2020-09-04T12:34:56").unwrap();
        assert_eq!(rendered, "September 4, 2020, 12:34 PM (UTC+00:00)");

        let rendered = format_created_timestamp("2020-09-04T02:05:00+02:00").unwrap();
        assert_eq!(rendered, "September 4, 2020, 2:05 AM (UTC+02:00)");

        let rendered = format_created_timestamp("2020-09-04T12:34:56.123456").unwrap();
        assert!(rendered.starts_with("September 4, 2020"));
    }

    #[test]
    fn unparsable_timestamp_falls_back_to_raw() {
        assert_eq!(format_created_timestamp("not a date"), None);
        assert_eq!(created_timestamp_or_raw("not a date"), "not a date");
    }
}
