//! Request and response bodies for the HTTP surface.

use envform_config::{EditOutcome, FieldKind, FieldSpec, FilterList};
use serde::{Deserialize, Serialize};

/// RFC9457-compatible problem document surfaced on validation/runtime errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    /// Problem type URI.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short summary of the problem type.
    pub title: String,
    /// HTTP status code.
    pub status: u16,
    /// Human-readable explanation of this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Request fields that failed validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_params: Option<Vec<ProblemInvalidParam>>,
}

/// Invalid parameter pointer surfaced alongside a [`ProblemDetails`] payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemInvalidParam {
    /// JSON pointer to the offending field.
    pub pointer: String,
    /// Why the field was rejected.
    pub message: String,
}

/// Acknowledgement returned by write endpoints without a richer body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
}

impl SuccessResponse {
    pub(crate) const OK: Self = Self { success: true };
}

/// Child directories of a browsed path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryListing {
    /// Always `true` for a successful listing.
    pub success: bool,
    /// Path as requested.
    pub path: String,
    /// One level up from `path`, with a trailing slash.
    pub parent: String,
    /// Names of child directories, sorted.
    pub directories: Vec<String>,
}

/// Editable state of the filter list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FilterView {
    /// Config key holding the encoded list.
    pub key: String,
    /// Separator currently in use.
    pub delimiter: String,
    /// Decoded entries.
    pub entries: Vec<String>,
    /// Entries plus a trailing empty slot when every entry is filled.
    pub display_entries: Vec<String>,
    /// Encoded scalar as it is stored.
    pub encoded: String,
}

impl From<&FilterList> for FilterView {
    fn from(list: &FilterList) -> Self {
        Self {
            key: list.key().to_string(),
            delimiter: list.separator().as_str().to_string(),
            entries: list.entries().to_vec(),
            display_entries: list.display_entries(),
            encoded: list.encoded(),
        }
    }
}

/// Body of `POST /filter`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FilterEditRequest {
    /// Entry to replace; the entry count appends.
    pub index: usize,
    /// New entry text.
    pub value: String,
}

/// Result of a filter edit.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FilterEditResponse {
    /// List after the edit was applied and saved.
    #[serde(flatten)]
    pub view: FilterView,
    /// Effect the edit had on the separator.
    pub outcome: EditOutcome,
}

/// Catalog entry enriched with its current value.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldView {
    /// Configuration key.
    pub key: &'static str,
    /// Editor kind.
    pub kind: FieldKind,
    /// Help text.
    pub tooltip: &'static str,
    /// Whether the value should be masked by the editor.
    pub secret: bool,
    /// Stored value, or the default when the key is absent.
    pub value: String,
    /// Whether the value has the shape the editor expects.
    pub valid: bool,
}

impl FieldView {
    pub(crate) fn new(spec: &FieldSpec, value: &str, valid: bool) -> Self {
        Self {
            key: spec.key,
            kind: spec.kind,
            tooltip: spec.tooltip,
            secret: spec.is_secret(),
            value: value.to_string(),
            valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envform_config::{ConfigMap, FILTER_KEY};
    use serde_json::json;

    #[test]
    fn filter_edit_response_flattens_view() -> anyhow::Result<()> {
        let map: ConfigMap = [("FILTER", "a,b"), ("FILTER_DELIMITER", ",")]
            .into_iter()
            .collect();
        let list = FilterList::from_config(&map, FILTER_KEY);
        let body = serde_json::to_value(FilterEditResponse {
            view: FilterView::from(&list),
            outcome: EditOutcome::SeparatorKept,
        })?;
        assert_eq!(
            body,
            json!({
                "key": "FILTER",
                "delimiter": ",",
                "entries": ["a", "b"],
                "display_entries": ["a", "b", ""],
                "encoded": "a,b",
                "outcome": {"kind": "separator_kept"},
            })
        );
        Ok(())
    }

    #[test]
    fn problem_details_omits_empty_fields() -> anyhow::Result<()> {
        let body = serde_json::to_value(ProblemDetails {
            kind: "about:blank".to_string(),
            title: "bad request".to_string(),
            status: 400,
            detail: None,
            invalid_params: None,
        })?;
        assert_eq!(
            body,
            json!({"type": "about:blank", "title": "bad request", "status": 400})
        );
        Ok(())
    }
}
