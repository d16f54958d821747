//! Payload exchanged between the quote wizard and the submission endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::attachment::Attachment;
use crate::domain::form_values::FormValues;
use crate::domain::project_type::ProjectType;
use crate::domain::wizard::WizardStep;

/// Multipart field carrying the JSON part of a submission.
pub const DATA_FIELD: &str = "data";
/// Prefix of the multipart fields carrying attachments (`file_0`, `file_1`, ...).
pub const FILE_FIELD_PREFIX: &str = "file_";

/// JSON part of a submission: `{projectType, formData, submittedAt}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    /// Wire tag of the project type. Unknown tags are tolerated by the server.
    #[validate(length(min = 1))]
    pub project_type: String,
    /// Non-file field values in wizard order.
    #[serde(default)]
    pub form_data: Map<String, Value>,
    /// RFC 3339 UTC timestamp of the submission.
    #[serde(default)]
    pub submitted_at: Option<String>,
}

/// One finalized quote request, created once at submission time.
#[derive(Clone, Debug, PartialEq)]
pub struct QuoteSubmission {
    pub data: QuoteData,
    /// Attachments in field order; sent as `file_0..file_n`.
    pub attachments: Vec<Attachment>,
}

impl QuoteSubmission {
    /// Packages the wizard snapshot. Values follow the configured field order
    /// and file fields contribute attachments instead of JSON values.
    pub fn new(
        project_type: ProjectType,
        steps: &[WizardStep],
        values: &FormValues,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let mut form_data = Map::new();
        let mut attachments = Vec::new();

        for field in steps.iter().flat_map(|step| step.fields) {
            let Some(value) = values.get(field.id) else {
                continue;
            };
            if field.kind.is_file() {
                attachments.extend(value.files().iter().cloned());
            } else if let Some(json) = value.to_json() {
                form_data.insert(field.id.to_string(), json);
            }
        }

        Self {
            data: QuoteData {
                project_type: project_type.as_str().to_string(),
                form_data,
                submitted_at: Some(submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            },
            attachments,
        }
    }

    /// Multipart field names for the attachments, in order.
    pub fn file_field_names(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.attachments.len()).map(|index| format!("{FILE_FIELD_PREFIX}{index}"))
    }
}
