//! JSON bodies returned by the quote endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::project_type::ProjectType;
use crate::domain::wizard::WizardStep;

/// Body of a successful submission.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteResponse {
    pub success: bool,
    pub message: String,
}

/// Body of every failed request.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Entry of the project type picker.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ProjectTypeDto {
    pub value: &'static str,
    pub label: &'static str,
}

impl From<ProjectType> for ProjectTypeDto {
    fn from(project_type: ProjectType) -> Self {
        Self {
            value: project_type.as_str(),
            label: project_type.label(),
        }
    }
}

/// Wizard definition for one project type.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardConfigDto {
    pub project_type: ProjectType,
    pub label: &'static str,
    pub steps: &'static [WizardStep],
}
