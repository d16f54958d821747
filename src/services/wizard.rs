//! Read-only views of the wizard table for front ends.

use crate::domain::project_type::ProjectType;
use crate::domain::wizard::steps_for;
use crate::dto::quote::{ProjectTypeDto, WizardConfigDto};
use crate::services::{ServiceError, ServiceResult};

/// Project types in the order the picker shows them.
pub fn list_project_types() -> Vec<ProjectTypeDto> {
    ProjectType::ALL.into_iter().map(ProjectTypeDto::from).collect()
}

/// Steps and fields configured for the project type with wire tag `tag`.
pub fn wizard_config(tag: &str) -> ServiceResult<WizardConfigDto> {
    let project_type: ProjectType = tag
        .parse()
        .map_err(|_| ServiceError::UnknownProjectType(tag.to_string()))?;

    Ok(WizardConfigDto {
        project_type,
        label: project_type.label(),
        steps: steps_for(project_type),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lists_all_types_in_order() {
        let types = list_project_types();
        assert_eq!(types.len(), 6);
        assert_eq!(types[0].value, "house");
        assert_eq!(types[5].label, "Samo 3D vizualizacija");
    }

    #[test]
    fn config_serializes_field_kinds() {
        let config = wizard_config("house").unwrap();
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["projectType"], "house");
        assert_eq!(value["steps"].as_array().unwrap().len(), 3);
        let area = &value["steps"][0]["fields"][1];
        assert_eq!(area["id"], "area");
        assert_eq!(area["type"], "number");
        assert_eq!(area["min"], json!(30.0));
        assert_eq!(area["required"], true);
        let floors = &value["steps"][0]["fields"][2];
        assert_eq!(floors["options"][1]["label"], "P+1");
    }

    #[test]
    fn unknown_type_is_reported() {
        assert!(matches!(
            wizard_config("garage"),
            Err(ServiceError::UnknownProjectType(tag)) if tag == "garage"
        ));
    }
}
