//! Project categories offered in the quote wizard.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Category of architectural work a visitor requests a quote for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    House,
    Building,
    Commercial,
    Interior,
    Reconstruction,
    Visualization,
}

impl ProjectType {
    /// Every project type in the order the wizard offers them.
    pub const ALL: [ProjectType; 6] = [
        ProjectType::House,
        ProjectType::Building,
        ProjectType::Commercial,
        ProjectType::Interior,
        ProjectType::Reconstruction,
        ProjectType::Visualization,
    ];

    /// Wire tag used in the submission payload.
    pub const fn as_str(self) -> &'static str {
        match self {
            ProjectType::House => "house",
            ProjectType::Building => "building",
            ProjectType::Commercial => "commercial",
            ProjectType::Interior => "interior",
            ProjectType::Reconstruction => "reconstruction",
            ProjectType::Visualization => "visualization",
        }
    }

    /// Localized label shown to visitors and used in email subjects.
    pub const fn label(self) -> &'static str {
        match self {
            ProjectType::House => "Kuća (novogradnja)",
            ProjectType::Building => "Zgrada (stambeno-poslovni)",
            ProjectType::Commercial => "Poslovni objekat",
            ProjectType::Interior => "Enterijer",
            ProjectType::Reconstruction => "Rekonstrukcija/adaptacija",
            ProjectType::Visualization => "Samo 3D vizualizacija",
        }
    }

    /// Label for a raw wire tag, falling back to the tag itself.
    pub fn label_for(tag: &str) -> &str {
        match tag.parse::<ProjectType>() {
            Ok(project_type) => project_type.label(),
            Err(_) => tag,
        }
    }
}

impl Display for ProjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectType::ALL
            .into_iter()
            .find(|project_type| project_type.as_str() == s.trim())
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_tags() {
        assert_eq!("house".parse::<ProjectType>(), Ok(ProjectType::House));
        assert_eq!(
            " visualization ".parse::<ProjectType>(),
            Ok(ProjectType::Visualization)
        );
        assert!("garage".parse::<ProjectType>().is_err());
    }

    #[test]
    fn unknown_tags_keep_their_raw_label() {
        assert_eq!(ProjectType::label_for("interior"), "Enterijer");
        assert_eq!(ProjectType::label_for("garage"), "garage");
    }

    #[test]
    fn serializes_as_lowercase_tag() {
        let json = serde_json::to_string(&ProjectType::Reconstruction).unwrap();
        assert_eq!(json, "\"reconstruction\"");
    }
}
