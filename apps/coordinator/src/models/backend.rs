use serde::{Deserialize, Serialize};

use crate::models::dossier::CompanyDossier;

/// Result of the native file picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSelection {
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub file_path: Option<String>,
}

impl FileSelection {
    #[cfg(test)]
    pub fn picked(path: impl Into<String>) -> Self {
        Self {
            cancelled: false,
            file_path: Some(path.into()),
        }
    }

    #[cfg(test)]
    pub fn cancelled() -> Self {
        Self {
            cancelled: true,
            file_path: None,
        }
    }

    /// The chosen path, unless the user backed out or nothing was chosen.
    pub fn path(&self) -> Option<&str> {
        if self.cancelled {
            return None;
        }
        self.file_path.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    #[cfg(test)]
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[cfg(test)]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub success: bool,
    #[serde(default)]
    pub dossier: Option<CompanyDossier>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePathRequest {
    pub file_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModeRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRequest {
    pub company_name: String,
}
