//! Profile backend: the capability boundary between the coordinator and the
//! native profile engine.
//!
//! Every capability is optional. A backend overrides only the operations it
//! actually provides; the default bodies answer `BackendError::Unavailable`,
//! which the coordinator treats as "no response" rather than a fatal error.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{FileSelection, ProfileData, ProfileStatus, ResearchResult, UploadResult};

pub mod http;
#[cfg(test)]
pub mod testing;

pub use http::HttpProfileBackend;

/// Names of the backend operations, used in logs and `Unavailable` errors.
pub mod op {
    pub const SELECT_FILE: &str = "select_file";
    pub const UPLOAD_RESUME: &str = "upload_resume";
    pub const UPLOAD_JD: &str = "upload_jd";
    pub const DELETE_JD: &str = "delete_jd";
    pub const GET_STATUS: &str = "get_status";
    pub const GET_PROFILE: &str = "get_profile";
    pub const SET_MODE: &str = "set_mode";
    pub const RESEARCH_COMPANY: &str = "research_company";
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend capability '{0}' is unavailable")]
    Unavailable(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Fault(String),
}

impl BackendError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, BackendError::Unavailable(_))
    }

    /// Human-readable text for a user-visible error channel.
    /// Falls back to `fallback` when the fault carries no message.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            BackendError::Unavailable(_) => return fallback.to_string(),
            BackendError::Api { message, .. } => message.trim().to_string(),
            BackendError::Fault(message) => message.trim().to_string(),
            other => other.to_string(),
        };
        if message.is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

/// The profile engine operations the coordinator sequences.
///
/// Carried by the coordinator as `Arc<dyn ProfileBackend>`.
#[async_trait]
pub trait ProfileBackend: Send + Sync {
    async fn select_file(&self) -> Result<FileSelection, BackendError> {
        Err(BackendError::Unavailable(op::SELECT_FILE))
    }

    async fn upload_resume(&self, _path: &str) -> Result<UploadResult, BackendError> {
        Err(BackendError::Unavailable(op::UPLOAD_RESUME))
    }

    async fn upload_jd(&self, _path: &str) -> Result<UploadResult, BackendError> {
        Err(BackendError::Unavailable(op::UPLOAD_JD))
    }

    async fn delete_jd(&self) -> Result<(), BackendError> {
        Err(BackendError::Unavailable(op::DELETE_JD))
    }

    async fn get_status(&self) -> Result<ProfileStatus, BackendError> {
        Err(BackendError::Unavailable(op::GET_STATUS))
    }

    async fn get_profile(&self) -> Result<ProfileData, BackendError> {
        Err(BackendError::Unavailable(op::GET_PROFILE))
    }

    async fn set_mode(&self, _enabled: bool) -> Result<(), BackendError> {
        Err(BackendError::Unavailable(op::SET_MODE))
    }

    async fn research_company(&self, _company_name: &str) -> Result<ResearchResult, BackendError> {
        Err(BackendError::Unavailable(op::RESEARCH_COMPANY))
    }
}

/// A backend with no capabilities at all. Stands in when no binding is present.
pub struct UnavailableBackend;

#[async_trait]
impl ProfileBackend for UnavailableBackend {}
