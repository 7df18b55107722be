//! HTTP client for a profile engine that exposes its operations as JSON
//! endpoints. A route the engine does not serve (404/501) is reported as an
//! unavailable capability, not as a failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, warn};

use crate::backend::{op, BackendError, ProfileBackend};
use crate::models::backend::{FilePathRequest, ModeRequest, ResearchRequest};
use crate::models::{FileSelection, ProfileData, ProfileStatus, ResearchResult, UploadResult};

const SELECT_FILE_PATH: &str = "/profile/select-file";
const RESUME_PATH: &str = "/profile/resume";
const JD_PATH: &str = "/profile/jd";
const STATUS_PATH: &str = "/profile/status";
const PROFILE_PATH: &str = "/profile";
const MODE_PATH: &str = "/profile/mode";
const RESEARCH_PATH: &str = "/profile/research";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct HttpProfileBackend {
    client: Client,
    base_url: String,
}

impl HttpProfileBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Sends the request and maps the response status onto `BackendError`.
    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::NOT_IMPLEMENTED {
            debug!("Backend does not serve {operation} (status {status})");
            return Err(BackendError::Unavailable(operation));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            warn!("Backend {operation} returned {status}: {message}");
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = self.send(operation, request).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(BackendError::Parse)
    }
}

#[async_trait]
impl ProfileBackend for HttpProfileBackend {
    async fn select_file(&self) -> Result<FileSelection, BackendError> {
        self.send_json(op::SELECT_FILE, self.request(Method::POST, SELECT_FILE_PATH))
            .await
    }

    async fn upload_resume(&self, path: &str) -> Result<UploadResult, BackendError> {
        let body = FilePathRequest {
            file_path: path.to_string(),
        };
        self.send_json(
            op::UPLOAD_RESUME,
            self.request(Method::POST, RESUME_PATH).json(&body),
        )
        .await
    }

    async fn upload_jd(&self, path: &str) -> Result<UploadResult, BackendError> {
        let body = FilePathRequest {
            file_path: path.to_string(),
        };
        self.send_json(op::UPLOAD_JD, self.request(Method::POST, JD_PATH).json(&body))
            .await
    }

    async fn delete_jd(&self) -> Result<(), BackendError> {
        self.send(op::DELETE_JD, self.request(Method::DELETE, JD_PATH))
            .await?;
        Ok(())
    }

    async fn get_status(&self) -> Result<ProfileStatus, BackendError> {
        self.send_json(op::GET_STATUS, self.request(Method::GET, STATUS_PATH))
            .await
    }

    async fn get_profile(&self) -> Result<ProfileData, BackendError> {
        self.send_json(op::GET_PROFILE, self.request(Method::GET, PROFILE_PATH))
            .await
    }

    async fn set_mode(&self, enabled: bool) -> Result<(), BackendError> {
        let body = ModeRequest { enabled };
        self.send(op::SET_MODE, self.request(Method::PUT, MODE_PATH).json(&body))
            .await?;
        Ok(())
    }

    async fn research_company(&self, company_name: &str) -> Result<ResearchResult, BackendError> {
        let body = ResearchRequest {
            company_name: company_name.to_string(),
        };
        self.send_json(
            op::RESEARCH_COMPANY,
            self.request(Method::POST, RESEARCH_PATH).json(&body),
        )
        .await
    }
}
