//! Profile workflow coordinator. Sequences profile backend calls for the
//! resume, JD, company-research and persona-mode channels and owns the state
//! the presentation layer renders.
//!
//! All state lives behind one mutex that is only held for short synchronous
//! sections, never across a backend call. Each channel's `InProgress` state
//! is its own mutex; channels never block each other.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend::{BackendError, ProfileBackend, UnavailableBackend};
use crate::models::{CompanyDossier, ProfileData, ProfileStatus, ResearchResult};

pub mod workflow;

pub use workflow::{Channel, ChannelBoard, WorkflowState};

const RESUME_UPLOAD_FAILED: &str = "Upload failed";
const JD_UPLOAD_FAILED: &str = "JD upload failed";

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("The {0} channel already has an operation in flight")]
    Busy(Channel),

    #[error("No profile exists yet")]
    NoProfile,

    #[error("No active job description with a company name")]
    NoActiveJd,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "error", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// File selection was cancelled; nothing changed.
    Cancelled,
    Completed,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchOutcome {
    Stored,
    /// The generator answered without a dossier; the previous one is kept.
    NoDossier,
    /// The active JD changed while research was in flight; result dropped.
    Discarded,
    Failed,
}

#[derive(Debug, Clone, Copy)]
enum Document {
    Resume,
    Jd,
}

impl Document {
    fn channel(self) -> Channel {
        match self {
            Document::Resume => Channel::Resume,
            Document::Jd => Channel::Jd,
        }
    }

    fn fallback_error(self) -> &'static str {
        match self {
            Document::Resume => RESUME_UPLOAD_FAILED,
            Document::Jd => JD_UPLOAD_FAILED,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredDossier {
    company: String,
    dossier: CompanyDossier,
}

#[derive(Debug, Default)]
struct CoordinatorState {
    status: ProfileStatus,
    profile: Option<ProfileData>,
    dossier: Option<StoredDossier>,
    channels: ChannelBoard,
    last_refreshed_at: Option<DateTime<Utc>>,
}

/// Everything the presentation layer needs to render the profile settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorSnapshot {
    pub status: ProfileStatus,
    pub profile: Option<ProfileData>,
    pub company_dossier: Option<CompanyDossier>,
    pub dossier_company: Option<String>,
    /// The active JD no longer names the company the dossier was built for.
    pub dossier_stale: bool,
    pub channels: ChannelBoard,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

impl CoordinatorSnapshot {
    pub fn is_busy(&self, channel: Channel) -> bool {
        self.channels.is_busy(channel)
    }
}

/// Owns a held channel and frees it however the attempt ends.
struct ChannelGuard<'a> {
    coordinator: &'a ProfileCoordinator,
    channel: Channel,
    armed: bool,
}

impl ChannelGuard<'_> {
    /// Shows the attempt as `InProgress`, dropping any prior error.
    fn start(&self) {
        self.coordinator.lock().channels.start(self.channel);
    }

    /// Writes the terminal state and frees the channel under one lock, so a
    /// later attempt's hold is never released by this guard.
    fn finish(mut self, outcome: WorkflowState) {
        self.coordinator
            .lock()
            .channels
            .finish(self.channel, outcome);
        self.armed = false;
    }
}

impl Drop for ChannelGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.coordinator.lock().channels.release(self.channel);
        }
    }
}

pub struct ProfileCoordinator {
    backend: Arc<dyn ProfileBackend>,
    state: Mutex<CoordinatorState>,
}

impl ProfileCoordinator {
    pub fn new(backend: Arc<dyn ProfileBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(CoordinatorState::default()),
        }
    }

    /// A coordinator with no backend binding. Every call is unavailable.
    pub fn detached() -> Self {
        Self::new(Arc::new(UnavailableBackend))
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims `channel` without changing what the user sees.
    fn hold(&self, channel: Channel) -> Result<ChannelGuard<'_>, CoordinatorError> {
        if !self.lock().channels.try_hold(channel) {
            debug!("Rejected {channel} request: already in progress");
            return Err(CoordinatorError::Busy(channel));
        }
        Ok(ChannelGuard {
            coordinator: self,
            channel,
            armed: true,
        })
    }

    fn begin(&self, channel: Channel) -> Result<ChannelGuard<'_>, CoordinatorError> {
        let guard = self.hold(channel)?;
        guard.start();
        Ok(guard)
    }

    pub fn snapshot(&self) -> CoordinatorSnapshot {
        let state = self.lock();
        let active_company = state.profile.as_ref().and_then(|p| p.active_company());
        let dossier_stale = state.dossier.as_ref().is_some_and(|stored| {
            !active_company.is_some_and(|c| same_company(c, &stored.company))
        });

        CoordinatorSnapshot {
            status: state.status,
            profile: state.profile.clone(),
            company_dossier: state.dossier.as_ref().map(|d| d.dossier.clone()),
            dossier_company: state.dossier.as_ref().map(|d| d.company.clone()),
            dossier_stale,
            channels: state.channels.clone(),
            last_refreshed_at: state.last_refreshed_at,
        }
    }

    // ── Profile refresh ─────────────────────────────────────────────────────

    /// Fetches status and profile, as on mount. Channel states and the
    /// dossier are left alone.
    pub async fn load(&self) -> Result<CoordinatorSnapshot, CoordinatorError> {
        let status = self.refresh_status().await;
        let profile = self.refresh_profile().await;
        status?;
        profile?;
        Ok(self.snapshot())
    }

    /// Returns whether a status was applied. Unavailable is not an error.
    async fn refresh_status(&self) -> Result<bool, BackendError> {
        match self.backend.get_status().await {
            Ok(status) => {
                self.lock().status = status;
                Ok(true)
            }
            Err(e) if e.is_unavailable() => {
                debug!("Skipping status refresh: {e}");
                Ok(false)
            }
            Err(e) => {
                warn!("Failed to refresh profile status: {e}");
                Err(e)
            }
        }
    }

    async fn refresh_profile(&self) -> Result<bool, BackendError> {
        match self.backend.get_profile().await {
            Ok(profile) => {
                self.apply_profile(profile);
                Ok(true)
            }
            Err(e) if e.is_unavailable() => {
                debug!("Skipping profile refresh: {e}");
                Ok(false)
            }
            Err(e) => {
                warn!("Failed to refresh profile data: {e}");
                Err(e)
            }
        }
    }

    /// Replaces the profile wholesale; the latest completion wins.
    fn apply_profile(&self, mut profile: ProfileData) {
        if profile.normalize_active_jd() {
            warn!(
                "Profile snapshot had inconsistent active JD fields; normalized to hasActiveJD={}",
                profile.has_active_jd
            );
        }
        let mut state = self.lock();
        state.profile = Some(profile);
        state.last_refreshed_at = Some(Utc::now());
    }

    // ── Resume / JD upload ──────────────────────────────────────────────────

    pub async fn upload_resume(&self) -> Result<UploadOutcome, CoordinatorError> {
        self.upload(Document::Resume).await
    }

    /// Uploads a JD. A dossier for the previous JD is kept; the snapshot
    /// marks it stale if the company changed.
    pub async fn upload_jd(&self) -> Result<UploadOutcome, CoordinatorError> {
        self.upload(Document::Jd).await
    }

    async fn upload(&self, document: Document) -> Result<UploadOutcome, CoordinatorError> {
        let channel = document.channel();
        // Held across the picker so a second request cannot open another one.
        let guard = self.hold(channel)?;

        let selection = match self.backend.select_file().await {
            Ok(selection) => selection,
            Err(e) if e.is_unavailable() => {
                debug!("No file picker available for {channel} upload: {e}");
                return Ok(UploadOutcome::Cancelled);
            }
            Err(e) => {
                let message = e.user_message(document.fallback_error());
                warn!("File selection for {channel} upload failed: {e}");
                guard.finish(WorkflowState::Error(message.clone()));
                return Ok(UploadOutcome::Failed(message));
            }
        };

        let Some(path) = selection.path().map(str::to_owned) else {
            debug!("{channel} file selection cancelled");
            return Ok(UploadOutcome::Cancelled);
        };

        guard.start();
        info!("Uploading {channel} document from {path}");

        let result = match document {
            Document::Resume => self.backend.upload_resume(&path).await,
            Document::Jd => self.backend.upload_jd(&path).await,
        };

        let outcome = match result {
            Ok(result) if result.success => {
                // The upload itself succeeded; a failed refresh is logged
                // inside and does not turn it into a failure.
                let _ = self.refresh_status().await;
                let _ = self.refresh_profile().await;
                UploadOutcome::Completed
            }
            Ok(result) => UploadOutcome::Failed(
                result
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| document.fallback_error().to_string()),
            ),
            Err(e) => UploadOutcome::Failed(e.user_message(document.fallback_error())),
        };

        match &outcome {
            UploadOutcome::Failed(message) => {
                warn!("{channel} upload failed: {message}");
                guard.finish(WorkflowState::Error(message.clone()));
            }
            _ => {
                info!("{channel} upload completed");
                guard.finish(WorkflowState::Idle);
            }
        }

        Ok(outcome)
    }

    /// Deletes the active JD. The dossier is cleared whatever the backend
    /// says; a failed delete is logged and returned but never shown on the
    /// JD error channel.
    pub async fn delete_jd(&self) -> Result<(), CoordinatorError> {
        let deleted = match self.backend.delete_jd().await {
            Ok(()) => Ok(()),
            Err(e) if e.is_unavailable() => {
                debug!("JD delete skipped: {e}");
                Ok(())
            }
            Err(e) => {
                warn!("JD delete failed: {e}");
                Err(e)
            }
        };

        let _ = self.refresh_profile().await;

        if self.lock().dossier.take().is_some() {
            info!("Cleared company dossier after JD delete");
        }

        deleted.map_err(CoordinatorError::from)
    }

    // ── Company research ────────────────────────────────────────────────────

    /// Researches `company_name`. Failures are logged only and never replace
    /// a dossier that is already stored.
    pub async fn research_company(
        &self,
        company_name: &str,
    ) -> Result<ResearchOutcome, CoordinatorError> {
        let company = company_name.trim();
        if company.is_empty() {
            return Err(CoordinatorError::Validation(
                "company name must not be empty".to_string(),
            ));
        }
        let active = self.active_company().ok_or(CoordinatorError::NoActiveJd)?;
        if !same_company(&active, company) {
            return Err(CoordinatorError::Validation(format!(
                "'{company}' is not the active job description's company ('{active}')"
            )));
        }

        let guard = self.begin(Channel::Research)?;
        info!("Researching company '{company}'");

        let outcome = match self.backend.research_company(company).await {
            Ok(ResearchResult {
                success: true,
                dossier: Some(dossier),
            }) => self.store_dossier(company, dossier),
            Ok(_) => {
                info!("Research for '{company}' returned no dossier");
                ResearchOutcome::NoDossier
            }
            Err(e) => {
                warn!("Research failed for '{company}': {e}");
                ResearchOutcome::Failed
            }
        };

        guard.finish(WorkflowState::Idle);
        Ok(outcome)
    }

    /// Researches the company named by the active JD.
    pub async fn research_active_company(&self) -> Result<ResearchOutcome, CoordinatorError> {
        let company = self.active_company().ok_or(CoordinatorError::NoActiveJd)?;
        self.research_company(&company).await
    }

    fn active_company(&self) -> Option<String> {
        self.lock()
            .profile
            .as_ref()
            .and_then(|p| p.active_company())
            .map(str::to_owned)
    }

    fn store_dossier(&self, company: &str, dossier: CompanyDossier) -> ResearchOutcome {
        let mut state = self.lock();
        let still_active = state
            .profile
            .as_ref()
            .and_then(|p| p.active_company())
            .is_some_and(|active| same_company(active, company));
        if !still_active {
            warn!("Dropping dossier for '{company}': it is no longer the active JD's company");
            return ResearchOutcome::Discarded;
        }

        state.dossier = Some(StoredDossier {
            company: company.to_string(),
            dossier,
        });
        info!("Stored company dossier for '{company}'");
        ResearchOutcome::Stored
    }

    // ── Persona mode ────────────────────────────────────────────────────────

    /// Applies `profileMode = enabled` only after the backend confirms it.
    pub async fn set_persona_mode(&self, enabled: bool) -> Result<bool, CoordinatorError> {
        if !self.lock().status.has_profile {
            debug!("Ignoring persona mode change: no profile");
            return Err(CoordinatorError::NoProfile);
        }

        let guard = self.begin(Channel::Persona)?;
        let result = self.backend.set_mode(enabled).await;

        match result {
            Ok(()) => {
                self.lock().status.profile_mode = enabled;
                guard.finish(WorkflowState::Idle);
                info!("Persona mode set to {enabled}");
                Ok(enabled)
            }
            Err(e) => {
                guard.finish(WorkflowState::Idle);
                warn!("Failed to toggle profile mode: {e}");
                Err(e.into())
            }
        }
    }

    pub async fn toggle_persona_mode(&self) -> Result<bool, CoordinatorError> {
        let current = self.lock().status.profile_mode;
        self.set_persona_mode(!current).await
    }
}

fn same_company(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
