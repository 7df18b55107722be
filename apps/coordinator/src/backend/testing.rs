//! Scripted in-memory backend for coordinator tests.
//!
//! Each operation answers from its own queue of scripted replies, reports
//! itself unavailable once the queue runs dry, and records the call so tests
//! can assert exactly which backend operations ran.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::backend::{op, BackendError, ProfileBackend};
use crate::models::{
    CompanyDossier, FileSelection, ProfileData, ProfileStatus, ResearchResult, UploadResult,
};

type Reply<T> = Result<T, BackendError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SelectFile,
    UploadResume(String),
    UploadJd(String),
    DeleteJd,
    GetStatus,
    GetProfile,
    SetMode(bool),
    ResearchCompany(String),
}

#[derive(Default)]
struct Script {
    selections: VecDeque<Reply<FileSelection>>,
    resume_uploads: VecDeque<Reply<UploadResult>>,
    jd_uploads: VecDeque<Reply<UploadResult>>,
    deletes: VecDeque<Reply<()>>,
    statuses: VecDeque<Reply<ProfileStatus>>,
    profiles: VecDeque<Reply<ProfileData>>,
    modes: VecDeque<Reply<()>>,
    research: VecDeque<Reply<ResearchResult>>,
}

#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
    /// When set, every mutating call waits for a permit before answering.
    gate: Option<Arc<Semaphore>>,
    /// When set, `select_file` waits for a permit before answering.
    picker_gate: Option<Arc<Semaphore>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds mutating calls until `release` hands out permits.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Lets `count` gated calls proceed.
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    /// Holds the file picker open until `release_picker` hands out permits.
    pub fn gated_picker(mut self) -> Self {
        self.picker_gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn release_picker(&self, count: usize) {
        if let Some(gate) = &self.picker_gate {
            gate.add_permits(count);
        }
    }

    pub fn on_select_file(self, reply: Reply<FileSelection>) -> Self {
        self.script.lock().unwrap().selections.push_back(reply);
        self
    }

    pub fn on_upload_resume(self, reply: Reply<UploadResult>) -> Self {
        self.script.lock().unwrap().resume_uploads.push_back(reply);
        self
    }

    pub fn on_upload_jd(self, reply: Reply<UploadResult>) -> Self {
        self.script.lock().unwrap().jd_uploads.push_back(reply);
        self
    }

    pub fn on_delete_jd(self, reply: Reply<()>) -> Self {
        self.script.lock().unwrap().deletes.push_back(reply);
        self
    }

    pub fn on_get_status(self, reply: Reply<ProfileStatus>) -> Self {
        self.script.lock().unwrap().statuses.push_back(reply);
        self
    }

    pub fn on_get_profile(self, reply: Reply<ProfileData>) -> Self {
        self.script.lock().unwrap().profiles.push_back(reply);
        self
    }

    pub fn on_set_mode(self, reply: Reply<()>) -> Self {
        self.script.lock().unwrap().modes.push_back(reply);
        self
    }

    pub fn on_research(self, reply: Reply<ResearchResult>) -> Self {
        self.script.lock().unwrap().research.push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| call(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }

    async fn wait_picker(&self) {
        if let Some(gate) = &self.picker_gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

fn next<T>(
    queue: &mut VecDeque<Reply<T>>,
    operation: &'static str,
) -> Reply<T> {
    queue
        .pop_front()
        .unwrap_or(Err(BackendError::Unavailable(operation)))
}

#[async_trait]
impl ProfileBackend for ScriptedBackend {
    async fn select_file(&self) -> Result<FileSelection, BackendError> {
        self.record(Call::SelectFile);
        self.wait_picker().await;
        next(&mut self.script.lock().unwrap().selections, op::SELECT_FILE)
    }

    async fn upload_resume(&self, path: &str) -> Result<UploadResult, BackendError> {
        self.record(Call::UploadResume(path.to_string()));
        self.wait_gate().await;
        next(&mut self.script.lock().unwrap().resume_uploads, op::UPLOAD_RESUME)
    }

    async fn upload_jd(&self, path: &str) -> Result<UploadResult, BackendError> {
        self.record(Call::UploadJd(path.to_string()));
        self.wait_gate().await;
        next(&mut self.script.lock().unwrap().jd_uploads, op::UPLOAD_JD)
    }

    async fn delete_jd(&self) -> Result<(), BackendError> {
        self.record(Call::DeleteJd);
        next(&mut self.script.lock().unwrap().deletes, op::DELETE_JD)
    }

    async fn get_status(&self) -> Result<ProfileStatus, BackendError> {
        self.record(Call::GetStatus);
        next(&mut self.script.lock().unwrap().statuses, op::GET_STATUS)
    }

    async fn get_profile(&self) -> Result<ProfileData, BackendError> {
        self.record(Call::GetProfile);
        next(&mut self.script.lock().unwrap().profiles, op::GET_PROFILE)
    }

    async fn set_mode(&self, enabled: bool) -> Result<(), BackendError> {
        self.record(Call::SetMode(enabled));
        self.wait_gate().await;
        next(&mut self.script.lock().unwrap().modes, op::SET_MODE)
    }

    async fn research_company(&self, company_name: &str) -> Result<ResearchResult, BackendError> {
        self.record(Call::ResearchCompany(company_name.to_string()));
        self.wait_gate().await;
        next(&mut self.script.lock().unwrap().research, op::RESEARCH_COMPANY)
    }
}

/// A dossier for `company` with one salary band and two competitors.
pub fn dossier_for(company: &str) -> CompanyDossier {
    serde_json::from_value(serde_json::json!({
        "company": company,
        "hiring_strategy": "Growing the platform org",
        "interview_focus": "Distributed systems design",
        "salary_estimates": [
            {"title": "Senior Engineer", "location": "Remote", "currency": "USD",
             "min": 180000, "max": 230000, "confidence": "high"}
        ],
        "competitors": ["Globex", "Initech"],
        "sources": ["https://example.com/careers", null]
    }))
    .unwrap()
}

/// A profile with an active JD at `company`.
pub fn profile_with_jd(company: &str) -> ProfileData {
    serde_json::from_value(serde_json::json!({
        "identity": {"name": "Ada Lovelace", "email": "ada@example.com"},
        "experienceCount": 3,
        "projectCount": 2,
        "nodeCount": 40,
        "skills": ["Rust", "Kafka"],
        "hasActiveJD": true,
        "activeJD": {
            "title": "Senior Engineer",
            "company": company,
            "level": "senior",
            "technologies": ["Rust", "Kafka", "Postgres", "Kubernetes"]
        }
    }))
    .unwrap()
}

/// A profile with no active JD.
pub fn profile_without_jd() -> ProfileData {
    ProfileData {
        experience_count: 3,
        project_count: 2,
        node_count: 40,
        skills: vec!["Rust".to_string()],
        ..Default::default()
    }
}
