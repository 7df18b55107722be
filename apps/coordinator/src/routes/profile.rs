use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::coordinator::{CoordinatorError, CoordinatorSnapshot, ResearchOutcome, UploadOutcome};
use crate::errors::AppError;
use crate::models::backend::ModeRequest;
use crate::state::AppState;
use crate::views::ProfileView;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub snapshot: CoordinatorSnapshot,
    pub view: ProfileView,
}

impl ProfileResponse {
    fn current(state: &AppState) -> Self {
        Self::from_snapshot(state.coordinator.snapshot())
    }

    fn from_snapshot(snapshot: CoordinatorSnapshot) -> Self {
        let view = ProfileView::from_snapshot(&snapshot);
        Self { snapshot, view }
    }
}

/// Result of a user action plus the state to re-render.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T: Serialize> {
    pub result: T,
    pub state: ProfileResponse,
}

impl<T: Serialize> ActionResponse<T> {
    fn new(result: T, state: &AppState) -> Json<Self> {
        Json(Self {
            result,
            state: ProfileResponse::current(state),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeResult {
    pub applied: bool,
    pub profile_mode: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchBody {
    pub company_name: Option<String>,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(State(state): State<AppState>) -> Json<ProfileResponse> {
    Json(ProfileResponse::current(&state))
}

/// POST /api/v1/profile/load
pub async fn handle_load(
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let snapshot = state.coordinator.load().await?;
    Ok(Json(ProfileResponse::from_snapshot(snapshot)))
}

/// POST /api/v1/profile/resume
pub async fn handle_upload_resume(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse<UploadOutcome>>, AppError> {
    let outcome = state.coordinator.upload_resume().await?;
    Ok(ActionResponse::new(outcome, &state))
}

/// POST /api/v1/profile/jd
pub async fn handle_upload_jd(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse<UploadOutcome>>, AppError> {
    let outcome = state.coordinator.upload_jd().await?;
    Ok(ActionResponse::new(outcome, &state))
}

/// DELETE /api/v1/profile/jd
///
/// A failed delete is reported in the result, not as an HTTP error.
pub async fn handle_delete_jd(
    State(state): State<AppState>,
) -> Json<ActionResponse<DeleteResult>> {
    let deleted = state.coordinator.delete_jd().await.is_ok();
    ActionResponse::new(DeleteResult { deleted }, &state)
}

/// POST /api/v1/profile/research
///
/// Researches `companyName` from the body, or the active JD's company when
/// the body is empty or omits it.
pub async fn handle_research(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ActionResponse<ResearchOutcome>>, AppError> {
    let company = parse_research_body(&body)?.company_name;
    let outcome = match company {
        Some(company) => state.coordinator.research_company(&company).await?,
        None => state.coordinator.research_active_company().await?,
    };
    Ok(ActionResponse::new(outcome, &state))
}

fn parse_research_body(body: &[u8]) -> Result<ResearchBody, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResearchBody::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid research request body: {e}")))
}

/// PUT /api/v1/profile/mode
pub async fn handle_set_mode(
    State(state): State<AppState>,
    Json(req): Json<ModeRequest>,
) -> Result<Json<ActionResponse<ModeResult>>, AppError> {
    let result = state.coordinator.set_persona_mode(req.enabled).await;
    mode_response(result, &state)
}

/// POST /api/v1/profile/mode/toggle
pub async fn handle_toggle_mode(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse<ModeResult>>, AppError> {
    let result = state.coordinator.toggle_persona_mode().await;
    mode_response(result, &state)
}

/// A rejected mode change is best-effort: it comes back as `applied: false`
/// with the unchanged mode. Guard failures stay HTTP errors.
fn mode_response(
    result: Result<bool, CoordinatorError>,
    state: &AppState,
) -> Result<Json<ActionResponse<ModeResult>>, AppError> {
    let applied = match result {
        Ok(_) => true,
        Err(CoordinatorError::Backend(_)) => false,
        Err(e) => return Err(e.into()),
    };
    let profile_mode = state.coordinator.snapshot().status.profile_mode;
    Ok(ActionResponse::new(
        ModeResult {
            applied,
            profile_mode,
        },
        state,
    ))
}
