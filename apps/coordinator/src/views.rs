//! Derived values the settings UI renders next to the raw snapshot: which
//! controls are enabled, headline text for the active JD, capped skill and
//! technology lists.

use serde::Serialize;

use crate::coordinator::{Channel, CoordinatorSnapshot};

pub const SKILL_PREVIEW_LIMIT: usize = 15;
pub const TECHNOLOGY_PREVIEW_LIMIT: usize = 3;
pub const DEFAULT_JD_LEVEL: &str = "mid";

/// Which user actions may be dispatched right now. A control is disabled
/// while its own channel is busy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub upload_resume: bool,
    pub upload_jd: bool,
    pub delete_jd: bool,
    pub research: bool,
    pub toggle_persona: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveJdView {
    /// "<title> @ <company>"
    pub headline: String,
    pub level: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub controls: Controls,
    pub top_skills: Vec<String>,
    pub active_jd: Option<ActiveJdView>,
    pub research_company: Option<String>,
    pub dossier_source_count: usize,
}

impl ProfileView {
    pub fn from_snapshot(snapshot: &CoordinatorSnapshot) -> Self {
        let idle = |channel: Channel| !snapshot.is_busy(channel);
        let profile = snapshot.profile.as_ref();
        let research_company = profile
            .and_then(|p| p.active_company())
            .map(str::to_owned);

        let active_jd = profile
            .filter(|p| p.has_active_jd)
            .and_then(|p| p.active_jd.as_ref())
            .map(|jd| ActiveJdView {
                headline: format!("{} @ {}", jd.title, jd.company),
                level: jd
                    .level
                    .as_deref()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .unwrap_or(DEFAULT_JD_LEVEL)
                    .to_string(),
                technologies: jd
                    .technologies
                    .iter()
                    .take(TECHNOLOGY_PREVIEW_LIMIT)
                    .cloned()
                    .collect(),
            });

        Self {
            controls: Controls {
                upload_resume: idle(Channel::Resume),
                upload_jd: idle(Channel::Jd),
                delete_jd: active_jd.is_some(),
                research: research_company.is_some() && idle(Channel::Research),
                toggle_persona: snapshot.status.has_profile && idle(Channel::Persona),
            },
            top_skills: profile
                .map(|p| p.skills.iter().take(SKILL_PREVIEW_LIMIT).cloned().collect())
                .unwrap_or_default(),
            active_jd,
            research_company,
            dossier_source_count: snapshot
                .company_dossier
                .as_ref()
                .map(|d| d.resolved_source_count())
                .unwrap_or(0),
        }
    }
}
