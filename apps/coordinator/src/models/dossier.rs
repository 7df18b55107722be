use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryEstimate {
    pub title: String,
    pub location: String,
    pub currency: String,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Company research output for the employer of the active JD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyDossier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub hiring_strategy: Option<String>,
    #[serde(default)]
    pub interview_focus: Option<String>,
    #[serde(default)]
    pub salary_estimates: Vec<SalaryEstimate>,
    #[serde(default)]
    pub competitors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_news: Option<String>,
    /// Source URLs; the research generator emits `null` for unresolved ones.
    #[serde(default)]
    pub sources: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CompanyDossier {
    /// Number of sources that actually resolved to a reference.
    pub fn resolved_source_count(&self) -> usize {
        self.sources
            .iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .count()
    }
}
