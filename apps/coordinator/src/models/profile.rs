use serde::{Deserialize, Serialize};

/// Whether a profile exists and whether persona mode is active for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStatus {
    #[serde(default)]
    pub has_profile: bool,
    #[serde(default)]
    pub profile_mode: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Extracted summary of the active job description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JdSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    /// intern | entry | mid | senior | staff | principal
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// Snapshot of the built knowledge graph. Always replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    #[serde(default)]
    pub identity: Option<Identity>,
    #[serde(default)]
    pub experience_count: u32,
    #[serde(default)]
    pub project_count: u32,
    #[serde(default)]
    pub node_count: u32,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, rename = "hasActiveJD")]
    pub has_active_jd: bool,
    #[serde(default, rename = "activeJD")]
    pub active_jd: Option<JdSummary>,
}

impl ProfileData {
    /// Enforces `active_jd.is_some() == has_active_jd`.
    ///
    /// A summary sent while the flag is off is dropped, and a flag without a
    /// summary is turned off. Returns true if anything was changed.
    pub fn normalize_active_jd(&mut self) -> bool {
        match (self.has_active_jd, self.active_jd.is_some()) {
            (true, false) => {
                self.has_active_jd = false;
                true
            }
            (false, true) => {
                self.active_jd = None;
                true
            }
            _ => false,
        }
    }

    /// Company of the active JD, if one is set and non-blank.
    pub fn active_company(&self) -> Option<&str> {
        self.active_jd
            .as_ref()
            .filter(|_| self.has_active_jd)
            .map(|jd| jd.company.trim())
            .filter(|company| !company.is_empty())
    }
}
