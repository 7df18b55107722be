pub mod backend;
pub mod dossier;
pub mod profile;

pub use backend::{FileSelection, ResearchResult, UploadResult};
pub use dossier::CompanyDossier;
pub use profile::{ProfileData, ProfileStatus};
