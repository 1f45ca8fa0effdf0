use std::fmt;

use crate::models::ResumeId;
use crate::wizard::Stage;

const BASE_PATH: &str = "/resumes/create";

/// Navigation state the wizard is reachable under. Carrying the candidate id
/// here is what lets a reload or a direct link resume an in-progress record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WizardRoute {
    pub resume_id: Option<ResumeId>,
    pub stage: Option<Stage>,
}

impl WizardRoute {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_resume(resume_id: ResumeId) -> Self {
        Self {
            resume_id: Some(resume_id),
            stage: None,
        }
    }

    /// Parses `/resumes/create`, `/resumes/create/12` and
    /// `/resumes/create/12?step=3`. Anything else is `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };
        let rest = path.trim_end_matches('/').strip_prefix(BASE_PATH)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        let resume_id = match rest.trim_start_matches('/') {
            "" => None,
            raw => Some(raw.parse::<ResumeId>().ok()?),
        };
        let stage = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter_map(|pair| pair.strip_prefix("step="))
            .filter_map(|raw| raw.parse::<usize>().ok())
            .find_map(Stage::from_index);
        Some(Self { resume_id, stage })
    }
}

impl fmt::Display for WizardRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(BASE_PATH)?;
        if let Some(id) = self.resume_id {
            write!(f, "/{}", id)?;
        }
        if let Some(stage) = self.stage.filter(|s| *s != Stage::Identity) {
            write!(f, "?step={}", stage.index())?;
        }
        Ok(())
    }
}
