use tracing::{info, warn};

use crate::dto::batch_dto::ExperiencePayload;
use crate::error::{Error, Result};
use crate::models::experience::{ExperienceEntry, ExperienceField};
use crate::models::{ClientKey, ResumeId};
use crate::services::resume_api_service::ResumeApi;
use crate::wizard::entry_list::EntryList;
use crate::wizard::MISSING_CANDIDATE;

pub const INCOMPLETE_EXPERIENCE: &str =
    "Add at least one complete experience entry (company, title and start date)";

/// Stage 3: employment history.
#[derive(Debug, Clone, Default)]
pub struct ExperienceStage {
    resume_id: Option<ResumeId>,
    entries: EntryList<ExperienceEntry>,
    loading: bool,
}

impl ExperienceStage {
    pub fn blank(resume_id: Option<ResumeId>) -> Self {
        Self {
            resume_id,
            ..Default::default()
        }
    }

    pub async fn mount(api: &ResumeApi, resume_id: Option<ResumeId>) -> Result<Self> {
        let stored = match resume_id {
            Some(id) => api.resume_experiences(id).await?,
            None => Vec::new(),
        };
        let loaded = stored
            .into_iter()
            .map(|e| {
                (
                    Some(e.id),
                    ExperienceEntry {
                        company: e.company.unwrap_or_default(),
                        title: e.title.unwrap_or_default(),
                        start_date: e.start_date,
                        end_date: e.end_date,
                    },
                )
            })
            .collect();
        Ok(Self {
            resume_id,
            entries: EntryList::seeded(loaded),
            loading: false,
        })
    }

    pub fn entries(&self) -> &EntryList<ExperienceEntry> {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Drops every row, leaving a single blank one.
    pub fn clear(&mut self) {
        self.entries = EntryList::default();
    }

    pub fn add(&mut self) -> ClientKey {
        self.entries.add()
    }

    pub fn update(&mut self, key: ClientKey, field: ExperienceField) -> bool {
        self.entries.update(key, field)
    }

    pub fn remove(&mut self, key: ClientKey) -> bool {
        self.entries.remove(key)
    }

    pub fn is_valid(&self) -> bool {
        self.entries.has_complete()
    }

    pub async fn submit(&mut self, api: &ResumeApi) -> Result<()> {
        let resume_id = self.resume_id.ok_or_else(|| Error::guard(MISSING_CANDIDATE))?;
        if !self.is_valid() {
            warn!(resume_id = %resume_id, "experience submit blocked: no complete entry");
            return Err(Error::guard(INCOMPLETE_EXPERIENCE));
        }
        let experiences = experience_payload(&self.entries, resume_id);
        let count = experiences.len();

        self.loading = true;
        let outcome = api.store_experiences(experiences).await;
        self.loading = false;
        outcome?;

        info!(resume_id = %resume_id, count, "experience saved");
        Ok(())
    }
}

pub fn experience_payload(
    entries: &EntryList<ExperienceEntry>,
    resume_id: ResumeId,
) -> Vec<ExperiencePayload> {
    entries
        .complete_entries()
        .filter_map(|e| {
            Some(ExperiencePayload {
                resume_id,
                company: e.company.trim().to_string(),
                title: e.title.trim().to_string(),
                start_date: e.start_date?,
                end_date: e.end_date,
            })
        })
        .collect()
}
