use tracing::{info, warn};

use crate::dto::batch_dto::DiplomaPayload;
use crate::error::{Error, Result};
use crate::models::education::{EducationEntry, EducationField};
use crate::models::taxonomy::Level;
use crate::models::{ClientKey, ResumeId};
use crate::services::resume_api_service::ResumeApi;
use crate::wizard::entry_list::EntryList;
use crate::wizard::MISSING_CANDIDATE;

pub const INCOMPLETE_EDUCATION: &str =
    "Add at least one complete education entry (level, name and date)";

/// Stage 2: qualifications.
#[derive(Debug, Clone, Default)]
pub struct EducationStage {
    resume_id: Option<ResumeId>,
    levels: Vec<Level>,
    entries: EntryList<EducationEntry>,
    loading: bool,
}

impl EducationStage {
    pub fn blank(resume_id: Option<ResumeId>) -> Self {
        Self {
            resume_id,
            ..Default::default()
        }
    }

    pub async fn mount(api: &ResumeApi, resume_id: Option<ResumeId>) -> Result<Self> {
        let (levels, stored) = match resume_id {
            Some(id) => tokio::try_join!(api.levels(), api.resume_diplomas(id))?,
            None => (api.levels().await?, Vec::new()),
        };
        let loaded = stored
            .into_iter()
            .map(|d| {
                (
                    Some(d.id),
                    EducationEntry {
                        level_id: d.level_id,
                        name: d.name.unwrap_or_default(),
                        date: d.date,
                    },
                )
            })
            .collect();
        Ok(Self {
            resume_id,
            levels,
            entries: EntryList::seeded(loaded),
            loading: false,
        })
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn entries(&self) -> &EntryList<EducationEntry> {
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

    pub fn update(&mut self, key: ClientKey, field: EducationField) -> bool {
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
            warn!(resume_id = %resume_id, "education submit blocked: no complete entry");
            return Err(Error::guard(INCOMPLETE_EDUCATION));
        }
        let diplomas = diploma_payload(&self.entries, resume_id);
        let count = diplomas.len();

        self.loading = true;
        let outcome = api.store_diplomas(diplomas).await;
        self.loading = false;
        outcome?;

        info!(resume_id = %resume_id, count, "education saved");
        Ok(())
    }
}

/// Complete entries only, in list order.
pub fn diploma_payload(entries: &EntryList<EducationEntry>, resume_id: ResumeId) -> Vec<DiplomaPayload> {
    entries
        .complete_entries()
        .filter_map(|e| {
            Some(DiplomaPayload {
                resume_id,
                level_id: e.level_id?,
                name: e.name.trim().to_string(),
                date: e.date?,
            })
        })
        .collect()
}
