use tracing::info;

use crate::dto::batch_dto::LanguagePayload;
use crate::error::{Error, Result};
use crate::models::language::{LanguageEntry, LanguageField, ProficiencyLevel};
use crate::models::taxonomy::Language;
use crate::models::{ClientKey, ResumeId};
use crate::services::resume_api_service::ResumeApi;
use crate::wizard::entry_list::EntryList;
use crate::wizard::MISSING_CANDIDATE;

/// Stage 5, the last one. Rows are sent as entered, empty fields included.
#[derive(Debug, Clone, Default)]
pub struct LanguagesStage {
    resume_id: Option<ResumeId>,
    languages: Vec<Language>,
    entries: EntryList<LanguageEntry>,
    loading: bool,
}

impl LanguagesStage {
    pub fn blank(resume_id: Option<ResumeId>) -> Self {
        Self {
            resume_id,
            ..Default::default()
        }
    }

    pub async fn mount(api: &ResumeApi, resume_id: Option<ResumeId>) -> Result<Self> {
        let (languages, stored) = match resume_id {
            Some(id) => tokio::try_join!(api.languages(), api.resume_languages(id))?,
            None => (api.languages().await?, Vec::new()),
        };
        let loaded = stored
            .into_iter()
            .map(|l| {
                (
                    Some(l.id),
                    LanguageEntry {
                        language_id: l.language_id,
                        level: l.level,
                    },
                )
            })
            .collect();
        Ok(Self {
            resume_id,
            languages,
            entries: EntryList::seeded(loaded),
            loading: false,
        })
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn levels(&self) -> [ProficiencyLevel; 6] {
        ProficiencyLevel::ALL
    }

    pub fn entries(&self) -> &EntryList<LanguageEntry> {
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

    pub fn update(&mut self, key: ClientKey, field: LanguageField) -> bool {
        self.entries.update(key, field)
    }

    pub fn remove(&mut self, key: ClientKey) -> bool {
        self.entries.remove(key)
    }

    pub async fn submit(&mut self, api: &ResumeApi) -> Result<()> {
        let resume_id = self.resume_id.ok_or_else(|| Error::guard(MISSING_CANDIDATE))?;
        let languages = language_payload(&self.entries, resume_id);
        let count = languages.len();

        self.loading = true;
        let outcome = api.store_languages(languages).await;
        self.loading = false;
        outcome?;

        info!(resume_id = %resume_id, count, "languages saved");
        Ok(())
    }
}

pub fn language_payload(entries: &EntryList<LanguageEntry>, resume_id: ResumeId) -> Vec<LanguagePayload> {
    entries
        .values()
        .map(|e| LanguagePayload {
            resume_id,
            language_id: e.language_id,
            level: e.level,
        })
        .collect()
}
