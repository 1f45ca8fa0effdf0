use tracing::{info, warn};

use crate::dto::batch_dto::SkillPayload;
use crate::error::{Error, Result};
use crate::models::skill::SkillSelection;
use crate::models::taxonomy::{Skill, SkillType};
use crate::models::{ClientKey, ResumeId};
use crate::services::resume_api_service::ResumeApi;
use crate::wizard::entry_list::EntryList;
use crate::wizard::MISSING_CANDIDATE;

pub const NO_SKILL_SELECTED: &str = "Select at least one skill";

/// Stage 4: skill selections, with an optional skill-type filter over the
/// full catalog.
#[derive(Debug, Clone, Default)]
pub struct SkillsStage {
    resume_id: Option<ResumeId>,
    skill_types: Vec<SkillType>,
    catalog: Vec<Skill>,
    type_filter: Option<i64>,
    selections: EntryList<SkillSelection>,
    loading: bool,
}

impl SkillsStage {
    pub fn blank(resume_id: Option<ResumeId>) -> Self {
        Self {
            resume_id,
            ..Default::default()
        }
    }

    pub fn with_catalog(resume_id: Option<ResumeId>, skill_types: Vec<SkillType>, catalog: Vec<Skill>) -> Self {
        Self {
            resume_id,
            skill_types,
            catalog,
            ..Default::default()
        }
    }

    pub async fn mount(api: &ResumeApi, resume_id: Option<ResumeId>) -> Result<Self> {
        let (skill_types, catalog) = tokio::try_join!(api.skill_types(), api.skills())?;
        let stored = match resume_id {
            Some(id) => api.resume_skills(id).await?,
            None => Vec::new(),
        };
        let loaded = stored
            .into_iter()
            .map(|s| {
                let server_id = s.skill_id.map(|_| s.id);
                (
                    server_id,
                    SkillSelection {
                        skill_id: Some(s.skill_ref()),
                    },
                )
            })
            .collect();
        Ok(Self {
            resume_id,
            skill_types,
            catalog,
            type_filter: None,
            selections: EntryList::seeded(loaded),
            loading: false,
        })
    }

    pub fn skill_types(&self) -> &[SkillType] {
        &self.skill_types
    }

    pub fn type_filter(&self) -> Option<i64> {
        self.type_filter
    }

    /// Narrows `options()` without refetching the catalog.
    pub fn set_type_filter(&mut self, skill_type_id: Option<i64>) {
        self.type_filter = skill_type_id;
    }

    pub fn options(&self) -> Vec<&Skill> {
        self.catalog
            .iter()
            .filter(|s| match self.type_filter {
                Some(type_id) => s.skill_type_id == Some(type_id),
                None => true,
            })
            .collect()
    }

    pub fn selections(&self) -> &EntryList<SkillSelection> {
        &self.selections
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Drops every row, leaving a single blank one.
    pub fn clear(&mut self) {
        self.selections = EntryList::default();
    }

    pub fn add(&mut self) -> ClientKey {
        self.selections.add()
    }

    pub fn select(&mut self, key: ClientKey, skill_id: Option<i64>) -> bool {
        self.selections.update(key, skill_id)
    }

    pub fn remove(&mut self, key: ClientKey) -> bool {
        self.selections.remove(key)
    }

    pub fn is_valid(&self) -> bool {
        self.selections.has_complete()
    }

    pub async fn submit(&mut self, api: &ResumeApi) -> Result<()> {
        let resume_id = self.resume_id.ok_or_else(|| Error::guard(MISSING_CANDIDATE))?;
        let skills = skill_payload(&self.selections, resume_id);
        if skills.is_empty() {
            warn!(resume_id = %resume_id, "skills submit blocked: nothing selected");
            return Err(Error::guard(NO_SKILL_SELECTED));
        }
        let count = skills.len();

        self.loading = true;
        let outcome = api.store_skills(skills).await;
        self.loading = false;
        outcome?;

        info!(resume_id = %resume_id, count, "skills saved");
        Ok(())
    }
}

/// Selected rows only. Duplicates are kept as entered.
pub fn skill_payload(selections: &EntryList<SkillSelection>, resume_id: ResumeId) -> Vec<SkillPayload> {
    selections
        .values()
        .filter_map(|s| s.skill_id)
        .map(|skill_id| SkillPayload { resume_id, skill_id })
        .collect()
}
