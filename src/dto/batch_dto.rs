use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::language::ProficiencyLevel;
use crate::models::ResumeId;

// Batch-replace bodies. Each request carries the complete new set for one
// candidate; dates serialize as `YYYY-MM-DD`.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiplomaPayload {
    pub resume_id: ResumeId,
    pub level_id: i64,
    pub name: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiplomasRequest {
    pub diplomas: Vec<DiplomaPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperiencePayload {
    pub resume_id: ResumeId,
    pub company: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperiencesRequest {
    pub experiences: Vec<ExperiencePayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillPayload {
    pub resume_id: ResumeId,
    pub skill_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsRequest {
    pub skills: Vec<SkillPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguagePayload {
    pub resume_id: ResumeId,
    pub language_id: Option<i64>,
    pub level: Option<ProficiencyLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagesRequest {
    pub languages: Vec<LanguagePayload>,
}
