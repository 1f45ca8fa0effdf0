use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::candidate::Gender;
use crate::models::language::ProficiencyLevel;
use crate::models::ResumeId;
use crate::utils::time::deserialize_optional_date;

/// `GET /resumes/:id`, and the body returned by create/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDto {
    pub id: ResumeId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub city_id: Option<i64>,
    /// Stored path of the uploaded CV document.
    #[serde(default)]
    pub cv: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

/// One part of the multipart identity payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    Text(String),
    File {
        file_name: String,
        mime: Option<String>,
        bytes: Bytes,
    },
}

impl PayloadValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PayloadValue::Text(text) => Some(text),
            PayloadValue::File { .. } => None,
        }
    }
}

/// `GET /resumes/:id/diplomes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiplomaDto {
    pub id: i64,
    #[serde(default)]
    pub level_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<NaiveDate>,
}

/// `GET /resumes/:id/experiences`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceDto {
    pub id: i64,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
}

/// `GET /resumes/:id/skills`. Rows are either pivot records carrying
/// `skill_id`, or skill records themselves, in which case `id` is the skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSkillDto {
    pub id: i64,
    #[serde(default)]
    pub skill_id: Option<i64>,
}

impl ResumeSkillDto {
    pub fn skill_ref(&self) -> i64 {
        self.skill_id.unwrap_or(self.id)
    }
}

/// `GET /resumes/:id/languages`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeLanguageDto {
    pub id: i64,
    #[serde(default)]
    pub language_id: Option<i64>,
    #[serde(default)]
    pub level: Option<ProficiencyLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_tolerates_timestamped_birth_date_and_missing_fields() {
        let dto: ResumeDto = serde_json::from_str(
            r#"{"id":12,"first_name":"Farrukh","birth_date":"1990-02-03 00:00:00","cv":null}"#,
        )
        .unwrap();
        assert_eq!(dto.id, ResumeId(12));
        assert_eq!(dto.birth_date, NaiveDate::from_ymd_opt(1990, 2, 3));
        assert!(dto.last_name.is_none());
        assert!(dto.cv.is_none());
    }

    #[test]
    fn skill_rows_resolve_either_shape() {
        let pivot: ResumeSkillDto = serde_json::from_str(r#"{"id":40,"skill_id":7}"#).unwrap();
        let plain: ResumeSkillDto = serde_json::from_str(r#"{"id":7,"name":"Rust"}"#).unwrap();
        assert_eq!(pivot.skill_ref(), 7);
        assert_eq!(plain.skill_ref(), 7);
    }
}
