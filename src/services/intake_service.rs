use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::candidate::{FileEntry, Gender};
use crate::models::education::EducationField;
use crate::models::experience::ExperienceField;
use crate::models::language::{LanguageField, ProficiencyLevel};
use crate::models::{ClientKey, ResumeId};
use crate::wizard::{Stage, Transition, Wizard};

/// Everything needed to walk one candidate through the wizard unattended.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeDocument {
    #[serde(default)]
    pub identity: IdentityInput,
    #[serde(default)]
    pub education: Vec<EducationInput>,
    #[serde(default)]
    pub experiences: Vec<ExperienceInput>,
    #[serde(default)]
    pub skills: Vec<i64>,
    #[serde(default)]
    pub languages: Vec<LanguageInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub city_id: Option<i64>,
    pub cv_path: Option<PathBuf>,
    pub cover_letter_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationInput {
    pub level_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceInput {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageInput {
    pub language_id: Option<i64>,
    pub level: Option<ProficiencyLevel>,
}

/// Fills and saves every stage from the active one to the last. An empty
/// list in the document keeps whatever the stage loaded.
pub async fn run_intake(wizard: &mut Wizard, document: IntakeDocument) -> Result<ResumeId> {
    let cv = match &document.identity.cv_path {
        Some(path) => Some(FileEntry::from_path(path).await?),
        None => None,
    };
    let cover_letter = match &document.identity.cover_letter_path {
        Some(path) => Some(FileEntry::from_path(path).await?),
        None => None,
    };

    loop {
        let stage = wizard.current_stage();
        match stage {
            Stage::Identity => fill_identity(wizard, &document.identity, cv.clone(), cover_letter.clone())?,
            Stage::Education => fill_education(wizard, &document.education)?,
            Stage::Experience => fill_experience(wizard, &document.experiences)?,
            Stage::Skills => fill_skills(wizard, &document.skills)?,
            Stage::Languages => fill_languages(wizard, &document.languages)?,
        }

        match wizard.next().await {
            Transition::Advanced(next) => info!(from = stage.title(), to = next.title(), "stage saved"),
            Transition::Finished => break,
            Transition::Stayed => {
                warn!(stage = stage.title(), "stage was not saved");
                return Err(Error::guard(format!("{} could not be saved", stage.title())));
            }
        }
    }

    wizard
        .resume_id()
        .ok_or_else(|| Error::guard("Candidate was never created"))
}

fn not_mounted(stage: Stage) -> Error {
    Error::guard(format!("{} stage is not mounted", stage.title()))
}

fn fill_identity(
    wizard: &mut Wizard,
    input: &IdentityInput,
    cv: Option<FileEntry>,
    cover_letter: Option<FileEntry>,
) -> Result<()> {
    let stage = wizard.identity_mut().ok_or_else(|| not_mounted(Stage::Identity))?;
    let form = stage.form_mut();
    if let Some(first_name) = &input.first_name {
        form.first_name = first_name.clone();
    }
    if let Some(last_name) = &input.last_name {
        form.last_name = last_name.clone();
    }
    if input.email.is_some() {
        form.email = input.email.clone();
    }
    if input.phone.is_some() {
        form.phone = input.phone.clone();
    }
    if input.address.is_some() {
        form.address = input.address.clone();
    }
    if input.birth_date.is_some() {
        form.birth_date = input.birth_date;
    }
    if input.gender.is_some() {
        form.gender = input.gender;
    }
    if input.city_id.is_some() {
        form.city_id = input.city_id;
    }
    if let Some(cv) = cv {
        stage.pick_cv(cv);
    }
    if let Some(letter) = cover_letter {
        stage.pick_cover_letter(letter);
    }
    Ok(())
}

/// Keys for `count` rows on a freshly cleared list.
fn row_keys(count: usize, mut add: impl FnMut() -> ClientKey) -> Vec<ClientKey> {
    let mut keys = vec![ClientKey::FIRST];
    while keys.len() < count {
        keys.push(add());
    }
    keys
}

fn fill_education(wizard: &mut Wizard, rows: &[EducationInput]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let stage = wizard.education_mut().ok_or_else(|| not_mounted(Stage::Education))?;
    stage.clear();
    let keys = row_keys(rows.len(), || stage.add());
    for (key, row) in keys.into_iter().zip(rows) {
        stage.update(key, EducationField::Level(row.level_id));
        stage.update(key, EducationField::Name(row.name.clone()));
        stage.update(key, EducationField::Date(row.date));
    }
    Ok(())
}

fn fill_experience(wizard: &mut Wizard, rows: &[ExperienceInput]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let stage = wizard.experience_mut().ok_or_else(|| not_mounted(Stage::Experience))?;
    stage.clear();
    let keys = row_keys(rows.len(), || stage.add());
    for (key, row) in keys.into_iter().zip(rows) {
        stage.update(key, ExperienceField::Company(row.company.clone()));
        stage.update(key, ExperienceField::Title(row.title.clone()));
        stage.update(key, ExperienceField::StartDate(row.start_date));
        stage.update(key, ExperienceField::EndDate(row.end_date));
    }
    Ok(())
}

fn fill_skills(wizard: &mut Wizard, skill_ids: &[i64]) -> Result<()> {
    if skill_ids.is_empty() {
        return Ok(());
    }
    let stage = wizard.skills_mut().ok_or_else(|| not_mounted(Stage::Skills))?;
    stage.clear();
    let keys = row_keys(skill_ids.len(), || stage.add());
    for (key, skill_id) in keys.into_iter().zip(skill_ids) {
        stage.select(key, Some(*skill_id));
    }
    Ok(())
}

fn fill_languages(wizard: &mut Wizard, rows: &[LanguageInput]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let stage = wizard.languages_mut().ok_or_else(|| not_mounted(Stage::Languages))?;
    stage.clear();
    let keys = row_keys(rows.len(), || stage.add());
    for (key, row) in keys.into_iter().zip(rows) {
        stage.update(key, LanguageField::Language(row.language_id));
        stage.update(key, LanguageField::Level(row.level));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_parses_with_sparse_sections() {
        let doc: IntakeDocument = serde_json::from_str(
            r#"{
                "identity": {"first_name": "Amina", "last_name": "Rahimova", "birth_date": "1994-05-07"},
                "skills": [1, 3],
                "languages": [{"language_id": 2, "level": 4}]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.identity.birth_date, NaiveDate::from_ymd_opt(1994, 5, 7));
        assert!(doc.education.is_empty());
        assert_eq!(doc.skills, vec![1, 3]);
        assert_eq!(doc.languages[0].level, Some(ProficiencyLevel::B2));
    }

    #[test]
    fn row_keys_cover_requested_count() {
        let mut next = 1u32;
        let keys = row_keys(3, || {
            next += 1;
            ClientKey::new(next)
        });
        assert_eq!(keys, vec![ClientKey::new(1), ClientKey::new(2), ClientKey::new(3)]);
    }
}
