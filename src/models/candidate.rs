use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::{Validate, ValidationError};

use crate::dto::resume_dto::ResumeDto;
use crate::error::Result;
use crate::utils::validation::{required, validate_optional_email};

/// One slot of a file-list field. Existing attachments are display-only and
/// are never re-uploaded; the backend keeps them unless a new file is picked.
#[derive(Debug, Clone, PartialEq)]
pub enum FileEntry {
    Existing {
        url: String,
        name: String,
    },
    Picked {
        file_name: String,
        mime: Option<String>,
        bytes: Bytes,
    },
}

impl FileEntry {
    /// Builds the display reference for a stored attachment path.
    pub fn existing(url: impl Into<String>) -> Self {
        let url = url.into();
        let name = url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(url.as_str())
            .to_string();
        FileEntry::Existing { url, name }
    }

    pub fn picked(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let mime = guess_mime(&file_name).map(str::to_string);
        FileEntry::Picked {
            file_name,
            mime,
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        Ok(FileEntry::picked(file_name, data))
    }

    pub fn is_new(&self) -> bool {
        matches!(self, FileEntry::Picked { .. })
    }

    pub fn display_name(&self) -> &str {
        match self {
            FileEntry::Existing { name, .. } => name,
            FileEntry::Picked { file_name, .. } => file_name,
        }
    }
}

fn guess_mime(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "txt" => Some("text/plain"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Editable identity data for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct IdentityForm {
    #[validate(custom(function = "validate_first_name"))]
    pub first_name: String,
    #[validate(custom(function = "validate_last_name"))]
    pub last_name: String,
    #[validate(custom(function = "validate_optional_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub city_id: Option<i64>,
    pub cv: Vec<FileEntry>,
    pub cover_letter: Vec<FileEntry>,
}

fn validate_first_name(value: &str) -> std::result::Result<(), ValidationError> {
    required(value, "First name is required")
}

fn validate_last_name(value: &str) -> std::result::Result<(), ValidationError> {
    required(value, "Last name is required")
}

impl From<ResumeDto> for IdentityForm {
    fn from(dto: ResumeDto) -> Self {
        Self {
            first_name: dto.first_name.unwrap_or_default(),
            last_name: dto.last_name.unwrap_or_default(),
            email: dto.email,
            phone: dto.phone,
            address: dto.address,
            birth_date: dto.birth_date,
            gender: dto.gender,
            city_id: dto.city_id,
            cv: dto.cv.into_iter().map(FileEntry::existing).collect(),
            cover_letter: dto.cover_letter.into_iter().map(FileEntry::existing).collect(),
        }
    }
}
