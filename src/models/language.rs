use serde::{Deserialize, Serialize};
use std::fmt;

use crate::wizard::entry_list::StageEntry;

/// CEFR proficiency, stored by the backend as its ordinal 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ProficiencyLevel {
    A1 = 1,
    A2 = 2,
    B1 = 3,
    B2 = 4,
    C1 = 5,
    C2 = 6,
}

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 6] = [
        ProficiencyLevel::A1,
        ProficiencyLevel::A2,
        ProficiencyLevel::B1,
        ProficiencyLevel::B2,
        ProficiencyLevel::C1,
        ProficiencyLevel::C2,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            ProficiencyLevel::A1 => "A1",
            ProficiencyLevel::A2 => "A2",
            ProficiencyLevel::B1 => "B1",
            ProficiencyLevel::B2 => "B2",
            ProficiencyLevel::C1 => "C1",
            ProficiencyLevel::C2 => "C2",
        }
    }
}

impl TryFrom<u8> for ProficiencyLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ProficiencyLevel::ALL
            .into_iter()
            .find(|level| level.ordinal() == value)
            .ok_or_else(|| format!("Invalid proficiency level: {}", value))
    }
}

impl From<ProficiencyLevel> for u8 {
    fn from(level: ProficiencyLevel) -> Self {
        level.ordinal()
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageEntry {
    pub language_id: Option<i64>,
    pub level: Option<ProficiencyLevel>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LanguageField {
    Language(Option<i64>),
    Level(Option<ProficiencyLevel>),
}

impl StageEntry for LanguageEntry {
    type Field = LanguageField;

    fn apply(&mut self, field: LanguageField) {
        match field {
            LanguageField::Language(language_id) => self.language_id = language_id,
            LanguageField::Level(level) => self.level = level,
        }
    }

    // Not used as a submit gate on this stage.
    fn is_complete(&self) -> bool {
        self.language_id.is_some() && self.level.is_some()
    }
}
