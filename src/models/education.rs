use chrono::NaiveDate;

use crate::utils::validation::is_blank;
use crate::wizard::entry_list::StageEntry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationEntry {
    pub level_id: Option<i64>,
    pub name: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EducationField {
    Level(Option<i64>),
    Name(String),
    Date(Option<NaiveDate>),
}

impl StageEntry for EducationEntry {
    type Field = EducationField;

    fn apply(&mut self, field: EducationField) {
        match field {
            EducationField::Level(level_id) => self.level_id = level_id,
            EducationField::Name(name) => self.name = name,
            EducationField::Date(date) => self.date = date,
        }
    }

    fn is_complete(&self) -> bool {
        self.level_id.is_some() && !is_blank(&self.name) && self.date.is_some()
    }
}
