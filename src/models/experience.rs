use chrono::NaiveDate;

use crate::utils::validation::is_blank;
use crate::wizard::entry_list::StageEntry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub start_date: Option<NaiveDate>,
    /// Open-ended when absent.
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExperienceField {
    Company(String),
    Title(String),
    StartDate(Option<NaiveDate>),
    EndDate(Option<NaiveDate>),
}

impl StageEntry for ExperienceEntry {
    type Field = ExperienceField;

    fn apply(&mut self, field: ExperienceField) {
        match field {
            ExperienceField::Company(company) => self.company = company,
            ExperienceField::Title(title) => self.title = title,
            ExperienceField::StartDate(date) => self.start_date = date,
            ExperienceField::EndDate(date) => self.end_date = date,
        }
    }

    fn is_complete(&self) -> bool {
        !is_blank(&self.company) && !is_blank(&self.title) && self.start_date.is_some()
    }
}
