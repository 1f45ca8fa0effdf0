pub mod education_stage;
pub mod entry_list;
pub mod experience_stage;
pub mod identity_stage;
pub mod languages_stage;
pub mod orchestrator;
pub mod route;
pub mod skills_stage;

pub use orchestrator::{StageView, Transition, Wizard};
pub use route::WizardRoute;

pub(crate) const MISSING_CANDIDATE: &str = "Save the candidate's personal details first";

/// The five intake stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Identity,
    Education,
    Experience,
    Skills,
    Languages,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Identity,
        Stage::Education,
        Stage::Experience,
        Stage::Skills,
        Stage::Languages,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Clamped at the last stage.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(Stage::Languages)
    }

    /// Clamped at the first stage.
    pub fn previous(self) -> Self {
        self.index()
            .checked_sub(1)
            .and_then(Self::from_index)
            .unwrap_or(Stage::Identity)
    }

    pub fn is_last(self) -> bool {
        self == Stage::Languages
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Identity => "Personal details",
            Stage::Education => "Education",
            Stage::Experience => "Experience",
            Stage::Skills => "Skills",
            Stage::Languages => "Languages",
        }
    }
}
