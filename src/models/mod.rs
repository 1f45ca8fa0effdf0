pub mod candidate;
pub mod education;
pub mod experience;
pub mod ids;
pub mod language;
pub mod skill;
pub mod taxonomy;

pub use ids::{ClientKey, ResumeId};
