use crate::wizard::entry_list::StageEntry;

/// One selected row on the skills stage. The same skill may be picked on
/// more than one row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSelection {
    pub skill_id: Option<i64>,
}

impl StageEntry for SkillSelection {
    type Field = Option<i64>;

    fn apply(&mut self, skill_id: Option<i64>) {
        self.skill_id = skill_id;
    }

    fn is_complete(&self) -> bool {
        self.skill_id.is_some()
    }
}
