use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::models::ResumeId;
use crate::services::notification_service::{Notice, Notifier};
use crate::services::resume_api_service::ResumeApi;
use crate::wizard::education_stage::EducationStage;
use crate::wizard::experience_stage::ExperienceStage;
use crate::wizard::identity_stage::IdentityStage;
use crate::wizard::languages_stage::LanguagesStage;
use crate::wizard::skills_stage::SkillsStage;
use crate::wizard::{Stage, WizardRoute};

pub const STAGE_SAVED: &str = "Saved successfully";
pub const INTAKE_COMPLETE: &str = "Resume saved successfully";

/// The one stage controller currently mounted.
#[derive(Debug, Clone)]
pub enum StageView {
    Identity(IdentityStage),
    Education(EducationStage),
    Experience(ExperienceStage),
    Skills(SkillsStage),
    Languages(LanguagesStage),
}

impl StageView {
    pub fn stage(&self) -> Stage {
        match self {
            StageView::Identity(_) => Stage::Identity,
            StageView::Education(_) => Stage::Education,
            StageView::Experience(_) => Stage::Experience,
            StageView::Skills(_) => Stage::Skills,
            StageView::Languages(_) => Stage::Languages,
        }
    }

    pub fn is_loading(&self) -> bool {
        match self {
            StageView::Identity(s) => s.is_loading(),
            StageView::Education(s) => s.is_loading(),
            StageView::Experience(s) => s.is_loading(),
            StageView::Skills(s) => s.is_loading(),
            StageView::Languages(s) => s.is_loading(),
        }
    }

    pub async fn mount(api: &ResumeApi, stage: Stage, resume_id: Option<ResumeId>) -> Result<Self> {
        Ok(match stage {
            Stage::Identity => StageView::Identity(IdentityStage::mount(api, resume_id).await?),
            Stage::Education => StageView::Education(EducationStage::mount(api, resume_id).await?),
            Stage::Experience => {
                StageView::Experience(ExperienceStage::mount(api, resume_id).await?)
            }
            Stage::Skills => StageView::Skills(SkillsStage::mount(api, resume_id).await?),
            Stage::Languages => StageView::Languages(LanguagesStage::mount(api, resume_id).await?),
        })
    }

    /// Empty controller used when loading a stage failed.
    pub fn blank(stage: Stage, resume_id: Option<ResumeId>) -> Self {
        match stage {
            Stage::Identity => StageView::Identity(IdentityStage::blank(resume_id)),
            Stage::Education => StageView::Education(EducationStage::blank(resume_id)),
            Stage::Experience => StageView::Experience(ExperienceStage::blank(resume_id)),
            Stage::Skills => StageView::Skills(SkillsStage::blank(resume_id)),
            Stage::Languages => StageView::Languages(LanguagesStage::blank(resume_id)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The stage saved and the wizard moved on.
    Advanced(Stage),
    /// The last stage saved.
    Finished,
    /// The submit was rejected; edits are kept and the stage is unchanged.
    Stayed,
}

/// Walks one candidate record through the five stages. Persistence lives in
/// the stages; the wizard only tracks where it is and which id it carries.
pub struct Wizard {
    api: ResumeApi,
    notifier: Arc<dyn Notifier>,
    route: WizardRoute,
    current: Stage,
    view: StageView,
}

impl Wizard {
    pub async fn open(api: ResumeApi, notifier: Arc<dyn Notifier>, route: WizardRoute) -> Self {
        let stage = route.stage.unwrap_or(Stage::Identity);
        let mut wizard = Self {
            api,
            notifier,
            route,
            current: stage,
            view: StageView::blank(stage, route.resume_id),
        };
        wizard.show(stage).await;
        wizard
    }

    pub fn current_stage(&self) -> Stage {
        self.current
    }

    pub fn route(&self) -> WizardRoute {
        self.route
    }

    pub fn resume_id(&self) -> Option<ResumeId> {
        self.route.resume_id
    }

    pub fn view(&self) -> &StageView {
        &self.view
    }

    pub fn identity_mut(&mut self) -> Option<&mut IdentityStage> {
        match &mut self.view {
            StageView::Identity(s) => Some(s),
            _ => None,
        }
    }

    pub fn education_mut(&mut self) -> Option<&mut EducationStage> {
        match &mut self.view {
            StageView::Education(s) => Some(s),
            _ => None,
        }
    }

    pub fn experience_mut(&mut self) -> Option<&mut ExperienceStage> {
        match &mut self.view {
            StageView::Experience(s) => Some(s),
            _ => None,
        }
    }

    pub fn skills_mut(&mut self) -> Option<&mut SkillsStage> {
        match &mut self.view {
            StageView::Skills(s) => Some(s),
            _ => None,
        }
    }

    pub fn languages_mut(&mut self) -> Option<&mut LanguagesStage> {
        match &mut self.view {
            StageView::Languages(s) => Some(s),
            _ => None,
        }
    }

    /// Submits the active stage and moves forward only if the save succeeded.
    /// Every error is turned into a notice here.
    pub async fn next(&mut self) -> Transition {
        let outcome = match &mut self.view {
            StageView::Identity(s) => s.submit(&self.api).await.map(Some),
            StageView::Education(s) => s.submit(&self.api).await.map(|_| None),
            StageView::Experience(s) => s.submit(&self.api).await.map(|_| None),
            StageView::Skills(s) => s.submit(&self.api).await.map(|_| None),
            StageView::Languages(s) => s.submit(&self.api).await.map(|_| None),
        };

        let created = match outcome {
            Ok(created) => created,
            Err(e) => {
                self.notifier.notify(e.notice());
                return Transition::Stayed;
            }
        };

        if let Some(id) = created {
            if self.route.resume_id.is_none() {
                self.route.resume_id = Some(id);
                info!(resume_id = %id, route = %self.route, "route now carries candidate");
            }
        }

        if self.current.is_last() {
            self.notifier.notify(Notice::success(INTAKE_COMPLETE));
            return Transition::Finished;
        }

        self.notifier.notify(Notice::success(STAGE_SAVED));
        self.advance().await;
        Transition::Advanced(self.current)
    }

    async fn advance(&mut self) {
        let target = self.current.next();
        self.show(target).await;
    }

    /// Goes back one stage without saving.
    pub async fn retreat(&mut self) -> Stage {
        let target = self.current.previous();
        if target != self.current {
            self.show(target).await;
        }
        self.current
    }

    /// Step-header jump. Skips the save gate entirely.
    pub async fn jump_to(&mut self, stage: Stage) -> Stage {
        if stage != self.current {
            self.show(stage).await;
        }
        self.current
    }

    async fn show(&mut self, stage: Stage) {
        let resume_id = self.route.resume_id;
        self.view = match StageView::mount(&self.api, stage, resume_id).await {
            Ok(view) => view,
            Err(e) => {
                self.notifier.notify(e.notice());
                StageView::blank(stage, resume_id)
            }
        };
        self.current = stage;
        self.route.stage = Some(stage);
        info!(stage = stage.title(), index = stage.index(), "stage mounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notification_service::{MockNotifier, NoticeLevel};
    use crate::services::session_service::Session;
    use std::time::Duration;

    fn unreachable_api() -> ResumeApi {
        ResumeApi::new("http://127.0.0.1:1/api", Session::in_memory(), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn failed_loads_fall_back_to_blank_stages() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.level == NoticeLevel::Error)
            .times(2)
            .returning(|_| ());

        let mut wizard = Wizard::open(unreachable_api(), Arc::new(notifier), WizardRoute::new()).await;
        assert_eq!(wizard.current_stage(), Stage::Identity);

        assert_eq!(wizard.jump_to(Stage::Skills).await, Stage::Skills);
        let skills = wizard.skills_mut().expect("skills stage mounted");
        assert_eq!(skills.selections().len(), 1);
        assert_eq!(wizard.route().stage, Some(Stage::Skills));
    }

    #[tokio::test]
    async fn rejected_identity_submit_stays_put_without_network() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.level == NoticeLevel::Error)
            .times(1)
            .returning(|_| ());
        notifier
            .expect_notify()
            .withf(|n| n.level == NoticeLevel::Warning)
            .times(1)
            .returning(|_| ());

        let mut wizard = Wizard::open(unreachable_api(), Arc::new(notifier), WizardRoute::new()).await;
        assert_eq!(wizard.next().await, Transition::Stayed);
        assert_eq!(wizard.current_stage(), Stage::Identity);
        assert_eq!(wizard.resume_id(), None);
    }

    #[tokio::test]
    async fn retreat_at_first_stage_is_a_no_op() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(1).returning(|_| ());

        let mut wizard = Wizard::open(unreachable_api(), Arc::new(notifier), WizardRoute::new()).await;
        assert_eq!(wizard.retreat().await, Stage::Identity);
    }
}
