use tracing::info;

use crate::dto::resume_dto::PayloadValue;
use crate::error::Result;
use crate::models::candidate::{FileEntry, IdentityForm};
use crate::models::taxonomy::City;
use crate::models::ResumeId;
use crate::services::resume_api_service::ResumeApi;
use crate::utils::time::format_date;
use crate::utils::validation::{non_blank, validate};

/// Stage 1: the candidate record itself. The first successful save allocates
/// the identifier every later stage hangs off.
#[derive(Debug, Clone, Default)]
pub struct IdentityStage {
    resume_id: Option<ResumeId>,
    form: IdentityForm,
    cities: Vec<City>,
    loading: bool,
}

impl IdentityStage {
    pub fn blank(resume_id: Option<ResumeId>) -> Self {
        Self {
            resume_id,
            ..Default::default()
        }
    }

    pub async fn mount(api: &ResumeApi, resume_id: Option<ResumeId>) -> Result<Self> {
        let (cities, form) = match resume_id {
            Some(id) => {
                let (cities, resume) = tokio::try_join!(api.cities(), api.resume(id))?;
                (cities, IdentityForm::from(resume))
            }
            None => (api.cities().await?, IdentityForm::default()),
        };
        Ok(Self {
            resume_id,
            form,
            cities,
            loading: false,
        })
    }

    pub fn resume_id(&self) -> Option<ResumeId> {
        self.resume_id
    }

    pub fn form(&self) -> &IdentityForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut IdentityForm {
        &mut self.form
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replaces whatever is attached with a newly chosen CV.
    pub fn pick_cv(&mut self, file: FileEntry) {
        self.form.cv = vec![file];
    }

    pub fn pick_cover_letter(&mut self, file: FileEntry) {
        self.form.cover_letter = vec![file];
    }

    /// Creates the candidate on first save, updates it afterwards.
    pub async fn submit(&mut self, api: &ResumeApi) -> Result<ResumeId> {
        validate(&self.form)?;
        let fields = identity_payload(&self.form);

        self.loading = true;
        let outcome = match self.resume_id {
            Some(id) => api.update_resume(id, fields).await,
            None => api.create_resume(fields).await.map(|created| created.id),
        };
        self.loading = false;

        let id = outcome?;
        if self.resume_id.is_none() {
            info!(resume_id = %id, "candidate created");
        } else {
            info!(resume_id = %id, "candidate updated");
        }
        self.resume_id = Some(id);
        Ok(id)
    }
}

/// Flattens the form into multipart fields. Existing attachments are left
/// out so the backend keeps them; only newly picked files are uploaded.
pub fn identity_payload(form: &IdentityForm) -> Vec<(String, PayloadValue)> {
    let mut fields = Vec::new();
    let mut text = |name: &str, value: Option<String>| {
        if let Some(value) = value {
            fields.push((name.to_string(), PayloadValue::Text(value)));
        }
    };

    text("first_name", Some(form.first_name.clone()));
    text("last_name", Some(form.last_name.clone()));
    text("email", non_blank(form.email.as_deref()).map(str::to_string));
    text("phone", non_blank(form.phone.as_deref()).map(str::to_string));
    text("address", non_blank(form.address.as_deref()).map(str::to_string));
    text("birth_date", form.birth_date.map(format_date));
    text("gender", form.gender.map(|g| g.as_str().to_string()));
    text("city_id", form.city_id.map(|id| id.to_string()));

    for (name, files) in [("cv", &form.cv), ("cover_letter", &form.cover_letter)] {
        for file in files {
            if let FileEntry::Picked {
                file_name,
                mime,
                bytes,
            } = file
            {
                fields.push((
                    name.to_string(),
                    PayloadValue::File {
                        file_name: file_name.clone(),
                        mime: mime.clone(),
                        bytes: bytes.clone(),
                    },
                ));
            }
        }
    }

    fields
}
