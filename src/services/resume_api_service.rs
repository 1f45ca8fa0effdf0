use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use crate::config::Config;
use crate::dto::batch_dto::{
    DiplomaPayload, DiplomasRequest, ExperiencePayload, ExperiencesRequest, LanguagePayload,
    LanguagesRequest, SkillPayload, SkillsRequest,
};
use crate::dto::envelope_dto::{ApiErrorBody, Envelope};
use crate::dto::resume_dto::{
    DiplomaDto, ExperienceDto, PayloadValue, ResumeDto, ResumeLanguageDto, ResumeSkillDto,
};
use crate::error::{Error, Result};
use crate::models::taxonomy::{City, Language, Level, Skill, SkillType};
use crate::models::ResumeId;
use crate::services::session_service::Session;

/// Typed client for the recruitment REST backend. Every request carries the
/// session's bearer token when one is present.
#[derive(Clone, Debug)]
pub struct ResumeApi {
    client: Client,
    base_url: Url,
    session: Session,
}

impl ResumeApi {
    pub fn new(base_url: &str, session: Session, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            client,
            base_url: Url::parse(&base)?,
            session,
        })
    }

    pub fn from_config(config: &Config, session: Session) -> Result<Self> {
        Self::new(&config.api_base_url, session, config.request_timeout)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a JSON request and decodes the (optionally wrapped) body.
    pub async fn request_json<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send_json(method, path, body).await?;
        decode(response).await
    }

    async fn send_json<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "api request");
        let mut request = self
            .authorize(self.client.request(method, url))
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        check(request.send().await?).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_json::<(), T>(Method::GET, path, None).await
    }

    async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send_json(Method::POST, path, Some(body)).await?;
        Ok(())
    }

    async fn post_multipart(&self, url: Url, fields: Vec<(String, PayloadValue)>) -> Result<Response> {
        let Some(token) = self.session.token() else {
            return Err(Error::Unauthorized(
                "You must be signed in to upload files".to_string(),
            ));
        };
        let form = multipart_form(fields)?;
        debug!(%url, "api multipart request");
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;
        check(response).await
    }

    pub async fn cities(&self) -> Result<Vec<City>> {
        self.get("cities").await
    }

    pub async fn resume(&self, id: ResumeId) -> Result<ResumeDto> {
        self.get(&format!("resumes/{}", id)).await
    }

    pub async fn create_resume(&self, fields: Vec<(String, PayloadValue)>) -> Result<ResumeDto> {
        let url = self.endpoint("resumes")?;
        let response = self.post_multipart(url, fields).await?;
        decode(response).await
    }

    /// Multipart update through `POST` with the `_method=PUT` override.
    pub async fn update_resume(&self, id: ResumeId, fields: Vec<(String, PayloadValue)>) -> Result<ResumeId> {
        let mut url = self.endpoint(&format!("resumes/{}", id))?;
        url.query_pairs_mut().append_pair("_method", "PUT");
        self.post_multipart(url, fields).await?;
        Ok(id)
    }

    pub async fn levels(&self) -> Result<Vec<Level>> {
        self.get("levels").await
    }

    pub async fn resume_diplomas(&self, id: ResumeId) -> Result<Vec<DiplomaDto>> {
        self.get(&format!("resumes/{}/diplomes", id)).await
    }

    pub async fn store_diplomas(&self, diplomas: Vec<DiplomaPayload>) -> Result<()> {
        self.post_unit("diplomas", &DiplomasRequest { diplomas }).await
    }

    pub async fn resume_experiences(&self, id: ResumeId) -> Result<Vec<ExperienceDto>> {
        self.get(&format!("resumes/{}/experiences", id)).await
    }

    pub async fn store_experiences(&self, experiences: Vec<ExperiencePayload>) -> Result<()> {
        self.post_unit("experiences", &ExperiencesRequest { experiences })
            .await
    }

    pub async fn skill_types(&self) -> Result<Vec<SkillType>> {
        self.get("skills/type").await
    }

    pub async fn skills(&self) -> Result<Vec<Skill>> {
        self.get("skills").await
    }

    pub async fn resume_skills(&self, id: ResumeId) -> Result<Vec<ResumeSkillDto>> {
        self.get(&format!("resumes/{}/skills", id)).await
    }

    pub async fn store_skills(&self, skills: Vec<SkillPayload>) -> Result<()> {
        self.post_unit("skills/resume/store", &SkillsRequest { skills })
            .await
    }

    pub async fn languages(&self) -> Result<Vec<Language>> {
        self.get("languages").await
    }

    pub async fn resume_languages(&self, id: ResumeId) -> Result<Vec<ResumeLanguageDto>> {
        self.get(&format!("resumes/{}/languages", id)).await
    }

    pub async fn store_languages(&self, languages: Vec<LanguagePayload>) -> Result<()> {
        self.post_unit("languages/resume/store", &LanguagesRequest { languages })
            .await
    }
}

fn multipart_form(fields: Vec<(String, PayloadValue)>) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = match value {
            PayloadValue::Text(text) => form.text(name, text),
            PayloadValue::File {
                file_name,
                mime,
                bytes,
            } => {
                let mut part = Part::bytes(bytes.to_vec()).file_name(file_name);
                if let Some(mime) = mime {
                    part = part.mime_str(&mime)?;
                }
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
    Ok(envelope.into_inner())
}

/// Maps non-success statuses onto the error taxonomy.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let raw = response.text().await.unwrap_or_default();
    let body: ApiErrorBody = serde_json::from_str(&raw).unwrap_or_default();
    let message = body.message().map(str::to_string);
    error!(%url, status = status.as_u16(), "api request failed");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(
            message.unwrap_or_else(|| "Your session has expired, please sign in again".to_string()),
        ),
        StatusCode::NOT_FOUND => {
            Error::NotFound(message.unwrap_or_else(|| "Resource not found".to_string()))
        }
        StatusCode::UNPROCESSABLE_ENTITY => Error::Validation {
            message: message.unwrap_or_default(),
            fields: body.errors,
        },
        _ => Error::Api {
            status: status.as_u16(),
            message: message.unwrap_or_default(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_under_base_path() {
        let api = ResumeApi::new("http://localhost:8000/api", Session::in_memory(), Duration::from_secs(5))
            .unwrap();
        assert_eq!(
            api.endpoint("resumes/7/diplomes").unwrap().as_str(),
            "http://localhost:8000/api/resumes/7/diplomes"
        );
        assert_eq!(
            api.endpoint("/skills/type").unwrap().as_str(),
            "http://localhost:8000/api/skills/type"
        );
    }
}
