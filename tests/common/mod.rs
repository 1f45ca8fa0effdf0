#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use resume_intake::dto::session_dto::SignedInUser;
use resume_intake::services::resume_api_service::ResumeApi;
use resume_intake::services::session_service::Session;
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;

pub const TOKEN: &str = "test-token";
pub const TAKEN_EMAIL: &str = "taken@example.com";
pub const INVALID_PHONE: &str = "000";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedField {
    pub name: String,
    pub file_name: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub resume_id: i64,
    pub method_override: Option<String>,
    pub fields: Vec<UploadedField>,
}

impl Upload {
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .iter()
            .find(|f| f.name == name && f.file_name.is_none())
            .map(|f| String::from_utf8_lossy(&f.content).into_owned())
    }

    pub fn files(&self, name: &str) -> Vec<&UploadedField> {
        self.fields
            .iter()
            .filter(|f| f.name == name && f.file_name.is_some())
            .collect()
    }
}

/// In-memory stand-in for the recruitment REST backend. Batch endpoints
/// overwrite the stored set for the candidate.
#[derive(Debug, Default)]
pub struct FakeState {
    next_resume_id: i64,
    pub resumes: BTreeMap<i64, JsonValue>,
    pub diplomas: BTreeMap<i64, Vec<JsonValue>>,
    pub experiences: BTreeMap<i64, Vec<JsonValue>>,
    pub skills: BTreeMap<i64, Vec<JsonValue>>,
    pub languages: BTreeMap<i64, Vec<JsonValue>>,
    pub requests: Vec<RecordedRequest>,
    pub uploads: Vec<Upload>,
    pub batches: Vec<(String, JsonValue)>,
    /// Answer the next batch store with this status and body.
    pub fail_next_store: Option<(StatusCode, JsonValue)>,
}

impl FakeState {
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn batches_for(&self, endpoint: &str) -> Vec<JsonValue> {
        self.batches
            .iter()
            .filter(|(e, _)| e == endpoint)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeBackend {
    pub base_url: String,
    state: Shared,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState {
            next_resume_id: 100,
            ..Default::default()
        }));

        let app = Router::new()
            .route("/api/cities", get(cities))
            .route("/api/levels", get(levels))
            .route("/api/skills/type", get(skill_types))
            .route("/api/skills", get(skills))
            .route("/api/languages", get(languages))
            .route("/api/resumes", post(create_resume))
            .route("/api/resumes/:id", get(show_resume).post(update_resume))
            .route("/api/resumes/:id/diplomes", get(resume_diplomas))
            .route("/api/resumes/:id/experiences", get(resume_experiences))
            .route("/api/resumes/:id/skills", get(resume_skills))
            .route("/api/resumes/:id/languages", get(resume_languages))
            .route("/api/diplomas", post(store_diplomas))
            .route("/api/experiences", post(store_experiences))
            .route("/api/skills/resume/store", post(store_skills))
            .route("/api/languages/resume/store", post(store_languages))
            .layer(middleware::from_fn_with_state(state.clone(), record_and_authorize))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend crashed");
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake backend state poisoned")
    }

    pub fn session(signed_in: bool) -> Session {
        let session = Session::in_memory();
        if signed_in {
            session
                .sign_in(&SignedInUser {
                    token: TOKEN.to_string(),
                    name: Some("Recruiter".to_string()),
                    roles: vec!["hr".to_string()],
                    permissions: vec!["resumes.create".to_string()],
                })
                .expect("sign in");
        }
        session
    }

    pub fn api(&self) -> ResumeApi {
        self.api_with(Self::session(true))
    }

    pub fn api_with(&self, session: Session) -> ResumeApi {
        ResumeApi::new(&self.base_url, session, Duration::from_secs(5)).expect("api client")
    }

    pub fn seed_resume(&self, resume: JsonValue) -> i64 {
        let mut state = self.state();
        state.next_resume_id += 1;
        let id = state.next_resume_id;
        let mut resume = resume;
        resume["id"] = json!(id);
        state.resumes.insert(id, resume);
        id
    }
}

async fn record_and_authorize(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    {
        let mut guard = state.lock().expect("fake backend state poisoned");
        guard.requests.push(RecordedRequest {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(str::to_string),
            authorization: authorization.clone(),
        });
    }
    let expected = format!("Bearer {}", TOKEN);
    if authorization.as_deref() != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthenticated."}))).into_response();
    }
    next.run(req).await
}

async fn cities() -> Json<JsonValue> {
    Json(json!([{"id": 1, "name": "Dushanbe"}, {"id": 2, "name": "Khujand"}]))
}

async fn levels() -> Json<JsonValue> {
    Json(json!({"data": [{"id": 1, "name": "Bachelor"}, {"id": 2, "name": "Master"}]}))
}

async fn skill_types() -> Json<JsonValue> {
    Json(json!([{"id": 10, "name": "Technical"}, {"id": 20, "name": "Soft"}]))
}

async fn skills() -> Json<JsonValue> {
    Json(json!({"data": [
        {"id": 1, "name": "Rust", "skill_type_id": 10},
        {"id": 2, "name": "Negotiation", "skill_type_id": 20},
        {"id": 3, "name": "SQL", "skill_type_id": 10}
    ]}))
}

async fn languages() -> Json<JsonValue> {
    Json(json!([{"id": 1, "name": "Tajik"}, {"id": 2, "name": "Russian"}, {"id": 3, "name": "English"}]))
}

async fn read_fields(mut multipart: Multipart) -> Vec<UploadedField> {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content = field.bytes().await.expect("multipart bytes").to_vec();
        fields.push(UploadedField {
            name,
            file_name,
            content,
        });
    }
    fields
}

fn apply_fields(resume: &mut JsonValue, fields: &[UploadedField]) {
    for field in fields {
        match &field.file_name {
            Some(file_name) => {
                resume[field.name.as_str()] = json!(format!("storage/resumes/{}", file_name));
            }
            None => {
                let text = String::from_utf8_lossy(&field.content).into_owned();
                resume[field.name.as_str()] = match text.parse::<i64>() {
                    Ok(n) if field.name.ends_with("_id") => json!(n),
                    _ => json!(text),
                };
            }
        }
    }
}

fn field_is(fields: &[UploadedField], name: &str, value: &str) -> bool {
    fields
        .iter()
        .any(|f| f.name == name && f.content == value.as_bytes())
}

/// 422 body written by hand so the field order on the wire is fixed.
fn rejected_fields(fields: &[UploadedField]) -> Option<Response> {
    let mut errors = Vec::new();
    if field_is(fields, "phone", INVALID_PHONE) {
        errors.push(r#""phone":["The phone format is invalid."]"#);
    }
    if field_is(fields, "email", TAKEN_EMAIL) {
        errors.push(r#""email":["The email has already been taken."]"#);
    }
    if errors.is_empty() {
        return None;
    }
    let body = format!(
        r#"{{"message":"The given data was invalid.","errors":{{{}}}}}"#,
        errors.join(",")
    );
    Some(
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
    )
}

async fn create_resume(State(state): State<Shared>, multipart: Multipart) -> Response {
    let fields = read_fields(multipart).await;
    if let Some(rejection) = rejected_fields(&fields) {
        return rejection;
    }
    let mut guard = state.lock().expect("fake backend state poisoned");
    guard.next_resume_id += 1;
    let id = guard.next_resume_id;
    let mut resume = json!({"id": id});
    apply_fields(&mut resume, &fields);
    guard.resumes.insert(id, resume.clone());
    guard.uploads.push(Upload {
        resume_id: id,
        method_override: None,
        fields,
    });
    (StatusCode::CREATED, Json(json!({"data": resume}))).into_response()
}

async fn update_resume(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
    multipart: Multipart,
) -> Response {
    let fields = read_fields(multipart).await;
    if let Some(rejection) = rejected_fields(&fields) {
        return rejection;
    }
    let mut guard = state.lock().expect("fake backend state poisoned");
    let Some(resume) = guard.resumes.get_mut(&id) else {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Resume not found"}))).into_response();
    };
    apply_fields(resume, &fields);
    let resume = resume.clone();
    guard.uploads.push(Upload {
        resume_id: id,
        method_override: query.get("_method").cloned(),
        fields,
    });
    Json(json!({"data": resume})).into_response()
}

async fn show_resume(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let guard = state.lock().expect("fake backend state poisoned");
    match guard.resumes.get(&id) {
        Some(resume) => Json(json!({"data": resume})).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Resume not found"}))).into_response(),
    }
}

fn list_for(map: &BTreeMap<i64, Vec<JsonValue>>, id: i64) -> Json<JsonValue> {
    Json(json!(map.get(&id).cloned().unwrap_or_default()))
}

async fn resume_diplomas(State(state): State<Shared>, Path(id): Path<i64>) -> Json<JsonValue> {
    list_for(&state.lock().expect("fake backend state poisoned").diplomas, id)
}

async fn resume_experiences(State(state): State<Shared>, Path(id): Path<i64>) -> Json<JsonValue> {
    list_for(&state.lock().expect("fake backend state poisoned").experiences, id)
}

async fn resume_skills(State(state): State<Shared>, Path(id): Path<i64>) -> Json<JsonValue> {
    list_for(&state.lock().expect("fake backend state poisoned").skills, id)
}

async fn resume_languages(State(state): State<Shared>, Path(id): Path<i64>) -> Json<JsonValue> {
    list_for(&state.lock().expect("fake backend state poisoned").languages, id)
}

enum Collection {
    Diplomas,
    Experiences,
    Skills,
    Languages,
}

/// Replaces the stored set for every candidate named in the batch.
fn store(state: &Shared, collection: Collection, key: &str, body: JsonValue) -> Response {
    let mut guard = state.lock().expect("fake backend state poisoned");
    guard.batches.push((key.to_string(), body.clone()));
    if let Some((status, error)) = guard.fail_next_store.take() {
        return (status, Json(error)).into_response();
    }

    let items = body[key].as_array().cloned().unwrap_or_default();
    let mut grouped: BTreeMap<i64, Vec<JsonValue>> = BTreeMap::new();
    for (idx, item) in items.into_iter().enumerate() {
        let resume_id = item["resume_id"].as_i64().unwrap_or_default();
        let mut stored = item;
        stored["id"] = json!(1000 + idx as i64);
        grouped.entry(resume_id).or_default().push(stored);
    }

    let target = match collection {
        Collection::Diplomas => &mut guard.diplomas,
        Collection::Experiences => &mut guard.experiences,
        Collection::Skills => &mut guard.skills,
        Collection::Languages => &mut guard.languages,
    };
    for (resume_id, rows) in grouped {
        target.insert(resume_id, rows);
    }
    Json(json!({"message": "Saved"})).into_response()
}

async fn store_diplomas(State(state): State<Shared>, Json(body): Json<JsonValue>) -> Response {
    store(&state, Collection::Diplomas, "diplomas", body)
}

async fn store_experiences(State(state): State<Shared>, Json(body): Json<JsonValue>) -> Response {
    store(&state, Collection::Experiences, "experiences", body)
}

async fn store_skills(State(state): State<Shared>, Json(body): Json<JsonValue>) -> Response {
    store(&state, Collection::Skills, "skills", body)
}

async fn store_languages(State(state): State<Shared>, Json(body): Json<JsonValue>) -> Response {
    store(&state, Collection::Languages, "languages", body)
}
