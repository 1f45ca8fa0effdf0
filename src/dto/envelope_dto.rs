use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The backend wraps some responses as `{ "data": ... }` and returns others
/// bare. Both shapes are accepted here so call sites see only `T`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

/// Error body: `{ "message": "...", "errors": { "field": ["..."] } }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Kept in the order the server listed the fields.
    #[serde(default)]
    pub errors: IndexMap<String, Vec<String>>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}
