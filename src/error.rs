use indexmap::IndexMap;

use crate::services::notification_service::Notice;

pub type Result<T> = std::result::Result<T, Error>;

pub const FALLBACK_MESSAGE: &str = "Something went wrong, please try again.";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Field-level rejection returned by the backend (HTTP 422).
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: IndexMap<String, Vec<String>>,
    },

    /// Client-side guard; no request was sent.
    #[error("{0}")]
    Guard(String),

    #[error("Form is invalid: {0}")]
    FormInvalid(#[from] validator::ValidationErrors),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn guard(message: impl Into<String>) -> Self {
        Error::Guard(message.into())
    }

    /// First message of the first field the backend listed.
    pub fn first_field_message(&self) -> Option<&str> {
        match self {
            Error::Validation { fields, .. } => fields
                .values()
                .flat_map(|messages| messages.iter())
                .map(String::as_str)
                .next(),
            _ => None,
        }
    }

    /// Converts the error into the toast shown to the user.
    pub fn notice(&self) -> Notice {
        match self {
            Error::Guard(msg) => Notice::warning(msg.clone()),
            Error::FormInvalid(errors) => {
                let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
                fields.sort_by(|a, b| a.0.cmp(&b.0));
                let message = fields
                    .into_iter()
                    .find_map(|(field, errs)| {
                        errs.first().map(|e| match &e.message {
                            Some(msg) => msg.to_string(),
                            None => format!("{} is invalid", field),
                        })
                    })
                    .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
                Notice::warning(message)
            }
            Error::Validation { message, .. } => {
                let text = self
                    .first_field_message()
                    .map(str::to_string)
                    .or_else(|| Some(message.clone()).filter(|m| !m.trim().is_empty()))
                    .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
                Notice::error(text)
            }
            Error::Unauthorized(msg) | Error::NotFound(msg) => Notice::error(msg.clone()),
            Error::Api { message, .. } if !message.trim().is_empty() => {
                Notice::error(message.clone())
            }
            _ => Notice::error(FALLBACK_MESSAGE),
        }
    }
}
