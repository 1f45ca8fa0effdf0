pub mod config;
pub mod dto;
pub mod error;
pub mod host;
pub mod models;
pub mod services;
pub mod utils;
pub mod wizard;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::services::notification_service::ToastLog;
use crate::services::resume_api_service::ResumeApi;
use crate::services::session_service::{LocalStore, Session};
use crate::wizard::{Wizard, WizardRoute};

/// Shared handles a wizard is opened with.
#[derive(Clone)]
pub struct AppState {
    pub session: Session,
    pub api: ResumeApi,
    pub toasts: Arc<ToastLog>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let session = Session::new(LocalStore::open(&config.session_store_path)?);
        let api = ResumeApi::from_config(config, session.clone())?;
        Ok(Self {
            session,
            api,
            toasts: Arc::new(ToastLog::new()),
        })
    }

    pub async fn open_wizard(&self, route: WizardRoute) -> Wizard {
        Wizard::open(self.api.clone(), self.toasts.clone(), route).await
    }
}
