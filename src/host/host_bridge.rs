use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::dto::session_dto::SignedInUser;
use crate::error::{Error, Result};
use crate::host::window_registry::{WindowRegistry, WindowRole};
use crate::services::session_service::Session;

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowPayload {
    pub route: String,
}

/// Calls the views make into the desktop shell.
pub trait HostBridge {
    fn login(&mut self, payload: SignedInUser) -> Result<()>;
    fn logout(&mut self) -> Result<()>;
    fn user(&mut self, payload: UserPayload) -> Result<()>;
    fn open_show(&mut self, payload: ShowPayload) -> Result<Uuid>;
}

/// Shell-side implementation over the window registry.
#[derive(Debug)]
pub struct DesktopHost {
    registry: WindowRegistry,
    session: Session,
}

impl DesktopHost {
    /// Opens the main window for a stored session, the login window otherwise.
    pub fn launch(session: Session) -> Self {
        let mut registry = WindowRegistry::new();
        if session.is_signed_in() {
            registry.open(WindowRole::Main, HOME_ROUTE);
        } else {
            registry.open(WindowRole::Login, LOGIN_ROUTE);
        }
        Self { registry, session }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl HostBridge for DesktopHost {
    fn login(&mut self, payload: SignedInUser) -> Result<()> {
        self.session.sign_in(&payload)?;
        self.registry.close(WindowRole::Login);
        self.registry.open(WindowRole::Main, HOME_ROUTE);
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.session.sign_out()?;
        self.registry.close_all();
        self.registry.open(WindowRole::Login, LOGIN_ROUTE);
        Ok(())
    }

    fn user(&mut self, payload: UserPayload) -> Result<()> {
        self.session
            .update_user(payload.name.as_deref(), &payload.roles, &payload.permissions)
    }

    fn open_show(&mut self, payload: ShowPayload) -> Result<Uuid> {
        if !self.session.is_signed_in() {
            return Err(Error::Unauthorized("Sign in to open this page".to_string()));
        }
        self.registry.open(WindowRole::Show, payload.route);
        self.registry
            .get(WindowRole::Show)
            .map(|w| w.id)
            .ok_or_else(|| Error::NotFound("Show window is not open".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Window(Uuid),
    /// No desktop shell: the caller routes inside the current view.
    InApp(String),
}

/// Opens a sub-flow in a companion window when running inside the shell,
/// and falls back to in-app navigation in browser mode.
pub fn open_sub_flow(host: Option<&mut dyn HostBridge>, route: &str) -> Result<Navigation> {
    match host {
        Some(host) => {
            let id = host.open_show(ShowPayload {
                route: route.to_string(),
            })?;
            Ok(Navigation::Window(id))
        }
        None => {
            info!(route, "no desktop host, navigating in-app");
            Ok(Navigation::InApp(route.to_string()))
        }
    }
}
