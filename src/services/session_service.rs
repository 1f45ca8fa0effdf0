use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::dto::session_dto::SignedInUser;
use crate::error::Result;

pub const TOKEN_KEY: &str = "token";
pub const ROLES_KEY: &str = "roles";
pub const PERMISSIONS_KEY: &str = "permissions";
pub const USER_KEY: &str = "user";

/// Persistent key/value store for session data. Values are JSON, the whole
/// map is rewritten on every change.
#[derive(Debug, Default)]
pub struct LocalStore {
    path: Option<PathBuf>,
    entries: Map<String, JsonValue>,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read(&path) {
            Ok(raw) if raw.iter().all(|b| b.is_ascii_whitespace()) => Map::new(),
            Ok(raw) => serde_json::from_slice(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.entries
            .insert(key.to_string(), serde_json::to_value(value)?);
        self.flush()
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, serde_json::to_vec_pretty(&self.entries)?)?;
        }
        Ok(())
    }
}

/// Shared session context handed to every component that needs the token
/// or the cached roles and permissions.
#[derive(Clone, Debug, Default)]
pub struct Session {
    store: Arc<RwLock<LocalStore>>,
}

impl Session {
    pub fn new(store: LocalStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(LocalStore::in_memory())
    }

    pub fn token(&self) -> Option<String> {
        self.store
            .read()
            .expect("session store lock poisoned")
            .get::<String>(TOKEN_KEY)
            .filter(|t| !t.trim().is_empty())
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn user_name(&self) -> Option<String> {
        self.store
            .read()
            .expect("session store lock poisoned")
            .get::<String>(USER_KEY)
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.list(ROLES_KEY).iter().any(|r| r == name)
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.list(PERMISSIONS_KEY).iter().any(|p| p == name)
    }

    fn list(&self, key: &str) -> Vec<String> {
        self.store
            .read()
            .expect("session store lock poisoned")
            .get::<Vec<String>>(key)
            .unwrap_or_default()
    }

    pub fn sign_in(&self, user: &SignedInUser) -> Result<()> {
        let mut store = self.store.write().expect("session store lock poisoned");
        store.set(TOKEN_KEY, &user.token)?;
        store.set(ROLES_KEY, &user.roles)?;
        store.set(PERMISSIONS_KEY, &user.permissions)?;
        match &user.name {
            Some(name) => store.set(USER_KEY, name)?,
            None => store.remove(USER_KEY)?,
        }
        tracing::info!(roles = user.roles.len(), "session signed in");
        Ok(())
    }

    /// Updates the cached profile without touching the token.
    pub fn update_user(&self, name: Option<&str>, roles: &[String], permissions: &[String]) -> Result<()> {
        let mut store = self.store.write().expect("session store lock poisoned");
        store.set(ROLES_KEY, &roles)?;
        store.set(PERMISSIONS_KEY, &permissions)?;
        if let Some(name) = name {
            store.set(USER_KEY, &name)?;
        }
        Ok(())
    }

    pub fn sign_out(&self) -> Result<()> {
        let mut store = self.store.write().expect("session store lock poisoned");
        for key in [TOKEN_KEY, ROLES_KEY, PERMISSIONS_KEY, USER_KEY] {
            store.remove(key)?;
        }
        tracing::info!("session signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn hr_user() -> SignedInUser {
        SignedInUser {
            token: "tok-123".into(),
            name: Some("Recruiter".into()),
            roles: vec!["hr".into()],
            permissions: vec!["resumes.create".into(), "resumes.update".into()],
        }
    }

    #[test]
    fn typed_accessors_read_cached_session() {
        let session = Session::in_memory();
        assert!(session.token().is_none());
        assert!(!session.has_role("hr"));

        session.sign_in(&hr_user()).unwrap();
        assert_eq!(session.token().as_deref(), Some("tok-123"));
        assert!(session.has_role("hr"));
        assert!(!session.has_role("admin"));
        assert!(session.has_permission("resumes.update"));
        assert_eq!(session.user_name().as_deref(), Some("Recruiter"));

        session.sign_out().unwrap();
        assert!(!session.is_signed_in());
        assert!(!session.has_permission("resumes.update"));
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = std::env::temp_dir().join(format!("resume-intake-{}.json", Uuid::new_v4()));

        let session = Session::new(LocalStore::open(&path).unwrap());
        session.sign_in(&hr_user()).unwrap();
        drop(session);

        let reopened = Session::new(LocalStore::open(&path).unwrap());
        assert_eq!(reopened.token().as_deref(), Some("tok-123"));
        assert!(reopened.has_role("hr"));

        std::fs::remove_file(&path).ok();
    }
}
