use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WindowRole {
    Login,
    Main,
    /// Child window hosting a sub-page such as an interview screen.
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Open,
    Focused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEntry {
    pub id: Uuid,
    pub role: WindowRole,
    pub route: String,
    pub state: WindowState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    Opened(WindowRole, Uuid),
    Focused(WindowRole, Uuid),
    Navigated(WindowRole, Uuid),
    Closed(WindowRole, Uuid),
}

/// At most one window per role. Opening a role that is already open focuses
/// it and points it at the new route.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: BTreeMap<WindowRole, WindowEntry>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: WindowRole) -> Option<&WindowEntry> {
        self.windows.get(&role)
    }

    pub fn is_open(&self, role: WindowRole) -> bool {
        self.windows.contains_key(&role)
    }

    pub fn focused(&self) -> Option<&WindowEntry> {
        self.windows
            .values()
            .find(|w| w.state == WindowState::Focused)
    }

    pub fn open_roles(&self) -> Vec<WindowRole> {
        self.windows.keys().copied().collect()
    }

    pub fn open(&mut self, role: WindowRole, route: impl Into<String>) -> Vec<WindowEvent> {
        let route = route.into();
        let mut events = Vec::new();
        match self.windows.get_mut(&role) {
            Some(existing) => {
                if existing.route != route {
                    existing.route = route;
                    events.push(WindowEvent::Navigated(role, existing.id));
                }
            }
            None => {
                let entry = WindowEntry {
                    id: Uuid::new_v4(),
                    role,
                    route,
                    state: WindowState::Open,
                };
                let id = entry.id;
                info!(?role, route = %entry.route, "window opened");
                self.windows.insert(role, entry);
                events.push(WindowEvent::Opened(role, id));
            }
        }
        if let Some(event) = self.focus(role) {
            events.push(event);
        }
        events
    }

    pub fn focus(&mut self, role: WindowRole) -> Option<WindowEvent> {
        if !self.windows.contains_key(&role) {
            return None;
        }
        for window in self.windows.values_mut() {
            window.state = if window.role == role {
                WindowState::Focused
            } else {
                WindowState::Open
            };
        }
        self.windows
            .get(&role)
            .map(|w| WindowEvent::Focused(role, w.id))
    }

    pub fn close(&mut self, role: WindowRole) -> Option<WindowEvent> {
        let closed = self.windows.remove(&role)?;
        info!(?role, "window closed");
        Some(WindowEvent::Closed(role, closed.id))
    }

    pub fn close_all(&mut self) -> Vec<WindowEvent> {
        let roles = self.open_roles();
        roles.into_iter().filter_map(|role| self.close(role)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopening_a_role_focuses_the_existing_window() {
        let mut registry = WindowRegistry::new();
        let first = registry.open(WindowRole::Show, "/interviews/3");
        let id = registry.get(WindowRole::Show).unwrap().id;
        assert_eq!(first[0], WindowEvent::Opened(WindowRole::Show, id));

        registry.open(WindowRole::Main, "/");
        assert_eq!(registry.focused().unwrap().role, WindowRole::Main);

        let second = registry.open(WindowRole::Show, "/interviews/4");
        assert_eq!(
            second,
            vec![
                WindowEvent::Navigated(WindowRole::Show, id),
                WindowEvent::Focused(WindowRole::Show, id),
            ]
        );
        assert_eq!(registry.get(WindowRole::Show).unwrap().route, "/interviews/4");
        assert_eq!(registry.focused().unwrap().role, WindowRole::Show);
    }

    #[test]
    fn close_and_focus_on_missing_roles_are_no_ops() {
        let mut registry = WindowRegistry::new();
        assert_eq!(registry.focus(WindowRole::Main), None);
        assert_eq!(registry.close(WindowRole::Main), None);

        registry.open(WindowRole::Login, "/login");
        registry.open(WindowRole::Main, "/");
        assert_eq!(registry.close_all().len(), 2);
        assert!(registry.open_roles().is_empty());
    }
}
