//! Application state for the wellbeing audit API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::flow::{Collaborators, SessionStore};

/// Shared application state.
///
/// Contains the loaded configuration and the live funnel sessions.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    sessions: Arc<SessionStore>,
}

impl AppState {
    /// Creates state backed by the simulated collaborators.
    pub fn new(config: ConfigLoader) -> Self {
        let collaborators = Collaborators::simulated(&config);
        Self::with_collaborators(config, collaborators)
    }

    /// Creates state backed by the given collaborators.
    pub fn with_collaborators(config: ConfigLoader, collaborators: Collaborators) -> Self {
        let config = Arc::new(config);
        Self {
            sessions: SessionStore::new(Arc::clone(&config), collaborators),
            config,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the session store.
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_new_state_has_no_sessions() {
        let state = AppState::new(ConfigLoader::default());
        assert!(state.sessions().is_empty());
        assert_eq!(state.config().model().currency.code, "CHF");
    }
}
