use std::collections::HashMap;
use std::sync::Mutex;

use crate::profile::dto::Profile;
use crate::recipes::dto::MealType;

/// Per-identity scratch state, the explicit replacement for the UI's
/// ambient session storage. Created at login or guest-start, merged into
/// persistent storage at sync points, discarded at logout.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub profile: Option<Profile>,
    pub meal_choice: Option<MealType>,
    pub cook_styles: Vec<String>,
    pub cook_time_minutes: Option<u32>,
    pub ingredient_limit: Option<u32>,
    pub notes: String,
    pub recipe_styles: Vec<String>,
    pub last_recipe: Option<String>,
    /// Guards profile reconciliation to at most once per session lifetime.
    pub synced: bool,
}

/// In-memory session map keyed by identity. Lock is held only for the
/// copy-in/copy-out, never across an await.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session for the key, or a fresh default.
    pub fn get(&self, key: &str) -> Session {
        self.inner
            .lock()
            .expect("session store poisoned")
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Mutate (creating if absent) and return the updated session.
    pub fn update<F>(&self, key: &str, f: F) -> Session
    where
        F: FnOnce(&mut Session),
    {
        let mut map = self.inner.lock().expect("session store poisoned");
        let session = map.entry(key.to_string()).or_default();
        f(session);
        session.clone()
    }

    /// Drop the session at logout.
    pub fn remove(&self, key: &str) -> Option<Session> {
        self.inner
            .lock()
            .expect("session store poisoned")
            .remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_yields_default_session() {
        let store = SessionStore::new();
        let s = store.get("nobody");
        assert!(s.profile.is_none());
        assert!(!s.synced);
    }

    #[test]
    fn update_creates_and_mutates() {
        let store = SessionStore::new();
        store.update("42", |s| s.notes = "no cilantro".into());
        let s = store.get("42");
        assert_eq!(s.notes, "no cilantro");

        store.update("42", |s| s.synced = true);
        assert!(store.get("42").synced);
    }

    #[test]
    fn remove_discards_state() {
        let store = SessionStore::new();
        store.update("guest-token", |s| s.meal_choice = Some(MealType::Lunch));
        assert!(store.remove("guest-token").is_some());
        assert!(store.get("guest-token").meal_choice.is_none());
        assert!(store.remove("guest-token").is_none());
    }
}
