use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Who a request is acting as. Registered identities map to a `users` row;
/// anonymous identities are opaque per-session tokens (demo/guest mode) and
/// can never reach the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identity {
    Registered(i64),
    Anonymous(String),
}

impl Identity {
    pub fn guest() -> Self {
        Identity::Anonymous(Uuid::new_v4().to_string())
    }

    /// Parse the string form used in JWT subjects: numeric ids are
    /// registered users, anything else is an anonymous token.
    pub fn from_subject(sub: &str) -> Self {
        match sub.parse::<i64>() {
            Ok(id) => Identity::Registered(id),
            Err(_) => Identity::Anonymous(sub.to_string()),
        }
    }

    /// The numeric account id, or the guest-mode short circuit. `action`
    /// names what the caller was trying to do ("save recipes", ...).
    pub fn registered(&self, action: &'static str) -> Result<i64, AppError> {
        match self {
            Identity::Registered(id) => Ok(*id),
            Identity::Anonymous(_) => Err(AppError::GuestSession(action)),
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, Identity::Registered(_))
    }

    /// Key under which session scratch state is stored.
    pub fn session_key(&self) -> String {
        match self {
            Identity::Registered(id) => id.to_string(),
            Identity::Anonymous(token) => token.clone(),
        }
    }

    /// JWT subject form.
    pub fn subject(&self) -> String {
        self.session_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_subject_parses_as_registered() {
        assert_eq!(Identity::from_subject("42"), Identity::Registered(42));
    }

    #[test]
    fn non_numeric_subject_parses_as_anonymous() {
        let token = "550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(
            Identity::from_subject(token),
            Identity::Anonymous(token.to_string())
        );
    }

    #[test]
    fn registered_passes_through_account_id() {
        let id = Identity::Registered(7).registered("save recipes").unwrap();
        assert_eq!(id, 7);
    }

    #[test]
    fn anonymous_short_circuits_with_login_message() {
        let err = Identity::guest()
            .registered("save nutrition history")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please log in to save nutrition history."
        );
    }

    #[test]
    fn subject_round_trips() {
        let guest = Identity::guest();
        assert_eq!(Identity::from_subject(&guest.subject()), guest);
        let user = Identity::Registered(123);
        assert_eq!(Identity::from_subject(&user.subject()), user);
    }
}
