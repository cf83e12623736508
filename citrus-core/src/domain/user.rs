//! User profile domain model

use serde::{Deserialize, Serialize};

/// Identity of an authenticated user, as reported by the session signal.
///
/// The engine never authenticates anyone itself; it only consumes this value
/// to decide between the guest store and the remote gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl UserProfile {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = UserProfile::new("u-1", "test@example.com", "Test User");
        assert_eq!(user.id, "u-1");
        assert_eq!(user.name, "Test User");
    }
}
