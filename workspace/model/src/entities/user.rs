use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents a registered user of the symptom checker.
///
/// Passwords are stored and compared verbatim; the `Debug` output redacts
/// them so they never reach the logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    /// Date of birth as entered at registration (expected `YYYY-MM-DD`).
    pub date_of_birth: String,
    pub password: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("date_of_birth", &self.date_of_birth)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration form for a new user.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub date_of_birth: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        date_of_birth: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            date_of_birth: date_of_birth.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("date_of_birth", &self.date_of_birth)
            .finish_non_exhaustive()
    }
}

impl From<NewUser> for User {
    fn from(new_user: NewUser) -> Self {
        Self {
            username: new_user.username,
            name: new_user.name,
            date_of_birth: new_user.date_of_birth,
            password: new_user.password,
        }
    }
}

/// The part of a user record kept by a logged-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub name: String,
    pub date_of_birth: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            name: user.name,
            date_of_birth: user.date_of_birth,
        }
    }
}
