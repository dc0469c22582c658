//! Resolution of the acting user
//!
//! The workflow never authenticates anyone itself; it asks an
//! [`IdentityProvider`] for the current [`Actor`] and trusts the answer.

use crate::config::UserEntry;
use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{Actor, UserId};

pub trait IdentityProvider {
    fn current_actor(&self) -> WorkflowResult<Actor>;
}

/// Always answers with the same actor.
#[derive(Debug, Clone, Copy)]
pub struct StaticIdentity(pub Actor);

impl IdentityProvider for StaticIdentity {
    fn current_actor(&self) -> WorkflowResult<Actor> {
        Ok(self.0)
    }
}

/// Configured users, looked up by username
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<UserEntry>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserEntry>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> &[UserEntry] {
        &self.users
    }

    pub fn find(&self, username: &str) -> Option<&UserEntry> {
        self.users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username.trim()))
    }

    pub fn by_id(&self, id: UserId) -> Option<&UserEntry> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Resolve `username` to an actor. Unknown users are `Forbidden`.
    pub fn resolve(&self, username: &str) -> WorkflowResult<Actor> {
        self.find(username)
            .map(|u| Actor::new(u.id, u.role))
            .ok_or_else(|| WorkflowError::Forbidden(format!("unknown user '{username}'")))
    }

    /// Identity provider for one named user of this directory.
    pub fn session(&self, username: impl Into<String>) -> Session<'_> {
        Session {
            directory: self,
            username: username.into(),
        }
    }
}

/// A username bound to a directory, resolved on demand
#[derive(Debug, Clone)]
pub struct Session<'a> {
    directory: &'a UserDirectory,
    username: String,
}

impl IdentityProvider for Session<'_> {
    fn current_actor(&self) -> WorkflowResult<Actor> {
        self.directory.resolve(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ErrorKind;
    use crate::models::Role;

    #[test]
    fn test_default_users_resolve() {
        let directory = UserDirectory::new(Config::default().users);

        let manager = directory.session("manager").current_actor().unwrap();
        assert_eq!(manager, Actor::manager(1));

        let chairman = directory.resolve("Chairman").unwrap();
        assert_eq!(chairman.role, Role::Chairman);
        assert_eq!(directory.by_id(UserId::new(2)).unwrap().username, "chairman");
    }

    #[test]
    fn test_unknown_user_is_forbidden() {
        let directory = UserDirectory::new(Config::default().users);
        let err = directory.session("mallory").current_actor().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_static_identity() {
        let identity = StaticIdentity(Actor::chairman(9));
        assert_eq!(identity.current_actor().unwrap().id, UserId::new(9));
    }
}
