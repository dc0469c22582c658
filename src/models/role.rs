use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// The two workflow roles. Managers author stage data, Chairmen decide gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Manager,
    Chairman,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Manager => write!(f, "Manager"),
            Role::Chairman => write!(f, "Chairman"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manager" => Ok(Role::Manager),
            "chairman" => Ok(Role::Chairman),
            _ => anyhow::bail!("Invalid role: {s}. Use: manager, chairman"),
        }
    }
}

/// The authenticated caller of a workflow operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn manager(id: u64) -> Self {
        Self::new(UserId::new(id), Role::Manager)
    }

    pub fn chairman(id: u64) -> Self {
        Self::new(UserId::new(id), Role::Chairman)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str_case_insensitive() {
        assert_eq!("Manager".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!("CHAIRMAN".parse::<Role>().unwrap(), Role::Chairman);
        assert!("clerk".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serializes_as_name() {
        let json = serde_json::to_string(&Role::Chairman).unwrap();
        assert_eq!(json, "\"Chairman\"");
    }
}
