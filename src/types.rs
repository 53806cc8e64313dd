/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Staff/account roles. Serialized with the exact strings the admin console sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    ProjectManager,
    Supervisor,
    Worker,
    Client,
}

impl Default for Role {
    fn default() -> Self {
        Role::Client
    }
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::ProjectManager => "ProjectManager",
            Role::Supervisor => "Supervisor",
            Role::Worker => "Worker",
            Role::Client => "Client",
        };
        write!(f, "{}", s)
    }
}

/// Tagged record lifecycle. Archiving hides a record from default listings
/// without touching any other field; hard delete removes it entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Active,
    Archived,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Lifecycle::Active
    }
}

impl Lifecycle {
    pub fn is_archived(&self) -> bool {
        matches!(self, Lifecycle::Archived)
    }

    pub fn toggled(&self) -> Lifecycle {
        match self {
            Lifecycle::Active => Lifecycle::Archived,
            Lifecycle::Archived => Lifecycle::Active,
        }
    }
}
