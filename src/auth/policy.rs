//! Single authorization table: (role, action, resource) -> allow/deny.
//! Every role gate in the API goes through `require`; handlers never
//! compare role strings inline.

use crate::error::ApiError;
use crate::types::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Get,
    Create,
    Update,
    Archive,
    Delete,
    UpdateRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Users,
    Clients,
    Projects,
    Tasks,
    Appointments,
    Images,
}

/// The full policy. Callers are already authenticated; this decides what a
/// role may do beyond its own records. Self-scoped profile operations
/// (`/auth/me`) act on the caller's own document and are not gated here.
pub fn allows(role: Role, action: Action, resource: Resource) -> bool {
    match (resource, action) {
        // User administration is the admin's alone
        (Resource::Users, Action::List | Action::Get | Action::UpdateRole) => role.is_admin(),

        // Appointment oversight is admin-only; booking and editing are not
        (Resource::Appointments, Action::List | Action::Delete | Action::Archive) => {
            role.is_admin()
        }

        // Everything else is open to any authenticated account
        _ => true,
    }
}

pub fn require(role: Role, action: Action, resource: Resource) -> Result<(), ApiError> {
    if allows(role, action, resource) {
        Ok(())
    } else {
        Err(ApiError::forbidden("Not authorized for this operation"))
    }
}
