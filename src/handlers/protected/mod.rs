// Protected handlers: the bearer-auth middleware runs first and injects
// `AuthUser`; admin-only operations check the policy table on top.
pub mod appointments;
pub mod auth;
pub mod clients;
pub mod images;
pub mod projects;
pub mod tasks;
