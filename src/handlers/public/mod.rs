// Public handlers: no bearer token required. Registration and login only.
pub mod auth;
