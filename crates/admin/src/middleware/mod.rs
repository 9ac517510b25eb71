//! Request middleware for the back-office.

mod auth;

pub use auth::{RequireAdminAuth, clear_admin_session, mark_admin_session};
