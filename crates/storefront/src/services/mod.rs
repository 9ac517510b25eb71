//! External service clients.

pub mod relay;
