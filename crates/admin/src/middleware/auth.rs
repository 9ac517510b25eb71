//! Authentication extractor for back-office handlers.
//!
//! The back-office has a single shared operator account gated by one
//! password; the session just remembers that the password check passed.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

/// Session key marking a logged-in operator.
const ADMIN_SESSION_KEY: &str = "admin_authenticated";

/// Extractor that requires an authenticated back-office session.
///
/// Rejects with 401 Unauthorized when the session has not passed the
/// password check.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdminAuth;

/// Rejection for unauthenticated requests.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuthRejection;

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Session is set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection)?;

        let authenticated: bool = session
            .get(ADMIN_SESSION_KEY)
            .await
            .ok()
            .flatten()
            .unwrap_or(false);

        if authenticated {
            Ok(Self)
        } else {
            Err(AdminAuthRejection)
        }
    }
}

/// Mark the session as authenticated after a successful login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn mark_admin_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.insert(ADMIN_SESSION_KEY, true).await
}

/// Clear the authentication mark (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_admin_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<bool>(ADMIN_SESSION_KEY).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Instrumented handlers record extractor arguments through Debug.
    #[test]
    fn test_extractor_is_debug() {
        assert_eq!(format!("{RequireAdminAuth:?}"), "RequireAdminAuth");
        assert_eq!(format!("{AdminAuthRejection:?}"), "AdminAuthRejection");
    }
}
