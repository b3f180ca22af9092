//! Session Middleware
//!
//! Middleware for requiring a valid session on protected routes.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::config::AccountsConfig;
use crate::domain::repository::{AccountRepository, SessionRepository};

/// Middleware state
#[derive(Clone)]
pub struct SessionMiddlewareState<R>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AccountsConfig>,
}

/// Middleware that requires a valid session
///
/// Unauthenticated requests get 401 with an `X-Auth-Required` marker
/// header so a frontend can redirect to its login page.
pub async fn require_session<R>(
    state: SessionMiddlewareState<R>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let token =
        platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    let session_valid = if let Some(token) = token {
        use_case.is_valid(&token).await
    } else {
        false
    };

    if !session_valid {
        return Err((StatusCode::UNAUTHORIZED, [("X-Auth-Required", "true")]).into_response());
    }

    Ok(next.run(req).await)
}
