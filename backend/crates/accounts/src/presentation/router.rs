//! Accounts Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::mailer::Mailer;
use crate::domain::repository::{
    AccountRepository, SessionRepository, VerificationTokenRepository,
};
use crate::infra::mailer::AppMailer;
use crate::infra::postgres::PgAccountRepository;
use crate::presentation::handlers::{self, AccountsAppState};

/// Create the accounts router with PostgreSQL repository
pub fn accounts_router(
    repo: PgAccountRepository,
    mailer: AppMailer,
    config: AccountsConfig,
) -> Router {
    accounts_router_generic(repo, mailer, config)
}

/// Create a generic accounts router for any repository/mailer implementation
pub fn accounts_router_generic<R, M>(repo: R, mailer: M, config: AccountsConfig) -> Router
where
    R: AccountRepository
        + VerificationTokenRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let state = AccountsAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };

    Router::new()
        .route("/register", post(handlers::register::<R, M>))
        .route("/verify-email", get(handlers::verify_email::<R, M>))
        .route("/login", post(handlers::login::<R, M>))
        .route("/logout", post(handlers::logout::<R, M>))
        .route("/session", get(handlers::session_status::<R, M>))
        .route("/profile", get(handlers::profile::<R, M>))
        .with_state(state)
}
