//! HTTP Handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::cookie::CookieAttributes;

use crate::application::config::AccountsConfig;
use crate::application::{
    CheckSessionUseCase, IdentityClaim, RedeemVerificationUseCase, RegisterInput, RegisterUseCase,
    SignInInput, SignInUseCase, SignOutUseCase,
};
use crate::domain::mailer::Mailer;
use crate::domain::repository::{
    AccountRepository, SessionRepository, VerificationTokenRepository,
};
use crate::error::{AccountError, AccountResult};
use crate::presentation::dto::{
    IdentityResponse, LoginRequest, LoginResponse, ProfileResponse, RegisterRequest,
    RegisterResponse, RegisteredUser, SessionStatusResponse, VerifyEmailQuery,
    VerifyEmailResponse,
};

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountsAppState<R, M>
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
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AccountsConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<RegisterRequest>,
) -> AccountResult<impl IntoResponse>
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
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let account = use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered. Please check your email to verify your account."
                .to_string(),
            user: RegisteredUser {
                id: account.account_id.to_string(),
                email: account.email.as_str().to_string(),
                created_at: account.created_at,
            },
        }),
    ))
}

// ============================================================================
// Verify Email
// ============================================================================

/// GET /verify-email?token=...
pub async fn verify_email<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Query(query): Query<VerifyEmailQuery>,
) -> AccountResult<Json<VerifyEmailResponse>>
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
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or(AccountError::InvalidToken)?;

    let use_case = RedeemVerificationUseCase::new(state.repo.clone());
    use_case.execute(&token).await?;

    Ok(Json(VerifyEmailResponse {
        message: "Email verified successfully!".to_string(),
    }))
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<LoginRequest>,
) -> AccountResult<impl IntoResponse>
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
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = build_session_cookie(&state.config, &output.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            user: IdentityResponse::from(output.identity),
        }),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /logout
pub async fn logout<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
) -> AccountResult<impl IntoResponse>
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
    let token = extract_session_cookie(&headers, &state.config.session_cookie_name);

    if let Some(token) = token {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // Ignore errors - just clear the cookie
        let _ = use_case.execute(&token).await;
    }

    let cookie = build_clear_cookie(&state.config);

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /session
pub async fn session_status<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
) -> AccountResult<Json<SessionStatusResponse>>
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
    let token = extract_session_cookie(&headers, &state.config.session_cookie_name);

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    let session_info = if let Some(token) = token {
        use_case.execute(&token).await.ok()
    } else {
        None
    };

    match session_info {
        Some((session, account)) => Ok(Json(SessionStatusResponse {
            authenticated: true,
            user: Some(IdentityResponse::from(IdentityClaim::from(&account))),
            expires_at: Some(session.expires_at),
        })),
        None => Ok(Json(SessionStatusResponse {
            authenticated: false,
            user: None,
            expires_at: None,
        })),
    }
}

// ============================================================================
// Profile (requires authentication)
// ============================================================================

/// GET /profile
pub async fn profile<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
) -> AccountResult<Json<ProfileResponse>>
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
    let token = extract_session_cookie(&headers, &state.config.session_cookie_name)
        .ok_or(AccountError::SessionInvalid)?;

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
    let (_, account) = use_case.execute(&token).await?;

    Ok(Json(ProfileResponse {
        id: account.account_id.to_string(),
        name: account.display_name,
        email: account.email.as_str().to_string(),
        image: account.image,
        email_verified_at: account.email_verified_at,
        created_at: account.created_at,
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn extract_session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    platform::cookie::extract_cookie(headers, name)
}

fn cookie_attributes(config: &AccountsConfig) -> CookieAttributes {
    CookieAttributes {
        secure: config.cookie_secure,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.session_ttl_secs()),
    }
}

fn build_session_cookie(config: &AccountsConfig, token: &str) -> HeaderValue {
    platform::cookie::to_header_value(&platform::cookie::session_cookie(
        &config.session_cookie_name,
        token,
        &cookie_attributes(config),
    ))
}

fn build_clear_cookie(config: &AccountsConfig) -> HeaderValue {
    platform::cookie::to_header_value(&platform::cookie::expired_cookie(
        &config.session_cookie_name,
        &cookie_attributes(config),
    ))
}
