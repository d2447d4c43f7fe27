//! Authentication route handlers.
//!
//! Login and registration failures re-render the form with an inline error
//! message; they never surface as HTTP errors.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

/// Query parameters carrying the post-login redirect target.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub store_name: String,
    pub error: Option<String>,
    pub next: Option<String>,
    pub username: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub store_name: String,
    pub error: Option<String>,
    pub username: String,
    pub email: String,
}

/// Only follow local redirect targets; anything else goes home.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
) -> LoginTemplate {
    LoginTemplate {
        store_name: state.config().store_name.clone(),
        error: None,
        next: query.next,
        username: String::new(),
    }
}

/// Handle login form submission.
///
/// On success the user identity lands in the session and the browser is
/// sent to the `next` target (sanitized to local paths) or the home page.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            let current_user = CurrentUser {
                id: user.id,
                username: user.username,
            };
            set_current_user(&session, &current_user).await?;

            Ok(Redirect::to(safe_next(form.next.as_deref())).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username, "Login failed");
            Ok(LoginTemplate {
                store_name: state.config().store_name.clone(),
                error: Some("Invalid username or password. Please try again.".to_owned()),
                next: form.next,
                username: form.username,
            }
            .into_response())
        }
        Err(other) => Err(other.into()),
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(State(state): State<AppState>) -> RegisterTemplate {
    RegisterTemplate {
        store_name: state.config().store_name.clone(),
        error: None,
        username: String::new(),
        email: String::new(),
    }
}

/// Handle registration form submission.
///
/// Success redirects to the login page; every expected failure re-renders
/// the form with an inline message and the submitted values kept.
#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    match AuthService::new(state.pool())
        .register(&form.username, &form.email, &form.password1, &form.password2)
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "New account registered");
            Ok(Redirect::to("/auth/login").into_response())
        }
        Err(err) => {
            let message = match err {
                AuthError::PasswordMismatch => "Passwords do not match".to_owned(),
                AuthError::UsernameTaken => "Username already taken".to_owned(),
                AuthError::EmailTaken => "Email already registered".to_owned(),
                AuthError::WeakPassword(msg) => msg,
                AuthError::InvalidUsername(e) => e.to_string(),
                AuthError::InvalidEmail(e) => e.to_string(),
                other => return Err(other.into()),
            };

            Ok(RegisterTemplate {
                store_name: state.config().store_name.clone(),
                error: Some(message),
                username: form.username,
                email: form.email,
            }
            .into_response())
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the user from the session and destroys the session itself.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    session.flush().await?;

    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_allows_local_paths() {
        assert_eq!(safe_next(Some("/cart")), "/cart");
        assert_eq!(safe_next(Some("/invoice")), "/invoice");
    }

    #[test]
    fn test_safe_next_rejects_external_targets() {
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("cart")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
