//! Authentication route handlers.
//!
//! Handles operator login and logout against the credential file.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::AuthError;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

fn error_message(code: &str) -> String {
    match code {
        "credentials" => "Nom d'utilisateur ou mot de passe incorrect",
        "unavailable" => "Connexion impossible pour le moment, réessayez plus tard",
        "session" => "Votre session n'a pas pu être ouverte, réessayez",
        _ => "Une erreur est survenue",
    }
    .to_string()
}

fn success_message(code: &str) -> Option<String> {
    match code {
        "logout" => Some("Vous êtes déconnecté".to_string()),
        _ => None,
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// Operators already logged in go straight to the order form.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/orders").into_response();
    }

    LoginTemplate {
        error: query.error.as_deref().map(error_message),
        success: query.success.as_deref().and_then(success_message),
    }
    .into_response()
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let username = match state
        .credentials()
        .authenticate(form.username.trim(), &form.password)
        .await
    {
        Ok(username) => username,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username.trim(), "Login failed");
            return Redirect::to("/auth/login?error=credentials").into_response();
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Credential source unavailable");
            return Redirect::to("/auth/login?error=unavailable").into_response();
        }
    };

    if let Err(e) = set_current_user(&session, &CurrentUser { username: username.clone() }).await {
        tracing::error!(error = %e, "Failed to set session");
        return Redirect::to("/auth/login?error=session").into_response();
    }
    set_sentry_user(&username);

    Redirect::to("/orders").into_response()
}

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "Failed to clear session");
    }
    clear_sentry_user();

    Redirect::to("/auth/login?success=logout").into_response()
}
