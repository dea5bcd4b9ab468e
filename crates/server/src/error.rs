//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use commande_core::{OrderError, QuantityError};

use crate::services::export::ExportError;
use crate::services::orders::SubmitError;
use crate::services::webhook::WebhookError;
use crate::store::StoreError;

/// Application-level error type for the order server.
#[derive(Debug, Error)]
pub enum AppError {
    /// The order form failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] OrderError),

    /// The order webhook did not confirm delivery.
    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),

    /// File store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// CSV export failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(e) => Self::Validation(e),
            SubmitError::Webhook(e) => Self::Webhook(e),
            SubmitError::Store(e) => Self::Store(e),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Webhook(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Export(_) | Self::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the operator.
    ///
    /// Internal details are never exposed.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(err) => validation_message(err),
            Self::Webhook(_) => {
                "La commande n'a pas pu être transmise. Rien n'a été enregistré, veuillez réessayer."
                    .to_string()
            }
            Self::Store(_) | Self::Export(_) | Self::Session(_) => {
                "Erreur interne du serveur".to_string()
            }
        }
    }

    /// Capture server-side errors to Sentry and log them.
    ///
    /// Client errors are logged at debug level only.
    pub fn report(&self) {
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();
        (self.status(), self.public_message()).into_response()
    }
}

/// French wording of a form validation error.
fn validation_message(err: &OrderError) -> String {
    match err {
        OrderError::MissingProduct => "Le nom du produit est obligatoire".to_string(),
        OrderError::InvalidUnit(_) => "Veuillez choisir une unité (Pcs ou KG)".to_string(),
        OrderError::InvalidDepot(_) => {
            "Veuillez choisir un dépôt (Frais ou Surgelé)".to_string()
        }
        OrderError::Quantity(QuantityError::Invalid(input)) => {
            format!("La quantité « {input} » n'est pas un nombre")
        }
        OrderError::Quantity(QuantityError::NotPositive(_)) => {
            "La quantité doit être supérieure à zéro".to_string()
        }
        OrderError::Quantity(QuantityError::TooLarge { max, .. }) => {
            format!("La quantité ne peut pas dépasser {max}")
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a username.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(username: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("order", "Order submitted", Some(&[("product", "Poulet")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Validation(OrderError::MissingProduct);
        assert_eq!(err.to_string(), "Validation error: product name is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Validation(OrderError::MissingProduct)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Webhook(WebhookError::Status {
                status: 500,
                body: String::new()
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::Conflict("alice".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Store(StoreError::Io {
            path: PathBuf::from("/srv/data/order_history_alice.json"),
            source: std::io::Error::other("disk full"),
        });
        let message = err.public_message();
        assert!(!message.contains("/srv/data"));
        assert!(!message.contains("disk full"));
    }

    #[test]
    fn test_submit_error_maps_to_matching_variant() {
        let err: AppError = SubmitError::Validation(OrderError::MissingProduct).into();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.public_message(), "Le nom du produit est obligatoire");
    }

    #[test]
    fn test_validation_messages_are_french() {
        let message = |err: OrderError| AppError::Validation(err).public_message();

        assert_eq!(
            message(OrderError::Quantity(QuantityError::NotPositive(
                rust_decimal::Decimal::ZERO
            ))),
            "La quantité doit être supérieure à zéro"
        );
        assert_eq!(
            message(OrderError::Quantity(QuantityError::Invalid("dix".to_string()))),
            "La quantité « dix » n'est pas un nombre"
        );
        assert_eq!(
            message(OrderError::Quantity(QuantityError::TooLarge {
                value: rust_decimal::Decimal::new(2_000_000, 0),
                max: commande_core::Quantity::MAX_INPUT,
            })),
            "La quantité ne peut pas dépasser 1000000"
        );
        assert!(message(OrderError::InvalidUnit("Litre".to_string())).contains("unité"));
        assert!(message(OrderError::InvalidDepot(String::new())).contains("dépôt"));
    }
}
