//! Order webhook client.
//!
//! Each submitted order is POSTed as a JSON object to the configured
//! endpoint. When a signing secret is configured the request carries:
//!
//! - `X-Commande-Timestamp`: Unix seconds at send time
//! - `X-Commande-Signature`: `sha256=<hex>` HMAC-SHA256 of
//!   `{timestamp}.{body}` keyed with the secret
//!
//! Only a 2xx response counts as delivered.

use hmac::{Hmac, Mac};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use commande_core::OrderRecord;

use crate::config::WebhookConfig;

/// Signature header name.
pub const SIGNATURE_HEADER: &str = "x-commande-signature";

/// Timestamp header name.
pub const TIMESTAMP_HEADER: &str = "x-commande-timestamp";

/// Most bytes of a rejected response kept for logs and error reports.
pub const MAX_ERROR_BODY_BYTES: usize = 512;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur when delivering an order.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request could not be sent or timed out.
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("webhook returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The client or payload could not be prepared.
    #[error("webhook client error: {0}")]
    Client(String),
}

/// HTTP client for the order webhook.
#[derive(Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    url: Url,
    signing_secret: Option<SecretString>,
}

impl std::fmt::Debug for WebhookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookClient")
            .field("url", &self.url.as_str())
            .field("signed", &self.signing_secret.is_some())
            .finish_non_exhaustive()
    }
}

impl WebhookClient {
    /// Create a new webhook client.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Request` if the HTTP client fails to build.
    pub fn new(config: &WebhookConfig) -> Result<Self, WebhookError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: config.url.clone(),
            signing_secret: config.signing_secret.clone(),
        })
    }

    /// Endpoint URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// POST `record` to the endpoint.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Request` on transport failure or timeout and
    /// `WebhookError::Status` for any non-2xx response.
    #[instrument(skip(self, record), fields(username = %record.username, product = %record.product))]
    pub async fn deliver(&self, record: &OrderRecord) -> Result<(), WebhookError> {
        let body =
            serde_json::to_vec(record).map_err(|e| WebhookError::Client(e.to_string()))?;

        let mut request = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(secret) = &self.signing_secret {
            let timestamp = chrono::Utc::now().timestamp().to_string();
            let signature = sign(secret, &timestamp, &body)?;
            request = request
                .header(TIMESTAMP_HEADER, timestamp)
                .header(SIGNATURE_HEADER, signature);
        }

        let response = request.body(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = error_body(response).await;
            tracing::warn!(status = status.as_u16(), "Webhook rejected order");
            return Err(WebhookError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(status = status.as_u16(), "Order delivered to webhook");
        Ok(())
    }
}

/// Read at most [`MAX_ERROR_BODY_BYTES`] of a rejected response.
async fn error_body(mut response: reqwest::Response) -> String {
    let mut buf = Vec::new();
    while buf.len() < MAX_ERROR_BODY_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => buf.extend_from_slice(&chunk),
            Ok(None) | Err(_) => break,
        }
    }
    buf.truncate(MAX_ERROR_BODY_BYTES);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Compute the `X-Commande-Signature` value for `body` sent at `timestamp`.
///
/// # Errors
///
/// Returns `WebhookError::Client` if the key is rejected by the MAC.
pub fn sign(secret: &SecretString, timestamp: &str, body: &[u8]) -> Result<String, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|e| WebhookError::Client(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}
