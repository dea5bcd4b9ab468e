//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `COMMANDE_HOST` - Bind address (default: 127.0.0.1)
//! - `COMMANDE_PORT` - Listen port (default: 8501)
//! - `COMMANDE_BASE_URL` - Public URL (default: <http://localhost:8501>)
//! - `COMMANDE_DATA_DIR` - Order history directory (default: data)
//! - `COMMANDE_CREDENTIALS_FILE` - Operator credential file (default: users.json)
//! - `COMMANDE_EXPORT_DIR` - CSV export directory (export disabled when unset)
//! - `COMMANDE_WEBHOOK_URL` - Order webhook endpoint (webhook disabled when unset)
//! - `COMMANDE_WEBHOOK_SECRET` - HMAC signing secret for webhook bodies
//! - `COMMANDE_WEBHOOK_TIMEOUT_SECS` - Webhook request timeout
//! - `COMMANDE_PIECE_TO_KG` - Estimator factor, kilograms per piece (default: 1.5)
//! - `COMMANDE_KG_TO_PIECE` - Estimator factor, pieces per kilogram (default: 0.70)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use commande_core::EstimateFactors;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_SIGNING_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct CommandeConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Directory holding one order history file per operator
    pub data_dir: PathBuf,
    /// Operator credential file
    pub credentials_file: PathBuf,
    /// Directory receiving one CSV file per submitted order
    pub export_dir: Option<PathBuf>,
    /// Order webhook, if configured
    pub webhook: Option<WebhookConfig>,
    /// Estimator conversion factors
    pub estimate_factors: EstimateFactors,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Order webhook configuration.
///
/// Implements `Debug` manually to redact the signing secret.
#[derive(Clone)]
pub struct WebhookConfig {
    /// Endpoint receiving a JSON POST per order
    pub url: Url,
    /// HMAC-SHA256 key for the `X-Commande-Signature` header
    pub signing_secret: Option<SecretString>,
    /// Request timeout (HTTP client default when unset)
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("url", &self.url.as_str())
            .field(
                "signing_secret",
                &self.signing_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CommandeConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or if the webhook
    /// secret fails validation (length, placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_env_or_default(&lookup, "COMMANDE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("COMMANDE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(&lookup, "COMMANDE_PORT", "8501")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("COMMANDE_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default(&lookup, "COMMANDE_BASE_URL", "http://localhost:8501");

        let data_dir = PathBuf::from(get_env_or_default(&lookup, "COMMANDE_DATA_DIR", "data"));
        let credentials_file = PathBuf::from(get_env_or_default(
            &lookup,
            "COMMANDE_CREDENTIALS_FILE",
            "users.json",
        ));
        let export_dir = lookup("COMMANDE_EXPORT_DIR").map(PathBuf::from);

        let webhook = WebhookConfig::from_lookup(&lookup)?;
        let estimate_factors = estimate_factors_from_lookup(&lookup)?;

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            credentials_file,
            export_dir,
            webhook,
            estimate_factors,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public URL is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl WebhookConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let Some(raw_url) = lookup("COMMANDE_WEBHOOK_URL") else {
            return Ok(None);
        };

        let url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("COMMANDE_WEBHOOK_URL".to_string(), e.to_string())
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "COMMANDE_WEBHOOK_URL".to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        let signing_secret = match lookup("COMMANDE_WEBHOOK_SECRET") {
            Some(value) => {
                let secret = SecretString::from(value);
                validate_secret_length(&secret, "COMMANDE_WEBHOOK_SECRET")?;
                validate_secret_strength(secret.expose_secret(), "COMMANDE_WEBHOOK_SECRET")?;
                Some(secret)
            }
            None => None,
        };

        let timeout = lookup("COMMANDE_WEBHOOK_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .ok_or_else(|| {
                        ConfigError::InvalidEnvVar(
                            "COMMANDE_WEBHOOK_TIMEOUT_SECS".to_string(),
                            format!("expected a positive number of seconds, got '{raw}'"),
                        )
                    })
            })
            .transpose()?;

        Ok(Some(Self {
            url,
            signing_secret,
            timeout,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse an optional decimal variable, falling back to `default`.
fn get_decimal_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Decimal,
) -> Result<Decimal, ConfigError> {
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<Decimal>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn estimate_factors_from_lookup(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<EstimateFactors, ConfigError> {
    let piece_to_kilogram = get_decimal_or_default(
        lookup,
        "COMMANDE_PIECE_TO_KG",
        EstimateFactors::DEFAULT_PIECE_TO_KILOGRAM,
    )?;
    let kilogram_to_piece = get_decimal_or_default(
        lookup,
        "COMMANDE_KG_TO_PIECE",
        EstimateFactors::DEFAULT_KILOGRAM_TO_PIECE,
    )?;

    EstimateFactors::new(piece_to_kilogram, kilogram_to_piece).map_err(|e| {
        let key = if e.name == "piece_to_kilogram" {
            "COMMANDE_PIECE_TO_KG"
        } else {
            "COMMANDE_KG_TO_PIECE"
        };
        ConfigError::InvalidEnvVar(key.to_string(), e.to_string())
    })
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SIGNING_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SIGNING_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STRONG_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

    fn config_from(pairs: &[(&str, &str)]) -> Result<CommandeConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CommandeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8501");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.credentials_file, PathBuf::from("users.json"));
        assert!(config.export_dir.is_none());
        assert!(config.webhook.is_none());
        assert_eq!(config.estimate_factors, EstimateFactors::default());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_invalid_port() {
        let result = config_from(&[("COMMANDE_PORT", "eighty")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "COMMANDE_PORT"));
    }

    #[test]
    fn test_estimate_factors_from_env() {
        let config = config_from(&[
            ("COMMANDE_PIECE_TO_KG", "0.25"),
            ("COMMANDE_KG_TO_PIECE", "0.75"),
        ])
        .unwrap();
        assert_eq!(config.estimate_factors.piece_to_kilogram(), Decimal::new(25, 2));
        assert_eq!(config.estimate_factors.kilogram_to_piece(), Decimal::new(75, 2));
    }

    #[test]
    fn test_estimate_factor_must_be_positive() {
        let result = config_from(&[("COMMANDE_KG_TO_PIECE", "0")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "COMMANDE_KG_TO_PIECE"));

        let result = config_from(&[("COMMANDE_PIECE_TO_KG", "abc")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "COMMANDE_PIECE_TO_KG"));
    }

    #[test]
    fn test_webhook_config() {
        let config = config_from(&[
            ("COMMANDE_WEBHOOK_URL", "https://hooks.example.org/orders"),
            ("COMMANDE_WEBHOOK_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.url.as_str(), "https://hooks.example.org/orders");
        assert_eq!(webhook.timeout, Some(Duration::from_secs(5)));
        assert!(webhook.signing_secret.is_none());
    }

    #[test]
    fn test_webhook_rejects_non_http_scheme() {
        let result = config_from(&[("COMMANDE_WEBHOOK_URL", "ftp://hooks.example.org")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_webhook_rejects_zero_timeout() {
        let result = config_from(&[
            ("COMMANDE_WEBHOOK_URL", "https://hooks.example.org"),
            ("COMMANDE_WEBHOOK_TIMEOUT_SECS", "0"),
        ]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_webhook_secret_validation() {
        let result = config_from(&[
            ("COMMANDE_WEBHOOK_URL", "https://hooks.example.org"),
            ("COMMANDE_WEBHOOK_SECRET", "changeme-changeme-changeme-changeme"),
        ]);
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));

        let result = config_from(&[
            ("COMMANDE_WEBHOOK_URL", "https://hooks.example.org"),
            ("COMMANDE_WEBHOOK_SECRET", "short"),
        ]);
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));

        let config = config_from(&[
            ("COMMANDE_WEBHOOK_URL", "https://hooks.example.org"),
            ("COMMANDE_WEBHOOK_SECRET", STRONG_SECRET),
        ])
        .unwrap();
        assert!(config.webhook.unwrap().signing_secret.is_some());
    }

    #[test]
    fn test_webhook_config_debug_redacts_secret() {
        let config = config_from(&[
            ("COMMANDE_WEBHOOK_URL", "https://hooks.example.org"),
            ("COMMANDE_WEBHOOK_SECRET", STRONG_SECRET),
        ])
        .unwrap();
        let debug_output = format!("{:?}", config.webhook.unwrap());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(STRONG_SECRET));
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_is_secure() {
        let config = config_from(&[("COMMANDE_BASE_URL", "https://commande.example.ma")]).unwrap();
        assert!(config.is_secure());
    }
}
