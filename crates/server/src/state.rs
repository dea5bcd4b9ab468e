//! Application state shared across handlers.

use std::sync::Arc;

use commande_core::EstimateFactors;

use crate::config::CommandeConfig;
use crate::services::auth::CredentialStore;
use crate::services::export::CsvExporter;
use crate::services::orders::OrderService;
use crate::services::webhook::{WebhookClient, WebhookError};
use crate::store::{CredentialRepository, OrderStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and holds the configuration
/// and the services built from it. It holds no per-operator data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CommandeConfig,
    credentials: CredentialStore,
    orders: OrderService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the webhook HTTP client cannot be built.
    pub fn new(config: CommandeConfig) -> Result<Self, WebhookError> {
        let credentials = CredentialStore::new(CredentialRepository::new(
            config.credentials_file.clone(),
        ));

        let webhook = config
            .webhook
            .as_ref()
            .map(WebhookClient::new)
            .transpose()?;
        let exporter = config.export_dir.clone().map(CsvExporter::new);
        let orders = OrderService::new(OrderStore::new(config.data_dir.clone()), webhook, exporter);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                credentials,
                orders,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &CommandeConfig {
        &self.inner.config
    }

    /// Get a reference to the credential store.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    /// Get a reference to the order submission service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn store(&self) -> &OrderStore {
        self.inner.orders.store()
    }

    /// Estimator conversion factors.
    #[must_use]
    pub fn estimate_factors(&self) -> &EstimateFactors {
        &self.inner.config.estimate_factors
    }
}
