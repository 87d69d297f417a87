//! Exchange registry and its builder.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::adapters::{BinanceAdapter, BybitAdapter, JbexAdapter, PoloniexAdapter, WhitebitAdapter};
use crate::config::ClientConfig;
use crate::exchange::ExchangeAdapter;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::{CoreError, ExchangeId};

/// Read-only map from [`ExchangeId`] to its adapter.
///
/// Iteration follows [`ExchangeId::ALL`] order regardless of registration
/// order. Build it once and share it behind an `Arc`.
#[derive(Clone)]
pub struct ExchangeRegistry {
    adapters: BTreeMap<ExchangeId, Arc<dyn ExchangeAdapter>>,
}

impl Default for ExchangeRegistry {
    fn default() -> Self {
        ExchangeRegistryBuilder::new().build()
    }
}

impl ExchangeRegistry {
    /// Registers `adapters`; a later adapter with the same id replaces an
    /// earlier one.
    pub fn new(adapters: Vec<Arc<dyn ExchangeAdapter>>) -> Self {
        let adapters = adapters
            .into_iter()
            .map(|adapter| (adapter.id(), adapter))
            .collect();
        Self { adapters }
    }

    pub fn ids(&self) -> Vec<ExchangeId> {
        self.adapters.keys().copied().collect()
    }

    /// Looks up the adapter registered for `exchange`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownExchange`] when the registry was built
    /// without that exchange.
    pub fn get(&self, exchange: ExchangeId) -> Result<Arc<dyn ExchangeAdapter>, CoreError> {
        self.adapters
            .get(&exchange)
            .cloned()
            .ok_or(CoreError::UnknownExchange { exchange })
    }

    pub fn contains(&self, exchange: ExchangeId) -> bool {
        self.adapters.contains_key(&exchange)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExchangeId, &Arc<dyn ExchangeAdapter>)> + '_ {
        self.adapters.iter().map(|(id, adapter)| (*id, adapter))
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for ExchangeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRegistry")
            .field("exchanges", &self.ids())
            .finish()
    }
}

/// Builder wiring every adapter to one HTTP client and one [`ClientConfig`].
///
/// # Example
///
/// ```rust,ignore
/// use coinspread_core::{ExchangeId, ExchangeRegistryBuilder};
///
/// // Environment-configured registry with every exchange
/// let registry = ExchangeRegistryBuilder::from_env().build();
///
/// // Only two exchanges
/// let registry = ExchangeRegistryBuilder::new()
///     .only([ExchangeId::Binance, ExchangeId::Poloniex])
///     .build();
/// ```
pub struct ExchangeRegistryBuilder {
    config: ClientConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    enabled: BTreeSet<ExchangeId>,
}

impl Default for ExchangeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeRegistryBuilder {
    /// Default configuration with all exchanges enabled.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            http_client: None,
            enabled: ExchangeId::ALL.into_iter().collect(),
        }
    }

    /// Same as [`new`](Self::new) with [`ClientConfig::from_env`].
    pub fn from_env() -> Self {
        Self::new().with_config(ClientConfig::from_env())
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares `http_client` between all adapters instead of a fresh reqwest client.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Enable or disable a single exchange.
    pub fn with_exchange_enabled(mut self, exchange: ExchangeId, enabled: bool) -> Self {
        if enabled {
            self.enabled.insert(exchange);
        } else {
            self.enabled.remove(&exchange);
        }
        self
    }

    /// Restricts the registry to `exchanges`.
    pub fn only<I>(mut self, exchanges: I) -> Self
    where
        I: IntoIterator<Item = ExchangeId>,
    {
        self.enabled = exchanges.into_iter().collect();
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build(self) -> ExchangeRegistry {
        let http_client = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));

        let adapters = self
            .enabled
            .iter()
            .map(|exchange| build_adapter(*exchange, http_client.clone(), &self.config))
            .collect();

        ExchangeRegistry::new(adapters)
    }
}

fn build_adapter(
    exchange: ExchangeId,
    http_client: Arc<dyn HttpClient>,
    config: &ClientConfig,
) -> Arc<dyn ExchangeAdapter> {
    match exchange {
        ExchangeId::Binance => Arc::new(BinanceAdapter::new(http_client, config)),
        ExchangeId::Bybit => Arc::new(BybitAdapter::new(http_client, config)),
        ExchangeId::Jbex => Arc::new(JbexAdapter::new(http_client, config)),
        ExchangeId::Poloniex => Arc::new(PoloniexAdapter::new(http_client, config)),
        ExchangeId::Whitebit => Arc::new(WhitebitAdapter::new(http_client, config)),
    }
}
