//! # Coinspread Core
//!
//! Cross-exchange price aggregation for crypto trading pairs.
//!
//! ## Overview
//!
//! This crate provides the building blocks of the `coinspread` toolkit:
//!
//! - **Domain types** for currencies, pairs and per-exchange quotes
//! - **Exchange adapters** for Binance, Bybit, Jbex, Poloniex and Whitebit
//! - **Registry** mapping each exchange identifier to its adapter
//! - **Aggregator** fanning a quote request out to every exchange
//! - **Analytics** for spread and arbitrage reductions
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Exchange adapters |
//! | [`aggregator`] | Concurrent quote collection with a failure policy |
//! | [`analytics`] | Spread and arbitrage computation |
//! | [`config`] | Timeouts, base URLs and environment overrides |
//! | [`domain`] | `Currency`, `CurrencyPair`, `TradingPairRecord` |
//! | [`error`] | Core error types |
//! | [`exchange`] | Adapter contract and upstream errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`registry`] | Exchange registry and builder |
//! | [`source`] | Exchange identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use coinspread_core::{compute_spread, Aggregator, CurrencyPair, ExchangeRegistryBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(ExchangeRegistryBuilder::from_env().build());
//!     let pair = CurrencyPair::parse("btc", "usdt")?;
//!
//!     let records = Aggregator::new(registry).collect_quotes(&pair).await?;
//!     let spread = compute_spread(&records)?;
//!     println!("spread: {}", spread.formatted_diff_percent());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Aggregator     │────▶│ Exchange Registry│
//! └────────┬────────┘     └──────────────────┘
//!          │ one task per exchange
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Exchange        │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest)        │
//! └─────────────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Analytics       │
//! │ (spread, arb)   │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! A failing exchange surfaces as [`UpstreamError`]. Under the default
//! [`FailurePolicy::BestEffort`] the aggregator logs and skips it:
//!
//! ```rust
//! use coinspread_core::{UpstreamError, UpstreamErrorKind};
//!
//! fn describe(error: &UpstreamError) -> &'static str {
//!     match error.kind() {
//!         UpstreamErrorKind::Timeout => "exchange too slow",
//!         UpstreamErrorKind::Status | UpstreamErrorKind::Api => "exchange rejected request",
//!         UpstreamErrorKind::Parse => "unexpected response",
//!         UpstreamErrorKind::Transport => "network failure",
//!     }
//! }
//! ```

pub mod adapters;
pub mod aggregator;
pub mod analytics;
pub mod config;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod http_client;
pub mod registry;
pub mod source;

#[cfg(test)]
mod test_support;

// Adapter implementations
pub use adapters::{BinanceAdapter, BybitAdapter, JbexAdapter, PoloniexAdapter, WhitebitAdapter};

// Aggregation
pub use aggregator::{Aggregator, FailurePolicy, QuoteCollection};

// Analytics
pub use analytics::{
    compute_arbitrage, compute_arbitrage_with, compute_spread, ArbitrageRow, SpreadResult,
    SymbolGrouping,
};

// Configuration
pub use config::ClientConfig;

// Domain models
pub use domain::{Currency, CurrencyPair, TradingPairRecord};

// Error types
pub use error::{CoreError, ValidationError};

// Adapter contract
pub use exchange::{ExchangeAdapter, PairListing, UpstreamError, UpstreamErrorKind};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Registry
pub use registry::{ExchangeRegistry, ExchangeRegistryBuilder};

// Exchange identifiers
pub use source::ExchangeId;
