//! CLI argument definitions for coinspread.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `spread` | Highest, lowest and remaining quotes for a pair |
//! | `profit` | Buy-low/sell-high opportunities per symbol |
//! | `exchanges` | List registered exchanges |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--fail-fast` | `false` | Abort on the first failing exchange |
//! | `--timeout-ms` | env / `15000` | Budget for one exchange call |
//! | `--exchange` | all | Restrict to the given exchange (repeatable) |
//! | `--normalize-symbols` | `false` | Merge `BTCUSDT` and `BTC_USDT` when grouping |
//!
//! # Examples
//!
//! ```bash
//! coinspread spread btc usdt
//! coinspread profit eth btc --exchange binance --exchange poloniex
//! coinspread spread btc usdt --format json --pretty
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use coinspread_core::ExchangeId;

/// Cross-exchange crypto price spreads and arbitrage.
#[derive(Debug, Parser)]
#[command(
    name = "coinspread",
    author,
    version,
    about = "Cross-exchange crypto price spreads and arbitrage",
    long_about = "coinspread queries Binance, Bybit, Jbex, Poloniex and Whitebit for a \
currency pair and reports the price spread and arbitrage opportunities.\n\
\n\
Log verbosity is controlled with RUST_LOG (default: warn)."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Fail on the first exchange error instead of skipping it.
    #[arg(long, global = true, default_value_t = false)]
    pub fail_fast: bool,

    /// Time budget for a single exchange call, in milliseconds.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Only query this exchange. Repeat to select several.
    #[arg(long = "exchange", global = true, value_parser = parse_exchange)]
    pub exchanges: Vec<ExchangeId>,

    /// Group symbols ignoring case and `_`, `-`, `/` separators.
    #[arg(long, global = true, default_value_t = false)]
    pub normalize_symbols: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text tables.
    Table,
    /// Single JSON object.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show max, min and other quotes for a pair across exchanges.
    ///
    /// # Examples
    ///
    ///   coinspread spread btc usdt
    ///   coinspread spread eth btc --fail-fast
    Spread(PairArgs),

    /// Show buy-low/sell-high opportunities for a pair.
    ///
    /// # Examples
    ///
    ///   coinspread profit btc usdt
    ///   coinspread profit btc usdt --normalize-symbols
    Profit(PairArgs),

    /// List the exchanges coinspread can query.
    Exchanges,
}

/// Currency codes; prompted for on stdin when omitted.
#[derive(Debug, Clone, Args)]
pub struct PairArgs {
    /// First currency code (e.g. BTC).
    pub first: Option<String>,

    /// Second currency code (e.g. USDT).
    pub second: Option<String>,
}

fn parse_exchange(value: &str) -> Result<ExchangeId, String> {
    value.parse().map_err(|error| format!("{error}"))
}
