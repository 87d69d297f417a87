mod exchanges;
mod profit;
mod spread;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use coinspread_core::{
    Aggregator, ClientConfig, CurrencyPair, ExchangeId, ExchangeRegistry, ExchangeRegistryBuilder,
    FailurePolicy, SymbolGrouping,
};

use crate::cli::{Cli, Command, PairArgs};
use crate::error::CliError;
use crate::output::Report;

/// Report plus the exchanges that were skipped after failing.
pub struct CommandResult {
    pub report: Report,
    pub exchanges_failed: Vec<ExchangeId>,
}

impl CommandResult {
    pub fn ok(report: Report) -> Self {
        Self {
            report,
            exchanges_failed: Vec::new(),
        }
    }

    pub fn with_failed(mut self, exchanges: Vec<ExchangeId>) -> Self {
        self.exchanges_failed = exchanges;
        self
    }
}

/// Settings shared by the pair commands.
pub struct Context {
    pub aggregator: Aggregator,
    pub grouping: SymbolGrouping,
}

impl Context {
    fn from_cli(cli: &Cli) -> Self {
        let mut config = ClientConfig::from_env();
        if let Some(timeout_ms) = cli.timeout_ms {
            config = config.with_call_timeout_ms(timeout_ms);
        }

        let call_timeout = config.call_timeout();
        let aggregator = Aggregator::new(Arc::new(build_registry(cli, config)))
            .with_policy(if cli.fail_fast {
                FailurePolicy::FailFast
            } else {
                FailurePolicy::BestEffort
            })
            .with_call_timeout(call_timeout);

        Self {
            aggregator,
            grouping: if cli.normalize_symbols {
                SymbolGrouping::Normalized
            } else {
                SymbolGrouping::Literal
            },
        }
    }
}

fn build_registry(cli: &Cli, config: ClientConfig) -> ExchangeRegistry {
    let builder = ExchangeRegistryBuilder::new().with_config(config);
    if cli.exchanges.is_empty() {
        builder.build()
    } else {
        builder.only(cli.exchanges.iter().copied()).build()
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::Spread(args) => {
            let pair = resolve_pair(args)?;
            spread::run(&pair, &Context::from_cli(cli)).await
        }
        Command::Profit(args) => {
            let pair = resolve_pair(args)?;
            profit::run(&pair, &Context::from_cli(cli)).await
        }
        Command::Exchanges => {
            let config = ClientConfig::from_env();
            let registry = build_registry(cli, config.clone());
            Ok(exchanges::run(&registry, &config))
        }
    }
}

fn resolve_pair(args: &PairArgs) -> Result<CurrencyPair, CliError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompt_out = io::stderr();

    let first = match &args.first {
        Some(value) => value.clone(),
        None => prompt(&mut input, &mut prompt_out, "Enter first currency")?,
    };
    let second = match &args.second {
        Some(value) => value.clone(),
        None => prompt(&mut input, &mut prompt_out, "Enter second currency")?,
    };

    CurrencyPair::parse(&first, &second).map_err(CliError::from)
}

fn prompt<R, W>(input: &mut R, output: &mut W, label: &str) -> Result<String, CliError>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{label}: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_owned())
}
