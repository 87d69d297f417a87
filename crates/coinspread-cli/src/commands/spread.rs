use coinspread_core::{compute_spread, CoreError, CurrencyPair};
use tracing::info;

use super::{CommandResult, Context};
use crate::error::CliError;
use crate::output::Report;

pub async fn run(pair: &CurrencyPair, context: &Context) -> Result<CommandResult, CliError> {
    let collection = context.aggregator.collect(pair).await?;
    info!(
        pair = %pair,
        records = collection.records.len(),
        latency_ms = collection.latency_ms,
        "quotes collected"
    );

    let spread = compute_spread(&collection.records).map_err(|error| match error {
        CoreError::NoData => CliError::NoData {
            pair: pair.to_string(),
        },
        other => CliError::from(other),
    })?;

    Ok(CommandResult::ok(Report::Spread(spread)).with_failed(collection.failed_exchanges()))
}
