use coinspread_core::{compute_arbitrage_with, CurrencyPair};

use super::{CommandResult, Context};
use crate::error::CliError;
use crate::output::Report;

pub async fn run(pair: &CurrencyPair, context: &Context) -> Result<CommandResult, CliError> {
    let collection = context.aggregator.collect(pair).await?;
    let rows = compute_arbitrage_with(&collection.records, context.grouping);

    Ok(CommandResult::ok(Report::Profit(rows)).with_failed(collection.failed_exchanges()))
}
