use coinspread_core::{ClientConfig, ExchangeRegistry};

use super::CommandResult;
use crate::output::{ExchangeRow, Report};

pub fn run(registry: &ExchangeRegistry, config: &ClientConfig) -> CommandResult {
    let rows = registry
        .iter()
        .map(|(id, adapter)| ExchangeRow {
            id,
            name: adapter.name(),
            base_url: config.base_url(id).to_owned(),
        })
        .collect();

    CommandResult::ok(Report::Exchanges(rows))
}
