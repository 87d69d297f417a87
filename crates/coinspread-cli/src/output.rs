use coinspread_core::analytics::format_decimal;
use coinspread_core::{ArbitrageRow, ExchangeId, SpreadResult, TradingPairRecord};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

const PRICE_HEADERS: [&str; 3] = ["Exchange", "Price", "Trading pair"];
const PROFIT_HEADERS: [&str; 5] = [
    "Buy Exchange",
    "Sell Exchange",
    "Buy Price",
    "Sell Price",
    "Profit %",
];

/// Command payload, serialized as the envelope's `data` field.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Spread(SpreadResult),
    Profit(Vec<ArbitrageRow>),
    Exchanges(Vec<ExchangeRow>),
}

#[derive(Debug, Serialize)]
pub struct ExchangeRow {
    pub id: ExchangeId,
    pub name: &'static str,
    pub base_url: String,
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    request_id: String,
    generated_at: String,
    exchanges_failed: &'a [ExchangeId],
    data: &'a Report,
}

pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => println!("{}", render_json(result, pretty)?),
        OutputFormat::Table => print!("{}", render_tables(&result.report)),
    }
    Ok(())
}

fn render_json(result: &CommandResult, pretty: bool) -> Result<String, CliError> {
    let generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|error| CliError::Command(format!("failed to format timestamp: {error}")))?;

    let envelope = Envelope {
        request_id: Uuid::new_v4().to_string(),
        generated_at,
        exchanges_failed: &result.exchanges_failed,
        data: &result.report,
    };

    let payload = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    Ok(payload)
}

fn render_tables(report: &Report) -> String {
    let mut out = String::new();
    match report {
        Report::Spread(spread) => {
            out.push_str("Max value:\n");
            out.push_str(&table(&PRICE_HEADERS, &[price_row(&spread.max)]));

            if let Some(min) = &spread.min {
                out.push_str("Min value:\n");
                out.push_str(&table(&PRICE_HEADERS, &[price_row(min)]));
            }

            if !spread.others.is_empty() {
                let rows: Vec<_> = spread.others.iter().map(price_row).collect();
                out.push_str("Other values:\n");
                out.push_str(&table(&PRICE_HEADERS, &rows));
            }

            out.push_str(&format!("Diff: ${}\n", spread.formatted_diff()));
            out.push_str(&format!("Diff percent: {}\n", spread.formatted_diff_percent()));
        }
        Report::Profit(rows) if rows.is_empty() => {
            out.push_str("No profitable opportunities found.\n");
        }
        Report::Profit(rows) => {
            let rows: Vec<_> = rows
                .iter()
                .map(|row| {
                    vec![
                        row.min_exchange.display_name().to_owned(),
                        row.max_exchange.display_name().to_owned(),
                        format!("${}", row.min_price),
                        format!("${}", row.max_price),
                        format_decimal(row.profit),
                    ]
                })
                .collect();
            out.push_str(&table(&PROFIT_HEADERS, &rows));
        }
        Report::Exchanges(rows) => {
            let rows: Vec<_> = rows
                .iter()
                .map(|row| vec![row.id.as_str().to_owned(), row.name.to_owned(), row.base_url.clone()])
                .collect();
            out.push_str(&table(&["Id", "Name", "Base URL"], &rows));
        }
    }
    out
}

fn price_row(record: &TradingPairRecord) -> Vec<String> {
    vec![
        record.exchange.display_name().to_owned(),
        format!("${}", record.price),
        record.symbol.clone(),
    ]
}

/// Renders a bordered table with columns sized to their widest cell.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = format!(
        "+{}+\n",
        widths
            .iter()
            .map(|width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!(" {cell:<width$} "))
            .collect();
        format!("|{}|\n", padded.join("|"))
    };

    let mut out = border.clone();
    out.push_str(&line(headers.to_vec()));
    out.push_str(&border);
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out.push_str(&border);
    out
}
