//! Spread and arbitrage reductions over collected quotes.
//!
//! Both functions are pure: they take the records of one aggregation call and
//! never touch the network.
//!
//! A `0.0` price means "listed, price unavailable". It may be selected as max
//! or min but never produces a non-zero diff or a profit row.

use std::collections::HashMap;

use serde::Serialize;

use crate::{CoreError, ExchangeId, TradingPairRecord};

/// Highest and lowest quote for one pair across exchanges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadResult {
    pub max: TradingPairRecord,
    /// `None` when only one exchange quoted the pair.
    pub min: Option<TradingPairRecord>,
    pub diff: f64,
    pub diff_percent: f64,
    /// Every record except the selected max and min positions.
    pub others: Vec<TradingPairRecord>,
}

impl SpreadResult {
    /// `diff` with two decimals and thousands separators, e.g. `1,234.50`.
    pub fn formatted_diff(&self) -> String {
        format_decimal(self.diff)
    }

    /// `diff_percent` formatted like [`formatted_diff`](Self::formatted_diff), suffixed with `%`.
    pub fn formatted_diff_percent(&self) -> String {
        format!("{}%", format_decimal(self.diff_percent))
    }
}

/// Computes the spread between the most and least expensive quotes.
///
/// Ties keep the first record in input order. When every price is equal the
/// same record is both max and min.
///
/// # Errors
///
/// Returns [`CoreError::NoData`] when `records` is empty.
pub fn compute_spread(records: &[TradingPairRecord]) -> Result<SpreadResult, CoreError> {
    let Some(first) = records.first() else {
        return Err(CoreError::NoData);
    };

    if records.len() == 1 {
        return Ok(SpreadResult {
            max: first.clone(),
            min: None,
            diff: 0.0,
            diff_percent: 0.0,
            others: Vec::new(),
        });
    }

    let mut max_index = 0;
    let mut min_index = 0;
    for (index, record) in records.iter().enumerate().skip(1) {
        if record.price > records[max_index].price {
            max_index = index;
        }
        if record.price < records[min_index].price {
            min_index = index;
        }
    }

    let max = &records[max_index];
    let min = &records[min_index];
    let (diff, diff_percent) = if max.has_price() && min.has_price() {
        let diff = max.price - min.price;
        (diff, diff / min.price * 100.0)
    } else {
        (0.0, 0.0)
    };

    let others = records
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != max_index && *index != min_index)
        .map(|(_, record)| record.clone())
        .collect();

    Ok(SpreadResult {
        max: max.clone(),
        min: Some(min.clone()),
        diff,
        diff_percent,
        others,
    })
}

/// One buy-low/sell-high opportunity within a symbol group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageRow {
    /// Symbol of the group (the first record's spelling under normalized grouping).
    pub symbol: String,
    pub min_exchange: ExchangeId,
    pub max_exchange: ExchangeId,
    pub min_price: f64,
    pub max_price: f64,
    /// Percentage, rounded to two decimals.
    pub profit: f64,
}

/// How records are grouped before looking for price gaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SymbolGrouping {
    /// Exact exchange-native symbol: `BTCUSDT` and `BTC_USDT` are distinct.
    #[default]
    Literal,
    /// Uppercased with `_`, `-` and `/` removed before grouping.
    Normalized,
}

impl SymbolGrouping {
    fn key(self, symbol: &str) -> String {
        match self {
            Self::Literal => symbol.to_owned(),
            Self::Normalized => symbol
                .chars()
                .filter(|ch| !matches!(ch, '_' | '-' | '/'))
                .map(|ch| ch.to_ascii_uppercase())
                .collect(),
        }
    }
}

/// Profit table grouped by literal symbol.
pub fn compute_arbitrage(records: &[TradingPairRecord]) -> Vec<ArbitrageRow> {
    compute_arbitrage_with(records, SymbolGrouping::Literal)
}

/// Profit table with explicit grouping.
///
/// Groups are reported in discovery order. A group yields a row only when
/// its lowest price is positive and strictly below its highest price.
pub fn compute_arbitrage_with(
    records: &[TradingPairRecord],
    grouping: SymbolGrouping,
) -> Vec<ArbitrageRow> {
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<&TradingPairRecord>> = Vec::new();

    for record in records {
        let key = grouping.key(&record.symbol);
        let slot = *index_by_key.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(record);
    }

    groups
        .iter()
        .filter_map(|group| arbitrage_row(group))
        .collect()
}

fn arbitrage_row(group: &[&TradingPairRecord]) -> Option<ArbitrageRow> {
    let (first, rest) = group.split_first()?;
    let mut min = *first;
    let mut max = *first;
    for record in rest {
        if record.price < min.price {
            min = *record;
        }
        if record.price > max.price {
            max = *record;
        }
    }

    if !min.has_price() || min.price >= max.price {
        return None;
    }

    Some(ArbitrageRow {
        symbol: first.symbol.clone(),
        min_exchange: min.exchange,
        max_exchange: max.exchange,
        min_price: min.price,
        max_price: max.price,
        profit: round2((max.price - min.price) / min.price * 100.0),
    })
}

/// Rounds half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Two decimals with `,` as thousands separator.
pub fn format_decimal(value: f64) -> String {
    let rendered = format!("{:.2}", round2(value).abs());
    let (integer, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && round2(value) != 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
