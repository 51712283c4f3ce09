//! Parsing of CUR CSV exports into [`UsageRecord`]s.

use crate::domain::model::UsageRecord;
use crate::utils::error::{CurError, Result};

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "month",
    "aws_account_id",
    "usage_type",
    "item_description",
    "cost",
];

/// Parse one CSV document. `source` names the file in errors and warnings.
///
/// A missing required column aborts; rows that cannot be decoded or whose
/// cost is not a number are skipped with a warning.
pub fn parse_line_items(data: &[u8], source: &str) -> Result<Vec<UsageRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| CurError::MissingColumn {
                column: column.to_string(),
                file: source.to_string(),
            })?;
    }
    let [month, account, usage_type, description, cost] = positions;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("⚠️ {}: skipping unreadable row: {}", source, e);
                skipped += 1;
                continue;
            }
        };
        let field = |idx: usize| row.get(idx).unwrap_or("").to_string();
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let raw_cost = field(cost);
        // NaN 與 inf 也算無效金額
        let Some(parsed_cost) = raw_cost.parse::<f64>().ok().filter(|c| c.is_finite()) else {
            tracing::warn!(
                "⚠️ {}:{}: skipping row with invalid cost '{}'",
                source,
                line,
                raw_cost
            );
            skipped += 1;
            continue;
        };

        records.push(UsageRecord::new(
            field(month),
            field(account),
            field(usage_type),
            field(description),
            parsed_cost,
        ));
    }

    if skipped > 0 {
        tracing::warn!("⚠️ {}: skipped {} malformed rows", source, skipped);
    }
    tracing::debug!("{}: parsed {} line items", source, records.len());

    Ok(records)
}
