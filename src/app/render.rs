//! Terminal, markdown and CSV rendering of reports.

use crate::core::extract::{daily_cost, format_cost};
use crate::domain::model::{Column, DiscountQuery, DiscountResult, RateTable, UsageRecord, UsageReport};
use crate::utils::error::{CurError, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

pub fn cell_value(column: Column, record: &UsageRecord) -> String {
    match column {
        Column::AwsAccountId => record.aws_account_id.clone(),
        Column::Month => record.month.clone(),
        Column::UsageType => record.usage_type_str().to_string(),
        Column::ItemDescription => record.item_description_str().to_string(),
        Column::Cost => format_cost(record.cost),
        // 月份格式錯誤時留空
        Column::DailyCost => daily_cost(record).map(format_cost).unwrap_or_default(),
    }
}

pub fn report_headers(report: &UsageReport) -> Vec<&'static str> {
    report.columns.iter().map(Column::header).collect()
}

pub fn report_rows(report: &UsageReport) -> Vec<Vec<String>> {
    report
        .records
        .iter()
        .map(|record| {
            report
                .columns
                .iter()
                .map(|column| cell_value(*column, record))
                .collect()
        })
        .collect()
}

/// `## title`, a blank line, then a pipe table.
pub fn markdown_table(title: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 3);
    lines.push(format!("## {}\n", title));
    lines.push(format!("| {} |", headers.join(" | ")));
    lines.push(format!("| {} |", vec!["---"; headers.len()].join(" | ")));
    for row in rows {
        lines.push(format!("| {} |", row.join(" | ")));
    }
    lines.join("\n")
}

pub fn terminal_table(headers: &[&str], rows: &[Vec<String>]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    for row in rows {
        table.add_row(row.iter().map(Cell::new).collect::<Vec<_>>());
    }
    table
}

pub fn usage_markdown(report: &UsageReport) -> String {
    markdown_table(report.title(), &report_headers(report), &report_rows(report))
}

pub fn usage_table(report: &UsageReport) -> Table {
    terminal_table(&report_headers(report), &report_rows(report))
}

/// CSV with a header row; an empty report still gets its header.
pub fn usage_csv(report: &UsageReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(report_headers(report))?;
    for row in report_rows(report) {
        writer.write_record(&row)?;
    }
    writer
        .into_inner()
        .map_err(|e| CurError::IoError(e.into_error()))
}

/// `0.2800 (28.00%)`
pub fn format_rate(rate: f64) -> String {
    format!("{:.4} ({:.2}%)", rate, rate * 100.0)
}

pub fn discount_summary(result: &DiscountResult, query: &DiscountQuery) -> Vec<(&'static str, String)> {
    vec![
        ("Instance type", result.instance_type.clone()),
        ("Discount rate", format_rate(result.rate)),
        ("Term", result.term.to_string()),
        ("Payment option", result.payment_option.to_string()),
        ("Region", result.region.to_string()),
        ("Operating system", query.operating_system.to_string()),
        ("Tenancy", query.tenancy.to_string()),
    ]
}

pub fn print_discount_summary(result: &DiscountResult, query: &DiscountQuery) {
    for (index, (label, value)) in discount_summary(result, query).into_iter().enumerate() {
        let label = format!("{}:", label);
        // 折扣率用綠色，其餘參數用藍色
        if index == 1 {
            println!("{} {}", label.green().bold(), value);
        } else {
            println!("{} {}", label.blue(), value);
        }
    }
}

/// Rows of `key / rate / percent`, optionally limited to keys containing `filter`.
pub fn rate_rows(table: &RateTable, filter: Option<&str>) -> Vec<Vec<String>> {
    let needle = filter.map(str::to_lowercase);
    table
        .rates
        .iter()
        .filter(|(key, _)| match &needle {
            Some(needle) => key.to_lowercase().contains(needle),
            None => true,
        })
        .map(|(key, rate)| {
            vec![
                key.clone(),
                format!("{:.4}", rate),
                format!("{:.2}%", rate * 100.0),
            ]
        })
        .collect()
}

pub const RATE_HEADERS: [&str; 3] = ["key", "rate", "percent"];

pub fn rate_title(table: &RateTable) -> String {
    format!("{} Savings Plans discount rates ({})", table.product, table.region)
}
