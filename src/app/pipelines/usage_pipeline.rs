use crate::adapters::cur_csv;
use crate::app::render;
use crate::core::extract::{days_in_month, extract_usage};
use crate::core::{ConfigProvider, Pipeline, Storage, UsageRecord, UsageReport};
use crate::domain::model::{Column, Service};
use crate::utils::error::Result;
use colored::Colorize;
use std::collections::BTreeSet;

/// 輸出到終端機時回傳的目的地名稱
pub const STDOUT_DESTINATION: &str = "stdout";

/// Reads CUR CSV files and produces one usage report per service.
pub struct UsagePipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) services: Vec<Service>,
}

impl<S: Storage, C: ConfigProvider> UsagePipeline<S, C> {
    pub fn new(storage: S, config: C, services: Vec<Service>) -> Self {
        Self {
            storage,
            config,
            services,
        }
    }

    fn print_report(&self, report: &UsageReport) {
        println!("{} {}", "Extracted rows:".green(), report.records.len());
        if self.config.markdown() {
            println!("{}", render::usage_markdown(report));
        } else {
            println!("{}", report.title().bold());
            println!("{}", render::usage_table(report));
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for UsagePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<UsageRecord>> {
        let mut line_items = Vec::new();

        for pattern in self.config.input_patterns() {
            for path in self.storage.expand(pattern)? {
                tracing::info!("📄 Processing file: {}", path);
                let data = self.storage.read_file(&path).await?;
                line_items.extend(cur_csv::parse_line_items(&data, &path)?);
            }
        }

        Ok(line_items)
    }

    async fn transform(&self, data: Vec<UsageRecord>) -> Result<Vec<UsageReport>> {
        let group_by = self.config.group_by();
        let daily_average = self.config.daily_average();
        let mut reports = Vec::with_capacity(self.services.len());

        for &service in &self.services {
            let records = extract_usage(data.clone(), service, self.config.negation(), group_by);

            if records.is_empty() {
                tracing::warn!(
                    "⚠️ No {} rows matched usage type '{}'",
                    service,
                    service.usage_type_pattern()
                );
            }

            if daily_average {
                let invalid_months: BTreeSet<&str> = records
                    .iter()
                    .filter(|r| days_in_month(&r.month).is_none())
                    .map(|r| r.month.as_str())
                    .collect();
                for month in invalid_months {
                    tracing::warn!("⚠️ Invalid month format (expected YYYY-MM): {}", month);
                }
            }

            reports.push(UsageReport {
                service,
                columns: Column::for_report(group_by, daily_average),
                records,
            });
        }

        Ok(reports)
    }

    async fn load(&self, reports: Vec<UsageReport>) -> Result<Vec<String>> {
        let mut destinations = Vec::with_capacity(reports.len());

        for report in reports {
            match self.config.output_file(report.service) {
                Some(path) => {
                    let data = render::usage_csv(&report)?;
                    tracing::debug!("Writing {} bytes to {}", data.len(), path);
                    self.storage.write_file(&path, &data).await?;
                    tracing::info!("💾 Saved {} results to {}", report.service, path);
                    destinations.push(path);
                }
                None => {
                    if !report.is_empty() {
                        self.print_report(&report);
                    }
                    destinations.push(STDOUT_DESTINATION.to_string());
                }
            }
        }

        Ok(destinations)
    }
}
