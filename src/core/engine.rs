use crate::core::extract::format_cost;
use crate::core::Pipeline;
use crate::utils::error::Result;

/// Runs a usage pipeline end to end: extract → transform → load.
pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<Vec<String>> {
        tracing::debug!("Extracting line items...");
        let line_items = self.pipeline.extract().await?;
        tracing::info!("📥 Read {} line items", line_items.len());

        tracing::debug!("Filtering and grouping...");
        let reports = self.pipeline.transform(line_items).await?;
        for report in &reports {
            tracing::info!(
                "🔧 {}: {} rows, total cost {}",
                report.title(),
                report.records.len(),
                format_cost(report.total_cost())
            );
        }

        let destinations = self.pipeline.load(reports).await?;
        tracing::debug!("Reports written to: {:?}", destinations);

        Ok(destinations)
    }
}
