use crate::domain::model::{GroupBy, MeteredUnitMap, NegationFilter, Service, UsageRecord, UsageReport};
use crate::domain::pricing::RateTableQuery;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Resolve a path or glob pattern into concrete file paths, sorted.
    fn expand(&self, pattern: &str) -> Result<Vec<String>>;
}

pub trait ConfigProvider: Send + Sync {
    fn input_patterns(&self) -> &[String];
    /// CSV destination for a service's report; `None` prints to stdout.
    fn output_file(&self, service: Service) -> Option<String>;
    fn negation(&self) -> NegationFilter;
    fn group_by(&self) -> &[GroupBy];
    fn markdown(&self) -> bool;
    fn daily_average(&self) -> bool;
}

#[async_trait]
pub trait PricingSource: Send + Sync {
    async fn fetch_unit_map(&self, query: &dyn RateTableQuery) -> Result<MeteredUnitMap>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<UsageRecord>>;
    /// One report per service the pipeline covers.
    async fn transform(&self, data: Vec<UsageRecord>) -> Result<Vec<UsageReport>>;
    /// Returns where each report went (a file path, or `stdout`).
    async fn load(&self, reports: Vec<UsageReport>) -> Result<Vec<String>>;
}
