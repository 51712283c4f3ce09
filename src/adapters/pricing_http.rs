use crate::domain::model::MeteredUnitMap;
use crate::domain::ports::PricingSource;
use crate::domain::pricing::RateTableQuery;
use crate::utils::error::{CurError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_PRICING_BASE_URL: &str =
    "https://b0.p.awsstatic.com/pricing/2.0/meteredUnitMaps/computesavingsplan/USD/current";

/// Reads Compute Savings Plans metered unit maps from the public AWS pricing site.
pub struct HttpPricingSource {
    client: Client,
    base_url: String,
}

impl HttpPricingSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// `{base}/{product}/{segments...}/index.json`，每段各自做 percent-encoding
    pub fn unit_map_url(&self, query: &dyn RateTableQuery) -> Result<Url> {
        let invalid = |reason: String| CurError::InvalidConfigValueError {
            field: "pricing.base_url".to_string(),
            value: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| invalid("URL cannot be a base".to_string()))?;
            segments.pop_if_empty().push(query.product().path_segment());
            for segment in query.path_segments() {
                segments.push(segment);
            }
            segments.push("index.json");
        }
        Ok(url)
    }
}

#[async_trait]
impl PricingSource for HttpPricingSource {
    async fn fetch_unit_map(&self, query: &dyn RateTableQuery) -> Result<MeteredUnitMap> {
        let url = self.unit_map_url(query)?;
        tracing::debug!("Making pricing request to: {}", url);

        let response = self.client.get(url).send().await?;
        tracing::debug!("Pricing response status: {}", response.status());

        let unit_map: MeteredUnitMap = response.error_for_status()?.json().await?;
        tracing::debug!("Pricing data covers {} regions", unit_map.regions.len());
        Ok(unit_map)
    }
}
