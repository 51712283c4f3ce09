//! Savings Plans discount rates computed from AWS metered unit maps.

use crate::domain::model::{DiscountQuery, DiscountResult, MeteredUnitMap, RateTable};
use crate::domain::ports::PricingSource;
use crate::domain::pricing::{RateTableQuery, Region, SavingsPlanProduct};
use crate::utils::error::{CurError, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Savings Plans price field of every entry.
const SAVINGS_PLAN_PRICE_FIELD: &str = "price";

type UnitEntry = BTreeMap<String, Value>;

/// `1 - savings_plan / on_demand`, rounded to four decimal places.
pub fn discount_rate(on_demand: f64, savings_plan: f64) -> Result<f64> {
    if !on_demand.is_finite() || on_demand <= 0.0 {
        return Err(CurError::ProcessingError {
            message: format!("On-demand price must be positive, got {}", on_demand),
        });
    }
    if !savings_plan.is_finite() {
        return Err(CurError::ProcessingError {
            message: format!("Savings Plans price is not a number: {}", savings_plan),
        });
    }
    Ok(round_rate(1.0 - savings_plan / on_demand))
}

pub fn round_rate(rate: f64) -> f64 {
    (rate * 10_000.0).round() / 10_000.0
}

/// 價格欄位可能是字串或數字
fn price_field(entry: &UnitEntry, field: &str) -> Option<f64> {
    match entry.get(field)? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn entry_rate(entry: &UnitEntry, product: SavingsPlanProduct) -> Result<f64> {
    let on_demand = price_field(entry, product.on_demand_field()).ok_or_else(|| {
        CurError::ProcessingError {
            message: format!("Missing or invalid '{}'", product.on_demand_field()),
        }
    })?;
    let savings_plan = price_field(entry, SAVINGS_PLAN_PRICE_FIELD).ok_or_else(|| {
        CurError::ProcessingError {
            message: format!("Missing or invalid '{}'", SAVINGS_PLAN_PRICE_FIELD),
        }
    })?;
    discount_rate(on_demand, savings_plan)
}

fn region_entries<'a>(
    unit_map: &'a MeteredUnitMap,
    region: Region,
) -> Result<&'a BTreeMap<String, UnitEntry>> {
    unit_map
        .regions
        .get(region.label())
        .ok_or_else(|| CurError::PricingNotFound {
            message: format!("region '{}' is missing from the pricing data", region),
        })
}

/// Discount rate of a single EC2 instance type.
pub fn instance_discount(unit_map: &MeteredUnitMap, query: &DiscountQuery) -> Result<DiscountResult> {
    let entries = region_entries(unit_map, query.region)?;

    let entry = entries
        .values()
        .find(|entry| {
            entry.get("ec2:InstanceType").and_then(Value::as_str)
                == Some(query.instance_type.as_str())
        })
        .ok_or_else(|| CurError::PricingNotFound {
            message: format!(
                "no discount rate for instance type {} in {}",
                query.instance_type, query.region
            ),
        })?;

    Ok(DiscountResult {
        instance_type: query.instance_type.clone(),
        rate: entry_rate(entry, SavingsPlanProduct::Ec2)?,
        term: query.term,
        payment_option: query.payment_option,
        region: query.region,
    })
}

/// Discount rate of every entry in a region. Entries without usable prices are skipped.
pub fn rate_table(
    unit_map: &MeteredUnitMap,
    product: SavingsPlanProduct,
    region: Region,
) -> Result<RateTable> {
    let entries = region_entries(unit_map, region)?;

    let mut rates = BTreeMap::new();
    for (key, entry) in entries {
        match entry_rate(entry, product) {
            Ok(rate) => {
                rates.insert(key.clone(), rate);
            }
            Err(e) => tracing::warn!("⚠️ Skipping pricing entry {}: {}", key, e),
        }
    }

    if rates.is_empty() {
        return Err(CurError::PricingNotFound {
            message: format!("no {} discount rates in {}", product.display_name(), region),
        });
    }

    Ok(RateTable {
        product: product.display_name().to_string(),
        region,
        rates,
    })
}

/// Fetches unit maps through a [`PricingSource`] and turns them into rates.
pub struct DiscountCalculator<P: PricingSource> {
    source: P,
}

impl<P: PricingSource> DiscountCalculator<P> {
    pub fn new(source: P) -> Self {
        Self { source }
    }

    pub async fn instance_discount(&self, query: &DiscountQuery) -> Result<DiscountResult> {
        tracing::info!(
            "🔎 Looking up {} ({}, {}, {}, {}, {})",
            query.instance_type,
            query.term,
            query.payment_option,
            query.region,
            query.operating_system,
            query.tenancy
        );
        let unit_map = self.source.fetch_unit_map(query).await?;
        instance_discount(&unit_map, query)
    }

    pub async fn rate_table(&self, query: &dyn RateTableQuery) -> Result<RateTable> {
        tracing::info!(
            "🔎 Loading {} discount rates for {}",
            query.product().display_name(),
            query.region()
        );
        let unit_map = self.source.fetch_unit_map(query).await?;
        let table = rate_table(&unit_map, query.product(), query.region())?;
        tracing::debug!("Computed {} discount rates", table.rates.len());
        Ok(table)
    }
}
