use crate::adapters::pricing_http::HttpPricingSource;
use crate::adapters::storage::LocalStorage;
use crate::app::pipelines::UsagePipeline;
use crate::app::render;
use crate::config::cli::{Command, RateOutputArgs};
use crate::config::toml_config::ToolConfig;
use crate::config::UsageOptions;
use crate::core::discount::DiscountCalculator;
use crate::core::engine::ReportEngine;
use crate::domain::model::{RateTable, Service};
use crate::domain::pricing::RateTableQuery;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use colored::Colorize;

pub async fn execute(command: Command, settings: &ToolConfig) -> Result<()> {
    match command {
        Command::AwsFargate(args) => run_usage(args.into_options(settings), vec![Service::Fargate]).await,
        Command::AmazonEc2(args) => run_usage(args.into_options(settings), vec![Service::Ec2]).await,
        Command::AwsLambda(args) => run_usage(args.into_options(settings), vec![Service::Lambda]).await,
        Command::All(args) => run_usage(args.into_options(settings), Service::ALL.to_vec()).await,
        Command::AmazonEc2DiscountRate(args) => {
            let query = args.query(settings)?;
            validation::validate_non_empty_string("instance_type", &query.instance_type)?;

            let calculator = DiscountCalculator::new(pricing_source(settings)?);
            let result = calculator.instance_discount(&query).await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                render::print_discount_summary(&result, &query);
            }
            Ok(())
        }
        Command::AmazonEc2DiscountRates(args) => {
            let query = args.query(settings)?;
            run_rate_table(&query, &args.output, settings).await
        }
        Command::AwsFargateDiscountRates(args) => {
            let query = args.query(settings)?;
            run_rate_table(&query, &args.output, settings).await
        }
        Command::AwsLambdaDiscountRates(args) => {
            let query = args.query(settings)?;
            run_rate_table(&query, &args.output, settings).await
        }
    }
}

async fn run_usage(options: UsageOptions, services: Vec<Service>) -> Result<()> {
    options.validate()?;
    tracing::debug!("Usage options: {:?}", options);

    let pipeline = UsagePipeline::new(LocalStorage::default(), options, services);
    let engine = ReportEngine::new(pipeline);

    for destination in engine.run().await? {
        if destination != crate::app::pipelines::usage_pipeline::STDOUT_DESTINATION {
            println!("{} {}", "📁 Output saved to:".green(), destination);
        }
    }
    Ok(())
}

fn pricing_source(settings: &ToolConfig) -> Result<HttpPricingSource> {
    HttpPricingSource::new(settings.pricing_base_url(), settings.pricing_timeout())
}

async fn run_rate_table(
    query: &dyn RateTableQuery,
    output: &RateOutputArgs,
    settings: &ToolConfig,
) -> Result<()> {
    let calculator = DiscountCalculator::new(pricing_source(settings)?);
    let table = calculator.rate_table(query).await?;
    let filter = output.filter.as_deref();

    if output.json {
        println!("{}", serde_json::to_string_pretty(&filtered(&table, filter))?);
        return Ok(());
    }

    let rows = render::rate_rows(&table, filter);
    if rows.is_empty() {
        tracing::warn!("⚠️ No discount rates matched filter '{}'", filter.unwrap_or_default());
        return Ok(());
    }

    let title = render::rate_title(&table);
    if output.markdown || settings.markdown() {
        println!("{}", render::markdown_table(&title, &render::RATE_HEADERS, &rows));
    } else {
        println!("{}", title.bold());
        println!("{}", render::terminal_table(&render::RATE_HEADERS, &rows));
    }
    Ok(())
}

/// 只保留 key 含有 filter 的項目 (不分大小寫)
fn filtered(table: &RateTable, filter: Option<&str>) -> RateTable {
    let Some(needle) = filter.map(str::to_lowercase) else {
        return table.clone();
    };
    RateTable {
        product: table.product.clone(),
        region: table.region,
        rates: table
            .rates
            .iter()
            .filter(|(key, _)| key.to_lowercase().contains(&needle))
            .map(|(key, rate)| (key.clone(), *rate))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::Region;
    use std::collections::BTreeMap;

    #[test]
    fn test_filtered_rate_table() {
        let table = RateTable {
            product: "Lambda".to_string(),
            region: Region::AsiaPacificTokyo,
            rates: BTreeMap::from([
                ("Lambda-GB-Second".to_string(), 0.12),
                ("Lambda-Provisioned-GB-Second".to_string(), 0.17),
                ("Request".to_string(), 0.0),
            ]),
        };

        assert_eq!(filtered(&table, None), table);

        let provisioned = filtered(&table, Some("PROVISIONED"));
        assert_eq!(provisioned.rates.len(), 1);
        assert!(provisioned.rates.contains_key("Lambda-Provisioned-GB-Second"));
        assert_eq!(provisioned.region, Region::AsiaPacificTokyo);
    }
}
