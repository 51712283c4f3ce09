use cur_extract::domain::model::{DiscountQuery, FargateRateQuery, LambdaRateQuery};
use cur_extract::domain::pricing::{PaymentOption, Region, Term};
use cur_extract::{CurError, DiscountCalculator, HttpPricingSource};
use httpmock::prelude::*;
use std::time::Duration;

fn calculator(server: &MockServer) -> anyhow::Result<DiscountCalculator<HttpPricingSource>> {
    let source = HttpPricingSource::new(server.url("/pricing"), Duration::from_secs(5))?;
    Ok(DiscountCalculator::new(source))
}

#[tokio::test]
async fn test_ec2_discount_rate_end_to_end() -> anyhow::Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path_contains("/pricing/compute-savings-plan-ec2/")
            .path_contains("index.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "regions": {
                    "US East (Ohio)": {
                        "m5.large": {
                            "price": "0.0868",
                            "ec2:PricePerUnit": "0.124",
                            "ec2:InstanceType": "m5.large"
                        },
                        "t3.medium": {
                            "price": "0.0292",
                            "ec2:PricePerUnit": "0.0416",
                            "ec2:InstanceType": "t3.medium"
                        }
                    }
                }
            }));
    });

    let mut query = DiscountQuery::new("m5.large");
    query.region = Region::UsEastOhio;
    query.term = Term::ThreeYear;
    query.payment_option = PaymentOption::NoUpfront;

    let result = calculator(&server)?.instance_discount(&query).await?;

    api_mock.assert();
    assert_eq!(result.instance_type, "m5.large");
    assert_eq!(result.rate, 0.3);
    assert_eq!(result.term, Term::ThreeYear);
    assert_eq!(result.payment_option, PaymentOption::NoUpfront);
    assert_eq!(result.region, Region::UsEastOhio);

    Ok(())
}

#[tokio::test]
async fn test_unknown_instance_type() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(serde_json::json!({
            "regions": {
                "Asia Pacific (Tokyo)": {
                    "t3.medium": {"price": "0.0392", "ec2:PricePerUnit": "0.0544", "ec2:InstanceType": "t3.medium"}
                }
            }
        }));
    });

    let err = calculator(&server)?
        .instance_discount(&DiscountQuery::new("z9.huge"))
        .await
        .unwrap_err();
    assert!(matches!(err, CurError::PricingNotFound { .. }));

    Ok(())
}

#[tokio::test]
async fn test_fargate_rate_table() -> anyhow::Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/compute-savings-plan-fargate-with-arm/");
        then.status(200).json_body(serde_json::json!({
            "regions": {
                "Asia Pacific (Tokyo)": {
                    "Fargate vCPU": {"price": "0.03856", "fargate:PricePerUnit": "0.05056"},
                    "Fargate Memory": {"price": "0.00423", "fargate:PricePerUnit": "0.00553"}
                }
            }
        }));
    });

    let table = calculator(&server)?
        .rate_table(&FargateRateQuery::default())
        .await?;

    api_mock.assert();
    assert_eq!(table.product, "Fargate");
    assert_eq!(table.region, Region::AsiaPacificTokyo);
    assert_eq!(table.rates["Fargate vCPU"], 0.2373);
    assert_eq!(table.rates["Fargate Memory"], 0.2351);

    Ok(())
}

#[tokio::test]
async fn test_pricing_unavailable() -> anyhow::Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/compute-savings-plan-lambda/");
        then.status(404);
    });

    let err = calculator(&server)?
        .rate_table(&LambdaRateQuery::default())
        .await
        .unwrap_err();

    api_mock.assert();
    assert!(matches!(err, CurError::ApiError(_)));

    Ok(())
}
