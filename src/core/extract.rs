//! Filtering, grouping and formatting of CUR line items.

use crate::domain::model::{GroupBy, NegationFilter, Service, UsageRecord, SAVINGS_PLAN_NEGATION};
use chrono::NaiveDate;
use std::collections::BTreeMap;

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn matches_service(record: &UsageRecord, service: Service) -> bool {
    let usage_type = record.usage_type_str();
    !usage_type.is_empty() && contains_ignore_case(usage_type, service.usage_type_pattern())
}

pub fn is_negation(record: &UsageRecord) -> bool {
    contains_ignore_case(record.item_description_str(), SAVINGS_PLAN_NEGATION)
}

pub fn apply_negation(records: Vec<UsageRecord>, filter: NegationFilter) -> Vec<UsageRecord> {
    match filter {
        NegationFilter::Include => records,
        NegationFilter::Exclude => records.into_iter().filter(|r| !is_negation(r)).collect(),
        NegationFilter::Only => records.into_iter().filter(is_negation).collect(),
    }
}

/// Sum cost per `(aws_account_id, month, [usage_type], [item_description])`.
///
/// An empty `group_by` leaves the records untouched. The result is ordered by
/// the group key.
pub fn group_records(records: Vec<UsageRecord>, group_by: &[GroupBy]) -> Vec<UsageRecord> {
    if group_by.is_empty() {
        return records;
    }

    let by_usage_type = group_by.contains(&GroupBy::UsageType);
    let by_item_description = group_by.contains(&GroupBy::ItemDescription);

    let mut totals: BTreeMap<(String, String, Option<String>, Option<String>), f64> =
        BTreeMap::new();
    for record in records {
        let key = (
            record.aws_account_id,
            record.month,
            if by_usage_type { record.usage_type } else { None },
            if by_item_description {
                record.item_description
            } else {
                None
            },
        );
        *totals.entry(key).or_insert(0.0) += record.cost;
    }

    totals
        .into_iter()
        .map(
            |((aws_account_id, month, usage_type, item_description), cost)| UsageRecord {
                month,
                aws_account_id,
                usage_type,
                item_description,
                cost,
            },
        )
        .collect()
}

/// Stable sort by usage type, then item description.
pub fn sort_records(records: &mut [UsageRecord]) {
    records.sort_by(|a, b| {
        a.usage_type
            .cmp(&b.usage_type)
            .then_with(|| a.item_description.cmp(&b.item_description))
    });
}

/// Service filter, negation filter, grouping and ordering in one pass.
pub fn extract_usage(
    records: Vec<UsageRecord>,
    service: Service,
    negation: NegationFilter,
    group_by: &[GroupBy],
) -> Vec<UsageRecord> {
    let matched: Vec<UsageRecord> = records
        .into_iter()
        .filter(|r| matches_service(r, service))
        .collect();
    let filtered = apply_negation(matched, negation);
    let mut grouped = group_records(filtered, group_by);
    sort_records(&mut grouped);
    grouped
}

/// 固定 10 位小數，去掉尾端的 0 與小數點
pub fn format_cost(cost: f64) -> String {
    let formatted = format!("{:.10}", cost);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Number of days in a `YYYY-MM` month.
pub fn days_in_month(month: &str) -> Option<u32> {
    let (year, month) = month.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

pub fn daily_cost(record: &UsageRecord) -> Option<f64> {
    days_in_month(&record.month).map(|days| record.cost / f64::from(days))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<UsageRecord> {
        vec![
            UsageRecord::new("2024-05", "111111111111", "APN1-BoxUsage:t3.medium", "$0.0544 per On Demand Linux t3.medium Instance Hour", 40.5),
            UsageRecord::new("2024-05", "111111111111", "APN1-BoxUsage:t3.medium", "SavingsPlanNegation used by AccountId : 111111111111", -12.25),
            UsageRecord::new("2024-05", "111111111111", "APN1-Fargate-vCPU-Hours:perCPU", "AWS Fargate - vCPU - Asia Pacific (Tokyo)", 8.0),
            UsageRecord::new("2024-05", "222222222222", "APN1-Fargate-GB-Hours", "AWS Fargate - Memory - Asia Pacific (Tokyo)", 2.5),
            UsageRecord::new("2024-05", "222222222222", "APN1-Fargate-vCPU-Hours:perCPU", "savingsplannegation used by AccountId : 222222222222", -3.0),
            UsageRecord::new("2024-06", "111111111111", "APN1-Lambda-GB-Second", "AWS Lambda - Total Compute - Asia Pacific (Tokyo)", 1.75),
            UsageRecord::new("2024-06", "111111111111", "APN1-Request", "AWS Lambda - Requests", 0.2),
            UsageRecord::new("2024-06", "111111111111", "", "Tax", 9.0),
        ]
    }

    #[test]
    fn test_service_filter_matches_pattern_only() {
        let ec2 = extract_usage(sample_records(), Service::Ec2, NegationFilter::Include, &[]);
        assert_eq!(ec2.len(), 2);
        assert!(ec2.iter().all(|r| r.usage_type_str().contains("Box")));

        let fargate = extract_usage(sample_records(), Service::Fargate, NegationFilter::Include, &[]);
        assert_eq!(fargate.len(), 3);

        let lambda = extract_usage(sample_records(), Service::Lambda, NegationFilter::Include, &[]);
        assert_eq!(lambda.len(), 1);
        assert_eq!(lambda[0].usage_type_str(), "APN1-Lambda-GB-Second");
    }

    #[test]
    fn test_service_filter_is_case_insensitive() {
        let record = UsageRecord::new("2024-05", "1", "apn1-fargate-gb-hours", "x", 1.0);
        assert!(matches_service(&record, Service::Fargate));
        assert!(!matches_service(&record, Service::Ec2));
    }

    #[test]
    fn test_negation_filters_partition_rows() {
        let all = extract_usage(sample_records(), Service::Fargate, NegationFilter::Include, &[]);
        let excluded = extract_usage(sample_records(), Service::Fargate, NegationFilter::Exclude, &[]);
        let only = extract_usage(sample_records(), Service::Fargate, NegationFilter::Only, &[]);

        assert_eq!(excluded.len() + only.len(), all.len());
        assert!(excluded.iter().all(|r| !is_negation(r)));
        assert!(only.iter().all(is_negation));
        assert!(excluded.iter().all(|r| !only.contains(r)));
    }

    #[test]
    fn test_grouping_preserves_total_cost() {
        let ungrouped = extract_usage(sample_records(), Service::Fargate, NegationFilter::Include, &[]);
        let expected: f64 = ungrouped.iter().map(|r| r.cost).sum();

        for group_by in [
            vec![GroupBy::UsageType],
            vec![GroupBy::ItemDescription],
            vec![GroupBy::UsageType, GroupBy::ItemDescription],
        ] {
            let grouped = extract_usage(sample_records(), Service::Fargate, NegationFilter::Include, &group_by);
            let total: f64 = grouped.iter().map(|r| r.cost).sum();
            assert!((total - expected).abs() < 1e-9, "group_by {:?}", group_by);
        }
    }

    #[test]
    fn test_grouping_by_usage_type_drops_description() {
        let grouped = extract_usage(
            sample_records(),
            Service::Ec2,
            NegationFilter::Include,
            &[GroupBy::UsageType],
        );
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].usage_type.as_deref(), Some("APN1-BoxUsage:t3.medium"));
        assert_eq!(grouped[0].item_description, None);
        assert!((grouped[0].cost - 28.25).abs() < 1e-9);
    }

    #[test]
    fn test_grouping_keeps_accounts_apart() {
        let grouped = extract_usage(
            sample_records(),
            Service::Fargate,
            NegationFilter::Include,
            &[GroupBy::UsageType],
        );
        // 111.. vCPU, 222.. GB, 222.. vCPU
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].usage_type.as_deref(), Some("APN1-Fargate-GB-Hours"));
        assert_eq!(grouped[1].aws_account_id, "111111111111");
        assert_eq!(grouped[2].aws_account_id, "222222222222");
    }

    #[test]
    fn test_sort_by_usage_type_then_description() {
        let sorted = extract_usage(sample_records(), Service::Fargate, NegationFilter::Include, &[]);
        let keys: Vec<(&str, &str)> = sorted
            .iter()
            .map(|r| (r.usage_type_str(), r.item_description_str()))
            .collect();
        let mut expected = keys.clone();
        expected.sort();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(40.5), "40.5");
        assert_eq!(format_cost(12.0), "12");
        assert_eq!(format_cost(0.0), "0");
        assert_eq!(format_cost(-3.25), "-3.25");
        assert_eq!(format_cost(0.00000000004), "0");
        assert_eq!(format_cost(0.1234567891), "0.1234567891");
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month("2024-02"), Some(29));
        assert_eq!(days_in_month("2023-02"), Some(28));
        assert_eq!(days_in_month("2024-12"), Some(31));
        assert_eq!(days_in_month("2024-04"), Some(30));
        assert_eq!(days_in_month("2024-13"), None);
        assert_eq!(days_in_month("May 2024"), None);
        assert_eq!(days_in_month("2024-05-01"), None);
    }

    #[test]
    fn test_daily_cost() {
        let record = UsageRecord::new("2024-06", "1", "APN1-Lambda-GB-Second", "x", 30.0);
        assert_eq!(daily_cost(&record), Some(1.0));
        let invalid = UsageRecord::new("unknown", "1", "APN1-Lambda-GB-Second", "x", 30.0);
        assert_eq!(daily_cost(&invalid), None);
    }
}
