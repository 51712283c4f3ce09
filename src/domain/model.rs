use crate::domain::pricing::{
    CpuArchitecture, FargateOperatingSystem, OperatingSystem, PaymentOption, RateTableQuery,
    Region, SavingsPlanProduct, Tenancy, Term,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CUR 明細中被 Savings Plans 抵扣的那一行
pub const SAVINGS_PLAN_NEGATION: &str = "SavingsPlanNegation";

/// One CUR line item, or one aggregated row after grouping.
///
/// Grouping always keeps `aws_account_id` and `month`; `usage_type` and
/// `item_description` are `None` when they are not part of the group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub month: String,
    pub aws_account_id: String,
    pub usage_type: Option<String>,
    pub item_description: Option<String>,
    pub cost: f64,
}

impl UsageRecord {
    pub fn new(
        month: impl Into<String>,
        aws_account_id: impl Into<String>,
        usage_type: impl Into<String>,
        item_description: impl Into<String>,
        cost: f64,
    ) -> Self {
        Self {
            month: month.into(),
            aws_account_id: aws_account_id.into(),
            usage_type: Some(usage_type.into()),
            item_description: Some(item_description.into()),
            cost,
        }
    }

    pub fn usage_type_str(&self) -> &str {
        self.usage_type.as_deref().unwrap_or("")
    }

    pub fn item_description_str(&self) -> &str {
        self.item_description.as_deref().unwrap_or("")
    }
}

/// Services whose line items can be extracted, keyed by a usage-type pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Fargate,
    Ec2,
    Lambda,
}

impl Service {
    pub const ALL: [Service; 3] = [Service::Fargate, Service::Ec2, Service::Lambda];

    /// usage_type 中用來辨識服務的字串 (不分大小寫)
    pub fn usage_type_pattern(&self) -> &'static str {
        match self {
            Service::Fargate => "Fargate",
            Service::Ec2 => "Box",
            Service::Lambda => "Lambda-GB",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Service::Fargate => "Fargate Usage",
            Service::Ec2 => "EC2 Usage",
            Service::Lambda => "Lambda Usage",
        }
    }

    pub fn output_file_name(&self) -> &'static str {
        match self {
            Service::Fargate => "fargate_usage.csv",
            Service::Ec2 => "ec2_usage.csv",
            Service::Lambda => "lambda_usage.csv",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Fargate => f.write_str("Fargate"),
            Service::Ec2 => f.write_str("EC2"),
            Service::Lambda => f.write_str("Lambda"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum GroupBy {
    #[cfg_attr(feature = "cli", value(alias = "usage_type"))]
    UsageType,
    #[cfg_attr(feature = "cli", value(alias = "item_description"))]
    ItemDescription,
}

/// How `SavingsPlanNegation` line items are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegationFilter {
    #[default]
    Include,
    Exclude,
    Only,
}

/// Output columns of a usage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    AwsAccountId,
    Month,
    UsageType,
    ItemDescription,
    Cost,
    DailyCost,
}

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::AwsAccountId => "aws_account_id",
            Column::Month => "month",
            Column::UsageType => "usage_type",
            Column::ItemDescription => "item_description",
            Column::Cost => "cost",
            Column::DailyCost => "daily_cost",
        }
    }

    /// 報表欄位，分組時只留下分組鍵與 cost
    pub fn for_report(group_by: &[GroupBy], daily_average: bool) -> Vec<Column> {
        let mut columns = vec![Column::AwsAccountId, Column::Month];
        if group_by.is_empty() || group_by.contains(&GroupBy::UsageType) {
            columns.push(Column::UsageType);
        }
        if group_by.is_empty() || group_by.contains(&GroupBy::ItemDescription) {
            columns.push(Column::ItemDescription);
        }
        columns.push(Column::Cost);
        if daily_average {
            columns.push(Column::DailyCost);
        }
        columns
    }
}

/// Filtered (and possibly grouped) usage for one service.
#[derive(Debug, Clone)]
pub struct UsageReport {
    pub service: Service,
    pub columns: Vec<Column>,
    pub records: Vec<UsageRecord>,
}

impl UsageReport {
    pub fn title(&self) -> &'static str {
        self.service.title()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_cost(&self) -> f64 {
        self.records.iter().map(|r| r.cost).sum()
    }
}

/// Parameters of an EC2 Compute Savings Plans lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscountQuery {
    pub instance_type: String,
    pub region: Region,
    pub term: Term,
    pub payment_option: PaymentOption,
    pub operating_system: OperatingSystem,
    pub tenancy: Tenancy,
}

impl DiscountQuery {
    pub fn new(instance_type: impl Into<String>) -> Self {
        Self {
            instance_type: instance_type.into(),
            region: Region::AsiaPacificTokyo,
            term: Term::OneYear,
            payment_option: PaymentOption::PartialUpfront,
            operating_system: OperatingSystem::Linux,
            tenancy: Tenancy::Shared,
        }
    }
}

impl RateTableQuery for DiscountQuery {
    fn product(&self) -> SavingsPlanProduct {
        SavingsPlanProduct::Ec2
    }

    fn region(&self) -> Region {
        self.region
    }

    fn path_segments(&self) -> Vec<&'static str> {
        vec![
            self.term.label(),
            self.payment_option.label(),
            self.region.label(),
            self.operating_system.label(),
            self.tenancy.label(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountResult {
    pub instance_type: String,
    pub rate: f64,
    pub term: Term,
    pub payment_option: PaymentOption,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FargateRateQuery {
    pub term: Term,
    pub payment_option: PaymentOption,
    pub region: Region,
    pub operating_system: FargateOperatingSystem,
    pub cpu_architecture: CpuArchitecture,
}

impl Default for FargateRateQuery {
    fn default() -> Self {
        Self {
            term: Term::OneYear,
            payment_option: PaymentOption::PartialUpfront,
            region: Region::AsiaPacificTokyo,
            operating_system: FargateOperatingSystem::Linux,
            cpu_architecture: CpuArchitecture::X86,
        }
    }
}

impl RateTableQuery for FargateRateQuery {
    fn product(&self) -> SavingsPlanProduct {
        SavingsPlanProduct::Fargate
    }

    fn region(&self) -> Region {
        self.region
    }

    fn path_segments(&self) -> Vec<&'static str> {
        vec![
            self.term.label(),
            self.payment_option.label(),
            self.region.label(),
            self.operating_system.label(),
            self.cpu_architecture.label(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LambdaRateQuery {
    pub term: Term,
    pub payment_option: PaymentOption,
    pub region: Region,
}

impl Default for LambdaRateQuery {
    fn default() -> Self {
        Self {
            term: Term::OneYear,
            payment_option: PaymentOption::PartialUpfront,
            region: Region::AsiaPacificTokyo,
        }
    }
}

impl RateTableQuery for LambdaRateQuery {
    fn product(&self) -> SavingsPlanProduct {
        SavingsPlanProduct::Lambda
    }

    fn region(&self) -> Region {
        self.region
    }

    fn path_segments(&self) -> Vec<&'static str> {
        vec![
            self.term.label(),
            self.payment_option.label(),
            self.region.label(),
        ]
    }
}

/// Discount rate of every entry in one metered unit map region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    pub product: String,
    pub region: Region,
    pub rates: BTreeMap<String, f64>,
}

/// Raw metered unit map document published by AWS.
///
/// `regions` maps a region label to entries keyed by an opaque id; each entry
/// is a flat object such as `{"price": "0.0392", "ec2:PricePerUnit": "0.0544",
/// "ec2:InstanceType": "t3.medium", ...}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeteredUnitMap {
    #[serde(default)]
    pub regions: BTreeMap<String, BTreeMap<String, BTreeMap<String, serde_json::Value>>>,
}
