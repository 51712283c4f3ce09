use crate::config::toml_config::ToolConfig;
use crate::config::{OutputTarget, UsageOptions};
use crate::domain::model::{
    DiscountQuery, FargateRateQuery, GroupBy, LambdaRateQuery, NegationFilter,
};
use crate::domain::pricing::{
    CpuArchitecture, FargateOperatingSystem, OperatingSystem, PaymentOption, Region, Tenancy,
    Term,
};
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "cur-extract", version)]
#[command(about = "Extract EC2, Fargate and Lambda usage from AWS CUR exports and look up Savings Plans discount rates")]
pub struct CliConfig {
    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// TOML configuration file (defaults to ./cur-extract.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Extract line items whose usage_type contains "Fargate"
    AwsFargate(UsageArgs),
    /// Extract line items whose usage_type contains "Box"
    AmazonEc2(UsageArgs),
    /// Extract line items whose usage_type contains "Lambda-GB"
    AwsLambda(UsageArgs),
    /// Extract Fargate, EC2 and Lambda usage in one run
    All(AllArgs),
    /// Savings Plans discount rate of one EC2 instance type
    AmazonEc2DiscountRate(Ec2DiscountArgs),
    /// Savings Plans discount rates of every EC2 entry
    AmazonEc2DiscountRates(Ec2RateTableArgs),
    /// Savings Plans discount rates for Fargate
    AwsFargateDiscountRates(FargateRateTableArgs),
    /// Savings Plans discount rates for Lambda
    AwsLambdaDiscountRates(LambdaRateTableArgs),
}

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Drop SavingsPlanNegation line items
    #[arg(long, conflicts_with = "negation_only")]
    pub no_negation: bool,

    /// Keep only SavingsPlanNegation line items
    #[arg(long)]
    pub negation_only: bool,

    /// Group keys added to (aws_account_id, month)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub group_by: Vec<GroupBy>,

    /// Print a markdown table instead of a terminal table
    #[arg(long)]
    pub markdown: bool,

    /// Add a daily_cost column (cost / days in month)
    #[arg(long)]
    pub daily_average: bool,
}

impl FilterArgs {
    pub fn negation(&self) -> NegationFilter {
        match (self.no_negation, self.negation_only) {
            (true, _) => NegationFilter::Exclude,
            (false, true) => NegationFilter::Only,
            (false, false) => NegationFilter::Include,
        }
    }

    fn into_options(self, csv_files: Vec<String>, output: OutputTarget, settings: &ToolConfig) -> UsageOptions {
        let negation = self.negation();
        let mut group_by = self.group_by;
        group_by.sort();
        group_by.dedup();

        UsageOptions {
            input_patterns: csv_files,
            output,
            negation,
            group_by,
            markdown: self.markdown || settings.markdown(),
            daily_average: self.daily_average,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct UsageArgs {
    /// CUR CSV files or glob patterns
    #[arg(required = true, num_args = 1..)]
    pub csv_files: Vec<String>,

    /// Write the result to this CSV file instead of printing it
    #[arg(long)]
    pub output_file: Option<String>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

impl UsageArgs {
    pub fn into_options(self, settings: &ToolConfig) -> UsageOptions {
        let output = match self.output_file {
            Some(path) => OutputTarget::File(path),
            None => OutputTarget::Stdout,
        };
        self.filter.into_options(self.csv_files, output, settings)
    }
}

#[derive(Debug, Clone, Args)]
pub struct AllArgs {
    /// CUR CSV files or glob patterns
    #[arg(required = true, num_args = 1..)]
    pub csv_files: Vec<String>,

    /// Write fargate_usage.csv, ec2_usage.csv and lambda_usage.csv into this directory
    #[arg(long)]
    pub output_dir: Option<String>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

impl AllArgs {
    pub fn into_options(self, settings: &ToolConfig) -> UsageOptions {
        let output = match self.output_dir {
            Some(dir) => OutputTarget::Directory(dir),
            None => OutputTarget::Stdout,
        };
        self.filter.into_options(self.csv_files, output, settings)
    }
}

/// Term / payment option / region shared by every discount command.
#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    #[arg(long, value_enum)]
    pub term: Option<Term>,

    #[arg(long, value_enum)]
    pub payment_option: Option<PaymentOption>,

    #[arg(long, value_enum)]
    pub region: Option<Region>,
}

impl PlanArgs {
    /// 命令列 > 設定檔 > 內建預設值
    pub fn resolve(&self, settings: &ToolConfig) -> Result<(Term, PaymentOption, Region)> {
        let term = match self.term {
            Some(term) => term,
            None => settings.default_term()?,
        };
        let payment_option = match self.payment_option {
            Some(option) => option,
            None => settings.default_payment_option()?,
        };
        let region = match self.region {
            Some(region) => region,
            None => settings.default_region()?,
        };
        Ok((term, payment_option, region))
    }
}

#[derive(Debug, Clone, Args)]
pub struct Ec2DiscountArgs {
    /// EC2 instance type, e.g. t3.medium
    pub instance_type: String,

    #[command(flatten)]
    pub plan: PlanArgs,

    #[arg(long, value_enum, default_value_t = OperatingSystem::Linux)]
    pub operating_system: OperatingSystem,

    #[arg(long, value_enum, default_value_t = Tenancy::Shared)]
    pub tenancy: Tenancy,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl Ec2DiscountArgs {
    pub fn query(&self, settings: &ToolConfig) -> Result<DiscountQuery> {
        let (term, payment_option, region) = self.plan.resolve(settings)?;
        Ok(DiscountQuery {
            instance_type: self.instance_type.trim().to_string(),
            region,
            term,
            payment_option,
            operating_system: self.operating_system,
            tenancy: self.tenancy,
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct RateOutputArgs {
    /// Only show entries whose key contains this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,

    #[arg(long)]
    pub markdown: bool,

    /// Print the table as JSON
    #[arg(long, conflicts_with = "markdown")]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct Ec2RateTableArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    #[arg(long, value_enum, default_value_t = OperatingSystem::Linux)]
    pub operating_system: OperatingSystem,

    #[arg(long, value_enum, default_value_t = Tenancy::Shared)]
    pub tenancy: Tenancy,

    #[command(flatten)]
    pub output: RateOutputArgs,
}

impl Ec2RateTableArgs {
    /// The instance type is not part of the unit map path, so it stays empty.
    pub fn query(&self, settings: &ToolConfig) -> Result<DiscountQuery> {
        let (term, payment_option, region) = self.plan.resolve(settings)?;
        Ok(DiscountQuery {
            instance_type: String::new(),
            region,
            term,
            payment_option,
            operating_system: self.operating_system,
            tenancy: self.tenancy,
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct FargateRateTableArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    #[arg(long, value_enum, default_value_t = FargateOperatingSystem::Linux)]
    pub operating_system: FargateOperatingSystem,

    #[arg(long, value_enum, default_value_t = CpuArchitecture::X86)]
    pub cpu_architecture: CpuArchitecture,

    #[command(flatten)]
    pub output: RateOutputArgs,
}

impl FargateRateTableArgs {
    pub fn query(&self, settings: &ToolConfig) -> Result<FargateRateQuery> {
        let (term, payment_option, region) = self.plan.resolve(settings)?;
        Ok(FargateRateQuery {
            term,
            payment_option,
            region,
            operating_system: self.operating_system,
            cpu_architecture: self.cpu_architecture,
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct LambdaRateTableArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    #[command(flatten)]
    pub output: RateOutputArgs,
}

impl LambdaRateTableArgs {
    pub fn query(&self, settings: &ToolConfig) -> Result<LambdaRateQuery> {
        let (term, payment_option, region) = self.plan.resolve(settings)?;
        Ok(LambdaRateQuery {
            term,
            payment_option,
            region,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        CliConfig::command().debug_assert();
    }

    #[test]
    fn test_parse_usage_command() {
        let cli = CliConfig::try_parse_from([
            "cur-extract",
            "amazon-ec2",
            "cur-2024-05.csv",
            "cur-2024-06.csv",
            "--no-negation",
            "--group-by",
            "usage-type,item-description",
            "--markdown",
        ])
        .unwrap();

        let Command::AmazonEc2(args) = cli.command else {
            panic!("expected amazon-ec2");
        };
        let options = args.into_options(&ToolConfig::default());
        assert_eq!(options.input_patterns.len(), 2);
        assert_eq!(options.negation, NegationFilter::Exclude);
        assert_eq!(options.group_by, vec![GroupBy::UsageType, GroupBy::ItemDescription]);
        assert!(options.markdown);
        assert_eq!(options.output, OutputTarget::Stdout);
    }

    #[test]
    fn test_negation_flags_are_mutually_exclusive() {
        let result = CliConfig::try_parse_from([
            "cur-extract",
            "aws-fargate",
            "cur.csv",
            "--no-negation",
            "--negation-only",
        ]);
        assert!(result.is_err());

        let cli = CliConfig::try_parse_from(["cur-extract", "aws-fargate", "cur.csv", "--negation-only"]).unwrap();
        let Command::AwsFargate(args) = cli.command else {
            panic!("expected aws-fargate");
        };
        assert_eq!(args.filter.negation(), NegationFilter::Only);
    }

    #[test]
    fn test_parse_discount_command_with_labels() {
        let cli = CliConfig::try_parse_from([
            "cur-extract",
            "amazon-ec2-discount-rate",
            "m5.large",
            "--term",
            "3 year",
            "--region",
            "us-east-ohio",
            "--payment-option",
            "No Upfront",
        ])
        .unwrap();

        let Command::AmazonEc2DiscountRate(args) = cli.command else {
            panic!("expected amazon-ec2-discount-rate");
        };
        let query = args.query(&ToolConfig::default()).unwrap();
        assert_eq!(query.instance_type, "m5.large");
        assert_eq!(query.term, Term::ThreeYear);
        assert_eq!(query.region, Region::UsEastOhio);
        assert_eq!(query.payment_option, PaymentOption::NoUpfront);
        assert_eq!(query.operating_system, OperatingSystem::Linux);
        assert_eq!(query.tenancy, Tenancy::Shared);
    }

    #[test]
    fn test_discount_defaults_come_from_settings() {
        let settings = ToolConfig::from_toml_str("[defaults]\nregion = \"EU (Ireland)\"\n").unwrap();
        let cli = CliConfig::try_parse_from(["cur-extract", "aws-lambda-discount-rates"]).unwrap();
        let Command::AwsLambdaDiscountRates(args) = cli.command else {
            panic!("expected aws-lambda-discount-rates");
        };
        let query = args.query(&settings).unwrap();
        assert_eq!(query.region, Region::EuIreland);
        assert_eq!(query.term, Term::OneYear);
        assert_eq!(query.payment_option, PaymentOption::PartialUpfront);
    }

    #[test]
    fn test_all_command_output_dir() {
        let cli = CliConfig::try_parse_from(["cur-extract", "all", "cur.csv", "--output-dir", "out"]).unwrap();
        let Command::All(args) = cli.command else {
            panic!("expected all");
        };
        let options = args.into_options(&ToolConfig::default());
        assert_eq!(options.output, OutputTarget::Directory("out".to_string()));
    }
}
