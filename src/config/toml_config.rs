use crate::adapters::pricing_http::DEFAULT_PRICING_BASE_URL;
use crate::domain::pricing::{PaymentOption, Region, Term};
use crate::utils::error::{CurError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 未指定 --config 時會嘗試讀取的檔名
pub const DEFAULT_CONFIG_FILE: &str = "cur-extract.toml";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Defaults for the discount commands, written with AWS labels
/// (`region = "US East (Ohio)"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub region: Option<String>,
    pub term: Option<String>,
    pub payment_option: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub markdown: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
}

impl ToolConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CurError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CurError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Explicit path, else `cur-extract.toml` when present, else built-in defaults.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${PRICING_BASE_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CurError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn pricing_base_url(&self) -> &str {
        self.pricing
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_PRICING_BASE_URL)
    }

    pub fn pricing_timeout(&self) -> Duration {
        Duration::from_secs(
            self.pricing
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    pub fn default_region(&self) -> Result<Region> {
        parse_label("defaults.region", self.defaults.region.as_deref(), Region::AsiaPacificTokyo)
    }

    pub fn default_term(&self) -> Result<Term> {
        parse_label("defaults.term", self.defaults.term.as_deref(), Term::OneYear)
    }

    pub fn default_payment_option(&self) -> Result<PaymentOption> {
        parse_label(
            "defaults.payment_option",
            self.defaults.payment_option.as_deref(),
            PaymentOption::PartialUpfront,
        )
    }

    pub fn markdown(&self) -> bool {
        self.output.markdown.unwrap_or(false)
    }

    pub fn log_format(&self) -> Result<LogFormat> {
        match self.logging.format.as_deref() {
            Some(format) => format.parse(),
            None => Ok(LogFormat::default()),
        }
    }
}

fn parse_label<T>(field: &str, value: Option<&str>, fallback: T) -> Result<T>
where
    T: std::str::FromStr<Err = CurError>,
{
    match value {
        None => Ok(fallback),
        Some(raw) => raw.parse().map_err(|_| CurError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: "Use the AWS label, e.g. \"Asia Pacific (Tokyo)\", \"1 year\", \"No Upfront\""
                .to_string(),
        }),
    }
}

impl Validate for ToolConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("pricing.base_url", self.pricing_base_url())?;

        if let Some(timeout) = self.pricing.timeout_seconds {
            validation::validate_range("pricing.timeout_seconds", timeout, 1, 300)?;
        }

        self.default_region()?;
        self.default_term()?;
        self.default_payment_option()?;
        self.log_format()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ToolConfig::from_toml_str("").unwrap();
        assert_eq!(config.pricing_base_url(), DEFAULT_PRICING_BASE_URL);
        assert_eq!(config.pricing_timeout(), Duration::from_secs(30));
        assert_eq!(config.default_region().unwrap(), Region::AsiaPacificTokyo);
        assert_eq!(config.default_payment_option().unwrap(), PaymentOption::PartialUpfront);
        assert!(!config.markdown());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[pricing]
base_url = "https://pricing.internal.example.com/current"
timeout_seconds = 10

[defaults]
region = "US East (Ohio)"
term = "3 year"
payment_option = "All Upfront"

[output]
markdown = true

[logging]
format = "json"
"#;

        let config = ToolConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.pricing_base_url(), "https://pricing.internal.example.com/current");
        assert_eq!(config.pricing_timeout(), Duration::from_secs(10));
        assert_eq!(config.default_region().unwrap(), Region::UsEastOhio);
        assert_eq!(config.default_term().unwrap(), Term::ThreeYear);
        assert_eq!(config.default_payment_option().unwrap(), PaymentOption::AllUpfront);
        assert!(config.markdown());
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CUR_TEST_PRICING_URL", "https://mirror.example.com/pricing");

        let toml_content = r#"
[pricing]
base_url = "${CUR_TEST_PRICING_URL}"
"#;

        let config = ToolConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.pricing_base_url(), "https://mirror.example.com/pricing");

        std::env::remove_var("CUR_TEST_PRICING_URL");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = ToolConfig::from_toml_str("[pricing]\nbase_url = \"ftp://example.com\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_timeout = ToolConfig::from_toml_str("[pricing]\ntimeout_seconds = 0\n").unwrap();
        assert!(bad_timeout.validate().is_err());

        let bad_region = ToolConfig::from_toml_str("[defaults]\nregion = \"Tokyo\"\n").unwrap();
        assert!(bad_region.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\nmarkdown = true\n")
            .unwrap();

        let config = ToolConfig::load(Some(temp_file.path().to_str().unwrap())).unwrap();
        assert!(config.markdown());
    }
}
