#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::{GroupBy, NegationFilter, Service};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::Path;

/// Where a usage report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    /// 單一服務的 CSV 檔
    File(String),
    /// 每個服務各自一個 CSV 檔 (`fargate_usage.csv`, ...)
    Directory(String),
}

/// Options shared by the usage extraction commands.
#[derive(Debug, Clone)]
pub struct UsageOptions {
    pub input_patterns: Vec<String>,
    pub output: OutputTarget,
    pub negation: NegationFilter,
    pub group_by: Vec<GroupBy>,
    pub markdown: bool,
    pub daily_average: bool,
}

impl UsageOptions {
    pub fn new(input_patterns: Vec<String>) -> Self {
        Self {
            input_patterns,
            output: OutputTarget::Stdout,
            negation: NegationFilter::Include,
            group_by: Vec::new(),
            markdown: false,
            daily_average: false,
        }
    }
}

impl ConfigProvider for UsageOptions {
    fn input_patterns(&self) -> &[String] {
        &self.input_patterns
    }

    fn output_file(&self, service: Service) -> Option<String> {
        match &self.output {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path.clone()),
            OutputTarget::Directory(dir) => Some(
                Path::new(dir)
                    .join(service.output_file_name())
                    .to_string_lossy()
                    .into_owned(),
            ),
        }
    }

    fn negation(&self) -> NegationFilter {
        self.negation
    }

    fn group_by(&self) -> &[GroupBy] {
        &self.group_by
    }

    fn markdown(&self) -> bool {
        self.markdown
    }

    fn daily_average(&self) -> bool {
        self.daily_average
    }
}

impl Validate for UsageOptions {
    fn validate(&self) -> Result<()> {
        if self.input_patterns.is_empty() {
            return Err(crate::utils::error::CurError::MissingConfigError {
                field: "csv_files".to_string(),
            });
        }
        for pattern in &self.input_patterns {
            validation::validate_path("csv_files", pattern)?;
        }
        match &self.output {
            OutputTarget::Stdout => {}
            OutputTarget::File(path) => validation::validate_path("output_file", path)?,
            OutputTarget::Directory(dir) => validation::validate_path("output_dir", dir)?,
        }
        Ok(())
    }
}
