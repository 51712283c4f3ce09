use clap::Parser;
use cur_extract::app::commands;
use cur_extract::config::toml_config::ToolConfig;
use cur_extract::utils::error::{CurError, ErrorSeverity};
use cur_extract::utils::logger::{self, LogFormat};
use cur_extract::utils::validation::Validate;
use cur_extract::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 設定檔要先讀，才知道日誌格式
    let settings = match ToolConfig::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            logger::init_cli_logger(cli.verbose, LogFormat::default());
            exit_with(&e);
        }
    };

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, settings.log_format().unwrap_or_default());

    tracing::info!("Starting cur-extract CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = commands::execute(cli.command, &settings).await {
        exit_with(&e);
    }

    Ok(())
}

fn exit_with(e: &CurError) -> ! {
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 依嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
