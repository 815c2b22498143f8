use clap::Parser;
use golem_population::app::{clean, dev, Probe};
use golem_population::config::cli::{Cli, Command};
use golem_population::server::{self, shutdown_signal};
use golem_population::utils::error::{ErrorSeverity, PopulationError};
use golem_population::utils::{logger, validation::Validate};
use golem_population::AppConfig;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    logger::init_from_env(cli.verbose);

    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config.display(), e);
            eprintln!("💡 Make sure the file is valid TOML");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(command: Command, config: &AppConfig) -> Result<(), PopulationError> {
    match command {
        Command::Api => server::api::run(config, shutdown_signal()).await,
        Command::Dashboard => server::dashboard::run(config, shutdown_signal()).await,
        Command::Rival => server::rival::run(config, shutdown_signal()).await,
        Command::Dev => dev::run(config, Probe::startup(), shutdown_signal()).await,
        Command::Healthcheck { url, timeout_secs } => {
            let mut probe = Probe::from_config(&config.probe);
            if let Some(secs) = timeout_secs {
                probe.timeout = Duration::from_secs(secs);
            }
            let url = url.unwrap_or_else(|| config.api.health_url());

            match probe.check(&url).await {
                Ok(()) => {
                    println!("✅ {} is healthy", url);
                    Ok(())
                }
                Err(e) => {
                    // 給容器的 HEALTHCHECK 使用：失敗一律回傳 1
                    eprintln!("❌ {} is unhealthy: {}", url, e);
                    std::process::exit(1);
                }
            }
        }
        Command::Clean => {
            let removed = clean::remove_all(&clean::targets(config))?;
            println!("🧹 Removed {} path(s)", removed.len());
            Ok(())
        }
    }
}
