use clap::Parser;
use tracker_migrate::core::IssuePoster;
use tracker_migrate::utils::error::ErrorSeverity;
use tracker_migrate::utils::{logger, validation::Validate};
use tracker_migrate::{
    CliConfig, Credentials, CurlPoster, HttpPoster, LocalStorage, MigrationEngine,
    MigrationPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting tracker-migrate");

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            tracing::error!("Suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());
            let exit_code = match e.severity() {
                ErrorSeverity::Critical => 3,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    };
    tracing::debug!("Resolved config: {:?}", config);

    let credentials = Credentials {
        username: config.target.username.clone(),
        password: config.target.password.clone(),
    };
    let poster: Box<dyn IssuePoster> = match config.load.transport.as_str() {
        "http" => Box::new(HttpPoster::new(config.target.base_url.clone(), credentials)),
        _ => Box::new(CurlPoster::new(
            config.load.http_client.clone(),
            config.target.base_url.clone(),
            credentials,
        )),
    };

    let storage = LocalStorage::new(".".to_string());
    let pipeline = MigrationPipeline::new(storage, config, poster);
    let engine = MigrationEngine::new(pipeline);

    // 執行期間的錯誤只記錄，不影響退出碼
    match engine.run().await {
        Ok(report) => {
            tracing::info!(
                "Migration finished: {} issues, {} pages downloaded, {} skipped, {} failed",
                report.issues_read,
                report.pages_downloaded,
                report.pages_skipped,
                report.pages_failed
            );
            if !report.created_keys.is_empty() {
                tracing::info!("Created issues: {}", report.created_keys.join(", "));
            }
        }
        Err(e) => {
            tracing::error!(
                "Migration stopped: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
        }
    }

    Ok(())
}
