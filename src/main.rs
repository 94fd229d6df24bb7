use clap::Parser;
use ecs_export::config::usage_error_message;
use ecs_export::core::ConfigProvider;
use ecs_export::utils::{exitcode, logger, validation::Validate};
use ecs_export::{CliConfig, EcsClusterClient, Exporter, LocalStorage};

#[tokio::main]
async fn main() {
    let config = match CliConfig::try_parse() {
        Ok(config) => config,
        Err(e) if !e.use_stderr() => e.exit(), // --help / --version
        Err(e) => {
            let _ = e.print();
            println!("Error: {}", usage_error_message(&e));
            std::process::exit(exitcode::FAILURE);
        }
    };

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        println!("Error: {}", e);
        std::process::exit(exitcode::FAILURE);
    }

    let client = EcsClusterClient::from_env(config.region.clone()).await;
    let storage = LocalStorage::new(config.output_path().to_string());
    let exporter = Exporter::new(client, storage, config);

    match exporter.run().await {
        Ok(summary) => {
            tracing::info!(
                "📁 {} services exported to {}",
                summary.exported.len(),
                summary.output_root
            );
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            tracing::error!("❌ Export failed: {} (Category: {:?})", e, e.category());
            println!("Error: {}", e);
            std::process::exit(exitcode::FAILURE);
        }
    }
}
