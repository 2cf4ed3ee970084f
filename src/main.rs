use clap::Parser;
use rpc_directory::app::demo::{run_calculator_demo, run_employees_demo, DemoReport};
use rpc_directory::utils::error::ErrorSeverity;
use rpc_directory::utils::{logger, validation::Validate};
use rpc_directory::{
    ArithmeticInvoker, CliConfig, DirectoryResolver, HttpTransport, LoopbackTransport,
    RemoteGateway, Service, TomlConfig, Transport,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting rpc-directory");

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        // 離線模式不使用檔案中的端點，合併後由 CliConfig 統一驗證
        let loaded = TomlConfig::from_file(&path).and_then(|file| {
            if config.offline {
                Ok(file)
            } else {
                file.validate().map(|_| file)
            }
        });
        let file = match loaded {
            Ok(file) => file,
            Err(e) => {
                tracing::error!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        };
        config.merge_toml(&file);
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let transport: Arc<dyn Transport> = if config.offline {
        tracing::info!("🔁 Offline mode: serving both services in process");
        Arc::new(LoopbackTransport::seeded()?)
    } else {
        tracing::info!("🧮 Calculator: {}", config.calculator_endpoint);
        tracing::info!("👥 Employees: {}", config.employees_endpoint);
        Arc::new(HttpTransport::from_config(&config))
    };

    let timeout = std::time::Duration::from_secs(config.timeout_seconds);
    let mut report = DemoReport::default();

    if config.demo.includes_calculator() {
        tracing::info!("=== Calculator ===");
        let gateway = RemoteGateway::new(Service::Calculator, transport.clone()).with_timeout(timeout);
        let invoker = ArithmeticInvoker::new(gateway);
        report.merge(run_calculator_demo(&invoker, config.operand_a, config.operand_b).await);
    }

    if config.demo.includes_employees() {
        tracing::info!("=== Employees ===");
        let gateway = RemoteGateway::new(Service::Employees, transport.clone()).with_timeout(timeout);
        let resolver = DirectoryResolver::new(gateway);
        report.merge(run_employees_demo(&resolver).await);
    }

    println!(
        "📋 Summary: {} step(s) succeeded, {} failed",
        report.succeeded,
        report.failed()
    );
    for (step, e) in &report.failures {
        eprintln!("❌ {}: {}", step, e.user_friendly_message());
    }

    // 根據錯誤嚴重程度決定退出碼
    if let Some(severity) = report.worst_severity() {
        let exit_code = match severity {
            ErrorSeverity::Low => 0,      // 警告，但成功
            ErrorSeverity::Medium => 2,   // 參數錯誤
            ErrorSeverity::High => 1,     // 資料錯誤
            ErrorSeverity::Critical => 3, // 遠端錯誤
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    } else {
        println!("✅ All demonstrations completed successfully!");
    }

    Ok(())
}
