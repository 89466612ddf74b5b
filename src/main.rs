use clap::Parser;
use pr_div_tools::core::ConfigProvider;
use pr_div_tools::utils::{logger, validation::Validate};
use pr_div_tools::{BatchConfig, CliConfig, EtlEngine, LocalStorage, QrBatchPipeline, ToolError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(&cli.log_format, cli.verbose);

    tracing::info!("Starting qr-batch");
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    let config = match cli.validate().and_then(|_| cli.resolve()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    display_config_summary(&config, cli.dry_run);

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.root_dir());
    let pipeline = QrBatchPipeline::new(storage, config)?;

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no images will be written");
        if let Err(e) = perform_dry_run(&pipeline).await {
            exit_on_error(&e);
        }
        return Ok(());
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, cli.monitor);

    match engine.run().await {
        Ok(report) => {
            for failure in &report.failures {
                match failure.line_number {
                    Some(line) => eprintln!(
                        "⚠️ {}:{}: {}",
                        failure.path.display(),
                        line,
                        failure.reason
                    ),
                    None => eprintln!("⚠️ {}: {}", failure.path.display(), failure.reason),
                }
            }
            tracing::info!("✅ {}", report.summary());
            println!("✅ QR generation complete: {}", report.summary());
        }
        Err(e) => exit_on_error(&e),
    }

    Ok(())
}

fn display_config_summary(config: &BatchConfig, dry_run: bool) {
    println!("📋 Configuration Summary:");
    println!("  Root: {}", config.root_dir());
    println!("  Marker directory: {}", config.marker_dir());
    println!("  Link list: {}", config.link_list());
    println!(
        "  Render: {}px modules, {} module quiet zone, EC level {}",
        config.module_size(),
        config.quiet_zone(),
        config.ec_level().to_ascii_uppercase()
    );
    if dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}

async fn perform_dry_run(
    pipeline: &QrBatchPipeline<LocalStorage, BatchConfig>,
) -> Result<(), ToolError> {
    use pr_div_tools::core::Pipeline;

    let plan = pipeline.extract().await?;
    let planned = pipeline.transform(plan).await?;

    println!("🔍 Dry Run Analysis:");
    println!("  Divisions: {}", planned.divisions);
    println!("  Link lists: {}", planned.link_lists);
    for artifact in &planned.artifacts {
        let note = if artifact.duplicate { " (repeat)" } else { "" };
        println!(
            "  {} -> {}{}",
            artifact.entry.url,
            pipeline.display_path(&artifact.path).display(),
            note
        );
    }
    for failure in &planned.failures {
        println!("  ⚠️ {}: {}", failure.path.display(), failure.reason);
    }
    println!();
    println!(
        "✅ Dry run complete: {} QR code(s) would be generated",
        planned.distinct().count()
    );

    Ok(())
}

fn exit_on_error(e: &ToolError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ qr-batch failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code())
}
