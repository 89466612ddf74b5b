use clap::Parser;
use pr_div_tools::utils::{logger, validation::validate_path};
use pr_div_tools::{EtlEngine, LocalStorage, MunicipalityPipeline};

#[derive(Parser)]
#[command(name = "municipalities-json")]
#[command(about = "Convert the municipality coordinate CSV into JSON")]
struct Args {
    /// Input CSV with Municipality, Latitude and Longitude columns
    #[arg(short, long, default_value = "PR-CYBR-MAP.csv")]
    input: String,

    /// Output JSON file
    #[arg(short, long, default_value = "PR-CYBR-MAP.json")]
    output: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    if let Err(e) = validate_path("input", &args.input).and_then(|_| validate_path("output", &args.output)) {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let pipeline = MunicipalityPipeline::new(LocalStorage::new("."), &args.input, &args.output);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Converted {} municipalities", summary.records);
            println!(
                "Conversion complete. JSON data saved to {}",
                summary.output_path.display()
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
