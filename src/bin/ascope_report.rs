use clap::Parser;
use pr_div_tools::utils::{logger, validation::validate_path};
use pr_div_tools::{AscopePipeline, EtlEngine, LocalStorage};

#[derive(Parser)]
#[command(name = "ascope-report")]
#[command(about = "Stamp the ASCOPE template with a report id and timestamp")]
struct Args {
    /// Template JSON file; its `template` object becomes the report content
    #[arg(short, long, default_value = "data/ascope_template.json")]
    template: String,

    /// Report output file
    #[arg(short, long, default_value = "output/ascope_report.json")]
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

    if let Err(e) =
        validate_path("template", &args.template).and_then(|_| validate_path("output", &args.output))
    {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    println!("Starting ASCOPE Report Generation...");

    let pipeline = AscopePipeline::new(LocalStorage::new("."), &args.template, &args.output);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(path) => {
            println!("Report saved successfully at {}", path.display());
            println!("ASCOPE Report Generation Complete.");
        }
        Err(e) => {
            // 低嚴重度（沒有模板資料）仍以 0 結束
            tracing::warn!(
                "ASCOPE report not generated: {} (Severity: {:?})",
                e,
                e.severity()
            );
            eprintln!("{}", e.user_friendly_message());
            let exit_code = e.exit_code();
            if exit_code > 0 {
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
