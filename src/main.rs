use clap::Parser;
use std::path::Path;
use csv_city_split::core::SplitReport;
use csv_city_split::core::Storage;
use csv_city_split::utils::{logger, validation::Validate};
use csv_city_split::{CitySplitPipeline, CliConfig, EtlEngine, LocalStorage, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliConfig::parse();

    let log_dir = args.log_dir.as_deref().map(Path::new);
    let logging = if args.log_json {
        logger::init_json_logger(args.verbose, log_dir)
    } else {
        logger::init_cli_logger(args.verbose, log_dir)
    };
    if let Err(e) = logging {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("Starting csv-city-split");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    match run(&args).await {
        Ok(report) => {
            tracing::info!("✅ Split completed successfully!");
            print_summary(&report);
        }
        Err(e) => {
            tracing::error!(
                "❌ Split failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }
}

async fn run(args: &CliConfig) -> Result<SplitReport> {
    let settings = args.resolve()?;

    if let Err(e) = settings.split.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e);
    }
    tracing::debug!("Resolved configuration: {:?}", settings.split);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no files will be written");
    }
    if settings.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::default();
    let pipeline = CitySplitPipeline::new(storage.clone(), settings.split).with_dry_run(args.dry_run);
    let engine = EtlEngine::new_with_monitoring(pipeline, settings.monitor);

    let report = engine.run().await?;

    if let Some(report_path) = &args.report {
        storage
            .write_file(report_path, report.to_json_pretty()?.as_bytes())
            .await?;
        tracing::info!("📁 Report saved to: {}", report_path);
    }

    Ok(report)
}

fn print_summary(report: &SplitReport) {
    let verb = if report.dry_run { "would write" } else { "wrote" };
    println!(
        "✅ {} rows read from {}, {} {} file(s)",
        report.total_rows,
        report.input_path,
        verb,
        report.files_written()
    );
    for city in &report.cities {
        match &city.output_path {
            Some(path) => println!("   {:<12} {:>6} rows -> {}", city.label, city.matched_rows, path),
            None => println!("   {:<12} {:>6} rows (skipped)", city.label, city.matched_rows),
        }
    }
}
