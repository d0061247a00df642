use clap::Parser;
use course_etl::core::ConfigProvider;
use course_etl::utils::{logger, validation::Validate};
use course_etl::{CoursePipeline, EtlEngine, EtlError, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Course listing ETL driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "course-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show which pages would be scraped without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based course ETL");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        fail(&e);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return;
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = match CoursePipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => fail(&e),
    };

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!(
                "📊 {} pages, {} sections, {} blocks skipped, {} warnings",
                summary.pages, summary.sections_loaded, summary.rows_skipped, summary.warnings
            );
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => fail(&e),
    }
}

fn fail(e: &EtlError) -> ! {
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    println!("  Source: {}", config.base_url());
    println!("  Campuses: {}", config.targets.campuses.join(", "));
    println!("  Terms: {}", config.targets.terms.join(", "));
    println!("  Subjects: {}", config.targets.subjects.join(", "));
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    println!("  Concurrent Requests: {}", config.concurrent_requests());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    // 來源分析：列出每個要抓的頁面
    if let Some(file) = config.html_file() {
        println!("📄 Local page: {}", file);
    } else {
        println!("📡 Listing pages:");
        match course_etl::adapters::PageFetcher::new(
            config.base_url(),
            config.request_timeout_secs(),
        ) {
            Ok(fetcher) => {
                for target in config.targets() {
                    match fetcher.listing_url(&target) {
                        Ok(url) => println!("  {} -> {}", target, url),
                        Err(e) => println!("  {} -> ❌ {}", target, e),
                    }
                }
            }
            Err(e) => println!("  ❌ {}", e),
        }
    }

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    println!("  Section documents: {}", config.write_documents());
    if config.compress() {
        println!(
            "  Compression: {} (ZIP)",
            course_etl::app::pipelines::course_pipeline::BUNDLE_ARCHIVE
        );
    }

    println!();
    println!("✅ Dry run completed - configuration is valid");
}
