use arbres_etl::utils::{logger, validation::Validate};
use arbres_etl::{CliConfig, EtlEngine, LocalStorage, UnifyPipeline};
use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting arbres-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let sources = match config.into_sources() {
        Ok(sources) => sources,
        Err(e) => {
            tracing::error!("Could not resolve sources: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let storage = LocalStorage::new(".".to_string());
    let pipeline = UnifyPipeline::new(storage, sources);
    let engine = EtlEngine::new(pipeline);

    match engine.run() {
        Ok(report) => {
            tracing::info!("✅ Unification completed successfully!");
            println!(
                "✅ OK -> {} ({} records)",
                report.output_path, report.record_count
            );
        }
        Err(e) => {
            tracing::error!("❌ Unification failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
