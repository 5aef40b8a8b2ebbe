use anyhow::Context;
use clap::Parser;
use tsdr_lookup::utils::{logger, validation::Validate};
use tsdr_lookup::{AppConfig, CliConfig, LocalStorage, LookupEngine, LookupPipeline, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting tsdr-lookup CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Invalid command line: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let mut config = AppConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config))?;
    if let Some(path) = &cli.output_path {
        config.output.path = path.clone();
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // Login gate: nothing runs without a session.
    let session = match Session::login(&config.credentials, &cli.username, &cli.password) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("❌ Login rejected: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let storage = LocalStorage::new(config.output.path.clone());
    let serials = cli.serial_numbers();
    tracing::info!("📥 Looking up {} serial number(s)", serials.len());

    let pipeline = LookupPipeline::new(storage, config, serials);
    let engine = LookupEngine::new(pipeline);

    match engine.run(&session).await {
        Ok(output_path) => {
            tracing::info!("✅ Batch lookup completed successfully!");
            println!("✅ Batch lookup completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!("❌ Batch lookup failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
