use anyhow::Context;
use clap::Parser;
use nutrilens_core::{
    application::create_service,
    domain::{
        common::NutrilensConfig, food_analysis::FoodAnalysisService,
        medication::MedicationAnalysisService,
    },
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::{Args, Command, LogArgs};

mod args;

fn init_logger(log: &LogArgs) {
    let filter = EnvFilter::try_new(&log.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    init_logger(&args.log);

    let command = args.command.clone();
    tracing::debug!(?command, "Starting nutrilens");
    let service = create_service(NutrilensConfig::from(args))?;

    let output = match command {
        Command::Medication { image } => {
            let image_data = tokio::fs::read(&image)
                .await
                .with_context(|| format!("failed to read image {}", image.display()))?;
            let result = service.analyze_medication(image_data).await?;
            serde_json::to_string_pretty(&result)?
        }
        Command::Food { image } => {
            let image_data = tokio::fs::read(&image)
                .await
                .with_context(|| format!("failed to read image {}", image.display()))?;
            let result = service.analyze_food(image_data).await?;
            serde_json::to_string_pretty(&result)?
        }
    };

    println!("{output}");
    Ok(())
}
