use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod demo;

use glucloop_config::{AppConfig, EnvConfigProvider, LoopConfig};
use glucloop_core::domain::CarbEntry;
use glucloop_core::ports::ConfigProvider;
use glucloop_core::{Collaborators, LinearSumPredictionMath, LoopEngine, ProportionalRecommendationMath};
use glucloop_storage::{init_settings_db, SettingsRepository};

/// glucloop - runs the Loop Decision Engine against in-memory demo
/// collaborators and prints its status.
#[derive(Parser)]
#[command(name = "glucloop")]
#[command(about = "Loop Decision Engine demo harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the loop for a number of ticks, printing status after each.
    Run {
        #[arg(long, default_value_t = 3)]
        ticks: u32,
    },
    /// Print the current status without enacting dosing.
    Status,
    /// Enable or disable automated dosing.
    SetDosing {
        #[arg(value_enum)]
        enabled: DosingSetting,
    },
    /// Record a carb entry and print the resulting bolus recommendation.
    AddCarb { grams: f64 },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DosingSetting {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let cli = Cli::parse();

    let app_config = AppConfig::from_env()?;
    let loop_config = LoopConfig::from_env()?;

    let pool = init_settings_db(&app_config.database_path).await?;
    let settings = Arc::new(SettingsRepository::new(pool));
    let config_provider = Arc::new(EnvConfigProvider::new(&loop_config, settings));
    let config_provider_handle: Arc<EnvConfigProvider> = Arc::clone(&config_provider);

    let collaborators = Collaborators {
        glucose_store: Some(Arc::new(demo::DemoGlucoseStore::new(120.0))),
        carb_store: Some(Arc::new(demo::DemoCarbStore::default())),
        dose_store: Some(Arc::new(demo::DemoDoseStore)),
        pump_status: Arc::new(demo::DemoPumpStatusProvider),
        pump: Arc::new(demo::DemoPumpDevice),
        config: config_provider,
        prediction_math: Arc::new(LinearSumPredictionMath),
        recommendation_math: Arc::new(ProportionalRecommendationMath),
    };

    let engine = LoopEngine::new(collaborators);
    engine.start();

    match cli.command {
        Commands::Run { ticks } => {
            for tick in 1..=ticks {
                engine.run_loop().await;
                let status = engine.get_status().await;
                println!("tick {tick}: {status:#?}");
            }
        }
        Commands::Status => {
            let status = engine.get_status().await;
            println!("{status:#?}");
        }
        Commands::SetDosing { enabled } => {
            let enabled = matches!(enabled, DosingSetting::On);
            config_provider_handle.set_dosing_enabled(enabled).await?;
            println!("dosingEnabled = {enabled}");
        }
        Commands::AddCarb { grams } => {
            let entry = CarbEntry {
                date: chrono::Utc::now(),
                grams,
                absorption_time: chrono::Duration::hours(3),
            };
            match engine.add_carb_entry(entry).await {
                Ok(units) => println!("recommended bolus: {units:.2} U"),
                Err(err) => eprintln!("error: {err}"),
            }
        }
    }

    engine.stop().await;
    Ok(())
}
