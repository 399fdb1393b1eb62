//! # forecastflow
//!
//! Command-line interface for training and tracking forecasting models.

use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use data_facade::DatasetLoader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workflow_facade::{Pipeline, TrainRequest, Trainer, WorkflowConfig};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "forecastflow")]
#[command(about = "Forecasting experiment workflow", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model, record the run and print its metrics
    Train {
        /// Dataset identifier (air_passengers, sunspots, covid_us)
        #[arg(short, long, default_value = "air_passengers")]
        dataset: String,

        /// Model type (Prophet, ARIMA)
        #[arg(short, long, default_value = "Prophet")]
        model: String,

        /// Skip the hyperparameter search
        #[arg(long)]
        no_optimize: bool,

        /// Search budget
        #[arg(short, long, default_value = "20")]
        trials: usize,

        /// Also write the metrics to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download a dataset and save its processed copy
    Fetch {
        /// Dataset identifier
        #[arg(short, long, default_value = "air_passengers")]
        dataset: String,
    },

    /// Run only the hyperparameter search
    Tune {
        /// Dataset identifier
        #[arg(short, long, default_value = "air_passengers")]
        dataset: String,

        /// Model type (Prophet, ARIMA)
        #[arg(short, long, default_value = "Prophet")]
        model: String,

        /// Search budget
        #[arg(short, long, default_value = "20")]
        trials: usize,
    },
}

fn load_config() -> CliResult<WorkflowConfig> {
    WorkflowConfig::from_env().map_err(|e| e.to_string())
}

fn print_json(value: &serde_json::Value) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| format!("Failed to encode JSON: {}", e))?;
    println!("{}", text);
    Ok(())
}

/// Run train command
fn run_train(
    dataset: String,
    model: String,
    optimize: bool,
    trials: usize,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let config = load_config()?;
    let request = TrainRequest::new(&dataset, &model)
        .with_optimize(optimize)
        .with_trials(trials);

    let mut pipeline = Pipeline::from_config(config);
    let outcome = pipeline
        .run_with(&request, None)
        .map_err(|e| e.to_string())?;

    let json = serde_json::json!({
        "dataset": dataset,
        "model": model,
        "run_id": outcome.run.run_id,
        "model_path": outcome.model_path,
        "metrics": outcome.metrics,
    });

    if let Some(path) = output {
        let file = File::create(&path).map_err(|e| format!("Failed to create output: {}", e))?;
        serde_json::to_writer_pretty(file, &json)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        info!(path = %path.display(), "metrics written");
    }
    print_json(&json)
}

/// Run fetch command
fn run_fetch(dataset: String) -> CliResult<()> {
    let config = load_config()?;
    let loader = DatasetLoader::from_config(config.data);

    let data = loader.fetch_dataset(&dataset).map_err(|e| e.to_string())?;
    let path = loader
        .save_dataset(&data, data.name())
        .map_err(|e| e.to_string())?;

    print_json(&serde_json::json!({
        "dataset": data.name(),
        "rows": data.len(),
        "path": path,
    }))
}

/// Run tune command
fn run_tune(dataset: String, model: String, trials: usize) -> CliResult<()> {
    let config = load_config()?;
    let request = TrainRequest::new(&dataset, &model).with_trials(trials);

    let trainer = Trainer::from_config(config);
    let result = trainer.tune(&request).map_err(|e| e.to_string())?;

    let best_params: serde_json::Map<String, serde_json::Value> = result
        .best_params
        .iter()
        .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
        .collect();
    print_json(&serde_json::json!({
        "dataset": dataset,
        "model": result.best_params.kind().to_string(),
        "best_params": best_params,
        "best_score": result.best_score,
        "evaluations": result.evaluations(),
        "failed_trials": result.failed_trials(),
    }))
}

fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Train {
            dataset,
            model,
            no_optimize,
            trials,
            output,
        } => run_train(dataset, model, !no_optimize, trials, output),

        Commands::Fetch { dataset } => run_fetch(dataset),

        Commands::Tune {
            dataset,
            model,
            trials,
        } => run_tune(dataset, model, trials),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
