//! Command-line host for the copper sales predictor.
//!
//! ```text
//! copper-predict price --input sale.json
//! copper-predict --config copper.toml status --input sale.json
//! copper-predict inspect --model regression_model.json
//! ```
//!
//! Set `RUST_LOG` to adjust logging (default `info`). Logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use copper_predict::model::Booster;
use copper_predict::{
    ClassificationInput, ModelFormat, ModelSource, Predictor, PredictorConfig, RegressionInput,
};

#[derive(Parser)]
#[command(
    name = "copper-predict",
    about = "Predict selling price and deal status for industrial copper sales",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (model paths, format, load policy)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the selling price of a sale
    Price {
        /// JSON document with the regression fields
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Predict whether a sale is Won or Lost
    Status {
        /// JSON document with the classification fields
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Describe a model resource
    Inspect {
        /// Model file
        #[arg(short, long)]
        model: PathBuf,

        /// Resource format
        #[arg(short, long, value_enum, default_value_t = ModelFormat::Auto)]
        format: ModelFormat,
    },
}

fn read_input<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read input {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid input {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<PredictorConfig> {
    match path {
        Some(path) => PredictorConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display())),
        None => Ok(PredictorConfig::default()),
    }
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Price { input } => {
            let predictor = Predictor::new(load_config(cli.config.as_deref())?);
            let input: RegressionInput = read_input(&input)?;
            let price = predictor
                .predict_selling_price(&input)
                .context("selling price prediction failed")?;
            println!("Selling Price : {price}");
        }
        Commands::Status { input } => {
            let predictor = Predictor::new(load_config(cli.config.as_deref())?);
            let input: ClassificationInput = read_input(&input)?;
            let outcome = predictor
                .predict_status(&input)
                .context("status prediction failed")?;
            println!("Status : {outcome}");
        }
        Commands::Inspect { model, format } => {
            let scoring = ModelSource::new(&model, format)
                .load()
                .with_context(|| format!("cannot load model {}", model.display()))?;
            let meta = scoring.meta();
            println!("task        : {}", meta.task);
            println!("features    : {}", meta.n_features);
            println!("booster     : {}", scoring.booster().kind());
            if let Booster::Tree(forest) = scoring.booster() {
                println!("trees       : {}", forest.n_trees());
            }
            println!("transform   : {:?}", scoring.output_transform());
            if let Some(objective) = &meta.objective_name {
                println!("objective   : {objective}");
            }
        }
    }

    Ok(())
}
