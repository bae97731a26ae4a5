use clap::{Parser, ValueEnum};
use inventory_forecast::data::SAMPLE_CSV;
use inventory_forecast::report::{render, Locale};
use inventory_forecast::{Dashboard, Settings};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Forecast the next days of stock for one product of an inventory CSV
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// CSV with ID_PRODUTO,DATA_EVENTO,QUANTIDADE_ESTOQUE,PRECO,FLAG_PROMOCAO (bundled sample if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Product to forecast (first product in the data if omitted)
    #[arg(short, long)]
    product: Option<u32>,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Report language: en or pt-br
    #[arg(long, default_value = "en")]
    locale: Locale,

    /// Seed for the synthetic R² draw
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let text = match &cli.input {
        Some(path) => {
            info!(path = %path.display(), "reading inventory CSV");
            fs::read_to_string(path)?
        }
        None => {
            info!("no input given, using the bundled sample");
            SAMPLE_CSV.to_string()
        }
    };

    let dashboard = Dashboard::from_csv_text(&text, &settings)?;
    let selected = cli.product.or_else(|| dashboard.product_ids().first().copied());
    if selected.is_none() {
        warn!("no records parsed, nothing to forecast");
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let snapshot = dashboard.snapshot(selected, &mut rng)?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => print!("{}", render(&snapshot, cli.locale)),
    }

    Ok(())
}
