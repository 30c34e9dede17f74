use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use allerscan::application::use_cases::evaluation::BatchSummary;
use allerscan::application::{BatchPredictionUseCase, BatchReport, DatasetBuilder};
use allerscan::domain::error::{AppError, Result};
use allerscan::domain::food_item::Dataset;
use allerscan::domain::vocabulary::EMPTY_SENTINEL;
use allerscan::infrastructure::config::{AppConfig, DEFAULT_CONFIG_FILE};
use allerscan::infrastructure::csv::FoodCsvLoader;
use allerscan::infrastructure::db::ResultRepository;
use allerscan::infrastructure::report::write_report;
use allerscan::infrastructure::slm_clients::{RouterClient, SlmClient};

#[derive(Parser)]
#[command(
    name = "allerscan",
    about = "Batch allergen-prediction harness for on-device SLM evaluation",
    version,
)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Load the food CSV and show dataset partitions
    Inspect,
    /// Predict allergens for one ad-hoc ingredient list
    Predict {
        /// Free-text ingredient list
        ingredients: String,
    },
    /// Run batch prediction over a dataset and persist the results
    Batch {
        /// 1-based dataset index; all datasets when omitted
        #[arg(long)]
        dataset: Option<usize>,
        /// Write a CSV report of this run
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List recently stored prediction results
    Results {
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Commands::Inspect => cmd_inspect(&config),
        Commands::Predict { ingredients } => cmd_predict(&config, &ingredients).await,
        Commands::Batch { dataset, report } => cmd_batch(&config, dataset, report.as_deref()).await,
        Commands::Results { limit } => cmd_results(&config, limit).await,
    }
}

fn load_datasets(config: &AppConfig) -> Result<Vec<Dataset>> {
    let path = Path::new(&config.csv_path);
    let items = match config.csv_delimiter {
        Some(delimiter) => FoodCsvLoader::new().with_delimiter(delimiter).load_file(path)?,
        None => FoodCsvLoader::load_file_auto_detect(path)?,
    };
    if items.is_empty() {
        return Err(AppError::ValidationError(format!(
            "No usable rows in {}",
            config.csv_path
        )));
    }
    DatasetBuilder::new(config.dataset_size).build(items)
}

fn cmd_inspect(config: &AppConfig) -> Result<()> {
    let datasets = load_datasets(config)?;
    let total: usize = datasets.iter().map(Dataset::len).sum();

    println!("Loaded {} items from {}", total, config.csv_path);
    for (idx, dataset) in datasets.iter().enumerate() {
        println!("  {}. {}", idx + 1, dataset.name);
    }
    Ok(())
}

async fn cmd_predict(config: &AppConfig, ingredients: &str) -> Result<()> {
    let client: Arc<dyn SlmClient + Send + Sync> = Arc::new(RouterClient::new());
    let repository = Arc::new(ResultRepository::connect(Path::new(&config.db_path)).await?);
    let use_case = BatchPredictionUseCase::new(client, repository);

    let (predicted, metrics) = use_case
        .predict_ingredients(&config.model, ingredients)
        .await?;

    if predicted == EMPTY_SENTINEL {
        println!("No allergens");
    } else {
        println!("Detected: {}", predicted);
    }
    println!("Latency: {} ms", metrics.latency_ms);
    Ok(())
}

async fn cmd_batch(
    config: &AppConfig,
    dataset_index: Option<usize>,
    report_path: Option<&Path>,
) -> Result<()> {
    let datasets = load_datasets(config)?;

    let selected: Vec<Dataset> = match dataset_index {
        Some(index) => {
            let dataset = datasets.get(index.wrapping_sub(1)).cloned().ok_or_else(|| {
                AppError::NotFound(format!(
                    "Dataset {} does not exist ({} available)",
                    index,
                    datasets.len()
                ))
            })?;
            vec![dataset]
        }
        None => datasets,
    };

    let client: Arc<dyn SlmClient + Send + Sync> = Arc::new(RouterClient::new());
    let repository = Arc::new(ResultRepository::connect(Path::new(&config.db_path)).await?);
    let use_case = BatchPredictionUseCase::new(client, repository);

    let mut all_results = Vec::new();
    for dataset in &selected {
        let report = use_case
            .run_batch(&config.model, dataset, config.request_delay_ms)
            .await?;
        print_report(&report);
        all_results.extend(report.results);
    }

    if let Some(path) = report_path {
        write_report(path, &all_results)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

async fn cmd_results(config: &AppConfig, limit: i64) -> Result<()> {
    let repository = ResultRepository::connect(Path::new(&config.db_path)).await?;
    let results = repository.list_recent(limit).await?;

    if results.is_empty() {
        println!("No stored results");
        return Ok(());
    }

    for result in &results {
        println!(
            "{}  {}  expected: [{}]  predicted: [{}]  accuracy: {:.1}%  latency: {} ms",
            result.item.id,
            result.item.name,
            result.item.allergens_mapped,
            result.predicted,
            result.accuracy,
            result.metrics.latency_ms,
        );
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    let BatchSummary {
        total,
        succeeded,
        failed,
        exact_matches,
        mean_accuracy,
        mean_latency_ms,
    } = report.summary.clone();

    println!("\n== {} ==", report.dataset_name);
    println!("  items:         {}", total);
    println!("  succeeded:     {}", succeeded);
    println!("  failed:        {}", failed);
    println!("  exact matches: {}", exact_matches);
    println!("  mean accuracy: {:.1}%", mean_accuracy);
    println!("  mean latency:  {:.0} ms", mean_latency_ms);
    println!("  stored:        {} ok, {} failed", report.saved, report.save_failed);
}
