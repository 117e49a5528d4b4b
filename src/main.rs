// src/main.rs
use std::path::PathBuf;

use catalog_normalizer::extractors::{collect_inputs, CatalogExtractor};
use catalog_normalizer::storage::StorageManager;
use catalog_normalizer::utils::{self, AppError};
use clap::Parser;

/// Command Line Interface for the catalog normalizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Catalog JSON files, or directories whose *.json files are read in name order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output CSV path
    #[arg(short, long, env = "CATALOG_OUTPUT", default_value = "./output/products.csv")]
    output: PathBuf,

    /// Also write a JSON run summary next to the CSV
    #[arg(short, long)]
    summary: bool,

    /// Exit with an error when no products were extracted
    #[arg(long)]
    fail_on_empty: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Resolve input documents
    let inputs = collect_inputs(&args.inputs)?;
    if inputs.is_empty() {
        return Err(AppError::Config(format!(
            "No JSON documents found in {:?}",
            args.inputs
        )));
    }
    tracing::info!("Processing {} documents", inputs.len());

    // 4. Initialize storage before the run so a bad output path fails fast
    let storage = StorageManager::new(&args.output)?;

    // 5. Extract, sort and number
    let extractor = CatalogExtractor::new();
    let report = extractor.run(&inputs).await;

    tracing::info!(
        "Processing finished. Records: {}, Documents: {}, Failed: {}",
        report.records.len(),
        report.documents_processed(),
        report.documents_failed()
    );

    if report.records.is_empty() && args.fail_on_empty {
        return Err(AppError::Processing(format!(
            "No products extracted from {} documents",
            report.documents_processed()
        )));
    }

    // 6. Save output
    let csv_path = storage.save_records(&report.records)?;
    if args.summary {
        storage.save_summary(&report)?;
    }
    println!("{}", csv_path.display());

    Ok(())
}
