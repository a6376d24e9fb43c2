//! gen-runner: headless dataset generator.
//!
//! Usage:
//!   gen-runner --config data/generator.json --csv-dir out
//!   gen-runner --seed 7 --count 5000 --db dataset.db --summary-json

use anyhow::Result;
use cardgen_core::{
    config::GeneratorConfig,
    export::{CsvExporter, DatasetExporter, SqliteExporter},
    pipeline::{Dataset, GenerationPipeline},
    store::DatasetStore,
};
use std::env;

#[derive(serde::Serialize)]
struct RunSummary<'a> {
    run_id: &'a str,
    seed: u64,
    rows: usize,
    approval_rate: f64,
    chargebacks: u64,
    fraud_flags: u64,
    brands: &'a [cardgen_core::aggregator::BrandDimension],
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config_path = flag_value(&args, "--config");
    let db = flag_value(&args, "--db");
    let csv_dir = flag_value(&args, "--csv-dir");
    let summary_json = args.iter().any(|a| a == "--summary-json");

    let mut config = match config_path {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed);
    config.transaction_count = parse_arg(&args, "--count", config.transaction_count);

    let run_id = format!("run-{}-{}", config.seed, config.transaction_count);

    if !summary_json {
        println!("Card transaction generator — gen-runner");
        println!("  seed:      {}", config.seed);
        println!("  count:     {}", config.transaction_count);
        println!("  config:    {}", config_path.unwrap_or("(defaults)"));
        println!("  db:        {}", db.unwrap_or("(none)"));
        println!("  csv_dir:   {}", csv_dir.unwrap_or("(none)"));
        println!();
    }

    let seed = config.seed;
    let pipeline = GenerationPipeline::new(config)?;

    let mut exporters: Vec<Box<dyn DatasetExporter>> = Vec::new();
    if let Some(dir) = csv_dir {
        exporters.push(Box::new(CsvExporter::new(dir)));
    }
    if let Some(path) = db {
        let store = DatasetStore::open(path)?;
        store.migrate()?;
        exporters.push(Box::new(SqliteExporter::new(store, run_id.clone(), seed)));
    }
    if exporters.is_empty() {
        log::warn!("No --csv-dir or --db given; dataset will not be persisted");
    }

    let dataset = pipeline.run_and_export(&mut exporters)?;

    if summary_json {
        let summary = RunSummary {
            run_id: &run_id,
            seed,
            rows: dataset.report.row_count,
            approval_rate: dataset.report.approval_rate,
            chargebacks: dataset.report.chargeback_count,
            fraud_flags: dataset.report.fraud_count,
            brands: &dataset.brand_dimension,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&run_id, &dataset);
    }

    Ok(())
}

fn print_summary(run_id: &str, dataset: &Dataset) {
    let report = &dataset.report;
    println!("=== RUN SUMMARY ===");
    println!("  run_id:         {run_id}");
    println!("  transactions:   {}", report.row_count);
    println!("  approval rate:  {:.2}%", report.approval_rate * 100.0);
    println!("  chargebacks:    {}", report.chargeback_count);
    println!("  fraud flags:    {}", report.fraud_count);

    println!();
    println!("=== BRAND DIMENSION ===");
    for b in &dataset.brand_dimension {
        println!(
            "  {:<12} | TPV: {:.2} | Txns: {} | Ticket: {:.2} | Appr: {:.2}% | CB: {:.2}% | Fraud: {:.2}% | Proc: {:.2}s",
            b.brand,
            b.total_volume,
            b.transaction_count,
            b.average_ticket,
            b.approval_rate * 100.0,
            b.chargeback_rate * 100.0,
            b.fraud_rate * 100.0,
            b.average_processing_time
        );
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
