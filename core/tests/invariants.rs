//! Per-record domain and range invariants over a full generated dataset.

use cardgen_core::{
    config::GeneratorConfig,
    deriver::year_month,
    error::GenResult,
    normalize::normalize_status,
    pipeline::{Dataset, GenerationPipeline},
};

fn generate() -> GenResult<(GeneratorConfig, Dataset)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = GeneratorConfig::default_test();
    let dataset = GenerationPipeline::new(config.clone())?.run()?;
    Ok((config, dataset))
}

#[test]
fn generates_configured_row_count() -> GenResult<()> {
    let (config, dataset) = generate()?;
    assert_eq!(dataset.transactions.len(), config.transaction_count);
    assert_eq!(dataset.report.row_count, config.transaction_count);
    Ok(())
}

#[test]
fn binary_flags_and_chargeback_implication_hold() -> GenResult<()> {
    let (_, dataset) = generate()?;
    for (i, t) in dataset.transactions.iter().enumerate() {
        assert!(t.approved <= 1, "row {i}: approved = {}", t.approved);
        assert!(t.chargeback <= 1, "row {i}: chargeback = {}", t.chargeback);
        assert!(t.fraud <= 1, "row {i}: fraud = {}", t.fraud);
        if t.chargeback == 1 {
            assert_eq!(t.approved, 1, "row {i}: chargeback without approval");
        }
    }
    Ok(())
}

#[test]
fn normalized_statuses_stay_in_domain() -> GenResult<()> {
    let (_, dataset) = generate()?;
    for t in &dataset.transactions {
        let s = normalize_status(&t.status);
        assert!(s == "aprovado" || s == "negado", "unexpected status {s}");
        assert_eq!(t.approved == 1, s == "aprovado");
    }
    Ok(())
}

#[test]
fn sampled_values_stay_in_range() -> GenResult<()> {
    let (config, dataset) = generate()?;
    for t in &dataset.transactions {
        assert!(
            t.amount >= config.amount.min && t.amount <= config.amount.max,
            "amount {} out of range",
            t.amount
        );
        assert!(
            t.processing_time >= config.processing_time.min
                && t.processing_time <= config.processing_time.max,
            "processing_time {} out of range",
            t.processing_time
        );
        assert!(
            t.date >= config.dates.start && t.date <= config.dates.end,
            "date {} out of range",
            t.date
        );
        assert!(config.brands.contains(&t.brand), "unknown brand {}", t.brand);
    }
    Ok(())
}

#[test]
fn amounts_and_processing_times_have_two_decimals() -> GenResult<()> {
    let (_, dataset) = generate()?;
    for t in &dataset.transactions {
        let cents = t.amount * 100.0;
        assert!((cents - cents.round()).abs() < 1e-6, "amount {} not rounded", t.amount);
        let hundredths = t.processing_time * 100.0;
        assert!(
            (hundredths - hundredths.round()).abs() < 1e-6,
            "processing_time {} not rounded",
            t.processing_time
        );
    }
    Ok(())
}

#[test]
fn year_month_matches_date() -> GenResult<()> {
    let (_, dataset) = generate()?;
    for t in &dataset.transactions {
        assert_eq!(t.year_month, year_month(t.date));
        assert_eq!(t.year_month.len(), 7);
        assert_eq!(&t.year_month[4..5], "-");
    }
    Ok(())
}

#[test]
fn every_brand_is_sampled() -> GenResult<()> {
    let (config, dataset) = generate()?;
    for brand in &config.brands {
        assert!(
            dataset.transactions.iter().any(|t| &t.brand == brand),
            "brand {brand} never sampled in {} rows",
            dataset.transactions.len()
        );
    }
    Ok(())
}
