//! Brand dimension consistency against the fact table.

use cardgen_core::{
    aggregator::aggregate_by_brand,
    config::GeneratorConfig,
    error::GenResult,
    pipeline::GenerationPipeline,
};

const EPS: f64 = 1e-9;

#[test]
fn brand_rows_reconcile_with_transactions() -> GenResult<()> {
    let dataset = GenerationPipeline::new(GeneratorConfig::default_test())?.run()?;

    for row in &dataset.brand_dimension {
        let rows: Vec<_> = dataset
            .transactions
            .iter()
            .filter(|t| t.brand == row.brand)
            .collect();
        let volume: f64 = rows.iter().map(|t| t.amount).sum();
        let approvals = rows.iter().filter(|t| t.approved == 1).count() as u64;
        let chargebacks = rows.iter().filter(|t| t.chargeback == 1).count() as u64;
        let frauds = rows.iter().filter(|t| t.fraud == 1).count() as u64;

        assert_eq!(row.transaction_count, rows.len() as u64, "{}: count", row.brand);
        assert!((row.total_volume - volume).abs() < EPS * volume, "{}: volume", row.brand);
        assert_eq!(row.approval_count, approvals, "{}: approvals", row.brand);
        assert_eq!(row.chargeback_count, chargebacks, "{}: chargebacks", row.brand);
        assert_eq!(row.fraud_count, frauds, "{}: frauds", row.brand);

        let n = row.transaction_count as f64;
        assert!((row.average_ticket - row.total_volume / n).abs() < EPS);
        assert!((row.approval_rate - row.approval_count as f64 / n).abs() < EPS);
        assert!((row.chargeback_rate - row.chargeback_count as f64 / n).abs() < EPS);
        assert!((row.fraud_rate - row.fraud_count as f64 / n).abs() < EPS);
    }
    Ok(())
}

#[test]
fn counts_sum_to_row_total() -> GenResult<()> {
    let config = GeneratorConfig::default_test();
    let expected = config.transaction_count as u64;
    let dataset = GenerationPipeline::new(config)?.run()?;

    let total: u64 = dataset.brand_dimension.iter().map(|b| b.transaction_count).sum();
    assert_eq!(total, expected);
    Ok(())
}

#[test]
fn one_row_per_brand_sorted_by_label() -> GenResult<()> {
    let dataset = GenerationPipeline::new(GeneratorConfig::default_test())?.run()?;
    let brands: Vec<&str> = dataset.brand_dimension.iter().map(|b| b.brand.as_str()).collect();
    assert_eq!(brands, vec!["Elo", "Mastercard", "Visa"]);
    Ok(())
}

#[test]
fn empty_input_yields_no_rows() {
    assert!(aggregate_by_brand(&[]).is_empty());
}

#[test]
fn average_processing_time_within_configured_range() -> GenResult<()> {
    let config = GeneratorConfig::default_test();
    let range = config.processing_time;
    let dataset = GenerationPipeline::new(config)?.run()?;
    for row in &dataset.brand_dimension {
        assert!(
            row.average_processing_time >= range.min && row.average_processing_time <= range.max,
            "{}: average processing time {}",
            row.brand,
            row.average_processing_time
        );
    }
    Ok(())
}
