//! Small end-to-end scenarios with hand-checkable outcomes.

use cardgen_core::{
    config::{GeneratorConfig, Range},
    error::GenResult,
    pipeline::GenerationPipeline,
};

#[test]
fn single_brand_always_approved() -> GenResult<()> {
    // A 100% approval rate is above the default 0.95 ceiling, so the
    // ceiling is opened up for this scenario.
    let config = GeneratorConfig {
        transaction_count: 10,
        seed: 7,
        brands: vec!["A".into()],
        statuses: vec!["Approved".into()],
        status_probabilities: vec![1.0],
        approval_rate_bounds: Range { min: 0.70, max: 1.0 },
        ..GeneratorConfig::default()
    };
    let dataset = GenerationPipeline::new(config)?.run()?;

    assert_eq!(dataset.transactions.len(), 10);
    assert!(dataset.transactions.iter().all(|t| t.approved == 1));
    assert_eq!(dataset.brand_dimension.len(), 1);

    let row = &dataset.brand_dimension[0];
    assert_eq!(row.brand, "A");
    assert_eq!(row.transaction_count, 10);
    assert_eq!(row.approval_count, 10);
    assert_eq!(row.approval_rate, 1.0);
    Ok(())
}

#[test]
fn zero_risk_probabilities_clear_every_flag() -> GenResult<()> {
    let config = GeneratorConfig {
        chargeback_probability: 0.0,
        fraud_probability: 0.0,
        ..GeneratorConfig::default_test()
    };
    let dataset = GenerationPipeline::new(config)?.run()?;

    assert!(dataset.transactions.iter().all(|t| t.chargeback == 0 && t.fraud == 0));
    assert_eq!(dataset.report.chargeback_count, 0);
    assert_eq!(dataset.report.fraud_count, 0);
    for row in &dataset.brand_dimension {
        assert_eq!(row.chargeback_rate, 0.0);
        assert_eq!(row.fraud_rate, 0.0);
    }
    Ok(())
}

#[test]
fn certain_chargeback_hits_only_approved_rows() -> GenResult<()> {
    let config = GeneratorConfig {
        chargeback_probability: 1.0,
        ..GeneratorConfig::default_test()
    };
    let dataset = GenerationPipeline::new(config)?.run()?;

    for t in &dataset.transactions {
        assert_eq!(t.chargeback, t.approved);
    }
    Ok(())
}

#[test]
fn accented_mixed_case_label_counts_as_approved() -> GenResult<()> {
    let config = GeneratorConfig {
        statuses: vec![" Aprovádo".into(), "NEGADO".into()],
        status_probabilities: vec![0.88, 0.12],
        ..GeneratorConfig::default_test()
    };
    let dataset = GenerationPipeline::new(config)?.run()?;

    let accented = dataset
        .transactions
        .iter()
        .filter(|t| t.status == " Aprovádo")
        .count();
    assert!(accented > 0);
    for t in &dataset.transactions {
        let expected = u8::from(t.status == " Aprovádo");
        assert_eq!(t.approved, expected, "status {:?}", t.status);
    }
    assert_eq!(dataset.report.approval_count, accented as u64);
    Ok(())
}

#[test]
fn single_day_range_pins_every_date() -> GenResult<()> {
    let mut config = GeneratorConfig::default_test();
    config.dates.end = config.dates.start;
    let start = config.dates.start;
    let dataset = GenerationPipeline::new(config)?.run()?;

    assert!(dataset.transactions.iter().all(|t| t.date == start));
    assert!(dataset.transactions.iter().all(|t| t.year_month == "2016-01"));
    Ok(())
}
