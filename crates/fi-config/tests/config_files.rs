//! Configuration files on disk driving the analytics components.

use approx::assert_relative_eq;
use tempfile::TempDir;

use fi_bonds::Instrument;
use fi_config::{AnalyticsConfig, ConfigError};
use fi_core::prelude::*;
use fi_curves::{GapPolicy, InterpolationMethod, MarketQuote};

#[test]
fn toml_file_drives_bootstrap() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analytics.toml");
    std::fs::write(
        &path,
        r#"
[pricing]
max_iterations = 200

[curve]
interpolation = "MonotoneCubicZero"
gap_policy = "Interpolate"
time_basis = "Act365Fixed"
"#,
    )
    .unwrap();

    let config = AnalyticsConfig::from_file(&path).unwrap();
    assert_eq!(config.curve.interpolation, InterpolationMethod::MonotoneCubicZero);

    let today = Date::from_ymd(2025, 1, 2).unwrap();
    let quotes: Vec<MarketQuote> = [(1, 0.03), (2, 0.032), (5, 0.035), (10, 0.038)]
        .into_iter()
        .map(|(years, rate)| {
            MarketQuote::at_par(
                Instrument::par_swap(
                    100.0,
                    rate,
                    Frequency::Annual,
                    today,
                    today.add_years(years).unwrap(),
                    DayCountConvention::Act365Fixed,
                )
                .unwrap(),
            )
        })
        .collect();

    let result = config.bootstrapper(today).bootstrap_validated(&quotes).unwrap();
    assert!(result.is_valid(), "{}", result.report);
    assert_relative_eq!(result.report.tolerance(), 1e-8);
}

#[test]
fn json_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analytics.json");

    let mut config = AnalyticsConfig::default();
    config.curve.gap_policy = GapPolicy::Strict;
    config.risk.convexity_tolerance = 1e-3;
    config.save(&path).unwrap();

    let loaded = AnalyticsConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn file_errors() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("missing.toml");
    assert!(matches!(
        AnalyticsConfig::from_file(&missing),
        Err(ConfigError::Io(_))
    ));

    let yaml = dir.path().join("analytics.yaml");
    std::fs::write(&yaml, "pricing: {}").unwrap();
    assert!(matches!(
        AnalyticsConfig::from_file(&yaml),
        Err(ConfigError::UnsupportedFormat(_))
    ));

    let invalid = dir.path().join("invalid.toml");
    std::fs::write(&invalid, "[pricing]\nmax_iterations = 0\nperiod_tolerance = 0.9\n").unwrap();
    assert!(matches!(
        AnalyticsConfig::from_file(&invalid),
        Err(ConfigError::MultipleValidationErrors(errors)) if errors.len() == 2
    ));
}
