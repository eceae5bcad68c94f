use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use opx::config::Config;
use opx::error::{ConfigError, Error};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn write_temp_config(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("opx-config-test-{nanos}-{suffix}.toml"));
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn load_applies_overrides_over_defaults() {
    let toml = r#"
[scoring]
strong_consensus = 0.75
max_notional_pct_nav = 25
var_fail_pct = 0.04

[dqp.freshness]
ok = 10
warn = 30
fail = 90

[dqp.duplicates]
warn = 2
fail = 25
"#;
    let path = write_temp_config(toml);
    let config = Config::load(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.scoring.strong_consensus, 0.75);
    assert_eq!(config.scoring.weak_consensus, 0.33);
    assert_eq!(
        config.scoring.max_notional_pct_nav,
        rust_decimal_macros::dec!(25)
    );
    assert_eq!(config.dqp.freshness.warn, 30);
    assert_eq!(config.dqp.freshness.fail, 90);
    assert_eq!(config.dqp.duplicates.warn, 2);
    assert_eq!(config.dqp.schema.fail, 3);
}

#[test]
fn load_rejects_inverted_freshness_bands() {
    let toml = r#"
[dqp.freshness]
warn = 90
fail = 60
"#;
    let path = write_temp_config(toml);
    let err = Config::load(&path).unwrap_err();
    fs::remove_file(&path).ok();

    match err {
        Error::Config(ConfigError::InvalidValue { field, .. }) => {
            assert_eq!(field, "dqp.freshness");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn load_rejects_inverted_consensus_bands() {
    let toml = r#"
[scoring]
weak_consensus = 0.9
"#;
    let path = write_temp_config(toml);
    let err = Config::load(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "scoring.weak_consensus",
            ..
        })
    ));
}

#[test]
fn load_reports_missing_file() {
    let err = Config::load("/nonexistent/opx.toml").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn load_reports_malformed_toml() {
    let path = write_temp_config("[scoring\nstrong_consensus = ");
    let err = Config::load(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}
