use std::fs;
use std::path::PathBuf;

use sharpline::application::MatchupAnalyzer;
use sharpline::domain::{CalibrationMethod, GameOutcome, League, SeverityTable};
use sharpline::error::{ConfigError, Error};
use sharpline::infrastructure::config::settings::Config;
use sharpline::testkit::config::SAMPLE_TOML;
use sharpline::testkit::domain::{moneyline, request};

fn write_temp_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("sharpline.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn sample_config_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(write_temp_config(&dir, SAMPLE_TOML)).unwrap();

    assert!(config.logging.is_json());
    assert_eq!(config.simulation.default_iterations, 12_000);
    assert_eq!(config.simulation.chunk_size, 500);
    assert_eq!(config.calibration.method, CalibrationMethod::Combined);
    assert_eq!(config.parlay.default_correlation, 0.1);
}

#[test]
fn league_overrides_only_touch_their_league() {
    let config = Config::parse_toml(SAMPLE_TOML).unwrap();

    let nfl = config.league(League::Nfl);
    assert_eq!(nfl.staking.kelly_multiplier, 0.2);
    assert_eq!(nfl.staking.max_stake_fraction, 0.02);
    assert_eq!(nfl.staking.min_edge, 0.01);

    let nba = config.league(League::Nba);
    assert_eq!(nba.staking.kelly_multiplier, 0.25);
    assert_eq!(nba.staking.max_stake_fraction, 0.03);
    assert_eq!(nba.calibration.floor, 0.2);
    assert_eq!(nba.calibration.ceiling, 0.8);
    assert_eq!(nba.severity, SeverityTable::default());

    let soccer = config.league(League::Soccer);
    assert_eq!(soccer.severity.severe, 0.12);
    assert_eq!(soccer.engine.chunk_size, 500);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let result = Config::parse_toml("[simulation\nchunk_size = 1");
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn config_rejects_iterations_below_the_floor() {
    let toml = r#"
[simulation]
min_iterations = 5000
"#;
    match Config::parse_toml(toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "min_iterations",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid min_iterations error, got {err}"),
        Ok(_) => panic!("Expected min_iterations below 10000 to be rejected"),
    }
}

#[test]
fn config_rejects_a_bad_league_override() {
    let toml = r#"
[leagues.mlb]
max_stake_fraction = 1.5
"#;
    assert!(matches!(
        Config::parse_toml(toml),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "max_stake_fraction",
            ..
        }))
    ));
}

#[test]
fn config_rejects_a_zero_shrink_factor() {
    for toml in [
        "[calibration]\nshrink_factor = 0.0\n",
        "[leagues.nba]\nshrink_factor = 0.0\n",
    ] {
        assert!(
            matches!(
                Config::parse_toml(toml),
                Err(Error::Config(ConfigError::InvalidValue {
                    field: "shrink_factor",
                    ..
                }))
            ),
            "{toml}"
        );
    }
    let full = Config::parse_toml("[calibration]\nshrink_factor = 1.0\n").unwrap();
    assert_eq!(full.league(League::Nba).calibration.shrink_factor, 1.0);
}

#[test]
fn config_rejects_unknown_override_keys() {
    let toml = r#"
[leagues.nhl]
kelly = 0.5
"#;
    assert!(matches!(
        Config::parse_toml(toml),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn analyzer_runs_with_configured_settings() {
    let config = Config::parse_toml(SAMPLE_TOML).unwrap();
    let analyzer = MatchupAnalyzer::new(config.league(League::Nfl));

    let mut req = request(League::Nfl, 3);
    req.markets = vec![moneyline("home-ml", GameOutcome::HomeWin, 100.0)];
    let analysis = analyzer.analyze(&req, None).unwrap();

    assert_eq!(analysis.summary.iterations, 12_000);
    let calibrated = analysis.markets[0].calibrated.calibrated;
    assert!((0.2..=0.8).contains(&calibrated));
}
