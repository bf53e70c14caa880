// Configuration loading and parsing (model.toml).

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::projection::ModelParams;
use crate::model::snapshot::LEAGUE_AVG_WOBA;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// model.toml structs
// ---------------------------------------------------------------------------

/// Everything `config/model.toml` carries: projection weights, stat and odds
/// file locations, and the schedule API base.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub projection: ProjectionConfig,
    pub data: DataConfig,
    pub api: ApiConfig,
}

/// Projection weights. The league wOBA anchor is not configurable; it is a
/// property of the run environment, not a tuning knob.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionConfig {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl ProjectionConfig {
    pub fn model_params(&self) -> ModelParams {
        ModelParams {
            alpha: self.alpha,
            beta: self.beta,
            gamma: self.gamma,
            league_avg_woba: LEAGUE_AVG_WOBA,
        }
    }
}

/// Locations of the season stat exports, the odds file, and the report
/// output directory, resolved relative to the working directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub pitcher_stats: String,
    pub batter_stats: String,
    pub betting_lines: String,
    pub export_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate configuration from `{base_dir}/config/model.toml`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("model.toml");
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("."))
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    // The projection is strictly increasing in lineup susceptibility only
    // when alpha is positive. The negated comparison also catches NaN.
    if !(config.projection.alpha > 0.0) {
        return Err(ConfigError::ValidationError {
            field: "projection.alpha".to_string(),
            message: format!("must be positive, got {}", config.projection.alpha),
        });
    }
    if !(config.projection.beta >= 0.0) {
        return Err(ConfigError::ValidationError {
            field: "projection.beta".to_string(),
            message: format!("must not be negative, got {}", config.projection.beta),
        });
    }
    if !(config.projection.gamma >= 0.0) {
        return Err(ConfigError::ValidationError {
            field: "projection.gamma".to_string(),
            message: format!("must not be negative, got {}", config.projection.gamma),
        });
    }

    let paths = [
        ("data.pitcher_stats", &config.data.pitcher_stats),
        ("data.batter_stats", &config.data.batter_stats),
        ("data.betting_lines", &config.data.betting_lines),
        ("data.export_dir", &config.data.export_dir),
    ];
    for (field, value) in paths {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: "path must not be empty".to_string(),
            });
        }
    }

    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".to_string(),
            message: "base URL must not be empty".to_string(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_TOML: &str = r#"
[projection]
alpha = 0.15
beta = 0.02
gamma = 0.15

[data]
pitcher_stats = "data/pitcher_stats.csv"
batter_stats = "data/batter_stats.csv"
betting_lines = "data/betting_lines.csv"
export_dir = "exports"

[api]
base_url = "https://statsapi.mlb.com/api/v1"
"#;

    fn temp_base(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("model_config_{}_{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("config")).unwrap();
        dir
    }

    fn write_model_toml(base: &Path, contents: &str) {
        fs::write(base.join("config").join("model.toml"), contents).unwrap();
    }

    #[test]
    fn test_load_valid_config() {
        let base = temp_base("valid");
        write_model_toml(&base, VALID_TOML);

        let config = load_config_from(&base).unwrap();
        assert_eq!(config.projection.alpha, 0.15);
        assert_eq!(config.projection.beta, 0.02);
        assert_eq!(config.projection.gamma, 0.15);
        assert_eq!(config.data.pitcher_stats, "data/pitcher_stats.csv");
        assert_eq!(config.data.export_dir, "exports");
        assert_eq!(config.api.base_url, "https://statsapi.mlb.com/api/v1");

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let base = temp_base("missing");

        match load_config_from(&base) {
            Err(ConfigError::FileNotFound { path }) => {
                assert!(path.ends_with("config/model.toml"));
            }
            other => panic!("expected FileNotFound, got: {other:?}"),
        }

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let base = temp_base("malformed");
        write_model_toml(&base, "[projection\nalpha = ");

        match load_config_from(&base) {
            Err(ConfigError::ParseError { .. }) => {}
            other => panic!("expected ParseError, got: {other:?}"),
        }

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_zero_alpha_is_rejected() {
        let base = temp_base("zero_alpha");
        write_model_toml(&base, &VALID_TOML.replace("alpha = 0.15", "alpha = 0.0"));

        match load_config_from(&base) {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "projection.alpha");
            }
            other => panic!("expected ValidationError, got: {other:?}"),
        }

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_negative_beta_is_rejected() {
        let base = temp_base("neg_beta");
        write_model_toml(&base, &VALID_TOML.replace("beta = 0.02", "beta = -0.5"));

        match load_config_from(&base) {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "projection.beta");
            }
            other => panic!("expected ValidationError, got: {other:?}"),
        }

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_empty_data_path_is_rejected() {
        let base = temp_base("empty_path");
        write_model_toml(
            &base,
            &VALID_TOML.replace("\"data/batter_stats.csv\"", "\"\""),
        );

        match load_config_from(&base) {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "data.batter_stats");
            }
            other => panic!("expected ValidationError, got: {other:?}"),
        }

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let base = temp_base("empty_url");
        write_model_toml(
            &base,
            &VALID_TOML.replace("\"https://statsapi.mlb.com/api/v1\"", "\"  \""),
        );

        match load_config_from(&base) {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "api.base_url");
            }
            other => panic!("expected ValidationError, got: {other:?}"),
        }

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_projection_config_maps_to_model_params() {
        let projection = ProjectionConfig {
            alpha: 0.15,
            beta: 0.02,
            gamma: 0.15,
        };
        let params = projection.model_params();
        assert_eq!(params.alpha, 0.15);
        assert_eq!(params.beta, 0.02);
        assert_eq!(params.gamma, 0.15);
        assert_eq!(params.league_avg_woba, LEAGUE_AVG_WOBA);
    }
}
