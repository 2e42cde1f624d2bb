use std::path::{Path, PathBuf};

use compute::predictor::PredictorConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AppError;

/// Base name of the optional configuration file in the working directory.
pub const CONFIG_FILE_NAME: &str = "symptom-checker";

/// Prefix of the environment variables read into [`AppConfig`].
pub const ENV_PREFIX: &str = "SYMPTOM_CHECKER";

/// Runtime settings of the symptom checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Flat file holding the registered users.
    pub users_file: PathBuf,
    pub symptoms_file: PathBuf,
    pub illness_file: PathBuf,
    /// Where the chart dashboard is written.
    pub chart_file: PathBuf,
    /// Try to open the chart file after it has been written.
    pub display_charts: bool,
    /// Read passwords without echo.
    pub mask_passwords: bool,
    pub model: PredictorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            users_file: PathBuf::from("users.csv"),
            symptoms_file: PathBuf::from("data/symptoms.csv"),
            illness_file: PathBuf::from("data/illness.csv"),
            chart_file: PathBuf::from("enhanced_illness_visualization.svg"),
            display_charts: true,
            mask_passwords: true,
            model: PredictorConfig::default(),
        }
    }
}

/// Values given on the command line; they win over every other source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub users_file: Option<PathBuf>,
    pub symptoms_file: Option<PathBuf>,
    pub illness_file: Option<PathBuf>,
    pub chart_file: Option<PathBuf>,
    pub display_charts: Option<bool>,
}

impl AppConfig {
    /// Loads the configuration from defaults, the config file, `SYMPTOM_CHECKER_*`
    /// environment variables and finally `overrides`.
    ///
    /// Without `config_file`, `symptom-checker.{toml,yaml,json,...}` is read
    /// from the working directory when present. An explicit file must exist.
    pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, AppError> {
        let defaults = AppConfig::default();
        let mut builder = Config::builder()
            .set_default("users_file", path_value(&defaults.users_file))?
            .set_default("symptoms_file", path_value(&defaults.symptoms_file))?
            .set_default("illness_file", path_value(&defaults.illness_file))?
            .set_default("chart_file", path_value(&defaults.chart_file))?
            .set_default("display_charts", defaults.display_charts)?
            .set_default("mask_passwords", defaults.mask_passwords)?
            .set_default("model.seed", defaults.model.seed)?
            .set_default("model.test_size", defaults.model.test_size)?;

        builder = match config_file {
            Some(path) => {
                info!("Reading configuration from {}", path.display());
                builder.add_source(File::from(path.to_path_buf()).required(true))
            }
            None => builder.add_source(File::with_name(CONFIG_FILE_NAME).required(false)),
        };

        let mut config: AppConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.apply(overrides);
        config.model.validate()?;

        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(path) = &overrides.users_file {
            self.users_file = path.clone();
        }
        if let Some(path) = &overrides.symptoms_file {
            self.symptoms_file = path.clone();
        }
        if let Some(path) = &overrides.illness_file {
            self.illness_file = path.clone();
        }
        if let Some(path) = &overrides.chart_file {
            self.chart_file = path.clone();
        }
        if let Some(display) = overrides.display_charts {
            self.display_charts = display;
        }
    }
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
