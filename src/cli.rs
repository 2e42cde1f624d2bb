use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

use crate::config::{AppConfig, ConfigOverrides};
use commands::{init_accounts, predict, run_menu, visualize};

#[derive(Parser)]
#[command(name = "symptom-checker")]
#[command(about = "Terminal symptom checker with illness level prediction and data charts")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    ///
    /// Without this option `symptom-checker.toml` in the working directory is
    /// used when it exists.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV file holding registered users
    #[arg(long, global = true)]
    pub users_file: Option<PathBuf>,

    /// CSV catalog of symptoms (symptom, intensity, severity)
    #[arg(long, global = true)]
    pub symptoms_file: Option<PathBuf>,

    /// CSV table of historical illness records
    #[arg(long, global = true)]
    pub illness_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive menu (default)
    Menu,
    /// Create the users file with its header if it does not exist
    Init,
    /// Predict an illness level for an age and a symptom severity
    Predict {
        /// Age in years
        #[arg(long)]
        age: i64,

        /// Symptom severity score
        #[arg(long)]
        severity: f64,

        /// Print the prediction and validation details as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the illness data charts without the menu
    Visualize {
        /// Output SVG file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not try to open the rendered file
        #[arg(long)]
        no_display: bool,

        /// Print the aggregated chart data as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            users_file: self.users_file.clone(),
            symptoms_file: self.symptoms_file.clone(),
            illness_file: self.illness_file.clone(),
            ..ConfigOverrides::default()
        };
        if let Some(Commands::Visualize {
            output, no_display, ..
        }) = &self.command
        {
            overrides.chart_file = output.clone();
            if *no_display {
                overrides.display_charts = Some(false);
            }
        }
        overrides
    }

    pub fn run(self) -> Result<()> {
        let config = AppConfig::load(self.config.as_deref(), &self.overrides())?;

        match self.command.unwrap_or(Commands::Menu) {
            Commands::Menu => {
                run_menu(config)?;
            }
            Commands::Init => {
                init_accounts(&config)?;
            }
            Commands::Predict {
                age,
                severity,
                json,
            } => {
                predict(&config, age, severity, json)?;
            }
            Commands::Visualize { json, .. } => {
                visualize(&config, json)?;
            }
        }
        Ok(())
    }
}
