use anyhow::Result;
use tracing::{debug, error, info, trace};

use crate::config::AppConfig;
use crate::report;

/// Renders the chart dashboard outside the menu.
pub fn visualize(config: &AppConfig, json: bool) -> Result<()> {
    trace!("Entering visualize function");
    info!("Rendering illness data charts");
    debug!("Illness file: {}", config.illness_file.display());
    debug!("Chart file: {}", config.chart_file.display());

    let report = match report::generate(&config.illness_file, &config.chart_file) {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to render charts: {}", e);
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Visualizations saved as '{}'", config.chart_file.display());
    }

    if config.display_charts {
        report::try_display(&config.chart_file);
    }

    trace!("visualize function completed");
    Ok(())
}
