use std::io;

use anyhow::Result;
use model::CsvAccountStore;
use tracing::{debug, error, info, trace};

use crate::config::AppConfig;
use crate::session::Controller;
use crate::terminal::Terminal;

/// Runs the interactive menu on stdin and stdout.
pub fn run_menu(config: AppConfig) -> Result<()> {
    trace!("Entering run_menu function");
    info!("Symptom checker starting up");
    debug!("Users file: {}", config.users_file.display());

    let accounts = match CsvAccountStore::open_or_create(&config.users_file) {
        Ok(store) => store,
        Err(e) => {
            error!(
                "Failed to open users file '{}': {}",
                config.users_file.display(),
                e
            );
            return Err(e.into());
        }
    };

    let terminal = Terminal::new(io::stdin().lock(), io::stdout().lock(), config.mask_passwords);
    let mut controller = Controller::new(Box::new(accounts), config, terminal);

    if let Err(e) = controller.run() {
        error!("Menu session aborted: {}", e);
        return Err(e.into());
    }

    info!("Symptom checker shut down");
    Ok(())
}
