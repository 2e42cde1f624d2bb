use anyhow::Result;
use model::CsvAccountStore;
use tracing::{debug, error, info, trace};

use crate::config::AppConfig;

/// Creates the users file with its header row unless it already exists.
pub fn init_accounts(config: &AppConfig) -> Result<()> {
    trace!("Entering init_accounts function");
    info!("Initializing account store");
    debug!("Users file: {}", config.users_file.display());

    let store = match CsvAccountStore::open_or_create(&config.users_file) {
        Ok(store) => store,
        Err(e) => {
            error!(
                "Failed to initialize users file '{}': {}",
                config.users_file.display(),
                e
            );
            return Err(e.into());
        }
    };

    println!("Account store ready at {}", store.path().display());
    trace!("init_accounts function completed");
    Ok(())
}
