use std::process;

use people_store::{repository::person::RepositoryError, session::session::SessionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StartupCrash {
    #[error("Unable to open document store session: {0}")]
    Session(#[from] SessionError),

    #[error("Unable to seed demo records: {0}")]
    Seed(#[from] RepositoryError),

    #[error("Unable to register termination signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Startup faults have no recovery, the process must be restarted
pub fn crash_startup(reason: StartupCrash) -> ! {
    log::error!("Startup crash: {}", reason);

    process::exit(1);
}
