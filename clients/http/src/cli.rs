use clap::Parser;
use people_store::{
    consts::consts::{DEFAULT_COLLECTION, DEFAULT_DATABASE},
    session::options::SessionOptions,
};

/// 📇 People REST server, exposes person records stored in a document database
///
/// Usage: rest-people 8080 mongodb://localhost:27017
#[derive(Parser, Debug)]
pub struct Cli {
    /// Port the http server will listen on
    pub http_port: u16,

    /// Document store url, `mongodb://host:port` or `memory://` for a throwaway in-process store
    pub database_url: String,

    /// Address the http server will bind to
    #[clap(short, long, default_value = "0.0.0.0")]
    pub address: String,

    /// Database holding the people collection
    #[clap(long, default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// Collection people are stored in
    #[clap(long, default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Number of http worker threads
    #[clap(long, default_value_t = 2)]
    pub http_workers: usize,

    /// Logs every http request
    #[clap(long)]
    pub log_http: bool,

    /// Skips inserting the demo records on startup
    #[clap(long)]
    pub no_seed: bool,
}

impl Cli {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::default()
            .set_database(self.database.clone())
            .set_collection(self.collection.clone())
    }
}
