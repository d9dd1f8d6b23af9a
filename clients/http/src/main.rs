use actix_web::{
    middleware::{self, Condition, NormalizePath},
    web::Data,
    App, HttpServer,
};
use actix_web_lab::middleware::from_fn;
use clap::Parser;
use people_store::{
    repository::{person::PersonRepository, seed::demo_people},
    session::session::Session,
};
use std::io;

use crate::{
    cli::Cli,
    crash::{crash_startup, StartupCrash},
    shutdown::ShutdownSignal,
};

mod cli;
mod cors;
mod crash;
mod error;
mod handlers;
mod shutdown;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let session = Session::open(&args.database_url, args.session_options())
        .await
        .unwrap_or_else(|e| crash_startup(StartupCrash::from(e)));

    let repository = PersonRepository::new(session.store());

    if !args.no_seed {
        if let Err(e) = repository.seed(&demo_people()).await {
            session.close().await;
            crash_startup(StartupCrash::from(e));
        }
    }

    // Installed once startup is done, until then SIGINT/SIGTERM keep their default
    //  behaviour and end the process during a slow ping or seed
    let shutdown_signal = match ShutdownSignal::install() {
        Ok(shutdown_signal) => shutdown_signal,
        Err(e) => {
            session.close().await;
            crash_startup(StartupCrash::from(e));
        }
    };

    // The session outlives the server on every exit path, including bind failures
    let served = serve(args, repository, shutdown_signal).await;

    session.close().await;

    served
}

async fn serve(
    args: Cli,
    repository: PersonRepository,
    shutdown_signal: ShutdownSignal,
) -> io::Result<()> {
    let repository = Data::new(repository);
    let log_http = args.log_http;

    log::info!("Starting http server on {}:{}", args.address, args.http_port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(repository.clone())
            .configure(handlers::configure)
            .wrap(NormalizePath::trim())
            .wrap(from_fn(cors::cors))
            .wrap(Condition::new(log_http, middleware::Logger::default()))
    })
    .workers(args.http_workers)
    // Signals are handled by `ShutdownSignal` so the session close runs after the server stops
    .disable_signals()
    .bind((args.address, args.http_port))?
    .run();

    let server_handle = server.handle();

    actix_web::rt::spawn(async move {
        shutdown_signal.recv().await;

        log::info!("Termination signal received, stopping http server");

        server_handle.stop(true).await;
    });

    server.await
}
