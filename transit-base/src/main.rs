//! Entry point: `build` constructs the model and writes a snapshot,
//! `serve` loads a snapshot and answers the query batch.
//!
//! Both modes read the request document from stdin; `serve` writes the
//! response document to stdout. Logs go to stderr so they never mix with
//! the response stream.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use transit_base::catalogue::{Catalogue, UnknownStop};
use transit_base::handler::RequestHandler;
use transit_base::protocol::{self, RequestDocument};
use transit_base::router::TransitRouter;
use transit_base::snapshot::{Snapshot, SnapshotError};

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("malformed request document: {0}")]
    Document(#[source] serde_json::Error),

    #[error("missing required configuration block: {0}")]
    MissingConfig(&'static str),

    #[error(transparent)]
    Ingest(#[from] UnknownStop),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("failed to write the response document: {0}")]
    Output(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    let result = match args[1].as_str() {
        "build" => run_build(),
        "serve" => run_serve(),
        _ => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: transit-base [build|serve]");
}

fn read_document() -> Result<RequestDocument, RunError> {
    serde_json::from_reader(io::stdin().lock()).map_err(RunError::Document)
}

/// Ingest the request document, build the model and persist the snapshot.
fn run_build() -> Result<(), RunError> {
    let document = read_document()?;

    let mut catalogue = Catalogue::new();
    protocol::populate(&mut catalogue, &document.base_requests)?;

    let routing = document
        .routing_settings
        .ok_or(RunError::MissingConfig("routing_settings"))?;
    let router = TransitRouter::build(&catalogue, routing);

    let settings = document
        .serialization_settings
        .ok_or(RunError::MissingConfig("serialization_settings"))?;
    Snapshot::capture(&catalogue, &document.render_settings, &router).save(&settings.file)?;
    Ok(())
}

/// Load the snapshot and answer the query batch.
fn run_serve() -> Result<(), RunError> {
    let document = read_document()?;

    let settings = document
        .serialization_settings
        .ok_or(RunError::MissingConfig("serialization_settings"))?;
    let (catalogue, render_settings, router) = Snapshot::load(&settings.file)?.restore()?;

    let handler = RequestHandler::new(&catalogue, &router, &render_settings);
    let responses = handler.answer_all(&document.stat_requests);

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &responses).map_err(RunError::Output)?;
    writeln!(stdout)?;
    Ok(())
}
