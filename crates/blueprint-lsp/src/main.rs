use blueprint_lsp::Server;
use std::io::{self, BufWriter};
use std::process::ExitCode;

fn init_logging() {
    let filter = std::env::var("BLUEPRINT_LSP_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    // stdout carries the protocol.
    env_logger::Builder::new()
        .parse_filters(&filter)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    log::info!(
        "{} {} starting",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut server = Server::new(BufWriter::new(io::stdout().lock()));

    match server.run(&mut reader) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            log::warn!("exiting without shutdown");
            ExitCode::FAILURE
        }
        Err(err) => {
            log::error!("fatal protocol error: {err}");
            ExitCode::FAILURE
        }
    }
}
