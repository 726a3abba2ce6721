use clap::Parser;
use lunascan::cli::{self, Cli};
use lunascan::output;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tokio::select! {
        result = cli::run(cli) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                output::print_error(&e.to_string());
                ExitCode::from(e.exit_code())
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            eprintln!("\nExiting...");
            // A pending stdin read would keep the runtime from shutting down.
            std::process::exit(130);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "lunascan=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
