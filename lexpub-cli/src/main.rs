//! lexpub: publish rendered license documents to translation branches.
//!
//! # Usage
//!
//! ```text
//! lexpub publish                      # every open translation branch
//! lexpub publish -b <branch>          # a single branch
//! lexpub publish --list_branches      # show open branches
//! lexpub publish --nopush             # commit locally only
//! lexpub publish --nogit              # rebuild files, no git
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::publish::PublishArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "lexpub",
    version,
    about = "Render license documents and publish them to the data repository",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild the output tree and commit it to translation branches.
    Publish(PublishArgs),
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install the fmt subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Publish(args) => {
            init_tracing(args.verbose);
            args.run()
        }
    }
}
