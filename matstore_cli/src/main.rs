//! matstore interactive shell
//!
//! Reads one command per line from stdin until `exit` or end of input.

use anyhow::Context;
use clap::Parser;
use matstore_cli::{shell, Session, SessionConfig, ShellOptions};
use std::io;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Interactive store for small u32 matrices
#[derive(Parser, Debug)]
#[command(name = "matstore")]
#[command(about = "Create, transform, and persist small u32 matrices", long_about = None)]
struct Args {
    /// Number of registry slots (oldest matrices are evicted beyond this)
    #[arg(short, long, default_value = "10")]
    capacity: usize,

    /// Seed for `random` (0 = seed from OS entropy)
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Directory that `read` and `write` resolve paths against
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Create, randomize, and write `temp_mat` before the first prompt
    #[arg(long)]
    bootstrap: bool,

    /// One JSON object per result instead of text
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout belongs to command results
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let config = SessionConfig {
        capacity: args.capacity,
        seed: args.seed,
        data_dir: args.data_dir.clone(),
    };
    let mut session = Session::new(&config).context("failed to start session")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.bootstrap {
        let outcomes = session.bootstrap().context("program failed to init")?;
        for outcome in &outcomes {
            shell::render(&mut out, args.json, Ok(outcome))?;
        }
    }

    let options = ShellOptions {
        json: args.json,
        prompt: true,
    };
    shell::run(&mut session, io::stdin().lock(), &mut out, options)?;

    session.close();
    info!("bye");
    Ok(())
}
