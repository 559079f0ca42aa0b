//! Wires the `log` facade (used by collaborators like [`crate::collaborators::NullRanker`])
//! through to a real `tracing` subscriber, and derives the global verbosity
//! from repeated `-v`/`-q` flags the way posy's own `output.rs` does.

use clap::Args;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Increase verbosity. Can be repeated.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Reduce verbosity. Can be repeated.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    quiet: u8,
}

/// Installs a `tracing-subscriber` fmt layer and bridges `log::*` calls (the
/// facade [`crate::collaborators`] and the `Cache` itself use) into it via
/// `tracing-log`. Call once, at process start.
pub fn init(args: &OutputArgs) {
    let verbosity = i8::try_from(args.verbose)
        .unwrap_or(i8::MAX)
        .saturating_sub(i8::try_from(args.quiet).unwrap_or(i8::MAX));

    let default_level = match verbosity {
        2.. => LevelFilter::TRACE,
        1 => LevelFilter::DEBUG,
        0 => LevelFilter::INFO,
        -1 => LevelFilter::WARN,
        i8::MIN..=-2 => LevelFilter::ERROR,
    };

    tracing_log::LogTracer::init().expect("log bridge already installed?");

    fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .with_env_var("HOLLOWFS_LOG")
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}
