use clap::Parser;
use tracing_subscriber::EnvFilter;

use path_merge::cli;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging based on the verbosity count
    let filter = match args.verbose {
        0 => EnvFilter::new("path_merge=warn"),
        1 => EnvFilter::new("path_merge=info"),
        _ => EnvFilter::new("path_merge=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    cli::merge::run(&args)
}
