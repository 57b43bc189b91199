use clap::Parser;
use tracing_subscriber::EnvFilter;

use distance_est::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity count
    let filter = match cli.verbose {
        0 => EnvFilter::new("distance_est=warn"),
        1 => EnvFilter::new("distance_est=info"),
        _ => EnvFilter::new("distance_est=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    cli::estimate::run(cli.args)
}
