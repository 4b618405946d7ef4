//! # gridctl
//!
//! Command-line host for grid-core.

use clap::Parser;
use grid_cli::{commands, CliArgs, CliConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,grid_core=debug"));

    // Logs go to stderr so command output stays pipeable
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Use JSON format when RUST_LOG_FORMAT=json
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = CliConfig::from_args(&args)?;
    tracing::debug!(
        "Data dir {}, strategy {:?}, neighbor rule {:?}",
        config.data_dir.display(),
        config.engine.strategy,
        config.engine.neighbor_rule
    );

    let output = commands::run(&config, &args.command)?;
    print!("{output}");
    Ok(())
}
