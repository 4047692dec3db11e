use anyhow::Result;
use blocks_bin::{cli::Cli, commands, config::Config};
use blocks_log::LogConfig;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let discovered = Config::discover();
    let config = Config::load_with_overrides(cli.config.as_deref(), discovered.as_deref())?;

    let _log_guard = match blocks_log::init(LogConfig {
        log_file_path: cli.log_file.clone().or(config.log_file.clone()),
    }) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {e}");
            None
        },
    };

    let depth = cli.depth.unwrap_or(config.description_depth);
    tracing::debug!(command = ?cli.command, depth, "running");

    let output = commands::run(cli.command, depth)?;
    print!("{output}");
    Ok(())
}
