//! Train - an asset build pipeline for web applications.

mod asset;
mod cli;
mod config;
mod logger;
mod pipeline;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::TrainConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = match TrainConfig::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            log!("error"; "{:#}", err);
            std::process::exit(1);
        }
    };

    if cli.is_upgrade() {
        return cli::upgrade::run(&config.upgrade);
    }

    let code = cli::bundle::run(&config);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
