// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, set up logging, load the
//   configuration and hand the files to the uploader.
// - Returns `anyhow::Result` so any fatal error is printed with its context
//   and the process exits non-zero.

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use rbcli::api::ApiClient;
use rbcli::cli::{Cli, Command};
use rbcli::config::Config;
use rbcli::identity::LdapDirectory;
use rbcli::upload::Uploader;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(cli.verbose)?;

    let config = Config::from_env().context("Failed to load configuration")?;
    let directory = LdapDirectory::from_config(&config);
    let client = ApiClient::new(config.api_key.clone())?;
    let uploader = Uploader::new(&config, &directory, &client, &client);

    let options = cli.upload_options();
    match &cli.command {
        Command::Upload { files } => {
            let report = uploader.upload(files, &options)?;
            println!("{}", report);
        }
    }
    Ok(())
}

/// Logs go to stderr; stdout is reserved for the report.
fn initialize_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}
