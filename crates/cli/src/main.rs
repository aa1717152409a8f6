//! nemestrix: command-line tools for the path forest.
//!
//! - `encode` / `decode`: convert between nested JSON and labeled leaves
//! - `generate-key` / `verify-key`: API-key management
//! - `init-config`: write a default `nemestrix.toml`

mod actions;
mod commands;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::ArgMatches;
use tracing::Level;

use nemestrix_engine::{ForestConfig, CONFIG_FILE_NAME};

use commands::build_cli;

fn main() {
    let matches = build_cli().get_matches();

    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    match run(&matches) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if stdout.write_all(output.as_bytes()).is_err() {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(matches: &ArgMatches) -> Result<String> {
    match matches.subcommand() {
        Some(("generate-key", sub)) => Ok(actions::generate_key(
            sub.get_one::<String>("key").map(String::as_str),
        )),
        Some(("verify-key", sub)) => {
            let config = load_config(matches)?;
            let key = sub
                .get_one::<String>("key")
                .context("missing KEY argument")?;
            actions::verify_key(&config, key)
        }
        Some(("encode", _)) => {
            let config = load_config(matches)?;
            actions::encode(&read_stdin()?, config.limits())
        }
        Some(("decode", _)) => {
            let config = load_config(matches)?;
            actions::decode(&read_stdin()?, config.limits())
        }
        Some(("init-config", sub)) => {
            let path = sub
                .get_one::<String>("path")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            actions::init_config(&path)
        }
        _ => anyhow::bail!("no command given, see --help"),
    }
}

/// Explicit `--config` must exist; otherwise use `./nemestrix.toml` if present.
fn load_config(matches: &ArgMatches) -> Result<ForestConfig> {
    if let Some(path) = matches.get_one::<String>("config") {
        return Ok(ForestConfig::from_file(Path::new(path))?);
    }
    let default_path = Path::new(CONFIG_FILE_NAME);
    if default_path.exists() {
        tracing::debug!(target: "nemestrix::cli", path = %default_path.display(), "loading config");
        Ok(ForestConfig::from_file(default_path)?)
    } else {
        Ok(ForestConfig::default())
    }
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    io::stdin()
        .read_to_end(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}
