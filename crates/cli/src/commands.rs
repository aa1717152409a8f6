//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("nemestrix")
        .about("Tools for the nemestrix path forest")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Config file (default: ./nemestrix.toml if present)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log at debug level to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("generate-key")
                .about("Generate an API key and print its hash")
                .arg(Arg::new("key").help("Hash this key instead of generating one")),
        )
        .subcommand(
            Command::new("verify-key")
                .about("Check a key against the configured hash")
                .arg(Arg::new("key").required(true).help("Key to verify")),
        )
        .subcommand(
            Command::new("encode")
                .about("Read JSON on stdin, print one label<TAB>value line per leaf"),
        )
        .subcommand(
            Command::new("decode")
                .about("Read a flat {\"label\": value} object on stdin, print nested JSON"),
        )
        .subcommand(
            Command::new("init-config")
                .about("Write the default config file if it does not exist")
                .arg(Arg::new("path").help("Where to write (default: ./nemestrix.toml)")),
        )
}
