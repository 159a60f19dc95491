//! WeedWise command line
//!
//! `weedwise analyze <PATH>` runs one image through a pipeline session
//! and prints the report; `weedwise check <PATH>` only applies the intake
//! rules; `weedwise species` lists what the detector knows about.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod commands;
pub mod report;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

pub use commands::Status;
pub use report::TextReport;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn path_arg() -> Arg {
    Arg::new("path")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Image file to process")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("TOML pipeline configuration")
}

/// Command-line definition
#[must_use]
pub fn build_cli() -> Command {
    Command::new("weedwise")
        .version(VERSION)
        .about("Weed detection intake and analysis pipeline")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("analyze")
                .about("Validate, encode and analyze an image")
                .arg(path_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the analysis result as JSON"),
                )
                .arg(
                    Arg::new("delay-ms")
                        .long("delay-ms")
                        .value_parser(value_parser!(u64))
                        .help("Simulated analysis latency in milliseconds"),
                )
                .arg(
                    Arg::new("timeout-ms")
                        .long("timeout-ms")
                        .value_parser(value_parser!(u64))
                        .help("Give up on the analysis after this many milliseconds"),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Apply the intake rules without analyzing")
                .arg(path_arg())
                .arg(config_arg()),
        )
        .subcommand(Command::new("species").about("List known species and growth stages"))
}

/// Run the parsed command, writing its output to `out`
pub async fn run<W: Write>(matches: &ArgMatches, out: &mut W) -> Result<Status> {
    match matches.subcommand() {
        Some(("analyze", args)) => {
            let path = args.get_one::<PathBuf>("path").context("missing image path")?;
            let mut config = commands::load_config(args.get_one::<PathBuf>("config"))?;
            if let Some(ms) = args.get_one::<u64>("delay-ms") {
                config = config.with_analysis_delay(Duration::from_millis(*ms));
            }
            if let Some(ms) = args.get_one::<u64>("timeout-ms") {
                config = config.with_analysis_timeout(Duration::from_millis(*ms));
            }
            config.validate()?;

            commands::analyze(path, config, args.get_flag("json"), out).await
        }
        Some(("check", args)) => {
            let path = args.get_one::<PathBuf>("path").context("missing image path")?;
            let config = commands::load_config(args.get_one::<PathBuf>("config"))?;

            commands::check(path, &config, out).await
        }
        Some(("species", _)) => {
            commands::species(out)?;
            Ok(Status::Success)
        }
        _ => anyhow::bail!("unknown command"),
    }
}
