mod dux4r;
mod version;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "rearrscan";
    pub const BIN_NAME: &str = "rearrscan";
    pub const DEFAULT_LOG_LEVEL: &str = "info";
    pub const SILENT_LOG_LEVEL: &str = "warn";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Detect DUX4 rearrangements from paired-end reads aligned to GRCh38.")
        .subcommand_required(true)
        .arg(
            Arg::new("silent")
                .long("silent")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Only report warnings and errors"),
        )
        .subcommand(dux4r::cli::create_dux4r_cli())
        .subcommand(version::cli::create_version_cli())
}

fn init_logging(silent: bool) {
    let level = if silent {
        consts::SILENT_LOG_LEVEL
    } else {
        consts::DEFAULT_LOG_LEVEL
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();
    init_logging(matches.get_flag("silent"));

    match matches.subcommand() {
        //
        // DUX4 REARRANGEMENTS
        //
        Some((dux4r::cli::DUX4R_CMD, matches)) => {
            dux4r::handlers::run_dux4r(matches)?;
        }

        //
        // VERSION
        //
        Some((version::cli::VERSION_CMD, _)) => {
            version::handlers::run_version();
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
