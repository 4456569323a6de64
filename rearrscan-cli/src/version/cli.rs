use clap::Command;

pub const VERSION_CMD: &str = "version";

pub fn create_version_cli() -> Command {
    Command::new(VERSION_CMD).about("Print the program name and version.")
}
