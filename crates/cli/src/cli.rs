use std::path::PathBuf;

use clap::Parser;

/// Fills in the weekly SAP NetWeaver Portal timesheet and logs back off.
///
/// All portal parameters come from the config file; the binary runs with no
/// arguments.
#[derive(Parser, Debug)]
#[command(name = "hours")]
#[command(about = "Automated SAP NetWeaver Portal timesheet entry")]
#[command(version)]
pub struct Cli {
    /// Path to the credentials file
    #[arg(short, long, default_value = "hours.json", value_name = "FILE")]
    pub config: PathBuf,

    /// Run with a visible browser window
    #[arg(long)]
    pub headed: bool,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
