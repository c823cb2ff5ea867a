use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "WifiGaze")]
#[command(about = "Builds a live wireless topology graph from captured frame records.", long_about = None)]
#[command(version)]
pub struct Arguments {
    /// Optional - File of capture records to ingest. Reads stdin if omitted.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Optional - Write the graph snapshot to this file instead of stdout.
    #[arg(short, long, name = "output", help = "Output Filename")]
    pub output: Option<PathBuf>,

    /// Optional - OUI database for vendor labels (aa:bb:cc<TAB>Vendor lines).
    #[arg(long, name = "oui", help = "OUI Database File")]
    pub oui: Option<PathBuf>,

    /// Optional - SSID colour palette override, e.g. "-p #ff7f0e,#2ca02c".
    #[arg(short = 'p', long, use_value_delimiter = true, action = clap::ArgAction::Append)]
    pub palette: Vec<String>,
}
