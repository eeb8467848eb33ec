use clap::{AppSettings, Clap};

/// Encode a JSON data document against a JSON-described message/enum schema
/// and print the resulting wire bytes as hex.
#[derive(Clap, Debug)]
#[clap(name = "proto-forge")]
#[clap(setting = AppSettings::ColoredHelp)]
pub struct Opts {
    /// JSON file describing messages and enums
    #[clap(short, long)]
    pub schema: String,

    /// JSON file holding the data to encode
    #[clap(short, long)]
    pub data: String,

    /// Top-level message name to encode
    #[clap(short, long)]
    pub message: String,

    /// Print more information
    #[clap(short, long)]
    pub verbose: bool,

    /// Only print errors and warnings
    #[clap(short, long)]
    pub quiet: bool,
}
