use std::fs;

use anyhow::{Context, Result};
use clap::Clap;
use colorful::Colorful;
use commands::Opts;

use crate::log::*;

mod commands;
mod demo;
mod log;

fn main() {
    let opts: Opts = Opts::parse();
    let level = if opts.verbose {
        Level::Debug
    } else if opts.quiet {
        Level::Warn
    } else {
        Level::Info
    };
    SimpleLogger::new().with_level(level).init().unwrap();

    if let Err(err) = try_main(opts) {
        error!("{}", err);
        if level == Level::Debug {
            err.chain()
                .skip(1)
                .for_each(|cause| eprintln!("   {}", format!("- {}", cause).dark_gray()));
        }
        std::process::exit(1);
    }
}

fn try_main(opts: Opts) -> Result<()> {
    let schema_text = fs::read_to_string(&opts.schema).context("could not read schema file")?;
    let schema_file: demo::SchemaFile = serde_json::from_str(&schema_text).context("could not parse schema file")?;
    let proto = demo::build_protocol(schema_file)?;
    info!("loaded schema from '{}'", opts.schema);

    let data_text = fs::read_to_string(&opts.data).context("could not read data file")?;
    let data_json: serde_json::Value = serde_json::from_str(&data_text).context("could not parse data file")?;
    let data = demo::build_data(&proto, &opts.message, &data_json)?;
    info!("loaded data for message '{}'", opts.message);

    let bytes = proto.encode(&opts.message, &data)?;
    info!("encoded {} bytes", bytes.len());

    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    println!("{}", hex.bold());

    Ok(())
}
