//! sendproduct - send a directory of files as a finite-fault product

use anyhow::Result;
use clap::Parser;
use finite_fault_product::cli::{EventArgs, PdlArgs, parse_property};
use finite_fault_product::{PdlSender, logging, store_fault};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sendproduct")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Send a finite-fault product through PDL", long_about = None)]
struct Cli {
    #[command(flatten)]
    event: EventArgs,

    /// Directory holding the files to send
    directory: PathBuf,

    /// Network contributing the product to ComCat
    #[arg(long)]
    source: String,

    /// Product property as key=value (repeatable)
    #[arg(short, long = "property", value_name = "KEY=VALUE", value_parser = parse_property)]
    properties: Vec<(String, String)>,

    /// Mark the product as reviewed
    #[arg(long)]
    reviewed: bool,

    /// Model number for two-solution products
    #[arg(long)]
    number: Option<u32>,

    #[command(flatten)]
    pdl: PdlArgs,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let pdl = cli.pdl.resolve()?;
    let mut properties: BTreeMap<String, String> = cli.properties.into_iter().collect();
    let (nfiles, msg) = store_fault(
        &PdlSender::new(),
        &pdl,
        &cli.event.event_id(),
        &cli.directory,
        &cli.source,
        &mut properties,
        cli.reviewed,
        cli.number,
    )?;
    println!("{} file(s) sent", nfiles);
    println!("{}", msg);
    Ok(())
}
