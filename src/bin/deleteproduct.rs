//! deleteproduct - cancel a finite-fault product through PDL

use anyhow::Result;
use clap::Parser;
use finite_fault_product::cli::{EventArgs, PdlArgs};
use finite_fault_product::{PdlSender, delete_fault, logging};

#[derive(Parser)]
#[command(name = "deleteproduct")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cancel a finite-fault product", long_about = None)]
struct Cli {
    #[command(flatten)]
    event: EventArgs,

    /// Network contributing the product to ComCat
    #[arg(long)]
    source: String,

    /// The product is one model of a two-solution finite fault
    #[arg(long)]
    two_solution: bool,

    /// Model number to cancel (required with --two-solution)
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
    let msg = delete_fault(
        &PdlSender::new(),
        &pdl,
        &cli.event.event_id(),
        &cli.source,
        cli.two_solution,
        cli.number,
    )?;
    println!("{}", msg);
    Ok(())
}
