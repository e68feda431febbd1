//! getproduct - download the latest finite-fault product of an event

use anyhow::Result;
use clap::Parser;
use finite_fault_product::cli::EventArgs;
use finite_fault_product::constants::base_pdl_folder;
use finite_fault_product::{ComcatClient, get_date, get_fault, load_comcat_host, logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "getproduct")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Retrieve the latest finite-fault product from ComCat", long_about = None)]
struct Cli {
    #[command(flatten)]
    event: EventArgs,

    /// Alternate ComCat host (e.g. dev-earthquake.cr.usgs.gov)
    #[arg(long)]
    host: Option<String>,

    /// Fetch both models of a two-solution product
    #[arg(long)]
    two_model: bool,

    /// Where to write the product directories (defaults to ~/finite_fault/pdl)
    #[arg(short, long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Only report the latest revision(s), do not download
    #[arg(long)]
    no_download: bool,

    /// Show download progress
    #[arg(long)]
    progress: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let host = load_comcat_host(cli.host)?;
    let comcat = ComcatClient::new(&host)?.with_progress(cli.progress);

    let directory = if cli.no_download {
        None
    } else {
        Some(cli.directory.unwrap_or_else(base_pdl_folder))
    };

    let retrieved = get_fault(
        &comcat,
        &cli.event.event_id(),
        cli.two_model,
        directory.as_deref(),
    )?;

    for model in &retrieved.models {
        println!(
            "{} (source {}, updated {}, {} file(s))",
            model.code,
            model.source,
            get_date(model.update_time as f64)?,
            model.contents.len()
        );
    }
    for dir in &retrieved.directories {
        println!("wrote {}", dir.display());
    }
    Ok(())
}
