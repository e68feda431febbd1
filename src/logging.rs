use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the stderr subscriber used by the command-line tools.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks debug or info for this
/// crate.
pub fn init(verbose: bool) {
    let default = if verbose {
        "finite_fault_product=debug"
    } else {
        "finite_fault_product=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());

    // A subscriber may already be installed (tests, embedding programs).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
