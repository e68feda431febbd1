use std::path::PathBuf;

/// Product type used for every product this crate sends, fetches or cancels.
pub const PRODUCT_TYPE: &str = "finite-fault";

/// Canonical timestamp format. Directory names drop the fractional seconds and
/// replace `:` so the result is safe on every filesystem.
pub const TIMEFMT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// ComCat host queried when no alternate host is configured.
pub const DEFAULT_COMCAT_HOST: &str = "earthquake.usgs.gov";

/// Default location for downloaded product directories.
pub fn base_pdl_folder() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("finite_fault")
        .join("pdl")
}
