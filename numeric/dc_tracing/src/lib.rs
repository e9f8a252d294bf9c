use std::env;

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;

/// Environment variable holding the filter directives, e.g.
/// `DC_LOG=dc_strtod=trace`.
pub const LOG_ENV: &str = "DC_LOG";

/// Installs a hierarchical stderr subscriber filtered by [`LOG_ENV`].
/// Nothing is installed when the variable is unset; returns whether a
/// subscriber was installed.
///
/// # Errors
/// if a global subscriber is already set
pub fn init_tracing() -> Result<bool, SetGlobalDefaultError> {
    let filter = match env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) => return Ok(false),
    };
    let layer = tracing_tree::HierarchicalLayer::default()
        .with_targets(true)
        .with_writer(std::io::stderr);
    let subscriber = tracing_subscriber::Registry::default().with(filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(true)
}
