use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "STOCHASTICS_LOG";

static INIT: Once = Once::new();

/// Installs the stderr subscriber. Filter comes from `STOCHASTICS_LOG`
/// (e.g. `stochastics=debug`), falling back to `default_filter`.
///
/// Later calls are no-ops.
pub fn init_tracing(default_filter: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
