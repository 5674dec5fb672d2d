//! Tracing subscriber installation.

use std::sync::Once;

/// Environment variable holding the filter, e.g. `RSC_LOG=rsc_export=debug`.
pub const LOG_ENV: &str = "RSC_LOG";

static TRACING_INIT: Once = Once::new();

/// Install a subscriber for debug output.
///
/// Does nothing unless `RSC_LOG` is set. Safe to call more than once; only
/// the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var(LOG_ENV).is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_env(LOG_ENV))
                .init();
        }
    });
}
