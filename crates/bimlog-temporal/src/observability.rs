//! Tracing subscriber setup for hosts that embed the engine.

use tracing_subscriber::EnvFilter;

use bimlog_core::config::ObservabilityConfig;

/// Install a global fmt subscriber. `RUST_LOG` wins over `log_filter`.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let result = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.is_ok()
}
