//! Logging initialization for the CLI.
//!
//! Built on the `tracing` ecosystem. The base level comes from the config
//! file's `[logging]` section; `--verbose` and `RUST_LOG` take precedence.

use fotonom_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem at `level` ("error" through "trace").
///
/// Log output goes to stderr (stdout is reserved for results). A set
/// RUST_LOG environment variable wins over `level`.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json_format {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Initialize logging from the Fotonom configuration file, letting CLI
/// flags override.
pub fn init_from_config(config: &Config, verbose_override: bool, json_logs_override: bool) {
    let json_format = json_logs_override || config.logging.format == "json";
    init(effective_level(config, verbose_override), json_format);
}

/// The level the subscriber starts from: `--verbose` forces debug, otherwise
/// `logging.level` is used as written ("warn", "trace", ...).
fn effective_level(config: &Config, verbose_override: bool) -> &str {
    if verbose_override {
        "debug"
    } else {
        &config.logging.level
    }
}
