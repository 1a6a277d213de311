//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "AUDIT_SAMPLING_LOG";

/// Filter used when `AUDIT_SAMPLING_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVE: &str = "sampling_core=info,sampling_analysis=info";

static INIT: Once = Once::new();

/// Initialize the engine's tracing/logging system.
///
/// Reads `AUDIT_SAMPLING_LOG` for per-module log levels, e.g.
/// `AUDIT_SAMPLING_LOG=sampling_analysis::calculators=debug,sampling_core=warn`.
///
/// Falls back to [`DEFAULT_DIRECTIVE`] if the variable is unset or invalid.
/// Idempotent: later calls are no-ops.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
