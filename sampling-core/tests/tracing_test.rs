use sampling_core::tracing::{init_tracing, DEFAULT_DIRECTIVE};
use tracing_subscriber::EnvFilter;

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!(target: "sampling_core", "tracing initialised twice without panicking");
}

#[test]
fn default_directive_parses() {
    assert!(EnvFilter::try_new(DEFAULT_DIRECTIVE).is_ok());
}
