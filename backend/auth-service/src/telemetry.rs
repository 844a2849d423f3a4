use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "auth_service=info,tower_http=info";

/// Install the global JSON tracing subscriber
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .init();
}
