use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// The log level comes from RUST_LOG, defaulting to info for the gateway
/// and tower_http. Events are emitted as JSON so attempt counts, elapsed
/// times, and outcomes stay structured fields.
pub fn init_subscriber() {
    if let Err(err) = try_init_subscriber() {
        eprintln!("tracing subscriber not installed: {err}");
    }
}

/// Fallible variant; errors when a global subscriber is already set.
pub fn try_init_subscriber() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "genchat=info,tower_http=info".into()),
        )
        .with(fmt::layer().json())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_reports_instead_of_panicking() {
        // nothing else in this test binary installs a global subscriber,
        // so the first call wins and the second must fail cleanly
        assert!(try_init_subscriber().is_ok());
        assert!(try_init_subscriber().is_err());
        init_subscriber();
    }
}
