use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,echelon_http=debug";

/// Initialize a simple stdout tracing subscriber for development.
///
/// Honors `RUST_LOG`; falls back to `info,echelon_http=debug`.
/// Panics if a global subscriber is already installed.
pub fn init_stdout_tracing() {
    tracing_subscriber::fmt().with_env_filter(filter()).init();
}

/// Like [`init_stdout_tracing`], but reports an already-installed subscriber as an error.
pub fn try_init_stdout_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter(filter()).try_init()
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        // Only this test installs a global subscriber in the core test binary.
        try_init_stdout_tracing().unwrap();
        assert!(try_init_stdout_tracing().is_err());
        tracing::info!("subscriber installed");
    }
}
