use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directives used when RUST_LOG is unset: chatty for our own crate,
/// quiet for the SQL and HTTP internals.
const DEFAULT_DIRECTIVES: &str = "info,backend=debug,sea_orm=warn,sqlx=warn,actix_http=warn";

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let registry = tracing_subscriber::registry().with(env_filter);

    // LOG_FORMAT=pretty gives human-readable output for local runs;
    // everything else gets JSON lines for log shipping.
    if pretty_output() {
        registry.with(fmt::layer().with_target(true)).init();
    } else {
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_target(false)
                    .with_ansi(false),
            )
            .init();
    }
}

fn pretty_output() -> bool {
    std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("pretty"))
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::pretty_output;

    #[test]
    #[serial]
    fn pretty_output_only_when_requested() {
        std::env::remove_var("LOG_FORMAT");
        assert!(!pretty_output());
        std::env::set_var("LOG_FORMAT", "PRETTY");
        assert!(pretty_output());
        std::env::set_var("LOG_FORMAT", "json");
        assert!(!pretty_output());
        std::env::remove_var("LOG_FORMAT");
    }
}
