//! Structured logging bootstrap.
//!
//! Every LatticeWorks service and plugin host calls [`init_logging`] once at
//! startup. Output format is selected with `LOG_FORMAT` (`json` for log
//! aggregation, anything else for human-readable text) and filtering follows
//! the standard `RUST_LOG` syntax, e.g. `RUST_LOG=lw_auth_oidc=debug`.
//!
//! Log calls themselves use `tracing` macros with structured fields:
//!
//! ```rust,ignore
//! tracing::error!(error = %err, "Unable to decode id_token");
//! ```

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize the global tracing subscriber.
///
/// Defaults to `info` level when `RUST_LOG` is unset.
pub fn init_logging(_service_name: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(true)
                    .flatten_event(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(true),
            )
            .init();
    }
}
