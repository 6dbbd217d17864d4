//! Tracing initialization.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Set to `json` for one JSON object per log line.
pub const LOG_FORMAT_ENV: &str = "DOXSEARCH_LOG_FORMAT";

static INIT: Once = Once::new();

/// Initialize tracing. Safe to call multiple times.
///
/// Logs go to stderr: stdout carries the MCP transport and command output.
/// The level comes from `RUST_LOG` (default `info`, `debug` under tests).
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let level = if is_test {
            Level::DEBUG
        } else {
            Level::INFO
        };
        let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = env_filter(rust_log.as_deref(), level);

        if is_test {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_test_writer()
                .compact()
                .try_init();
            return;
        }

        let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr);

        let result = if json {
            builder.json().try_init()
        } else {
            builder.compact().try_init()
        };
        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}

/// Filter from `RUST_LOG` directives, falling back to `default` when unset or
/// unparsable. Explicit directives win, including levels below the default.
fn env_filter(rust_log: Option<&str>, default: Level) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default.as_str()))
}
