//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, after the effective level is resolved.
//! Logs go to stderr so they never interleave with the chat on stdout.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

use crate::error::AppError;

/// HTTP stack targets capped at `warn` when the level is a bare level. At
/// `debug` they log every connection and TLS record of a chat request.
const QUIET_TARGETS: &[&str] = &["hyper_util=warn", "reqwest=warn", "rustls=warn"];

/// Initialise the global tracing subscriber.
///
/// If `prefer_level` is `true` (a `-v` flag), `level` wins and `RUST_LOG`
/// is only a fallback when `level` does not parse. Otherwise `RUST_LOG` wins
/// and `level` (from `FOLIO_CHAT_LOG_LEVEL` or config) is the fallback.
/// `RUST_LOG` is taken verbatim.
pub fn init(level: &str, prefer_level: bool) -> Result<(), AppError> {
    let filter = if prefer_level {
        match filter_for(level) {
            Ok(filter) => filter,
            Err(level_err) => EnvFilter::try_from_default_env().map_err(|env_err| {
                AppError::Logger(format!(
                    "invalid log level '{level}': {level_err}; RUST_LOG parse failed: {env_err}"
                ))
            })?,
        }
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => filter_for(level)
                .map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")))?,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))?;

    Ok(())
}

/// Filter for a configured level. A bare level (`"debug"`) also quiets the
/// HTTP stack; a directive list naming targets is used as written.
fn filter_for(level: &str) -> Result<EnvFilter, ParseError> {
    let mut filter = EnvFilter::try_new(level)?;
    if !level.contains('=') {
        for target in QUIET_TARGETS {
            filter = filter.add_directive(target.parse()?);
        }
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_info_succeeds_or_already_init() {
        // Another test in this process may have installed a subscriber first.
        match init("info", false) {
            Ok(()) => {}
            Err(AppError::Logger(msg)) if msg.contains("set subscriber") => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn bare_level_quiets_http_stack() {
        let rendered = filter_for("debug").unwrap().to_string();
        assert!(rendered.contains("hyper_util=warn"));
        assert!(rendered.contains("reqwest=warn"));
    }

    #[test]
    fn target_directives_are_left_alone() {
        let rendered = filter_for("folio_chat=trace,hyper_util=debug").unwrap().to_string();
        assert!(rendered.contains("hyper_util=debug"));
        assert!(!rendered.contains("reqwest=warn"));
    }

    #[test]
    fn invalid_level_is_rejected() {
        assert!(filter_for("folio_chat=loud").is_err());
    }
}
