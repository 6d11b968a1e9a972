//! Structured logging setup for the command line tool
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the binary (or to the embedding application).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "ZH_SIMILARITY_LOG";

/// library and binary targets
const TARGETS: [&str; 2] = ["zh_text_similarity", "zh_similarity"];

/// Initialize structured logging based on CLI arguments
///
/// # Arguments
/// * `verbose` - `debug` instead of `warn` when no level is given
/// * `log_level` - explicit level (`info`) or full filter (`zh_text_similarity=trace`)
/// * `log_json` - JSON lines instead of the compact format
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = build_filter(verbose, log_level);
    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_span_events(fmt::format::FmtSpan::CLOSE),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

/// `ZH_SIMILARITY_LOG` wins over the CLI flags
fn build_filter(verbose: bool, log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, log_level)))
}

fn filter_directive(verbose: bool, log_level: Option<&str>) -> String {
    let level = match (verbose, log_level) {
        (_, Some(level)) if level.contains('=') => return level.to_string(),
        (_, Some(level)) => level,
        (true, None) => "debug",
        (false, None) => "warn",
    };
    TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_from_flags() {
        assert_eq!(
            filter_directive(false, None),
            "zh_text_similarity=warn,zh_similarity=warn"
        );
        assert_eq!(
            filter_directive(true, None),
            "zh_text_similarity=debug,zh_similarity=debug"
        );
        assert_eq!(
            filter_directive(true, Some("info")),
            "zh_text_similarity=info,zh_similarity=info"
        );
        assert_eq!(filter_directive(false, Some("jieba_rs=trace")), "jieba_rs=trace");
    }
}
