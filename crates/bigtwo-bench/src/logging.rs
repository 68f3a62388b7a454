use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Installs a JSON subscriber writing `telemetry.jsonl` next to the summary.
/// `RUST_LOG` overrides the configured level.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let telemetry_dir = outputs
        .summary_md
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&telemetry_dir).with_context(|| {
        format!(
            "creating telemetry directory at {}",
            telemetry_dir.display()
        )
    })?;

    let telemetry_path = telemetry_dir.join("telemetry.jsonl");
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let level = logging.level().unwrap_or(Level::INFO);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // A global subscriber may already be installed when running under tests.
    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}

/// Round results on `bigtwo_core::round` are kept at `info` or finer so a
/// quiet run still records settlements. Per-step events need `debug`.
fn default_directives(level: Level) -> String {
    let engine = level.max(Level::INFO).as_str().to_ascii_lowercase();
    let level = level.as_str().to_ascii_lowercase();
    format!(
        "{level},bigtwo_bench={level},bigtwo_core::bot={level},bigtwo_core::round={engine},bigtwo_bot::decision={level}"
    )
}

#[cfg(test)]
mod tests {
    use super::default_directives;
    use tracing::Level;

    #[test]
    fn round_results_stay_visible_at_quiet_levels() {
        let directives = default_directives(Level::WARN);
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("bigtwo_core::round=info"));
        assert!(directives.contains("bigtwo_bot::decision=warn"));
    }

    #[test]
    fn directives_parse_as_a_filter() {
        let directives = default_directives(Level::DEBUG);
        assert!(tracing_subscriber::EnvFilter::try_new(&directives).is_ok());
        assert!(directives.contains("bigtwo_core::round=debug"));
    }
}
