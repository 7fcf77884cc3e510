//! File logging. The terminal belongs to the game, so events only go to a file.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter directive that overrides `--log-level`.
pub const LOG_ENV: &str = "SWEEPTUI_LOG";

/// Install a subscriber writing plain text to `path`. Without a path nothing is
/// installed and events are dropped.
pub fn init(path: Option<&Path>, level: &str) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(level)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install logger: {e}"))?;

    install_panic_hook();
    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}

fn filter(level: &str) -> Result<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.is_empty() => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid {LOG_ENV} directive")),
        _ => EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}")),
    }
}

/// Record panics in the log before the default hook prints them.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(%info, "panic");
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_path_is_a_no_op() {
        assert!(init(None, "info").is_ok());
    }

    #[test]
    fn test_level_parsing() {
        assert!(EnvFilter::try_new("debug").is_ok());
        assert!(EnvFilter::try_new("sweeptui=trace,warn").is_ok());
    }

    #[test]
    fn test_unwritable_path_errors() {
        let err = init(Some(Path::new("/nonexistent-dir/sweeptui.log")), "info").unwrap_err();
        assert!(err.to_string().contains("cannot create log file"));
    }
}
