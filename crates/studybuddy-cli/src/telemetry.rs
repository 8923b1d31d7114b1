use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `STUDYBUDDY_LOG` wins over the
/// configured level; an unparsable directive falls back to "warn".
pub fn init_tracing(default_level: &str) {
    let env_filter = EnvFilter::try_from_env("STUDYBUDDY_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
