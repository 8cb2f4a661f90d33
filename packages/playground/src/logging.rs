use std::env;

use tracing_subscriber::{prelude::*, EnvFilter};

const LOG_ENV: &str = "WAYPOINT_LOG";

/// Build tracing infrastructure.
///
/// The filter comes from `--log`, then the `WAYPOINT_LOG` env var, and only shows warnings
/// otherwise. Logs go to stderr so they never mix with rendered pages.
pub fn initialize(directives: Option<&str>) -> anyhow::Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)?,
        None if env::var(LOG_ENV).is_ok() => EnvFilter::try_from_env(LOG_ENV)?,
        None => EnvFilter::new("warn"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
