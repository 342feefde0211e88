use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr.
///
/// Stdout stays free for the JSON printed by `simulate`. The level applies to
/// this server, the core library and request tracing; `RUST_LOG` replaces the
/// whole filter when set.
pub fn init_logging(level: &str) -> color_eyre::Result<()> {
    let default_filter = format!("etfcast={level},etfcast_core={level},tower_http={level}");
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&default_filter))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()?;

    tracing::debug!("etfcast logging initialized (filter={default_filter})");
    Ok(())
}
