// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::dispatcher::DefaultGuard;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt};

use super::{DisplayPreference, LoggingConfig};

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// This erases the concrete type of the writer, and returns a boxed layer, filtered to
/// the configured level.
#[must_use]
pub fn create_display_layer<S>(config: LoggingConfig) -> Box<DynLayer<S>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let level_filter = config.get_level_filter();
    match config.display_preference {
        DisplayPreference::Stdout => Box::new(
            fmt_layer
                .with_writer(std::io::stdout)
                .with_filter(level_filter),
        ),
        DisplayPreference::Stderr => Box::new(
            fmt_layer
                .with_writer(std::io::stderr)
                .with_filter(level_filter),
        ),
    }
}

/// Install the display layer as the global default subscriber.
///
/// Returns `false` if a global subscriber was already installed (by this function or by
/// the host). The host's subscriber stays in place.
pub fn try_initialize_logging_global(config: LoggingConfig) -> bool {
    tracing_subscriber::registry()
        .with(create_display_layer(config))
        .try_init()
        .is_ok()
}

/// Install the display layer for the current thread only, until the returned guard is
/// dropped. Useful in tests.
#[must_use]
pub fn install_logging_thread_local(config: LoggingConfig) -> DefaultGuard {
    tracing_subscriber::registry()
        .with(create_display_layer(config))
        .set_default()
}
