//! Tracing subscriber setup.
//!
//! Log lines go to stdout, one line per event, as text or JSON. The level
//! filter sits behind a reload layer so SIGHUP can change it without a
//! restart.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

use crate::config::runtime::{LogConfig, LogFormat};

/// Handle for swapping the active level filter.
pub type LogReloadHandle = reload::Handle<EnvFilter, Registry>;

/// Initialize the global tracing subscriber from `config`.
pub fn init_tracing(config: &LogConfig) -> LogReloadHandle {
    let (filter, handle) = reload::Layer::new(build_filter(config));

    tracing_subscriber::registry()
        .with(filter)
        .with(format_layer(config.format, std::io::stdout))
        .init();

    handle
}

/// Build the level filter. `RUST_LOG` wins over the configured filter.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter))
}

/// Swap in the filter from a reloaded configuration.
///
/// Logs the filter that is actually in effect, which is `RUST_LOG` when set.
pub fn reload_filter(handle: &LogReloadHandle, config: &LogConfig) {
    let filter = build_filter(config);
    let active = filter.to_string();
    match handle.reload(filter) {
        Ok(()) => tracing::info!(filter = %active, "log filter reloaded"),
        Err(e) => tracing::error!("Failed to reload log filter: {}", e),
    }
}

/// The formatting layer for `format`, writing to `writer`.
pub fn format_layer<S, W>(format: LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(writer)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twbind_core::test_support::CapturedLogs;
    use twbind_sdk::BindingEvent;

    #[test]
    fn test_json_format_keeps_event_fields() {
        let logs = CapturedLogs::default();
        let subscriber =
            tracing_subscriber::registry().with(format_layer(LogFormat::Json, logs.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("binding", binding = "tweets");
            let _entered = span.enter();
            twbind_core::tweets::log_tweet(
                &BindingEvent::new(Default::default(), "hello\nworld").with_metadata("lang", "en"),
            );
        });

        let lines = logs.lines();
        assert_eq!(lines.len(), 1);
        let line: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["fields"]["message"], "tweet received");
        assert_eq!(line["fields"]["metadata"], r#"{"lang": "en"}"#);
        assert_eq!(line["fields"]["data"], r#""hello\nworld""#);
        assert_eq!(line["span"]["binding"], "tweets");
    }

    #[test]
    fn test_text_format_is_single_line() {
        let logs = CapturedLogs::default();
        let subscriber =
            tracing_subscriber::registry().with(format_layer(LogFormat::Text, logs.clone()));

        tracing::subscriber::with_default(subscriber, || {
            twbind_core::tweets::log_tweet(&BindingEvent::new(Default::default(), "a\nb"));
        });

        let lines = logs.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("tweet received"));
    }

    #[test]
    fn test_reload_swaps_active_filter() {
        let (layer, handle) = reload::Layer::new(EnvFilter::new("warn"));
        let _reloadable = tracing_subscriber::registry().with(layer);
        let logs = CapturedLogs::default();
        let config = LogConfig {
            filter: "twbind_server=debug".to_string(),
            format: LogFormat::Text,
        };

        tracing::subscriber::with_default(logs.subscriber(), || {
            reload_filter(&handle, &config);
        });

        let active = handle.with_current(|filter| filter.to_string()).unwrap();
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(active, "twbind_server=debug");
        }
        let lines = logs.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("log filter reloaded"));
        assert!(lines[0].contains(&format!("filter={active}")));
    }

    #[test]
    fn test_reload_after_subscriber_dropped_is_logged() {
        let (layer, handle) = reload::Layer::<EnvFilter, Registry>::new(EnvFilter::new("warn"));
        drop(layer);
        let logs = CapturedLogs::default();

        tracing::subscriber::with_default(logs.subscriber(), || {
            reload_filter(&handle, &LogConfig::default());
        });

        let lines = logs.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ERROR"));
        assert!(lines[0].contains("Failed to reload log filter"));
    }

    #[test]
    fn test_configured_filter_is_used() {
        let config = LogConfig {
            filter: "warn".to_string(),
            format: LogFormat::Text,
        };
        // RUST_LOG may be set by whoever runs the tests.
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(build_filter(&config).to_string(), "warn");
        }
    }
}
