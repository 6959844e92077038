use once_cell::sync::OnceCell;
use tracing::{Span, field};
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Install the global tracing subscriber once. Safe to call from every
/// binary and test entry point; later calls are no-ops.
pub fn init_logger(service_name: &'static str) {
    LOGGER_INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .init();

        tracing::info!(service = service_name, "logger initialized");
    });
}

/// Correlation ID that follows one capture replay end to end.
#[derive(Clone, Debug)]
pub struct TraceId(String);

impl TraceId {
    pub fn new(v: impl Into<String>) -> Self {
        Self(v.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self(Uuid::new_v4().as_hyphenated().to_string())
    }
}

/// Root span for one replay / feed session.
pub fn feed_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "feed",
        name = %name,
        trace_id = %trace_id.as_str(),
        instrument = field::Empty
    )
}

/// Record the instrument (pair address) on the current span once known.
pub fn annotate_instrument(pair_address: &str) {
    Span::current().record("instrument", field::display(pair_address));
}
