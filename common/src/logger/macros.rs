use super::TraceId;
use tracing::{Level, Span};

/// Create a root span for one replay run.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::span!(
        Level::INFO,
        "run",
        name = %name,
        trace_id = %trace_id.as_str()
    )
}

/// Create a child span (inherits trace_id automatically)
pub fn child_span(name: &'static str) -> Span {
    tracing::span!(Level::INFO, "step", name = %name)
}
