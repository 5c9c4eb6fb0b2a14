//! The delta sink — where streamed text fragments go as they arrive.
//!
//! The stream decoder forwards each content delta to a sink
//! synchronously, in arrival order, so partial output is visible before
//! the stream completes. Keeping presentation behind this trait keeps
//! the protocol state machine free of any terminal concerns.

/// An observer of the delta sequence produced by one streaming response.
pub trait DeltaSink: Send {
    /// Called once per non-empty content delta, in arrival order.
    fn on_delta(&mut self, delta: &str);
}

/// A sink that collects deltas into a vector. Useful for tests and for
/// callers that want the fragments without terminal echo.
#[derive(Debug, Default)]
pub struct CollectingSink {
    /// Every delta received, in order.
    pub deltas: Vec<String>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeltaSink for CollectingSink {
    fn on_delta(&mut self, delta: &str) {
        self.deltas.push(delta.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_preserves_order() {
        let mut sink = CollectingSink::new();
        sink.on_delta("Hi");
        sink.on_delta(" there");
        assert_eq!(sink.deltas, ["Hi", " there"]);
    }
}
