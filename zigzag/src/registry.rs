use std::sync::Arc;

use tracing::warn;

use crate::detector::{BarOutcome, ZigZag};
use crate::error::ZigZagError;
use crate::event::SwingEvent;
use crate::types::Bar;

/// A thread-safe callback that receives every swing event.
pub type SwingHandler = Arc<dyn Fn(&SwingEvent) + Send + Sync + 'static>;

type PanicHook = Arc<dyn Fn(&SwingEvent) + Send + Sync + 'static>;

/// Owns a detector and fans its events out to subscribers.
///
/// Design:
/// - The detector is trusted: if it panics, the panic propagates.
/// - Handlers are untrusted: each call runs inside `catch_unwind`, so one bad
///   handler does not prevent the others from seeing the event.
pub struct SwingRegistry {
    detector: ZigZag,
    handlers: Vec<SwingHandler>,
    on_handler_panic: Option<PanicHook>,
}

impl SwingRegistry {
    pub fn new(detector: ZigZag) -> Self {
        Self {
            detector,
            handlers: Vec::new(),
            on_handler_panic: None,
        }
    }

    /// Attach a callback to be invoked whenever a handler panics.
    pub fn with_panic_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(&SwingEvent) + Send + Sync + 'static,
    {
        self.on_handler_panic = Some(Arc::new(f));
        self
    }

    /// Handlers are called in registration order.
    pub fn register_handler(&mut self, handler: SwingHandler) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn detector(&self) -> &ZigZag {
        &self.detector
    }

    pub fn reset(&mut self) {
        self.detector.reset();
    }

    /// Run one bar through the detector and notify all handlers of each event.
    /// A rejected bar notifies nobody.
    pub fn process_bar(&mut self, bar: Bar) -> Result<BarOutcome, ZigZagError> {
        let report = self.detector.on_bar(bar)?;

        for event in &report.events {
            for handler in &self.handlers {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    handler(event);
                }));

                if result.is_err() {
                    warn!(target: "zigzag", id = %event.label_id(), "swing handler panicked");
                    if let Some(ref hook) = self.on_handler_panic {
                        hook(event);
                    }
                }
            }
        }

        Ok(report.outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::config::DetectorConfig;

    fn registry() -> SwingRegistry {
        SwingRegistry::new(ZigZag::new(DetectorConfig::default()).unwrap())
    }

    fn recorder() -> (SwingHandler, Arc<Mutex<Vec<SwingEvent>>>) {
        let seen = Arc::new(Mutex::new(vec![]));
        let seen_clone = seen.clone();
        let handler: SwingHandler = Arc::new(move |e: &SwingEvent| {
            seen_clone.lock().unwrap().push(*e);
        });
        (handler, seen)
    }

    #[test]
    fn handlers_receive_events_in_order() {
        let mut reg = registry();
        let (handler, seen) = recorder();
        reg.register_handler(handler);

        reg.process_bar(Bar::new(1, 100.0, 95.0)).unwrap();
        reg.process_bar(Bar::new(2, 105.0, 100.0)).unwrap();
        // Higher high: retract 105, confirm 108.
        reg.process_bar(Bar::new(3, 108.0, 104.0)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(matches!(seen[0], SwingEvent::Confirmed(c) if c.point.price == 105.0));
        assert!(matches!(seen[1], SwingEvent::Retracted(p) if p.index == 2));
        assert!(matches!(seen[2], SwingEvent::Confirmed(c) if c.point.price == 108.0));
    }

    #[test]
    fn multiple_handlers_receive_same_event() {
        let mut reg = registry();
        let (h1, s1) = recorder();
        let (h2, s2) = recorder();
        reg.register_handler(h1);
        reg.register_handler(h2);

        reg.process_bar(Bar::new(1, 100.0, 95.0)).unwrap();
        reg.process_bar(Bar::new(2, 105.0, 100.0)).unwrap();

        assert_eq!(reg.handler_count(), 2);
        assert_eq!(*s1.lock().unwrap(), *s2.lock().unwrap());
        assert_eq!(s1.lock().unwrap().len(), 1);
    }

    #[test]
    fn rejected_bar_notifies_nobody() {
        let mut reg = registry();
        let (handler, seen) = recorder();
        reg.register_handler(handler);

        reg.process_bar(Bar::new(5, 100.0, 95.0)).unwrap();
        let err = reg.process_bar(Bar::new(5, 200.0, 90.0));

        assert!(err.is_err());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn handler_panics_do_not_stop_other_handlers() {
        let panics = Arc::new(Mutex::new(0));
        let panics_clone = panics.clone();

        let mut reg = registry().with_panic_hook(move |_| {
            *panics_clone.lock().unwrap() += 1;
        });

        reg.register_handler(Arc::new(|_| panic!("boom")));
        let (handler, seen) = recorder();
        reg.register_handler(handler);

        reg.process_bar(Bar::new(1, 100.0, 95.0)).unwrap();
        reg.process_bar(Bar::new(2, 105.0, 100.0)).unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(*panics.lock().unwrap(), 1);
    }

    #[test]
    fn reset_forwards_to_detector() {
        let mut reg = registry();
        reg.process_bar(Bar::new(1, 100.0, 95.0)).unwrap();

        reg.reset();

        assert!(reg.detector().history().is_empty());
        assert!(reg.process_bar(Bar::new(1, 100.0, 95.0)).is_ok());
    }
}
