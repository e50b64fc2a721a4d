// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::{
    engine::{cluster::ClusterPassSummary, stats::SolveStats},
    state::cost::Cost,
};

/// Snapshot handed to observers every `progress_every` iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    pub iteration: u64,
    pub temperature: f64,
    pub current: Cost,
    pub best: Cost,
}

/// Observer for search lifecycle events.
/// All methods have default no-op implementations; observers never
/// influence the search.
pub trait SearchObserver: Send {
    /// A short identifier for logging and diagnostics.
    fn name(&self) -> &str {
        "SearchObserver"
    }

    fn on_search_start(&mut self, _initial: Cost, _lower_bound: usize) {}
    fn on_progress(&mut self, _event: &ProgressEvent) {}
    fn on_new_best(&mut self, _iteration: u64, _best: Cost) {}
    fn on_cluster_pass(&mut self, _summary: &ClusterPassSummary) {}
    fn on_search_end(&mut self, _stats: &SolveStats) {}
}

/// A no-op observer useful as default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SearchObserver for NullObserver {
    fn name(&self) -> &str {
        "NullObserver"
    }
}

/// Forwards events to a list of boxed observers, in insertion order.
#[derive(Default)]
pub struct CompositeSearchObserver {
    observers: Vec<Box<dyn SearchObserver + Send>>,
}

impl CompositeSearchObserver {
    #[inline]
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Chain-builder: add an observer and return self.
    #[inline]
    pub fn with<O: SearchObserver + Send + 'static>(mut self, o: O) -> Self {
        self.observers.push(Box::new(o));
        self
    }

    #[inline]
    pub fn push<O: SearchObserver + Send + 'static>(&mut self, o: O) {
        self.observers.push(Box::new(o));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl SearchObserver for CompositeSearchObserver {
    fn name(&self) -> &str {
        "CompositeSearchObserver"
    }

    fn on_search_start(&mut self, initial: Cost, lower_bound: usize) {
        for o in &mut self.observers {
            o.on_search_start(initial, lower_bound);
        }
    }

    fn on_progress(&mut self, event: &ProgressEvent) {
        for o in &mut self.observers {
            o.on_progress(event);
        }
    }

    fn on_new_best(&mut self, iteration: u64, best: Cost) {
        for o in &mut self.observers {
            o.on_new_best(iteration, best);
        }
    }

    fn on_cluster_pass(&mut self, summary: &ClusterPassSummary) {
        for o in &mut self.observers {
            o.on_cluster_pass(summary);
        }
    }

    fn on_search_end(&mut self, stats: &SolveStats) {
        for o in &mut self.observers {
            o.on_search_end(stats);
        }
    }
}

/// Emits progress and cluster passes as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn name(&self) -> &str {
        "TracingObserver"
    }

    fn on_search_start(&mut self, initial: Cost, lower_bound: usize) {
        tracing::info!(
            patterns = initial.patterns,
            weight = initial.weight,
            lower_bound,
            "search started"
        );
    }

    fn on_progress(&mut self, e: &ProgressEvent) {
        tracing::info!(
            iteration = e.iteration,
            temperature = e.temperature,
            current = e.current.patterns,
            best = e.best.patterns,
            "progress"
        );
    }

    fn on_cluster_pass(&mut self, s: &ClusterPassSummary) {
        tracing::info!(
            pass = s.pass,
            iteration = s.iteration,
            clusters = s.clusters,
            improved = s.improved,
            before = s.before.patterns,
            after = s.after.patterns,
            "cluster pass"
        );
    }

    fn on_search_end(&mut self, stats: &SolveStats) {
        tracing::info!(%stats, "search finished");
    }
}

#[cfg(test)]
mod static_assertions {
    use super::*;
    use ::static_assertions::assert_obj_safe;

    assert_obj_safe!(SearchObserver);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl SearchObserver for Recorder {
        fn on_search_start(&mut self, initial: Cost, lower_bound: usize) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:start:{}:{}", self.tag, initial.patterns, lower_bound));
        }

        fn on_new_best(&mut self, iteration: u64, best: Cost) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:best:{}:{}", self.tag, iteration, best.patterns));
        }
    }

    #[test]
    fn test_composite_forwards_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut composite = CompositeSearchObserver::new()
            .with(Recorder {
                tag: "a",
                log: log.clone(),
            })
            .with(NullObserver);
        composite.push(Recorder {
            tag: "b",
            log: log.clone(),
        });
        assert_eq!(composite.len(), 3);
        assert!(!composite.is_empty());

        composite.on_search_start(Cost::new(5, 10), 2);
        composite.on_new_best(7, Cost::new(4, 8));
        composite.on_progress(&ProgressEvent {
            iteration: 7,
            temperature: 1.0,
            current: Cost::new(4, 8),
            best: Cost::new(4, 8),
        });

        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:start:5:2", "b:start:5:2", "a:best:7:4", "b:best:7:4"]
        );
    }

    #[test]
    fn test_default_names() {
        assert_eq!(NullObserver.name(), "NullObserver");
        assert_eq!(TracingObserver.name(), "TracingObserver");
        assert_eq!(CompositeSearchObserver::new().name(), "CompositeSearchObserver");
    }
}
