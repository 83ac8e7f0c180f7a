//! Test support: an in-process `metrics::Recorder` so tests can assert on
//! counter increments and timing samples without any exporter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use metrics::{
    Counter, CounterFn, Gauge, Histogram, HistogramFn, Key, KeyName, Metadata, Recorder,
    SharedString, Unit,
};

#[derive(Clone, Default)]
pub(crate) struct TestRecorder {
    counters: Arc<Mutex<HashMap<String, u64>>>,
    histograms: Arc<Mutex<HashMap<String, Vec<f64>>>>,
    labels: Arc<Mutex<HashMap<String, Vec<(String, String)>>>>,
}

impl TestRecorder {
    pub fn counter(&self, name: &str) -> u64 {
        self.counters
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn samples(&self, name: &str) -> usize {
        self.histograms
            .lock()
            .unwrap()
            .get(name)
            .map(|samples| samples.len())
            .unwrap_or(0)
    }

    pub fn labels(&self, name: &str) -> Vec<(String, String)> {
        self.labels
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.lock().unwrap().is_empty() && self.histograms.lock().unwrap().is_empty()
    }

    fn remember_labels(&self, key: &Key) {
        self.labels.lock().unwrap().insert(
            key.name().to_string(),
            key.labels()
                .map(|label| (label.key().to_string(), label.value().to_string()))
                .collect(),
        );
    }
}

struct TestCounter {
    name: String,
    counters: Arc<Mutex<HashMap<String, u64>>>,
}

impl CounterFn for TestCounter {
    fn increment(&self, value: u64) {
        *self
            .counters
            .lock()
            .unwrap()
            .entry(self.name.clone())
            .or_insert(0) += value;
    }

    fn absolute(&self, value: u64) {
        self.counters
            .lock()
            .unwrap()
            .insert(self.name.clone(), value);
    }
}

struct TestHistogram {
    name: String,
    histograms: Arc<Mutex<HashMap<String, Vec<f64>>>>,
}

impl HistogramFn for TestHistogram {
    fn record(&self, value: f64) {
        self.histograms
            .lock()
            .unwrap()
            .entry(self.name.clone())
            .or_default()
            .push(value);
    }
}

impl Recorder for TestRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        self.remember_labels(key);
        Counter::from_arc(Arc::new(TestCounter {
            name: key.name().to_string(),
            counters: self.counters.clone(),
        }))
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        self.remember_labels(key);
        Histogram::from_arc(Arc::new(TestHistogram {
            name: key.name().to_string(),
            histograms: self.histograms.clone(),
        }))
    }
}
