//! Live per-port bandwidth counters from the controller's statistics API.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::fetch::{FetchError, JsonSource};
use crate::topology::PortId;

const RX_KEY: &str = "bits-per-second-rx";
const TX_KEY: &str = "bits-per-second-tx";

/// A physical link as seen from one switch: the switch and its local port
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LinkRef {
    /// Switch label in the graph
    pub switch: String,
    /// Controller identifier used in the statistics URL
    pub switch_id: String,
    pub port: PortId,
}

/// One reading of a port's receive and transmit rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandwidthSample {
    pub rx_bits_per_second: u64,
    pub tx_bits_per_second: u64,
}

impl BandwidthSample {
    /// Link cost: how lopsided the port's traffic is
    pub fn asymmetry(&self) -> u64 {
        self.rx_bits_per_second.abs_diff(self.tx_bits_per_second)
    }
}

/// Why a path segment has no measurement
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnmeasuredLink {
    #[error("no switch adjacency from {from} to {to}")]
    NoAdjacency { from: String, to: String },
    #[error("link {from} -> {to} has no recorded port")]
    MissingPort { from: String, to: String },
    #[error("telemetry unavailable: {message}")]
    Unavailable { message: String },
    #[error("telemetry response malformed: {message}")]
    MalformedSample { message: String },
    #[error("telemetry deadline exceeded")]
    DeadlineExceeded,
}

impl From<FetchError> for UnmeasuredLink {
    fn from(err: FetchError) -> Self {
        Self::Unavailable { message: err.to_string() }
    }
}

/// Statistics URL for one switch port
pub fn bandwidth_url(base_url: &str, link: &LinkRef) -> String {
    format!(
        "{}/wm/statistics/bandwidth/{}/{}/json",
        base_url.trim_end_matches('/'),
        link.switch_id,
        link.port
    )
}

fn counter(entry: &Value, key: &str) -> Result<u64, UnmeasuredLink> {
    let malformed = |detail: &str| UnmeasuredLink::MalformedSample {
        message: format!("{} {}", key, detail),
    };

    match entry.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .ok_or_else(|| malformed("is not a non-negative number")),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
                .ok_or_else(|| malformed("is not numeric"))
        }
        Some(_) => Err(malformed("has an unexpected type")),
        None => Err(malformed("is missing")),
    }
}

/// Decode a statistics response: a single object or a one-element array
pub fn parse_sample(response: &Value) -> Result<BandwidthSample, UnmeasuredLink> {
    let entry = match response {
        Value::Array(items) => items.first().ok_or_else(|| UnmeasuredLink::MalformedSample {
            message: "empty statistics array".to_string(),
        })?,
        other => other,
    };

    Ok(BandwidthSample {
        rx_bits_per_second: counter(entry, RX_KEY)?,
        tx_bits_per_second: counter(entry, TX_KEY)?,
    })
}

/// Fetch and decode one link's counters
pub fn measure_link<S: JsonSource + ?Sized>(
    source: &S,
    base_url: &str,
    link: &LinkRef,
) -> Result<BandwidthSample, UnmeasuredLink> {
    let url = bandwidth_url(base_url, link);
    let response = source.fetch_json(&url)?;
    parse_sample(&response)
}

/// Per-link outcome of one collection round
pub type Measurements = HashMap<LinkRef, Result<BandwidthSample, UnmeasuredLink>>;

/// Fetches counters for many links at once, each at most once per call
#[derive(Debug, Clone)]
pub struct TelemetryCollector {
    base_url: String,
    max_workers: usize,
    deadline: Duration,
}

impl TelemetryCollector {
    pub fn new(base_url: impl Into<String>, max_workers: usize, deadline: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            max_workers: max_workers.max(1),
            deadline,
        }
    }

    /// Measure every distinct link in `links` concurrently.
    ///
    /// The pool is sized to the number of distinct links, capped at the
    /// worker limit. A link whose fetch starts or finishes after the
    /// deadline counts as unmeasured. A deadline too large to represent
    /// means no cutoff.
    pub fn collect<S: JsonSource + ?Sized>(
        &self,
        source: &S,
        links: &[LinkRef],
    ) -> Measurements {
        let mut distinct: Vec<&LinkRef> = links.iter().collect();
        distinct.sort();
        distinct.dedup();

        if distinct.is_empty() {
            return Measurements::new();
        }

        let started = Instant::now();
        let cutoff = started.checked_add(self.deadline);
        let expired = |strict: bool| match cutoff {
            Some(cutoff) if strict => Instant::now() > cutoff,
            Some(cutoff) => Instant::now() >= cutoff,
            None => false,
        };
        let measure = |link: &&LinkRef| {
            let link = *link;
            let result = if expired(false) {
                Err(UnmeasuredLink::DeadlineExceeded)
            } else {
                match measure_link(source, &self.base_url, link) {
                    Ok(_) if expired(true) => Err(UnmeasuredLink::DeadlineExceeded),
                    other => other,
                }
            };
            if let Err(e) = &result {
                log::warn!("Link {} port {} unmeasured: {}", link.switch, link.port, e);
            }
            (link.clone(), result)
        };

        let workers = distinct.len().min(self.max_workers);
        let results: Measurements = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| distinct.par_iter().map(measure).collect()),
            Err(e) => {
                log::warn!("Could not start telemetry pool ({}), measuring serially", e);
                distinct.iter().map(measure).collect()
            }
        };

        log::debug!(
            "Measured {} links with {} workers in {:?}",
            distinct.len(),
            workers,
            started.elapsed()
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn link(switch: &str, port: &str) -> LinkRef {
        LinkRef {
            switch: format!("s{}", switch),
            switch_id: switch.to_string(),
            port: PortId::new(port),
        }
    }

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl JsonSource for CountingSource {
        fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.contains("/9/") {
                return Err(FetchError::Connection { url: url.to_string(), reason: "refused".to_string() });
            }
            Ok(json!([{"bits-per-second-rx": "300", "bits-per-second-tx": "100"}]))
        }
    }

    #[test]
    fn test_bandwidth_url() {
        assert_eq!(
            bandwidth_url("http://localhost:8080/", &link("00:00:00:00:00:00:00:01", "2")),
            "http://localhost:8080/wm/statistics/bandwidth/00:00:00:00:00:00:00:01/2/json"
        );
    }

    #[test]
    fn test_parse_sample_shapes() {
        let object = json!({"bits-per-second-rx": 50, "bits-per-second-tx": 80});
        assert_eq!(parse_sample(&object).unwrap().asymmetry(), 30);

        let array = json!([{"bits-per-second-rx": "1200", "bits-per-second-tx": "200"}]);
        let sample = parse_sample(&array).unwrap();
        assert_eq!(sample.rx_bits_per_second, 1200);
        assert_eq!(sample.asymmetry(), 1000);
    }

    #[test]
    fn test_parse_sample_rejects_bad_counters() {
        assert!(parse_sample(&json!([])).is_err());
        assert!(parse_sample(&json!({"bits-per-second-rx": 1})).is_err());
        assert!(parse_sample(&json!({"bits-per-second-rx": "x", "bits-per-second-tx": 1})).is_err());
        assert!(parse_sample(&json!({"bits-per-second-rx": -4, "bits-per-second-tx": 1})).is_err());
    }

    #[test]
    fn test_collect_fetches_each_link_once() {
        let source = CountingSource { calls: AtomicUsize::new(0) };
        let collector = TelemetryCollector::new("http://c", 4, Duration::from_secs(10));
        let links = vec![link("1", "1"), link("2", "3"), link("1", "1"), link("9", "1")];

        let results = collector.collect(&source, &links);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(results.len(), 3);
        assert_eq!(results[&link("1", "1")].as_ref().unwrap().asymmetry(), 200);
        assert!(matches!(
            results[&link("9", "1")],
            Err(UnmeasuredLink::Unavailable { .. })
        ));
    }

    #[test]
    fn test_unrepresentable_deadline_means_no_cutoff() {
        let source = CountingSource { calls: AtomicUsize::new(0) };
        let collector = TelemetryCollector::new("http://c", 2, Duration::MAX);

        let results = collector.collect(&source, &[link("1", "1")]);
        assert_eq!(results[&link("1", "1")].as_ref().unwrap().asymmetry(), 200);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_deadline_marks_everything_unmeasured() {
        let source = CountingSource { calls: AtomicUsize::new(0) };
        let collector = TelemetryCollector::new("http://c", 2, Duration::ZERO);

        let results = collector.collect(&source, &[link("1", "1")]);
        assert_eq!(results[&link("1", "1")], Err(UnmeasuredLink::DeadlineExceeded));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
