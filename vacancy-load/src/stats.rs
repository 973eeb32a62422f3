//! Collection of per-call events into run statistics.
use pdatastructs::tdigest::{TDigest, K1};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use vacancy_load_core::{RequestEvent, RunStatistics, StepStatistics};
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

const TDIGEST_BACKLOG_SIZE: usize = 100;

/// Receiver of timed-call events.
pub trait MetricsSink: Send + Sync {
    fn record(&self, event: RequestEvent);
}

/// Default sink: keeps per-step totals and latency quantiles, and forwards every event to the
/// `metrics` facade when the `metrics` feature is enabled.
#[derive(Debug)]
pub struct StatsAggregator {
    started: Instant,
    entries: Mutex<BTreeMap<&'static str, StepEntry>>,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn snapshot(&self) -> RunStatistics {
        let steps = match self.entries.lock() {
            Ok(entries) => entries
                .iter()
                .map(|(name, entry)| entry.statistics(name))
                .collect(),
            Err(_) => {
                error!("Statistics lock is poisoned.");
                vec![]
            }
        };

        RunStatistics {
            elapsed: self.started.elapsed(),
            steps,
            ..Default::default()
        }
    }
}

impl MetricsSink for StatsAggregator {
    fn record(&self, event: RequestEvent) {
        #[cfg(feature = "metrics")]
        {
            metrics::describe_histogram!(
                "grpc_response_time_ms",
                metrics::Unit::Milliseconds,
                "Response time of each gRPC call"
            );
            metrics::histogram!("grpc_response_time_ms", "name" => event.name)
                .record(event.response_time_ms as f64);
            metrics::counter!("grpc_requests", "name" => event.name).increment(1);
            if !event.is_success() {
                metrics::counter!("grpc_failures", "name" => event.name).increment(1);
            }
        }

        match self.entries.lock() {
            Ok(mut entries) => entries.entry(event.name).or_default().record(event),
            Err(_) => error!("Statistics lock is poisoned; dropping event."),
        }
    }
}

#[derive(Debug)]
struct StepEntry {
    requests: u64,
    failures: u64,
    total_ms: u64,
    min_ms: u64,
    max_ms: u64,
    latency: TDigest<K1>,
    errors: BTreeMap<String, u64>,
}

impl Default for StepEntry {
    fn default() -> Self {
        Self {
            requests: 0,
            failures: 0,
            total_ms: 0,
            min_ms: u64::MAX,
            max_ms: 0,
            latency: default_tdigest(),
            errors: BTreeMap::new(),
        }
    }
}

impl StepEntry {
    fn record(&mut self, event: RequestEvent) {
        let ms = event.response_time_ms;
        self.requests += 1;
        self.total_ms += ms;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);
        self.latency.insert(ms as f64);

        if let Some(exception) = event.exception {
            self.failures += 1;
            *self.errors.entry(exception).or_default() += 1;
        }
    }

    fn quantile(&self, q: f64) -> Duration {
        let ms = self.latency.quantile(q);
        // TDigest may return NaN for sparse input.
        if ms.is_finite() {
            Duration::from_secs_f64(ms.max(0.) / 1000.)
        } else {
            Duration::ZERO
        }
    }

    fn statistics(&self, name: &'static str) -> StepStatistics {
        let avg_ms = self.total_ms.checked_div(self.requests).unwrap_or(0);
        StepStatistics {
            name,
            requests: self.requests,
            failures: self.failures,
            min_response_time: Duration::from_millis(if self.requests == 0 {
                0
            } else {
                self.min_ms
            }),
            max_response_time: Duration::from_millis(self.max_ms),
            avg_response_time: Duration::from_millis(avg_ms),
            latency_p50: self.quantile(0.5),
            latency_p90: self.quantile(0.9),
            latency_p99: self.quantile(0.99),
            errors: self.errors.clone(),
        }
    }
}

fn default_tdigest() -> TDigest<K1> {
    TDigest::new(K1::new(10.), TDIGEST_BACKLOG_SIZE)
}
