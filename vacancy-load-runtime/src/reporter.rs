use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vacancy_load::stats::StatsAggregator;

/// Log the running totals every `interval`. A zero interval disables reporting.
pub async fn stats_reporter(stats: Arc<StatsAggregator>, interval: Duration) {
    if interval.is_zero() {
        return;
    }

    loop {
        tokio::time::sleep(interval).await;
        let stats = stats.snapshot();
        info!(
            "Current statistics: {} requests, {} failures",
            stats.total_requests(),
            stats.total_failures()
        );
        for step in &stats.steps {
            info!(
                "{} reqs={} fails={} avg={}ms p90={}ms",
                step.name,
                step.requests,
                step.failures,
                step.avg_response_time.as_millis(),
                step.latency_p90.as_millis(),
            );
        }
    }
}
