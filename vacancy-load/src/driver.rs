//! Spawning and pacing of simulated users.
use crate::api::VacancyApi;
use crate::context::RunContext;
use crate::journey::Journey;
use crate::poller::spawn_background_poller;
use crate::pool::CredentialPool;
use crate::stats::{MetricsSink, StatsAggregator};
use governor::{Quota, RateLimiter};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};
use vacancy_load_core::{LoadConfig, PassOutcome, RequestEvent, RunState, RunStatistics};

/// Runs one journey per simulated user until the run time elapses or the run is stopped.
///
/// # Example
/// ```no_run
/// use vacancy_load::prelude::*;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let config = LoadConfig::new("127.0.0.1:7823")
///         .users(3)
///         .run_time(Duration::from_secs(60));
///     let api = GrpcVacancyApi::new(&config.host).unwrap();
///
///     let stats = SessionDriver::new(api, config).run().await;
///     println!("{stats}");
/// }
/// ```
pub struct SessionDriver<A> {
    api: A,
    config: LoadConfig,
    pool: Arc<CredentialPool>,
    ctx: RunContext,
    stats: Arc<StatsAggregator>,
    sink: Arc<dyn MetricsSink>,
}

impl<A> SessionDriver<A>
where
    A: VacancyApi + Clone + Send + Sync + 'static,
{
    pub fn new(api: A, config: LoadConfig) -> Self {
        let stats = Arc::new(StatsAggregator::new());
        Self {
            api,
            ctx: RunContext::new(config.role),
            config,
            pool: Arc::new(CredentialPool::default()),
            sink: stats.clone(),
            stats,
        }
    }

    pub fn pool(mut self, pool: Arc<CredentialPool>) -> Self {
        self.pool = pool;
        self
    }

    /// Share run state with the caller, e.g. to stop the run from outside.
    pub fn context(mut self, ctx: RunContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Also deliver every event to `sink`, next to the built-in statistics.
    pub fn sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.sink = Arc::new(Tee {
            first: self.stats.clone(),
            second: sink,
        });
        self
    }

    pub fn stats(&self) -> Arc<StatsAggregator> {
        self.stats.clone()
    }

    #[instrument(name = "load_test", skip_all, fields(host = %self.config.host))]
    pub async fn run(self) -> RunStatistics {
        info!(
            "Running {} users at {}/s for {}",
            self.config.users,
            self.config.spawn_rate,
            self.config
                .run_time
                .map(|d| humantime::format_duration(d).to_string())
                .unwrap_or_else(|| "ever".to_string()),
        );

        let ctx = self.ctx.clone();
        ctx.set_run_state(RunState::Spawning);
        let poller = spawn_background_poller(ctx.clone(), self.config.poll_interval);

        let mut roster = Roster::default();
        let deadline = self.deadline();
        tokio::pin!(deadline);

        let ended_while_spawning = tokio::select! {
            _ = self.spawn_users(&mut roster) => false,
            _ = &mut deadline => true,
        };

        if !ended_while_spawning {
            ctx.set_run_state(RunState::Running);
            info!(
                "All users spawned: {} running, {} failed",
                roster.started, roster.failed
            );
            deadline.await;
        }

        ctx.stop();
        info!("Stopping {} users", roster.tasks.len());
        roster.tasks.abort_all();
        while roster.tasks.join_next().await.is_some() {}
        ctx.set_run_state(RunState::Stopped);

        if let Some(poller) = poller {
            poller.abort();
        }
        ctx.set_run_state(RunState::Cleanup);

        let mut stats = self.stats.snapshot();
        stats.users = roster.started;
        stats.failed_users = roster.failed;
        info!("Load test complete");
        stats
    }

    async fn spawn_users(&self, roster: &mut Roster) {
        let limiter = RateLimiter::direct(Quota::per_second(self.config.spawn_rate));

        for id in 0..self.config.users {
            limiter.until_ready().await;

            match Journey::start(self.api.clone(), &self.pool, self.sink.clone()) {
                Ok(journey) => {
                    roster.started += 1;
                    roster.tasks.spawn(
                        user_loop(journey, self.config.wait_time)
                            .instrument(tracing::info_span!("user", id)),
                    );
                }
                Err(error) => {
                    roster.failed += 1;
                    warn!("User {id} could not start: {error}");
                }
            }
        }
    }

    async fn deadline(&self) {
        match self.config.run_time {
            Some(run_time) => tokio::select! {
                _ = tokio::time::sleep(run_time) => {
                    info!("Run time of {} elapsed", humantime::format_duration(run_time));
                }
                _ = self.ctx.stopped() => info!("Stop requested"),
            },
            None => self.ctx.stopped().await,
        }
    }
}

async fn user_loop<A: VacancyApi>(mut journey: Journey<A>, wait_time: Duration) {
    debug!("Claimed credential {}", journey.session().credential().email);
    loop {
        if let PassOutcome::Interrupted(step) = journey.run_pass().await {
            trace!("Pass cut short at {step}");
        }
        tokio::time::sleep(wait_time).await;
    }
}

#[derive(Default)]
struct Roster {
    tasks: JoinSet<()>,
    started: usize,
    failed: usize,
}

struct Tee {
    first: Arc<StatsAggregator>,
    second: Arc<dyn MetricsSink>,
}

impl MetricsSink for Tee {
    fn record(&self, event: RequestEvent) {
        self.first.record(event.clone());
        self.second.record(event);
    }
}
