//! Command line runtime
//!
//! Parses the command line, sets up the Prometheus exporter and the periodic statistics log,
//! runs the session driver and terminates the process on Ctrl-C or SIGTERM.
use crate::error::RuntimeError;
use crate::reporter::stats_reporter;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::future::Future;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
#[allow(unused)]
use tracing::{debug, error, info, instrument, warn, Instrument};
use vacancy_load::prelude::*;
use vacancy_load_core::{default_credentials, DEFAULT_HOST};

const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(version, about = "Load test for the auth + vacancy gRPC service")]
struct LoadCli {
    /// Target service as ADDRESS:PORT
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Number of concurrent users
    #[arg(short, long, default_value_t = 1)]
    users: usize,

    /// Users started per second
    #[arg(short = 'r', long, default_value_t = NonZeroU32::MIN)]
    spawn_rate: NonZeroU32,

    /// Stop after this long, e.g. `90s` or `5m`. Runs until interrupted if omitted.
    #[arg(short = 't', long, value_parser = humantime::parse_duration)]
    run_time: Option<Duration>,

    /// Run as a worker process (no background poller)
    #[arg(long)]
    worker: bool,

    /// Login for one user; repeat for more. Replaces the built-in accounts.
    #[arg(short, long = "credential", value_name = "EMAIL:PASSWORD")]
    credentials: Vec<Credential>,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    metrics_addr: Option<SocketAddr>,

    /// How often to log running statistics; `0s` disables it
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    stats_interval: Duration,
}

/// Command line load test runtime.
///
/// # Example
///
/// ```no_run
/// use vacancy_load_runtime::LoadRuntime;
///
/// #[tokio::main]
/// async fn main() {
///     LoadRuntime::new()
///         .with_args()
///         .run()
///         .await
///         .unwrap();
/// }
/// ```
pub struct LoadRuntime {
    config: LoadConfig,
    credentials: Vec<Credential>,
    metrics_addr: Option<SocketAddr>,
    stats_interval: Duration,
}

impl Default for LoadRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadRuntime {
    pub fn new() -> Self {
        LoadRuntime {
            config: LoadConfig::default(),
            credentials: default_credentials(),
            metrics_addr: None,
            stats_interval: DEFAULT_STATS_INTERVAL,
        }
    }

    /// Read settings from the command line.
    ///
    /// ```text
    /// $ vacancy-load -H 127.0.0.1:7823 -u 3 -r 1 -t 5m
    /// $ vacancy-load --worker -c zeus@example.com:zeuspass01!
    /// ```
    pub fn with_args(self) -> Self {
        self.apply(LoadCli::parse())
    }

    fn apply(mut self, args: LoadCli) -> Self {
        self.config.host = args.host;
        self.config.users = args.users;
        self.config.spawn_rate = args.spawn_rate;
        self.config.run_time = args.run_time;
        self.config.role = if args.worker {
            Role::Worker
        } else {
            Role::Coordinator
        };

        if !args.credentials.is_empty() {
            self.credentials = args.credentials;
        }
        self.metrics_addr = args.metrics_addr;
        self.stats_interval = args.stats_interval;
        self
    }

    pub fn config(mut self, config: LoadConfig) -> Self {
        self.config = config;
        self
    }

    pub fn credentials(mut self, credentials: Vec<Credential>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn metrics_addr(mut self, addr: SocketAddr) -> Self {
        self.metrics_addr = Some(addr);
        self
    }

    pub fn stats_interval(mut self, interval: Duration) -> Self {
        self.stats_interval = interval;
        self
    }

    #[instrument(name = "vacancy_load", skip_all, fields(role = ?self.config.role))]
    pub async fn run(self) -> Result<RunStatistics, RuntimeError> {
        if let Some(addr) = self.metrics_addr {
            PrometheusBuilder::new()
                .with_http_listener(addr)
                .install()?;
            info!("Serving metrics on {addr}");
        }

        if self.credentials.len() < self.config.users {
            warn!(
                "{} users but only {} credentials; the rest will not start.",
                self.config.users,
                self.credentials.len()
            );
        }

        let termination = termination()?;
        let api = GrpcVacancyApi::new(&self.config.host)?;
        let pool = Arc::new(CredentialPool::new(self.credentials));
        let driver = SessionDriver::new(api, self.config).pool(pool);
        let reporter = tokio::spawn(
            stats_reporter(driver.stats(), self.stats_interval).in_current_span(),
        );

        let stats = tokio::select! {
            stats = driver.run() => stats,
            signal = termination => {
                error!("Received {signal} signal. Terminating load test.");
                std::process::exit(0);
            }
        };
        reporter.abort();

        info!("Final statistics:\n{stats}");
        Ok(stats)
    }
}

/// Resolves with the name of the first interrupt or terminate signal. Listening starts when this
/// is called, not when the future is first polled.
#[cfg(unix)]
fn termination() -> std::io::Result<impl Future<Output = &'static str>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            Ok(()) = tokio::signal::ctrl_c() => "interrupt",
            _ = terminate.recv() => "terminate",
        }
    })
}

#[cfg(not(unix))]
fn termination() -> std::io::Result<impl Future<Output = &'static str>> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "interrupt",
            Err(_) => std::future::pending().await,
        }
    })
}
