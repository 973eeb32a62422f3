use crate::{Role, DEFAULT_HOST, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIME};
use std::num::NonZeroU32;
use std::time::Duration;

/// Settings for a single load test run.
#[derive(Clone, Debug)]
pub struct LoadConfig {
    pub host: String,
    pub users: usize,
    pub spawn_rate: NonZeroU32,
    /// Run until stopped when `None`.
    pub run_time: Option<Duration>,
    pub wait_time: Duration,
    pub poll_interval: Duration,
    pub role: Role,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

impl LoadConfig {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            users: 1,
            spawn_rate: NonZeroU32::MIN,
            run_time: None,
            wait_time: DEFAULT_WAIT_TIME,
            poll_interval: DEFAULT_POLL_INTERVAL,
            role: Role::Coordinator,
        }
    }

    pub fn users(mut self, users: usize) -> Self {
        self.users = users;
        self
    }

    pub fn spawn_rate(mut self, spawn_rate: NonZeroU32) -> Self {
        self.spawn_rate = spawn_rate;
        self
    }

    pub fn run_time(mut self, run_time: Duration) -> Self {
        self.run_time = Some(run_time);
        self
    }

    pub fn wait_time(mut self, wait_time: Duration) -> Self {
        self.wait_time = wait_time;
        self
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}
