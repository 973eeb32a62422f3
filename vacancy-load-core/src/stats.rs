use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Aggregated results for one step name.
#[derive(Debug, Clone, PartialEq)]
pub struct StepStatistics {
    pub name: &'static str,
    pub requests: u64,
    pub failures: u64,
    pub min_response_time: Duration,
    pub max_response_time: Duration,
    pub avg_response_time: Duration,
    pub latency_p50: Duration,
    pub latency_p90: Duration,
    pub latency_p99: Duration,
    /// Failure count keyed by error message.
    pub errors: BTreeMap<String, u64>,
}

impl StepStatistics {
    pub fn error_rate(&self) -> f64 {
        if self.requests == 0 {
            0.
        } else {
            self.failures as f64 / self.requests as f64
        }
    }
}

/// Statistics for a whole run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    pub users: usize,
    pub failed_users: usize,
    pub elapsed: Duration,
    pub steps: Vec<StepStatistics>,
}

impl RunStatistics {
    pub fn step(&self, name: &str) -> Option<&StepStatistics> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn total_requests(&self) -> u64 {
        self.steps.iter().map(|s| s.requests).sum()
    }

    pub fn total_failures(&self) -> u64 {
        self.steps.iter().map(|s| s.failures).sum()
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "users={} failed_users={} elapsed={:.1}s",
            self.users,
            self.failed_users,
            self.elapsed.as_secs_f64()
        )?;
        writeln!(
            f,
            "{:<16} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "Name", "# reqs", "# fails", "avg", "min", "max", "p90"
        )?;
        for step in &self.steps {
            writeln!(
                f,
                "{:<16} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
                step.name,
                step.requests,
                step.failures,
                step.avg_response_time.as_millis(),
                step.min_response_time.as_millis(),
                step.max_response_time.as_millis(),
                step.latency_p90.as_millis(),
            )?;
        }
        write!(
            f,
            "{:<16} {:>8} {:>8}",
            "Aggregated",
            self.total_requests(),
            self.total_failures()
        )?;

        for step in &self.steps {
            for (error, count) in &step.errors {
                write!(f, "\n{count:>8} {}: {error}", step.name)?;
            }
        }
        Ok(())
    }
}
