use crate::Credential;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Address of the service under test when no host is given.
pub const DEFAULT_HOST: &str = "138.197.190.181:7823";

/// Request type attached to every reported call.
pub const REQUEST_TYPE: &str = "gRPC";

/// Pause between two passes of the same user.
pub const DEFAULT_WAIT_TIME: Duration = Duration::from_secs(1);

/// Interval of the coordinator's background poller.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(45);

pub const DIVISION_RANGE: RangeInclusive<i32> = 0..=3;

pub const CREATE_DESCRIPTION: &str = "Programmer";
pub const UPDATE_DESCRIPTION: &str = "MultiTasks";

/// Accounts used when no credentials are supplied on the command line.
pub const DEFAULT_CREDENTIALS: [(&str, &str); 3] = [
    ("zeus.tester@boranora.com", "zeuspass01!"),
    ("hera.tester@boranora.com", "herapass01!"),
    ("ares.tester@boranora.com", "arespass01!"),
];

pub fn default_credentials() -> Vec<Credential> {
    DEFAULT_CREDENTIALS
        .iter()
        .map(|(email, password)| Credential::new(*email, *password))
        .collect()
}
