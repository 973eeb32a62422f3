use crate::REQUEST_TYPE;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Login for one simulated user.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCredentialError {
    #[error("expected EMAIL:PASSWORD, found `{0}`")]
    MissingSeparator(String),

    #[error("email must not be empty")]
    EmptyEmail,
}

/// Parses `email:password`. The password may itself contain `:`.
impl FromStr for Credential {
    type Err = ParseCredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (email, password) = s
            .split_once(':')
            .ok_or_else(|| ParseCredentialError::MissingSeparator(s.to_string()))?;

        if email.is_empty() {
            return Err(ParseCredentialError::EmptyEmail);
        }

        Ok(Credential::new(email, password))
    }
}

/// Whether this process coordinates the run or is one of its workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Coordinator,
    Worker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Ready,
    Spawning,
    Running,
    Stopping,
    Stopped,
    Cleanup,
}

impl RunState {
    pub fn is_stopping(&self) -> bool {
        matches!(
            self,
            RunState::Stopping | RunState::Stopped | RunState::Cleanup
        )
    }
}

/// A single step of the user journey, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    SignIn,
    CreateVacancy,
    UpdateVacancy,
    GetVacancy,
    DeleteVacancy,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::SignIn,
        Step::CreateVacancy,
        Step::UpdateVacancy,
        Step::GetVacancy,
        Step::DeleteVacancy,
    ];

    /// Name the step is reported under.
    pub fn name(&self) -> &'static str {
        match self {
            Step::SignIn => "user_signin",
            Step::CreateVacancy => "create_vacancy",
            Step::UpdateVacancy => "update_vacancy",
            Step::GetVacancy => "get_vacancy",
            Step::DeleteVacancy => "delete_vacancy",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One timed remote call, as handed to a metrics sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEvent {
    pub request_type: &'static str,
    pub name: &'static str,
    pub response_time_ms: u64,
    pub response_length: usize,
    pub exception: Option<String>,
}

impl RequestEvent {
    pub fn success(name: &'static str, elapsed: Duration) -> Self {
        Self {
            request_type: REQUEST_TYPE,
            name,
            response_time_ms: elapsed.as_millis() as u64,
            response_length: 0,
            exception: None,
        }
    }

    pub fn failure(name: &'static str, elapsed: Duration, exception: String) -> Self {
        Self {
            exception: Some(exception),
            ..Self::success(name, elapsed)
        }
    }

    pub fn is_success(&self) -> bool {
        self.exception.is_none()
    }
}

/// How a single pass over the journey ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Completed,
    /// A step found no vacancy to work on and cut the pass short.
    Interrupted(Step),
}
