use crate::error::SessionError;
use std::sync::Mutex;
use vacancy_load_core::Credential;

/// Fixed set of logins shared by every simulated user.
///
/// Each credential is handed out at most once and the pool is never refilled. Credentials are
/// taken from the back of the list.
#[derive(Debug)]
pub struct CredentialPool {
    credentials: Mutex<Vec<Credential>>,
}

impl CredentialPool {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self {
            credentials: Mutex::new(credentials),
        }
    }

    pub fn take(&self) -> Result<Credential, SessionError> {
        self.credentials
            .lock()?
            .pop()
            .ok_or(SessionError::PoolExhausted)
    }

    pub fn remaining(&self) -> Result<usize, SessionError> {
        Ok(self.credentials.lock()?.len())
    }
}

impl Default for CredentialPool {
    fn default() -> Self {
        Self::new(vacancy_load_core::default_credentials())
    }
}
