use std::sync::Arc;
use tokio::sync::watch;
use vacancy_load_core::{Role, RunState};

/// Process role and run state, shared by the driver, the poller and whoever may stop the run.
#[derive(Debug, Clone)]
pub struct RunContext {
    role: Role,
    state: Arc<watch::Sender<RunState>>,
}

impl RunContext {
    pub fn new(role: Role) -> Self {
        let (state, _) = watch::channel(RunState::Ready);
        Self {
            role,
            state: Arc::new(state),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn run_state(&self) -> RunState {
        *self.state.borrow()
    }

    pub fn set_run_state(&self, run_state: RunState) {
        self.state.send_replace(run_state);
    }

    /// Ask a running test to wind down.
    pub fn stop(&self) {
        self.state.send_if_modified(|state| {
            if state.is_stopping() {
                false
            } else {
                *state = RunState::Stopping;
                true
            }
        });
    }

    /// Resolves once the run has entered a stopping state.
    pub async fn stopped(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(RunState::is_stopping).await;
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(Role::Coordinator)
    }
}
