//! In-memory stand-in for the auth + vacancy service, and a sink that keeps every event.
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tonic::Status;
use tracing::debug;
use vacancy_load::api::VacancyApi;
use vacancy_load::error::ApiError;
use vacancy_load::proto::{
    CreateVacancyRequest, DeleteVacancyResponse, SignInUserResponse, UpdateVacancyRequest,
    Vacancy, VacancyResponse,
};
use vacancy_load::stats::MetricsSink;
use vacancy_load_core::{RequestEvent, Step};

pub mod prelude {
    pub use crate::{MockVacancyService, RecordingSink};
}

/// Vacancy API backed by a map. Ids are handed out as `V1`, `V2`, ...
///
/// Clones share state, so a test can keep one handle while users drive the others.
#[derive(Clone, Default)]
pub struct MockVacancyService {
    inner: Arc<Inner>,
    delay: Duration,
}

#[derive(Default)]
struct Inner {
    vacancies: Mutex<BTreeMap<String, Vacancy>>,
    next_id: AtomicU64,
    calls: Mutex<Vec<Step>>,
    sign_ins: Mutex<Vec<(String, Instant)>>,
    failing: Mutex<HashSet<Step>>,
}

impl MockVacancyService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make every call of `step` fail with `UNAVAILABLE` until [`recover`](Self::recover).
    pub fn fail(&self, step: Step) {
        self.inner.failing.lock().unwrap().insert(step);
    }

    pub fn recover(&self, step: Step) {
        self.inner.failing.lock().unwrap().remove(&step);
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<Step> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, step: Step) -> usize {
        self.inner
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|s| **s == step)
            .count()
    }

    /// Every sign in received so far as (email, arrival time), in arrival order.
    pub fn sign_ins(&self) -> Vec<(String, Instant)> {
        self.inner.sign_ins.lock().unwrap().clone()
    }

    pub fn vacancy(&self, id: &str) -> Option<Vacancy> {
        self.inner.vacancies.lock().unwrap().get(id).cloned()
    }

    pub fn vacancy_count(&self) -> usize {
        self.inner.vacancies.lock().unwrap().len()
    }

    async fn receive(&self, step: Step) -> Result<(), ApiError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.inner.calls.lock().unwrap().push(step);
        if self.inner.failing.lock().unwrap().contains(&step) {
            debug!("MOCK SERVICE ___ {step} FAIL");
            return Err(Status::unavailable("injected failure").into());
        }
        Ok(())
    }

    fn found(&self, id: &str) -> Result<Vacancy, ApiError> {
        self.vacancy(id)
            .ok_or_else(|| Status::not_found(format!("vacancy {id} not found")).into())
    }
}

impl VacancyApi for MockVacancyService {
    async fn sign_in_user(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<SignInUserResponse, ApiError> {
        self.inner
            .sign_ins
            .lock()
            .unwrap()
            .push((email.to_string(), Instant::now()));
        self.receive(Step::SignIn).await?;
        Ok(SignInUserResponse {
            status: "success".to_string(),
            access_token: format!("access-{email}"),
            refresh_token: format!("refresh-{email}"),
        })
    }

    async fn create_vacancy(
        &self,
        request: CreateVacancyRequest,
    ) -> Result<VacancyResponse, ApiError> {
        self.receive(Step::CreateVacancy).await?;

        let id = format!("V{}", self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let vacancy = Vacancy {
            id: id.clone(),
            title: request.title,
            description: request.description,
            division: request.division,
            country: request.country,
            ..Default::default()
        };
        self.inner
            .vacancies
            .lock()
            .unwrap()
            .insert(id, vacancy.clone());

        Ok(VacancyResponse {
            vacancy: Some(vacancy),
        })
    }

    async fn update_vacancy(
        &self,
        request: UpdateVacancyRequest,
    ) -> Result<VacancyResponse, ApiError> {
        self.receive(Step::UpdateVacancy).await?;

        let mut vacancies = self.inner.vacancies.lock().unwrap();
        let vacancy = vacancies
            .get_mut(&request.id)
            .ok_or_else(|| Status::not_found(format!("vacancy {} not found", request.id)))?;

        if let Some(title) = request.title {
            vacancy.title = title;
        }
        if let Some(description) = request.description {
            vacancy.description = description;
        }
        if let Some(division) = request.division {
            vacancy.division = division;
        }
        if let Some(country) = request.country {
            vacancy.country = country;
        }

        Ok(VacancyResponse {
            vacancy: Some(vacancy.clone()),
        })
    }

    async fn get_vacancy(&self, id: &str) -> Result<VacancyResponse, ApiError> {
        self.receive(Step::GetVacancy).await?;
        Ok(VacancyResponse {
            vacancy: Some(self.found(id)?),
        })
    }

    async fn delete_vacancy(&self, id: &str) -> Result<DeleteVacancyResponse, ApiError> {
        self.receive(Step::DeleteVacancy).await?;
        self.inner
            .vacancies
            .lock()
            .unwrap()
            .remove(id)
            .ok_or_else(|| Status::not_found(format!("vacancy {id} not found")))?;
        Ok(DeleteVacancyResponse { success: true })
    }
}

/// Metrics sink that keeps every event it receives.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RequestEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RequestEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name).collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl MetricsSink for RecordingSink {
    fn record(&self, event: RequestEvent) {
        self.events.lock().unwrap().push(event);
    }
}
