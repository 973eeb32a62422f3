//! The sequential journey a simulated user repeats: sign in, then create, update, fetch and
//! delete a vacancy.
use crate::api::VacancyApi;
use crate::error::{ApiError, SessionError};
use crate::pool::CredentialPool;
use crate::proto::{CreateVacancyRequest, UpdateVacancyRequest};
use crate::stats::MetricsSink;
use crate::timed::timed;
use fake::faker::address::en::CountryName;
use fake::faker::job::en::Title;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::sync::Arc;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};
use vacancy_load_core::{
    Credential, PassOutcome, Step, CREATE_DESCRIPTION, DIVISION_RANGE, UPDATE_DESCRIPTION,
};

/// Per-user state carried across passes.
#[derive(Debug)]
pub struct Session {
    credential: Credential,
    vacancy_ids: VecDeque<String>,
}

impl Session {
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            vacancy_ids: VecDeque::new(),
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Identifiers of vacancies created and not yet deleted, oldest first.
    pub fn vacancy_ids(&self) -> &VecDeque<String> {
        &self.vacancy_ids
    }
}

pub struct Journey<A> {
    api: A,
    sink: Arc<dyn MetricsSink>,
    session: Session,
    rng: StdRng,
}

impl<A: VacancyApi> Journey<A> {
    /// Claim a credential for a new user. Fails when the pool has run dry.
    pub fn start(
        api: A,
        pool: &CredentialPool,
        sink: Arc<dyn MetricsSink>,
    ) -> Result<Self, SessionError> {
        let credential = pool.take()?;
        Ok(Self::new(api, credential, sink))
    }

    pub fn new(api: A, credential: Credential, sink: Arc<dyn MetricsSink>) -> Self {
        Self {
            api,
            sink,
            session: Session::new(credential),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run every step once, in order, stopping early if a step finds no vacancy to act on.
    pub async fn run_pass(&mut self) -> PassOutcome {
        match self.steps().await {
            ControlFlow::Continue(()) => PassOutcome::Completed,
            ControlFlow::Break(step) => PassOutcome::Interrupted(step),
        }
    }

    async fn steps(&mut self) -> ControlFlow<Step> {
        self.user_signin().await;
        self.create_vacancy().await;
        self.update_vacancy().await?;
        self.get_vacancy().await?;
        self.delete_vacancy().await?;
        ControlFlow::Continue(())
    }

    pub async fn user_signin(&mut self) {
        let Credential { email, password } = &self.session.credential;
        let api = &self.api;
        timed(self.sink.as_ref(), Step::SignIn.name(), async {
            api.sign_in_user(email, password).await?;
            info!("User login: {email}");
            Ok::<_, ApiError>(())
        })
        .await;
    }

    pub async fn create_vacancy(&mut self) {
        let request = random_vacancy(&mut self.rng);
        let email = &self.session.credential.email;
        let api = &self.api;
        let created = timed(self.sink.as_ref(), Step::CreateVacancy.name(), async {
            let response = api.create_vacancy(request).await?;
            let id = response
                .vacancy
                .map(|vacancy| vacancy.id)
                .ok_or(ApiError::MissingVacancy)?;
            info!("New vacancy created with id: {id}. User: {email}");
            Ok::<_, ApiError>(id)
        })
        .await;

        if let Some(id) = created {
            self.session.vacancy_ids.push_back(id);
        }
    }

    pub async fn update_vacancy(&mut self) -> ControlFlow<Step> {
        let Some(id) = self.session.vacancy_ids.front() else {
            info!("Update vacancy task interrupted due to empty vacancy id list");
            return ControlFlow::Break(Step::UpdateVacancy);
        };

        let email = &self.session.credential.email;
        let api = &self.api;
        let request = UpdateVacancyRequest {
            id: id.clone(),
            description: Some(UPDATE_DESCRIPTION.to_string()),
            ..Default::default()
        };
        timed(self.sink.as_ref(), Step::UpdateVacancy.name(), async {
            api.update_vacancy(request).await?;
            info!("Vacancy with id: {id} updated. User: {email}");
            Ok::<_, ApiError>(())
        })
        .await;

        ControlFlow::Continue(())
    }

    pub async fn get_vacancy(&mut self) -> ControlFlow<Step> {
        let Some(id) = self.session.vacancy_ids.front() else {
            info!("Fetch vacancy task interrupted due to empty vacancy id list");
            return ControlFlow::Break(Step::GetVacancy);
        };

        let api = &self.api;
        timed(self.sink.as_ref(), Step::GetVacancy.name(), async {
            api.get_vacancy(id).await?;
            info!("Fetch vacancy with id: {id}");
            Ok::<_, ApiError>(())
        })
        .await;

        ControlFlow::Continue(())
    }

    /// Retires the oldest vacancy id, whether or not the remote delete succeeds.
    pub async fn delete_vacancy(&mut self) -> ControlFlow<Step> {
        let Some(id) = self.session.vacancy_ids.pop_front() else {
            info!("Delete vacancy task interrupted due to empty vacancy id list");
            return ControlFlow::Break(Step::DeleteVacancy);
        };

        let api = &self.api;
        timed(self.sink.as_ref(), Step::DeleteVacancy.name(), async {
            api.delete_vacancy(&id).await?;
            info!("Vacancy with id: {id} deleted");
            Ok::<_, ApiError>(())
        })
        .await;

        ControlFlow::Continue(())
    }
}

fn random_vacancy<R: Rng>(rng: &mut R) -> CreateVacancyRequest {
    CreateVacancyRequest {
        title: Title().fake_with_rng(rng),
        description: CREATE_DESCRIPTION.to_string(),
        division: rng.gen_range(DIVISION_RANGE),
        country: CountryName().fake_with_rng(rng),
    }
}
