mod utils;
#[allow(unused)]
use utils::*;

use mock_service::prelude::*;
use std::ops::ControlFlow;
use std::sync::Arc;
use vacancy_load::prelude::*;

#[tokio::test]
async fn full_pass_creates_and_retires_a_vacancy() {
    let api = MockVacancyService::new();
    let sink = Arc::new(RecordingSink::new());
    let mut journey = journey(&api, &sink);

    assert_eq!(journey.run_pass().await, PassOutcome::Completed);

    assert_eq!(api.calls(), Step::ALL.to_vec());
    assert_eq!(
        sink.names(),
        Step::ALL.iter().map(Step::name).collect::<Vec<_>>()
    );
    assert!(sink.events().iter().all(RequestEvent::is_success));
    assert!(journey.session().vacancy_ids().is_empty());
    assert_eq!(api.vacancy_count(), 0);
}

#[tokio::test]
async fn every_pass_starts_with_sign_in() {
    let api = MockVacancyService::new();
    let sink = Arc::new(RecordingSink::new());
    let mut journey = journey(&api, &sink);

    api.fail(Step::CreateVacancy);
    for _ in 0..3 {
        journey.run_pass().await;
    }
    api.recover(Step::CreateVacancy);
    journey.run_pass().await;

    let mut expected = vec![];
    for _ in 0..3 {
        expected.extend([Step::SignIn, Step::CreateVacancy]);
    }
    expected.extend(Step::ALL);
    assert_eq!(api.calls(), expected);
    assert_eq!(api.call_count(Step::SignIn), 4);
}

#[tokio::test]
async fn empty_collection_interrupts_without_calls() {
    let api = MockVacancyService::new();
    let sink = Arc::new(RecordingSink::new());
    let mut journey = journey(&api, &sink);

    assert_eq!(
        journey.update_vacancy().await,
        ControlFlow::Break(Step::UpdateVacancy)
    );
    assert_eq!(
        journey.get_vacancy().await,
        ControlFlow::Break(Step::GetVacancy)
    );
    assert_eq!(
        journey.delete_vacancy().await,
        ControlFlow::Break(Step::DeleteVacancy)
    );

    assert!(api.calls().is_empty());
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn failed_create_ends_pass_at_update() {
    let api = MockVacancyService::new();
    let sink = Arc::new(RecordingSink::new());
    let mut journey = journey(&api, &sink);

    api.fail(Step::CreateVacancy);
    assert_eq!(
        journey.run_pass().await,
        PassOutcome::Interrupted(Step::UpdateVacancy)
    );
    assert_eq!(api.calls(), vec![Step::SignIn, Step::CreateVacancy]);

    // The abort itself is not reported; only the failed create is.
    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(events[0].is_success());
    assert_eq!(events[1].name, "create_vacancy");
    assert!(!events[1].is_success());

    api.recover(Step::CreateVacancy);
    assert_eq!(journey.run_pass().await, PassOutcome::Completed);
    assert_eq!(api.calls()[2], Step::SignIn);
}

#[tokio::test]
async fn get_reads_and_delete_pops() {
    let api = MockVacancyService::new();
    let sink = Arc::new(RecordingSink::new());
    let mut journey = journey(&api, &sink);

    journey.create_vacancy().await;
    assert_eq!(journey.session().vacancy_ids(), &["V1".to_string()]);

    assert_eq!(journey.get_vacancy().await, ControlFlow::Continue(()));
    assert_eq!(journey.session().vacancy_ids(), &["V1".to_string()]);

    assert_eq!(journey.delete_vacancy().await, ControlFlow::Continue(()));
    assert!(journey.session().vacancy_ids().is_empty());
    assert!(api.vacancy("V1").is_none());
}

#[tokio::test]
async fn only_delete_shrinks_the_collection() {
    let api = MockVacancyService::new();
    let sink = Arc::new(RecordingSink::new());
    let mut journey = journey(&api, &sink);

    journey.create_vacancy().await;
    journey.create_vacancy().await;
    assert_eq!(journey.session().vacancy_ids().len(), 2);

    journey.update_vacancy().await;
    journey.get_vacancy().await;
    assert_eq!(journey.session().vacancy_ids().len(), 2);

    let updated = api.vacancy("V1").unwrap();
    assert_eq!(updated.description, "MultiTasks");
    assert_eq!(api.vacancy("V2").unwrap().description, "Programmer");

    journey.delete_vacancy().await;
    assert_eq!(journey.session().vacancy_ids(), &["V2".to_string()]);
}

#[tokio::test]
async fn update_failure_does_not_block_get() {
    let api = MockVacancyService::new();
    let sink = Arc::new(RecordingSink::new());
    let mut journey = journey(&api, &sink);

    api.fail(Step::UpdateVacancy);
    assert_eq!(journey.run_pass().await, PassOutcome::Completed);
    assert_eq!(api.calls(), Step::ALL.to_vec());

    let events = sink.events();
    assert_eq!(events.len(), 5);
    let update = &events[2];
    assert_eq!(update.name, "update_vacancy");
    assert!(update
        .exception
        .as_deref()
        .is_some_and(|e| e.contains("injected failure")));
    assert_eq!(events[3].name, "get_vacancy");
    assert!(events[3].is_success());
}

#[tokio::test]
async fn sign_in_failure_is_not_fatal() {
    let api = MockVacancyService::new();
    let sink = Arc::new(RecordingSink::new());
    let mut journey = journey(&api, &sink);

    api.fail(Step::SignIn);
    assert_eq!(journey.run_pass().await, PassOutcome::Completed);

    let events = sink.events();
    assert!(!events[0].is_success());
    assert!(events[1..].iter().all(RequestEvent::is_success));
}

#[tokio::test]
async fn failed_delete_still_retires_the_id() {
    let api = MockVacancyService::new();
    let sink = Arc::new(RecordingSink::new());
    let mut journey = journey(&api, &sink);

    api.fail(Step::DeleteVacancy);
    assert_eq!(journey.run_pass().await, PassOutcome::Completed);

    assert!(journey.session().vacancy_ids().is_empty());
    assert_eq!(api.vacancy_count(), 1);
    assert!(!sink.events()[4].is_success());
}

#[test]
fn sessions_take_credentials_from_the_back() {
    let api = MockVacancyService::new();
    let sink: Arc<dyn MetricsSink> = Arc::new(RecordingSink::new());
    let pool = CredentialPool::new(vec![
        Credential::new("a", "pw1"),
        Credential::new("b", "pw2"),
    ]);

    let first = Journey::start(api.clone(), &pool, sink.clone()).unwrap();
    let second = Journey::start(api.clone(), &pool, sink.clone()).unwrap();

    assert_eq!(first.session().credential(), &Credential::new("b", "pw2"));
    assert_eq!(second.session().credential(), &Credential::new("a", "pw1"));

    assert!(matches!(
        Journey::start(api, &pool, sink),
        Err(SessionError::PoolExhausted)
    ));
}
