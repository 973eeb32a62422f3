mod utils;
#[allow(unused)]
use utils::*;

use mock_service::prelude::*;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use vacancy_load::prelude::*;

fn config(users: usize) -> LoadConfig {
    LoadConfig::new("127.0.0.1:7823")
        .users(users)
        .spawn_rate(NonZeroU32::new(100).unwrap())
        .run_time(Duration::from_millis(3_500))
}

fn pool(n: usize) -> Arc<CredentialPool> {
    Arc::new(CredentialPool::new(
        (0..n)
            .map(|i| Credential::new(format!("user{i}@example.com"), "pw"))
            .collect(),
    ))
}

#[tokio::test(start_paused = true)]
async fn users_repeat_the_journey_until_run_time() {
    let api = MockVacancyService::new();
    let sink = Arc::new(RecordingSink::new());

    let stats = SessionDriver::new(api.clone(), config(2))
        .pool(pool(3))
        .sink(sink.clone())
        .run()
        .await;

    assert_eq!(stats.users, 2);
    assert_eq!(stats.failed_users, 0);
    assert_eq!(stats.total_failures(), 0);
    assert_eq!(stats.total_requests() as usize, sink.events().len());

    // A pass every second for 3.5s: at least three per user.
    let signins = api.call_count(Step::SignIn);
    assert!(signins >= 6, "only {signins} sign ins");
    for step in Step::ALL {
        let step_stats = stats.step(step.name()).unwrap();
        assert!(step_stats.requests >= 6);
    }
}

#[tokio::test(start_paused = true)]
async fn extra_users_fail_explicitly() {
    let api = MockVacancyService::new();
    let pool = pool(2);

    let stats = SessionDriver::new(api, config(3))
        .pool(pool.clone())
        .run()
        .await;

    assert_eq!(stats.users, 2);
    assert_eq!(stats.failed_users, 1);
    assert_eq!(pool.remaining().unwrap(), 0);
}

#[tokio::test(start_paused = true)]
#[ntest::timeout(5000)]
async fn stop_ends_an_open_ended_run() {
    let api = MockVacancyService::new();
    let ctx = RunContext::new(Role::Coordinator);
    let config = LoadConfig::new("127.0.0.1:7823").users(1);

    let driver = SessionDriver::new(api.clone(), config)
        .pool(pool(1))
        .context(ctx.clone());
    let run = tokio::spawn(driver.run());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(ctx.run_state(), RunState::Running);
    assert!(!run.is_finished());

    ctx.stop();
    let stats = run.await.unwrap();

    assert_eq!(ctx.run_state(), RunState::Cleanup);
    assert_eq!(stats.users, 1);
    assert!(api.call_count(Step::SignIn) >= 5);

    // No user keeps calling once the run is over.
    let calls = api.calls().len();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(api.calls().len(), calls);
}

#[tokio::test(start_paused = true)]
async fn failing_update_is_counted_per_step() {
    let api = MockVacancyService::new();
    api.fail(Step::UpdateVacancy);

    let stats = SessionDriver::new(api, config(1)).pool(pool(1)).run().await;

    let update = stats.step("update_vacancy").unwrap();
    assert_eq!(update.failures, update.requests);
    assert_eq!(update.errors.len(), 1);
    assert_eq!(stats.step("get_vacancy").unwrap().failures, 0);
    assert_eq!(
        stats.step("get_vacancy").unwrap().requests,
        update.requests
    );
}

// The spawn limiter waits on the wall clock, so this one runs in real time.
#[tokio::test]
#[ntest::timeout(10000)]
async fn users_start_at_the_spawn_rate() {
    let api = MockVacancyService::new();
    let config = LoadConfig::new("127.0.0.1:7823")
        .users(3)
        .spawn_rate(NonZeroU32::MIN)
        .run_time(Duration::from_millis(2_500));

    let stats = SessionDriver::new(api.clone(), config)
        .pool(pool(3))
        .run()
        .await;

    assert_eq!(stats.users, 3);
    assert_eq!(stats.failed_users, 0);

    let mut first_sign_ins = Vec::new();
    for (email, at) in api.sign_ins() {
        if !first_sign_ins.iter().any(|(e, _)| *e == email) {
            first_sign_ins.push((email, at));
        }
    }
    assert_eq!(first_sign_ins.len(), 3);

    for pair in first_sign_ins.windows(2) {
        let gap = pair[1].1 - pair[0].1;
        assert!(gap >= Duration::from_millis(900), "users started {gap:?} apart");
    }
}

#[tracing_test::traced_test]
#[tokio::test(start_paused = true)]
async fn coordinator_runs_the_poller() {
    let config = config(1).poll_interval(Duration::from_secs(1));
    SessionDriver::new(MockVacancyService::new(), config)
        .pool(pool(1))
        .run()
        .await;

    assert!(logs_contain("Background task to fetch all vacancies"));
}

#[tracing_test::traced_test]
#[tokio::test(start_paused = true)]
async fn worker_skips_the_poller() {
    let config = config(1)
        .poll_interval(Duration::from_secs(1))
        .role(Role::Worker);
    SessionDriver::new(MockVacancyService::new(), config)
        .pool(pool(1))
        .run()
        .await;

    assert!(!logs_contain("Background task to fetch all vacancies"));
}
