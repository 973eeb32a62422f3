use crate::stats::MetricsSink;
use std::fmt::Display;
use std::future::Future;
use std::time::Instant;
use vacancy_load_core::RequestEvent;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// Await `func`, reporting exactly one event named `name` to `sink`.
///
/// Errors are recorded and swallowed: the caller only learns that the call failed through the
/// `None` return.
pub async fn timed<T, R, E>(sink: &dyn MetricsSink, name: &'static str, func: T) -> Option<R>
where
    T: Future<Output = Result<R, E>>,
    E: Display,
{
    let start = Instant::now();
    let res = func.await;
    let elapsed = start.elapsed();

    match res {
        Ok(value) => {
            sink.record(RequestEvent::success(name, elapsed));
            Some(value)
        }
        Err(err) => {
            let exception = err.to_string();
            warn!("{name} failed after {elapsed:?}: {exception}");
            sink.record(RequestEvent::failure(name, elapsed, exception));
            None
        }
    }
}
