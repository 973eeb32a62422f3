#![doc = include_str!("../README.md")]

pub mod api;
pub mod context;
pub mod driver;
pub mod error;
pub mod journey;
pub mod poller;
pub mod pool;
pub mod proto;
pub mod stats;
pub mod timed;

pub mod prelude {
    pub use crate::api::{GrpcVacancyApi, VacancyApi};
    pub use crate::context::RunContext;
    pub use crate::driver::SessionDriver;
    pub use crate::error::{ApiError, SessionError};
    pub use crate::journey::{Journey, Session};
    pub use crate::pool::CredentialPool;
    pub use crate::stats::{MetricsSink, StatsAggregator};
    pub use crate::timed::timed;

    pub use vacancy_load_core::{
        Credential, LoadConfig, PassOutcome, RequestEvent, Role, RunState, RunStatistics, Step,
        StepStatistics,
    };
}
