//! Message types and clients generated from the `pb` schema in `proto/` at the workspace root.
tonic::include_proto!("pb");

pub use auth_service_client::AuthServiceClient;
pub use vacancy_service_client::VacancyServiceClient;
