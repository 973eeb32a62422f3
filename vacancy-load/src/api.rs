//! Remote operations a simulated user performs.
use crate::error::ApiError;
use crate::proto::{
    AuthServiceClient, CreateVacancyRequest, DeleteVacancyResponse, SignInUserInput,
    SignInUserResponse, UpdateVacancyRequest, VacancyRequest, VacancyResponse,
    VacancyServiceClient,
};
use tonic::transport::{Channel, Endpoint};
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// The auth + vacancy API as seen by a user journey.
///
/// Implemented over gRPC by [`GrpcVacancyApi`]; tests substitute an in-memory service.
#[trait_variant::make(VacancyApi: Send)]
pub trait LocalVacancyApi {
    async fn sign_in_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInUserResponse, ApiError>;

    async fn create_vacancy(
        &self,
        request: CreateVacancyRequest,
    ) -> Result<VacancyResponse, ApiError>;

    async fn update_vacancy(
        &self,
        request: UpdateVacancyRequest,
    ) -> Result<VacancyResponse, ApiError>;

    async fn get_vacancy(&self, id: &str) -> Result<VacancyResponse, ApiError>;

    async fn delete_vacancy(&self, id: &str) -> Result<DeleteVacancyResponse, ApiError>;
}

/// gRPC client over an unencrypted channel.
///
/// Every call dials a fresh connection, so measured latency includes connection setup. No
/// timeout is applied.
#[derive(Debug, Clone)]
pub struct GrpcVacancyApi {
    endpoint: Endpoint,
}

impl GrpcVacancyApi {
    /// `host` is `address:port`; a scheme is added when missing.
    pub fn new(host: &str) -> Result<Self, ApiError> {
        let uri = if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };
        let endpoint = Endpoint::from_shared(uri)?;
        Ok(Self { endpoint })
    }

    pub fn uri(&self) -> String {
        self.endpoint.uri().to_string()
    }

    async fn channel(&self) -> Result<Channel, ApiError> {
        trace!("Connecting to {}", self.endpoint.uri());
        Ok(self.endpoint.connect().await?)
    }
}

impl VacancyApi for GrpcVacancyApi {
    async fn sign_in_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInUserResponse, ApiError> {
        let mut client = AuthServiceClient::new(self.channel().await?);
        let request = SignInUserInput {
            email: email.to_string(),
            password: password.to_string(),
        };
        Ok(client.sign_in_user(request).await?.into_inner())
    }

    async fn create_vacancy(
        &self,
        request: CreateVacancyRequest,
    ) -> Result<VacancyResponse, ApiError> {
        let mut client = VacancyServiceClient::new(self.channel().await?);
        Ok(client.create_vacancy(request).await?.into_inner())
    }

    async fn update_vacancy(
        &self,
        request: UpdateVacancyRequest,
    ) -> Result<VacancyResponse, ApiError> {
        let mut client = VacancyServiceClient::new(self.channel().await?);
        Ok(client.update_vacancy(request).await?.into_inner())
    }

    async fn get_vacancy(&self, id: &str) -> Result<VacancyResponse, ApiError> {
        let mut client = VacancyServiceClient::new(self.channel().await?);
        let request = VacancyRequest { id: id.to_string() };
        Ok(client.get_vacancy(request).await?.into_inner())
    }

    async fn delete_vacancy(&self, id: &str) -> Result<DeleteVacancyResponse, ApiError> {
        let mut client = VacancyServiceClient::new(self.channel().await?);
        let request = VacancyRequest { id: id.to_string() };
        Ok(client.delete_vacancy(request).await?.into_inner())
    }
}
