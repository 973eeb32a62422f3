use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vacancy_load_runtime::LoadRuntime;

const DEFAULT_LOG_FILTER: &str = "vacancy_load=info,vacancy_load_runtime=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    LoadRuntime::new().with_args().run().await?;
    Ok(())
}
