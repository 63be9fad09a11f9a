use ecoaction_core::{CompletionClient, Retrying};
use ecoaction_llm::{AzureOpenAiClient, AzureOpenAiConfig};
use ecoaction_server::{serve, AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ecoaction=debug")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let azure = AzureOpenAiClient::new(AzureOpenAiConfig::from_env()?)?;
    tracing::info!(
        deployment = azure.deployment(),
        max_attempts = config.max_attempts,
        "completion client ready"
    );
    let client = CompletionClient::from_model(Retrying::new(azure, config.max_attempts));

    serve(config.addr, AppState::new(client)).await?;
    Ok(())
}
