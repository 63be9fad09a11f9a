use std::fmt;
use std::time::Duration;

use ecoaction_core::EcoActionError;
use secrecy::SecretString;
use url::Url;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_ENDPOINT: &str = "AZURE_ENDPOINT";
pub const ENV_DEPLOYMENT: &str = "DEPLOYMENT_NAME";
pub const ENV_API_VERSION: &str = "OPENAI_VERSION";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for an Azure-hosted OpenAI deployment.
#[derive(Clone)]
pub struct AzureOpenAiConfig {
    pub endpoint: String,
    pub deployment: String,
    pub api_version: String,
    pub api_key: SecretString,
    pub timeout: Duration,
}

impl fmt::Debug for AzureOpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAiConfig")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AzureOpenAiConfig {
    pub fn builder() -> AzureOpenAiConfigBuilder {
        AzureOpenAiConfigBuilder::new()
    }

    /// Reads `AZURE_ENDPOINT`, `DEPLOYMENT_NAME`, `OPENAI_VERSION` and
    /// `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, EcoActionError> {
        AzureOpenAiConfigBuilder::new()
            .endpoint_from_env(ENV_ENDPOINT)
            .deployment_from_env(ENV_DEPLOYMENT)
            .api_version_from_env(ENV_API_VERSION)
            .api_key_from_env(ENV_API_KEY)
            .build()
    }

    /// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}`
    pub fn chat_completions_url(&self) -> Result<Url, EcoActionError> {
        let raw = format!(
            "{}/openai/deployments/{}/chat/completions",
            self.endpoint.trim_end_matches('/'),
            self.deployment
        );
        let mut url = Url::parse(&raw)
            .map_err(|err| EcoActionError::InvalidConfig(format!("invalid endpoint: {err}")))?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }
}

#[derive(Default, Clone)]
pub struct AzureOpenAiConfigBuilder {
    endpoint: Option<String>,
    deployment: Option<String>,
    api_version: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    missing_env: Vec<String>,
}

impl fmt::Debug for AzureOpenAiConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_some() {
            "<redacted>"
        } else {
            "<none>"
        };

        f.debug_struct("AzureOpenAiConfigBuilder")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("api_key", &api_key)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AzureOpenAiConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(mut self, value: impl Into<String>) -> Self {
        self.endpoint = Some(value.into());
        self
    }

    pub fn deployment(mut self, value: impl Into<String>) -> Self {
        self.deployment = Some(value.into());
        self
    }

    pub fn api_version(mut self, value: impl Into<String>) -> Self {
        self.api_version = Some(value.into());
        self
    }

    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.api_key = Some(value.into());
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(value);
        self
    }

    pub fn endpoint_from_env(mut self, var_name: &str) -> Self {
        self.endpoint = self.read_env(var_name);
        self
    }

    pub fn deployment_from_env(mut self, var_name: &str) -> Self {
        self.deployment = self.read_env(var_name);
        self
    }

    pub fn api_version_from_env(mut self, var_name: &str) -> Self {
        self.api_version = self.read_env(var_name);
        self
    }

    pub fn api_key_from_env(mut self, var_name: &str) -> Self {
        self.api_key = self.read_env(var_name);
        self
    }

    fn read_env(&mut self, var_name: &str) -> Option<String> {
        match std::env::var(var_name) {
            Ok(value) if !value.trim().is_empty() => Some(value),
            _ => {
                self.missing_env.push(var_name.to_string());
                None
            }
        }
    }

    pub fn build(self) -> Result<AzureOpenAiConfig, EcoActionError> {
        if !self.missing_env.is_empty() {
            return Err(EcoActionError::InvalidConfig(format!(
                "missing environment variables: {}",
                self.missing_env.join(", ")
            )));
        }

        let endpoint = required(self.endpoint, "endpoint")?;
        let deployment = required(self.deployment, "deployment")?;
        let api_version = required(self.api_version, "api_version")?;
        let api_key = required(self.api_key, "api_key")?;

        Url::parse(&endpoint)
            .map_err(|err| EcoActionError::InvalidConfig(format!("invalid endpoint: {err}")))?;

        Ok(AzureOpenAiConfig {
            endpoint,
            deployment,
            api_version,
            api_key: SecretString::new(api_key),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, EcoActionError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        Some(_) => Err(EcoActionError::InvalidConfig(format!(
            "{name} cannot be empty"
        ))),
        None => Err(EcoActionError::InvalidConfig(format!("{name} is required"))),
    }
}
