use std::path::Path;

use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub qdrant: QdrantSettings,
    pub embeddings: EmbeddingsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QdrantSettings {
    pub host: String,
    /// gRPC port
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub api_key: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
    /// Every collection is created with this vector size
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub collection_vector_size: u64,
}

impl QdrantSettings {
    pub fn get_grpc_base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingsSettings {
    /// Base url of the Ollama server
    pub base_url: String,
    pub model: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
}

/// Extracts app settings from built-in defaults, configuration files and env variables
///
/// Files are looked up in the `configuration` directory of the current directory, and are all optional.
/// `base.yaml` should contain shared settings for all environments.
/// A specific env file can be created for each environment: `develop.yaml`,`local.yaml` and `production.yaml`
/// The environment is set with the env var `APP_ENVIRONMENT`.
/// If `APP_ENVIRONMENT` is not set, `develop.yaml` is the default.
///
/// Settings are also taken from environment variables: with a prefix of APP and '__' as separator
/// For ex: `APP_QDRANT__PORT=6334` would set `Settings.qdrant.port`
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "develop".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    get_configuration_from(&base_path.join("configuration"), environment)
}

/// Same as [`get_configuration`] with an explicit configuration directory and environment
pub fn get_configuration_from(
    configuration_directory: &Path,
    environment: Environment,
) -> Result<Settings, config::ConfigError> {
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .set_default("qdrant.host", "localhost")?
        .set_default("qdrant.port", 6334)?
        .set_default("qdrant.timeout_secs", 10)?
        .set_default("qdrant.collection_vector_size", 768)?
        .set_default("embeddings.base_url", "http://localhost:11434")?
        .set_default("embeddings.model", "nomic-embed-text")?
        .set_default("embeddings.timeout_secs", 60)?
        .add_source(
            config::File::from(configuration_directory.join("base.yaml")).required(false),
        )
        .add_source(
            config::File::from(configuration_directory.join(environment_filename)).required(false),
        )
        // Adds in settings from environment variables (with a prefix of APP and '__' as separator)
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// The possible runtime environment for our application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Develop,
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Develop => "develop",
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "develop" => Ok(Self::Develop),
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `develop`, `local` or `production`.",
                other
            )),
        }
    }
}
