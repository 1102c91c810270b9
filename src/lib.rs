//! Serving Gateway
//!
//! A thin HTTP gateway that forwards chat messages from a web frontend to a
//! hosted model-serving endpoint, with:
//! - Bounded in-memory chat history (last 100 exchanges)
//! - Feedback forwarding for endpoints that support it
//! - Mock dashboard metrics and static frontend serving

pub mod api;
pub mod chat;
pub mod serving;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Endpoint used when neither env nor config names one.
pub const DEFAULT_SERVING_ENDPOINT: &str = "ka-981b9343-endpoint";

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub serving: ServingYamlConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
    pub serve_frontend: bool,
    pub frontend_path: String,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            serve_frontend: true,
            frontend_path: "./static".into(),
        }
    }
}

/// Serving endpoint configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServingYamlConfig {
    pub endpoint: String,
    pub host: String,
    pub token: String,
}

impl Default for ServingYamlConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SERVING_ENDPOINT.into(),
            host: "https://dbc-00000000-0000.cloud.databricks.com".into(),
            token: String::new(),
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub serving_endpoint: String,
    pub serving_host: String,
    pub serving_token: String,
    pub server_port: u16,
    pub serve_frontend: bool,
    pub frontend_path: String,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            serving_endpoint: std::env::var("SERVING_ENDPOINT").unwrap_or(yaml.serving.endpoint),
            serving_host: std::env::var("DATABRICKS_HOST").unwrap_or(yaml.serving.host),
            serving_token: std::env::var("DATABRICKS_TOKEN").unwrap_or(yaml.serving.token),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            serve_frontend: yaml.server.serve_frontend,
            frontend_path: std::env::var("FRONTEND_PATH").unwrap_or(yaml.server.frontend_path),
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub serving: Arc<dyn serving::ServingBackend>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state with the serving client initialized
    pub fn new(config: Config) -> Result<Self> {
        let serving = Arc::new(serving::ServingClient::new(
            &config.serving_host,
            &config.serving_token,
        )?);

        Ok(Self {
            serving,
            config: Arc::new(config),
        })
    }
}

/// Start the HTTP server and run until shutdown.
pub async fn start_server(config: Config) -> Result<()> {
    let port = config.server_port;
    let state = AppState::new(config)?;
    let endpoint = state.config.serving_endpoint.clone();
    tracing::info!("Using serving endpoint: {}", endpoint);

    // Capability flag is resolved once here and immutable afterwards
    let supports_feedback = match state.serving.supports_feedback(&endpoint).await {
        Ok(supported) => supported,
        Err(e) => {
            tracing::warn!(
                "Could not resolve feedback capability for {}: {}. Assuming unsupported.",
                endpoint,
                e
            );
            false
        }
    };
    tracing::info!("Endpoint supports feedback: {}", supports_feedback);

    let history = Arc::new(chat::HistoryStore::new());
    let server_state = Arc::new(api::handlers::ServerState {
        chat: Arc::new(chat::ChatManager::new(
            state.serving.clone(),
            history.clone(),
            endpoint.clone(),
            supports_feedback,
        )),
        feedback: Arc::new(chat::FeedbackGateway::new(
            state.serving.clone(),
            endpoint.clone(),
            supports_feedback,
        )),
        history,
        serving_endpoint: endpoint,
        endpoint_supports_feedback: supports_feedback,
        serve_frontend: state.config.serve_frontend,
        frontend_path: state.config.frontend_path.clone(),
    });

    let router = api::create_router(server_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Gateway listening on http://0.0.0.0:{}", port);
    axum::serve(listener, router).await?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
