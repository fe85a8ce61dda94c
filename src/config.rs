use std::env;
use anyhow::{bail, Context, Result};

pub const DEFAULT_COLLECTION: &str = "sampleCollection";
pub const DEFAULT_MAX_INSTANCES: usize = 10;

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub spanner_emulator_host: Option<String>,
    pub spanner_project: String,
    pub spanner_instance: String,
    pub spanner_database: String,
    pub collection: String,
    pub max_instances: usize,
    pub service_port: u16,
    pub service_host: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let spanner_emulator_host = lookup("SPANNER_EMULATOR_HOST");

        let spanner_project = lookup("SPANNER_PROJECT")
            .context("SPANNER_PROJECT environment variable is required")?;

        let spanner_instance = lookup("SPANNER_INSTANCE")
            .context("SPANNER_INSTANCE environment variable is required")?;

        let spanner_database = lookup("SPANNER_DATABASE")
            .context("SPANNER_DATABASE environment variable is required")?;

        let collection = lookup("DOCUMENT_COLLECTION")
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

        let max_instances = match lookup("MAX_INSTANCES") {
            Some(raw) => raw
                .parse::<usize>()
                .context("MAX_INSTANCES must be a positive integer")?,
            None => DEFAULT_MAX_INSTANCES,
        };
        if max_instances == 0 {
            bail!("MAX_INSTANCES must be at least 1");
        }

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => bail!("LOG_FORMAT must be one of: pretty, json, got '{}'", other),
        };

        Ok(Config {
            spanner_emulator_host,
            spanner_project,
            spanner_instance,
            spanner_database,
            collection,
            max_instances,
            service_port,
            service_host,
            log_format,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Spanner emulator: {}",
            self.spanner_emulator_host.as_deref().unwrap_or("disabled (using production)"));
        tracing::info!("  Spanner project: {}", self.spanner_project);
        tracing::info!("  Spanner instance: {}", self.spanner_instance);
        tracing::info!("  Spanner database: {}", self.spanner_database);
        tracing::info!("  Document collection: {}", self.collection);
        tracing::info!("  Max concurrent requests per function: {}", self.max_instances);
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}
