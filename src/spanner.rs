use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::statement::Statement;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::config::Config;
use crate::store::{Document, DocumentStore};

const DOCUMENTS_TABLE: &str = "documents";

/// Document store backed by a single Spanner table
///
/// Every collection lives in the `documents` table, keyed by
/// `(collection, id)`, with the document body in a JSON column.
#[derive(Clone)]
pub struct SpannerClient {
    inner: Arc<Client>,
}

impl SpannerClient {
    /// Create a new Spanner client from configuration
    ///
    /// The gcloud-spanner library picks up `SPANNER_EMULATOR_HOST` on its
    /// own. Against the emulator, instance, database and the documents
    /// table are created first if missing. In production they must exist.
    pub async fn from_config(config: &Config) -> Result<Self> {
        if should_provision(config) {
            EmulatorProvisioner::connect(config).await?.run().await?;
        }

        let database_path = format!(
            "projects/{}/instances/{}/databases/{}",
            config.spanner_project, config.spanner_instance, config.spanner_database
        );

        match config.spanner_emulator_host.as_deref() {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Read every document of one collection
    ///
    /// # Errors
    /// Returns an error if the query fails, or if a stored body is not a
    /// JSON object
    pub async fn read_collection(&self, collection: &str) -> Result<Vec<Document>> {
        let mut statement = Statement::new(
            "SELECT data FROM documents WHERE collection = @collection ORDER BY id"
        );
        statement.add_param("collection", &collection.to_string());

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query documents from Spanner")?;

        let mut documents = Vec::new();
        while let Some(row) = result_set.next().await? {
            let data_str: String = row.column_by_name("data")?;
            let data: JsonValue = serde_json::from_str(&data_str)
                .context("Failed to deserialize document data")?;

            match data {
                JsonValue::Object(doc) => documents.push(doc),
                other => bail!(
                    "Document in collection '{}' is not a JSON object: {}",
                    collection,
                    other
                ),
            }
        }

        tracing::debug!(
            "Read {} documents from collection '{}'",
            documents.len(),
            collection
        );
        Ok(documents)
    }

    /// Run `SELECT 1` to check the connection is alive
    pub async fn ping(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

#[async_trait]
impl DocumentStore for SpannerClient {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        self.read_collection(collection).await
    }

    async fn health_check(&self) -> Result<()> {
        self.ping().await
    }
}

/// Only the emulator is provisioned; production resources must already exist
pub fn should_provision(config: &Config) -> bool {
    config.spanner_emulator_host.is_some()
}

/// Creates the emulator instance, database and documents table on demand
struct EmulatorProvisioner {
    admin: AdminClient,
    project: String,
    instance_id: String,
    database_id: String,
}

impl EmulatorProvisioner {
    async fn connect(config: &Config) -> Result<Self> {
        let admin = AdminClient::new(AdminClientConfig::default())
            .await
            .context("Failed to create Spanner admin client")?;

        Ok(Self {
            admin,
            project: config.spanner_project.clone(),
            instance_id: config.spanner_instance.clone(),
            database_id: config.spanner_database.clone(),
        })
    }

    fn project_path(&self) -> String {
        format!("projects/{}", self.project)
    }

    fn instance_path(&self) -> String {
        format!("{}/instances/{}", self.project_path(), self.instance_id)
    }

    fn database_path(&self) -> String {
        format!("{}/databases/{}", self.instance_path(), self.database_id)
    }

    async fn run(&self) -> Result<()> {
        tracing::info!("Provisioning emulator resources for {}", self.database_path());
        self.ensure_instance().await?;
        self.ensure_database().await?;
        self.ensure_documents_table().await
    }

    async fn ensure_instance(&self) -> Result<()> {
        let lookup = GetInstanceRequest {
            name: self.instance_path(),
            field_mask: None,
        };
        match self.admin.instance().get_instance(lookup, None).await {
            Ok(_) => return Ok(()),
            Err(status) if status.code() == Code::NotFound => {}
            Err(status) => bail!(
                "Failed to look up emulator instance {}: {}",
                self.instance_path(),
                status.message()
            ),
        }

        tracing::info!("Creating emulator instance {}", self.instance_path());
        let request = CreateInstanceRequest {
            parent: self.project_path(),
            instance_id: self.instance_id.clone(),
            instance: Some(Instance {
                name: self.instance_path(),
                config: format!("{}/instanceConfigs/emulator-config", self.project_path()),
                display_name: self.instance_id.clone(),
                node_count: 1,
                ..Default::default()
            }),
        };

        let mut operation = self
            .admin
            .instance()
            .create_instance(request, None)
            .await
            .context("Failed to start instance creation")?;
        operation.wait(None).await.context("Failed to create instance")?;
        Ok(())
    }

    async fn ensure_database(&self) -> Result<()> {
        let lookup = GetDatabaseRequest {
            name: self.database_path(),
        };
        match self.admin.database().get_database(lookup, None).await {
            Ok(_) => return Ok(()),
            Err(status) if status.code() == Code::NotFound => {}
            Err(status) => bail!(
                "Failed to look up emulator database {}: {}",
                self.database_path(),
                status.message()
            ),
        }

        tracing::info!("Creating emulator database {}", self.database_path());
        let request = CreateDatabaseRequest {
            parent: self.instance_path(),
            create_statement: format!("CREATE DATABASE `{}`", self.database_id),
            extra_statements: vec![documents_table_ddl()],
            encryption_config: None,
            database_dialect: 1, // Google Standard SQL
            proto_descriptors: vec![],
        };

        let mut operation = self
            .admin
            .database()
            .create_database(request, None)
            .await
            .context("Failed to start database creation")?;
        operation.wait(None).await.context("Failed to create database")?;
        Ok(())
    }

    async fn ensure_documents_table(&self) -> Result<()> {
        let ddl = self
            .admin
            .database()
            .get_database_ddl(
                GetDatabaseDdlRequest {
                    database: self.database_path(),
                },
                None,
            )
            .await
            .context("Failed to get database DDL")?;

        if has_documents_table(&ddl.into_inner().statements) {
            return Ok(());
        }

        tracing::info!("Creating table '{}'", DOCUMENTS_TABLE);
        let request = UpdateDatabaseDdlRequest {
            database: self.database_path(),
            statements: vec![documents_table_ddl()],
            operation_id: String::new(),
            proto_descriptors: vec![],
            throughput_mode: false,
        };

        let mut operation = self
            .admin
            .database()
            .update_database_ddl(request, None)
            .await
            .context("Failed to start table creation")?;
        operation.wait(None).await.context("Failed to create table")?;
        Ok(())
    }
}

fn documents_table_ddl() -> String {
    format!(
        r#"
CREATE TABLE {DOCUMENTS_TABLE} (
    collection STRING(MAX) NOT NULL,
    id STRING(MAX) NOT NULL,
    data JSON NOT NULL,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (collection, id)
"#
    )
    .trim()
    .to_string()
}

fn has_documents_table(statements: &[String]) -> bool {
    let plain = format!("CREATE TABLE {DOCUMENTS_TABLE}");
    let quoted = format!("CREATE TABLE `{DOCUMENTS_TABLE}`");
    statements
        .iter()
        .any(|stmt| stmt.contains(&plain) || stmt.contains(&quoted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;

    fn emulator_config(instance: &str, database: &str) -> Config {
        Config {
            spanner_emulator_host: Some("localhost:9010".to_string()),
            spanner_project: "test-project".to_string(),
            spanner_instance: instance.to_string(),
            spanner_database: database.to_string(),
            collection: "sampleCollection".to_string(),
            max_instances: 10,
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
            log_format: LogFormat::Pretty,
        }
    }

    #[test]
    fn test_client_is_a_shareable_store() {
        fn assert_store<T: DocumentStore + Clone + Send + Sync + 'static>() {}
        assert_store::<SpannerClient>();
    }

    #[test]
    fn test_provisioning_only_against_emulator() {
        let mut config = emulator_config("any-instance", "any-db");
        assert!(should_provision(&config));

        config.spanner_emulator_host = None;
        assert!(!should_provision(&config));
    }

    #[test]
    fn test_documents_table_detection() {
        assert!(has_documents_table(&[documents_table_ddl()]));
        assert!(has_documents_table(&[
            "CREATE TABLE `documents` (\n  id STRING(MAX)\n) PRIMARY KEY(id)".to_string()
        ]));
        assert!(!has_documents_table(&[
            "CREATE TABLE kv_store (id STRING(36)) PRIMARY KEY (id)".to_string()
        ]));
        assert!(!has_documents_table(&[]));
    }

    #[test]
    fn test_documents_table_keyed_by_collection_and_id() {
        let ddl = documents_table_ddl();
        assert!(ddl.starts_with("CREATE TABLE documents"));
        assert!(ddl.ends_with("PRIMARY KEY (collection, id)"));
        assert!(ddl.contains("data JSON NOT NULL"));
    }

    #[tokio::test]
    async fn test_client_creation_with_emulator() {
        unsafe {
            std::env::set_var("SPANNER_EMULATOR_HOST", "localhost:9010");
        }

        let config = emulator_config("documents-test-instance", "documents-test-db");

        // Fails when no emulator is running; the error must still say where
        let result = SpannerClient::from_config(&config).await;

        unsafe {
            std::env::remove_var("SPANNER_EMULATOR_HOST");
        }

        match result {
            Ok(client) => {
                client.ping().await.expect("ping against emulator");
                let docs = client
                    .read_collection("no-such-collection")
                    .await
                    .expect("read empty collection");
                assert!(docs.is_empty());
            }
            Err(e) => {
                let error_msg = e.to_string();
                assert!(
                    error_msg.contains("Failed to create Spanner")
                        || error_msg.contains("Failed to start")
                        || error_msg.contains("Failed to look up")
                        || error_msg.contains("Failed to get database DDL")
                        || error_msg.contains("Failed to create"),
                    "Error should have context: {}",
                    error_msg
                );
            }
        }
    }
}
