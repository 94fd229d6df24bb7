use crate::core::redact::{redact_service, redact_task_definition};
use crate::core::{ClusterClient, ConfigProvider, Storage};
use crate::domain::model::{ServiceDefinition, TaskDefinitionRecord};
use crate::utils::error::{ExportError, Result};

pub const SERVICE_FILE: &str = "servicedef.yaml";
pub const TASK_DEFINITION_FILE: &str = "taskdef.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub output_root: String,
    /// Service names, in export order.
    pub exported: Vec<String>,
}

/// Fetches every service of one cluster plus its task definition and writes both
/// as YAML under `<root>/<service name>/`.
///
/// Stops at the first error. Whatever was exported before that stays on disk.
pub struct Exporter<C: ClusterClient, S: Storage, P: ConfigProvider> {
    client: C,
    storage: S,
    config: P,
}

impl<C: ClusterClient, S: Storage, P: ConfigProvider> Exporter<C, S, P> {
    pub fn new(client: C, storage: S, config: P) -> Self {
        Self {
            client,
            storage,
            config,
        }
    }

    pub async fn run(&self) -> Result<ExportSummary> {
        if self.storage.ensure_root().await? {
            println!("Created a directory {}", self.storage.root());
        }

        let cluster = self.config.cluster();
        tracing::info!("Listing services in cluster {}", cluster);
        let service_arns = self.client.list_services(cluster).await?;
        println!("Found {} services", service_arns.len());

        let mut exported = Vec::with_capacity(service_arns.len());
        for (i, service_arn) in service_arns.iter().enumerate() {
            tracing::debug!("Describing service {}", service_arn);
            let service = self.client.describe_service(cluster, service_arn).await?;

            let task_definition_ref =
                service
                    .task_definition
                    .clone()
                    .ok_or_else(|| ExportError::IncompleteRecord {
                        record: format!("service {}", service_arn),
                        field: "task definition",
                    })?;
            tracing::debug!("Describing task definition {}", task_definition_ref);
            let task_definition = self
                .client
                .describe_task_definition(&task_definition_ref)
                .await?;

            let service = redact_service(service);
            let task_definition = redact_task_definition(task_definition);

            let name = self.export(&service, &task_definition).await?;
            println!(" {}. Export succeeded: {}", i + 1, name);
            exported.push(name);
        }

        println!("Successfully finished exporting.");
        tracing::info!(
            "✅ Exported {} services from {} to {}",
            exported.len(),
            cluster,
            self.storage.root()
        );

        Ok(ExportSummary {
            output_root: self.storage.root().to_string(),
            exported,
        })
    }

    /// Writes one service and its task definition. Returns the service name.
    ///
    /// The service directory must not exist yet; there is no overwrite.
    pub async fn export(
        &self,
        service: &ServiceDefinition,
        task_definition: &TaskDefinitionRecord,
    ) -> Result<String> {
        let name = service
            .name()
            .ok_or_else(|| ExportError::IncompleteRecord {
                record: format!(
                    "service {}",
                    service.service_arn.as_deref().unwrap_or("<unknown>")
                ),
                field: "name",
            })?
            .to_string();

        self.storage.create_dir(&name).await?;

        let service_yaml =
            serde_yaml::to_string(service).map_err(|source| ExportError::Serialization {
                record: format!("service {}", name),
                source,
            })?;
        self.storage
            .write_file(&format!("{}/{}", name, SERVICE_FILE), service_yaml.as_bytes())
            .await?;

        let task_definition_yaml =
            serde_yaml::to_string(task_definition).map_err(|source| {
                ExportError::Serialization {
                    record: format!("task definition {}", task_definition.label()),
                    source,
                }
            })?;
        self.storage
            .write_file(
                &format!("{}/{}", name, TASK_DEFINITION_FILE),
                task_definition_yaml.as_bytes(),
            )
            .await?;

        tracing::debug!(
            "Wrote {} and {} for {}",
            SERVICE_FILE,
            TASK_DEFINITION_FILE,
            name
        );
        Ok(name)
    }
}
