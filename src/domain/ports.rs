use crate::domain::model::{ServiceDefinition, TaskDefinitionRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Outbound calls to the orchestration provider. One round trip per call, no retries.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Service ARNs of `cluster`, in the order the provider returned them.
    async fn list_services(&self, cluster: &str) -> Result<Vec<String>>;

    async fn describe_service(&self, cluster: &str, service: &str) -> Result<ServiceDefinition>;

    async fn describe_task_definition(&self, task_definition: &str)
        -> Result<TaskDefinitionRecord>;
}

/// Where exported files land. Paths are relative to the storage root.
pub trait Storage: Send + Sync {
    /// Display form of the root, used in progress output.
    fn root(&self) -> &str;

    /// Creates the root (non-recursively) if missing. Returns `true` when it was created.
    fn ensure_root(&self) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Creates `path` under the root. Fails if it already exists.
    fn create_dir(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn cluster(&self) -> &str;
    fn output_path(&self) -> &str;
}
