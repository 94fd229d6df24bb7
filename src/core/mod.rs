pub mod exporter;
pub mod redact;

pub use crate::domain::model::{ServiceDefinition, TaskDefinitionRecord};
pub use crate::domain::ports::{ClusterClient, ConfigProvider, Storage};
pub use crate::utils::error::Result;
