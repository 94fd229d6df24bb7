pub mod adapters;
#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{EcsClusterClient, LocalStorage};
pub use core::exporter::{ExportSummary, Exporter, SERVICE_FILE, TASK_DEFINITION_FILE};
pub use utils::error::{ExportError, Result};
