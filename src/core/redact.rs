//! Clears server-assigned and time-varying fields so that repeated exports of an
//! unchanged service produce identical files.
//!
//! Both functions consume the record and hand back the redacted value. They only
//! overwrite fields, so applying them twice is the same as applying them once.

use crate::domain::model::{ServiceDefinition, TaskDefinitionRecord};

pub fn redact_service(service: ServiceDefinition) -> ServiceDefinition {
    ServiceDefinition {
        created_at: None,
        created_by: None,
        deployments: None,
        events: None,
        load_balancers: None,
        task_sets: None,
        current_service_deployment: None,
        current_service_revisions: None,
        running_count: 0,
        pending_count: 0,
        status: None,
        ..service
    }
}

/// `status` is kept on purpose; ACTIVE/INACTIVE is left in the export.
pub fn redact_task_definition(task_definition: TaskDefinitionRecord) -> TaskDefinitionRecord {
    TaskDefinitionRecord {
        deregistered_at: None,
        registered_at: None,
        registered_by: None,
        ..task_definition
    }
}
