//! Conversions from `aws_sdk_ecs` shapes into the exported value records.
//!
//! Enums are flattened to their wire strings and timestamps to UTC `chrono` values,
//! so the YAML output reads like the ECS API's own JSON.

use crate::domain::model;
use aws_sdk_ecs::primitives::DateTime;
use aws_sdk_ecs::types;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};

pub(crate) fn convert_all<T, U: From<T>>(items: Option<Vec<T>>) -> Option<Vec<U>> {
    items.map(|items| items.into_iter().map(U::from).collect())
}

fn timestamp(value: Option<DateTime>) -> Option<chrono::DateTime<Utc>> {
    value.and_then(|dt| chrono::DateTime::<Utc>::from_timestamp(dt.secs(), dt.subsec_nanos()))
}

fn wire<T: AsRef<str>>(value: Option<T>) -> Option<String> {
    value.map(|v| v.as_ref().to_string())
}

fn wire_all<T: AsRef<str>>(values: Option<Vec<T>>) -> Option<Vec<String>> {
    values.map(|values| values.iter().map(|v| v.as_ref().to_string()).collect())
}

// Sorted so the YAML is stable between exports.
fn sorted(map: Option<HashMap<String, String>>) -> Option<BTreeMap<String, String>> {
    map.map(|m| m.into_iter().collect())
}

impl From<types::Service> for model::ServiceDefinition {
    fn from(value: types::Service) -> Self {
        Self {
            service_arn: value.service_arn,
            service_name: value.service_name,
            cluster_arn: value.cluster_arn,
            task_definition: value.task_definition,
            status: value.status,
            desired_count: value.desired_count,
            running_count: value.running_count,
            pending_count: value.pending_count,
            launch_type: wire(value.launch_type),
            platform_version: value.platform_version,
            platform_family: value.platform_family,
            role_arn: value.role_arn,
            scheduling_strategy: wire(value.scheduling_strategy),
            health_check_grace_period_seconds: value.health_check_grace_period_seconds,
            propagate_tags: wire(value.propagate_tags),
            enable_ecs_managed_tags: value.enable_ecs_managed_tags,
            enable_execute_command: value.enable_execute_command,
            availability_zone_rebalancing: wire(value.availability_zone_rebalancing),
            capacity_provider_strategy: convert_all(value.capacity_provider_strategy),
            deployment_configuration: value.deployment_configuration.map(Into::into),
            deployment_controller: value.deployment_controller.map(|controller| {
                model::DeploymentController {
                    kind: controller.r#type.as_str().to_string(),
                }
            }),
            network_configuration: value.network_configuration.map(Into::into),
            placement_constraints: convert_all(value.placement_constraints),
            placement_strategy: convert_all(value.placement_strategy),
            load_balancers: convert_all(value.load_balancers),
            service_registries: convert_all(value.service_registries),
            deployments: convert_all(value.deployments),
            task_sets: convert_all(value.task_sets),
            current_service_deployment: value.current_service_deployment,
            current_service_revisions: convert_all(value.current_service_revisions),
            events: convert_all(value.events),
            created_at: timestamp(value.created_at),
            created_by: value.created_by,
            tags: convert_all(value.tags),
        }
    }
}

impl From<types::TaskDefinition> for model::TaskDefinitionRecord {
    fn from(value: types::TaskDefinition) -> Self {
        Self {
            task_definition_arn: value.task_definition_arn,
            family: value.family,
            revision: value.revision,
            status: wire(value.status),
            task_role_arn: value.task_role_arn,
            execution_role_arn: value.execution_role_arn,
            network_mode: wire(value.network_mode),
            cpu: value.cpu,
            memory: value.memory,
            pid_mode: wire(value.pid_mode),
            ipc_mode: wire(value.ipc_mode),
            requires_compatibilities: wire_all(value.requires_compatibilities),
            compatibilities: wire_all(value.compatibilities),
            requires_attributes: convert_all(value.requires_attributes),
            runtime_platform: value.runtime_platform.map(Into::into),
            ephemeral_storage: value
                .ephemeral_storage
                .map(|storage| model::EphemeralStorage {
                    size_in_gib: storage.size_in_gib,
                }),
            container_definitions: convert_all(value.container_definitions),
            volumes: convert_all(value.volumes),
            placement_constraints: convert_all(value.placement_constraints),
            inference_accelerators: convert_all(value.inference_accelerators),
            proxy_configuration: value.proxy_configuration.map(Into::into),
            enable_fault_injection: value.enable_fault_injection,
            registered_at: timestamp(value.registered_at),
            registered_by: value.registered_by,
            deregistered_at: timestamp(value.deregistered_at),
            // Tags travel next to the definition in the describe response.
            tags: None,
        }
    }
}

impl From<types::Tag> for model::Tag {
    fn from(value: types::Tag) -> Self {
        Self {
            key: value.key,
            value: value.value,
        }
    }
}

impl From<types::LoadBalancer> for model::LoadBalancer {
    fn from(value: types::LoadBalancer) -> Self {
        Self {
            target_group_arn: value.target_group_arn,
            load_balancer_name: value.load_balancer_name,
            container_name: value.container_name,
            container_port: value.container_port,
        }
    }
}

impl From<types::ServiceRegistry> for model::ServiceRegistry {
    fn from(value: types::ServiceRegistry) -> Self {
        Self {
            registry_arn: value.registry_arn,
            port: value.port,
            container_name: value.container_name,
            container_port: value.container_port,
        }
    }
}

impl From<types::CapacityProviderStrategyItem> for model::CapacityProviderStrategyItem {
    fn from(value: types::CapacityProviderStrategyItem) -> Self {
        Self {
            capacity_provider: value.capacity_provider,
            weight: value.weight,
            base: value.base,
        }
    }
}

impl From<types::DeploymentConfiguration> for model::DeploymentConfiguration {
    fn from(value: types::DeploymentConfiguration) -> Self {
        Self {
            maximum_percent: value.maximum_percent,
            minimum_healthy_percent: value.minimum_healthy_percent,
            deployment_circuit_breaker: value.deployment_circuit_breaker.map(|breaker| {
                model::DeploymentCircuitBreaker {
                    enable: breaker.enable,
                    rollback: breaker.rollback,
                }
            }),
            alarms: value.alarms.map(|alarms| model::DeploymentAlarms {
                alarm_names: alarms.alarm_names,
                rollback: alarms.rollback,
                enable: alarms.enable,
            }),
            strategy: wire(value.strategy),
            bake_time_in_minutes: value.bake_time_in_minutes,
            lifecycle_hooks: convert_all(value.lifecycle_hooks),
        }
    }
}

impl From<types::DeploymentLifecycleHook> for model::DeploymentLifecycleHook {
    fn from(value: types::DeploymentLifecycleHook) -> Self {
        Self {
            hook_target_arn: value.hook_target_arn,
            role_arn: value.role_arn,
            lifecycle_stages: wire_all(value.lifecycle_stages),
        }
    }
}

impl From<types::NetworkConfiguration> for model::NetworkConfiguration {
    fn from(value: types::NetworkConfiguration) -> Self {
        Self {
            awsvpc_configuration: value
                .awsvpc_configuration
                .map(|vpc| model::AwsVpcConfiguration {
                    subnets: vpc.subnets,
                    security_groups: vpc.security_groups,
                    assign_public_ip: wire(vpc.assign_public_ip),
                }),
        }
    }
}

impl From<types::PlacementConstraint> for model::PlacementConstraint {
    fn from(value: types::PlacementConstraint) -> Self {
        Self {
            kind: wire(value.r#type),
            expression: value.expression,
        }
    }
}

impl From<types::TaskDefinitionPlacementConstraint> for model::PlacementConstraint {
    fn from(value: types::TaskDefinitionPlacementConstraint) -> Self {
        Self {
            kind: wire(value.r#type),
            expression: value.expression,
        }
    }
}

impl From<types::PlacementStrategy> for model::PlacementStrategy {
    fn from(value: types::PlacementStrategy) -> Self {
        Self {
            kind: wire(value.r#type),
            field: value.field,
        }
    }
}

impl From<types::Deployment> for model::Deployment {
    fn from(value: types::Deployment) -> Self {
        Self {
            id: value.id,
            status: value.status,
            task_definition: value.task_definition,
            desired_count: value.desired_count,
            pending_count: value.pending_count,
            running_count: value.running_count,
            failed_tasks: value.failed_tasks,
            rollout_state: wire(value.rollout_state),
            rollout_state_reason: value.rollout_state_reason,
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

impl From<types::TaskSet> for model::TaskSet {
    fn from(value: types::TaskSet) -> Self {
        Self {
            id: value.id,
            task_set_arn: value.task_set_arn,
            status: value.status,
            task_definition: value.task_definition,
            external_id: value.external_id,
            computed_desired_count: value.computed_desired_count,
            pending_count: value.pending_count,
            running_count: value.running_count,
        }
    }
}

impl From<types::ServiceEvent> for model::ServiceEvent {
    fn from(value: types::ServiceEvent) -> Self {
        Self {
            id: value.id,
            created_at: timestamp(value.created_at),
            message: value.message,
        }
    }
}

impl From<types::ServiceCurrentRevisionSummary> for model::ServiceCurrentRevisionSummary {
    fn from(value: types::ServiceCurrentRevisionSummary) -> Self {
        Self {
            arn: value.arn,
            requested_task_count: value.requested_task_count,
            running_task_count: value.running_task_count,
            pending_task_count: value.pending_task_count,
        }
    }
}

impl From<types::RuntimePlatform> for model::RuntimePlatform {
    fn from(value: types::RuntimePlatform) -> Self {
        Self {
            cpu_architecture: wire(value.cpu_architecture),
            operating_system_family: wire(value.operating_system_family),
        }
    }
}

impl From<types::Volume> for model::Volume {
    fn from(value: types::Volume) -> Self {
        Self {
            name: value.name,
            host: value.host.map(|host| model::HostVolumeProperties {
                source_path: host.source_path,
            }),
            docker_volume_configuration: value.docker_volume_configuration.map(Into::into),
            efs_volume_configuration: value.efs_volume_configuration.map(Into::into),
            fsx_windows_file_server_volume_configuration: value
                .fsx_windows_file_server_volume_configuration
                .map(Into::into),
            configured_at_launch: value.configured_at_launch,
        }
    }
}

impl From<types::DockerVolumeConfiguration> for model::DockerVolumeConfiguration {
    fn from(value: types::DockerVolumeConfiguration) -> Self {
        Self {
            scope: wire(value.scope),
            autoprovision: value.autoprovision,
            driver: value.driver,
            driver_opts: sorted(value.driver_opts),
            labels: sorted(value.labels),
        }
    }
}

impl From<types::EfsVolumeConfiguration> for model::EfsVolumeConfiguration {
    fn from(value: types::EfsVolumeConfiguration) -> Self {
        Self {
            file_system_id: value.file_system_id,
            root_directory: value.root_directory,
            transit_encryption: wire(value.transit_encryption),
            transit_encryption_port: value.transit_encryption_port,
            authorization_config: value.authorization_config.map(|auth| {
                model::EfsAuthorizationConfig {
                    access_point_id: auth.access_point_id,
                    iam: wire(auth.iam),
                }
            }),
        }
    }
}

impl From<types::FSxWindowsFileServerVolumeConfiguration>
    for model::FsxWindowsFileServerVolumeConfiguration
{
    fn from(value: types::FSxWindowsFileServerVolumeConfiguration) -> Self {
        Self {
            file_system_id: value.file_system_id,
            root_directory: value.root_directory,
            authorization_config: value.authorization_config.map(|auth| {
                model::FsxWindowsFileServerAuthorizationConfig {
                    credentials_parameter: auth.credentials_parameter,
                    domain: auth.domain,
                }
            }),
        }
    }
}

impl From<types::Attribute> for model::Attribute {
    fn from(value: types::Attribute) -> Self {
        Self {
            name: value.name,
            value: value.value,
            target_type: wire(value.target_type),
            target_id: value.target_id,
        }
    }
}

impl From<types::InferenceAccelerator> for model::InferenceAccelerator {
    fn from(value: types::InferenceAccelerator) -> Self {
        Self {
            device_name: value.device_name,
            device_type: value.device_type,
        }
    }
}

impl From<types::ProxyConfiguration> for model::ProxyConfiguration {
    fn from(value: types::ProxyConfiguration) -> Self {
        Self {
            kind: wire(value.r#type),
            container_name: value.container_name,
            properties: convert_all(value.properties),
        }
    }
}

impl From<types::ContainerDefinition> for model::ContainerDefinition {
    fn from(value: types::ContainerDefinition) -> Self {
        Self {
            name: value.name,
            image: value.image,
            repository_credentials: value.repository_credentials.map(|credentials| {
                model::RepositoryCredentials {
                    credentials_parameter: credentials.credentials_parameter,
                }
            }),
            cpu: value.cpu,
            memory: value.memory,
            memory_reservation: value.memory_reservation,
            essential: value.essential,
            restart_policy: value
                .restart_policy
                .map(|policy| model::ContainerRestartPolicy {
                    enabled: policy.enabled,
                    ignored_exit_codes: policy.ignored_exit_codes,
                    restart_attempt_period: policy.restart_attempt_period,
                }),
            entry_point: value.entry_point,
            command: value.command,
            working_directory: value.working_directory,
            user: value.user,
            links: value.links,
            port_mappings: convert_all(value.port_mappings),
            environment: convert_all(value.environment),
            environment_files: convert_all(value.environment_files),
            secrets: convert_all(value.secrets),
            mount_points: convert_all(value.mount_points),
            volumes_from: convert_all(value.volumes_from),
            linux_parameters: value.linux_parameters.map(Into::into),
            depends_on: convert_all(value.depends_on),
            version_consistency: wire(value.version_consistency),
            hostname: value.hostname,
            disable_networking: value.disable_networking,
            dns_servers: value.dns_servers,
            dns_search_domains: value.dns_search_domains,
            extra_hosts: convert_all(value.extra_hosts),
            docker_security_options: value.docker_security_options,
            interactive: value.interactive,
            pseudo_terminal: value.pseudo_terminal,
            log_configuration: value.log_configuration.map(Into::into),
            health_check: value.health_check.map(Into::into),
            ulimits: convert_all(value.ulimits),
            docker_labels: sorted(value.docker_labels),
            readonly_root_filesystem: value.readonly_root_filesystem,
            privileged: value.privileged,
            start_timeout: value.start_timeout,
            stop_timeout: value.stop_timeout,
            system_controls: convert_all(value.system_controls),
            resource_requirements: convert_all(value.resource_requirements),
            firelens_configuration: value.firelens_configuration.map(|firelens| {
                model::FirelensConfiguration {
                    kind: firelens.r#type.as_str().to_string(),
                    options: sorted(firelens.options),
                }
            }),
            credential_specs: value.credential_specs,
        }
    }
}

impl From<types::LinuxParameters> for model::LinuxParameters {
    fn from(value: types::LinuxParameters) -> Self {
        Self {
            capabilities: value
                .capabilities
                .map(|capabilities| model::KernelCapabilities {
                    add: capabilities.add,
                    drop: capabilities.drop,
                }),
            devices: convert_all(value.devices),
            init_process_enabled: value.init_process_enabled,
            shared_memory_size: value.shared_memory_size,
            tmpfs: convert_all(value.tmpfs),
            max_swap: value.max_swap,
            swappiness: value.swappiness,
        }
    }
}

impl From<types::Device> for model::Device {
    fn from(value: types::Device) -> Self {
        Self {
            host_path: value.host_path,
            container_path: value.container_path,
            permissions: wire_all(value.permissions),
        }
    }
}

impl From<types::Tmpfs> for model::Tmpfs {
    fn from(value: types::Tmpfs) -> Self {
        Self {
            container_path: value.container_path,
            size: value.size,
            mount_options: value.mount_options,
        }
    }
}

impl From<types::HostEntry> for model::HostEntry {
    fn from(value: types::HostEntry) -> Self {
        Self {
            hostname: value.hostname,
            ip_address: value.ip_address,
        }
    }
}

impl From<types::SystemControl> for model::SystemControl {
    fn from(value: types::SystemControl) -> Self {
        Self {
            namespace: value.namespace,
            value: value.value,
        }
    }
}

impl From<types::ResourceRequirement> for model::ResourceRequirement {
    fn from(value: types::ResourceRequirement) -> Self {
        Self {
            value: value.value,
            kind: value.r#type.as_str().to_string(),
        }
    }
}

impl From<types::PortMapping> for model::PortMapping {
    fn from(value: types::PortMapping) -> Self {
        Self {
            name: value.name,
            container_port: value.container_port,
            host_port: value.host_port,
            protocol: wire(value.protocol),
            app_protocol: wire(value.app_protocol),
            container_port_range: value.container_port_range,
            host_port_range: None, // not present on aws_sdk_ecs::types::PortMapping
        }
    }
}

impl From<types::KeyValuePair> for model::KeyValuePair {
    fn from(value: types::KeyValuePair) -> Self {
        Self {
            name: value.name,
            value: value.value,
        }
    }
}

impl From<types::EnvironmentFile> for model::EnvironmentFile {
    fn from(value: types::EnvironmentFile) -> Self {
        Self {
            value: value.value,
            kind: value.r#type.as_str().to_string(),
        }
    }
}

impl From<types::Secret> for model::Secret {
    fn from(value: types::Secret) -> Self {
        Self {
            name: value.name,
            value_from: value.value_from,
        }
    }
}

impl From<types::MountPoint> for model::MountPoint {
    fn from(value: types::MountPoint) -> Self {
        Self {
            source_volume: value.source_volume,
            container_path: value.container_path,
            read_only: value.read_only,
        }
    }
}

impl From<types::VolumeFrom> for model::VolumeFrom {
    fn from(value: types::VolumeFrom) -> Self {
        Self {
            source_container: value.source_container,
            read_only: value.read_only,
        }
    }
}

impl From<types::ContainerDependency> for model::ContainerDependency {
    fn from(value: types::ContainerDependency) -> Self {
        Self {
            container_name: value.container_name,
            condition: value.condition.as_str().to_string(),
        }
    }
}

impl From<types::LogConfiguration> for model::LogConfiguration {
    fn from(value: types::LogConfiguration) -> Self {
        Self {
            log_driver: value.log_driver.as_str().to_string(),
            options: sorted(value.options),
            secret_options: convert_all(value.secret_options),
        }
    }
}

impl From<types::HealthCheck> for model::HealthCheck {
    fn from(value: types::HealthCheck) -> Self {
        Self {
            command: value.command,
            interval: value.interval,
            timeout: value.timeout,
            retries: value.retries,
            start_period: value.start_period,
        }
    }
}

impl From<types::Ulimit> for model::Ulimit {
    fn from(value: types::Ulimit) -> Self {
        Self {
            name: value.name.as_str().to_string(),
            soft_limit: value.soft_limit,
            hard_limit: value.hard_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ecs::types::{LaunchType, TaskDefinitionStatus};

    #[test]
    fn test_service_conversion_keeps_identity_and_counts() {
        let service = types::Service::builder()
            .service_arn("arn:aws:ecs:us-east-1:123456789012:service/prod/web")
            .service_name("web")
            .task_definition("arn:aws:ecs:us-east-1:123456789012:task-definition/web:12")
            .status("ACTIVE")
            .desired_count(3)
            .running_count(2)
            .pending_count(1)
            .launch_type(LaunchType::Fargate)
            .created_at(DateTime::from_secs(1_700_000_000))
            .tags(types::Tag::builder().key("team").value("platform").build())
            .build();

        let record = model::ServiceDefinition::from(service);

        assert_eq!(record.name(), Some("web"));
        assert_eq!(record.desired_count, 3);
        assert_eq!(record.running_count, 2);
        assert_eq!(record.launch_type.as_deref(), Some("FARGATE"));
        assert_eq!(
            record.created_at.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
        assert_eq!(
            record.tags,
            Some(vec![model::Tag {
                key: Some("team".to_string()),
                value: Some("platform".to_string()),
            }])
        );
        assert!(record.deployments.is_none());
    }

    #[test]
    fn test_task_definition_conversion_maps_containers() {
        let definition = types::TaskDefinition::builder()
            .family("web")
            .revision(12)
            .status(TaskDefinitionStatus::Active)
            .cpu("256")
            .memory("512")
            .container_definitions(
                types::ContainerDefinition::builder()
                    .name("web")
                    .image("nginx:1.27")
                    .cpu(128)
                    .essential(true)
                    .environment(
                        types::KeyValuePair::builder()
                            .name("PORT")
                            .value("8080")
                            .build(),
                    )
                    .build(),
            )
            .registered_by("arn:aws:iam::123456789012:role/deployer")
            .build();

        let record = model::TaskDefinitionRecord::from(definition);

        assert_eq!(record.label(), "web:12");
        assert_eq!(record.status.as_deref(), Some("ACTIVE"));
        assert!(record.tags.is_none());

        let containers = record.container_definitions.unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].image.as_deref(), Some("nginx:1.27"));
        assert_eq!(containers[0].cpu, 128);
        assert_eq!(containers[0].essential, Some(true));
        assert_eq!(
            containers[0].environment.as_ref().unwrap()[0].value.as_deref(),
            Some("8080")
        );
    }

    #[test]
    fn test_sorted_labels_are_stable() {
        let mut labels = HashMap::new();
        labels.insert("b".to_string(), "2".to_string());
        labels.insert("a".to_string(), "1".to_string());

        let sorted = sorted(Some(labels)).unwrap();
        let keys: Vec<_> = sorted.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
