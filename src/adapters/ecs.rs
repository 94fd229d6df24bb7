use crate::adapters::convert::convert_all;
use crate::core::{ClusterClient, ServiceDefinition, TaskDefinitionRecord};
use crate::utils::error::{ExportError, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ecs::config::Region;
use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ecs::types::{ServiceField, TaskDefinitionField};
use aws_sdk_ecs::Client as EcsClient;

/// [`ClusterClient`] backed by the ECS API.
#[derive(Debug, Clone)]
pub struct EcsClusterClient {
    client: EcsClient,
}

impl EcsClusterClient {
    pub fn new(client: EcsClient) -> Self {
        Self { client }
    }

    /// Builds a client from the SDK's default credential and region chain.
    /// `region` wins over whatever the environment resolves to.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let config = loader.load().await;
        tracing::debug!(
            "ECS client region: {}",
            config
                .region()
                .map(|r| r.as_ref().to_string())
                .unwrap_or_else(|| "<unresolved>".to_string())
        );

        Self::new(EcsClient::new(&config))
    }
}

#[async_trait]
impl ClusterClient for EcsClusterClient {
    async fn list_services(&self, cluster: &str) -> Result<Vec<String>> {
        let output = self
            .client
            .list_services()
            .cluster(cluster)
            .send()
            .await
            .map_err(|e| provider_error("ListServices", e))?;

        // Only the first page is exported.
        if output.next_token.is_some() {
            tracing::warn!(
                "Cluster {} has more services than one ListServices page; only the first page is exported",
                cluster
            );
        }

        Ok(output.service_arns.unwrap_or_default())
    }

    async fn describe_service(&self, cluster: &str, service: &str) -> Result<ServiceDefinition> {
        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .services(service)
            .include(ServiceField::Tags)
            .send()
            .await
            .map_err(|e| provider_error("DescribeServices", e))?;

        for failure in output.failures.iter().flatten() {
            tracing::debug!(
                "DescribeServices failure for {}: {}",
                failure.arn.as_deref().unwrap_or(service),
                failure.reason.as_deref().unwrap_or("unknown reason")
            );
        }

        output
            .services
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(ServiceDefinition::from)
            .ok_or_else(|| ExportError::ServiceNotFound {
                service: service.to_string(),
            })
    }

    async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> Result<TaskDefinitionRecord> {
        let output = self
            .client
            .describe_task_definition()
            .task_definition(task_definition)
            .include(TaskDefinitionField::Tags)
            .send()
            .await
            .map_err(|e| provider_error("DescribeTaskDefinition", e))?;

        let definition = output.task_definition.ok_or_else(|| ExportError::Provider {
            operation: "DescribeTaskDefinition",
            code: None,
            message: format!("no task definition returned for {}", task_definition),
        })?;

        let mut record = TaskDefinitionRecord::from(definition);
        record.tags = convert_all(output.tags);
        Ok(record)
    }
}

fn provider_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> ExportError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    tracing::debug!("{} failed: {}", operation, DisplayErrorContext(&err));
    ExportError::Provider {
        operation,
        code: err.code().map(str::to_string),
        message: err
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| DisplayErrorContext(&err).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_smithy_mocks::{mock, mock_client};
    use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
    use aws_smithy_runtime_api::http::StatusCode;
    use aws_smithy_types::body::SdkBody;

    const SERVICE_ARN: &str = "arn:aws:ecs:us-east-1:123456789012:service/prod/web";

    const DESCRIBE_SERVICES: &str = r#"{
      "services": [{
        "serviceArn": "arn:aws:ecs:us-east-1:123456789012:service/prod/web",
        "serviceName": "web",
        "clusterArn": "arn:aws:ecs:us-east-1:123456789012:cluster/prod",
        "loadBalancers": [{
          "targetGroupArn": "arn:aws:elasticloadbalancing:us-east-1:123456789012:targetgroup/web/1",
          "loadBalancerName": "web",
          "containerName": "web",
          "containerPort": 8080
        }],
        "serviceRegistries": [{
          "registryArn": "arn:aws:servicediscovery:us-east-1:123456789012:service/srv-1",
          "port": 8080,
          "containerName": "web",
          "containerPort": 8080
        }],
        "status": "ACTIVE",
        "desiredCount": 2,
        "runningCount": 2,
        "pendingCount": 0,
        "launchType": "FARGATE",
        "capacityProviderStrategy": [{"capacityProvider": "FARGATE_SPOT", "weight": 1, "base": 0}],
        "platformVersion": "1.4.0",
        "platformFamily": "Linux",
        "taskDefinition": "arn:aws:ecs:us-east-1:123456789012:task-definition/web:12",
        "deploymentConfiguration": {
          "deploymentCircuitBreaker": {"enable": true, "rollback": true},
          "maximumPercent": 200,
          "minimumHealthyPercent": 100,
          "alarms": {"alarmNames": ["web-5xx"], "rollback": true, "enable": true},
          "strategy": "BLUE_GREEN",
          "bakeTimeInMinutes": 5,
          "lifecycleHooks": [{
            "hookTargetArn": "arn:aws:lambda:us-east-1:123456789012:function:smoke-test",
            "roleArn": "arn:aws:iam::123456789012:role/ecs-hooks",
            "lifecycleStages": ["POST_TEST_TRAFFIC_SHIFT"]
          }]
        },
        "taskSets": [{
          "id": "ecs-svc/1",
          "taskSetArn": "arn:aws:ecs:us-east-1:123456789012:task-set/prod/web/ecs-svc/1",
          "status": "PRIMARY",
          "taskDefinition": "arn:aws:ecs:us-east-1:123456789012:task-definition/web:12",
          "externalId": "deploy-1",
          "computedDesiredCount": 2,
          "pendingCount": 0,
          "runningCount": 2
        }],
        "deployments": [{
          "id": "ecs-svc/2",
          "status": "PRIMARY",
          "taskDefinition": "arn:aws:ecs:us-east-1:123456789012:task-definition/web:12",
          "desiredCount": 2,
          "pendingCount": 0,
          "runningCount": 2,
          "failedTasks": 0,
          "rolloutState": "COMPLETED",
          "rolloutStateReason": "ECS deployment ecs-svc/2 completed."
        }],
        "roleArn": "arn:aws:iam::123456789012:role/ecsServiceRole",
        "events": [{"id": "evt-1", "message": "(service web) has reached a steady state."}],
        "createdAt": 1700000000,
        "currentServiceDeployment": "arn:aws:ecs:us-east-1:123456789012:service-deployment/prod/web/1",
        "currentServiceRevisions": [{
          "arn": "arn:aws:ecs:us-east-1:123456789012:service-revision/prod/web/1",
          "requestedTaskCount": 2,
          "runningTaskCount": 2,
          "pendingTaskCount": 0
        }],
        "placementConstraints": [{"type": "distinctInstance"}],
        "placementStrategy": [{"type": "spread", "field": "attribute:ecs.availability-zone"}],
        "networkConfiguration": {
          "awsvpcConfiguration": {
            "subnets": ["subnet-1"],
            "securityGroups": ["sg-1"],
            "assignPublicIp": "DISABLED"
          }
        },
        "healthCheckGracePeriodSeconds": 60,
        "schedulingStrategy": "REPLICA",
        "deploymentController": {"type": "ECS"},
        "tags": [{"key": "team", "value": "platform"}],
        "createdBy": "arn:aws:iam::123456789012:role/deployer",
        "enableECSManagedTags": true,
        "propagateTags": "SERVICE",
        "enableExecuteCommand": false,
        "availabilityZoneRebalancing": "ENABLED"
      }],
      "failures": []
    }"#;

    const DESCRIBE_TASK_DEFINITION: &str = r#"{
      "taskDefinition": {
        "taskDefinitionArn": "arn:aws:ecs:us-east-1:123456789012:task-definition/web:12",
        "family": "web",
        "revision": 12,
        "status": "ACTIVE",
        "taskRoleArn": "arn:aws:iam::123456789012:role/web-task",
        "executionRoleArn": "arn:aws:iam::123456789012:role/web-exec",
        "networkMode": "awsvpc",
        "cpu": "256",
        "memory": "512",
        "pidMode": "task",
        "ipcMode": "none",
        "requiresCompatibilities": ["FARGATE"],
        "compatibilities": ["EC2", "FARGATE"],
        "requiresAttributes": [{
          "name": "com.amazonaws.ecs.capability.docker-remote-api.1.19",
          "value": "true",
          "targetType": "container-instance",
          "targetId": "i-0123456789"
        }],
        "runtimePlatform": {"cpuArchitecture": "ARM64", "operatingSystemFamily": "LINUX"},
        "ephemeralStorage": {"sizeInGiB": 30},
        "placementConstraints": [{"type": "memberOf", "expression": "attribute:ecs.instance-type =~ t3.*"}],
        "inferenceAccelerators": [{"deviceName": "device1", "deviceType": "eia2.medium"}],
        "proxyConfiguration": {
          "type": "APPMESH",
          "containerName": "envoy",
          "properties": [{"name": "AppPorts", "value": "8080"}]
        },
        "enableFaultInjection": true,
        "registeredAt": 1690000000,
        "registeredBy": "arn:aws:iam::123456789012:role/deployer",
        "volumes": [
          {"name": "data", "host": {"sourcePath": "/var/data"}},
          {
            "name": "docker",
            "dockerVolumeConfiguration": {
              "scope": "shared",
              "autoprovision": true,
              "driver": "local",
              "driverOpts": {"type": "nfs"},
              "labels": {"team": "platform"}
            }
          },
          {
            "name": "efs",
            "efsVolumeConfiguration": {
              "fileSystemId": "fs-1234",
              "rootDirectory": "/",
              "transitEncryption": "ENABLED",
              "transitEncryptionPort": 2049,
              "authorizationConfig": {"accessPointId": "fsap-1", "iam": "ENABLED"}
            }
          },
          {
            "name": "fsx",
            "fsxWindowsFileServerVolumeConfiguration": {
              "fileSystemId": "fs-5678",
              "rootDirectory": "share",
              "authorizationConfig": {
                "credentialsParameter": "arn:aws:secretsmanager:us-east-1:123456789012:secret:fsx",
                "domain": "corp.example.com"
              }
            }
          },
          {"name": "ebs", "configuredAtLaunch": true}
        ],
        "containerDefinitions": [{
          "name": "web",
          "image": "registry.example.com/web:12",
          "repositoryCredentials": {
            "credentialsParameter": "arn:aws:secretsmanager:us-east-1:123456789012:secret:registry"
          },
          "cpu": 128,
          "memory": 512,
          "memoryReservation": 256,
          "essential": true,
          "restartPolicy": {"enabled": true, "ignoredExitCodes": [0, 137], "restartAttemptPeriod": 300},
          "entryPoint": ["/bin/sh", "-c"],
          "command": ["./serve"],
          "workingDirectory": "/srv",
          "user": "1000",
          "links": ["db"],
          "portMappings": [
            {"name": "http", "containerPort": 8080, "hostPort": 8080, "protocol": "tcp", "appProtocol": "http"},
            {"protocol": "udp", "containerPortRange": "9000-9010", "hostPortRange": "9000-9010"}
          ],
          "environment": [{"name": "PORT", "value": "8080"}],
          "environmentFiles": [{"value": "arn:aws:s3:::config/web.env", "type": "s3"}],
          "secrets": [{"name": "DB_PASSWORD", "valueFrom": "arn:aws:ssm:us-east-1:123456789012:parameter/db"}],
          "mountPoints": [{"sourceVolume": "data", "containerPath": "/data", "readOnly": false}],
          "volumesFrom": [{"sourceContainer": "sidecar", "readOnly": true}],
          "linuxParameters": {
            "capabilities": {"add": ["SYS_PTRACE"], "drop": ["NET_RAW"]},
            "devices": [{"hostPath": "/dev/fuse", "containerPath": "/dev/fuse", "permissions": ["read", "write"]}],
            "initProcessEnabled": true,
            "sharedMemorySize": 64,
            "tmpfs": [{"containerPath": "/tmp", "size": 128, "mountOptions": ["noexec"]}],
            "maxSwap": 1024,
            "swappiness": 10
          },
          "dependsOn": [{"containerName": "sidecar", "condition": "START"}],
          "versionConsistency": "enabled",
          "hostname": "web",
          "disableNetworking": false,
          "dnsServers": ["10.0.0.2"],
          "dnsSearchDomains": ["internal"],
          "extraHosts": [{"hostname": "db.internal", "ipAddress": "10.0.0.5"}],
          "dockerSecurityOptions": ["no-new-privileges"],
          "interactive": false,
          "pseudoTerminal": false,
          "logConfiguration": {
            "logDriver": "awslogs",
            "options": {"awslogs-group": "/ecs/web"},
            "secretOptions": [{"name": "token", "valueFrom": "arn:aws:ssm:us-east-1:123456789012:parameter/token"}]
          },
          "healthCheck": {
            "command": ["CMD-SHELL", "curl -f http://localhost:8080/ || exit 1"],
            "interval": 30,
            "timeout": 5,
            "retries": 3,
            "startPeriod": 10
          },
          "ulimits": [{"name": "nofile", "softLimit": 1024, "hardLimit": 4096}],
          "dockerLabels": {"team": "platform"},
          "readonlyRootFilesystem": true,
          "privileged": false,
          "startTimeout": 30,
          "stopTimeout": 20,
          "systemControls": [{"namespace": "net.core.somaxconn", "value": "1024"}],
          "resourceRequirements": [{"value": "1", "type": "GPU"}],
          "firelensConfiguration": {"type": "fluentbit", "options": {"enable-ecs-log-metadata": "true"}},
          "credentialSpecs": ["credentialspecdomainless:arn:aws:s3:::specs/web.json"]
        }]
      },
      "tags": [{"key": "team", "value": "platform"}]
    }"#;

    fn http_response(status: u16, body: &'static str) -> HttpResponse {
        HttpResponse::new(
            StatusCode::try_from(status).unwrap(),
            SdkBody::from(body),
        )
    }

    fn parse(json: &str) -> serde_yaml::Value {
        serde_yaml::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_list_services_returns_first_page_only() {
        let rule = mock!(aws_sdk_ecs::Client::list_services).then_http_response(|| {
            http_response(
                200,
                r#"{"serviceArns": ["arn:aws:ecs:us-east-1:123456789012:service/prod/web",
                                   "arn:aws:ecs:us-east-1:123456789012:service/prod/worker"],
                    "nextToken": "page-2"}"#,
            )
        });
        let client = EcsClusterClient::new(mock_client!(aws_sdk_ecs, [&rule]));

        let arns = client.list_services("prod").await.unwrap();

        assert_eq!(
            arns,
            vec![
                "arn:aws:ecs:us-east-1:123456789012:service/prod/web",
                "arn:aws:ecs:us-east-1:123456789012:service/prod/worker",
            ]
        );
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_service_error_keeps_code_and_message() {
        let rule = mock!(aws_sdk_ecs::Client::list_services).then_http_response(|| {
            http_response(
                400,
                r#"{"__type": "ClusterNotFoundException", "message": "Cluster not found."}"#,
            )
        });
        let client = EcsClusterClient::new(mock_client!(aws_sdk_ecs, [&rule]));

        let err = client.list_services("staging").await.unwrap_err();

        match err {
            ExportError::Provider {
                operation,
                code,
                message,
            } => {
                assert_eq!(operation, "ListServices");
                assert_eq!(code.as_deref(), Some("ClusterNotFoundException"));
                assert_eq!(message, "Cluster not found.");
            }
            other => panic!("expected a provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_describe_service_without_match_is_not_found() {
        let rule = mock!(aws_sdk_ecs::Client::describe_services).then_http_response(|| {
            http_response(
                200,
                r#"{"services": [],
                    "failures": [{"arn": "arn:aws:ecs:us-east-1:123456789012:service/prod/web",
                                  "reason": "MISSING"}]}"#,
            )
        });
        let client = EcsClusterClient::new(mock_client!(aws_sdk_ecs, [&rule]));

        let err = client.describe_service("prod", SERVICE_ARN).await.unwrap_err();

        assert!(
            matches!(&err, ExportError::ServiceNotFound { service } if service == SERVICE_ARN),
            "unexpected error: {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_describe_service_keeps_every_field() {
        let rule = mock!(aws_sdk_ecs::Client::describe_services)
            .then_http_response(|| http_response(200, DESCRIBE_SERVICES));
        let client = EcsClusterClient::new(mock_client!(aws_sdk_ecs, [&rule]));

        let record = client.describe_service("prod", SERVICE_ARN).await.unwrap();

        let mut received = parse(DESCRIBE_SERVICES)["services"][0].clone();
        let fields = received.as_mapping_mut().unwrap();
        assert!(fields.remove("createdAt").is_some());
        assert_eq!(
            record.created_at.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
        assert_eq!(serde_yaml::to_value(&record).unwrap(), received);
    }

    #[tokio::test]
    async fn test_describe_task_definition_keeps_every_field_and_attaches_tags() {
        let rule = mock!(aws_sdk_ecs::Client::describe_task_definition)
            .then_http_response(|| http_response(200, DESCRIBE_TASK_DEFINITION));
        let client = EcsClusterClient::new(mock_client!(aws_sdk_ecs, [&rule]));

        let record = client.describe_task_definition("web:12").await.unwrap();

        let response = parse(DESCRIBE_TASK_DEFINITION);
        let mut received = response["taskDefinition"].clone();
        let fields = received.as_mapping_mut().unwrap();
        assert!(fields.remove("registeredAt").is_some());
        fields.insert("tags".into(), response["tags"].clone());
        assert_eq!(
            record.registered_at.map(|t| t.timestamp()),
            Some(1_690_000_000)
        );
        assert_eq!(serde_yaml::to_value(&record).unwrap(), received);
    }

    #[tokio::test]
    async fn test_describe_task_definition_without_definition_fails() {
        let rule = mock!(aws_sdk_ecs::Client::describe_task_definition)
            .then_http_response(|| http_response(200, "{}"));
        let client = EcsClusterClient::new(mock_client!(aws_sdk_ecs, [&rule]));

        let err = client.describe_task_definition("web:12").await.unwrap_err();

        assert_eq!(err.provider_code(), None);
        assert_eq!(
            err.to_string(),
            "DescribeTaskDefinition failed: no task definition returned for web:12"
        );
    }
}
