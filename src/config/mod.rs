use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_aws_region, validate_non_empty_string, validate_path, Validate,
};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "ecs-export", version)]
#[command(
    about = "Fetch configs of services and task definitions from ECS and export them as yaml files"
)]
pub struct CliConfig {
    #[arg(long, help = "The name of the ECS cluster to list services")]
    pub cluster: String,

    #[arg(long, help = "The root directory for output files")]
    pub outdir: String,

    #[arg(long, help = "AWS region, overrides the SDK's default resolution")]
    pub region: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn cluster(&self) -> &str {
        &self.cluster
    }

    fn output_path(&self) -> &str {
        &self.outdir
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("cluster", &self.cluster)?;
        validate_path("outdir", &self.outdir)?;
        if let Some(region) = &self.region {
            validate_aws_region("region", region)?;
        }

        tracing::debug!("✅ CLI configuration validation passed");
        Ok(())
    }
}

/// Collapses a clap parse error into the single line printed after `Error: `.
pub fn usage_error_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let summary = rendered.split("\n\n").next().unwrap_or_default().trim();
    let summary = summary.strip_prefix("error:").unwrap_or(summary);
    summary.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_required_flags() {
        let config =
            CliConfig::try_parse_from(["ecs-export", "--cluster", "prod", "--outdir", "./out"])
                .unwrap();

        assert_eq!(config.cluster(), "prod");
        assert_eq!(config.output_path(), "./out");
        assert!(config.region.is_none());
        assert!(!config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_flag_is_rejected() {
        assert!(CliConfig::try_parse_from(["ecs-export", "--cluster", "prod"]).is_err());
        assert!(CliConfig::try_parse_from(["ecs-export", "--outdir", "./out"]).is_err());
    }

    #[test]
    fn test_usage_error_message_is_one_line() {
        let err = CliConfig::try_parse_from(["ecs-export", "--cluster", "prod"]).unwrap_err();

        let message = usage_error_message(&err);

        assert!(message.starts_with("the following required arguments were not provided"));
        assert!(message.contains("--outdir <OUTDIR>"));
        assert!(!message.contains('\n'));
        assert!(!message.contains("Usage:"));
    }

    #[test]
    fn test_validate_rejects_blank_cluster_and_bad_region() {
        let mut config = CliConfig::try_parse_from([
            "ecs-export",
            "--cluster",
            " ",
            "--outdir",
            "./out",
        ])
        .unwrap();
        assert!(config.validate().is_err());

        config.cluster = "prod".to_string();
        config.region = Some("Tokyo".to_string());
        assert!(config.validate().is_err());

        config.region = Some("ap-northeast-1".to_string());
        assert!(config.validate().is_ok());
    }
}
