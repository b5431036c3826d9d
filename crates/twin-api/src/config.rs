//! Process configuration.
//!
//! Every setting can come from the environment (the usual way to deploy) or
//! from the equivalent command-line flag. Values are resolved once at startup
//! and never re-read.

use std::path::PathBuf;

use anyhow::bail;
use clap::ArgAction;
use clap::Parser;
use clap::builder::BoolishValueParser;

use twin_observe::tracing_setup::LogFormat;
use twin_types::config::{BedrockConfig, StorageBackend};

/// Digital twin chat API server.
#[derive(Debug, Parser)]
#[command(name = "twin", version, about, long_about = None)]
pub struct Cli {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Comma-separated list of origins allowed by CORS.
    #[arg(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    pub cors_origins: Vec<String>,

    /// Store conversations in S3 instead of the local filesystem.
    #[arg(
        long,
        env = "USE_S3",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub use_s3: bool,

    /// Bucket holding conversation logs when S3 storage is enabled.
    #[arg(long, env = "S3_BUCKET", default_value = "")]
    pub s3_bucket: String,

    /// Directory holding conversation logs when S3 storage is disabled.
    #[arg(long, env = "MEMORY_DIR", default_value = "../memory")]
    pub memory_dir: PathBuf,

    /// Bedrock model every chat turn is sent to.
    #[arg(long, env = "BEDROCK_MODEL_ID", default_value = "amazon.nova-lite-v1:0")]
    pub bedrock_model_id: String,

    /// AWS region of the Bedrock endpoint.
    #[arg(long, env = "DEFAULT_AWS_REGION", default_value = "us-east-1")]
    pub aws_region: String,

    /// File holding the system prompt (built-in persona when unset).
    #[arg(long, env = "PROMPT_FILE")]
    pub prompt_file: Option<PathBuf>,

    /// Log output format: pretty or json.
    #[arg(long, env = "TWIN_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Export tracing spans to stdout through OpenTelemetry.
    #[arg(
        long,
        env = "TWIN_OTEL",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub otel: bool,
}

impl Cli {
    /// Resolve which session store backend to use.
    pub fn storage_backend(&self) -> anyhow::Result<StorageBackend> {
        if !self.use_s3 {
            return Ok(StorageBackend::Local {
                dir: self.memory_dir.clone(),
            });
        }

        let bucket = self.s3_bucket.trim();
        if bucket.is_empty() {
            bail!("USE_S3 is enabled but S3_BUCKET is empty");
        }
        Ok(StorageBackend::S3 {
            bucket: bucket.to_string(),
        })
    }

    pub fn bedrock_config(&self) -> BedrockConfig {
        BedrockConfig {
            model_id: self.bedrock_model_id.clone(),
            region: self.aws_region.clone(),
        }
    }

    /// Non-empty, trimmed CORS origins.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
