//! # CLI
//!
//! Command-line configuration for a smoke run, with environment fallbacks so
//! CI jobs can point the tool at another deployment without changing flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

pub const DEFAULT_BASE_URL: &str = "https://edu-quest-2.preview.emergentagent.com/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Parser)]
#[command(name = "eduquest-smoke", version, about = "End-to-end smoke tests for the EduQuest REST API")]
pub struct CliConfig {
    /// API root that every request path is appended to
    #[arg(long, env = "EDUQUEST_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "EDUQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Summary format written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(long, env = "EDUQUEST_REPORT_PATH")]
    pub report_path: Option<PathBuf>,

    /// Extra header sent with every request, e.g. `X-Preview-Key: abc` (repeatable)
    #[arg(long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Count an unavailable AI mentor as a failure instead of a degraded pass
    #[arg(long)]
    pub strict: bool,

    /// Log filter directive (e.g. `debug`, `eduquest_smoke=trace`)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

impl CliConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("Invalid header format: `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Header key is empty: `{raw}`"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Output format for the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
