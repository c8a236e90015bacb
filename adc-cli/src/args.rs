use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// Which operation to run and with what parameters.
#[derive(Debug, Args, Clone)]
pub struct OperationArgs {
    #[arg(long, default_value = "file")]
    pub resource: String,
    #[arg(long)]
    pub operation: Option<String>,
    /// Parameter shared by every item; VALUE is parsed as JSON when possible.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set_params: Vec<String>,
    /// JSON or YAML object of parameters shared by every item.
    #[arg(long)]
    pub params: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ApplianceArgs {
    #[arg(long, env = "ADC_URL")]
    pub url: String,
    #[arg(long, env = "ADC_USERNAME")]
    pub username: String,
    /// Name of the environment variable holding the password.
    #[arg(long, default_value = "ADC_PASSWORD")]
    pub password_env: String,
    #[arg(long)]
    pub allow_unauthorized_certs: bool,
    /// Request timeout in milliseconds.
    #[arg(long, default_value_t = 30000)]
    pub timeout: u64,
}
