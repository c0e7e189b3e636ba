pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::MigrationConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "tracker-migrate")]
#[command(about = "Migrate bug-tracker issues from a CSV export into a Jira-style REST API")]
pub struct CliConfig {
    /// Process at most this many issues (defaults to every row in the CSV)
    pub max_issues: Option<usize>,

    /// Optional TOML configuration file; flags below override it
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub csv: Option<String>,

    #[arg(long)]
    pub output: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub user: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// `curl` (shell out) or `http` (in-process client)
    #[arg(long)]
    pub transport: Option<String>,

    /// Write the JSON files but post nothing
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file when given, otherwise the built-in defaults, then
    /// applies command-line overrides.
    pub fn resolve(&self) -> Result<MigrationConfig> {
        let mut config = match &self.config {
            Some(path) => MigrationConfig::from_file(path)?,
            None => MigrationConfig::default(),
        };

        if let Some(max) = self.max_issues {
            config.source.max_issues = Some(max);
        }
        if let Some(csv) = &self.csv {
            config.source.csv_path = csv.clone();
        }
        if let Some(output) = &self.output {
            config.load.output_dir = output.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.target.base_url = base_url.clone();
        }
        if let Some(user) = &self.user {
            config.target.username = user.clone();
        }
        if let Some(password) = &self.password {
            config.target.password = password.clone();
        }
        if let Some(transport) = &self.transport {
            config.load.transport = transport.clone();
        }
        if self.dry_run {
            config.load.dry_run = true;
        }

        Ok(config)
    }
}
