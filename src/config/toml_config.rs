use crate::core::ConfigProvider;
use crate::utils::error::{MigrateError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CSV_PATH: &str =
    "project-issue-data/bugreport.mozilla.firefox/mozilla_firefox_bugmeasures.csv";
pub const DEFAULT_PAGE_DIR: &str = "project-issue-data/bugreport.mozilla.firefox/issueXML";
pub const DEFAULT_OUTPUT_DIR: &str = "project-issue-data/bugreport.mozilla.firefox/issueJSON";
pub const DEFAULT_COMMENT_URL: &str = "https://bugzilla.mozilla.org/show_bug.cgi?ctype=xml&id={id}";
pub const DEFAULT_BASE_URL: &str = "http://localhost:2990/jira";

pub const TRANSPORTS: [&str; 2] = ["curl", "http"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    pub source: SourceConfig,
    pub target: TargetConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub csv_path: String,
    pub comment_url_template: String,
    pub page_dir: String,
    pub max_issues: Option<usize>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            csv_path: DEFAULT_CSV_PATH.to_string(),
            comment_url_template: DEFAULT_COMMENT_URL.to_string(),
            page_dir: DEFAULT_PAGE_DIR.to_string(),
            max_issues: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub project_key: String,
    pub project_name: String,
    pub project_lead: String,
    pub default_user_password: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: "admin".to_string(),
            password: "admin".to_string(),
            project_key: "FF".to_string(),
            project_name: "Firefox".to_string(),
            project_lead: "admin".to_string(),
            default_user_password: "password".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_dir: String,
    /// `curl` shells out to `http_client`; `http` posts in-process.
    pub transport: String,
    pub http_client: String,
    pub dry_run: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            transport: "curl".to_string(),
            http_client: "curl".to_string(),
            dry_run: false,
        }
    }
}

impl MigrationConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MigrateError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MigrateError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${JIRA_PASSWORD})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MigrateError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_extension("source.csv_path", &self.source.csv_path, "csv")?;
        validation::validate_url_template(
            "source.comment_url_template",
            &self.source.comment_url_template,
        )?;
        validation::validate_path("source.page_dir", &self.source.page_dir)?;

        validation::validate_url("target.base_url", &self.target.base_url)?;
        validation::validate_non_empty_string("target.username", &self.target.username)?;
        validation::validate_non_empty_string("target.project_key", &self.target.project_key)?;
        if !self
            .target
            .project_key
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(MigrateError::InvalidConfigValueError {
                field: "target.project_key".to_string(),
                value: self.target.project_key.clone(),
                reason: "Project keys use upper-case letters and digits only".to_string(),
            });
        }

        validation::validate_path("load.output_dir", &self.load.output_dir)?;
        validation::validate_one_of("load.transport", &self.load.transport, &TRANSPORTS)?;
        if self.load.transport == "curl" {
            validation::validate_non_empty_string("load.http_client", &self.load.http_client)?;
        }

        Ok(())
    }
}

impl ConfigProvider for MigrationConfig {
    fn csv_path(&self) -> &str {
        &self.source.csv_path
    }

    fn comment_url_template(&self) -> &str {
        &self.source.comment_url_template
    }

    fn page_dir(&self) -> &str {
        &self.source.page_dir
    }

    fn output_dir(&self) -> &str {
        &self.load.output_dir
    }

    fn max_issues(&self) -> Option<usize> {
        self.source.max_issues
    }

    fn project_key(&self) -> &str {
        &self.target.project_key
    }

    fn project_name(&self) -> &str {
        &self.target.project_name
    }

    fn project_lead(&self) -> &str {
        &self.target.project_lead
    }

    fn default_user_password(&self) -> &str {
        &self.target.default_user_password
    }

    fn dry_run(&self) -> bool {
        self.load.dry_run
    }
}

impl Validate for MigrationConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
