use crate::core::IssuePoster;
use crate::utils::error::{MigrateError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use tokio::process::Command;

pub const PROJECT_ENDPOINT: &str = "/rest/api/2/project";
pub const USER_ENDPOINT: &str = "/rest/api/2/user";
pub const ISSUE_ENDPOINT: &str = "/rest/api/2/issue";

pub fn comment_endpoint(issue_key: &str) -> String {
    format!("{}/{}/comment", ISSUE_ENDPOINT, issue_key)
}

/// The created issue's key, taken from the raw response by splitting on `"key":"`.
pub fn extract_issue_key(response: &str) -> Option<String> {
    let (_, rest) = response.split_once("\"key\":\"")?;
    let (key, _) = rest.split_once('"')?;
    (!key.is_empty()).then(|| key.to_string())
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Shells out to a command-line HTTP client (curl-compatible flags).
pub struct CurlPoster {
    program: String,
    base_url: String,
    credentials: Credentials,
}

impl CurlPoster {
    pub fn new(program: String, base_url: String, credentials: Credentials) -> Self {
        Self {
            program,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn args(&self, endpoint: &str, json_file: &Path) -> Vec<String> {
        vec![
            "-s".to_string(),
            "-S".to_string(),
            "-u".to_string(),
            format!("{}:{}", self.credentials.username, self.credentials.password),
            "-X".to_string(),
            "POST".to_string(),
            "-H".to_string(),
            "Content-Type: application/json".to_string(),
            "--data".to_string(),
            format!("@{}", json_file.display()),
            format!("{}{}", self.base_url, endpoint),
        ]
    }
}

#[async_trait]
impl IssuePoster for CurlPoster {
    async fn post(&self, endpoint: &str, json_file: &Path) -> Result<String> {
        tracing::debug!("{} POST {}{} <- {}", self.program, self.base_url, endpoint, json_file.display());

        let output = Command::new(&self.program)
            .args(self.args(endpoint, json_file))
            .output()
            .await
            .map_err(|e| MigrateError::CommandError {
                command: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(MigrateError::CommandError {
                command: self.program.clone(),
                message: format!(
                    "exit code {}: {}",
                    output.status.code().unwrap_or(-1),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Same request as [`CurlPoster`], made with the in-process HTTP client.
pub struct HttpPoster {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpPoster {
    pub fn new(base_url: String, credentials: Credentials) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }
}

#[async_trait]
impl IssuePoster for HttpPoster {
    async fn post(&self, endpoint: &str, json_file: &Path) -> Result<String> {
        let url = format!("{}{}", self.base_url, endpoint);
        let body = tokio::fs::read(json_file).await?;

        tracing::debug!("POST {} ({} bytes)", url, body.len());
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!("POST {} returned {}", url, status);
        }
        Ok(text)
    }
}
