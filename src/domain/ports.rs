use crate::domain::model::{ConversionResult, MigrationReport, SourceIssue};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    /// Filesystem location of `path`, for tools that take a file argument.
    fn resolve(&self, path: &str) -> std::path::PathBuf;
}

pub trait ConfigProvider: Send + Sync {
    fn csv_path(&self) -> &str;
    fn comment_url_template(&self) -> &str;
    fn page_dir(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn max_issues(&self) -> Option<usize>;
    fn project_key(&self) -> &str;
    fn project_name(&self) -> &str;
    fn project_lead(&self) -> &str;
    fn default_user_password(&self) -> &str;
    fn dry_run(&self) -> bool;
}

/// Sends one JSON document to the target tracker and hands back the raw response body.
#[async_trait]
pub trait IssuePoster: Send + Sync {
    async fn post(&self, endpoint: &str, json_file: &Path) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceIssue>>;
    async fn transform(&self, issues: Vec<SourceIssue>) -> Result<ConversionResult>;
    async fn load(&self, result: ConversionResult) -> Result<MigrationReport>;
}
