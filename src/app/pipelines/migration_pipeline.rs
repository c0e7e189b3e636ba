use crate::core::convert::{convert_all, file_stem};
use crate::core::poster::{
    comment_endpoint, extract_issue_key, ISSUE_ENDPOINT, PROJECT_ENDPOINT, USER_ENDPOINT,
};
use crate::core::reader::read_issues;
use crate::core::scraper::{CommentScraper, DownloadStatus};
use crate::core::{
    ConfigProvider, ConversionResult, IssuePoster, MigrationReport, Pipeline, SourceIssue, Storage,
};
use crate::utils::error::{MigrateError, Result};
use serde::Serialize;
use tokio::sync::Mutex;

/// Reads the CSV export, scrapes comments, converts, writes the JSON files and
/// posts them one at a time. Per-item failures are logged and skipped.
pub struct MigrationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    scraper: CommentScraper,
    poster: Box<dyn IssuePoster>,
    report: Mutex<MigrationReport>,
}

impl<S: Storage, C: ConfigProvider> MigrationPipeline<S, C> {
    pub fn new(storage: S, config: C, poster: Box<dyn IssuePoster>) -> Self {
        let scraper = CommentScraper::new(
            config.comment_url_template().to_string(),
            config.page_dir().to_string(),
        );
        Self {
            storage,
            config,
            scraper,
            poster,
            report: Mutex::new(MigrationReport::default()),
        }
    }

    async fn write_json<T: Serialize>(&self, path: &str, value: &T) -> bool {
        let written = match serde_json::to_vec_pretty(value) {
            Ok(data) => self.storage.write_file(path, &data).await,
            Err(e) => Err(e.into()),
        };
        match written {
            Ok(()) => {
                self.report.lock().await.files_written += 1;
                true
            }
            Err(e) => {
                tracing::error!("Failed to write {}: {}", path, e);
                false
            }
        }
    }

    async fn post(&self, endpoint: &str, path: &str) -> Option<String> {
        match self.poster.post(endpoint, &self.storage.resolve(path)).await {
            Ok(body) => {
                tracing::debug!("Response for {}: {}", path, body);
                self.report.lock().await.posts_succeeded += 1;
                Some(body)
            }
            Err(e) => {
                tracing::error!("Failed to post {} to {}: {}", path, endpoint, e);
                self.report.lock().await.posts_failed += 1;
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MigrationPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceIssue>> {
        let csv_path = self.config.csv_path();
        let parsed = match self.storage.read_file(csv_path).await {
            Ok(data) => read_issues(&data),
            Err(e) => Err(e),
        };
        let mut issues = parsed.unwrap_or_else(|e| {
            tracing::error!("Failed to read issue export {}: {}", csv_path, e);
            Vec::new()
        });

        // 只處理實際存在的 issue 數量
        let total = self
            .config
            .max_issues()
            .map_or(issues.len(), |max| max.min(issues.len()));
        issues.truncate(total);

        let (mut downloaded, mut skipped, mut failed) = (0, 0, 0);
        for (index, issue) in issues.iter_mut().enumerate() {
            match self.scraper.download_if_required(&self.storage, issue).await {
                Ok(DownloadStatus::Downloaded) => {
                    downloaded += 1;
                    tracing::info!("Downloaded:\t{}/{}", index + 1, total);
                }
                Ok(DownloadStatus::Skipped) => {
                    skipped += 1;
                    tracing::info!("Skipped:\t{}/{}", index + 1, total);
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!("Failed:\t{}/{} ({})", index + 1, total, e);
                    continue;
                }
            }

            match self.scraper.load_comments(&self.storage, issue).await {
                Ok(comments) => {
                    tracing::debug!("Bug {}: {} comments", issue.bug_id, comments.len());
                    issue.comments = comments;
                }
                Err(e) => tracing::warn!("Failed to read comments for bug {}: {}", issue.bug_id, e),
            }
        }

        let mut report = self.report.lock().await;
        report.issues_read = issues.len();
        report.pages_downloaded = downloaded;
        report.pages_skipped = skipped;
        report.pages_failed = failed;

        Ok(issues)
    }

    async fn transform(&self, issues: Vec<SourceIssue>) -> Result<ConversionResult> {
        Ok(convert_all(&issues, &self.config))
    }

    async fn load(&self, result: ConversionResult) -> Result<MigrationReport> {
        let out = self.config.output_dir();
        let dry_run = self.config.dry_run();
        if dry_run {
            tracing::info!("Dry run: files are written, nothing is posted");
        }

        let project_path = format!("{}/project.json", out);
        if self.write_json(&project_path, &result.project).await && !dry_run {
            self.post(PROJECT_ENDPOINT, &project_path).await;
        }

        for user in &result.users {
            let path = format!("{}/users/{}.json", out, file_stem(&user.email_address));
            if self.write_json(&path, user).await && !dry_run {
                self.post(USER_ENDPOINT, &path).await;
            }
        }

        for converted in &result.issues {
            let issue_path = format!("{}/issues/{}.json", out, file_stem(&converted.source_id));
            let issue_written = self.write_json(&issue_path, &converted.issue).await;

            let mut comment_paths = Vec::with_capacity(converted.comments.len());
            for (n, comment) in converted.comments.iter().enumerate() {
                let path = format!(
                    "{}/comments/{}-{}.json",
                    out,
                    file_stem(&converted.source_id),
                    n + 1
                );
                if self.write_json(&path, comment).await {
                    comment_paths.push(path);
                }
            }

            if dry_run || !issue_written {
                continue;
            }

            let Some(response) = self.post(ISSUE_ENDPOINT, &issue_path).await else {
                continue;
            };
            let Some(key) = extract_issue_key(&response) else {
                let err = MigrateError::ResponseError {
                    message: format!("no issue key for bug {}: {}", converted.source_id, response),
                };
                tracing::warn!("{}; skipping {} comments", err, comment_paths.len());
                continue;
            };
            tracing::info!("Bug {} -> {}", converted.source_id, key);

            let endpoint = comment_endpoint(&key);
            for path in &comment_paths {
                self.post(&endpoint, path).await;
            }
            self.report.lock().await.created_keys.push(key);
        }

        Ok(self.report.lock().await.clone())
    }
}
