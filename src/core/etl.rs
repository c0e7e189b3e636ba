use crate::core::{MigrationReport, Pipeline};
use crate::utils::error::Result;

pub struct MigrationEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> MigrationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<MigrationReport> {
        tracing::info!("Starting migration");

        tracing::info!("Reading issues and scraping comment pages...");
        let issues = self.pipeline.extract().await?;
        tracing::info!("Extracted {} issues", issues.len());

        tracing::info!("Converting issues...");
        let converted = self.pipeline.transform(issues).await?;
        tracing::info!(
            "Converted {} issues and {} users",
            converted.issues.len(),
            converted.users.len()
        );

        tracing::info!("Writing and posting records...");
        let report = self.pipeline.load(converted).await?;
        tracing::info!(
            "Wrote {} files, {} posts succeeded, {} failed",
            report.files_written,
            report.posts_succeeded,
            report.posts_failed
        );

        Ok(report)
    }
}
