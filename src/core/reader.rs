use crate::domain::model::SourceIssue;
use crate::utils::error::{MigrateError, Result};

/// Parses the issue export. Columns are matched by header name, so extra
/// columns are ignored and missing optional ones come back empty.
pub fn read_issues(data: &[u8]) -> Result<Vec<SourceIssue>> {
    let (issues, skipped) = parse_rows(data)?;
    for (line, reason) in &skipped {
        tracing::warn!("Skipping CSV line {}: {}", line, reason);
    }

    tracing::debug!("Read {} issues from CSV", issues.len());
    Ok(issues)
}

/// Returns the parsed issues and the skipped rows as (starting line, reason).
fn parse_rows(data: &[u8]) -> Result<(Vec<SourceIssue>, Vec<(u64, String)>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == "bug_id") {
        return Err(MigrateError::ProcessingError {
            message: "CSV header has no bug_id column".to_string(),
        });
    }

    let mut issues = Vec::new();
    let mut skipped = Vec::new();
    for row in reader.records() {
        let record = match row {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                skipped.push((line, e.to_string()));
                continue;
            }
        };
        // 引號內的換行會讓一筆資料跨多行，以起始行為準
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        match record.deserialize::<SourceIssue>(Some(&headers)) {
            Ok(issue) if issue.bug_id.is_empty() => {
                skipped.push((line, "empty bug_id".to_string()));
            }
            Ok(issue) => issues.push(issue),
            Err(e) => skipped.push((line, e.to_string())),
        }
    }

    Ok((issues, skipped))
}
