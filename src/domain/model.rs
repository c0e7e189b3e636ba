use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One row of the source tracker's CSV export, plus the comments scraped for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceIssue {
    pub bug_id: String,
    #[serde(rename = "short_desc", default)]
    pub summary: String,
    #[serde(default)]
    pub reporter: String,
    #[serde(rename = "assigned_to", default)]
    pub assignee: String,
    #[serde(rename = "bug_status", default)]
    pub status: String,
    #[serde(default)]
    pub resolution: String,
    #[serde(default)]
    pub priority: String,
    #[serde(rename = "bug_severity", default)]
    pub severity: String,
    #[serde(default)]
    pub component: String,
    #[serde(rename = "creation_ts", default)]
    pub created: String,
    #[serde(skip)]
    pub comments: Vec<SourceComment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceComment {
    pub author: String,
    pub author_name: String,
    pub created: Option<DateTime<FixedOffset>>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetProject {
    pub key: String,
    pub name: String,
    pub project_type_key: String,
    pub lead: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetUser {
    pub name: String,
    pub password: String,
    pub email_address: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
    pub project: ProjectRef,
    pub summary: String,
    pub description: String,
    pub issuetype: NamedRef,
    pub priority: NamedRef,
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<NamedRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetIssue {
    pub fields: IssueFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetComment {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedIssue {
    pub source_id: String,
    pub issue: TargetIssue,
    pub comments: Vec<TargetComment>,
}

#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub project: TargetProject,
    pub users: Vec<TargetUser>,
    pub issues: Vec<ConvertedIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    pub issues_read: usize,
    pub pages_downloaded: usize,
    pub pages_skipped: usize,
    pub pages_failed: usize,
    pub files_written: usize,
    pub posts_succeeded: usize,
    pub posts_failed: usize,
    pub created_keys: Vec<String>,
}
