use crate::core::convert::file_stem;
use crate::core::Storage;
use crate::domain::model::{SourceComment, SourceIssue};
use crate::utils::error::{MigrateError, Result};
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;

static LONG_DESC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<long_desc\b[^>]*>(.*?)</long_desc>").expect("valid regex"));
static WHO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<who\b(?:[^>]*?\bname="([^"]*)")?[^>]*>(.*?)</who>"#).expect("valid regex")
});
static BUG_WHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<bug_when>(.*?)</bug_when>").expect("valid regex"));
static THE_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<thetext>(.*?)</thetext>").expect("valid regex"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    Downloaded,
    Skipped,
}

/// Fetches the per-issue comment page and keeps a copy under `page_dir`.
pub struct CommentScraper {
    client: Client,
    url_template: String,
    page_dir: String,
}

impl CommentScraper {
    pub fn new(url_template: String, page_dir: String) -> Self {
        Self {
            client: Client::new(),
            url_template,
            page_dir,
        }
    }

    pub fn comment_url(&self, bug_id: &str) -> String {
        comment_url(&self.url_template, bug_id)
    }

    /// The id is reduced to a single file stem, so it cannot leave `page_dir`.
    pub fn page_path(&self, bug_id: &str) -> String {
        format!("{}/{}.xml", self.page_dir, file_stem(bug_id))
    }

    /// 頁面已快取時不重新下載
    pub async fn download_if_required<S: Storage>(
        &self,
        storage: &S,
        issue: &SourceIssue,
    ) -> Result<DownloadStatus> {
        let path = self.page_path(&issue.bug_id);
        if storage.exists(&path).await {
            tracing::debug!("Page for bug {} already cached at {}", issue.bug_id, path);
            return Ok(DownloadStatus::Skipped);
        }

        let url = self.comment_url(&issue.bug_id);
        tracing::debug!("Fetching comment page: {}", url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(MigrateError::ScrapeError {
                bug_id: issue.bug_id.clone(),
                message: format!("{} returned {}", url, response.status()),
            });
        }

        let body = response.bytes().await?;
        storage.write_file(&path, &body).await?;
        Ok(DownloadStatus::Downloaded)
    }

    pub async fn load_comments<S: Storage>(
        &self,
        storage: &S,
        issue: &SourceIssue,
    ) -> Result<Vec<SourceComment>> {
        let page = storage.read_file(&self.page_path(&issue.bug_id)).await?;
        Ok(extract_comments(&String::from_utf8_lossy(&page)))
    }
}

/// Substitutes the percent-encoded id for `{id}`.
pub fn comment_url(template: &str, bug_id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(bug_id.as_bytes()).collect();
    template.replace("{id}", &encoded)
}

/// Pulls every `<long_desc>` block out of a bug page, in page order.
pub fn extract_comments(page: &str) -> Vec<SourceComment> {
    LONG_DESC
        .captures_iter(page)
        .map(|block| {
            let body = &block[1];

            let (author_name, author) = WHO
                .captures(body)
                .map(|c| {
                    let name = c.get(1).map(|m| decode_entities(m.as_str())).unwrap_or_default();
                    (name, decode_entities(c[2].trim()))
                })
                .unwrap_or_default();

            let created = BUG_WHEN
                .captures(body)
                .and_then(|c| parse_timestamp(c[1].trim()));

            let text = THE_TEXT
                .captures(body)
                .map(|c| decode_entities(&c[1]))
                .unwrap_or_default();

            SourceComment {
                author,
                author_name,
                created,
                text,
            }
        })
        .collect()
}

/// Bugzilla writes `2001-03-14 10:22:00 -0800`; the zone is sometimes omitted.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z")
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        })
}

pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ => entity[1..].parse::<u32>().ok().and_then(char::from_u32),
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
