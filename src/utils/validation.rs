use crate::utils::error::{MigrateError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> MigrateError {
    MigrateError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(field_name, url_str, format!("Invalid URL format: {}", e))),
    }
}

/// A comment page template is a URL with exactly one `{id}` placeholder.
pub fn validate_url_template(field_name: &str, template: &str) -> Result<()> {
    match template.matches("{id}").count() {
        0 => Err(invalid(field_name, template, "Template must contain an {id} placeholder")),
        1 => validate_url(field_name, &template.replace("{id}", "1")),
        _ => Err(invalid(field_name, template, "Template must contain {id} only once")),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_extension(field_name: &str, path: &str, expected: &str) -> Result<()> {
    validate_path(field_name, path)?;
    match std::path::Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(expected) => Ok(()),
        Some(ext) => Err(invalid(
            field_name,
            path,
            format!("Unsupported file extension: {}. Expected: {}", ext, expected),
        )),
        None => Err(invalid(field_name, path, "File has no extension or invalid filename")),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            field_name,
            value,
            format!("Valid values: {}", allowed.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("target.base_url", "https://example.com").is_ok());
        assert!(validate_url("target.base_url", "http://localhost:2990/jira").is_ok());
        assert!(validate_url("target.base_url", "").is_err());
        assert!(validate_url("target.base_url", "invalid-url").is_err());
        assert!(validate_url("target.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_url_template() {
        assert!(validate_url_template("t", "https://bugs.example.org/show_bug.cgi?ctype=xml&id={id}").is_ok());
        assert!(validate_url_template("t", "https://bugs.example.org/show_bug.cgi").is_err());
        assert!(validate_url_template("t", "https://x.org/{id}/{id}").is_err());
    }

    #[test]
    fn test_validate_extension() {
        assert!(validate_extension("source.csv_path", "data/bugs.csv", "csv").is_ok());
        assert!(validate_extension("source.csv_path", "data/BUGS.CSV", "csv").is_ok());
        assert!(validate_extension("source.csv_path", "data/bugs.tsv", "csv").is_err());
        assert!(validate_extension("source.csv_path", "data/bugs", "csv").is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("load.transport", "curl", &["curl", "http"]).is_ok());
        assert!(validate_one_of("load.transport", "wget", &["curl", "http"]).is_err());
    }
}
