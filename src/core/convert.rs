use crate::core::ConfigProvider;
use crate::core::scraper::parse_timestamp;
use crate::domain::model::{
    ConversionResult, ConvertedIssue, IssueFields, NamedRef, ProjectRef, SourceComment,
    SourceIssue, TargetComment, TargetIssue, TargetProject, TargetUser,
};
use std::collections::{BTreeMap, HashSet};

pub fn convert_project<C: ConfigProvider>(config: &C) -> TargetProject {
    TargetProject {
        key: config.project_key().to_string(),
        name: config.project_name().to_string(),
        project_type_key: "software".to_string(),
        lead: config.project_lead().to_string(),
        description: format!("Issues imported from the {} bug tracker", config.project_name()),
    }
}

/// Restricts `value` to `[A-Za-z0-9._-]`, so it is safe as a single path segment.
pub fn file_stem(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Base account name for an email: its local part, as a file stem.
pub fn user_name(email: &str) -> String {
    file_stem(email.split('@').next().unwrap_or(email))
}

/// Email to target account name, one entry per distinct email.
pub type UserNames = BTreeMap<String, String>;

struct UserEntry {
    email: String,
    display: String,
    name: String,
}

/// Distinct emails among reporters, assignees and comment authors, ordered by
/// email. Emails sharing a local part get `-2`, `-3`... in that order.
fn directory(issues: &[SourceIssue]) -> Vec<UserEntry> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();

    let mut note = |email: &str, display: &str| {
        let email = email.trim();
        if email.is_empty() {
            return;
        }
        let entry = seen.entry(email.to_string()).or_default();
        if entry.is_empty() && !display.trim().is_empty() {
            *entry = display.trim().to_string();
        }
    };

    for issue in issues {
        note(&issue.reporter, "");
        note(&issue.assignee, "");
        for comment in &issue.comments {
            note(&comment.author, &comment.author_name);
        }
    }

    let mut taken = HashSet::new();
    seen.into_iter()
        .map(|(email, display)| {
            let base = user_name(&email);
            let mut name = base.clone();
            let mut suffix = 2;
            while !taken.insert(name.clone()) {
                name = format!("{}-{}", base, suffix);
                suffix += 1;
            }
            UserEntry {
                email,
                display,
                name,
            }
        })
        .collect()
}

pub fn user_names(issues: &[SourceIssue]) -> UserNames {
    directory(issues)
        .into_iter()
        .map(|entry| (entry.email, entry.name))
        .collect()
}

pub fn collect_users(issues: &[SourceIssue], default_password: &str) -> Vec<TargetUser> {
    directory(issues)
        .into_iter()
        .map(|entry| TargetUser {
            display_name: if entry.display.is_empty() {
                entry.name.clone()
            } else {
                entry.display
            },
            name: entry.name,
            password: default_password.to_string(),
            email_address: entry.email,
        })
        .collect()
}

pub fn map_priority(priority: &str) -> &'static str {
    match priority.trim().to_ascii_uppercase().as_str() {
        "P1" => "Highest",
        "P2" => "High",
        "P3" => "Medium",
        "P4" => "Low",
        "P5" => "Lowest",
        _ => "Medium",
    }
}

fn label(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == "--" {
        None
    } else {
        Some(value.split_whitespace().collect::<Vec<_>>().join("_"))
    }
}

fn person(email: &str, names: &UserNames) -> Option<NamedRef> {
    let email = email.trim();
    (!email.is_empty()).then(|| NamedRef {
        name: names.get(email).cloned().unwrap_or_else(|| user_name(email)),
    })
}

fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%Y-%m-%d %H:%M %:z").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn convert_comment(comment: &SourceComment) -> TargetComment {
    let author = [comment.author_name.trim(), comment.author.trim()]
        .into_iter()
        .find(|a| !a.is_empty())
        .unwrap_or("Someone");
    let when = comment
        .created
        .map(|ts| ts.format("%Y-%m-%d %H:%M %:z").to_string())
        .unwrap_or_else(|| "an unknown date".to_string());

    TargetComment {
        body: format!("{} wrote on {}:\n\n{}", author, when, comment.text),
    }
}

/// Comment 0 on the source tracker is the bug description; the rest stay comments.
pub fn convert_issue(issue: &SourceIssue, project_key: &str, names: &UserNames) -> ConvertedIssue {
    let (description, rest) = match issue.comments.split_first() {
        Some((first, rest)) => (first.text.clone(), rest),
        None => (String::new(), &[][..]),
    };

    let mut footer = format!("Imported from bug {}", issue.bug_id);
    if !issue.created.is_empty() {
        footer.push_str(&format!(", reported {}", format_date(&issue.created)));
    }
    if !issue.status.is_empty() {
        footer.push_str(&format!(". Status: {}", issue.status));
        if !issue.resolution.is_empty() {
            footer.push_str(&format!(" {}", issue.resolution));
        }
    }
    footer.push('.');

    let description = if description.trim().is_empty() {
        footer
    } else {
        format!("{}\n\n----\n{}", description, footer)
    };

    let summary = if issue.summary.trim().is_empty() {
        format!("Bug {}", issue.bug_id)
    } else {
        issue.summary.trim().to_string()
    };

    let labels = [label(&issue.component), label(&issue.severity)]
        .into_iter()
        .flatten()
        .collect();

    ConvertedIssue {
        source_id: issue.bug_id.clone(),
        issue: TargetIssue {
            fields: IssueFields {
                project: ProjectRef {
                    key: project_key.to_string(),
                },
                summary,
                description,
                issuetype: NamedRef {
                    name: "Bug".to_string(),
                },
                priority: NamedRef {
                    name: map_priority(&issue.priority).to_string(),
                },
                labels,
                reporter: person(&issue.reporter, names),
                assignee: person(&issue.assignee, names),
            },
        },
        comments: rest.iter().map(convert_comment).collect(),
    }
}

pub fn convert_all<C: ConfigProvider>(issues: &[SourceIssue], config: &C) -> ConversionResult {
    let names = user_names(issues);
    ConversionResult {
        project: convert_project(config),
        users: collect_users(issues, config.default_user_password()),
        issues: issues
            .iter()
            .map(|issue| convert_issue(issue, config.project_key(), &names))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::MigrationConfig;

    fn comment(author: &str, name: &str, text: &str) -> SourceComment {
        SourceComment {
            author: author.to_string(),
            author_name: name.to_string(),
            created: parse_timestamp("2001-03-14 10:22:00 -0800"),
            text: text.to_string(),
        }
    }

    fn sample_issue() -> SourceIssue {
        SourceIssue {
            bug_id: "100".to_string(),
            summary: "Crash on startup".to_string(),
            reporter: "alice@example.com".to_string(),
            assignee: "bob+bugs@example.com".to_string(),
            status: "RESOLVED".to_string(),
            resolution: "FIXED".to_string(),
            priority: "P2".to_string(),
            severity: "critical".to_string(),
            component: "Tabbed Browser".to_string(),
            created: "2001-03-14 10:22:00 -0800".to_string(),
            comments: vec![
                comment("alice@example.com", "Alice", "It crashes."),
                comment("carol@example.com", "Carol C.", "Me too."),
            ],
        }
    }

    #[test]
    fn test_convert_issue_fields() {
        let issue = sample_issue();
        let converted = convert_issue(&issue, "FF", &user_names(&[issue.clone()]));
        let fields = &converted.issue.fields;

        assert_eq!(converted.source_id, "100");
        assert_eq!(fields.project.key, "FF");
        assert_eq!(fields.summary, "Crash on startup");
        assert_eq!(fields.issuetype.name, "Bug");
        assert_eq!(fields.priority.name, "High");
        assert_eq!(fields.labels, vec!["Tabbed_Browser", "critical"]);
        assert_eq!(fields.reporter.as_ref().unwrap().name, "alice");
        assert_eq!(fields.assignee.as_ref().unwrap().name, "bob_bugs");
        assert!(fields.description.starts_with("It crashes.\n\n----\nImported from bug 100"));
        assert!(fields.description.contains("reported 2001-03-14 10:22 -08:00"));
        assert!(fields.description.ends_with("Status: RESOLVED FIXED."));

        assert_eq!(converted.comments.len(), 1);
        assert_eq!(
            converted.comments[0].body,
            "Carol C. wrote on 2001-03-14 10:22 -08:00:\n\nMe too."
        );
    }

    #[test]
    fn test_convert_issue_without_comments_or_people() {
        let issue = SourceIssue {
            bug_id: "5".to_string(),
            priority: "--".to_string(),
            severity: "--".to_string(),
            ..Default::default()
        };

        let converted = convert_issue(&issue, "FF", &UserNames::new());
        let fields = &converted.issue.fields;

        assert_eq!(fields.summary, "Bug 5");
        assert_eq!(fields.description, "Imported from bug 5.");
        assert_eq!(fields.priority.name, "Medium");
        assert!(fields.labels.is_empty());
        assert!(fields.reporter.is_none());
        assert!(converted.comments.is_empty());
    }

    #[test]
    fn test_issue_json_uses_target_field_names() {
        let issue = sample_issue();
        let converted = convert_issue(&issue, "FF", &user_names(&[issue.clone()]));
        let json = serde_json::to_value(&converted.issue).unwrap();

        assert_eq!(json["fields"]["project"]["key"], "FF");
        assert_eq!(json["fields"]["issuetype"]["name"], "Bug");
        assert_eq!(json["fields"]["assignee"]["name"], "bob_bugs");

        let bare = convert_issue(
            &SourceIssue {
                bug_id: "1".to_string(),
                ..Default::default()
            },
            "FF",
            &UserNames::new(),
        );
        let json = serde_json::to_value(&bare.issue).unwrap();
        assert!(json["fields"].get("reporter").is_none());
    }

    #[test]
    fn test_collect_users_distinct_by_email() {
        let mut second = sample_issue();
        second.bug_id = "101".to_string();
        second.assignee = "".to_string();

        let users = collect_users(&[sample_issue(), second], "changeme");
        let emails: Vec<&str> = users.iter().map(|u| u.email_address.as_str()).collect();

        assert_eq!(
            emails,
            vec!["alice@example.com", "bob+bugs@example.com", "carol@example.com"]
        );
        assert_eq!(users[0].display_name, "Alice");
        assert_eq!(users[1].display_name, "bob_bugs");
        assert_eq!(users[2].name, "carol");
        assert!(users.iter().all(|u| u.password == "changeme"));
    }

    #[test]
    fn test_user_json_uses_target_field_names() {
        let users = collect_users(&[sample_issue()], "pw");
        let json = serde_json::to_value(&users[0]).unwrap();

        assert_eq!(json["emailAddress"], "alice@example.com");
        assert_eq!(json["displayName"], "Alice");
        assert_eq!(json["name"], "alice");
    }

    #[test]
    fn test_convert_all() {
        let config = MigrationConfig::default();
        let result = convert_all(&[sample_issue()], &config);

        assert_eq!(result.project.key, "FF");
        assert_eq!(result.project.name, "Firefox");
        let project = serde_json::to_value(&result.project).unwrap();
        assert_eq!(project["projectTypeKey"], "software");
        assert_eq!(result.users.len(), 3);
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn test_shared_local_part_gets_distinct_names() {
        let first = SourceIssue {
            bug_id: "1".to_string(),
            reporter: "alice@b.org".to_string(),
            assignee: "alice@a.com".to_string(),
            ..Default::default()
        };
        let second = SourceIssue {
            bug_id: "2".to_string(),
            reporter: "alice@c.net".to_string(),
            comments: vec![comment("alice-2@example.com", "", "hi")],
            ..Default::default()
        };
        let issues = [first.clone(), second.clone()];

        let users = collect_users(&issues, "pw");
        let pairs: Vec<(&str, &str)> = users
            .iter()
            .map(|u| (u.email_address.as_str(), u.name.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("alice-2@example.com", "alice-2"),
                ("alice@a.com", "alice"),
                ("alice@b.org", "alice-3"),
                ("alice@c.net", "alice-4"),
            ]
        );

        let names = user_names(&issues);
        let one = convert_issue(&first, "FF", &names);
        let two = convert_issue(&second, "FF", &names);
        assert_eq!(one.issue.fields.reporter.unwrap().name, "alice-3");
        assert_eq!(one.issue.fields.assignee.unwrap().name, "alice");
        assert_eq!(two.issue.fields.reporter.unwrap().name, "alice-4");
    }

    #[test]
    fn test_comment_without_author() {
        let mut anonymous = comment("", "", "No name here.");
        anonymous.created = None;

        assert_eq!(
            convert_comment(&anonymous).body,
            "Someone wrote on an unknown date:\n\nNo name here."
        );
        assert!(convert_comment(&comment("dan@example.com", " ", "x"))
            .body
            .starts_with("dan@example.com wrote on"));
    }

    #[test]
    fn test_records_survive_json_round_trip() {
        let config = MigrationConfig::default();
        let bare = SourceIssue {
            bug_id: "9".to_string(),
            ..Default::default()
        };
        let result = convert_all(&[sample_issue(), bare], &config);

        for converted in &result.issues {
            let json = serde_json::to_string(&converted.issue).unwrap();
            assert_eq!(serde_json::from_str::<TargetIssue>(&json).unwrap(), converted.issue);
            for comment in &converted.comments {
                let json = serde_json::to_string(comment).unwrap();
                assert_eq!(&serde_json::from_str::<TargetComment>(&json).unwrap(), comment);
            }
        }
        // reporter/assignee are omitted when absent and come back as None
        assert!(result.issues[1].issue.fields.reporter.is_none());
        assert!(!serde_json::to_string(&result.issues[1].issue).unwrap().contains("reporter"));

        for user in &result.users {
            let json = serde_json::to_string(user).unwrap();
            assert_eq!(&serde_json::from_str::<TargetUser>(&json).unwrap(), user);
        }

        let json = serde_json::to_string(&result.project).unwrap();
        assert_eq!(serde_json::from_str::<TargetProject>(&json).unwrap(), result.project);

        for source in &sample_issue().comments {
            let json = serde_json::to_string(source).unwrap();
            assert_eq!(&serde_json::from_str::<SourceComment>(&json).unwrap(), source);
        }
    }

    #[test]
    fn test_map_priority() {
        assert_eq!(map_priority("P1"), "Highest");
        assert_eq!(map_priority("p5"), "Lowest");
        assert_eq!(map_priority(""), "Medium");
    }
}
