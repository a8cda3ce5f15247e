use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest name slug used in generated file names
const SLUG_MAX_LEN: usize = 20;
/// Length of the random suffix used in generated file names
const SUFFIX_LEN: usize = 8;

/// The three kinds of item a project folder can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Interview,
    Website,
    Audio,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Interview, ItemKind::Website, ItemKind::Audio];

    /// File extension, including the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            ItemKind::Interview => ".szhi",
            ItemKind::Website => ".szhw",
            ItemKind::Audio => ".szha",
        }
    }

    /// Identify an item file by its five-character suffix
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| file_name.len() > kind.extension().len() && file_name.ends_with(kind.extension()))
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Interview => "Interview",
            ItemKind::Website => "Website",
            ItemKind::Audio => "Transcription in progress",
        }
    }
}

/// Lifecycle of a transcription job at the vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    NoCheck,
    InProgress,
    Transcribed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Transcribed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::NoCheck => "no_check",
            JobStatus::InProgress => "in_progress",
            JobStatus::Transcribed => "transcribed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interview {
    pub name: String,
    pub date: String,
    /// Transcript or main text
    pub body: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebsiteReference {
    pub name: String,
    pub date: String,
    /// The user's notes about the page
    pub body: String,
    pub url: String,
    pub publication: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioJob {
    pub name: String,
    pub date: String,
    pub job_id: String,
    pub status: JobStatus,
    pub source_path: String,
    pub failure_detail: Option<String>,
    pub duration_seconds: Option<f64>,
    pub created_on: Option<String>,
}

/// One persisted unit of project content
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Interview(Interview),
    Website(WebsiteReference),
    Audio(AudioJob),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Interview(_) => ItemKind::Interview,
            Item::Website(_) => ItemKind::Website,
            Item::Audio(_) => ItemKind::Audio,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Interview(i) => &i.name,
            Item::Website(w) => &w.name,
            Item::Audio(a) => &a.name,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            Item::Interview(i) => &i.date,
            Item::Website(w) => &w.date,
            Item::Audio(a) => &a.date,
        }
    }

    /// Short text shown under the name in the sidebar
    pub fn preview(&self) -> &str {
        match self {
            Item::Interview(i) => &i.notes,
            Item::Website(w) => &w.body,
            Item::Audio(_) => "",
        }
    }

    /// Date as a sortable timestamp; `None` when empty or unparseable
    pub fn sort_date(&self) -> Option<NaiveDateTime> {
        parse_item_date(self.date())
    }
}

impl From<Interview> for Item {
    fn from(value: Interview) -> Self {
        Item::Interview(value)
    }
}

impl From<WebsiteReference> for Item {
    fn from(value: WebsiteReference) -> Self {
        Item::Website(value)
    }
}

impl From<AudioJob> for Item {
    fn from(value: AudioJob) -> Self {
        Item::Audio(value)
    }
}

/// An item together with the file that backs it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredItem {
    pub file_name: String,
    pub item: Item,
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_item_date(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// Generate a file name for a new item: name slug, random suffix, kind extension
pub fn generate_file_name(name: &str, kind: ItemKind) -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SUFFIX_LEN)
        .collect();
    format!("{}-{}{}", slugify(name), suffix, kind.extension())
}

fn slugify(name: &str) -> String {
    let mut slug = String::new();
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.push(ch);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
        if slug.chars().count() >= SLUG_MAX_LEN {
            break;
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(ItemKind::from_file_name("tim-1234abcd.szhi"), Some(ItemKind::Interview));
        assert_eq!(ItemKind::from_file_name("x.szhw"), Some(ItemKind::Website));
        assert_eq!(ItemKind::from_file_name("x.szha"), Some(ItemKind::Audio));
        assert_eq!(ItemKind::from_file_name("x.szhx"), None);
        assert_eq!(ItemKind::from_file_name("notes.md"), None);
        assert_eq!(ItemKind::from_file_name(".szhi"), None);
    }

    #[test]
    fn test_generated_file_name() {
        let name = generate_file_name("Tim interview", ItemKind::Interview);
        assert!(name.starts_with("Tim-interview-"));
        assert!(name.ends_with(".szhi"));
        assert_eq!(ItemKind::from_file_name(&name), Some(ItemKind::Interview));

        let other = generate_file_name("Tim interview", ItemKind::Interview);
        assert_ne!(name, other);
    }

    #[test]
    fn test_slug_is_bounded_and_safe() {
        assert_eq!(slugify("  "), "untitled");
        assert_eq!(slugify("a/b\\c"), "a-b-c");
        assert!(slugify(&"x".repeat(100)).len() <= SLUG_MAX_LEN);
        assert!(!slugify("hello world, again and again and again").ends_with('-'));
    }

    #[test]
    fn test_parse_item_date() {
        assert!(parse_item_date("2023-05-01").is_some());
        assert!(parse_item_date("2023-05-01T10:20:30.000Z").is_some());
        assert!(parse_item_date("").is_none());
        assert!(parse_item_date("May 1st").is_none());
        assert!(parse_item_date("2023-05-02") > parse_item_date("2023-05-01"));
    }

    #[test]
    fn test_terminal_status() {
        assert!(!JobStatus::NoCheck.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
        assert!(JobStatus::Transcribed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
