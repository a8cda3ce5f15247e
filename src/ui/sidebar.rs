use crate::items::model::{Item, ItemKind, StoredItem};
use std::fmt;
use std::str::FromStr;

/// Type tab shown above the sidebar list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Interview,
    Website,
    /// Transcription jobs that have not been converted yet
    Progress,
}

impl TypeFilter {
    pub const ALL: [TypeFilter; 4] = [
        TypeFilter::All,
        TypeFilter::Interview,
        TypeFilter::Website,
        TypeFilter::Progress,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TypeFilter::All => "All",
            TypeFilter::Interview => "Interview",
            TypeFilter::Website => "Website",
            TypeFilter::Progress => "Progress",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn matches(self, kind: ItemKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Interview => kind == ItemKind::Interview,
            TypeFilter::Website => kind == ItemKind::Website,
            TypeFilter::Progress => kind == ItemKind::Audio,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown type filter `{}` (expected All, Interview, Website or Progress)",
                    s
                )
            })
    }
}

/// Visible sidebar entries, in the order of `items`
pub fn project<'a>(items: &'a [StoredItem], search: &str, filter: TypeFilter) -> Vec<&'a StoredItem> {
    let needle = search.to_lowercase();
    items
        .iter()
        .filter(|s| filter.matches(s.item.kind()))
        .filter(|s| matches_search(&s.item, &needle))
        .collect()
}

/// Searchable text of an item; fields a variant lacks are simply absent
fn searchable_fields(item: &Item) -> Vec<&str> {
    match item {
        Item::Interview(i) => vec![i.name.as_str(), i.body.as_str(), i.notes.as_str()],
        Item::Website(w) => vec![
            w.name.as_str(),
            w.body.as_str(),
            w.url.as_str(),
            w.publication.as_str(),
        ],
        Item::Audio(a) => vec![a.name.as_str()],
    }
}

fn matches_search(item: &Item, needle_lower: &str) -> bool {
    needle_lower.is_empty()
        || searchable_fields(item)
            .into_iter()
            .any(|field| contains_case_insensitive(field, needle_lower))
}

/// Case-insensitive contains check (byte-level for ASCII, allocating for Unicode).
/// `needle` must already be lowercase.
fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.is_ascii() && needle.is_ascii() {
        let needle_bytes = needle.as_bytes();
        haystack
            .as_bytes()
            .windows(needle_bytes.len())
            .any(|window| {
                window
                    .iter()
                    .zip(needle_bytes.iter())
                    .all(|(&b, &n)| b.to_ascii_lowercase() == n)
            })
    } else {
        haystack.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::model::{AudioJob, Interview, JobStatus, WebsiteReference};

    fn stored(file_name: &str, item: Item) -> StoredItem {
        StoredItem {
            file_name: file_name.to_string(),
            item,
        }
    }

    fn fixture() -> Vec<StoredItem> {
        vec![
            stored(
                "tim.szhi",
                Item::Interview(Interview {
                    name: "Tim interview".to_string(),
                    date: "2023-05-01".to_string(),
                    body: "We talked about the levee.".to_string(),
                    notes: "Call back Friday".to_string(),
                }),
            ),
            stored(
                "bee.szhw",
                Item::Website(WebsiteReference {
                    name: "Budget gap widens".to_string(),
                    date: "2023-04-01".to_string(),
                    body: String::new(),
                    url: "https://www.sacbee.com/news/budget".to_string(),
                    publication: "The Sacramento Bee".to_string(),
                }),
            ),
            stored(
                "mayor.szha",
                Item::Audio(AudioJob {
                    name: "Mayor call".to_string(),
                    date: String::new(),
                    job_id: "j1".to_string(),
                    status: JobStatus::InProgress,
                    source_path: "/tmp/mayor.m4a".to_string(),
                    failure_detail: None,
                    duration_seconds: None,
                    created_on: None,
                }),
            ),
        ]
    }

    fn names(view: &[&StoredItem]) -> Vec<String> {
        view.iter().map(|s| s.item.name().to_string()).collect()
    }

    #[test]
    fn test_empty_search_all_returns_everything_in_order() {
        let items = fixture();
        let view = project(&items, "", TypeFilter::All);
        assert_eq!(view.len(), 3);
        for (a, b) in view.iter().zip(items.iter()) {
            assert_eq!(*a, b);
        }
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let items = fixture();
        assert_eq!(names(&project(&items, "LEVEE", TypeFilter::All)), vec!["Tim interview"]);
        assert_eq!(names(&project(&items, "friday", TypeFilter::All)), vec!["Tim interview"]);
        assert_eq!(names(&project(&items, "sacbee", TypeFilter::All)), vec!["Budget gap widens"]);
        assert_eq!(names(&project(&items, "sacramento", TypeFilter::All)), vec!["Budget gap widens"]);
        assert_eq!(names(&project(&items, "mayor", TypeFilter::All)), vec!["Mayor call"]);
        assert!(project(&items, "nothing matches", TypeFilter::All).is_empty());
    }

    #[test]
    fn test_search_matches_any_variant_field() {
        let items = fixture();
        // "a" appears somewhere in every item
        assert_eq!(project(&items, "a", TypeFilter::All).len(), 3);
    }

    #[test]
    fn test_type_filter() {
        let items = fixture();
        assert_eq!(names(&project(&items, "", TypeFilter::Interview)), vec!["Tim interview"]);
        assert_eq!(names(&project(&items, "", TypeFilter::Website)), vec!["Budget gap widens"]);
        assert_eq!(names(&project(&items, "", TypeFilter::Progress)), vec!["Mayor call"]);
        assert!(project(&items, "levee", TypeFilter::Website).is_empty());
    }

    #[test]
    fn test_projection_does_not_resort() {
        let mut items = fixture();
        items.reverse();
        assert_eq!(
            names(&project(&items, "", TypeFilter::All)),
            vec!["Mayor call", "Budget gap widens", "Tim interview"]
        );
    }

    #[test]
    fn test_unicode_search() {
        let items = vec![stored(
            "z.szhi",
            Item::Interview(Interview {
                name: "Entrevista con ÁLVARO".to_string(),
                ..Default::default()
            }),
        )];
        assert_eq!(project(&items, "álvaro", TypeFilter::All).len(), 1);
    }

    #[test]
    fn test_filter_parse_and_cycle() {
        assert_eq!("progress".parse::<TypeFilter>().unwrap(), TypeFilter::Progress);
        assert_eq!(" All ".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert!("audio".parse::<TypeFilter>().is_err());
        assert_eq!(TypeFilter::Progress.next(), TypeFilter::All);
        assert_eq!(TypeFilter::All.next(), TypeFilter::Interview);
    }
}
