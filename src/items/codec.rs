//! On-disk representation of items.
//!
//! The canonical format is one JSON object per file. Interview and website
//! files written by early releases used a `---` YAML header followed by the
//! body; those are still readable, and the next save rewrites them as JSON.

use super::model::{AudioJob, Interview, Item, ItemKind, JobStatus, WebsiteReference};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const INTERVIEW_KEYS: &[&str] = &["name", "date", "body", "notes"];
const WEBSITE_KEYS: &[&str] = &["name", "date", "body", "url", "pub"];
const AUDIO_KEYS: &[&str] = &["name", "date", "id", "status"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("invalid field value: {0}")]
    InvalidField(String),

    #[error("malformed item file: {0}")]
    Malformed(String),
}

#[derive(Serialize, Deserialize)]
struct InterviewRecord {
    name: String,
    date: String,
    body: String,
    notes: String,
}

#[derive(Serialize, Deserialize)]
struct WebsiteRecord {
    name: String,
    date: String,
    body: String,
    url: String,
    #[serde(rename = "pub")]
    publication: String,
}

#[derive(Serialize, Deserialize)]
struct AudioRecord {
    name: String,
    date: String,
    id: String,
    status: JobStatus,
    #[serde(default)]
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_on: Option<String>,
}

/// Decode the contents of an item file of the given kind
pub fn decode(raw: &str, kind: ItemKind) -> Result<Item, DecodeError> {
    let trimmed = raw.trim_start_matches('\u{feff}').trim_start();

    let fields = if trimmed.starts_with('{') {
        parse_json_object(trimmed)?
    } else if trimmed.starts_with("---") {
        if kind == ItemKind::Audio {
            return Err(DecodeError::Malformed(
                "audio jobs are only stored as JSON".to_string(),
            ));
        }
        parse_front_matter(trimmed)?
    } else {
        return Err(DecodeError::Malformed(
            "expected a JSON object or a front-matter header".to_string(),
        ));
    };

    let required = match kind {
        ItemKind::Interview => INTERVIEW_KEYS,
        ItemKind::Website => WEBSITE_KEYS,
        ItemKind::Audio => AUDIO_KEYS,
    };
    if let Some(missing) = required.iter().find(|key| !fields.contains_key(**key)) {
        return Err(DecodeError::MissingField(missing.to_string()));
    }

    let value = Value::Object(fields);
    let item = match kind {
        ItemKind::Interview => {
            let r: InterviewRecord = from_value(value)?;
            Item::Interview(Interview {
                name: r.name,
                date: r.date,
                body: r.body,
                notes: r.notes,
            })
        }
        ItemKind::Website => {
            let r: WebsiteRecord = from_value(value)?;
            Item::Website(WebsiteReference {
                name: r.name,
                date: r.date,
                body: r.body,
                url: r.url,
                publication: r.publication,
            })
        }
        ItemKind::Audio => {
            let r: AudioRecord = from_value(value)?;
            Item::Audio(AudioJob {
                name: r.name,
                date: r.date,
                job_id: r.id,
                status: r.status,
                source_path: r.path,
                failure_detail: r.failure_detail,
                duration_seconds: r.duration_seconds,
                created_on: r.created_on,
            })
        }
    };
    Ok(item)
}

/// Encode an item as its canonical JSON file contents
pub fn encode(item: &Item) -> String {
    let result = match item {
        Item::Interview(i) => serde_json::to_string_pretty(&InterviewRecord {
            name: i.name.clone(),
            date: i.date.clone(),
            body: i.body.clone(),
            notes: i.notes.clone(),
        }),
        Item::Website(w) => serde_json::to_string_pretty(&WebsiteRecord {
            name: w.name.clone(),
            date: w.date.clone(),
            body: w.body.clone(),
            url: w.url.clone(),
            publication: w.publication.clone(),
        }),
        Item::Audio(a) => serde_json::to_string_pretty(&AudioRecord {
            name: a.name.clone(),
            date: a.date.clone(),
            id: a.job_id.clone(),
            status: a.status,
            path: a.source_path.clone(),
            failure_detail: a.failure_detail.clone(),
            // NaN and infinities have no JSON form
            duration_seconds: a.duration_seconds.filter(|d| d.is_finite()),
            created_on: a.created_on.clone(),
        }),
    };
    // Records hold only strings, finite numbers and unit enums.
    result.unwrap_or_default()
}

fn parse_json_object(raw: &str) -> Result<Map<String, Value>, DecodeError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(DecodeError::Malformed("top-level value is not an object".to_string())),
        Err(e) => Err(DecodeError::Malformed(e.to_string())),
    }
}

/// Split a `---` header from the body and flatten the header into string fields.
/// The body is stored under `body`.
fn parse_front_matter(raw: &str) -> Result<Map<String, Value>, DecodeError> {
    let normalized = raw.replace("\r\n", "\n");
    let rest = normalized
        .strip_prefix("---\n")
        .ok_or_else(|| DecodeError::Malformed("front-matter must open with `---`".to_string()))?;

    let (header, body) = if let Some(body) = rest.strip_prefix("---\n") {
        ("", body)
    } else {
        match rest.find("\n---") {
            Some(end) => {
                let after = &rest[end + 4..];
                let body = after.strip_prefix('\n').unwrap_or(after);
                (&rest[..end], body)
            }
            None => {
                return Err(DecodeError::Malformed(
                    "front-matter header is not closed".to_string(),
                ))
            }
        }
    };

    let yaml: serde_yaml::Value = if header.trim().is_empty() {
        serde_yaml::Value::Mapping(Default::default())
    } else {
        serde_yaml::from_str(header).map_err(|e| DecodeError::Malformed(e.to_string()))?
    };
    let mapping = yaml
        .as_mapping()
        .ok_or_else(|| DecodeError::Malformed("front-matter header is not a mapping".to_string()))?;

    let mut fields = Map::new();
    for (key, value) in mapping {
        let Some(key) = key.as_str() else { continue };
        let text = match value {
            serde_yaml::Value::String(s) => s.clone(),
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            serde_yaml::Value::Null => String::new(),
            _ => {
                return Err(DecodeError::InvalidField(format!(
                    "`{}` must be a plain value",
                    key
                )))
            }
        };
        fields.insert(key.to_string(), Value::String(text));
    }
    fields.insert("body".to_string(), Value::String(body.to_string()));
    Ok(fields)
}

fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|e| DecodeError::InvalidField(e.to_string()))
}
