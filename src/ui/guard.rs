//! Dirty tracking for the item open in the detail pane

use crate::core::error::{Error, Result};
use crate::items::model::{Item, StoredItem};
use std::fmt;
use std::str::FromStr;

pub const DISCARD_TITLE: &str = "Unsaved changes";
pub const DISCARD_MESSAGE: &str = "You will lose your changes on this document if you proceed.";

/// Asks the user to approve a destructive step
pub trait Confirm {
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}

impl<F: FnMut(&str, &str) -> bool> Confirm for F {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        self(title, message)
    }
}

/// Whether a guarded action may continue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Cancelled,
}

/// Editable text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Date,
    Body,
    Notes,
    Url,
    Publication,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Date => "Date",
            Field::Body => "Body",
            Field::Notes => "Notes",
            Field::Url => "URL",
            Field::Publication => "Publication",
        }
    }

    /// Fields the user can edit on an item, in display order
    pub fn editable_for(item: &Item) -> &'static [Field] {
        match item {
            Item::Interview(_) => &[Field::Name, Field::Date, Field::Body, Field::Notes],
            Item::Website(_) => &[
                Field::Name,
                Field::Date,
                Field::Url,
                Field::Publication,
                Field::Body,
            ],
            Item::Audio(_) => &[],
        }
    }

    /// Whether the field holds multi-line text
    pub fn is_multiline(self) -> bool {
        matches!(self, Field::Body | Field::Notes)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Field::Name),
            "date" => Ok(Field::Date),
            "body" => Ok(Field::Body),
            "notes" => Ok(Field::Notes),
            "url" => Ok(Field::Url),
            "pub" | "publication" => Ok(Field::Publication),
            other => Err(format!("unknown field `{}`", other)),
        }
    }
}

fn field_mut(item: &mut Item, field: Field) -> Option<&mut String> {
    match (item, field) {
        (Item::Interview(i), Field::Name) => Some(&mut i.name),
        (Item::Interview(i), Field::Date) => Some(&mut i.date),
        (Item::Interview(i), Field::Body) => Some(&mut i.body),
        (Item::Interview(i), Field::Notes) => Some(&mut i.notes),
        (Item::Website(w), Field::Name) => Some(&mut w.name),
        (Item::Website(w), Field::Date) => Some(&mut w.date),
        (Item::Website(w), Field::Body) => Some(&mut w.body),
        (Item::Website(w), Field::Url) => Some(&mut w.url),
        (Item::Website(w), Field::Publication) => Some(&mut w.publication),
        _ => None,
    }
}

/// Read a field's current value; `None` when the variant has no such field
pub fn field_value(item: &Item, field: Field) -> Option<&str> {
    match (item, field) {
        (Item::Interview(i), Field::Name) => Some(i.name.as_str()),
        (Item::Interview(i), Field::Date) => Some(i.date.as_str()),
        (Item::Interview(i), Field::Body) => Some(i.body.as_str()),
        (Item::Interview(i), Field::Notes) => Some(i.notes.as_str()),
        (Item::Website(w), Field::Name) => Some(w.name.as_str()),
        (Item::Website(w), Field::Date) => Some(w.date.as_str()),
        (Item::Website(w), Field::Body) => Some(w.body.as_str()),
        (Item::Website(w), Field::Url) => Some(w.url.as_str()),
        (Item::Website(w), Field::Publication) => Some(w.publication.as_str()),
        (Item::Audio(a), Field::Name) => Some(a.name.as_str()),
        (Item::Audio(a), Field::Date) => Some(a.date.as_str()),
        _ => None,
    }
}

/// The selected item: last persisted snapshot plus the working copy
#[derive(Debug, Clone)]
pub struct EditSession {
    file_name: String,
    snapshot: Item,
    current: Item,
}

impl EditSession {
    pub fn open(stored: &StoredItem) -> Self {
        Self {
            file_name: stored.file_name.clone(),
            snapshot: stored.item.clone(),
            current: stored.item.clone(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn current(&self) -> &Item {
        &self.current
    }

    pub fn snapshot(&self) -> &Item {
        &self.snapshot
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.snapshot
    }

    /// Replace one field of the working copy
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<()> {
        let kind = self.current.kind();
        let slot = field_mut(&mut self.current, field).ok_or_else(|| {
            Error::InvalidState(format!("{} items have no editable {} field", kind.label(), field))
        })?;
        *slot = value.into();
        Ok(())
    }

    /// Mutable access for incremental editing (typing into a field)
    pub fn field_mut(&mut self, field: Field) -> Option<&mut String> {
        field_mut(&mut self.current, field)
    }

    /// Throw away unsaved edits
    pub fn revert(&mut self) {
        self.current = self.snapshot.clone();
    }

    /// Record what was just written to disk as the new baseline
    pub fn mark_saved(&mut self, persisted: Item) {
        self.snapshot = persisted.clone();
        self.current = persisted;
    }
}

/// Gate an action that would discard the open item.
///
/// Clean or absent sessions proceed without asking. A dirty session asks
/// `confirm`; declining leaves everything as it was.
pub fn guard_discard(session: Option<&EditSession>, confirm: &mut impl Confirm) -> Navigation {
    match session {
        Some(session) if session.is_dirty() => {
            if confirm.confirm(DISCARD_TITLE, DISCARD_MESSAGE) {
                Navigation::Proceed
            } else {
                Navigation::Cancelled
            }
        }
        _ => Navigation::Proceed,
    }
}
