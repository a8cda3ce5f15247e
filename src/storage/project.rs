use crate::core::error::{Error, Result};
use crate::indexing::scanner::{scan_with_report, SkippedFile};
use crate::items::codec::encode;
use crate::items::model::{generate_file_name, Interview, Item, ItemKind, StoredItem, WebsiteReference};
use crate::transcription::client::TranscriptionService;
use crate::transcription::job::{self, RefreshOutcome};
use crate::ui::guard::{guard_discard, Confirm, EditSession, Field, Navigation};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DELETE_TITLE: &str = "Delete item";

/// What the user asked to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewItem {
    Interview {
        name: String,
        date: String,
    },
    Website {
        name: String,
        date: String,
        url: String,
        publication: String,
    },
}

impl NewItem {
    fn into_item(self) -> Item {
        match self {
            NewItem::Interview { name, date } => Item::Interview(Interview {
                name,
                date,
                ..Default::default()
            }),
            NewItem::Website {
                name,
                date,
                url,
                publication,
            } => Item::Website(WebsiteReference {
                name,
                date,
                body: String::new(),
                url,
                publication,
            }),
        }
    }
}

/// An open project folder.
///
/// The item list is never patched in place: every mutation writes to disk and
/// then rescans the folder. Every action takes `&mut self`, so at most one
/// save, delete or vendor call is in flight per project.
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    items: Vec<StoredItem>,
    skipped: Vec<SkippedFile>,
    session: Option<EditSession>,
}

impl Project {
    /// Scan `root` and select the newest item
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let mut project = Self {
            root: root.into(),
            items: Vec::new(),
            skipped: Vec::new(),
            session: None,
        };
        project.rescan()?;
        project.session = project.items.first().map(EditSession::open);
        info!(root = %project.root.display(), items = project.items.len(), "Opened project");
        Ok(project)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder name shown as the project title
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    pub fn items(&self) -> &[StoredItem] {
        &self.items
    }

    /// Recognised files the last scan could not load
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    pub fn find(&self, file_name: &str) -> Option<&StoredItem> {
        self.items.iter().find(|s| s.file_name == file_name)
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        self.session.as_mut()
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.file_name())
    }

    pub fn is_dirty(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_dirty())
    }

    fn rescan(&mut self) -> Result<()> {
        let report = scan_with_report(&self.root)?;
        self.items = report.items;
        self.skipped = report.skipped;
        Ok(())
    }

    /// Rebuild the item list from disk.
    ///
    /// The selection survives if its file is still there; unsaved edits are
    /// kept, otherwise the session picks up the on-disk version.
    pub fn reload(&mut self) -> Result<()> {
        self.rescan()?;

        self.session = match self.session.take() {
            Some(session) => match self.find(session.file_name()) {
                Some(_) if session.is_dirty() => Some(session),
                Some(stored) => Some(EditSession::open(stored)),
                None => {
                    debug!(file = session.file_name(), "Selected item is gone, clearing selection");
                    None
                }
            },
            None => None,
        };
        Ok(())
    }

    /// Select `file_name`, asking before unsaved edits are discarded
    pub fn select(&mut self, file_name: &str, confirm: &mut impl Confirm) -> Result<Navigation> {
        if self.selected_file() == Some(file_name) {
            return Ok(Navigation::Proceed);
        }
        let stored = self
            .find(file_name)
            .ok_or_else(|| Error::InvalidState(format!("no item named {} in this project", file_name)))?;
        let next = EditSession::open(stored);

        if guard_discard(self.session.as_ref(), confirm) == Navigation::Cancelled {
            return Ok(Navigation::Cancelled);
        }
        self.session = Some(next);
        Ok(Navigation::Proceed)
    }

    /// Whether the project may be closed
    pub fn request_close(&self, confirm: &mut impl Confirm) -> Navigation {
        guard_discard(self.session.as_ref(), confirm)
    }

    /// Change a field of the open item in memory
    pub fn edit(&mut self, field: Field, value: impl Into<String>) -> Result<()> {
        self.session
            .as_mut()
            .ok_or_else(|| Error::InvalidState("no item is open".to_string()))?
            .set_field(field, value)
    }

    /// Persist the open item. Returns `false` when nothing is open.
    pub fn save_selected(&mut self) -> Result<bool> {
        let Some(session) = self.session.as_ref() else {
            return Ok(false);
        };
        if matches!(session.current(), Item::Audio(_)) {
            // Jobs are only written by refresh and conversion
            return Ok(false);
        }
        let file_name = session.file_name().to_string();
        let item = session.current().clone();
        self.write_item(&file_name, &item)?;
        info!(file = %file_name, "Saved item");

        self.rescan()?;
        if let Some(session) = self.session.as_mut() {
            session.mark_saved(item);
        }
        Ok(true)
    }

    /// Write a new item, rescan, and select it
    pub fn create(&mut self, new_item: NewItem, confirm: &mut impl Confirm) -> Result<Option<String>> {
        if guard_discard(self.session.as_ref(), confirm) == Navigation::Cancelled {
            return Ok(None);
        }
        let item = new_item.into_item();
        let file_name = generate_file_name(item.name(), item.kind());
        self.write_item(&file_name, &item)?;
        info!(file = %file_name, kind = item.kind().label(), "Created item");

        self.rescan()?;
        self.session = self.find(&file_name).map(EditSession::open);
        Ok(Some(file_name))
    }

    /// Delete the open item after confirmation
    pub fn delete_selected(&mut self, confirm: &mut impl Confirm) -> Result<Navigation> {
        let Some(session) = self.session.as_ref() else {
            return Err(Error::InvalidState("no item is open".to_string()));
        };
        let message = format!("Delete \"{}\"? This cannot be undone.", session.snapshot().name());
        if !confirm.confirm(DELETE_TITLE, &message) {
            return Ok(Navigation::Cancelled);
        }

        let file_name = session.file_name().to_string();
        self.remove_item_file(&file_name)?;
        info!(file = %file_name, "Deleted item");

        self.session = None;
        self.rescan()?;
        Ok(Navigation::Proceed)
    }

    /// Upload an audio file and add a job item for it
    pub async fn submit_audio<S: TranscriptionService>(
        &mut self,
        service: &S,
        audio_path: &Path,
        confirm: &mut impl Confirm,
    ) -> Result<Option<String>> {
        if guard_discard(self.session.as_ref(), confirm) == Navigation::Cancelled {
            return Ok(None);
        }

        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let audio_job = job::submit(service, audio_path, &today).await?;
        let item = Item::Audio(audio_job);
        let file_name = generate_file_name(item.name(), ItemKind::Audio);
        self.write_item(&file_name, &item)?;
        info!(file = %file_name, "Created transcription job");

        self.rescan()?;
        self.session = self.find(&file_name).map(EditSession::open);
        Ok(Some(file_name))
    }

    /// Poll the vendor for the open audio job and persist the new state
    pub async fn refresh_selected<S: TranscriptionService>(&mut self, service: &S) -> Result<RefreshOutcome> {
        let (file_name, audio_job) = self.selected_audio_job()?;

        let outcome = job::refresh(service, &audio_job).await?;
        if let RefreshOutcome::Updated(updated) = &outcome {
            self.write_item(&file_name, &Item::Audio(updated.clone()))?;
            self.rescan()?;
            self.session = self.find(&file_name).map(EditSession::open);
        }
        Ok(outcome)
    }

    /// Replace the open transcribed job with an interview holding its transcript.
    ///
    /// The interview is written before the job file is removed, so a failure
    /// in between leaves both files rather than neither.
    pub async fn convert_selected<S: TranscriptionService>(&mut self, service: &S) -> Result<String> {
        let (job_file, audio_job) = self.selected_audio_job()?;

        let interview = job::convert_to_interview(service, &audio_job).await?;
        let item = Item::Interview(interview);
        let file_name = generate_file_name(item.name(), ItemKind::Interview);

        self.write_item(&file_name, &item)?;
        let removed = match self.remove_item_file(&job_file) {
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(job = %job_file, "Job file was already gone");
                Ok(())
            }
            other => other,
        };

        // The interview is on disk from here on and becomes the selection
        self.rescan()?;
        self.session = self.find(&file_name).map(EditSession::open);
        removed?;
        info!(job = %job_file, interview = %file_name, "Converted transcription job to interview");
        Ok(file_name)
    }

    fn selected_audio_job(&self) -> Result<(String, crate::items::model::AudioJob)> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| Error::InvalidState("no item is open".to_string()))?;
        match session.snapshot() {
            Item::Audio(audio_job) => Ok((session.file_name().to_string(), audio_job.clone())),
            other => Err(Error::InvalidState(format!(
                "{} is not a transcription job",
                other.name()
            ))),
        }
    }

    fn item_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    fn write_item(&self, file_name: &str, item: &Item) -> Result<()> {
        std::fs::write(self.item_path(file_name), encode(item))?;
        Ok(())
    }

    fn remove_item_file(&self, file_name: &str) -> Result<()> {
        std::fs::remove_file(self.item_path(file_name))?;
        Ok(())
    }
}
