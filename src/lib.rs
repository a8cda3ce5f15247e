// Core functionality
pub mod core {
    pub mod app;
    pub mod config;
    pub mod error;
}

// Item records and their file format
pub mod items {
    pub mod codec;
    pub mod model;
}

// Project folder scanning
pub mod indexing {
    pub mod scanner;
}

// Open project state
pub mod storage {
    pub mod project;
}

// Audio transcription
pub mod transcription {
    pub mod client;
    pub mod formatter;
    pub mod job;
}

// Website metadata
pub mod web {
    pub mod metadata;
}

// User interfaces
pub mod ui {
    pub mod cli;
    pub mod guard;
    pub mod sidebar;
    pub mod tui;
}

// Re-export commonly used types
pub use core::app::{AppState, DispatchOutcome, MenuCommand, SettingsChange};
pub use core::config::{Config, Settings};
pub use core::error::{Error, Result};
pub use indexing::scanner::{scan, scan_with_report, ScanReport};
pub use items::codec::{decode, encode, DecodeError};
pub use items::model::{AudioJob, Interview, Item, ItemKind, JobStatus, StoredItem, WebsiteReference};
pub use storage::project::{NewItem, Project};
pub use transcription::client::{RevAiClient, TranscriptionService, VendorError};
pub use transcription::formatter::format_transcript;
pub use ui::cli::Cli;
pub use ui::guard::{Confirm, EditSession, Field, Navigation};
pub use ui::sidebar::TypeFilter;
pub use ui::tui::Browser;
