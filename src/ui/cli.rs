use crate::ui::guard::Field;
use crate::ui::sidebar::TypeFilter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// interview-manager - Keep interviews, web references and transcriptions for a story in one folder
#[derive(Parser, Debug)]
#[command(name = "interview-manager")]
#[command(about = "Project-folder note keeper for journalists", long_about = None)]
#[command(version)]
#[command(subcommand_required = false)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Custom config directory (default: platform config dir/interview-manager)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Transcription API key (overrides the one saved in settings)
    #[arg(long, global = true, env = "INTERVIEW_MANAGER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a project folder and add it to the recent list
    Open {
        /// Path to the project folder
        dir: PathBuf,
    },
    /// List the items in a project, newest first
    List {
        /// Path to the project folder
        dir: PathBuf,
        /// Only show items containing this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Item type: All, Interview, Website or Progress
        #[arg(short, long, default_value_t = TypeFilter::All)]
        kind: TypeFilter,
    },
    /// Print one item
    Show {
        /// Path to the project folder
        dir: PathBuf,
        /// Item file name
        file: String,
    },
    /// Create a new item
    New {
        #[command(subcommand)]
        item: NewCommand,
    },
    /// Change one field of an item and save it
    Edit {
        /// Path to the project folder
        dir: PathBuf,
        /// Item file name
        file: String,
        /// Field to change: name, date, body, notes, url, pub
        field: Field,
        /// New value
        value: String,
    },
    /// Delete an item
    Delete {
        /// Path to the project folder
        dir: PathBuf,
        /// Item file name
        file: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Upload an audio file for transcription
    Transcribe {
        /// Path to the project folder
        dir: PathBuf,
        /// Audio file to upload
        audio: PathBuf,
    },
    /// Check the status of a transcription job
    Refresh {
        /// Path to the project folder
        dir: PathBuf,
        /// Job file name
        file: String,
    },
    /// Turn a finished transcription job into an interview
    Convert {
        /// Path to the project folder
        dir: PathBuf,
        /// Job file name
        file: String,
    },
    /// Show or change settings
    Settings {
        /// Save a transcription API key
        #[arg(long = "set-api-key", value_name = "KEY")]
        set_api_key: Option<String>,
        /// Forget the recent projects list
        #[arg(long)]
        clear_recent: bool,
    },
    /// List recently opened projects
    Recent,
    /// Browse a project in the terminal (default: most recent project)
    Browse {
        /// Path to the project folder
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum NewCommand {
    /// Create an empty interview
    Interview {
        /// Path to the project folder
        dir: PathBuf,
        /// Interview name
        name: String,
        /// Date (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Create a website reference
    Website {
        /// Path to the project folder
        dir: PathBuf,
        /// Page address
        url: String,
        /// Reference name
        #[arg(short, long)]
        name: Option<String>,
        /// Publication name
        #[arg(short, long)]
        publication: Option<String>,
        /// Date
        #[arg(short, long)]
        date: Option<String>,
        /// Prefill missing values from the page's metadata
        #[arg(short, long)]
        fetch: bool,
    },
}
