use anyhow::{Context, Result};
use clap::Parser;
use interview_manager::core::app::{AppState, DispatchOutcome, MenuCommand, SettingsChange};
use interview_manager::core::config::Config;
use interview_manager::indexing::scanner::scan_with_report;
use interview_manager::items::model::{Item, StoredItem};
use interview_manager::storage::project::{NewItem, Project};
use interview_manager::transcription::client::RevAiClient;
use interview_manager::transcription::job::RefreshOutcome;
use interview_manager::ui::cli::{Cli, Commands, NewCommand};
use interview_manager::ui::guard::{Confirm, Field, Navigation};
use interview_manager::ui::sidebar::{self, TypeFilter};
use interview_manager::ui::tui::Browser;
use interview_manager::web::metadata::fetch_page_metadata;
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Asks on the terminal; anything but "y" declines
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        print!("{}: {} [y/N] ", title, message);
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn accept_all(_: &str, _: &str) -> bool {
    true
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::new(cli.config_dir.clone())?;

    let browsing = matches!(cli.command, None | Some(Commands::Browse { .. }));
    init_logging(&config, browsing)?;

    let mut app = AppState::load(config).context("Failed to load settings")?;
    let api_key = cli.api_key.clone();

    match cli.command {
        None => handle_browse(app, None, api_key).await,
        Some(Commands::Browse { dir }) => handle_browse(app, dir, api_key).await,
        Some(Commands::Open { dir }) => handle_open(&mut app, &dir),
        Some(Commands::List { dir, search, kind }) => handle_list(&dir, &search, kind),
        Some(Commands::Show { dir, file }) => handle_show(&dir, &file),
        Some(Commands::New { item }) => handle_new(&mut app, item).await,
        Some(Commands::Edit { dir, file, field, value }) => handle_edit(&dir, &file, field, value),
        Some(Commands::Delete { dir, file, yes }) => handle_delete(&dir, &file, yes),
        Some(Commands::Transcribe { dir, audio }) => {
            handle_transcribe(&app, api_key.as_deref(), &dir, &audio).await
        }
        Some(Commands::Refresh { dir, file }) => handle_refresh(&app, api_key.as_deref(), &dir, &file).await,
        Some(Commands::Convert { dir, file }) => handle_convert(&app, api_key.as_deref(), &dir, &file).await,
        Some(Commands::Settings {
            set_api_key,
            clear_recent,
        }) => handle_settings(&mut app, set_api_key, clear_recent),
        Some(Commands::Recent) => handle_recent(&app),
    }
}

/// `RUST_LOG` wins; otherwise only warnings. The browser owns the terminal,
/// so it logs to a file instead of stderr.
fn init_logging(config: &Config, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if to_file {
        config.init()?;
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_path)
            .with_context(|| format!("Failed to open log file {}", config.log_path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(log_file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

fn api_key_or_settings(app: &AppState, api_key: Option<&str>) -> String {
    api_key
        .filter(|k| !k.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| app.settings.api_key.clone())
}

/// Open `dir` and select `file` in it
fn open_at(dir: &Path, file: &str) -> Result<Project> {
    let mut project = Project::open(dir)?;
    project
        .select(file, &mut accept_all)
        .with_context(|| format!("No item {} in {}", file, dir.display()))?;
    Ok(project)
}

async fn handle_browse(app: AppState, dir: Option<PathBuf>, api_key: Option<String>) -> Result<()> {
    let mut browser = Browser::new(app, api_key);
    browser.open_initial(dir);
    browser.run().await?;
    Ok(())
}

fn handle_open(app: &mut AppState, dir: &Path) -> Result<()> {
    app.dispatch(MenuCommand::OpenProject(dir.to_path_buf()), &mut accept_all)?;
    let Some(project) = app.project() else {
        return Ok(());
    };

    println!("Opened project: {}", project.name());
    println!("  Items: {}", project.items().len());
    if !project.skipped().is_empty() {
        println!("  Skipped (could not be read): {}", project.skipped().len());
        for skipped in project.skipped() {
            println!("    ✗ {}: {}", skipped.path.display(), skipped.reason);
        }
    }
    Ok(())
}

fn print_row(stored: &StoredItem) {
    let date = if stored.item.date().is_empty() {
        "(no date)"
    } else {
        stored.item.date()
    };
    println!("{:<12} {:<26} {}", date, stored.item.kind().label(), stored.item.name());
    println!("             {}", stored.file_name);
}

fn handle_list(dir: &Path, search: &str, kind: TypeFilter) -> Result<()> {
    let report = scan_with_report(dir)?;
    let visible = sidebar::project(&report.items, search, kind);

    if visible.is_empty() {
        println!("No items found in {}", dir.display());
    } else {
        println!("Found {} items:\n", visible.len());
        for stored in visible {
            print_row(stored);
        }
    }

    if !report.skipped.is_empty() {
        eprintln!("\n⚠ {} files could not be read", report.skipped.len());
    }
    Ok(())
}

fn handle_show(dir: &Path, file: &str) -> Result<()> {
    let project = open_at(dir, file)?;
    let Some(session) = project.session() else {
        return Ok(());
    };

    match session.current() {
        Item::Interview(interview) => {
            println!("Interview: {}", interview.name);
            println!("Date: {}", interview.date);
            println!("\n{}", interview.body);
            if !interview.notes.is_empty() {
                println!("\nNotes:\n{}", interview.notes);
            }
        }
        Item::Website(website) => {
            println!("Website: {}", website.name);
            println!("URL: {}", website.url);
            println!("Publication: {}", website.publication);
            println!("Date: {}", website.date);
            if !website.body.is_empty() {
                println!("\n{}", website.body);
            }
        }
        Item::Audio(job) => {
            println!("Transcription: {}", job.name);
            println!("Status: {}", job.status);
            println!("Job id: {}", job.job_id);
            println!("Audio: {}", job.source_path);
            if let Some(seconds) = job.duration_seconds {
                println!("Duration: {:.0}s", seconds);
            }
            if let Some(detail) = &job.failure_detail {
                println!("Failure: {}", detail);
            }
        }
    }
    Ok(())
}

async fn handle_new(app: &mut AppState, command: NewCommand) -> Result<()> {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let (dir, new_item) = match command {
        NewCommand::Interview { dir, name, date } => (
            dir,
            NewItem::Interview {
                name,
                date: date.unwrap_or(today),
            },
        ),
        NewCommand::Website {
            dir,
            url,
            name,
            publication,
            date,
            fetch,
        } => {
            let fetched = if fetch {
                match fetch_page_metadata(&url).await {
                    Ok(metadata) => Some(metadata),
                    Err(e) => {
                        eprintln!("⚠ Could not read page metadata: {}", e);
                        None
                    }
                }
            } else {
                None
            };
            let fetched = fetched.unwrap_or_default();
            (
                dir,
                NewItem::Website {
                    name: name.unwrap_or(fetched.name),
                    date: date.unwrap_or(fetched.date),
                    url,
                    publication: publication.unwrap_or(fetched.publication),
                },
            )
        }
    };

    app.dispatch(MenuCommand::OpenProject(dir), &mut accept_all)?;
    match app.dispatch(MenuCommand::NewItem(new_item), &mut accept_all)? {
        DispatchOutcome::Created(file) => println!("✓ Created {}", file),
        _ => println!("Nothing created"),
    }
    Ok(())
}

fn handle_edit(dir: &Path, file: &str, field: Field, value: String) -> Result<()> {
    let mut project = open_at(dir, file)?;
    project.edit(field, value)?;
    if project.save_selected()? {
        println!("✓ Saved {} of {}", field, file);
    }
    Ok(())
}

fn handle_delete(dir: &Path, file: &str, yes: bool) -> Result<()> {
    let mut project = open_at(dir, file)?;
    let nav = if yes {
        project.delete_selected(&mut accept_all)?
    } else {
        project.delete_selected(&mut StdinConfirm)?
    };
    match nav {
        Navigation::Proceed => println!("✓ Deleted {}", file),
        Navigation::Cancelled => println!("Cancelled"),
    }
    Ok(())
}

async fn handle_transcribe(app: &AppState, api_key: Option<&str>, dir: &Path, audio: &Path) -> Result<()> {
    let client = RevAiClient::new(api_key_or_settings(app, api_key))?;
    let mut project = Project::open(dir)?;

    println!("Uploading {}...", audio.display());
    if let Some(file) = project.submit_audio(&client, audio, &mut accept_all).await? {
        println!("✓ Created transcription job {}", file);
        println!("\nNext steps:");
        println!("  1. Check progress: interview-manager refresh {} {}", dir.display(), file);
        println!("  2. When transcribed: interview-manager convert {} {}", dir.display(), file);
    }
    Ok(())
}

async fn handle_refresh(app: &AppState, api_key: Option<&str>, dir: &Path, file: &str) -> Result<()> {
    let client = RevAiClient::new(api_key_or_settings(app, api_key))?;
    let mut project = open_at(dir, file)?;

    match project.refresh_selected(&client).await? {
        RefreshOutcome::Unchanged => println!("Job is already finished; nothing to check"),
        RefreshOutcome::Updated(job) => {
            println!("Status: {}", job.status);
            if let Some(detail) = job.failure_detail {
                println!("Failure: {}", detail);
            }
        }
    }
    Ok(())
}

async fn handle_convert(app: &AppState, api_key: Option<&str>, dir: &Path, file: &str) -> Result<()> {
    let client = RevAiClient::new(api_key_or_settings(app, api_key))?;
    let mut project = open_at(dir, file)?;

    let interview_file = project.convert_selected(&client).await?;
    println!("✓ Converted {} into interview {}", file, interview_file);
    Ok(())
}

fn handle_settings(app: &mut AppState, set_api_key: Option<String>, clear_recent: bool) -> Result<()> {
    if let Some(key) = set_api_key {
        app.dispatch(MenuCommand::Settings(SettingsChange::SetApiKey(key)), &mut accept_all)?;
        println!("✓ Saved API key");
    }
    if clear_recent {
        app.dispatch(MenuCommand::Settings(SettingsChange::ClearRecent), &mut accept_all)?;
        println!("✓ Cleared recent projects");
    }

    println!("Settings: {}", app.config.settings_path.display());
    println!(
        "  API key: {}",
        if app.settings.api_key.is_empty() { "(not set)" } else { "set" }
    );
    println!("  Recent projects: {}", app.settings.recent.len());
    Ok(())
}

fn handle_recent(app: &AppState) -> Result<()> {
    if app.settings.recent.is_empty() {
        println!("No recent projects.");
        return Ok(());
    }
    for (i, dir) in app.settings.recent.iter().enumerate() {
        println!("{}. {}", i + 1, dir);
    }
    Ok(())
}
