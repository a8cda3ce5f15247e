//! Application state shared by the CLI and the terminal browser
//!
//! Settings and the open project travel together in [`AppState`]; menu and
//! keyboard triggers become [`MenuCommand`]s routed through
//! [`AppState::dispatch`].

use super::config::{Config, Settings};
use super::error::{Error, Result};
use crate::storage::project::{NewItem, Project};
use crate::ui::guard::{guard_discard, Confirm, Navigation};
use std::path::PathBuf;
use tracing::info;

/// A settings mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsChange {
    SetApiKey(String),
    ClearRecent,
}

/// User-facing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    OpenProject(PathBuf),
    NewItem(NewItem),
    Save,
    Settings(SettingsChange),
}

impl MenuCommand {
    /// Build a command from a menu id and the text the user entered for it.
    ///
    /// `new` creates an interview named `argument` dated today; `settings`
    /// sets the API key.
    pub fn from_menu_id(id: &str, argument: &str) -> Result<Self> {
        let argument = argument.trim();
        match id {
            "open" if !argument.is_empty() => Ok(MenuCommand::OpenProject(PathBuf::from(argument))),
            "new" => Ok(MenuCommand::NewItem(NewItem::Interview {
                name: argument.to_string(),
                date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            })),
            "save" => Ok(MenuCommand::Save),
            "settings" => Ok(MenuCommand::Settings(SettingsChange::SetApiKey(argument.to_string()))),
            "open" => Err(Error::InvalidState("open needs a folder".to_string())),
            other => Err(Error::InvalidState(format!("unknown menu id `{}`", other))),
        }
    }
}

/// What a dispatched command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A project was opened; carries its name
    Opened(String),
    /// A new item was written; carries its file name
    Created(String),
    /// The open item was written
    Saved,
    SettingsUpdated,
    /// Nothing to do, or the user declined a confirmation
    Nothing,
}

#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub settings: Settings,
    pub project: Option<Project>,
}

impl AppState {
    /// Load settings for `config`, creating the settings file on first run
    pub fn load(config: Config) -> Result<Self> {
        let settings = Settings::load_or_init(&config)?;
        Ok(Self {
            config,
            settings,
            project: None,
        })
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn project_mut(&mut self) -> Option<&mut Project> {
        self.project.as_mut()
    }

    /// The open project, or an error naming what needed one
    pub fn require_project(&mut self) -> Result<&mut Project> {
        self.project
            .as_mut()
            .ok_or_else(|| Error::InvalidState("no project is open".to_string()))
    }

    /// Close the current project (guarded) and open `dir`.
    ///
    /// A successful open moves `dir` to the front of the recent list.
    pub fn open_project(&mut self, dir: impl Into<PathBuf>, confirm: &mut impl Confirm) -> Result<Navigation> {
        let dir = dir.into();
        let session = self.project.as_ref().and_then(|p| p.session());
        if guard_discard(session, confirm) == Navigation::Cancelled {
            return Ok(Navigation::Cancelled);
        }

        let project = Project::open(&dir)?;
        let recent_path = std::fs::canonicalize(&dir).unwrap_or(dir);
        self.settings.push_recent(&recent_path);
        self.settings.save(&self.config)?;
        self.project = Some(project);
        Ok(Navigation::Proceed)
    }

    /// Apply a settings change and persist it
    pub fn update_settings(&mut self, change: SettingsChange) -> Result<()> {
        match change {
            SettingsChange::SetApiKey(key) => self.settings.api_key = key.trim().to_string(),
            SettingsChange::ClearRecent => self.settings.clear_recent(),
        }
        self.settings.save(&self.config)?;
        info!(path = %self.config.settings_path.display(), "Settings saved");
        Ok(())
    }

    pub fn dispatch(&mut self, command: MenuCommand, confirm: &mut impl Confirm) -> Result<DispatchOutcome> {
        match command {
            MenuCommand::OpenProject(dir) => match self.open_project(dir, confirm)? {
                Navigation::Proceed => Ok(DispatchOutcome::Opened(
                    self.project.as_ref().map(|p| p.name()).unwrap_or_default(),
                )),
                Navigation::Cancelled => Ok(DispatchOutcome::Nothing),
            },
            MenuCommand::NewItem(new_item) => match self.require_project()?.create(new_item, confirm)? {
                Some(file_name) => Ok(DispatchOutcome::Created(file_name)),
                None => Ok(DispatchOutcome::Nothing),
            },
            MenuCommand::Save => match self.project.as_mut() {
                Some(project) => {
                    if project.save_selected()? {
                        Ok(DispatchOutcome::Saved)
                    } else {
                        Ok(DispatchOutcome::Nothing)
                    }
                }
                None => Ok(DispatchOutcome::Nothing),
            },
            MenuCommand::Settings(change) => {
                self.update_settings(change)?;
                Ok(DispatchOutcome::SettingsUpdated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::guard::Field;
    use tempfile::TempDir;

    fn state(temp_dir: &TempDir) -> AppState {
        let config = Config::new(Some(temp_dir.path().join("config"))).unwrap();
        AppState::load(config).unwrap()
    }

    fn accept() -> impl FnMut(&str, &str) -> bool {
        |_: &str, _: &str| true
    }

    #[test]
    fn test_from_menu_id() {
        assert_eq!(MenuCommand::from_menu_id("save", "").unwrap(), MenuCommand::Save);
        assert_eq!(
            MenuCommand::from_menu_id("open", "/tmp/story").unwrap(),
            MenuCommand::OpenProject(PathBuf::from("/tmp/story"))
        );
        assert!(matches!(
            MenuCommand::from_menu_id("new", "Tim interview").unwrap(),
            MenuCommand::NewItem(NewItem::Interview { ref name, .. }) if name == "Tim interview"
        ));
        assert_eq!(
            MenuCommand::from_menu_id("settings", " key ").unwrap(),
            MenuCommand::Settings(SettingsChange::SetApiKey("key".to_string()))
        );
        assert!(MenuCommand::from_menu_id("open", "").is_err());
        assert!(MenuCommand::from_menu_id("export", "").is_err());
    }

    #[test]
    fn test_save_without_project_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = state(&temp_dir);
        assert_eq!(app.dispatch(MenuCommand::Save, &mut accept()).unwrap(), DispatchOutcome::Nothing);
    }

    #[test]
    fn test_open_records_recent() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path().join("story");
        std::fs::create_dir_all(&project_dir).unwrap();
        let mut app = state(&temp_dir);

        let outcome = app
            .dispatch(MenuCommand::OpenProject(project_dir.clone()), &mut accept())
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Opened("story".to_string()));

        let reloaded = Settings::load_or_init(&app.config).unwrap();
        assert_eq!(reloaded.recent.len(), 1);
        assert!(reloaded.recent[0].ends_with("story"));
    }

    #[test]
    fn test_open_guarded_by_dirty_item() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();
        let mut app = state(&temp_dir);

        app.dispatch(MenuCommand::OpenProject(first), &mut accept()).unwrap();
        app.dispatch(MenuCommand::from_menu_id("new", "Tim").unwrap(), &mut accept())
            .unwrap();
        app.require_project().unwrap().edit(Field::Body, "draft").unwrap();

        let outcome = app
            .dispatch(MenuCommand::OpenProject(second), &mut |_: &str, _: &str| false)
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Nothing);
        assert_eq!(app.project().unwrap().name(), "first");
        assert!(app.project().unwrap().is_dirty());
    }

    #[test]
    fn test_save_routes_to_open_item() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path().join("story");
        std::fs::create_dir_all(&project_dir).unwrap();
        let mut app = state(&temp_dir);

        app.dispatch(MenuCommand::OpenProject(project_dir), &mut accept()).unwrap();
        app.dispatch(MenuCommand::from_menu_id("new", "Tim").unwrap(), &mut accept())
            .unwrap();
        app.require_project().unwrap().edit(Field::Notes, "quote").unwrap();

        assert_eq!(app.dispatch(MenuCommand::Save, &mut accept()).unwrap(), DispatchOutcome::Saved);
        assert!(!app.project().unwrap().is_dirty());
    }

    #[test]
    fn test_save_in_empty_project_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path().join("empty");
        std::fs::create_dir_all(&project_dir).unwrap();
        let mut app = state(&temp_dir);

        app.dispatch(MenuCommand::OpenProject(project_dir), &mut accept()).unwrap();
        assert_eq!(app.dispatch(MenuCommand::Save, &mut accept()).unwrap(), DispatchOutcome::Nothing);
    }

    #[test]
    fn test_settings_persist_on_every_change() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = state(&temp_dir);

        app.dispatch(
            MenuCommand::Settings(SettingsChange::SetApiKey("secret".to_string())),
            &mut accept(),
        )
        .unwrap();
        assert_eq!(Settings::load_or_init(&app.config).unwrap().api_key, "secret");

        app.settings.push_recent(std::path::Path::new("/a"));
        app.dispatch(MenuCommand::Settings(SettingsChange::ClearRecent), &mut accept())
            .unwrap();
        let reloaded = Settings::load_or_init(&app.config).unwrap();
        assert!(reloaded.recent.is_empty());
        assert_eq!(reloaded.api_key, "secret");
    }

    #[test]
    fn test_new_item_requires_project() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = state(&temp_dir);
        assert!(app
            .dispatch(MenuCommand::from_menu_id("new", "x").unwrap(), &mut accept())
            .is_err());
    }
}
