use interview_manager::core::app::{AppState, DispatchOutcome, MenuCommand, SettingsChange};
use interview_manager::core::config::{Config, Settings, MAX_RECENT};
use interview_manager::items::codec::{decode, encode};
use interview_manager::items::model::{Item, ItemKind};
use interview_manager::storage::project::{NewItem, Project};
use interview_manager::ui::guard::{Field, Navigation};
use interview_manager::ui::sidebar::{self, TypeFilter};
use interview_manager::{scan, scan_with_report, Result};
use std::fs;
use tempfile::TempDir;

fn accept(_: &str, _: &str) -> bool {
    true
}

fn decline(_: &str, _: &str) -> bool {
    false
}

#[test]
fn test_create_edit_save() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let mut project = Project::open(temp_dir.path())?;

    let file = project
        .create(
            NewItem::Interview {
                name: "Tim interview".to_string(),
                date: "2024-02-01".to_string(),
            },
            &mut accept,
        )?
        .unwrap();
    assert!(file.ends_with(".szhi"));

    project.edit(Field::Body, "Q: Where were you?\nA: At the levee.")?;
    assert!(project.is_dirty());
    assert!(project.save_selected()?);
    assert!(!project.is_dirty());

    let raw = fs::read_to_string(temp_dir.path().join(&file))?;
    match decode(&raw, ItemKind::Interview)? {
        Item::Interview(interview) => {
            assert_eq!(interview.name, "Tim interview");
            assert_eq!(interview.date, "2024-02-01");
            assert_eq!(interview.body, "Q: Where were you?\nA: At the levee.");
            assert_eq!(interview.notes, "");
        }
        other => panic!("expected an interview, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_website_reference_round_trip_on_disk() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let mut project = Project::open(temp_dir.path())?;

    let file = project
        .create(
            NewItem::Website {
                name: "Budget gap widens".to_string(),
                date: "2023-04-01".to_string(),
                url: "https://www.sacbee.com/news/budget".to_string(),
                publication: "The Sacramento Bee".to_string(),
            },
            &mut accept,
        )?
        .unwrap();

    let reopened = Project::open(temp_dir.path())?;
    let stored = reopened.find(&file).unwrap();
    assert_eq!(stored.item, project.find(&file).unwrap().item);
    assert!(fs::read_to_string(temp_dir.path().join(&file))?.contains("\"pub\""));
    Ok(())
}

#[test]
fn test_declined_navigation_keeps_selection() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let mut project = Project::open(temp_dir.path())?;
    let first = project
        .create(
            NewItem::Interview {
                name: "First".to_string(),
                date: "2024-01-01".to_string(),
            },
            &mut accept,
        )?
        .unwrap();
    let second = project
        .create(
            NewItem::Interview {
                name: "Second".to_string(),
                date: "2024-01-02".to_string(),
            },
            &mut accept,
        )?
        .unwrap();

    project.edit(Field::Notes, "unsaved quote")?;
    assert_eq!(project.select(&first, &mut decline)?, Navigation::Cancelled);
    assert_eq!(project.selected_file(), Some(second.as_str()));
    assert!(project.is_dirty());
    assert_eq!(project.request_close(&mut decline), Navigation::Cancelled);

    assert_eq!(project.select(&first, &mut accept)?, Navigation::Proceed);
    assert_eq!(project.selected_file(), Some(first.as_str()));
    assert!(!project.is_dirty());

    // The discarded edit never reached the disk
    let raw = fs::read_to_string(temp_dir.path().join(&second))?;
    assert!(!raw.contains("unsaved quote"));
    Ok(())
}

#[test]
fn test_clean_navigation_does_not_ask() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let mut project = Project::open(temp_dir.path())?;
    let first = project
        .create(
            NewItem::Interview {
                name: "First".to_string(),
                date: String::new(),
            },
            &mut accept,
        )?
        .unwrap();
    project.create(
        NewItem::Interview {
            name: "Second".to_string(),
            date: String::new(),
        },
        &mut accept,
    )?;

    let mut asked = false;
    let nav = project.select(&first, &mut |_: &str, _: &str| {
        asked = true;
        false
    })?;
    assert_eq!(nav, Navigation::Proceed);
    assert!(!asked);
    Ok(())
}

#[test]
fn test_legacy_file_migrates_on_save() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("council.szhi"),
        "---\nname: Council member\ndate: 2019-06-01\nnotes: ''\n---\nOld body\n",
    )?;
    fs::write(
        temp_dir.path().join("bee.szhw"),
        "---\nurl: https://www.sacbee.com/a\npub: The Sacramento Bee\nname: Old story\ndate: 2019-05-01\n---\n",
    )?;

    let mut project = Project::open(temp_dir.path())?;
    assert_eq!(project.items().len(), 2);
    assert_eq!(project.selected_file(), Some("council.szhi"));

    project.edit(Field::Notes, "follow up")?;
    project.save_selected()?;

    let raw = fs::read_to_string(temp_dir.path().join("council.szhi"))?;
    assert!(raw.trim_start().starts_with('{'));
    match decode(&raw, ItemKind::Interview)? {
        Item::Interview(interview) => {
            assert_eq!(interview.name, "Council member");
            assert_eq!(interview.body, "Old body\n");
            assert_eq!(interview.notes, "follow up");
        }
        other => panic!("expected an interview, got {:?}", other),
    }

    // Untouched legacy files stay as they were
    let untouched = fs::read_to_string(temp_dir.path().join("bee.szhw"))?;
    assert!(untouched.starts_with("---"));
    Ok(())
}

#[test]
fn test_scan_skips_and_reports_bad_files() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let good = Item::Interview(interview_manager::Interview {
        name: "Good".to_string(),
        date: "2024-01-01".to_string(),
        ..Default::default()
    });
    fs::write(temp_dir.path().join("good.szhi"), encode(&good))?;
    fs::write(temp_dir.path().join("missing.szhi"), r#"{"name":"x","date":"","notes":""}"#)?;
    fs::write(temp_dir.path().join("garbage.szha"), "not json")?;
    fs::write(temp_dir.path().join("readme.txt"), "ignored")?;

    let report = scan_with_report(temp_dir.path())?;
    assert_eq!(report.items.len(), 1);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(scan(temp_dir.path())?.len(), 1);
    Ok(())
}

#[test]
fn test_sidebar_over_scanned_project() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let mut project = Project::open(temp_dir.path())?;
    for (name, date) in [("Levee story", "2024-01-03"), ("Mayor", "2024-01-01"), ("No date", "")] {
        project.create(
            NewItem::Interview {
                name: name.to_string(),
                date: date.to_string(),
            },
            &mut accept,
        )?;
    }
    project.create(
        NewItem::Website {
            name: "Levee report".to_string(),
            date: "2024-01-02".to_string(),
            url: "https://example.com".to_string(),
            publication: "Example".to_string(),
        },
        &mut accept,
    )?;

    let names: Vec<&str> = sidebar::project(project.items(), "", TypeFilter::All)
        .iter()
        .map(|s| s.item.name())
        .collect();
    assert_eq!(names, vec!["Levee story", "Levee report", "Mayor", "No date"]);

    let levee: Vec<&str> = sidebar::project(project.items(), "levee", TypeFilter::Interview)
        .iter()
        .map(|s| s.item.name())
        .collect();
    assert_eq!(levee, vec!["Levee story"]);
    Ok(())
}

#[test]
fn test_app_state_flow() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::new(Some(temp_dir.path().join("config")))?;
    let mut app = AppState::load(config)?;

    assert_eq!(app.dispatch(MenuCommand::Save, &mut accept)?, DispatchOutcome::Nothing);

    let mut dirs = Vec::new();
    for i in 0..(MAX_RECENT + 2) {
        let dir = temp_dir.path().join(format!("story-{}", i));
        fs::create_dir_all(&dir)?;
        app.dispatch(MenuCommand::OpenProject(dir.clone()), &mut accept)?;
        dirs.push(dir);
    }
    // Reopening moves a folder to the front without duplicating it
    app.dispatch(MenuCommand::OpenProject(dirs[MAX_RECENT].clone()), &mut accept)?;

    let settings = Settings::load_or_init(&app.config)?;
    assert_eq!(settings.recent.len(), MAX_RECENT);
    assert!(settings.recent[0].ends_with(&format!("story-{}", MAX_RECENT)));
    assert!(settings.recent[1].ends_with(&format!("story-{}", MAX_RECENT + 1)));

    app.dispatch(
        MenuCommand::Settings(SettingsChange::SetApiKey("rev-key".to_string())),
        &mut accept,
    )?;
    let raw = fs::read_to_string(&app.config.settings_path)?;
    assert!(raw.contains("\"revKey\""));
    assert!(raw.contains("rev-key"));
    Ok(())
}
