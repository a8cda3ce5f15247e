use crate::core::app::{AppState, DispatchOutcome, MenuCommand};
use crate::core::error::{Error, Result};
use crate::items::model::{Item, JobStatus, StoredItem};
use crate::storage::project::NewItem;
use crate::transcription::client::RevAiClient;
use crate::transcription::job::RefreshOutcome;
use crate::ui::guard::{field_value, Field, Navigation};
use crate::ui::sidebar::{self, TypeFilter};
use crate::web::metadata::{fetch_page_metadata, PageMetadata};
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::cursor;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

// Longest preview text shown in the sidebar
const PREVIEW_CHARS: usize = 60;

/// Something that may need a discard or delete confirmation first
#[derive(Debug, Clone)]
enum Action {
    Select(String),
    Delete,
    Quit,
    Menu(MenuCommand),
    Transcribe(PathBuf),
}

/// Work that talks to the network; run after the next redraw so the
/// status line shows it is in progress
#[derive(Debug, Clone)]
enum Task {
    Refresh,
    Convert,
    Transcribe { path: PathBuf, confirmed: bool },
    FetchWebsite(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    NewInterview,
    NewWebsite,
    Transcribe,
    OpenProject,
    ApiKey,
}

impl Prompt {
    fn title(self) -> &'static str {
        match self {
            Prompt::NewInterview => "New interview name",
            Prompt::NewWebsite => "Website address",
            Prompt::Transcribe => "Audio file to transcribe",
            Prompt::OpenProject => "Project folder",
            Prompt::ApiKey => "Transcription API key",
        }
    }
}

#[derive(Debug, Clone)]
enum Mode {
    Browse,
    Search,
    /// Index into the open item's editable fields
    Edit(usize),
    Prompt { prompt: Prompt, input: String },
    Confirm { title: String, message: String, action: Action },
}

/// Interactive project browser: sidebar with search and type tabs, detail
/// pane for the selected item
pub struct Browser {
    app: AppState,
    api_key: Option<String>,
    mode: Mode,
    search: String,
    filter: TypeFilter,
    cursor: usize,
    task: Option<Task>,
    status: Option<String>,
    should_quit: bool,
}

impl Browser {
    /// `api_key` overrides the key saved in settings
    pub fn new(app: AppState, api_key: Option<String>) -> Self {
        Self {
            app,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            mode: Mode::Browse,
            search: String::new(),
            filter: TypeFilter::All,
            cursor: 0,
            task: None,
            status: None,
            should_quit: false,
        }
    }

    /// Open `dir`, or the most recent project when `dir` is `None`
    pub fn open_initial(&mut self, dir: Option<PathBuf>) {
        let dir = dir.or_else(|| self.app.settings.recent.first().map(PathBuf::from));
        match dir {
            Some(dir) => {
                let result = self.perform(Action::Menu(MenuCommand::OpenProject(dir)), true);
                self.report(result);
            }
            None => self.status = Some("Press o to open a project folder".to_string()),
        }
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        struct TerminalRestore;
        impl Drop for TerminalRestore {
            fn drop(&mut self) {
                let _ = disable_raw_mode();
                let mut stdout = io::stdout();
                let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
            }
        }
        let _restore = TerminalRestore;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)?;

        while !self.should_quit {
            terminal.draw(|f| self.render_ui(f))?;

            if let Some(task) = self.task.take() {
                let result = self.run_task(task).await;
                self.report(result);
                // Keys pressed while the task ran are dropped, not replayed
                while event::poll(Duration::ZERO)? {
                    event::read()?;
                }
                continue;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let result = self.handle_key(key);
                    self.report(result);
                }
            }
        }

        Ok(())
    }

    /// Errors never end the loop; they are shown in the footer
    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            warn!(error = %e, "Action failed");
            self.status = Some(e.to_string());
        }
    }

    fn visible(&self) -> Vec<&StoredItem> {
        match self.app.project() {
            Some(project) => sidebar::project(project.items(), &self.search, self.filter),
            None => Vec::new(),
        }
    }

    /// Move the cursor onto the selected item when it is visible, otherwise
    /// keep it in bounds
    fn sync_cursor(&mut self) {
        let selected = self
            .app
            .project()
            .and_then(|p| p.selected_file())
            .map(str::to_string);
        let (position, len) = {
            let visible = self.visible();
            let position = selected.and_then(|file| visible.iter().position(|s| s.file_name == file));
            (position, visible.len())
        };
        self.cursor = position.unwrap_or_else(|| self.cursor.min(len.saturating_sub(1)));
    }

    fn vendor(&self) -> Result<RevAiClient> {
        let key = self
            .api_key
            .clone()
            .unwrap_or_else(|| self.app.settings.api_key.clone());
        Ok(RevAiClient::new(key)?)
    }

    /// Run `action`. Without `confirmed`, a confirmation request turns into
    /// the overlay and the action is retried once the user answers yes.
    fn perform(&mut self, action: Action, confirmed: bool) -> Result<()> {
        let mut asked: Option<(String, String)> = None;
        let mut confirm = |title: &str, message: &str| {
            if !confirmed {
                asked = Some((title.to_string(), message.to_string()));
            }
            confirmed
        };

        let nav = match &action {
            Action::Select(file) => self.app.require_project()?.select(file, &mut confirm)?,
            Action::Delete => {
                let nav = self.app.require_project()?.delete_selected(&mut confirm)?;
                if nav == Navigation::Proceed {
                    self.status = Some("Deleted".to_string());
                }
                nav
            }
            Action::Quit => {
                let nav = match self.app.project() {
                    Some(project) => project.request_close(&mut confirm),
                    None => Navigation::Proceed,
                };
                self.should_quit = nav == Navigation::Proceed;
                nav
            }
            Action::Menu(command) => match self.app.dispatch(command.clone(), &mut confirm)? {
                DispatchOutcome::Opened(name) => {
                    self.search.clear();
                    self.cursor = 0;
                    self.status = Some(format!("Opened {}", name));
                    Navigation::Proceed
                }
                DispatchOutcome::Created(file) => {
                    self.status = Some(format!("Created {}", file));
                    Navigation::Proceed
                }
                DispatchOutcome::Saved => {
                    self.status = Some("Saved".to_string());
                    Navigation::Proceed
                }
                DispatchOutcome::SettingsUpdated => {
                    self.status = Some("Settings saved".to_string());
                    Navigation::Proceed
                }
                DispatchOutcome::Nothing => Navigation::Cancelled,
            },
            Action::Transcribe(path) => {
                self.app.require_project()?;
                self.status = Some("Uploading audio...".to_string());
                self.task = Some(Task::Transcribe {
                    path: path.clone(),
                    confirmed,
                });
                Navigation::Proceed
            }
        };

        if nav == Navigation::Cancelled {
            if let Some((title, message)) = asked {
                self.mode = Mode::Confirm {
                    title,
                    message,
                    action,
                };
                return Ok(());
            }
        }
        self.sync_cursor();
        Ok(())
    }

    async fn run_task(&mut self, task: Task) -> Result<()> {
        match task {
            Task::Refresh => {
                let client = self.vendor()?;
                let outcome = self.app.require_project()?.refresh_selected(&client).await?;
                self.status = Some(match outcome {
                    RefreshOutcome::Unchanged => "Job is finished; nothing to refresh".to_string(),
                    RefreshOutcome::Updated(job) => format!("Status: {}", job.status),
                });
            }
            Task::Convert => {
                let client = self.vendor()?;
                let file = self.app.require_project()?.convert_selected(&client).await?;
                self.status = Some(format!("Converted to {}", file));
            }
            Task::Transcribe { path, confirmed } => {
                let client = self.vendor()?;
                let mut asked: Option<(String, String)> = None;
                let created = self
                    .app
                    .require_project()?
                    .submit_audio(&client, &path, &mut |title: &str, message: &str| {
                        if !confirmed {
                            asked = Some((title.to_string(), message.to_string()));
                        }
                        confirmed
                    })
                    .await?;
                match (created, asked) {
                    (Some(file), _) => self.status = Some(format!("Created {}", file)),
                    (None, Some((title, message))) => {
                        self.mode = Mode::Confirm {
                            title,
                            message,
                            action: Action::Transcribe(path),
                        };
                    }
                    (None, None) => {}
                }
            }
            Task::FetchWebsite(url) => {
                let metadata = match fetch_page_metadata(&url).await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        warn!(error = %e, "Could not read page metadata");
                        PageMetadata::default()
                    }
                };
                let new_item = NewItem::Website {
                    name: metadata.name,
                    date: metadata.date,
                    url,
                    publication: metadata.publication,
                };
                self.perform(Action::Menu(MenuCommand::NewItem(new_item)), false)?;
            }
        }
        self.sync_cursor();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // A pending network task owns the next turn of the loop
        if self.task.is_some() {
            return Ok(());
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('s') && matches!(self.mode, Mode::Browse | Mode::Search | Mode::Edit(_)) {
            return self.perform(Action::Menu(MenuCommand::Save), false);
        }

        match self.mode.clone() {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Search => {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter => self.mode = Mode::Browse,
                    KeyCode::Backspace => {
                        self.search.pop();
                        self.cursor = 0;
                    }
                    KeyCode::Char('u') if ctrl => {
                        self.search.clear();
                        self.cursor = 0;
                    }
                    KeyCode::Char(c) => {
                        self.search.push(c);
                        self.cursor = 0;
                    }
                    _ => {}
                }
                Ok(())
            }
            Mode::Edit(index) => {
                self.handle_edit_key(key, index);
                Ok(())
            }
            Mode::Prompt { prompt, mut input } => match key.code {
                KeyCode::Esc => {
                    self.mode = Mode::Browse;
                    Ok(())
                }
                KeyCode::Enter => {
                    self.mode = Mode::Browse;
                    self.submit_prompt(prompt, input)
                }
                KeyCode::Backspace => {
                    input.pop();
                    self.mode = Mode::Prompt { prompt, input };
                    Ok(())
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    self.mode = Mode::Prompt { prompt, input };
                    Ok(())
                }
                _ => Ok(()),
            },
            Mode::Confirm { action, .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.mode = Mode::Browse;
                    self.perform(action, true)
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.mode = Mode::Browse;
                    Ok(())
                }
                _ => Ok(()),
            },
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return self.perform(Action::Quit, false),
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.cursor + 1 < self.visible().len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter => {
                let file = self.visible().get(self.cursor).map(|s| s.file_name.clone());
                if let Some(file) = file {
                    return self.perform(Action::Select(file), false);
                }
            }
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Char('t') => {
                self.filter = self.filter.next();
                self.cursor = 0;
                self.sync_cursor();
            }
            KeyCode::Char('e') => {
                let editable = self
                    .app
                    .project()
                    .and_then(|p| p.session())
                    .map(|s| !Field::editable_for(s.current()).is_empty())
                    .unwrap_or(false);
                if editable {
                    self.mode = Mode::Edit(0);
                } else {
                    self.status = Some("Nothing to edit".to_string());
                }
            }
            KeyCode::Char('u') => {
                if let Some(session) = self.app.project_mut().and_then(|p| p.session_mut()) {
                    session.revert();
                    self.status = Some("Changes discarded".to_string());
                }
            }
            KeyCode::Char('d') => {
                if self.app.project().and_then(|p| p.session()).is_some() {
                    return self.perform(Action::Delete, false);
                }
            }
            KeyCode::Char('r') => {
                self.require_selected_job()?;
                self.status = Some("Checking job status...".to_string());
                self.task = Some(Task::Refresh);
            }
            KeyCode::Char('c') => {
                self.require_selected_job()?;
                self.status = Some("Fetching transcript...".to_string());
                self.task = Some(Task::Convert);
            }
            KeyCode::Char('n') => self.start_prompt(Prompt::NewInterview, String::new()),
            KeyCode::Char('w') => self.start_prompt(Prompt::NewWebsite, String::new()),
            KeyCode::Char('a') => self.start_prompt(Prompt::Transcribe, String::new()),
            KeyCode::Char('o') => self.start_prompt(Prompt::OpenProject, String::new()),
            KeyCode::Char('k') => {
                let current = self.app.settings.api_key.clone();
                self.start_prompt(Prompt::ApiKey, current);
            }
            _ => {}
        }
        Ok(())
    }

    fn require_selected_job(&self) -> Result<()> {
        match self.app.project().and_then(|p| p.session()).map(|s| s.current()) {
            Some(Item::Audio(_)) => Ok(()),
            _ => Err(Error::InvalidState("select a transcription job first".to_string())),
        }
    }

    fn start_prompt(&mut self, prompt: Prompt, input: String) {
        let needs_project = !matches!(prompt, Prompt::OpenProject | Prompt::ApiKey);
        if needs_project && self.app.project().is_none() {
            self.status = Some("Open a project first (o)".to_string());
            return;
        }
        self.mode = Mode::Prompt { prompt, input };
    }

    fn submit_prompt(&mut self, prompt: Prompt, input: String) -> Result<()> {
        let input = input.trim().to_string();
        match prompt {
            Prompt::NewInterview => self.perform(Action::Menu(MenuCommand::from_menu_id("new", &input)?), false),
            Prompt::OpenProject => self.perform(Action::Menu(MenuCommand::from_menu_id("open", &input)?), false),
            Prompt::ApiKey => self.perform(Action::Menu(MenuCommand::from_menu_id("settings", &input)?), false),
            Prompt::Transcribe if !input.is_empty() => self.perform(Action::Transcribe(PathBuf::from(input)), false),
            Prompt::NewWebsite if !input.is_empty() => {
                self.status = Some("Reading page...".to_string());
                self.task = Some(Task::FetchWebsite(input));
                Ok(())
            }
            Prompt::Transcribe | Prompt::NewWebsite => Ok(()),
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent, index: usize) {
        let Some(session) = self.app.project_mut().and_then(|p| p.session_mut()) else {
            self.mode = Mode::Browse;
            return;
        };
        let fields = Field::editable_for(session.current());
        if fields.is_empty() {
            self.mode = Mode::Browse;
            return;
        }
        let index = index.min(fields.len() - 1);
        let field = fields[index];

        match key.code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Tab => self.mode = Mode::Edit((index + 1) % fields.len()),
            KeyCode::BackTab => self.mode = Mode::Edit((index + fields.len() - 1) % fields.len()),
            KeyCode::Enter if !field.is_multiline() => self.mode = Mode::Edit((index + 1) % fields.len()),
            KeyCode::Enter => {
                if let Some(value) = session.field_mut(field) {
                    value.push('\n');
                }
            }
            KeyCode::Backspace => {
                if let Some(value) = session.field_mut(field) {
                    value.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(value) = session.field_mut(field) {
                    value.push(c);
                }
            }
            _ => {}
        }
    }

    fn render_ui(&self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Sidebar + details
                Constraint::Length(3), // Footer
            ])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(chunks[0]);

        self.render_sidebar(f, columns[0]);
        self.render_details(f, columns[1]);
        self.render_footer(f, chunks[1]);

        match &self.mode {
            Mode::Prompt { prompt, input } => self.render_prompt(f, *prompt, input),
            Mode::Confirm { title, message, .. } => self.render_confirm(f, title, message),
            _ => {}
        }
    }

    fn render_sidebar(&self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search box
                Constraint::Length(3), // Type tabs
                Constraint::Min(0),    // Item list
            ])
            .split(area);

        let searching = matches!(self.mode, Mode::Search);
        let search_text = if self.search.is_empty() && !searching {
            Span::styled("Press / to search", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(self.search.as_str(), Style::default().fg(Color::White))
        };
        let search = Paragraph::new(Line::from(search_text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if searching {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::White)
                })
                .title("Search"),
        );
        f.render_widget(search, rows[0]);

        let selected_tab = TypeFilter::ALL.iter().position(|t| *t == self.filter).unwrap_or(0);
        let tabs = Tabs::new(TypeFilter::ALL.iter().map(|t| t.label()))
            .select(selected_tab)
            .block(Block::default().borders(Borders::ALL).title("Type (t)"))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, rows[1]);

        let title = self
            .app
            .project()
            .map(|p| p.name())
            .unwrap_or_else(|| "No project".to_string());
        let open_file = self.app.project().and_then(|p| p.selected_file());
        let dirty = self.app.project().is_some_and(|p| p.is_dirty());

        let visible = self.visible();
        let items: Vec<ListItem> = visible
            .iter()
            .map(|stored| {
                let is_open = open_file == Some(stored.file_name.as_str());
                let marker = match (is_open, dirty) {
                    (true, true) => "* ",
                    (true, false) => "• ",
                    _ => "  ",
                };
                let preview: String = stored
                    .item
                    .preview()
                    .lines()
                    .next()
                    .unwrap_or("")
                    .chars()
                    .take(PREVIEW_CHARS)
                    .collect();
                ListItem::new(vec![
                    Line::from(vec![
                        Span::raw(marker),
                        Span::styled(
                            display_name(&stored.item).to_string(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!("  {} {}", stored.item.kind().label(), stored.item.date()),
                        Style::default().fg(Color::DarkGray),
                    )),
                    Line::from(Span::styled(format!("  {}", preview), Style::default().fg(Color::Gray))),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(vec![
                        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
                        Span::raw(format!(" ({})", visible.len())),
                    ]),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );

        let mut list_state = ListState::default();
        if !visible.is_empty() {
            list_state.select(Some(self.cursor));
        }
        f.render_stateful_widget(list, rows[2], &mut list_state);
    }

    fn render_details(&self, f: &mut Frame, area: Rect) {
        let Some(session) = self.app.project().and_then(|p| p.session()) else {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from("Select an item with Enter, or create one with n / w / a"),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Details"));
            f.render_widget(empty, area);
            return;
        };

        let item = session.current();
        let active_field = match self.mode {
            Mode::Edit(index) => Field::editable_for(item).get(index).copied(),
            _ => None,
        };
        let label = |text: &str| Span::styled(text.to_string(), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

        let mut lines = Vec::new();
        match item {
            Item::Audio(job) => {
                lines.push(Line::from(vec![label("Status: "), Span::raw(job.status.as_str())]));
                lines.push(Line::from(vec![label("Job id: "), Span::raw(job.job_id.as_str())]));
                lines.push(Line::from(vec![label("Audio: "), Span::raw(job.source_path.as_str())]));
                lines.push(Line::from(vec![label("Date: "), Span::raw(job.date.as_str())]));
                if let Some(created) = &job.created_on {
                    lines.push(Line::from(vec![label("Submitted: "), Span::raw(created.as_str())]));
                }
                if let Some(seconds) = job.duration_seconds {
                    lines.push(Line::from(vec![label("Duration: "), Span::raw(format!("{:.0}s", seconds))]));
                }
                if let Some(detail) = &job.failure_detail {
                    lines.push(Line::from(vec![
                        label("Failure: "),
                        Span::styled(detail.as_str(), Style::default().fg(Color::Red)),
                    ]));
                }
                if let Some(hint) = job_hint(job.status) {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));
                }
            }
            _ => {
                for field in Field::editable_for(item) {
                    let value = field_value(item, *field).unwrap_or("");
                    let value_style = if active_field == Some(*field) {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    let caret = if active_field == Some(*field) { "▏" } else { "" };
                    if field.is_multiline() {
                        lines.push(Line::from(""));
                        lines.push(Line::from(label(&format!("{}:", field.label()))));
                        let mut value_lines: Vec<Line> = value
                            .split('\n')
                            .map(|l| Line::from(Span::styled(l.to_string(), value_style)))
                            .collect();
                        if let Some(last) = value_lines.last_mut() {
                            last.spans.push(Span::styled(caret, value_style));
                        }
                        lines.extend(value_lines);
                    } else {
                        lines.push(Line::from(vec![
                            label(&format!("{}: ", field.label())),
                            Span::styled(value.to_string(), value_style),
                            Span::styled(caret, value_style),
                        ]));
                    }
                }
            }
        }

        let mut title = vec![Span::styled(
            display_name(item).to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        title.push(Span::raw(format!(" ({})", session.file_name())));
        if session.is_dirty() {
            title.push(Span::styled(" [modified]", Style::default().fg(Color::Yellow)));
        }

        let details = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(if active_field.is_some() {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::Cyan)
                    })
                    .title(title),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(details, area);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let key = |k: &'static str, color: Color| Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD));
        let hints = match self.mode {
            Mode::Edit(_) => Line::from(vec![
                key("Tab", Color::Cyan),
                Span::raw(": Next field  "),
                key("Ctrl+S", Color::Green),
                Span::raw(": Save  "),
                key("Esc", Color::Yellow),
                Span::raw(": Done"),
            ]),
            Mode::Search => Line::from(vec![
                key("Enter/Esc", Color::Yellow),
                Span::raw(": Done  "),
                key("Ctrl+U", Color::Cyan),
                Span::raw(": Clear"),
            ]),
            _ => Line::from(vec![
                key("↑↓", Color::Cyan),
                Span::raw(" Move  "),
                key("Enter", Color::Green),
                Span::raw(" Open  "),
                key("e", Color::Green),
                Span::raw(" Edit  "),
                key("Ctrl+S", Color::Green),
                Span::raw(" Save  "),
                key("n/w/a", Color::Magenta),
                Span::raw(" New  "),
                key("r/c", Color::Magenta),
                Span::raw(" Refresh/Convert  "),
                key("d", Color::Red),
                Span::raw(" Delete  "),
                key("o", Color::Cyan),
                Span::raw(" Open folder  "),
                key("k", Color::Cyan),
                Span::raw(" API key  "),
                key("q", Color::Red),
                Span::raw(" Quit"),
            ]),
        };
        let status = Line::from(Span::styled(
            self.status.clone().unwrap_or_default(),
            Style::default().fg(Color::Yellow),
        ));

        let footer = Paragraph::new(vec![hints, status])
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(footer, area);
    }

    fn render_prompt(&self, f: &mut Frame, prompt: Prompt, input: &str) {
        let area = centered_rect(60, 3, f.size());
        let shown = if prompt == Prompt::ApiKey {
            "*".repeat(input.chars().count())
        } else {
            input.to_string()
        };
        let paragraph = Paragraph::new(Line::from(vec![
            Span::styled(shown, Style::default().fg(Color::White)),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(prompt.title()),
        );
        f.render_widget(Clear, area);
        f.render_widget(paragraph, area);
    }

    fn render_confirm(&self, f: &mut Frame, title: &str, message: &str) {
        let area = centered_rect(50, 6, f.size());
        let paragraph = Paragraph::new(vec![
            Line::from(message.to_string()),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw(": Proceed  "),
                Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::raw(": Cancel"),
            ]),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(title.to_string()),
        );
        f.render_widget(Clear, area);
        f.render_widget(paragraph, area);
    }
}

fn display_name(item: &Item) -> &str {
    if item.name().is_empty() {
        "Untitled"
    } else {
        item.name()
    }
}

/// Key that moves a job forward; failed jobs have none
fn job_hint(status: JobStatus) -> Option<&'static str> {
    match status {
        JobStatus::Transcribed => Some("c: convert to interview"),
        JobStatus::Failed => None,
        _ => Some("r: check status"),
    }
}

/// `percent_x` wide, `height` rows tall, centred in `area`
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height: height.min(area.height),
    }
}
