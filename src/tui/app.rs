use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::subscriber::NoSubscriber;

use crate::io::store::{Collection, Store, StoreError};
use crate::io::watcher::{SnapshotWatcher, StoreEvent};
use crate::model::activity::{ActivityMap, last_activity};
use crate::model::item::{Contact, TodoItem};
use crate::ops::group::Bucket;
use crate::ops::reorder::Reorder;
use crate::ops::sort::SortKey;
use crate::ops::view::{DeriveContext, Pipeline, ViewAction, ViewState};

use super::input;
use super::render;
use super::theme::Theme;

/// Which list is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Todos,
    Contacts,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Tab::Todos => "To-dos",
            Tab::Contacts => "Contacts",
        }
    }

    pub fn other(self) -> Tab {
        match self {
            Tab::Todos => Tab::Contacts,
            Tab::Contacts => Tab::Todos,
        }
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
}

/// Which of an item's two screen lines a row is. The upper line is the
/// "before" half of the drop target, the lower line the "after" half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Upper,
    Lower,
}

/// Height of one item in rows
pub const ITEM_HEIGHT: u16 = 2;

/// One screen row of the list
#[derive(Debug, Clone, PartialEq)]
pub enum Row<'a> {
    Header { bucket: Bucket, count: usize, open: bool },
    Todo(&'a TodoItem, Half),
    Contact(&'a Contact, Half),
}

impl Row<'_> {
    /// Id of the item this row belongs to
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Row::Header { .. } => None,
            Row::Todo(t, _) => Some(t.id.as_str()),
            Row::Contact(c, _) => Some(c.id.as_str()),
        }
    }

    pub fn half(&self) -> Option<Half> {
        match self {
            Row::Header { .. } => None,
            Row::Todo(_, h) | Row::Contact(_, h) => Some(*h),
        }
    }

    /// Rows the cursor can rest on: headers and each item's upper line
    pub fn is_selectable(&self) -> bool {
        self.half() != Some(Half::Lower)
    }
}

/// Main application state
pub struct App {
    pub store: Store,
    pub todos: Vec<TodoItem>,
    pub contacts: Vec<Contact>,
    pub activity: ActivityMap,
    pub tab: Tab,
    pub mode: Mode,
    pub todo_view: ViewState,
    pub contact_view: ViewState,
    /// Index into `rows()`
    pub cursor: usize,
    /// First visible row, updated by the renderer
    pub scroll: usize,
    /// Screen row where the list starts, updated by the renderer
    pub list_top: u16,
    pub theme: Theme,
    /// Fixed clock for tests
    pub now_override: Option<NaiveDateTime>,
    /// Last error or confirmation, shown in the status row
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Store, todos: Vec<TodoItem>, contacts: Vec<Contact>, activity: ActivityMap) -> Self {
        let theme = Theme::from_config(&store.config.ui);
        let mut todo_view = ViewState::with_sort(store.config.view.todos_sort);
        todo_view.show_completed = store.config.view.show_completed;
        let contact_view = ViewState::with_sort(store.config.view.contacts_sort);
        App {
            store,
            todos,
            contacts,
            activity,
            tab: Tab::Todos,
            mode: Mode::Navigate,
            todo_view,
            contact_view,
            cursor: 0,
            scroll: 0,
            list_top: 0,
            theme,
            now_override: None,
            status: None,
            should_quit: false,
        }
    }

    /// Load every collection from the store
    pub fn load(store: Store) -> Result<Self, StoreError> {
        let todos = store.todos()?;
        let contacts = store.contacts()?;
        let activity = last_activity(&store.messages()?);
        Ok(App::new(store, todos, contacts, activity))
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now_override.unwrap_or_else(|| Local::now().naive_local())
    }

    pub fn view(&self) -> &ViewState {
        match self.tab {
            Tab::Todos => &self.todo_view,
            Tab::Contacts => &self.contact_view,
        }
    }

    pub fn set_view(&mut self, next: ViewState) {
        match self.tab {
            Tab::Todos => self.todo_view = next,
            Tab::Contacts => self.contact_view = next,
        }
    }

    /// Replace the current tab's view state with the result of `action`
    pub fn dispatch(&mut self, action: ViewAction) {
        let next = self.view().apply(action);
        self.set_view(next);
    }

    /// Release the dragged item. The drop is checked against the current
    /// snapshot, so an item deleted mid-drag cancels it.
    pub fn finish_drag(&mut self) {
        let (next, outcome) = match self.tab {
            Tab::Todos => self.todo_view.drop_on(&self.todos),
            Tab::Contacts => self.contact_view.drop_on(&self.contacts),
        };
        self.set_view(next);
        if let Some(reorder) = outcome {
            self.commit_reorder(&reorder);
        }
    }

    /// Row index of an item's upper line
    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.rows()
            .iter()
            .position(|r| r.item_id() == Some(id) && r.half() == Some(Half::Upper))
    }

    /// The current tab's list, derived from scratch
    pub fn rows(&self) -> Vec<Row<'_>> {
        let mut rows = Vec::new();
        match self.tab {
            Tab::Todos => {
                let pipeline = Pipeline::new(&self.todos, &self.store.config.search.todos);
                let ctx = DeriveContext {
                    now: self.now(),
                    activity: &self.activity,
                    thresholds: &self.store.config.groups,
                };
                for (bucket, todos) in pipeline.grouped(&self.todo_view, ctx) {
                    let open = self.todo_view.is_group_open(bucket);
                    rows.push(Row::Header {
                        bucket,
                        count: todos.len(),
                        open,
                    });
                    if open {
                        for todo in todos {
                            rows.push(Row::Todo(todo, Half::Upper));
                            rows.push(Row::Todo(todo, Half::Lower));
                        }
                    }
                }
            }
            Tab::Contacts => {
                let pipeline = Pipeline::new(&self.contacts, &self.store.config.search.contacts);
                for contact in pipeline.list(&self.contact_view, &self.activity) {
                    rows.push(Row::Contact(contact, Half::Upper));
                    rows.push(Row::Contact(contact, Half::Lower));
                }
            }
        }
        rows
    }

    /// Categories offered by the filter for the current tab
    pub fn categories(&self) -> Vec<String> {
        match self.tab {
            Tab::Todos => crate::ops::categories::distinct_categories(&self.todos),
            Tab::Contacts => crate::ops::categories::distinct_categories(&self.contacts),
        }
    }

    pub fn switch_tab(&mut self) {
        self.tab = self.tab.other();
        self.cursor = 0;
        self.scroll = 0;
        self.mode = Mode::Navigate;
    }

    /// Keep the cursor on a selectable row after the list changed
    pub fn clamp_cursor(&mut self) {
        let rows = self.rows();
        if rows.is_empty() {
            self.cursor = 0;
            return;
        }
        let mut c = self.cursor.min(rows.len() - 1);
        while c > 0 && !rows[c].is_selectable() {
            c -= 1;
        }
        self.cursor = c;
    }

    /// Persist a completed drop and reload the collection it touched
    pub fn commit_reorder(&mut self, reorder: &Reorder) {
        let result = match self.tab {
            Tab::Todos => self
                .store
                .apply_reorder::<TodoItem>(reorder)
                .and_then(|_| self.store.todos())
                .map(|todos| self.todos = todos),
            Tab::Contacts => self
                .store
                .apply_reorder::<Contact>(reorder)
                .and_then(|_| self.store.contacts())
                .map(|contacts| self.contacts = contacts),
        };
        match result {
            Ok(()) => {
                // Show the order that was just written
                if self.view().sort != SortKey::Manual {
                    self.dispatch(ViewAction::SetSort(SortKey::Manual));
                }
                self.status = Some(format!(
                    "moved {} {} {}",
                    reorder.source,
                    reorder.side.as_str(),
                    reorder.target
                ));
            }
            Err(e) => self.status = Some(format!("error: {}", e)),
        }
        self.clamp_cursor();
    }

    /// Reload whatever changed on disk. The in-progress drag and every view
    /// state survive; a drop onto an item that vanished is cancelled later
    /// by `ViewState::drop_on`.
    pub fn apply_store_event(&mut self, event: &StoreEvent) {
        let result = match event {
            StoreEvent::Collection(Collection::Todos) => self.store.todos().map(|t| self.todos = t),
            StoreEvent::Collection(Collection::Contacts) => {
                self.store.contacts().map(|c| self.contacts = c)
            }
            StoreEvent::Collection(Collection::Messages) => self
                .store
                .messages()
                .map(|m| self.activity = last_activity(&m)),
            StoreEvent::Config => Store::open(&self.store.root).map(|store| {
                self.theme = Theme::from_config(&store.config.ui);
                self.store = store;
            }),
        };
        if let Err(e) = result {
            self.status = Some(format!("reload failed: {}", e));
        }
        self.clamp_cursor();
    }
}

/// Run the TUI application
pub fn run(project_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match project_dir {
        Some(dir) => std::fs::canonicalize(dir)?,
        None => std::env::current_dir()?,
    };
    let store = Store::discover(&start)?;
    let data_dir: PathBuf = store.data_dir.clone();
    let mut app = App::load(store)?;
    let watcher = SnapshotWatcher::start(&data_dir)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Log lines would corrupt the alternate screen
    let result = tracing::subscriber::with_default(NoSubscriber::default(), || {
        run_event_loop(&mut terminal, &mut app, &watcher)
    });

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: &SnapshotWatcher,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        for evt in watcher.poll() {
            app.apply_store_event(&evt);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::model::config::AisleConfig;
    use crate::model::item::parse_timestamp;

    pub fn store() -> Store {
        Store {
            root: PathBuf::from("/tmp/aisle-test"),
            data_dir: PathBuf::from("/tmp/aisle-test/aisle"),
            config: AisleConfig::default(),
        }
    }

    /// Four to-dos and three contacts; "now" is 2026-10-17 09:00
    pub fn app() -> App {
        let mut todos = vec![
            TodoItem::new("t1", "Book venue", "Venue"),
            TodoItem::new("t2", "Cake tasting", "Baker"),
            TodoItem::new("t3", "Order favors", "Favors"),
            TodoItem::new("t4", "Send invites", "Stationery"),
        ];
        todos[0].deadline = parse_timestamp("2026-10-10");
        todos[1].deadline = parse_timestamp("2026-10-17");
        todos[2].deadline = parse_timestamp("2026-10-20");
        for (i, t) in todos.iter_mut().enumerate() {
            t.order_index = Some(i as i64);
        }

        let mut contacts = vec![
            Contact::new("c1", "Ana Florals", "Florist"),
            Contact::new("c2", "Ben Beats", "DJ"),
            Contact::new("c3", "Cara Cakes", "Baker"),
        ];
        for (i, c) in contacts.iter_mut().enumerate() {
            c.order_index = Some(i as i64);
        }

        let mut app = App::new(store(), todos, contacts, ActivityMap::new());
        app.now_override = parse_timestamp("2026-10-17T09:00:00");
        app
    }

    /// The same items as `app()`, loaded from a project in a temp dir so
    /// drops are written to disk.
    pub fn app_on_disk() -> (tempfile::TempDir, App) {
        let tmp = tempfile::TempDir::new().unwrap();
        let data = tmp.path().join("aisle");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join("aisle.toml"), "").unwrap();
        std::fs::write(
            data.join("todos.json"),
            r#"[
  {"id": "t1", "name": "Book venue", "category": "Venue", "deadline": "2026-10-10", "orderIndex": 0},
  {"id": "t2", "name": "Cake tasting", "category": "Baker", "deadline": "2026-10-17", "orderIndex": 1},
  {"id": "t3", "name": "Order favors", "category": "Favors", "deadline": "2026-10-20", "orderIndex": 2},
  {"id": "t4", "name": "Send invites", "category": "Stationery", "orderIndex": 3}
]"#,
        )
        .unwrap();
        std::fs::write(
            data.join("contacts.json"),
            r#"[
  {"id": "c1", "name": "Ana Florals", "category": "Florist", "orderIndex": 0},
  {"id": "c2", "name": "Ben Beats", "category": "DJ", "orderIndex": 1},
  {"id": "c3", "name": "Cara Cakes", "category": "Baker", "orderIndex": 2}
]"#,
        )
        .unwrap();
        std::fs::write(data.join("messages.json"), "[]").unwrap();

        let store = Store::open(tmp.path()).unwrap();
        let mut app = App::load(store).unwrap();
        app.now_override = parse_timestamp("2026-10-17T09:00:00");
        (tmp, app)
    }

    /// `(id, orderIndex)` pairs as stored on disk
    pub fn order_on_disk(app: &App, collection: Collection) -> Vec<(String, i64)> {
        let text = std::fs::read_to_string(app.store.path_of(collection)).unwrap();
        let docs: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        docs.iter()
            .map(|d| (d["id"].as_str().unwrap().to_string(), d["orderIndex"].as_i64().unwrap()))
            .collect()
    }
}
