mod init;
pub use init::cmd_init;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, Screen};
use crate::io::store::{Store, StoreError, Stored};
use crate::model::activity::{ActivityMap, last_activity};
use crate::model::item::{Contact, Record, TodoItem};
use crate::ops::categories::{distinct_categories, picker_options};
use crate::ops::ordering::OrderChange;
use crate::ops::reorder::{PointerPosition, Reorder};
use crate::ops::view::{DeriveContext, Pipeline, ViewAction, ViewState};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let project_dir = cli.project_dir.as_deref();

    match cli.command {
        None => Err("no command given (run `aisle` without arguments for the TUI)".into()),
        Some(cmd) => match cmd {
            // Init is handled in main.rs before project discovery
            Commands::Init(args) => cmd_init(args, project_dir),

            // Read commands
            Commands::Todos(args) => cmd_todos(args, &open_store(project_dir)?, json),
            Commands::Contacts(args) => cmd_contacts(args, &open_store(project_dir)?, json),
            Commands::Categories(args) => cmd_categories(args, &open_store(project_dir)?, json),

            // Write commands
            Commands::Reorder(args) => cmd_reorder(args, &open_store(project_dir)?, json),
            Commands::Config(cmd) => cmd_config(cmd, &open_store(project_dir)?),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Open the store from `-C` or the working directory
pub fn open_store(project_dir: Option<&str>) -> Result<Store, Box<dyn std::error::Error>> {
    let start = match project_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir().map_err(StoreError::IoError)?,
    };
    Ok(Store::discover(&start)?)
}

/// `--today` as local midnight, or the current local time
fn resolve_now(today: Option<&str>) -> Result<NaiveDateTime, String> {
    match today {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(|d| d.and_time(NaiveTime::MIN))
            .map_err(|_| format!("invalid --today '{}' (expected YYYY-MM-DD)", s)),
        None => Ok(Local::now().naive_local()),
    }
}

/// Build the view state a command line describes
fn view_from_args(
    sort: crate::ops::sort::SortKey,
    query: Option<String>,
    categories: Vec<String>,
    show_completed: bool,
) -> ViewState {
    let mut state = ViewState::with_sort(sort);
    if let Some(q) = query {
        state = state.apply(ViewAction::SetSearch(q));
    }
    for cat in categories {
        if !state.categories.contains(&cat) {
            state = state.apply(ViewAction::ToggleCategory(cat));
        }
    }
    if show_completed {
        state = state.apply(ViewAction::ToggleCompleted);
    }
    state
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_todos(args: TodosArgs, store: &Store, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let todos = store.todos()?;
    let now = resolve_now(args.today.as_deref())?;
    let state = view_from_args(
        args.sort.unwrap_or(store.config.view.todos_sort),
        args.query,
        args.categories,
        args.all || store.config.view.show_completed,
    );
    let pipeline = Pipeline::new(&todos, &store.config.search.todos);
    let activity = ActivityMap::new();

    if args.flat {
        let listed = pipeline.list(&state, &activity);
        if json {
            let out: Vec<TodoJson> = listed.iter().map(|t| todo_to_json(t)).collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            let lines: Vec<String> = listed.iter().map(|t| format_todo_line(t)).collect();
            print_lines(&lines);
        }
        return Ok(());
    }

    let ctx = DeriveContext {
        now,
        activity: &activity,
        thresholds: &store.config.groups,
    };
    let grouped = pipeline.grouped(&state, ctx);
    if json {
        println!("{}", serde_json::to_string_pretty(&grouped_to_json(&grouped))?);
    } else {
        print_lines(&format_grouped(&grouped));
    }
    Ok(())
}

fn cmd_contacts(args: ContactsArgs, store: &Store, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let contacts = store.contacts()?;
    let activity = last_activity(&store.messages()?);
    let state = view_from_args(
        args.sort.unwrap_or(store.config.view.contacts_sort),
        args.query,
        args.categories,
        false,
    );
    let pipeline = Pipeline::new(&contacts, &store.config.search.contacts);
    let listed = pipeline.list(&state, &activity);

    if json {
        let out: Vec<ContactJson> = listed.iter().map(|c| contact_to_json(c, &activity)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let lines: Vec<String> = listed
            .iter()
            .map(|c| format_contact_line(c, &activity))
            .collect();
        print_lines(&lines);
    }
    Ok(())
}

fn cmd_categories(args: CategoriesArgs, store: &Store, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut categories = match args.kind {
        ListKind::Contacts => distinct_categories(&store.contacts()?),
        ListKind::Todos => distinct_categories(&store.todos()?),
    };
    if args.picker {
        categories = picker_options(&categories);
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else {
        print_lines(&categories);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

/// Run a full drag gesture against the current snapshot and persist the
/// resulting ordering indices.
fn reorder_collection<T: Stored>(
    store: &Store,
    args: &ReorderArgs,
) -> Result<(Reorder, Vec<OrderChange>), Box<dyn std::error::Error>> {
    let items: Vec<T> = store.snapshot()?;
    for id in [&args.source, &args.target] {
        if !items.iter().any(|item| item.id() == id.as_str()) {
            return Err(format!("no item with id '{}' in {}", id, T::COLLECTION.file_name()).into());
        }
    }
    if args.source == args.target {
        return Err("cannot drop an item onto itself".into());
    }

    // One row per item: the upper half drops before, the lower half after
    let pointer = PointerPosition {
        y: if args.before { 0.0 } else { 1.0 },
        target_top: 0.0,
        target_height: 2.0,
    };
    let state = ViewState::with_sort(crate::ops::sort::SortKey::Manual)
        .apply(ViewAction::DragStart(args.source.clone()))
        .apply(ViewAction::DragOver {
            target: args.target.clone(),
            pointer,
        });
    let (_, outcome) = state.drop_on(&items);
    let reorder = outcome.ok_or("drop did not complete")?;

    let changes = store.apply_reorder::<T>(&reorder)?;
    Ok((reorder, changes))
}

fn cmd_reorder(args: ReorderArgs, store: &Store, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (reorder, changes) = match args.kind {
        ListKind::Contacts => reorder_collection::<Contact>(store, &args)?,
        ListKind::Todos => reorder_collection::<TodoItem>(store, &args)?,
    };

    if json {
        let out = ReorderJson {
            reorder: &reorder,
            changes: &changes,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if changes.is_empty() {
        println!("already in place");
    } else {
        println!("{} {} {}", reorder.source, reorder.side.as_str(), reorder.target);
        let lines: Vec<String> = changes.iter().map(format_order_change).collect();
        print_lines(&lines);
    }
    Ok(())
}

fn cmd_config(cmd: ConfigCmd, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    match cmd.action {
        ConfigAction::SetSort(args) => {
            let screen = match args.kind {
                ListKind::Contacts => Screen::Contacts,
                ListKind::Todos => Screen::Todos,
            };
            let (_, mut doc) = config_io::read_config_doc(&store.data_dir)?;
            config_io::set_default_sort(&mut doc, screen, args.key);
            config_io::write_config(&store.data_dir, &doc)?;
            println!("default sort set to {}", args.key);
        }
        ConfigAction::ShowCompleted(args) => {
            let (_, mut doc) = config_io::read_config_doc(&store.data_dir)?;
            config_io::set_show_completed(&mut doc, args.show);
            config_io::write_config(&store.data_dir, &doc)?;
            println!("show completed to-dos: {}", args.show);
        }
    }
    Ok(())
}
