use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::commands::InitArgs;
use crate::io::store::{CONFIG_FILE, Collection, DATA_DIR, atomic_write, discover_root};

const CONFIG_TEMPLATE: &str = r##"# aisle settings. Every key is optional; the values below are the defaults.

[search.todos]
fields = ["name", "note", "category"]
# 0 = exact substrings only, 1 = anything goes
threshold = 0.3

[search.contacts]
fields = ["name"]
threshold = 0.4

# Deadline groups: last day (counted from today) of each bucket.
# Today and Tomorrow are fixed; past deadlines are Overdue.
[groups]
this_week = 7
next_week = 14
this_month = 30
next_month = 60

[view]
# name-asc, name-desc, recent-desc, deadline, created-desc, category, manual
todos_sort = "deadline"
contacts_sort = "name-asc"
show_completed = false

# --- UI Customization ---
# Uncomment and edit to override defaults.
#
# [ui.colors]
# background = "#1A1423"
# text = "#E8DDEB"
# highlight = "#E07A9B"
# dim = "#7A6E80"
#
# [ui.category_colors]
# Venue = "#C9A227"
# Florist = "#7FB069"
"##;

const EMPTY_COLLECTION: &str = "[]\n";

fn target_dir(project_dir: Option<&str>) -> std::io::Result<PathBuf> {
    match project_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => std::env::current_dir(),
    }
}

/// Lay out `aisle/` under `root`. Existing collection files are never
/// replaced; `force` only rewrites aisle.toml.
fn write_layout(root: &Path, force: bool) -> Result<Vec<&'static str>, Box<dyn std::error::Error>> {
    let data_dir = root.join(DATA_DIR);
    if data_dir.is_dir() && !force {
        return Err("aisle project already exists in ./aisle/ (use --force to rewrite aisle.toml)".into());
    }
    fs::create_dir_all(&data_dir)?;

    let mut created = vec![CONFIG_FILE];
    atomic_write(&data_dir.join(CONFIG_FILE), CONFIG_TEMPLATE.as_bytes())?;

    for collection in [Collection::Contacts, Collection::Todos, Collection::Messages] {
        let path = data_dir.join(collection.file_name());
        if !path.exists() {
            fs::write(&path, EMPTY_COLLECTION)?;
            created.push(collection.file_name());
        }
    }
    Ok(created)
}

pub fn cmd_init(args: InitArgs, project_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = target_dir(project_dir)?;

    if let Some(parent) = root.parent()
        && let Ok(parent_root) = discover_root(parent)
    {
        eprintln!("Note: parent project found at {}/", parent_root.join(DATA_DIR).display());
        eprintln!("Creating new project in ./{}/", DATA_DIR);
    }

    let created = write_layout(&root, args.force)?;
    tracing::info!(root = %root.display(), files = ?created, "initialized project");

    println!("Initialized aisle project in {}", root.join(DATA_DIR).display());
    for file in created {
        println!("  {}", file);
    }
    Ok(())
}
