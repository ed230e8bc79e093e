use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::ops::sort::SortKey;

#[derive(Parser)]
#[command(name = "aisle", about = concat!("aisle v", env!("CARGO_PKG_VERSION"), " - vendors and to-dos for the big day"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,

    /// Log debug detail to stderr (AISLE_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an aisle/ directory with an empty contact list and to-do list
    Init(InitArgs),
    /// Show the to-do list, grouped by deadline
    Todos(TodosArgs),
    /// Show the contact list
    Contacts(ContactsArgs),
    /// List the categories in use
    Categories(CategoriesArgs),
    /// Move one item before or after another in the manual order
    Reorder(ReorderArgs),
    /// Edit aisle.toml
    Config(ConfigCmd),
}

/// Which collection a command applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Contacts,
    Todos,
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite aisle.toml even if aisle/ already exists (collections are kept)
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// View args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TodosArgs {
    /// Fuzzy search over name, note and category
    #[arg(short, long)]
    pub query: Option<String>,
    /// Only show these categories (repeatable)
    #[arg(short, long = "category")]
    pub categories: Vec<String>,
    /// Sort key (default from aisle.toml)
    #[arg(long)]
    pub sort: Option<SortKey>,
    /// Plain list instead of deadline groups
    #[arg(long)]
    pub flat: bool,
    /// Include completed to-dos
    #[arg(long)]
    pub all: bool,
    /// Group relative to this date instead of the current day (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<String>,
}

#[derive(Args)]
pub struct ContactsArgs {
    /// Fuzzy search over contact names
    #[arg(short, long)]
    pub query: Option<String>,
    /// Only show these categories (repeatable)
    #[arg(short, long = "category")]
    pub categories: Vec<String>,
    /// Sort key (default from aisle.toml)
    #[arg(long)]
    pub sort: Option<SortKey>,
}

#[derive(Args)]
pub struct CategoriesArgs {
    /// Collection to inspect
    #[arg(value_enum, default_value = "contacts")]
    pub kind: ListKind,
    /// Show the picker options: built-in vendor categories merged in, "Other" last
    #[arg(long)]
    pub picker: bool,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ReorderArgs {
    /// Collection to reorder
    #[arg(value_enum)]
    pub kind: ListKind,
    /// Id of the item being moved
    pub source: String,
    /// Id of the item it is dropped on
    pub target: String,
    /// Place before the target
    #[arg(long, conflicts_with = "after", required_unless_present = "after")]
    pub before: bool,
    /// Place after the target
    #[arg(long)]
    pub after: bool,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set the default sort for a screen
    SetSort(SetSortArgs),
    /// List completed to-dos by default (true/false)
    ShowCompleted(ShowCompletedArgs),
}

#[derive(Args)]
pub struct SetSortArgs {
    #[arg(value_enum)]
    pub kind: ListKind,
    /// One of: name-asc, name-desc, recent-desc, deadline, created-desc, category, manual
    pub key: SortKey,
}

#[derive(Args)]
pub struct ShowCompletedArgs {
    #[arg(action = clap::ArgAction::Set)]
    pub show: bool,
}
