use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::color::Rgba;

#[derive(Parser)]
#[command(name = "tk", about = concat!("tasker v", env!("CARGO_PKG_VERSION"), " - categorized checklists in .task files"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Read config and the recovery log from this directory
    #[arg(long = "config-dir", global = true)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty document
    New(NewArgs),
    /// Show a document as the editor lays it out
    Show(FileArgs),
    /// Print a document in canonical form
    Export(FileArgs),
    /// Add a category to a document
    AddCategory(AddCategoryArgs),
    /// Add a task to a category
    AddTask(AddTaskArgs),
    /// Check (or uncheck) a category or one of its tasks
    Check(CheckArgs),
    /// Show or change the editor theme
    Theme(ThemeArgs),
    /// View documents that could not be saved
    Recovery(RecoveryArgs),
}

// ---------------------------------------------------------------------------
// Document args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct NewArgs {
    /// Path of the new document (.task is appended when missing)
    pub file: PathBuf,
    /// Page name (default: the file stem)
    #[arg(long)]
    pub name: Option<String>,
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct FileArgs {
    /// Document to read
    pub file: PathBuf,
}

#[derive(Args)]
pub struct AddCategoryArgs {
    /// Document to edit
    pub file: PathBuf,
    /// Category label
    pub label: String,
    /// Color as "r,g,b,a", "#rrggbb" or "#rrggbbaa" (default: from config)
    #[arg(long, value_parser = Rgba::parse)]
    pub color: Option<Rgba>,
}

#[derive(Args)]
pub struct AddTaskArgs {
    /// Document to edit
    pub file: PathBuf,
    /// Category label or 1-based position
    pub category: String,
    /// Task label
    pub label: String,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Document to edit
    pub file: PathBuf,
    /// Category label or 1-based position
    pub category: String,
    /// Task label or 1-based position within the category (default: the
    /// category itself)
    pub task: Option<String>,
    /// Uncheck instead
    #[arg(long)]
    pub undo: bool,
}

// ---------------------------------------------------------------------------
// Editor args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ThemeArgs {
    /// Theme to switch to (omit to show the current one)
    pub name: Option<String>,
    /// List available themes
    #[arg(long)]
    pub list: bool,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Show only the N most recent entries
    #[arg(long)]
    pub limit: Option<usize>,
}
