mod editor;
pub use editor::{cmd_recovery, cmd_theme};

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::{config_io, document_io};
use crate::model::id::EntityId;
use crate::model::page::Page;
use crate::model::workspace::Workspace;
use crate::ops::workspace_ops::{self, EventOutcome, WorkspaceError};
use crate::parse::encode;
use crate::view::{Address, SubmitFields, ViewEvent, WidgetTree, WidgetValue};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let config_dir = cli.config_dir.unwrap_or_else(config_io::config_dir);

    match cli.command {
        // Read commands
        Commands::Show(args) => cmd_show(args, &config_dir, json),
        Commands::Export(args) => cmd_export(args),

        // Write commands
        Commands::New(args) => cmd_new(args, &config_dir),
        Commands::AddCategory(args) => cmd_add_category(args, &config_dir),
        Commands::AddTask(args) => cmd_add_task(args, &config_dir),
        Commands::Check(args) => cmd_check(args, &config_dir),

        // Editor settings
        Commands::Theme(args) => cmd_theme(args, &config_dir, json),
        Commands::Recovery(args) => cmd_recovery(args, &config_dir, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// One document open in a fresh workspace, laid out on an in-memory tree.
struct Session {
    workspace: Workspace,
    tree: WidgetTree,
    tab: EntityId,
    directory: PathBuf,
    filename: String,
    recovery_dir: PathBuf,
}

impl Session {
    fn open(file: &Path, config_dir: &Path) -> Result<Session, Box<dyn std::error::Error>> {
        let config = config_io::read_config_from(config_dir);
        let mut workspace = Workspace::new(config.page_settings());
        let mut tree = WidgetTree::new();
        let (directory, filename) = split_path(file)?;
        let tab = workspace_ops::load_tab(&mut workspace, &directory, &filename, &mut tree)?;
        Ok(Session {
            workspace,
            tree,
            tab,
            directory,
            filename,
            recovery_dir: config_dir.to_path_buf(),
        })
    }

    fn page(&self) -> Result<&Page, WorkspaceError> {
        Ok(&self.workspace.tab(&self.tab)?.page)
    }

    fn send(&mut self, event: ViewEvent) -> Result<EventOutcome, WorkspaceError> {
        workspace_ops::dispatch(&mut self.workspace, event, &mut self.tree)
    }

    fn save(&mut self) -> Result<PathBuf, WorkspaceError> {
        workspace_ops::save_tab(
            &mut self.workspace,
            &self.tab,
            &self.directory,
            &self.filename,
            &self.recovery_dir,
            &mut self.tree,
        )
    }
}

/// Split a document path into the (directory, filename) pair the save and
/// load boundaries take.
fn split_path(file: &Path) -> Result<(PathBuf, String), String> {
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| format!("'{}' does not name a file", file.display()))?;
    let directory = match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, filename))
}

/// Pick an entry by 1-based position or exact label. Positions win when the
/// key is numeric.
fn resolve(entries: &[(&EntityId, &str)], key: &str, what: &str) -> Result<EntityId, String> {
    if let Ok(n) = key.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| entries.get(i))
            .map(|(id, _)| (*id).clone())
            .ok_or_else(|| format!("no {} at position {}", what, n));
    }
    let matches: Vec<_> = entries.iter().filter(|(_, label)| *label == key).collect();
    match matches.as_slice() {
        [(id, _)] => Ok((*id).clone()),
        [] => Err(format!("no {} labelled '{}'", what, key)),
        _ => Err(format!(
            "{} label '{}' is ambiguous, use its position",
            what, key
        )),
    }
}

fn resolve_category(page: &Page, key: &str) -> Result<EntityId, String> {
    let entries: Vec<_> = page
        .categories
        .iter()
        .map(|c| (&c.id, c.label.as_str()))
        .collect();
    resolve(&entries, key, "category")
}

fn resolve_task(page: &Page, category: &EntityId, key: &str) -> Result<EntityId, String> {
    let entries: Vec<_> = page
        .categories
        .get(category)
        .into_iter()
        .flat_map(|c| c.tasks.iter())
        .map(|t| (&t.id, t.label.as_str()))
        .collect();
    resolve(&entries, key, "task")
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_show(args: FileArgs, config_dir: &Path, json: bool) -> CmdResult {
    let session = Session::open(&args.file, config_dir)?;
    if json {
        let out = page_to_json(session.page()?);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", session.tree.render_text());
    }
    Ok(())
}

fn cmd_export(args: FileArgs) -> CmdResult {
    let record = document_io::read_document(&args.file)?;
    print!("{}", encode(&record)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_new(args: NewArgs, config_dir: &Path) -> CmdResult {
    let (directory, filename) = split_path(&args.file)?;
    let filename = document_io::with_extension(&filename);
    let target = directory.join(&filename);
    if target.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            target.display()
        )
        .into());
    }
    let name = args.name.unwrap_or_else(|| {
        Path::new(&filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let config = config_io::read_config_from(config_dir);
    let mut workspace = Workspace::new(config.page_settings());
    let mut tree = WidgetTree::new();
    let tab = workspace.new_tab(name, &mut tree);
    let path = workspace_ops::save_tab(
        &mut workspace,
        &tab,
        &directory,
        &filename,
        config_dir,
        &mut tree,
    )?;
    println!("created {}", path.display());
    Ok(())
}

fn cmd_add_category(args: AddCategoryArgs, config_dir: &Path) -> CmdResult {
    let mut session = Session::open(&args.file, config_dir)?;
    let page_id = session.page()?.id.clone();
    let label = args.label.clone();
    session.send(ViewEvent::Submit {
        anchor: Address::add_category(&page_id),
        fields: SubmitFields {
            label: args.label,
            color: args.color,
        },
    })?;
    session.save()?;
    println!(
        "added category '{}' at position {}",
        label,
        session.page()?.categories.len()
    );
    Ok(())
}

fn cmd_add_task(args: AddTaskArgs, config_dir: &Path) -> CmdResult {
    let mut session = Session::open(&args.file, config_dir)?;
    let category = resolve_category(session.page()?, &args.category)?;
    let label = args.label.clone();
    session.send(ViewEvent::Submit {
        anchor: Address::add_task(&category),
        fields: SubmitFields {
            label: args.label,
            color: None,
        },
    })?;
    session.save()?;
    let page = session.page()?;
    let count = page.categories.get(&category).map_or(0, |c| c.tasks.len());
    println!("added task '{}' at position {}", label, count);
    Ok(())
}

fn cmd_check(args: CheckArgs, config_dir: &Path) -> CmdResult {
    let mut session = Session::open(&args.file, config_dir)?;
    let page = session.page()?;
    let category = resolve_category(page, &args.category)?;
    let address = match &args.task {
        Some(key) => Address::task(&resolve_task(page, &category, key)?),
        None => Address::category(&category),
    };
    let checked = !args.undo;
    session.send(ViewEvent::ValueChanged {
        address,
        value: WidgetValue::Checked(checked),
    })?;
    // Completion edits don't always flip the dirty flag, so always write
    session.save()?;
    let target = args.task.as_deref().unwrap_or(&args.category);
    let verb = if checked { "checked" } else { "unchecked" };
    println!("{} '{}'", verb, target);
    Ok(())
}
