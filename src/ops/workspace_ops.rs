use std::path::{Path, PathBuf};

use crate::io::document_io::{self, DocumentError};
use crate::model::category::CategoryCompletionChanged;
use crate::model::id::EntityId;
use crate::model::registry::ModelError;
use crate::model::workspace::Workspace;
use crate::view::{Address, AddressKind, Surface, ViewEvent, WidgetValue};

/// Error type for workspace operations
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("no handler for {event} at {address}")]
    NotRoutable { event: &'static str, address: Address },
}

/// What a dispatched event did
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    CategoryAdded(EntityId),
    TaskAdded(EntityId),
    CategoryToggled(CategoryCompletionChanged),
    TaskToggled(EntityId),
    /// Text typed into an inline editor; it is read when the editor is submitted
    Ignored,
}

/// Route a view event to the node that owns its address.
pub fn dispatch(
    workspace: &mut Workspace,
    event: ViewEvent,
    surface: &mut dyn Surface,
) -> Result<EventOutcome, WorkspaceError> {
    match event {
        ViewEvent::Submit { anchor, fields } => {
            log::debug!("submit at {}", anchor);
            match anchor.kind {
                AddressKind::AddCategory => {
                    let tab = workspace.tab_with_page_mut(&anchor.entity)?;
                    let id = tab.page.submit_category(fields, surface);
                    Ok(EventOutcome::CategoryAdded(id))
                }
                AddressKind::AddTask => {
                    let tab = workspace.tab_with_category_mut(&anchor.entity)?;
                    let id = tab.page.submit_task(&anchor.entity, fields, surface)?;
                    Ok(EventOutcome::TaskAdded(id))
                }
                _ => Err(WorkspaceError::NotRoutable {
                    event: "submit",
                    address: anchor,
                }),
            }
        }
        ViewEvent::ValueChanged { address, value } => {
            log::debug!("value changed at {}", address);
            match (address.kind, value) {
                (AddressKind::Category, WidgetValue::Checked(complete)) => {
                    let tab = workspace.tab_with_category_mut(&address.entity)?;
                    let event = tab
                        .page
                        .toggle_category(&address.entity, complete, surface)?;
                    Ok(EventOutcome::CategoryToggled(event))
                }
                (AddressKind::Task, WidgetValue::Checked(complete)) => {
                    let tab = workspace.tab_with_task_mut(&address.entity)?;
                    tab.page.toggle_task(&address.entity, complete, surface)?;
                    Ok(EventOutcome::TaskToggled(address.entity))
                }
                (_, WidgetValue::Text(_)) => Ok(EventOutcome::Ignored),
                (_, WidgetValue::Checked(_)) => Err(WorkspaceError::NotRoutable {
                    event: "checkbox change",
                    address,
                }),
            }
        }
    }
}

/// Save a tab's page to `directory/filename` (`.task` appended if absent).
///
/// On success the page remembers its location and stops being dirty. On
/// failure the page is untouched, so its tab keeps the modified marker.
pub fn save_tab(
    workspace: &mut Workspace,
    tab_id: &EntityId,
    directory: &Path,
    filename: &str,
    recovery_dir: &Path,
    surface: &mut dyn Surface,
) -> Result<PathBuf, WorkspaceError> {
    let filename = document_io::with_extension(filename);
    let path = directory.join(&filename);
    let page = &mut workspace.tab_mut(tab_id)?.page;

    let mut record = page.export();
    record.path = Some(directory.to_string_lossy().into_owned());
    record.filename = Some(filename.clone());
    document_io::write_document(&path, &record, recovery_dir)?;

    page.set_location(directory, &filename);
    page.mark_saved(surface);
    Ok(path)
}

/// Open `directory/filename` in a new tab. When no such file exists the
/// name is retried with the `.task` extension, as `save_tab` would write it.
///
/// The document is fully decoded before any tab is created, so a bad file
/// leaves the workspace as it was.
pub fn load_tab(
    workspace: &mut Workspace,
    directory: &Path,
    filename: &str,
    surface: &mut dyn Surface,
) -> Result<EntityId, WorkspaceError> {
    let filename = if directory.join(filename).exists() {
        filename.to_string()
    } else {
        document_io::with_extension(filename)
    };
    let path = directory.join(&filename);
    let mut record = document_io::read_document(&path)?;
    record.path = Some(directory.to_string_lossy().into_owned());
    record.filename = Some(filename);

    let tab_id = workspace.new_tab(record.pagename.clone(), surface);
    workspace.tab_mut(&tab_id)?.page.import(&record, surface);
    log::info!("loaded {} into tab {}", path.display(), tab_id);
    Ok(tab_id)
}
