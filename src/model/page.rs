use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::category::{Category, CategoryCompletionChanged};
use super::color::Rgba;
use super::id::EntityId;
use super::record::PageRecord;
use super::registry::{CategoryRegistry, EntityKind, ModelError, RemovalPolicy};
use super::task::Task;
use crate::view::{Address, RenderRequest, Surface, SubmitFields};

/// Label of the trailing control at the end of a page's category list
pub const ADD_CATEGORY_LABEL: &str = "Add New Category";

/// How a page decides it has unsaved changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirtyTracking {
    /// Dirty once anything was added since the last save; edits don't count
    #[default]
    Additions,
    /// Dirty while the export record differs from the last saved one
    Content,
}

/// Per-page behavior knobs, taken from the editor config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSettings {
    pub tracking: DirtyTracking,
    pub removal: RemovalPolicy,
    /// Used when a category editor is submitted without a color
    pub default_color: Rgba,
}

impl Default for PageSettings {
    fn default() -> Self {
        PageSettings {
            tracking: DirtyTracking::default(),
            removal: RemovalPolicy::default(),
            default_color: Rgba::PICKER_DEFAULT,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Change {
    Addition,
    Edit,
}

/// One document: an ordered list of categories plus file metadata
#[derive(Debug)]
pub struct Page {
    pub id: EntityId,
    /// Document name (`pagename` in the file)
    pub name: String,
    /// Id of the tab this page is shown in
    slot: EntityId,
    pub path: Option<PathBuf>,
    pub filename: Option<String>,
    dirty: bool,
    pub categories: CategoryRegistry,
    settings: PageSettings,
    last_saved: PageRecord,
}

impl Page {
    pub fn new(name: impl Into<String>, slot: EntityId) -> Self {
        Page::with_settings(name, slot, PageSettings::default())
    }

    pub fn with_settings(name: impl Into<String>, slot: EntityId, settings: PageSettings) -> Self {
        let id = EntityId::generate();
        let name = name.into();
        let last_saved = PageRecord {
            pagename: name.clone(),
            id: id.clone(),
            path: None,
            filename: None,
            categories: Vec::new(),
        };
        Page {
            id,
            name,
            slot,
            path: None,
            filename: None,
            dirty: false,
            categories: CategoryRegistry::with_policy(settings.removal),
            settings,
            last_saved,
        }
    }

    pub fn slot(&self) -> &EntityId {
        &self.slot
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True while the current export differs from what was last saved or
    /// loaded, whatever the tracking mode.
    pub fn has_unsaved_changes(&self) -> bool {
        self.export() != self.last_saved
    }

    /// Where the page was last saved or loaded from
    pub fn set_location(&mut self, directory: &Path, filename: &str) {
        self.path = Some(directory.to_path_buf());
        self.filename = Some(filename.to_string());
    }

    /// Full path of the backing file, if the page has one
    pub fn file_path(&self) -> Option<PathBuf> {
        match (&self.path, &self.filename) {
            (Some(dir), Some(name)) => Some(dir.join(name)),
            _ => None,
        }
    }

    /// Insert the category list group, ending in the "add category" control.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.apply(RenderRequest::InsertGroup {
            address: Address::page_categories(&self.id),
            parent: Address::tab(&self.slot),
            before: None,
            anchor: Address::add_category(&self.id),
            anchor_label: ADD_CATEGORY_LABEL.to_string(),
        });
    }

    pub fn add_category(
        &mut self,
        label: impl Into<String>,
        color: Rgba,
        surface: &mut dyn Surface,
    ) -> EntityId {
        let category =
            Category::new(self.id.clone(), label, color).with_removal(self.settings.removal);
        let id = category.id.clone();
        log::debug!("category {} added to page {}", id, self.id);
        category.render(surface);
        self.categories.add(category);
        self.note_change(Change::Addition, surface);
        id
    }

    pub fn add_task(
        &mut self,
        category_id: &EntityId,
        label: impl Into<String>,
        surface: &mut dyn Surface,
    ) -> Result<EntityId, ModelError> {
        let id = self
            .categories
            .require_mut(category_id)?
            .add_task(label, surface)
            .id
            .clone();
        self.note_change(Change::Addition, surface);
        Ok(id)
    }

    /// Inline "add category" editor submitted.
    pub fn submit_category(&mut self, fields: SubmitFields, surface: &mut dyn Surface) -> EntityId {
        let color = fields.color.unwrap_or(self.settings.default_color);
        self.add_category(fields.label, color, surface)
    }

    /// Inline "add task" editor under `category_id` submitted.
    pub fn submit_task(
        &mut self,
        category_id: &EntityId,
        fields: SubmitFields,
        surface: &mut dyn Surface,
    ) -> Result<EntityId, ModelError> {
        self.add_task(category_id, fields.label, surface)
    }

    pub fn toggle_category(
        &mut self,
        category_id: &EntityId,
        complete: bool,
        surface: &mut dyn Surface,
    ) -> Result<CategoryCompletionChanged, ModelError> {
        let event = self
            .categories
            .require_mut(category_id)?
            .toggle(complete, surface);
        self.note_change(Change::Edit, surface);
        Ok(event)
    }

    pub fn toggle_task(
        &mut self,
        task_id: &EntityId,
        complete: bool,
        surface: &mut dyn Surface,
    ) -> Result<(), ModelError> {
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.tasks.get(task_id).is_some())
            .ok_or_else(|| ModelError::NotFound {
                kind: EntityKind::Task,
                id: task_id.clone(),
            })?;
        category.toggle_task(task_id, complete, surface)?;
        self.note_change(Change::Edit, surface);
        Ok(())
    }

    pub fn find_task(&self, task_id: &EntityId) -> Option<&Task> {
        self.categories.iter().find_map(|c| c.tasks.get(task_id))
    }

    pub fn contains_task(&self, task_id: &EntityId) -> bool {
        self.find_task(task_id).is_some()
    }

    pub fn export(&self) -> PageRecord {
        PageRecord {
            pagename: self.name.clone(),
            id: self.id.clone(),
            path: self
                .path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            filename: self.filename.clone(),
            categories: self.categories.iter().map(Category::export).collect(),
        }
    }

    /// Rebuild this page's content from a saved record.
    ///
    /// Categories and tasks get fresh ids and are appended in record order,
    /// so this expects a freshly created page. The result counts as the
    /// last-saved state: not dirty, no marker on the tab.
    pub fn import(&mut self, record: &PageRecord, surface: &mut dyn Surface) {
        self.name = record.pagename.clone();
        self.path = record.path.as_ref().map(PathBuf::from);
        self.filename = record.filename.clone();

        for category_record in &record.categories {
            let mut category =
                Category::from_record(category_record, self.id.clone(), self.settings.removal);
            category.render(surface);
            for task_record in &category_record.tasks {
                let task = Task::from_record(task_record, category.id.clone());
                category.adopt_task(task, surface);
            }
            self.categories.add(category);
        }
        log::debug!(
            "page {} imported {} categories",
            self.id,
            self.categories.len()
        );
        self.mark_saved(surface);
    }

    /// The current content is what's on disk now.
    pub fn mark_saved(&mut self, surface: &mut dyn Surface) {
        self.dirty = false;
        self.last_saved = self.export();
        surface.apply(RenderRequest::MarkModified {
            address: Address::tab(&self.slot),
            modified: false,
        });
    }

    fn note_change(&mut self, change: Change, surface: &mut dyn Surface) {
        let dirty = match (self.settings.tracking, change) {
            (DirtyTracking::Additions, Change::Addition) => true,
            (DirtyTracking::Additions, Change::Edit) => return,
            (DirtyTracking::Content, _) => self.has_unsaved_changes(),
        };
        if dirty != self.dirty {
            self.dirty = dirty;
            surface.apply(RenderRequest::MarkModified {
                address: Address::tab(&self.slot),
                modified: dirty,
            });
        }
    }
}
