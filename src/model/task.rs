use super::id::EntityId;
use super::record::TaskRecord;
use super::registry::{Entity, EntityKind};
use crate::view::{Address, RenderRequest, Surface};

/// A leaf item: a label with a completion checkbox
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: EntityId,
    pub label: String,
    /// The category this task was added under (same page)
    pub category_id: EntityId,
    pub complete: bool,
}

impl Task {
    /// Create an incomplete task with a fresh id. The label may be empty.
    pub fn new(label: impl Into<String>, category_id: EntityId) -> Self {
        Task {
            id: EntityId::generate(),
            label: label.into(),
            category_id,
            complete: false,
        }
    }

    /// Rebuild a task from a stored record under `category_id`.
    /// The stored id is not reused.
    pub fn from_record(record: &TaskRecord, category_id: EntityId) -> Self {
        Task {
            id: EntityId::generate(),
            label: record.label.clone(),
            category_id,
            complete: record.complete,
        }
    }

    pub fn address(&self) -> Address {
        Address::task(&self.id)
    }

    /// Insert this task's row just above its category's "add task" control.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.apply(RenderRequest::InsertCheckRow {
            address: self.address(),
            parent: Address::category_tasks(&self.category_id),
            before: Address::add_task(&self.category_id),
            label: self.label.clone(),
            checked: self.complete,
        });
    }

    /// Checkbox changed. A checked task is locked: its checkbox is disabled.
    pub fn toggle(&mut self, complete: bool, surface: &mut dyn Surface) {
        self.complete = complete;
        surface.apply(RenderRequest::SetChecked {
            address: self.address(),
            checked: complete,
        });
        surface.apply(RenderRequest::SetEnabled {
            address: self.address(),
            enabled: !complete,
        });
    }

    /// Mark complete on behalf of the owning category.
    pub fn force_complete(&mut self, surface: &mut dyn Surface) {
        self.toggle(true, surface);
    }

    pub fn export(&self) -> TaskRecord {
        TaskRecord {
            id: self.id.clone(),
            label: self.label.clone(),
            category_id: self.category_id.clone(),
            complete: self.complete,
        }
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> &EntityId {
        &self.id
    }
}
