//! The boundary between the document model and whatever draws it.
//!
//! The model never owns widgets. It issues [`RenderRequest`]s addressed by
//! [`Address`] and receives [`ViewEvent`]s tagged with the same addresses.

pub mod tree;

use std::fmt;

use crate::model::color::Rgba;
use crate::model::id::EntityId;

pub use tree::WidgetTree;

/// What part of an entity an address points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// A tab in the workspace strip
    Tab,
    /// The group holding a page's category rows
    PageCategories,
    /// Trailing "add category" control of a page (an anchor)
    AddCategory,
    /// A category's checkable, colored row
    Category,
    /// The group holding a category's task rows
    CategoryTasks,
    /// Trailing "add task" control of a category (an anchor)
    AddTask,
    /// A task's checkable row
    Task,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AddressKind::Tab => "tab",
            AddressKind::PageCategories => "page-categories",
            AddressKind::AddCategory => "add-category",
            AddressKind::Category => "category",
            AddressKind::CategoryTasks => "category-tasks",
            AddressKind::AddTask => "add-task",
            AddressKind::Task => "task",
        };
        f.write_str(s)
    }
}

/// Structured UI address: which entity, and which of its widgets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    pub kind: AddressKind,
    pub entity: EntityId,
}

impl Address {
    pub fn new(kind: AddressKind, entity: &EntityId) -> Self {
        Address {
            kind,
            entity: entity.clone(),
        }
    }

    pub fn tab(id: &EntityId) -> Self {
        Address::new(AddressKind::Tab, id)
    }

    pub fn page_categories(page: &EntityId) -> Self {
        Address::new(AddressKind::PageCategories, page)
    }

    pub fn add_category(page: &EntityId) -> Self {
        Address::new(AddressKind::AddCategory, page)
    }

    pub fn category(id: &EntityId) -> Self {
        Address::new(AddressKind::Category, id)
    }

    pub fn category_tasks(category: &EntityId) -> Self {
        Address::new(AddressKind::CategoryTasks, category)
    }

    pub fn add_task(category: &EntityId) -> Self {
        Address::new(AddressKind::AddTask, category)
    }

    pub fn task(id: &EntityId) -> Self {
        Address::new(AddressKind::Task, id)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.entity)
    }
}

/// Instructions from the model to the rendering surface
#[derive(Debug, Clone, PartialEq)]
pub enum RenderRequest {
    /// Append a closable tab to the workspace strip
    InsertTab { address: Address, label: String },
    /// Drop a tab and everything under it
    RemoveTab { address: Address },
    /// A nested container under `parent`, placed before `before` (or
    /// appended when `None`), ending with the trailing control `anchor`.
    InsertGroup {
        address: Address,
        parent: Address,
        before: Option<Address>,
        anchor: Address,
        anchor_label: String,
    },
    /// A checkbox with a label, placed before `before` inside `parent`
    InsertCheckRow {
        address: Address,
        parent: Address,
        before: Address,
        label: String,
        checked: bool,
    },
    /// A checkbox followed by colored text, placed before `before`
    InsertColorRow {
        address: Address,
        parent: Address,
        before: Address,
        label: String,
        color: Rgba,
        checked: bool,
    },
    SetChecked { address: Address, checked: bool },
    SetEnabled { address: Address, enabled: bool },
    /// Show or clear the unsaved-changes marker on a tab title
    MarkModified { address: Address, modified: bool },
}

/// A value read from an input widget
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetValue {
    Checked(bool),
    Text(String),
}

/// Values held by an inline editor when its Done button is pressed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmitFields {
    pub label: String,
    /// Only category editors carry a color picker
    pub color: Option<Rgba>,
}

/// Events from the view back into the model
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    ValueChanged { address: Address, value: WidgetValue },
    /// The inline editor opened at `anchor` was submitted
    Submit { anchor: Address, fields: SubmitFields },
}

/// A retained-mode rendering surface.
pub trait Surface {
    fn apply(&mut self, request: RenderRequest);
}

/// Surface that drops every request; for driving the model without a view.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl Surface for Detached {
    fn apply(&mut self, _request: RenderRequest) {}
}

/// Records requests in order; handy for asserting what the model emitted.
impl Surface for Vec<RenderRequest> {
    fn apply(&mut self, request: RenderRequest) {
        self.push(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_display() {
        let id = EntityId::from("abc");
        assert_eq!(Address::add_task(&id).to_string(), "add-task:abc");
    }

    #[test]
    fn same_entity_different_kind_are_distinct() {
        let id = EntityId::from("abc");
        assert_ne!(Address::category(&id), Address::category_tasks(&id));
    }
}
