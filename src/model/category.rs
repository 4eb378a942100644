use super::color::Rgba;
use super::id::EntityId;
use super::record::CategoryRecord;
use super::registry::{Entity, EntityKind, ModelError, RemovalPolicy, TaskRegistry};
use super::task::Task;
use crate::view::{Address, RenderRequest, Surface};

/// Label of the trailing control inside every category
pub const ADD_TASK_LABEL: &str = "Add New Task";

/// Emitted when a category's checkbox changes; applied to the category's
/// own tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCompletionChanged {
    pub category: EntityId,
    pub complete: bool,
}

/// A named, colored group of tasks with its own completion flag
#[derive(Debug)]
pub struct Category {
    pub id: EntityId,
    /// Owning page; fixed for the category's lifetime
    page_id: EntityId,
    pub label: String,
    pub color: Rgba,
    /// Stored independently; never derived from the tasks
    pub complete: bool,
    pub tasks: TaskRegistry,
}

impl Category {
    pub fn new(page_id: EntityId, label: impl Into<String>, color: Rgba) -> Self {
        Category {
            id: EntityId::generate(),
            page_id,
            label: label.into(),
            color,
            complete: false,
            tasks: TaskRegistry::new(),
        }
    }

    /// Rebuild a category (without its tasks) from a stored record.
    pub(crate) fn from_record(
        record: &CategoryRecord,
        page_id: EntityId,
        removal: RemovalPolicy,
    ) -> Self {
        Category {
            id: EntityId::generate(),
            page_id,
            label: record.label.clone(),
            color: record.color,
            complete: record.complete,
            tasks: TaskRegistry::with_policy(removal),
        }
    }

    pub(crate) fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.tasks = TaskRegistry::with_policy(removal);
        self
    }

    pub fn page_id(&self) -> &EntityId {
        &self.page_id
    }

    pub fn address(&self) -> Address {
        Address::category(&self.id)
    }

    /// Insert the category row above the page's "add category" control,
    /// then the nested group that will hold its tasks and "add task" control.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.apply(RenderRequest::InsertColorRow {
            address: self.address(),
            parent: Address::page_categories(&self.page_id),
            before: Address::add_category(&self.page_id),
            label: self.label.clone(),
            color: self.color,
            checked: self.complete,
        });
        surface.apply(RenderRequest::InsertGroup {
            address: Address::category_tasks(&self.id),
            parent: self.address(),
            before: None,
            anchor: Address::add_task(&self.id),
            anchor_label: ADD_TASK_LABEL.to_string(),
        });
    }

    /// Append a task and render it above the "add task" control.
    pub fn add_task(&mut self, label: impl Into<String>, surface: &mut dyn Surface) -> &Task {
        let task = self.tasks.add(Task::new(label, self.id.clone()));
        log::debug!("task {} added to category {}", task.id, task.category_id);
        task.render(surface);
        task
    }

    /// Append an already-built task (import path) and render it.
    pub(crate) fn adopt_task(&mut self, task: Task, surface: &mut dyn Surface) {
        let task = self.tasks.add(task);
        task.render(surface);
    }

    pub fn toggle_task(
        &mut self,
        task_id: &EntityId,
        complete: bool,
        surface: &mut dyn Surface,
    ) -> Result<(), ModelError> {
        self.tasks.require_mut(task_id)?.toggle(complete, surface);
        Ok(())
    }

    /// Checkbox changed. Locks the checkbox once checked and completes every
    /// task, whichever way the box went; tasks never feed back up.
    pub fn toggle(&mut self, complete: bool, surface: &mut dyn Surface) -> CategoryCompletionChanged {
        self.complete = complete;
        surface.apply(RenderRequest::SetChecked {
            address: self.address(),
            checked: complete,
        });
        surface.apply(RenderRequest::SetEnabled {
            address: self.address(),
            enabled: !complete,
        });
        let event = CategoryCompletionChanged {
            category: self.id.clone(),
            complete,
        };
        self.apply_completion(&event, surface);
        event
    }

    /// Any change of the category's checkbox forces every task complete.
    fn apply_completion(&mut self, event: &CategoryCompletionChanged, surface: &mut dyn Surface) {
        if event.category != self.id {
            return;
        }
        for task in self.tasks.iter_mut() {
            task.force_complete(surface);
        }
    }

    pub fn export(&self) -> CategoryRecord {
        CategoryRecord {
            id: self.id.clone(),
            label: self.label.clone(),
            color: self.color,
            parent: self.page_id.clone(),
            complete: self.complete,
            tasks: self.tasks.iter().map(Task::export).collect(),
        }
    }
}

impl Entity for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Detached;

    fn category() -> Category {
        Category::new(EntityId::from("page"), "Home", Rgba::PICKER_DEFAULT)
    }

    #[test]
    fn render_emits_row_then_task_group() {
        let cat = category();
        let mut requests: Vec<RenderRequest> = Vec::new();
        cat.render(&mut requests);
        assert_eq!(requests.len(), 2);
        match &requests[0] {
            RenderRequest::InsertColorRow {
                parent,
                before,
                color,
                ..
            } => {
                assert_eq!(parent, &Address::page_categories(&EntityId::from("page")));
                assert_eq!(before, &Address::add_category(&EntityId::from("page")));
                assert_eq!(*color, Rgba::PICKER_DEFAULT);
            }
            other => panic!("unexpected request {:?}", other),
        }
        match &requests[1] {
            RenderRequest::InsertGroup { parent, anchor, .. } => {
                assert_eq!(parent, &cat.address());
                assert_eq!(anchor, &Address::add_task(&cat.id));
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn tasks_keep_append_order() {
        let mut cat = category();
        for label in ["one", "two", "three"] {
            cat.add_task(label, &mut Detached);
        }
        let labels: Vec<&str> = cat.tasks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["one", "two", "three"]);
        assert!(cat.tasks.iter().all(|t| t.category_id == cat.id));
    }

    #[test]
    fn checking_category_completes_every_task() {
        let mut cat = category();
        cat.add_task("a", &mut Detached);
        cat.add_task("b", &mut Detached);

        let event = cat.toggle(true, &mut Detached);
        assert_eq!(event.category, cat.id);
        assert!(cat.complete);
        assert!(cat.tasks.iter().all(|t| t.complete));
    }

    #[test]
    fn toggling_task_leaves_category_alone() {
        let mut cat = category();
        let id = cat.add_task("a", &mut Detached).id.clone();
        cat.toggle_task(&id, true, &mut Detached).unwrap();
        assert!(!cat.complete);
        assert!(cat.tasks.get(&id).unwrap().complete);
    }

    #[test]
    fn unchecking_category_still_completes_tasks() {
        let mut cat = category();
        let id = cat.add_task("a", &mut Detached).id.clone();
        cat.toggle(false, &mut Detached);
        assert!(!cat.complete);
        assert!(cat.tasks.get(&id).unwrap().complete);
    }

    #[test]
    fn toggle_unknown_task_is_not_found() {
        let mut cat = category();
        let err = cat
            .toggle_task(&EntityId::from("nope"), true, &mut Detached)
            .unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn cascade_disables_task_checkboxes() {
        let mut cat = category();
        let id = cat.add_task("a", &mut Detached).id.clone();
        let mut requests: Vec<RenderRequest> = Vec::new();
        cat.toggle(true, &mut requests);
        assert!(requests.contains(&RenderRequest::SetChecked {
            address: Address::task(&id),
            checked: true
        }));
        assert!(requests.contains(&RenderRequest::SetEnabled {
            address: Address::task(&id),
            enabled: false
        }));
    }
}
