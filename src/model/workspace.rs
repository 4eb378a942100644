use super::id::EntityId;
use super::page::PageSettings;
use super::registry::{EntityKind, ModelError, WorkspaceRegistry};
use super::tab::Tab;
use crate::view::{RenderRequest, Surface};

/// The set of open tabs, in strip order
#[derive(Debug, Default)]
pub struct Workspace {
    pub tabs: WorkspaceRegistry,
    settings: PageSettings,
}

impl Workspace {
    pub fn new(settings: PageSettings) -> Self {
        Workspace {
            tabs: WorkspaceRegistry::with_policy(settings.removal),
            settings,
        }
    }

    /// Open a tab with an empty page and lay it out.
    pub fn new_tab(&mut self, name: impl Into<String>, surface: &mut dyn Surface) -> EntityId {
        let tab = self.tabs.add(Tab::new(name, self.settings));
        log::debug!("tab {} opened for page {}", tab.id, tab.page.id);
        tab.render(surface);
        tab.id.clone()
    }

    /// Discard a tab and its page. A miss follows the removal policy.
    pub fn close_tab(
        &mut self,
        id: &EntityId,
        surface: &mut dyn Surface,
    ) -> Result<Option<Tab>, ModelError> {
        let removed = self.tabs.remove(id)?;
        if let Some(tab) = &removed {
            surface.apply(RenderRequest::RemoveTab {
                address: tab.address(),
            });
        }
        Ok(removed)
    }

    pub fn tab(&self, id: &EntityId) -> Result<&Tab, ModelError> {
        self.tabs.require(id)
    }

    pub fn tab_mut(&mut self, id: &EntityId) -> Result<&mut Tab, ModelError> {
        self.tabs.require_mut(id)
    }

    /// Position of a tab in the strip
    pub fn position(&self, id: &EntityId) -> Option<usize> {
        self.tabs.position(id)
    }

    pub fn tab_with_page_mut(&mut self, page_id: &EntityId) -> Result<&mut Tab, ModelError> {
        self.tabs
            .iter_mut()
            .find(|t| &t.page.id == page_id)
            .ok_or_else(|| ModelError::NotFound {
                kind: EntityKind::Page,
                id: page_id.clone(),
            })
    }

    pub fn tab_with_category_mut(&mut self, category_id: &EntityId) -> Result<&mut Tab, ModelError> {
        self.tabs
            .iter_mut()
            .find(|t| t.page.categories.get(category_id).is_some())
            .ok_or_else(|| ModelError::NotFound {
                kind: EntityKind::Category,
                id: category_id.clone(),
            })
    }

    pub fn tab_with_task_mut(&mut self, task_id: &EntityId) -> Result<&mut Tab, ModelError> {
        self.tabs
            .iter_mut()
            .find(|t| t.page.contains_task(task_id))
            .ok_or_else(|| ModelError::NotFound {
                kind: EntityKind::Task,
                id: task_id.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::color::Rgba;
    use crate::model::registry::RemovalPolicy;
    use crate::view::{Address, Detached, WidgetTree};

    #[test]
    fn tabs_keep_strip_order() {
        let mut ws = Workspace::default();
        let a = ws.new_tab("A", &mut Detached);
        let b = ws.new_tab("B", &mut Detached);
        assert_eq!(ws.position(&a), Some(0));
        assert_eq!(ws.position(&b), Some(1));
    }

    #[test]
    fn new_tab_renders_tab_and_anchor() {
        let mut ws = Workspace::default();
        let mut tree = WidgetTree::new();
        let id = ws.new_tab("Chores", &mut tree);
        let page_id = ws.tab(&id).unwrap().page.id.clone();
        assert!(tree.contains(&Address::tab(&id)));
        assert!(tree.contains(&Address::add_category(&page_id)));
    }

    #[test]
    fn close_tab_removes_widgets() {
        let mut ws = Workspace::default();
        let mut tree = WidgetTree::new();
        let id = ws.new_tab("Chores", &mut tree);
        let closed = ws.close_tab(&id, &mut tree).unwrap();
        assert!(closed.is_some());
        assert!(ws.tabs.is_empty());
        assert!(tree.is_empty());
    }

    #[test]
    fn close_unknown_tab_follows_policy() {
        let mut lenient = Workspace::default();
        assert!(lenient
            .close_tab(&EntityId::from("nope"), &mut Detached)
            .unwrap()
            .is_none());

        let mut strict = Workspace::new(PageSettings {
            removal: RemovalPolicy::Strict,
            ..PageSettings::default()
        });
        assert!(strict.close_tab(&EntityId::from("nope"), &mut Detached).is_err());
    }

    #[test]
    fn routes_by_contained_entity() {
        let mut ws = Workspace::default();
        ws.new_tab("Other", &mut Detached);
        let id = ws.new_tab("Chores", &mut Detached);
        let page = &mut ws.tab_mut(&id).unwrap().page;
        let cat = page.add_category("Home", Rgba::UNSET, &mut Detached);
        let task = page.add_task(&cat, "Buy milk", &mut Detached).unwrap();

        assert_eq!(ws.tab_with_category_mut(&cat).unwrap().id, id);
        assert_eq!(ws.tab_with_task_mut(&task).unwrap().id, id);
        assert!(ws.tab_with_task_mut(&cat).is_err());
    }
}
