use indexmap::IndexMap;

use super::{Address, RenderRequest, Surface};
use crate::model::color::Rgba;
use crate::model::tab::decorate_title;

/// The kind of widget stored in a [`WidgetTree`]
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    Tab,
    Group,
    CheckRow,
    ColorRow(Rgba),
    /// A trailing "add" control that new rows are inserted before
    Anchor,
}

#[derive(Debug, Clone)]
pub struct Widget {
    pub kind: WidgetKind,
    pub label: String,
    pub checked: bool,
    pub enabled: bool,
    /// Tabs only: the unsaved-changes marker is showing
    pub modified: bool,
    pub parent: Option<Address>,
    pub children: Vec<Address>,
}

impl Widget {
    fn new(kind: WidgetKind, label: String, parent: Option<Address>) -> Self {
        Widget {
            kind,
            label,
            checked: false,
            enabled: true,
            modified: false,
            parent,
            children: Vec::new(),
        }
    }
}

/// Headless retained widget tree.
///
/// Keeps the same structure a windowed surface would: tabs at the root,
/// groups and rows nested below, and trailing anchors that stay last.
#[derive(Debug, Default)]
pub struct WidgetTree {
    widgets: IndexMap<Address, Widget>,
    tabs: Vec<Address>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &Address) -> Option<&Widget> {
        self.widgets.get(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.widgets.contains_key(address)
    }

    /// Tab addresses in strip order
    pub fn tabs(&self) -> &[Address] {
        &self.tabs
    }

    /// Tab title as displayed, including the unsaved-changes marker
    pub fn tab_title(&self, address: &Address) -> Option<String> {
        self.widgets
            .get(address)
            .map(|w| decorate_title(&w.label, w.modified))
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    fn insert(&mut self, address: Address, widget: Widget) -> bool {
        if self.widgets.contains_key(&address) {
            log::warn!("ignoring duplicate widget {}", address);
            return false;
        }
        self.widgets.insert(address, widget);
        true
    }

    /// Place `address` among `parent`'s children, before `before` when it
    /// is one of them, otherwise last.
    fn attach(&mut self, parent: &Address, before: Option<&Address>, address: Address) {
        let Some(p) = self.widgets.get_mut(parent) else {
            log::warn!("widget {} has no parent {}", address, parent);
            return;
        };
        let pos = before.and_then(|b| p.children.iter().position(|c| c == b));
        match pos {
            Some(i) => p.children.insert(i, address),
            None => p.children.push(address),
        }
    }

    fn remove_subtree(&mut self, address: &Address) {
        if let Some(widget) = self.widgets.shift_remove(address) {
            for child in widget.children {
                self.remove_subtree(&child);
            }
        }
    }

    fn with_widget(&mut self, address: &Address, f: impl FnOnce(&mut Widget)) {
        match self.widgets.get_mut(address) {
            Some(w) => f(w),
            None => log::warn!("no widget at {}", address),
        }
    }

    /// Plain-text dump of every tab, one widget per line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for tab in &self.tabs {
            self.write_widget(tab, 0, &mut out);
        }
        out
    }

    fn write_widget(&self, address: &Address, depth: usize, out: &mut String) {
        let Some(widget) = self.widgets.get(address) else {
            return;
        };
        let indent = "  ".repeat(depth);
        let check = if widget.checked { 'x' } else { ' ' };
        let child_depth = match &widget.kind {
            WidgetKind::Tab => {
                out.push_str(&format!(
                    "{}== {} ==\n",
                    indent,
                    decorate_title(&widget.label, widget.modified)
                ));
                depth + 1
            }
            WidgetKind::Group => depth,
            WidgetKind::CheckRow => {
                out.push_str(&format!("{}[{}] {}\n", indent, check, widget.label));
                depth + 1
            }
            WidgetKind::ColorRow(color) => {
                let color_str = color.to_hex().map(|h| format!(" {}", h)).unwrap_or_default();
                out.push_str(&format!(
                    "{}[{}] {}{}\n",
                    indent, check, widget.label, color_str
                ));
                depth + 1
            }
            WidgetKind::Anchor => {
                out.push_str(&format!("{}+ {}\n", indent, widget.label));
                depth + 1
            }
        };
        for child in &widget.children {
            self.write_widget(child, child_depth, out);
        }
    }
}

impl Surface for WidgetTree {
    fn apply(&mut self, request: RenderRequest) {
        match request {
            RenderRequest::InsertTab { address, label } => {
                if self.insert(address.clone(), Widget::new(WidgetKind::Tab, label, None)) {
                    self.tabs.push(address);
                }
            }
            RenderRequest::RemoveTab { address } => {
                self.remove_subtree(&address);
                self.tabs.retain(|t| t != &address);
            }
            RenderRequest::InsertGroup {
                address,
                parent,
                before,
                anchor,
                anchor_label,
            } => {
                let mut group = Widget::new(WidgetKind::Group, String::new(), Some(parent.clone()));
                group.children.push(anchor.clone());
                if !self.insert(address.clone(), group) {
                    return;
                }
                self.insert(
                    anchor,
                    Widget::new(WidgetKind::Anchor, anchor_label, Some(address.clone())),
                );
                self.attach(&parent, before.as_ref(), address);
            }
            RenderRequest::InsertCheckRow {
                address,
                parent,
                before,
                label,
                checked,
            } => {
                let mut row = Widget::new(WidgetKind::CheckRow, label, Some(parent.clone()));
                row.checked = checked;
                row.enabled = !checked;
                if self.insert(address.clone(), row) {
                    self.attach(&parent, Some(&before), address);
                }
            }
            RenderRequest::InsertColorRow {
                address,
                parent,
                before,
                label,
                color,
                checked,
            } => {
                let mut row = Widget::new(WidgetKind::ColorRow(color), label, Some(parent.clone()));
                row.checked = checked;
                row.enabled = !checked;
                if self.insert(address.clone(), row) {
                    self.attach(&parent, Some(&before), address);
                }
            }
            RenderRequest::SetChecked { address, checked } => {
                self.with_widget(&address, |w| w.checked = checked);
            }
            RenderRequest::SetEnabled { address, enabled } => {
                self.with_widget(&address, |w| w.enabled = enabled);
            }
            RenderRequest::MarkModified { address, modified } => {
                self.with_widget(&address, |w| w.modified = modified);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::id::EntityId;
    use insta::assert_snapshot;

    fn id(s: &str) -> EntityId {
        EntityId::from(s)
    }

    fn tree_with_page() -> WidgetTree {
        let mut tree = WidgetTree::new();
        tree.apply(RenderRequest::InsertTab {
            address: Address::tab(&id("t")),
            label: "Chores".into(),
        });
        tree.apply(RenderRequest::InsertGroup {
            address: Address::page_categories(&id("p")),
            parent: Address::tab(&id("t")),
            before: None,
            anchor: Address::add_category(&id("p")),
            anchor_label: "Add New Category".into(),
        });
        tree
    }

    fn check_row(entity: &str, parent: Address, before: Address, label: &str) -> RenderRequest {
        RenderRequest::InsertCheckRow {
            address: Address::task(&id(entity)),
            parent,
            before,
            label: label.into(),
            checked: false,
        }
    }

    #[test]
    fn rows_land_before_anchor_in_append_order() {
        let mut tree = tree_with_page();
        let parent = Address::page_categories(&id("p"));
        let anchor = Address::add_category(&id("p"));
        tree.apply(check_row("a", parent.clone(), anchor.clone(), "first"));
        tree.apply(check_row("b", parent.clone(), anchor.clone(), "second"));

        let children = &tree.get(&parent).unwrap().children;
        assert_eq!(
            children,
            &vec![Address::task(&id("a")), Address::task(&id("b")), anchor]
        );
    }

    #[test]
    fn duplicate_insert_is_ignored() {
        let mut tree = tree_with_page();
        let parent = Address::page_categories(&id("p"));
        let anchor = Address::add_category(&id("p"));
        tree.apply(check_row("a", parent.clone(), anchor.clone(), "first"));
        tree.apply(check_row("a", parent.clone(), anchor, "again"));
        assert_eq!(tree.get(&parent).unwrap().children.len(), 2);
        assert_eq!(tree.get(&Address::task(&id("a"))).unwrap().label, "first");
    }

    #[test]
    fn remove_tab_drops_descendants() {
        let mut tree = tree_with_page();
        tree.apply(RenderRequest::RemoveTab {
            address: Address::tab(&id("t")),
        });
        assert!(tree.is_empty());
        assert!(tree.tabs().is_empty());
    }

    #[test]
    fn modified_marker_shows_in_title() {
        let mut tree = tree_with_page();
        let tab = Address::tab(&id("t"));
        tree.apply(RenderRequest::MarkModified {
            address: tab.clone(),
            modified: true,
        });
        assert_eq!(tree.tab_title(&tab).as_deref(), Some("!Chores"));
    }

    #[test]
    fn text_dump() {
        let mut tree = tree_with_page();
        tree.apply(RenderRequest::InsertColorRow {
            address: Address::category(&id("c")),
            parent: Address::page_categories(&id("p")),
            before: Address::add_category(&id("p")),
            label: "Home".into(),
            color: Rgba::PICKER_DEFAULT,
            checked: false,
        });
        tree.apply(RenderRequest::InsertGroup {
            address: Address::category_tasks(&id("c")),
            parent: Address::category(&id("c")),
            before: None,
            anchor: Address::add_task(&id("c")),
            anchor_label: "Add New Task".into(),
        });
        tree.apply(check_row(
            "k",
            Address::category_tasks(&id("c")),
            Address::add_task(&id("c")),
            "Buy milk",
        ));
        tree.apply(RenderRequest::SetChecked {
            address: Address::task(&id("k")),
            checked: true,
        });

        assert_snapshot!(tree.render_text(), @r"
        == Chores ==
          [ ] Home #ff0000ff
            [x] Buy milk
            + Add New Task
          + Add New Category
        ");
    }
}
