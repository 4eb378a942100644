use super::id::EntityId;
use super::page::{Page, PageSettings};
use super::registry::{Entity, EntityKind};
use crate::view::{Address, RenderRequest, Surface};

/// Prefix shown on a tab title while its page has unsaved additions
pub const MODIFIED_MARKER: char = '!';

/// Tab title as displayed: `!name` while modified, `name` otherwise
pub fn decorate_title(name: &str, modified: bool) -> String {
    if modified {
        format!("{}{}", MODIFIED_MARKER, name)
    } else {
        name.to_string()
    }
}

/// A workspace slot holding exactly one page
#[derive(Debug)]
pub struct Tab {
    pub id: EntityId,
    /// Display name; not unique across a workspace
    pub name: String,
    pub page: Page,
}

impl Tab {
    /// A new tab with an empty page of the same name.
    pub fn new(name: impl Into<String>, settings: PageSettings) -> Self {
        let id = EntityId::generate();
        let name = name.into();
        let page = Page::with_settings(name.clone(), id.clone(), settings);
        Tab { id, name, page }
    }

    pub fn address(&self) -> Address {
        Address::tab(&self.id)
    }

    pub fn title(&self) -> String {
        decorate_title(&self.name, self.page.is_dirty())
    }

    /// Add the tab to the strip and lay out its page.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.apply(RenderRequest::InsertTab {
            address: self.address(),
            label: self.name.clone(),
        });
        self.page.render(surface);
    }
}

impl Entity for Tab {
    const KIND: EntityKind = EntityKind::Tab;

    fn id(&self) -> &EntityId {
        &self.id
    }
}
