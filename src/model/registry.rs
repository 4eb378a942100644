use std::fmt;

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::EntityId;
use super::tab::Tab;
use super::task::Task;

/// The kinds of node in a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Tab,
    Page,
    Category,
    Task,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Tab => write!(f, "tab"),
            EntityKind::Page => write!(f, "page"),
            EntityKind::Category => write!(f, "category"),
            EntityKind::Task => write!(f, "task"),
        }
    }
}

/// Error type for model lookups and registry mutations
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("expected a {expected}, got a {found}")]
    TypeMismatch {
        expected: EntityKind,
        found: EntityKind,
    },
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: EntityId },
}

/// What `remove` does when the id is not registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// A miss is a no-op
    #[default]
    Ignore,
    /// A miss is a `NotFound` error
    Strict,
}

/// Something a registry can index by id
pub trait Entity: Sized {
    const KIND: EntityKind;
    fn id(&self) -> &EntityId;
}

/// A node of unknown kind, e.g. handed over by a view callback
#[derive(Debug)]
pub enum Node {
    Tab(Tab),
    Category(Category),
    Task(Task),
}

impl Node {
    pub fn kind(&self) -> EntityKind {
        match self {
            Node::Tab(_) => EntityKind::Tab,
            Node::Category(_) => EntityKind::Category,
            Node::Task(_) => EntityKind::Task,
        }
    }
}

/// Ordered, id-indexed collection of one entity kind.
///
/// Lookups are linear scans; registries are as small as what a person types.
#[derive(Debug)]
pub struct Registry<T> {
    items: Vec<T>,
    policy: RemovalPolicy,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Registry {
            items: Vec::new(),
            policy: RemovalPolicy::default(),
        }
    }
}

impl<T: Entity> Registry<T>
where
    T: TryFrom<Node, Error = ModelError>,
{
    /// Add a node whose kind is only known at runtime.
    pub fn try_add(&mut self, node: Node) -> Result<&mut T, ModelError> {
        let entity = T::try_from(node)?;
        Ok(self.add(entity))
    }
}

impl<T: Entity> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RemovalPolicy) -> Self {
        Registry {
            items: Vec::new(),
            policy,
        }
    }

    /// Append an entity, returning a handle to it
    pub fn add(&mut self, entity: T) -> &mut T {
        self.items.push(entity);
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut T> {
        self.items.iter_mut().find(|e| e.id() == id)
    }

    /// Like `get`, but a miss is a `NotFound` error
    pub fn require(&self, id: &EntityId) -> Result<&T, ModelError> {
        self.get(id).ok_or_else(|| not_found::<T>(id))
    }

    pub fn require_mut(&mut self, id: &EntityId) -> Result<&mut T, ModelError> {
        self.get_mut(id).ok_or_else(|| not_found::<T>(id))
    }

    pub fn position(&self, id: &EntityId) -> Option<usize> {
        self.items.iter().position(|e| e.id() == id)
    }

    /// Remove by id, applying the registry's removal policy on a miss.
    pub fn remove(&mut self, id: &EntityId) -> Result<Option<T>, ModelError> {
        match self.position(id) {
            Some(idx) => Ok(Some(self.items.remove(idx))),
            None => match self.policy {
                RemovalPolicy::Ignore => Ok(None),
                RemovalPolicy::Strict => Err(not_found::<T>(id)),
            },
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn not_found<T: Entity>(id: &EntityId) -> ModelError {
    ModelError::NotFound {
        kind: T::KIND,
        id: id.clone(),
    }
}

pub type WorkspaceRegistry = Registry<Tab>;
pub type CategoryRegistry = Registry<Category>;
pub type TaskRegistry = Registry<Task>;

impl WorkspaceRegistry {
    /// First tab with this display name. Names are not unique.
    pub fn find_by_name(&self, name: &str) -> Option<&Tab> {
        self.items.iter().find(|t| t.name == name)
    }

    /// `(id, title)` pairs for a save-target selector, keyed by id so tabs
    /// sharing a name stay distinguishable.
    pub fn save_targets(&self) -> Vec<(EntityId, String)> {
        self.items
            .iter()
            .map(|t| (t.id.clone(), t.title()))
            .collect()
    }
}

macro_rules! node_conversion {
    ($ty:ident) => {
        impl TryFrom<Node> for $ty {
            type Error = ModelError;

            fn try_from(node: Node) -> Result<Self, Self::Error> {
                match node {
                    Node::$ty(entity) => Ok(entity),
                    other => Err(ModelError::TypeMismatch {
                        expected: EntityKind::$ty,
                        found: other.kind(),
                    }),
                }
            }
        }
    };
}

node_conversion!(Tab);
node_conversion!(Category);
node_conversion!(Task);
