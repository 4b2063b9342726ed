//! In-process content store standing in for the host CMS.
//!
//! Content is a flat list of typed nodes (kind alias, parent, published flag,
//! string properties). Kinds come from a declarative [`schema::Schema`]. When a
//! snapshot file is configured the whole store is rewritten to it after every
//! publish.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rocket::serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod persistence;
pub mod schema;
pub mod seed;

use schema::{ContentKindDef, PropertyEditor, Schema};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Content kind '{0}' is not defined")]
    UnknownKind(String),
    #[error("Parent node {0} does not exist")]
    UnknownParent(String),
    #[error("Kind '{child}' is not allowed under '{parent}'")]
    KindNotAllowed { parent: String, child: String },
    #[error("Property '{property}' is not defined on kind '{kind}'")]
    UnknownProperty { kind: String, property: String },
    #[error("'{property}' is required on kind '{kind}'")]
    MissingProperty { kind: String, property: String },
    #[error("'{property}' on kind '{kind}' must be a whole number, got '{value}'")]
    NotNumeric {
        kind: String,
        property: String,
        value: String,
    },
    #[error("Content node {0} does not exist")]
    NodeNotFound(String),
    #[error("Snapshot I/O failed: {0}")]
    Io(String),
}

/// One stored content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ContentNode {
    pub key: String,
    pub name: String,
    pub kind: String,
    pub parent: Option<String>,
    pub published: bool,
    pub properties: BTreeMap<String, String>,
}

impl ContentNode {
    pub fn value(&self, alias: &str) -> Option<&str> {
        self.properties.get(alias).map(String::as_str)
    }

    pub fn set_value(&mut self, alias: &str, value: impl Into<String>) {
        self.properties.insert(alias.to_string(), value.into());
    }
}

/// Everything the store persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StoreSnapshot {
    pub schema_version: u32,
    pub kinds: Vec<ContentKindDef>,
    pub nodes: Vec<ContentNode>,
}

#[derive(Debug, Default)]
pub struct ContentStore {
    data: StoreSnapshot,
    snapshot_file: Option<PathBuf>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store mirrored to `path`. A missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = persistence::load_snapshot(&path)?.unwrap_or_default();
        log::info!(
            "Content store opened from {:?} ({} nodes, schema v{})",
            path,
            data.nodes.len(),
            data.schema_version
        );
        Ok(ContentStore {
            data,
            snapshot_file: Some(path),
        })
    }

    /// Mirror future publishes to `path` without reading it first.
    pub fn set_snapshot_file(&mut self, path: Option<PathBuf>) {
        self.snapshot_file = path;
    }

    pub fn snapshot_file(&self) -> Option<&Path> {
        self.snapshot_file.as_deref()
    }

    pub fn schema_version(&self) -> u32 {
        self.data.schema_version
    }

    /// Apply a schema. Returns whether anything changed.
    pub fn apply_schema(&mut self, schema: &Schema) -> bool {
        if schema.version <= self.data.schema_version {
            log::debug!(
                "Schema v{} already applied (store at v{})",
                schema.version,
                self.data.schema_version
            );
            return false;
        }
        for def in &schema.kinds {
            match self.data.kinds.iter_mut().find(|k| k.alias == def.alias) {
                Some(existing) => {
                    for p in &def.properties {
                        if !existing.has_property(&p.alias) {
                            existing.properties.push(p.clone());
                        }
                    }
                    for child in &def.allowed_children {
                        if !existing.allowed_children.contains(child) {
                            existing.allowed_children.push(child.clone());
                        }
                    }
                    existing.allowed_at_root |= def.allowed_at_root;
                }
                None => self.data.kinds.push(def.clone()),
            }
        }
        log::info!(
            "Applied content schema v{} (was v{})",
            schema.version,
            self.data.schema_version
        );
        self.data.schema_version = schema.version;
        true
    }

    pub fn kind(&self, alias: &str) -> Option<&ContentKindDef> {
        self.data.kinds.iter().find(|k| k.alias == alias)
    }

    pub fn get(&self, key: &str) -> Option<&ContentNode> {
        self.data.nodes.iter().find(|n| n.key == key)
    }

    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a ContentNode> + 'a {
        self.data.nodes.iter().filter(move |n| n.kind == kind)
    }

    pub fn root_of_kind(&self, kind: &str) -> Option<&ContentNode> {
        self.data
            .nodes
            .iter()
            .find(|n| n.kind == kind && n.parent.is_none())
    }

    /// Create an unsaved node of `kind` under `parent` (or at the root).
    pub fn create(
        &self,
        name: &str,
        parent: Option<&str>,
        kind: &str,
    ) -> Result<ContentNode, StoreError> {
        let def = self
            .kind(kind)
            .ok_or_else(|| StoreError::UnknownKind(kind.to_string()))?;
        match parent {
            Some(parent_key) => {
                let parent_node = self
                    .get(parent_key)
                    .ok_or_else(|| StoreError::UnknownParent(parent_key.to_string()))?;
                let allowed = self
                    .kind(&parent_node.kind)
                    .is_some_and(|p| p.allowed_children.iter().any(|c| c == kind));
                if !allowed {
                    return Err(StoreError::KindNotAllowed {
                        parent: parent_node.kind.clone(),
                        child: kind.to_string(),
                    });
                }
            }
            None if !def.allowed_at_root => {
                return Err(StoreError::KindNotAllowed {
                    parent: "<root>".to_string(),
                    child: kind.to_string(),
                });
            }
            None => {}
        }
        Ok(ContentNode {
            key: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            parent: parent.map(str::to_string),
            published: false,
            properties: BTreeMap::new(),
        })
    }

    /// Insert or replace a node. Every property must be declared on its kind,
    /// mandatory ones must be non-blank and numeric ones must hold an integer.
    pub fn save(&mut self, node: ContentNode) -> Result<(), StoreError> {
        let def = self
            .kind(&node.kind)
            .ok_or_else(|| StoreError::UnknownKind(node.kind.clone()))?;
        if let Some(bad) = node.properties.keys().find(|p| !def.has_property(p)) {
            return Err(StoreError::UnknownProperty {
                kind: node.kind.clone(),
                property: bad.clone(),
            });
        }
        for prop in &def.properties {
            let value = node.value(&prop.alias).map(str::trim).unwrap_or_default();
            if value.is_empty() {
                if prop.mandatory {
                    return Err(StoreError::MissingProperty {
                        kind: def.name.clone(),
                        property: prop.name.clone(),
                    });
                }
                continue;
            }
            if prop.editor == PropertyEditor::Numeric && value.parse::<i64>().is_err() {
                return Err(StoreError::NotNumeric {
                    kind: def.name.clone(),
                    property: prop.name.clone(),
                    value: value.to_string(),
                });
            }
        }
        match self.data.nodes.iter_mut().find(|n| n.key == node.key) {
            Some(existing) => *existing = node,
            None => self.data.nodes.push(node),
        }
        Ok(())
    }

    /// Mark a saved node published and flush the snapshot file, if any. When the
    /// flush fails the node is left unpublished.
    pub fn publish(&mut self, key: &str) -> Result<(), StoreError> {
        let node = self
            .data
            .nodes
            .iter_mut()
            .find(|n| n.key == key)
            .ok_or_else(|| StoreError::NodeNotFound(key.to_string()))?;
        let was_published = std::mem::replace(&mut node.published, true);
        if let Err(e) = self.flush() {
            if let Some(node) = self.data.nodes.iter_mut().find(|n| n.key == key) {
                node.published = was_published;
            }
            return Err(e);
        }
        Ok(())
    }

    /// Drop a node from memory. The snapshot file is rewritten on the next flush.
    pub fn remove(&mut self, key: &str) -> Option<ContentNode> {
        let index = self.data.nodes.iter().position(|n| n.key == key)?;
        Some(self.data.nodes.remove(index))
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        match &self.snapshot_file {
            Some(path) => persistence::write_snapshot(path, &self.data),
            None => Ok(()),
        }
    }

    /// Create the root node of `kind` unless one exists; returns its key.
    pub fn ensure_root(&mut self, kind: &str, name: &str) -> Result<String, StoreError> {
        if let Some(existing) = self.root_of_kind(kind) {
            return Ok(existing.key.clone());
        }
        let mut node = self.create(name, None, kind)?;
        node.set_value("pageTitle", name);
        let key = node.key.clone();
        self.save(node)?;
        self.publish(&key)?;
        Ok(key)
    }
}
