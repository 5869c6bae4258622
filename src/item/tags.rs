use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Separator between compound names in a tag path (`outer..inner..leaf`).
pub const PATH_SEPARATOR: &str = "..";

/// Root component holding custom tags on component-based hosts.
pub const CUSTOM_DATA: &str = "minecraft:custom_data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Int(i32),
    String(String),
    Compound(Compound),
}

/// A named-tag map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Compound(BTreeMap<String, Tag>);

/// Read access to one level of a tag tree.
pub trait TagReader {
    fn has_tag(&self, key: &str) -> bool;
    fn string(&self, key: &str) -> Option<&str>;
    fn int(&self, key: &str) -> Option<i32>;
    fn compound(&self, key: &str) -> Option<&dyn TagReader>;
}

fn into_compound(slot: &mut Tag) -> &mut Compound {
    match slot {
        Tag::Compound(inner) => inner,
        other => {
            *other = Tag::Compound(Compound::new());
            into_compound(other)
        }
    }
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, tag: Tag) {
        self.0.insert(key.into(), tag);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Child compound under `key`, replacing whatever non-compound was there.
    pub fn compound_mut(&mut self, key: &str) -> &mut Compound {
        let slot = self
            .0
            .entry(key.to_string())
            .or_insert_with(|| Tag::Compound(Compound::new()));
        into_compound(slot)
    }

    /// Writes `tag` at a `..`-separated path, creating intermediate compounds.
    pub fn set_path(&mut self, path: &str, tag: Tag) {
        let mut segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        let Some(leaf) = segments.pop() else {
            return;
        };
        let mut node = self;
        for segment in segments {
            node = node.compound_mut(segment);
        }
        node.insert(leaf, tag);
    }
}

impl TagReader for Compound {
    fn has_tag(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    fn string(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    fn int(&self, key: &str) -> Option<i32> {
        match self.0.get(key)? {
            Tag::Int(n) => Some(*n),
            _ => None,
        }
    }

    fn compound(&self, key: &str) -> Option<&dyn TagReader> {
        match self.0.get(key)? {
            Tag::Compound(c) => Some(c as &dyn TagReader),
            _ => None,
        }
    }
}

fn walk<'a, 'p>(root: &'a dyn TagReader, path: &'p str) -> Option<(&'a dyn TagReader, &'p str)> {
    let mut segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    let leaf = segments.pop()?;
    let mut node = root;
    for segment in segments {
        node = node.compound(segment)?;
    }
    Some((node, leaf))
}

/// String at `path`, if every intermediate compound and the leaf exist.
pub fn path_string<'a>(root: &'a dyn TagReader, path: &str) -> Option<&'a str> {
    let (node, leaf) = walk(root, path)?;
    if !node.has_tag(leaf) {
        return None;
    }
    node.string(leaf)
}

/// Integer at `path`, if every intermediate compound and the leaf exist.
pub fn path_int(root: &dyn TagReader, path: &str) -> Option<i32> {
    let (node, leaf) = walk(root, path)?;
    if !node.has_tag(leaf) {
        return None;
    }
    node.int(leaf)
}
