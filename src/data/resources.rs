//! Resource catalog
//!
//! Bosses list the textures, sprites, animations and particle systems they
//! draw with. Construction fails immediately when one is not registered,
//! rather than on the first frame that needs it.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BossError;

/// Category of an external resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Texture,
    Sprite,
    Animation,
    ParticleSystem,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Texture => "texture",
            ResourceKind::Sprite => "sprite",
            ResourceKind::Animation => "animation",
            ResourceKind::ParticleSystem => "particle system",
        };
        write!(f, "{}", name)
    }
}

/// A resource a boss needs, by kind and name
pub type ResourceRef = (ResourceKind, &'static str);

/// Lookup of registered resources
pub trait ResourceCatalog {
    fn contains(&self, kind: ResourceKind, name: &str) -> bool;
}

/// Fail on the first required resource the catalog lacks
pub fn require_resources(
    catalog: &dyn ResourceCatalog,
    required: &[ResourceRef],
) -> Result<(), BossError> {
    for &(kind, name) in required {
        if !catalog.contains(kind, name) {
            log::error!("Missing {} resource `{}`", kind, name);
            return Err(BossError::MissingResource {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// In-memory resource catalog
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    entries: HashSet<(ResourceKind, String)>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog containing exactly the given resources
    pub fn from_refs(refs: &[ResourceRef]) -> Self {
        let mut set = Self::new();
        for &(kind, name) in refs {
            set.insert(kind, name);
        }
        set
    }

    pub fn insert(&mut self, kind: ResourceKind, name: impl Into<String>) {
        self.entries.insert((kind, name.into()));
    }

    pub fn with(mut self, kind: ResourceKind, name: impl Into<String>) -> Self {
        self.insert(kind, name);
        self
    }

    pub fn remove(&mut self, kind: ResourceKind, name: &str) -> bool {
        self.entries.remove(&(kind, name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceCatalog for ResourceSet {
    fn contains(&self, kind: ResourceKind, name: &str) -> bool {
        self.entries.contains(&(kind, name.to_string()))
    }
}
