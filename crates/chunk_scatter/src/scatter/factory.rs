//! Renderable-instance factory seam.
//!
//! The streamer never looks inside an instance: it asks an [`InstanceFactory`] to
//! create one for a [`ContentKind`] and a transform, keeps the returned opaque
//! [`InstanceHandle`], and hands it back for destruction on unload.
//!
//! [`MemoryFactory`] is an in-memory implementation that records what would be on
//! screen. It can be restricted to known prefabs or a fixed capacity to exercise the
//! per-placement failure path.
use std::collections::{HashMap, HashSet};

use glam::{Quat, Vec3};

use crate::error::{Error, Result};

/// Opaque handle to a created instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceHandle(pub u64);

/// What the factory is asked to create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind<'a> {
    /// A ground tile.
    Tile { prefab: &'a str },
    /// A decoration of the given category.
    Decoration { category: &'a str, prefab: &'a str },
}

impl<'a> ContentKind<'a> {
    /// Content key the instance is built from.
    pub fn prefab(&self) -> &'a str {
        match *self {
            ContentKind::Tile { prefab } | ContentKind::Decoration { prefab, .. } => prefab,
        }
    }

    /// Category for decorations.
    pub fn category(&self) -> Option<&'a str> {
        match *self {
            ContentKind::Tile { .. } => None,
            ContentKind::Decoration { category, .. } => Some(category),
        }
    }

    pub fn is_tile(&self) -> bool {
        matches!(self, ContentKind::Tile { .. })
    }
}

/// World transform of an instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl InstanceTransform {
    /// Unrotated, unscaled transform at `position`.
    pub fn from_translation(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Sets a uniform scale.
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}

/// Creates and destroys visual instances on behalf of the streamer.
pub trait InstanceFactory {
    /// Creates an instance; failures are reported as [`Error::ResourceCreation`].
    fn create(&mut self, kind: ContentKind<'_>, transform: &InstanceTransform)
        -> Result<InstanceHandle>;

    /// Destroys an instance. Unknown handles are reported but never fatal to callers.
    fn destroy(&mut self, handle: InstanceHandle) -> Result<()>;

    /// Assigns a draw-order hint; larger values draw in front.
    fn set_depth_hint(&mut self, handle: InstanceHandle, hint: i32);
}

/// Owned form of [`ContentKind`] stored by [`MemoryFactory`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemoryContent {
    Tile,
    Decoration { category: String },
}

/// An instance held by [`MemoryFactory`].
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryInstance {
    pub content: MemoryContent,
    pub prefab: String,
    pub transform: InstanceTransform,
    pub depth_hint: Option<i32>,
}

impl MemoryInstance {
    pub fn is_tile(&self) -> bool {
        matches!(self.content, MemoryContent::Tile)
    }

    /// Category for decorations.
    pub fn category(&self) -> Option<&str> {
        match &self.content {
            MemoryContent::Tile => None,
            MemoryContent::Decoration { category } => Some(category),
        }
    }
}

/// In-memory [`InstanceFactory`].
#[derive(Debug, Default)]
pub struct MemoryFactory {
    next_id: u64,
    instances: HashMap<InstanceHandle, MemoryInstance>,
    known_prefabs: Option<HashSet<String>>,
    capacity: Option<usize>,
    created_total: usize,
    destroyed_total: usize,
}

impl MemoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the given prefabs can be created; others fail as unrecognized.
    pub fn with_known_prefabs<I, S>(mut self, prefabs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_prefabs = Some(prefabs.into_iter().map(Into::into).collect());
        self
    }

    /// At most `capacity` live instances; further creations fail as exhausted.
    pub fn with_capacity_limit(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, handle: InstanceHandle) -> Option<&MemoryInstance> {
        self.instances.get(&handle)
    }

    /// Live instances in no particular order.
    pub fn instances(&self) -> impl Iterator<Item = (InstanceHandle, &MemoryInstance)> {
        self.instances.iter().map(|(h, i)| (*h, i))
    }

    /// Live tile count.
    pub fn tile_count(&self) -> usize {
        self.instances.values().filter(|i| i.is_tile()).count()
    }

    /// Live decoration count.
    pub fn decoration_count(&self) -> usize {
        self.instances.values().filter(|i| !i.is_tile()).count()
    }

    /// Instances created since construction.
    pub fn created_total(&self) -> usize {
        self.created_total
    }

    /// Instances destroyed since construction.
    pub fn destroyed_total(&self) -> usize {
        self.destroyed_total
    }
}

impl InstanceFactory for MemoryFactory {
    fn create(
        &mut self,
        kind: ContentKind<'_>,
        transform: &InstanceTransform,
    ) -> Result<InstanceHandle> {
        let prefab = kind.prefab();
        if let Some(known) = &self.known_prefabs {
            if !known.contains(prefab) {
                return Err(Error::resource(prefab, "unrecognized prefab"));
            }
        }
        if let Some(capacity) = self.capacity {
            if self.instances.len() >= capacity {
                return Err(Error::resource(prefab, "instance capacity exhausted"));
            }
        }

        let handle = InstanceHandle(self.next_id);
        self.next_id += 1;
        let content = match kind {
            ContentKind::Tile { .. } => MemoryContent::Tile,
            ContentKind::Decoration { category, .. } => MemoryContent::Decoration {
                category: category.to_owned(),
            },
        };
        self.instances.insert(
            handle,
            MemoryInstance {
                content,
                prefab: prefab.to_owned(),
                transform: *transform,
                depth_hint: None,
            },
        );
        self.created_total += 1;
        Ok(handle)
    }

    fn destroy(&mut self, handle: InstanceHandle) -> Result<()> {
        match self.instances.remove(&handle) {
            Some(_) => {
                self.destroyed_total += 1;
                Ok(())
            }
            None => Err(Error::UnknownInstance(handle)),
        }
    }

    fn set_depth_hint(&mut self, handle: InstanceHandle, hint: i32) {
        if let Some(instance) = self.instances.get_mut(&handle) {
            instance.depth_hint = Some(hint);
        }
    }
}
