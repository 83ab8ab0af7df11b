//! The binding state a [Connection](crate::runtime::Connection) keeps for its driver context.

use std::fmt::Debug;
use std::hash::Hash;

use fnv::FnvHashMap;

use crate::buffer::BufferTarget;
use crate::framebuffer::FramebufferTarget;
use crate::renderbuffer::RenderbufferTarget;
use crate::runtime::driver::{ObjectName, TextureUnit};
use crate::texture::{ActiveTextureTarget, TextureTarget};
use crate::vertex::{IndexBufferTarget, VertexArrayTarget};

/// Records, per key, the value that currently occupies a binding slot.
///
/// An entry is either *cold* (absent: nothing is known about the slot) or *warm* (present: the
/// value is what the driver has bound). A warm entry is authoritative; it is only ever written
/// after the driver accepted a bind, or after the driver was queried.
///
/// Entries are only written by the binders in [crate::runtime]; the public surface of this type is
/// read-only.
#[derive(Clone, Debug)]
pub struct BindingCache<K, V> {
    entries: FnvHashMap<K, V>,
}

impl<K, V> BindingCache<K, V>
where
    K: Copy + Eq + Hash + Debug,
    V: Copy + Eq + Debug,
{
    pub(crate) fn new() -> Self {
        BindingCache {
            entries: FnvHashMap::default(),
        }
    }

    /// Returns the value recorded for `key`, or `None` if the entry is cold.
    pub fn peek(&self, key: K) -> Option<V> {
        self.entries.get(&key).copied()
    }

    pub fn is_warm(&self, key: K) -> bool {
        self.entries.contains_key(&key)
    }

    /// The number of warm entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value for `key`, warming a cold entry first.
    ///
    /// A cold entry is warmed with the result of `query`, unless `fast_path` is set, in which case
    /// it is warmed with `unbound` without calling `query`.
    pub(crate) fn get<F>(&mut self, key: K, fast_path: bool, unbound: V, query: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.entries.get(&key) {
            return *value;
        }

        let value = if fast_path { unbound } else { query() };

        self.entries.insert(key, value);

        value
    }

    /// Overwrites the entry for `key`. Never talks to the driver.
    pub(crate) fn set(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    /// Turns the entry for `key` cold again.
    pub(crate) fn cool(&mut self, key: K) {
        self.entries.remove(&key);
    }

    /// Turns every entry for which `f` returns `true` cold.
    pub(crate) fn cool_where<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.entries.retain(|key, value| !f(key, value));
    }

    /// Turns every entry cold.
    pub(crate) fn invalidate(&mut self) {
        self.entries.clear();
    }
}

/// All binding caches of a single driver context.
///
/// Element array buffer bindings are keyed by the vertex array object that owns them and texture
/// bindings are keyed by the texture unit that owns them; all other bindings are keyed by their
/// target alone.
#[derive(Clone, Debug)]
pub struct BindingState {
    pub(crate) buffers: BindingCache<BufferTarget, Option<ObjectName>>,
    pub(crate) framebuffers: BindingCache<FramebufferTarget, Option<ObjectName>>,
    pub(crate) renderbuffers: BindingCache<RenderbufferTarget, Option<ObjectName>>,
    pub(crate) vertex_arrays: BindingCache<VertexArrayTarget, Option<ObjectName>>,
    pub(crate) active_texture: BindingCache<ActiveTextureTarget, TextureUnit>,
    pub(crate) index_buffers:
        BindingCache<(Option<ObjectName>, IndexBufferTarget), Option<ObjectName>>,
    pub(crate) textures: BindingCache<(TextureUnit, TextureTarget), Option<ObjectName>>,
}

impl BindingState {
    /// Creates a state in which every entry is cold.
    pub fn new() -> Self {
        BindingState {
            buffers: BindingCache::new(),
            framebuffers: BindingCache::new(),
            renderbuffers: BindingCache::new(),
            vertex_arrays: BindingCache::new(),
            active_texture: BindingCache::new(),
            index_buffers: BindingCache::new(),
            textures: BindingCache::new(),
        }
    }

    pub fn buffers(&self) -> &BindingCache<BufferTarget, Option<ObjectName>> {
        &self.buffers
    }

    pub fn framebuffers(&self) -> &BindingCache<FramebufferTarget, Option<ObjectName>> {
        &self.framebuffers
    }

    pub fn renderbuffers(&self) -> &BindingCache<RenderbufferTarget, Option<ObjectName>> {
        &self.renderbuffers
    }

    pub fn vertex_arrays(&self) -> &BindingCache<VertexArrayTarget, Option<ObjectName>> {
        &self.vertex_arrays
    }

    pub fn active_texture(&self) -> &BindingCache<ActiveTextureTarget, TextureUnit> {
        &self.active_texture
    }

    pub fn index_buffers(
        &self,
    ) -> &BindingCache<(Option<ObjectName>, IndexBufferTarget), Option<ObjectName>> {
        &self.index_buffers
    }

    pub fn textures(&self) -> &BindingCache<(TextureUnit, TextureTarget), Option<ObjectName>> {
        &self.textures
    }

    /// Turns every entry cold, e.g. after the context was lost.
    pub(crate) fn invalidate(&mut self) {
        self.buffers.invalidate();
        self.framebuffers.invalidate();
        self.renderbuffers.invalidate();
        self.vertex_arrays.invalidate();
        self.active_texture.invalidate();
        self.index_buffers.invalidate();
        self.textures.invalidate();
    }

    /// Turns every entry that refers to `name` cold, including the element array bindings owned
    /// by `name` if it was a vertex array object.
    pub(crate) fn forget(&mut self, name: ObjectName) {
        let name = Some(name);

        self.buffers.cool_where(|_, value| *value == name);
        self.framebuffers.cool_where(|_, value| *value == name);
        self.renderbuffers.cool_where(|_, value| *value == name);
        self.vertex_arrays.cool_where(|_, value| *value == name);
        self.index_buffers
            .cool_where(|(container, _), value| *container == name || *value == name);
        self.textures.cool_where(|_, value| *value == name);
    }
}

impl Default for BindingState {
    fn default() -> Self {
        BindingState::new()
    }
}
