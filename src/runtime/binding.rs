//! Adapters that connect each kind of binding slot to its driver calls and to its cache in the
//! [BindingState].

use std::fmt::Debug;
use std::hash::Hash;

use crate::buffer::BufferTarget;
use crate::framebuffer::FramebufferTarget;
use crate::renderbuffer::RenderbufferTarget;
use crate::runtime::driver::{BindingParameter, Driver, ObjectName, TextureUnit};
use crate::runtime::state::{BindingCache, BindingState};
use crate::texture::{ActiveTextureTarget, TextureTarget};
use crate::vertex::{IndexBufferTarget, VertexArrayTarget};

/// A kind of binding slot that is owned directly by the context.
///
/// Implemented for [BufferBinding], [FramebufferBinding], [RenderbufferBinding],
/// [VertexArrayBinding] and [ActiveTextureBinding]. The set is closed: every kind owns a cache in
/// [BindingState].
pub trait BindingKind {
    /// The slots of this kind.
    type Target: Copy + Eq + Hash + Debug;

    /// What occupies a slot.
    type Value: Copy + Eq + Hash + Debug;

    /// A human readable name, used in errors and logs.
    const NAME: &'static str;

    /// The value a cold slot is assumed to hold when the fast path is enabled.
    const UNBOUND: Self::Value;

    /// Issues the driver call that puts `value` in the `target` slot.
    fn issue<D>(driver: &D, target: Self::Target, value: Self::Value)
    where
        D: Driver + ?Sized;

    /// Asks the driver what currently occupies the `target` slot.
    fn query<D>(driver: &D, target: Self::Target) -> Self::Value
    where
        D: Driver + ?Sized;

    fn cache(state: &mut BindingState) -> &mut BindingCache<Self::Target, Self::Value>;
}

/// The value type of the container kind of a [ContainedKind].
pub type ContainerValue<K> = <<K as ContainedKind>::Container as BindingKind>::Value;

/// A kind of binding slot that is owned by a container, where the container that is currently
/// active is itself selected through a [BindingKind] slot.
///
/// Element array buffers are owned by the bound vertex array object ([IndexBufferBinding]) and
/// textures are owned by the active texture unit ([TextureBinding]). The driver only ever exposes
/// the slots of the currently active container, so every driver call for a contained slot must be
/// preceded by making its container current.
pub trait ContainedKind {
    /// The kind of the slot that selects the active container.
    type Container: BindingKind;

    /// The slots of this kind within a single container.
    type Target: Copy + Eq + Hash + Debug;

    const NAME: &'static str;

    /// The slot of the [Container](ContainedKind::Container) kind that selects the active
    /// container.
    const CONTAINER_SLOT: <Self::Container as BindingKind>::Target;

    /// Issues the driver call that binds `value` to `target` in the active container.
    fn issue<D>(driver: &D, target: Self::Target, value: Option<ObjectName>)
    where
        D: Driver + ?Sized;

    /// Asks the driver what is bound to `target` in the active container.
    fn query<D>(driver: &D, target: Self::Target) -> Option<ObjectName>
    where
        D: Driver + ?Sized;

    fn cache(
        state: &mut BindingState,
    ) -> &mut BindingCache<(ContainerValue<Self>, Self::Target), Option<ObjectName>>;
}

/// Context-level buffer slots (every [BufferTarget]).
pub enum BufferBinding {}

impl BindingKind for BufferBinding {
    type Target = BufferTarget;
    type Value = Option<ObjectName>;

    const NAME: &'static str = "buffer";
    const UNBOUND: Self::Value = None;

    fn issue<D>(driver: &D, target: BufferTarget, value: Option<ObjectName>)
    where
        D: Driver + ?Sized,
    {
        driver.bind_buffer(target.id(), value);
    }

    fn query<D>(driver: &D, target: BufferTarget) -> Option<ObjectName>
    where
        D: Driver + ?Sized,
    {
        driver.binding(target.binding_parameter())
    }

    fn cache(state: &mut BindingState) -> &mut BindingCache<BufferTarget, Option<ObjectName>> {
        &mut state.buffers
    }
}

/// The draw and read framebuffer slots.
pub enum FramebufferBinding {}

impl BindingKind for FramebufferBinding {
    type Target = FramebufferTarget;
    type Value = Option<ObjectName>;

    const NAME: &'static str = "framebuffer";
    const UNBOUND: Self::Value = None;

    fn issue<D>(driver: &D, target: FramebufferTarget, value: Option<ObjectName>)
    where
        D: Driver + ?Sized,
    {
        driver.bind_framebuffer(target.id(), value);
    }

    fn query<D>(driver: &D, target: FramebufferTarget) -> Option<ObjectName>
    where
        D: Driver + ?Sized,
    {
        driver.binding(target.binding_parameter())
    }

    fn cache(
        state: &mut BindingState,
    ) -> &mut BindingCache<FramebufferTarget, Option<ObjectName>> {
        &mut state.framebuffers
    }
}

/// The renderbuffer slot.
pub enum RenderbufferBinding {}

impl BindingKind for RenderbufferBinding {
    type Target = RenderbufferTarget;
    type Value = Option<ObjectName>;

    const NAME: &'static str = "renderbuffer";
    const UNBOUND: Self::Value = None;

    fn issue<D>(driver: &D, target: RenderbufferTarget, value: Option<ObjectName>)
    where
        D: Driver + ?Sized,
    {
        driver.bind_renderbuffer(target.id(), value);
    }

    fn query<D>(driver: &D, _target: RenderbufferTarget) -> Option<ObjectName>
    where
        D: Driver + ?Sized,
    {
        driver.binding(BindingParameter::Renderbuffer)
    }

    fn cache(
        state: &mut BindingState,
    ) -> &mut BindingCache<RenderbufferTarget, Option<ObjectName>> {
        &mut state.renderbuffers
    }
}

/// The vertex array object slot; `None` selects the default vertex array object.
pub enum VertexArrayBinding {}

impl BindingKind for VertexArrayBinding {
    type Target = VertexArrayTarget;
    type Value = Option<ObjectName>;

    const NAME: &'static str = "vertex array";
    const UNBOUND: Self::Value = None;

    fn issue<D>(driver: &D, _target: VertexArrayTarget, value: Option<ObjectName>)
    where
        D: Driver + ?Sized,
    {
        driver.bind_vertex_array(value);
    }

    fn query<D>(driver: &D, _target: VertexArrayTarget) -> Option<ObjectName>
    where
        D: Driver + ?Sized,
    {
        driver.binding(BindingParameter::VertexArray)
    }

    fn cache(
        state: &mut BindingState,
    ) -> &mut BindingCache<VertexArrayTarget, Option<ObjectName>> {
        &mut state.vertex_arrays
    }
}

/// The active texture unit selector.
pub enum ActiveTextureBinding {}

impl BindingKind for ActiveTextureBinding {
    type Target = ActiveTextureTarget;
    type Value = TextureUnit;

    const NAME: &'static str = "active texture unit";
    const UNBOUND: Self::Value = TextureUnit(0);

    fn issue<D>(driver: &D, _target: ActiveTextureTarget, value: TextureUnit)
    where
        D: Driver + ?Sized,
    {
        driver.active_texture(value);
    }

    fn query<D>(driver: &D, _target: ActiveTextureTarget) -> TextureUnit
    where
        D: Driver + ?Sized,
    {
        driver.active_texture_unit()
    }

    fn cache(state: &mut BindingState) -> &mut BindingCache<ActiveTextureTarget, TextureUnit> {
        &mut state.active_texture
    }
}

/// The element array buffer slot, owned by the bound vertex array object.
pub enum IndexBufferBinding {}

impl ContainedKind for IndexBufferBinding {
    type Container = VertexArrayBinding;
    type Target = IndexBufferTarget;

    const NAME: &'static str = "index buffer";
    const CONTAINER_SLOT: VertexArrayTarget = VertexArrayTarget::VertexArray;

    fn issue<D>(driver: &D, target: IndexBufferTarget, value: Option<ObjectName>)
    where
        D: Driver + ?Sized,
    {
        driver.bind_buffer(target.id(), value);
    }

    fn query<D>(driver: &D, _target: IndexBufferTarget) -> Option<ObjectName>
    where
        D: Driver + ?Sized,
    {
        driver.binding(BindingParameter::ElementArrayBuffer)
    }

    fn cache(
        state: &mut BindingState,
    ) -> &mut BindingCache<(Option<ObjectName>, IndexBufferTarget), Option<ObjectName>> {
        &mut state.index_buffers
    }
}

/// Texture slots, owned by the active texture unit.
pub enum TextureBinding {}

impl ContainedKind for TextureBinding {
    type Container = ActiveTextureBinding;
    type Target = TextureTarget;

    const NAME: &'static str = "texture";
    const CONTAINER_SLOT: ActiveTextureTarget = ActiveTextureTarget::ActiveTexture;

    fn issue<D>(driver: &D, target: TextureTarget, value: Option<ObjectName>)
    where
        D: Driver + ?Sized,
    {
        driver.bind_texture(target.id(), value);
    }

    fn query<D>(driver: &D, target: TextureTarget) -> Option<ObjectName>
    where
        D: Driver + ?Sized,
    {
        driver.binding(target.binding_parameter())
    }

    fn cache(
        state: &mut BindingState,
    ) -> &mut BindingCache<(TextureUnit, TextureTarget), Option<ObjectName>> {
        &mut state.textures
    }
}
