//! Connections to driver contexts, and the binding state they keep.
//!
//! A [Connection] wraps a [Driver] and records which object occupies each binding slot of the
//! driver's context, so that binding an object that is already bound costs nothing. Slots are
//! accessed through a [Binder] (for slots owned by the context) or a [ContainerBinder] (for slots
//! owned by a vertex array object or a texture unit).

mod binder;
pub use self::binder::{Binder, ScopedBinding};

mod binding;
pub use self::binding::{
    ActiveTextureBinding, BindingKind, BufferBinding, ContainedKind, ContainerValue,
    FramebufferBinding, IndexBufferBinding, RenderbufferBinding, TextureBinding,
    VertexArrayBinding,
};

mod connection;
pub use self::connection::Connection;

mod container_binder;
pub use self::container_binder::ContainerBinder;

mod context_options;
pub use self::context_options::{ContextOptions, ContextOptionsBuilder, PowerPreference};

mod driver;
pub use self::driver::{BindingParameter, Driver, ErrorCode, ObjectKind, ObjectName, TextureUnit};

mod error;
pub use self::error::{BindError, CreateError, RejectedBind};

pub mod state;
pub use self::state::{BindingCache, BindingState};

mod web_gl;
pub use self::web_gl::{ContextCreationError, WebGl2Driver};

#[cfg(test)]
pub(crate) mod mock;
