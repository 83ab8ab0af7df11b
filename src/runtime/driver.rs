use std::fmt;
use std::num::NonZeroU32;

use web_sys::WebGl2RenderingContext as Gl;

use crate::buffer::{BufferData, BufferUsage};

/// The name of an object that lives on the driver side (a buffer, texture, framebuffer,
/// renderbuffer or vertex array object).
///
/// Names are compared by identity: two names are equal only if they refer to the same driver
/// object. A binding slot that holds no object is represented by `None` wherever an
/// `Option<ObjectName>` is used.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ObjectName(NonZeroU32);

impl ObjectName {
    /// Returns the [ObjectName] for the raw `name`, or `None` if `name` is `0` (which the driver
    /// reserves for "no object").
    pub fn new(name: u32) -> Option<Self> {
        NonZeroU32::new(name).map(ObjectName)
    }

    /// The raw name.
    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A texture unit, as selected by `activeTexture`.
///
/// Texture bindings are owned by texture units: binding a texture binds it to the currently active
/// unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct TextureUnit(pub u32);

impl TextureUnit {
    pub(crate) fn id(&self) -> u32 {
        Gl::TEXTURE0 + self.0
    }
}

/// Enumerates the kinds of driver objects.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ObjectKind {
    Buffer,
    Texture,
    Framebuffer,
    Renderbuffer,
    VertexArray,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ObjectKind::Buffer => "buffer",
            ObjectKind::Texture => "texture",
            ObjectKind::Framebuffer => "framebuffer",
            ObjectKind::Renderbuffer => "renderbuffer",
            ObjectKind::VertexArray => "vertex array",
        };

        f.write_str(name)
    }
}

/// The read-only state queries that report which object currently occupies a binding slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BindingParameter {
    ArrayBuffer,
    ElementArrayBuffer,
    CopyReadBuffer,
    CopyWriteBuffer,
    PixelPackBuffer,
    PixelUnpackBuffer,
    TransformFeedbackBuffer,
    UniformBuffer,
    Texture2D,
    TextureCubeMap,
    Texture3D,
    Texture2DArray,
    DrawFramebuffer,
    ReadFramebuffer,
    Renderbuffer,
    VertexArray,
}

impl BindingParameter {
    pub fn id(&self) -> u32 {
        match self {
            BindingParameter::ArrayBuffer => Gl::ARRAY_BUFFER_BINDING,
            BindingParameter::ElementArrayBuffer => Gl::ELEMENT_ARRAY_BUFFER_BINDING,
            BindingParameter::CopyReadBuffer => Gl::COPY_READ_BUFFER_BINDING,
            BindingParameter::CopyWriteBuffer => Gl::COPY_WRITE_BUFFER_BINDING,
            BindingParameter::PixelPackBuffer => Gl::PIXEL_PACK_BUFFER_BINDING,
            BindingParameter::PixelUnpackBuffer => Gl::PIXEL_UNPACK_BUFFER_BINDING,
            BindingParameter::TransformFeedbackBuffer => Gl::TRANSFORM_FEEDBACK_BUFFER_BINDING,
            BindingParameter::UniformBuffer => Gl::UNIFORM_BUFFER_BINDING,
            BindingParameter::Texture2D => Gl::TEXTURE_BINDING_2D,
            BindingParameter::TextureCubeMap => Gl::TEXTURE_BINDING_CUBE_MAP,
            BindingParameter::Texture3D => Gl::TEXTURE_BINDING_3D,
            BindingParameter::Texture2DArray => Gl::TEXTURE_BINDING_2D_ARRAY,
            BindingParameter::DrawFramebuffer => Gl::DRAW_FRAMEBUFFER_BINDING,
            BindingParameter::ReadFramebuffer => Gl::READ_FRAMEBUFFER_BINDING,
            BindingParameter::Renderbuffer => Gl::RENDERBUFFER_BINDING,
            BindingParameter::VertexArray => Gl::VERTEX_ARRAY_BINDING,
        }
    }
}

/// Error codes the driver may report after a call.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorCode {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    InvalidFramebufferOperation,
    OutOfMemory,
    ContextLost,
    Unknown(u32),
}

impl ErrorCode {
    /// Decodes the value returned by `getError`; returns `None` for `NO_ERROR`.
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            Gl::NO_ERROR => None,
            Gl::INVALID_ENUM => Some(ErrorCode::InvalidEnum),
            Gl::INVALID_VALUE => Some(ErrorCode::InvalidValue),
            Gl::INVALID_OPERATION => Some(ErrorCode::InvalidOperation),
            Gl::INVALID_FRAMEBUFFER_OPERATION => Some(ErrorCode::InvalidFramebufferOperation),
            Gl::OUT_OF_MEMORY => Some(ErrorCode::OutOfMemory),
            Gl::CONTEXT_LOST_WEBGL => Some(ErrorCode::ContextLost),
            other => Some(ErrorCode::Unknown(other)),
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            ErrorCode::InvalidEnum => Gl::INVALID_ENUM,
            ErrorCode::InvalidValue => Gl::INVALID_VALUE,
            ErrorCode::InvalidOperation => Gl::INVALID_OPERATION,
            ErrorCode::InvalidFramebufferOperation => Gl::INVALID_FRAMEBUFFER_OPERATION,
            ErrorCode::OutOfMemory => Gl::OUT_OF_MEMORY,
            ErrorCode::ContextLost => Gl::CONTEXT_LOST_WEBGL,
            ErrorCode::Unknown(id) => *id,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorCode::InvalidEnum => f.write_str("INVALID_ENUM"),
            ErrorCode::InvalidValue => f.write_str("INVALID_VALUE"),
            ErrorCode::InvalidOperation => f.write_str("INVALID_OPERATION"),
            ErrorCode::InvalidFramebufferOperation => f.write_str("INVALID_FRAMEBUFFER_OPERATION"),
            ErrorCode::OutOfMemory => f.write_str("OUT_OF_MEMORY"),
            ErrorCode::ContextLost => f.write_str("CONTEXT_LOST_WEBGL"),
            ErrorCode::Unknown(id) => write!(f, "unknown error 0x{:04X}", id),
        }
    }
}

/// The narrow set of driver calls the binding state needs.
///
/// Targets are passed as the driver's raw enum values (see the `id` methods on the target types).
/// Implementations must not cache anything themselves: every bind call must reach the driver and
/// every query must report the driver's actual current state.
///
/// A driver is bound to the thread that created it; none of the types in this crate add locking on
/// top of it.
pub trait Driver {
    /// Creates a new object of the given `kind`, or returns `None` if the driver could not create
    /// one (for example because the context is lost).
    fn create_object(&self, kind: ObjectKind) -> Option<ObjectName>;

    /// Deletes the object. The driver releases any binding of the object in the current context.
    fn delete_object(&self, kind: ObjectKind, name: ObjectName);

    /// Called when the connection forgets `name` because other code deleted the object. A driver
    /// that keeps bookkeeping for objects it did not create may release it here.
    fn forget_object(&self, _name: ObjectName) {}

    /// Allocates (and optionally initializes) the data store of the buffer bound to `target`.
    fn buffer_data(&self, target: u32, data: BufferData, usage: BufferUsage);

    fn bind_buffer(&self, target: u32, buffer: Option<ObjectName>);

    fn bind_texture(&self, target: u32, texture: Option<ObjectName>);

    fn bind_framebuffer(&self, target: u32, framebuffer: Option<ObjectName>);

    fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<ObjectName>);

    fn bind_vertex_array(&self, vertex_array: Option<ObjectName>);

    fn active_texture(&self, unit: TextureUnit);

    /// Queries which object currently occupies the slot described by `parameter`.
    fn binding(&self, parameter: BindingParameter) -> Option<ObjectName>;

    /// Queries the currently active texture unit.
    fn active_texture_unit(&self) -> TextureUnit;

    /// Returns (and clears) the error flag raised by the most recent failing call, if any.
    fn take_error(&self) -> Option<ErrorCode>;

    fn is_context_lost(&self) -> bool;
}
