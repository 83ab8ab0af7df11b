//! Buffers: driver-side arrays of binary data that are bound to one of the [BufferTarget] slots
//! before any operation acts on them.
//!
//! Index (element array) data lives in [IndexBuffer](crate::vertex::IndexBuffer)s instead, as
//! their binding is owned by the bound vertex array object rather than by the context.

use web_sys::WebGl2RenderingContext as Gl;

use crate::runtime::{
    BindError, BindingParameter, Connection, CreateError, Driver, ObjectKind, ObjectName,
};

/// The context-level binding slots a [Buffer] may be bound to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BufferTarget {
    ArrayBuffer,
    CopyReadBuffer,
    CopyWriteBuffer,
    PixelPackBuffer,
    PixelUnpackBuffer,
    TransformFeedbackBuffer,
    UniformBuffer,
}

impl BufferTarget {
    pub fn id(&self) -> u32 {
        match self {
            BufferTarget::ArrayBuffer => Gl::ARRAY_BUFFER,
            BufferTarget::CopyReadBuffer => Gl::COPY_READ_BUFFER,
            BufferTarget::CopyWriteBuffer => Gl::COPY_WRITE_BUFFER,
            BufferTarget::PixelPackBuffer => Gl::PIXEL_PACK_BUFFER,
            BufferTarget::PixelUnpackBuffer => Gl::PIXEL_UNPACK_BUFFER,
            BufferTarget::TransformFeedbackBuffer => Gl::TRANSFORM_FEEDBACK_BUFFER,
            BufferTarget::UniformBuffer => Gl::UNIFORM_BUFFER,
        }
    }

    pub fn binding_parameter(&self) -> BindingParameter {
        match self {
            BufferTarget::ArrayBuffer => BindingParameter::ArrayBuffer,
            BufferTarget::CopyReadBuffer => BindingParameter::CopyReadBuffer,
            BufferTarget::CopyWriteBuffer => BindingParameter::CopyWriteBuffer,
            BufferTarget::PixelPackBuffer => BindingParameter::PixelPackBuffer,
            BufferTarget::PixelUnpackBuffer => BindingParameter::PixelUnpackBuffer,
            BufferTarget::TransformFeedbackBuffer => BindingParameter::TransformFeedbackBuffer,
            BufferTarget::UniformBuffer => BindingParameter::UniformBuffer,
        }
    }
}

/// Hints to the driver how the data in a buffer is going to be used.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BufferUsage {
    StaticDraw,
    DynamicDraw,
    StreamDraw,
    StaticRead,
    DynamicRead,
    StreamRead,
    StaticCopy,
    DynamicCopy,
    StreamCopy,
}

impl BufferUsage {
    pub fn id(&self) -> u32 {
        match self {
            BufferUsage::StaticDraw => Gl::STATIC_DRAW,
            BufferUsage::DynamicDraw => Gl::DYNAMIC_DRAW,
            BufferUsage::StreamDraw => Gl::STREAM_DRAW,
            BufferUsage::StaticRead => Gl::STATIC_READ,
            BufferUsage::DynamicRead => Gl::DYNAMIC_READ,
            BufferUsage::StreamRead => Gl::STREAM_READ,
            BufferUsage::StaticCopy => Gl::STATIC_COPY,
            BufferUsage::DynamicCopy => Gl::DYNAMIC_COPY,
            BufferUsage::StreamCopy => Gl::STREAM_COPY,
        }
    }
}

impl Default for BufferUsage {
    fn default() -> Self {
        BufferUsage::StaticDraw
    }
}

/// The initial contents of a buffer's data store.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum BufferData<'a> {
    /// Allocates a data store the size of the slice and copies the slice into it.
    FromData(&'a [u8]),

    /// Allocates an uninitialized data store of the given size in bytes.
    FromSize(usize),

    /// Allocates no data store.
    Empty,
}

impl<'a> BufferData<'a> {
    pub fn size_in_bytes(&self) -> usize {
        match self {
            BufferData::FromData(data) => data.len(),
            BufferData::FromSize(size) => *size,
            BufferData::Empty => 0,
        }
    }
}

/// An array of binary data on the driver side.
///
/// A [Buffer] only remembers its [ObjectName] and the [Connection] it was created with; every
/// bind goes through the connection's binding state, so binding a buffer that is already bound is
/// free.
#[derive(Debug)]
pub struct Buffer {
    connection_id: usize,
    name: ObjectName,
    target: BufferTarget,
    usage: BufferUsage,
    size_in_bytes: usize,
}

impl Buffer {
    /// Creates a new buffer for the given `target` and initializes its data store from `data`.
    ///
    /// The upload binds the new buffer to `target`; the previously bound buffer is bound again
    /// afterwards.
    pub fn new<D>(
        connection: &mut Connection<D>,
        target: BufferTarget,
        usage: BufferUsage,
        data: BufferData,
    ) -> Result<Self, CreateError>
    where
        D: Driver,
    {
        let name = connection.create_object(ObjectKind::Buffer)?;

        if data != BufferData::Empty {
            let uploaded = connection
                .buffers()
                .with_bound(target, Some(name), |connection| {
                    connection.driver().buffer_data(target.id(), data, usage);

                    match connection.driver().take_error() {
                        Some(code) => Err(CreateError::Upload(code)),
                        None => Ok(()),
                    }
                });

            if let Err(err) = uploaded {
                connection.delete_object(ObjectKind::Buffer, name);

                return Err(err);
            }
        }

        Ok(Buffer {
            connection_id: connection.id(),
            name,
            target,
            usage,
            size_in_bytes: data.size_in_bytes(),
        })
    }

    pub fn name(&self) -> ObjectName {
        self.name
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    /// Changes the slot this buffer binds to. If the buffer currently occupies its old slot, it is
    /// unbound from it first.
    pub fn set_target<D>(
        &mut self,
        connection: &mut Connection<D>,
        target: BufferTarget,
    ) -> Result<(), BindError>
    where
        D: Driver,
    {
        self.unbind(connection)?;
        self.target = target;

        Ok(())
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    pub fn bind<D>(&self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Buffer)?;
        connection.buffers().bind(self.target, Some(self.name))
    }

    /// Unbinds this buffer from its slot; does nothing if a different buffer occupies the slot.
    pub fn unbind<D>(&self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Buffer)?;
        connection.buffers().unbind_if(self.target, Some(self.name))
    }

    /// Runs `f` with this buffer bound to its slot, then binds whichever buffer was bound before.
    pub fn with<D, F, T, E>(&self, connection: &mut Connection<D>, f: F) -> Result<T, E>
    where
        D: Driver,
        F: FnOnce(&mut Connection<D>) -> Result<T, E>,
        E: From<BindError>,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Buffer)?;
        connection.buffers().with_bound(self.target, Some(self.name), f)
    }

    /// Deletes the driver-side buffer.
    pub fn delete<D>(self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Buffer)?;
        connection.delete_object(ObjectKind::Buffer, self.name);

        Ok(())
    }
}
