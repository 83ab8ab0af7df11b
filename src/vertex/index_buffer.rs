use std::mem;
use std::slice;

use web_sys::WebGl2RenderingContext as Gl;

use crate::buffer::{BufferData, BufferUsage};
use crate::runtime::{BindError, Connection, CreateError, Driver, ObjectKind, ObjectName};
use crate::vertex::VertexArray;

/// The element array buffer slot of a vertex array object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum IndexBufferTarget {
    ElementArrayBuffer,
}

impl IndexBufferTarget {
    pub fn id(&self) -> u32 {
        match self {
            IndexBufferTarget::ElementArrayBuffer => Gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// Enumerates the available types for index values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum IndexType {
    UnsignedByte,
    UnsignedShort,
    UnsignedInt,
}

impl IndexType {
    pub fn id(&self) -> u32 {
        match self {
            IndexType::UnsignedByte => Gl::UNSIGNED_BYTE,
            IndexType::UnsignedShort => Gl::UNSIGNED_SHORT,
            IndexType::UnsignedInt => Gl::UNSIGNED_INT,
        }
    }

    pub fn size_in_bytes(&self) -> usize {
        match self {
            IndexType::UnsignedByte => 1,
            IndexType::UnsignedShort => 2,
            IndexType::UnsignedInt => 4,
        }
    }
}

/// The initial contents of an [IndexBuffer].
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum IndexData<'a> {
    U8(&'a [u8]),
    U16(&'a [u16]),
    U32(&'a [u32]),

    /// Allocates uninitialized storage for the given number of indices.
    Size(IndexType, usize),

    /// Allocates no storage.
    Empty(IndexType),
}

impl<'a> IndexData<'a> {
    pub fn index_type(&self) -> IndexType {
        match self {
            IndexData::U8(_) => IndexType::UnsignedByte,
            IndexData::U16(_) => IndexType::UnsignedShort,
            IndexData::U32(_) => IndexType::UnsignedInt,
            IndexData::Size(index_type, _) => *index_type,
            IndexData::Empty(index_type) => *index_type,
        }
    }

    /// The number of indices.
    pub fn len(&self) -> usize {
        match self {
            IndexData::U8(data) => data.len(),
            IndexData::U16(data) => data.len(),
            IndexData::U32(data) => data.len(),
            IndexData::Size(_, len) => *len,
            IndexData::Empty(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn buffer_data(&self) -> Result<BufferData<'a>, CreateError> {
        let data = match *self {
            IndexData::U8(data) => BufferData::FromData(data),
            IndexData::U16(data) => BufferData::FromData(as_bytes(data)),
            IndexData::U32(data) => BufferData::FromData(as_bytes(data)),
            IndexData::Size(index_type, len) => {
                let element_size = index_type.size_in_bytes();
                let size = len
                    .checked_mul(element_size)
                    .ok_or(CreateError::TooLarge { len, element_size })?;

                BufferData::FromSize(size)
            }
            IndexData::Empty(_) => BufferData::Empty,
        };

        Ok(data)
    }
}

fn as_bytes<T>(data: &[T]) -> &[u8]
where
    T: Copy,
{
    let size = data.len() * mem::size_of::<T>();

    unsafe { slice::from_raw_parts(data.as_ptr() as *const u8, size) }
}

/// A buffer of indices that is bound to the element array buffer slot of a vertex array object.
#[derive(Debug)]
pub struct IndexBuffer {
    connection_id: usize,
    name: ObjectName,
    index_type: IndexType,
    len: usize,
    usage: BufferUsage,
}

impl IndexBuffer {
    /// Creates a new index buffer and initializes it from `data`.
    ///
    /// The initial upload goes through the default vertex array object, so that creating an index
    /// buffer never replaces the indices of a vertex array object. The vertex array object that
    /// was current before is made current again afterwards.
    pub fn new<D>(
        connection: &mut Connection<D>,
        data: IndexData,
        usage: BufferUsage,
    ) -> Result<Self, CreateError>
    where
        D: Driver,
    {
        let buffer_data = data.buffer_data()?;
        let name = connection.create_object(ObjectKind::Buffer)?;

        let uploaded = connection.index_buffers().with_bound(
            None,
            IndexBufferTarget::ElementArrayBuffer,
            Some(name),
            |connection| {
                if buffer_data == BufferData::Empty {
                    return Ok(());
                }

                connection
                    .driver()
                    .buffer_data(Gl::ELEMENT_ARRAY_BUFFER, buffer_data, usage);

                match connection.driver().take_error() {
                    Some(code) => Err(CreateError::Upload(code)),
                    None => Ok(()),
                }
            },
        );

        if let Err(err) = uploaded {
            connection.delete_object(ObjectKind::Buffer, name);

            return Err(err);
        }

        Ok(IndexBuffer {
            connection_id: connection.id(),
            name,
            index_type: data.index_type(),
            len: data.len(),
            usage,
        })
    }

    pub fn name(&self) -> ObjectName {
        self.name
    }

    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    /// The number of indices.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn size_in_bytes(&self) -> usize {
        self.len * self.index_type.size_in_bytes()
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Binds this buffer as the index buffer of `vertex_array`, or of the default vertex array
    /// object if `vertex_array` is `None`. The vertex array object is left current.
    pub fn bind<D>(
        &self,
        connection: &mut Connection<D>,
        vertex_array: Option<&VertexArray>,
    ) -> Result<(), BindError>
    where
        D: Driver,
    {
        let container = self.container(connection, vertex_array)?;

        connection.index_buffers().bind(
            container,
            IndexBufferTarget::ElementArrayBuffer,
            Some(self.name),
        )
    }

    /// Unbinds this buffer from `vertex_array`, or from the current vertex array object if
    /// `vertex_array` is `None`; does nothing if a different buffer is bound there.
    pub fn unbind<D>(
        &self,
        connection: &mut Connection<D>,
        vertex_array: Option<&VertexArray>,
    ) -> Result<(), BindError>
    where
        D: Driver,
    {
        let container = match vertex_array {
            Some(_) => self.container(connection, vertex_array)?,
            None => {
                connection.ensure_owns(self.connection_id, ObjectKind::Buffer)?;
                connection.index_buffers().current_container()
            }
        };

        connection.index_buffers().unbind_if(
            container,
            IndexBufferTarget::ElementArrayBuffer,
            Some(self.name),
        )
    }

    /// Runs `f` with this buffer bound as the index buffer of `vertex_array` (or of the default
    /// vertex array object), then restores the previous index buffer and the previously current
    /// vertex array object.
    pub fn with<D, F, T, E>(
        &self,
        connection: &mut Connection<D>,
        vertex_array: Option<&VertexArray>,
        f: F,
    ) -> Result<T, E>
    where
        D: Driver,
        F: FnOnce(&mut Connection<D>) -> Result<T, E>,
        E: From<BindError>,
    {
        let container = self.container(connection, vertex_array)?;

        connection.index_buffers().with_bound(
            container,
            IndexBufferTarget::ElementArrayBuffer,
            Some(self.name),
            f,
        )
    }

    pub fn delete<D>(self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Buffer)?;
        connection.delete_object(ObjectKind::Buffer, self.name);

        Ok(())
    }

    fn container<D>(
        &self,
        connection: &Connection<D>,
        vertex_array: Option<&VertexArray>,
    ) -> Result<Option<ObjectName>, BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Buffer)?;

        match vertex_array {
            Some(vertex_array) => {
                connection.ensure_owns(vertex_array.connection_id(), ObjectKind::VertexArray)?;

                Ok(Some(vertex_array.name()))
            }
            None => Ok(None),
        }
    }
}
